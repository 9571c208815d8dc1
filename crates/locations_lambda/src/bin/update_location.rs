use chrono::Utc;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use locations_lambda::adapters::dynamodb::DynamoDbLocationStore;
use locations_lambda::handlers::error::LocationError;
use locations_lambda::handlers::request::GatewayRequest;
use locations_lambda::handlers::response::ApiGatewayResponse;
use locations_lambda::handlers::update::handle_update_location;
use locations_lambda::runtime::init_store;
use serde_json::Value;

async fn handle_request(
    event: LambdaEvent<Value>,
    store: &DynamoDbLocationStore,
) -> Result<ApiGatewayResponse, Error> {
    Ok(match GatewayRequest::from_event(event.payload) {
        Ok(request) => handle_update_location(&request, store, Utc::now()),
        Err(error) => LocationError::from(error).into_response(),
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let store = init_store().await?;
    lambda_runtime::run(service_fn(|event| handle_request(event, &store))).await
}
