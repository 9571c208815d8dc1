use lambda_runtime::{service_fn, Error, LambdaEvent};
use locations_lambda::adapters::dynamodb::DynamoDbLocationStore;
use locations_lambda::handlers::get_all::handle_get_locations;
use locations_lambda::handlers::response::ApiGatewayResponse;
use locations_lambda::runtime::init_store;
use serde_json::Value;

// The listing takes no input, so the event is not decoded.
async fn handle_request(
    _event: LambdaEvent<Value>,
    store: &DynamoDbLocationStore,
) -> Result<ApiGatewayResponse, Error> {
    Ok(handle_get_locations(store))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let store = init_store().await?;
    lambda_runtime::run(service_fn(|event| handle_request(event, &store))).await
}
