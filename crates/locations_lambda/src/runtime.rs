use lambda_runtime::Error;

use crate::adapters::dynamodb::DynamoDbLocationStore;
use crate::config::LocationsConfig;
use crate::telemetry;

/// Cold-start setup shared by every Lambda binary: logging, configuration,
/// and the table client that is reused for the life of the process.
pub async fn init_store() -> Result<DynamoDbLocationStore, Error> {
    telemetry::init_tracing();

    let config = LocationsConfig::from_env()?;
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let store = DynamoDbLocationStore::new(aws_sdk_dynamodb::Client::new(&aws_config), &config);

    tracing::info!(
        table_name = %store.table_name(),
        scan_page_limit = ?config.scan_page_limit,
        "Location store ready"
    );
    Ok(store)
}
