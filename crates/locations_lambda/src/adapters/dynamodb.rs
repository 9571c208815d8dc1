use std::collections::HashMap;
use std::future::Future;

use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use locations_core::contract::Location;
use locations_core::coordinate::Coordinate;

use super::location_store::{LocationStore, ScanPage, StoreError};
use crate::config::LocationsConfig;

pub const ID_ATTRIBUTE: &str = "id";
const NAME_ATTRIBUTE: &str = "name";
const LATITUDE_ATTRIBUTE: &str = "latitude";
const LONGITUDE_ATTRIBUTE: &str = "longitude";
const DESCRIPTION_ATTRIBUTE: &str = "description";
const ADDRESS_ATTRIBUTE: &str = "address";
const CREATED_AT_ATTRIBUTE: &str = "createdAt";
const UPDATED_AT_ATTRIBUTE: &str = "updatedAt";

pub type Item = HashMap<String, AttributeValue>;

/// `LocationStore` over a DynamoDB table whose partition key is `id` (S).
///
/// Calls block the current worker thread, which requires the multi-threaded
/// Tokio runtime.
#[derive(Debug, Clone)]
pub struct DynamoDbLocationStore {
    client: aws_sdk_dynamodb::Client,
    table_name: String,
    scan_page_limit: Option<i32>,
}

impl DynamoDbLocationStore {
    pub fn new(client: aws_sdk_dynamodb::Client, config: &LocationsConfig) -> Self {
        Self {
            client,
            table_name: config.table_name.clone(),
            scan_page_limit: config.scan_page_limit,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

impl LocationStore for DynamoDbLocationStore {
    fn put_location(&self, location: &Location) -> Result<(), StoreError> {
        block_on(async {
            self.client
                .put_item()
                .table_name(&self.table_name)
                .set_item(Some(location_to_item(location)))
                .send()
                .await
                .map(|_| ())
                .map_err(|error| request_error("PutItem", error))
        })
    }

    fn get_location(&self, id: &str) -> Result<Option<Location>, StoreError> {
        let output = block_on(async {
            self.client
                .get_item()
                .table_name(&self.table_name)
                .key(ID_ATTRIBUTE, AttributeValue::S(id.to_string()))
                .consistent_read(true)
                .send()
                .await
                .map_err(|error| request_error("GetItem", error))
        })?;

        output.item().map(location_from_item).transpose()
    }

    fn delete_location(&self, id: &str) -> Result<(), StoreError> {
        block_on(async {
            self.client
                .delete_item()
                .table_name(&self.table_name)
                .key(ID_ATTRIBUTE, AttributeValue::S(id.to_string()))
                .send()
                .await
                .map(|_| ())
                .map_err(|error| request_error("DeleteItem", error))
        })
    }

    fn scan_page(&self, start_key: Option<&str>) -> Result<ScanPage, StoreError> {
        let output = block_on(async {
            self.client
                .scan()
                .table_name(&self.table_name)
                .set_exclusive_start_key(start_key.map(key_item))
                .set_limit(self.scan_page_limit)
                .send()
                .await
                .map_err(|error| request_error("Scan", error))
        })?;

        scan_page_from_output(output.items(), output.last_evaluated_key())
    }
}

/// Decodes one scan response. The continuation cursor is the `id` held in
/// `LastEvaluatedKey`; no key means the scan is complete.
fn scan_page_from_output(
    items: &[Item],
    last_evaluated_key: Option<&Item>,
) -> Result<ScanPage, StoreError> {
    let locations = items
        .iter()
        .map(location_from_item)
        .collect::<Result<Vec<_>, _>>()?;
    let last_evaluated_key = last_evaluated_key
        .map(|key| string_attribute(key, ID_ATTRIBUTE))
        .transpose()?;

    Ok(ScanPage {
        locations,
        last_evaluated_key,
    })
}

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

fn request_error<E>(operation: &'static str, error: E) -> StoreError
where
    E: std::error::Error + 'static,
{
    StoreError::request(operation, DisplayErrorContext(error).to_string())
}

fn key_item(id: &str) -> Item {
    HashMap::from([(ID_ATTRIBUTE.to_string(), AttributeValue::S(id.to_string()))])
}

/// Flat item layout: coordinates as `N`, everything else as `S`; absent
/// optional text is omitted rather than stored as NULL.
pub fn location_to_item(location: &Location) -> Item {
    let mut item = HashMap::from([
        (
            ID_ATTRIBUTE.to_string(),
            AttributeValue::S(location.id.clone()),
        ),
        (
            NAME_ATTRIBUTE.to_string(),
            AttributeValue::S(location.name.clone()),
        ),
        (
            LATITUDE_ATTRIBUTE.to_string(),
            AttributeValue::N(location.latitude.as_str().to_string()),
        ),
        (
            LONGITUDE_ATTRIBUTE.to_string(),
            AttributeValue::N(location.longitude.as_str().to_string()),
        ),
        (
            CREATED_AT_ATTRIBUTE.to_string(),
            AttributeValue::S(location.created_at.clone()),
        ),
        (
            UPDATED_AT_ATTRIBUTE.to_string(),
            AttributeValue::S(location.updated_at.clone()),
        ),
    ]);
    if let Some(description) = &location.description {
        item.insert(
            DESCRIPTION_ATTRIBUTE.to_string(),
            AttributeValue::S(description.clone()),
        );
    }
    if let Some(address) = &location.address {
        item.insert(
            ADDRESS_ATTRIBUTE.to_string(),
            AttributeValue::S(address.clone()),
        );
    }
    item
}

pub fn location_from_item(item: &Item) -> Result<Location, StoreError> {
    Ok(Location {
        id: string_attribute(item, ID_ATTRIBUTE)?,
        name: string_attribute(item, NAME_ATTRIBUTE)?,
        latitude: coordinate_attribute(item, LATITUDE_ATTRIBUTE)?,
        longitude: coordinate_attribute(item, LONGITUDE_ATTRIBUTE)?,
        description: optional_string_attribute(item, DESCRIPTION_ATTRIBUTE)?,
        address: optional_string_attribute(item, ADDRESS_ATTRIBUTE)?,
        created_at: string_attribute(item, CREATED_AT_ATTRIBUTE)?,
        updated_at: string_attribute(item, UPDATED_AT_ATTRIBUTE)?,
    })
}

fn string_attribute(item: &Item, name: &str) -> Result<String, StoreError> {
    optional_string_attribute(item, name)?
        .ok_or_else(|| StoreError::MalformedItem(format!("missing attribute '{name}'")))
}

fn optional_string_attribute(item: &Item, name: &str) -> Result<Option<String>, StoreError> {
    match item.get(name) {
        None | Some(AttributeValue::Null(_)) => Ok(None),
        Some(AttributeValue::S(value)) => Ok(Some(value.clone())),
        Some(_) => Err(StoreError::MalformedItem(format!(
            "attribute '{name}' must be a string"
        ))),
    }
}

fn coordinate_attribute(item: &Item, name: &str) -> Result<Coordinate, StoreError> {
    // S is tolerated; only the key attribute has a declared type.
    let text = match item.get(name) {
        Some(AttributeValue::N(value)) | Some(AttributeValue::S(value)) => value,
        Some(_) => {
            return Err(StoreError::MalformedItem(format!(
                "attribute '{name}' must be a number"
            )))
        }
        None => {
            return Err(StoreError::MalformedItem(format!(
                "missing attribute '{name}'"
            )))
        }
    };
    Coordinate::parse(text)
        .map_err(|error| StoreError::MalformedItem(format!("attribute '{name}': {error}")))
}

#[cfg(test)]
mod tests {
    use locations_core::contract::NewLocation;

    use super::*;

    fn sample_location() -> Location {
        location_with_id("a1b2")
    }

    fn location_with_id(id: &str) -> Location {
        NewLocation {
            name: "Community kitchen".to_string(),
            latitude: Coordinate::parse("-31.420083333333333333").expect("latitude"),
            longitude: Coordinate::parse("-64.18877").expect("longitude"),
            description: None,
            address: Some("Bv. San Juan 49".to_string()),
        }
        .into_location(id, "2026-10-19T08:00:00.000000Z")
    }

    #[test]
    fn item_stores_coordinates_as_exact_numbers() {
        let item = location_to_item(&sample_location());

        assert_eq!(
            item.get(LATITUDE_ATTRIBUTE),
            Some(&AttributeValue::N("-31.420083333333333333".to_string()))
        );
        assert_eq!(
            item.get(ID_ATTRIBUTE),
            Some(&AttributeValue::S("a1b2".to_string()))
        );
        assert!(!item.contains_key(DESCRIPTION_ATTRIBUTE));
        assert_eq!(item.len(), 7);
    }

    #[test]
    fn item_round_trips_to_the_same_location() {
        let location = sample_location();
        let decoded = location_from_item(&location_to_item(&location)).expect("decode");
        assert_eq!(decoded, location);
    }

    #[test]
    fn rejects_item_without_required_attribute() {
        let mut item = location_to_item(&sample_location());
        item.remove(NAME_ATTRIBUTE);

        let error = location_from_item(&item).expect_err("name is missing");
        assert_eq!(
            error,
            StoreError::MalformedItem("missing attribute 'name'".to_string())
        );
    }

    #[test]
    fn rejects_non_numeric_coordinate_attribute() {
        let mut item = location_to_item(&sample_location());
        item.insert(
            LONGITUDE_ATTRIBUTE.to_string(),
            AttributeValue::Bool(true),
        );

        let error = location_from_item(&item).expect_err("longitude is a bool");
        assert_eq!(
            error,
            StoreError::MalformedItem("attribute 'longitude' must be a number".to_string())
        );
    }

    #[test]
    fn scan_cursor_is_keyed_by_id() {
        assert_eq!(
            key_item("a1b2"),
            HashMap::from([(
                "id".to_string(),
                AttributeValue::S("a1b2".to_string())
            )])
        );
    }

    #[test]
    fn scan_output_with_last_key_continues_from_that_id() {
        let items = vec![
            location_to_item(&location_with_id("a")),
            location_to_item(&location_with_id("b")),
        ];
        let last_key = key_item("b");

        let page = scan_page_from_output(&items, Some(&last_key)).expect("page");

        let ids: Vec<&str> = page.locations.iter().map(|location| location.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(page.last_evaluated_key.as_deref(), Some("b"));
    }

    #[test]
    fn scan_output_without_last_key_ends_the_scan() {
        let items = vec![location_to_item(&location_with_id("c"))];

        let page = scan_page_from_output(&items, None).expect("page");

        assert_eq!(page.locations.len(), 1);
        assert_eq!(page.last_evaluated_key, None);

        let empty = scan_page_from_output(&[], None).expect("empty page");
        assert_eq!(empty, ScanPage::default());
    }

    #[test]
    fn scan_output_with_malformed_key_or_item_is_an_error() {
        let wrong_key = HashMap::from([(
            ID_ATTRIBUTE.to_string(),
            AttributeValue::N("7".to_string()),
        )]);
        let error = scan_page_from_output(&[], Some(&wrong_key)).expect_err("numeric id key");
        assert_eq!(
            error,
            StoreError::MalformedItem("attribute 'id' must be a string".to_string())
        );

        let mut broken = location_to_item(&location_with_id("d"));
        broken.remove(LATITUDE_ATTRIBUTE);
        let error = scan_page_from_output(&[broken], None).expect_err("missing latitude");
        assert_eq!(
            error,
            StoreError::MalformedItem("missing attribute 'latitude'".to_string())
        );
    }
}
