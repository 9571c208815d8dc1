use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::coordinate::{Axis, Coordinate, CoordinateError};

pub const MISSING_REQUIRED_FIELDS: &str = "Missing required fields";
pub const REQUIRED_FIELDS: [&str; 3] = ["name", "latitude", "longitude"];

/// A stored location, in the flat layout used both on the wire and in the table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    pub name: String,
    pub latitude: Coordinate,
    pub longitude: Coordinate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Validated fields of a create request, before an id and timestamps exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLocation {
    pub name: String,
    pub latitude: Coordinate,
    pub longitude: Coordinate,
    pub description: Option<String>,
    pub address: Option<String>,
}

/// Fields supplied by an update request.
///
/// `None` leaves the stored value untouched. For the optional text fields,
/// `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationPatch {
    pub name: Option<String>,
    pub latitude: Option<Coordinate>,
    pub longitude: Option<Coordinate>,
    pub description: Option<Option<String>>,
    pub address: Option<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<CoordinateError> for ValidationError {
    fn from(error: CoordinateError) -> Self {
        Self::new(format!("Invalid coordinates: {error}"))
    }
}

impl NewLocation {
    pub fn into_location(self, id: impl Into<String>, now: &str) -> Location {
        Location {
            id: id.into(),
            name: self.name,
            latitude: self.latitude,
            longitude: self.longitude,
            description: self.description,
            address: self.address,
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }
}

impl LocationPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl Location {
    /// Merges `patch` into this record and refreshes `updated_at`.
    ///
    /// `id` and `created_at` are never touched.
    pub fn apply_patch(&mut self, patch: LocationPatch, now: &str) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(latitude) = patch.latitude {
            self.latitude = latitude;
        }
        if let Some(longitude) = patch.longitude {
            self.longitude = longitude;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        self.updated_at = now.to_string();
    }
}

pub fn parse_create_request(payload: &Value) -> Result<NewLocation, ValidationError> {
    let body = require_object(payload)?;

    let has_all_required = REQUIRED_FIELDS
        .iter()
        .all(|field| body.get(*field).is_some_and(|value| !value.is_null()));
    if !has_all_required {
        return Err(ValidationError::new(MISSING_REQUIRED_FIELDS));
    }

    let name = match non_blank_name(&body["name"])? {
        Some(name) => name,
        None => return Err(ValidationError::new(MISSING_REQUIRED_FIELDS)),
    };

    Ok(NewLocation {
        name,
        latitude: Coordinate::from_json(Axis::Latitude, &body["latitude"])?,
        longitude: Coordinate::from_json(Axis::Longitude, &body["longitude"])?,
        description: optional_text(body, "description")?.flatten(),
        address: optional_text(body, "address")?.flatten(),
    })
}

/// Reads the updatable fields present in `payload`.
///
/// `id`, `createdAt` and `updatedAt` are server-owned and ignored if sent.
pub fn parse_update_request(payload: &Value) -> Result<LocationPatch, ValidationError> {
    let body = require_object(payload)?;

    let name = match body.get("name") {
        None => None,
        Some(value) => match non_blank_name(value)? {
            Some(name) => Some(name),
            None => return Err(ValidationError::new("name cannot be empty")),
        },
    };

    Ok(LocationPatch {
        name,
        latitude: required_coordinate(body, Axis::Latitude)?,
        longitude: required_coordinate(body, Axis::Longitude)?,
        description: optional_text(body, "description")?,
        address: optional_text(body, "address")?,
    })
}

fn require_object(payload: &Value) -> Result<&Map<String, Value>, ValidationError> {
    payload
        .as_object()
        .ok_or_else(|| ValidationError::new("Request body must be a JSON object"))
}

fn non_blank_name(value: &Value) -> Result<Option<String>, ValidationError> {
    match value {
        Value::String(text) if text.trim().is_empty() => Ok(None),
        Value::String(text) => Ok(Some(text.clone())),
        Value::Null => Ok(None),
        _ => Err(ValidationError::new("name must be a string")),
    }
}

fn required_coordinate(
    body: &Map<String, Value>,
    axis: Axis,
) -> Result<Option<Coordinate>, ValidationError> {
    match body.get(axis.as_str()) {
        None => Ok(None),
        Some(Value::Null) => Err(ValidationError::new(format!("{axis} cannot be null"))),
        Some(value) => Ok(Some(Coordinate::from_json(axis, value)?)),
    }
}

fn optional_text(
    body: &Map<String, Value>,
    field: &str,
) -> Result<Option<Option<String>>, ValidationError> {
    match body.get(field) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(Value::String(text)) => Ok(Some(Some(text.clone()))),
        Some(_) => Err(ValidationError::new(format!("{field} must be a string"))),
    }
}
