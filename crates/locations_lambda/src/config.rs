use thiserror::Error;

pub const TABLE_NAME_VAR: &str = "TABLE_NAME";
pub const SCAN_PAGE_LIMIT_VAR: &str = "SCAN_PAGE_LIMIT";

/// Process configuration, read once at cold start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationsConfig {
    pub table_name: String,
    /// Upper bound on items per DynamoDB scan page. `None` lets the service
    /// cut pages at its 1 MB limit.
    pub scan_page_limit: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be configured")]
    Missing(&'static str),
    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
}

impl LocationsConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let table_name = lookup(TABLE_NAME_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::Missing(TABLE_NAME_VAR))?;

        let scan_page_limit = match lookup(SCAN_PAGE_LIMIT_VAR) {
            None => None,
            Some(value) if value.trim().is_empty() => None,
            Some(value) => match value.trim().parse::<i32>() {
                Ok(limit) if limit > 0 => Some(limit),
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        var: SCAN_PAGE_LIMIT_VAR,
                        value,
                    })
                }
            },
        };

        Ok(Self {
            table_name,
            scan_page_limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn reads_table_name_and_optional_limit() {
        let config = LocationsConfig::from_lookup(lookup_from(&[
            ("TABLE_NAME", "NGOLocations"),
            ("SCAN_PAGE_LIMIT", "25"),
        ]))
        .expect("config should load");

        assert_eq!(config.table_name, "NGOLocations");
        assert_eq!(config.scan_page_limit, Some(25));
    }

    #[test]
    fn table_name_is_required() {
        let error = LocationsConfig::from_lookup(lookup_from(&[("TABLE_NAME", "  ")]))
            .expect_err("blank table name");
        assert_eq!(error.to_string(), "TABLE_NAME must be configured");
    }

    #[test]
    fn rejects_non_positive_scan_limit() {
        let error = LocationsConfig::from_lookup(lookup_from(&[
            ("TABLE_NAME", "NGOLocations"),
            ("SCAN_PAGE_LIMIT", "0"),
        ]))
        .expect_err("zero limit");
        assert_eq!(
            error,
            ConfigError::InvalidNumber {
                var: SCAN_PAGE_LIMIT_VAR,
                value: "0".to_string(),
            }
        );
    }
}
