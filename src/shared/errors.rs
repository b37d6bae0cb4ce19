use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Validation: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Store failure: {0}")]
    Store(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, value: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            field: "id",
            value: value.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(vec![message.into()])
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_joins_fields() {
        let err = DomainError::Validation(vec![
            "latitude: must be within [-90, 90]".into(),
            "name: must not be empty".into(),
        ]);
        assert_eq!(
            err.to_string(),
            "Validation: latitude: must be within [-90, 90]; name: must not be empty"
        );
    }

    #[test]
    fn not_found_names_entity() {
        let err = DomainError::not_found("Charger", "c1");
        assert_eq!(err.to_string(), "Not found: Charger with id=c1");
    }
}
