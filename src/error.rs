use crate::model::DatasetKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("duplicate natural key '{key}' in {kind} dataset")]
    DuplicateKey { kind: DatasetKind, key: String },
    #[error("{kind} record '{key}' references missing {target} '{target_key}'")]
    DanglingReference {
        kind: DatasetKind,
        key: String,
        target: DatasetKind,
        target_key: String,
    },
    #[error("dataset order: {message}")]
    DependencyOrder { message: String },
    #[error("invalid {kind} record '{key}': {message}")]
    InvalidRecord {
        kind: DatasetKind,
        key: String,
        message: String,
    },
    #[error("failed to reconcile {kind} record '{key}'")]
    Reconcile {
        kind: DatasetKind,
        key: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to create view '{name}'")]
    View {
        name: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("invalid theme data: {message}")]
    Theme { message: String },
    #[error("invalid configuration: {message}")]
    Config { message: String },
}

impl SeedError {
    pub fn dependency_order(message: impl Into<String>) -> Self {
        Self::DependencyOrder {
            message: message.into(),
        }
    }

    pub fn invalid_record(kind: DatasetKind, key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            kind,
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn theme(message: impl Into<String>) -> Self {
        Self::Theme {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
