//! Error types for configuration synthesis.

use std::path::PathBuf;

use thiserror::Error;

use crate::provider::{CloudProvider, Topology};

/// Result type alias for synthesis operations.
pub type IacResult<T> = Result<T, IacError>;

/// Errors that can occur while synthesizing a configuration document.
#[derive(Error, Debug)]
pub enum IacError {
    #[error("Unsupported provider: '{0}'")]
    UnsupportedProvider(String),

    #[error("Unsupported topology: '{0}'")]
    UnsupportedTopology(String),

    #[error("Invalid subnet CIDR: '{0}' (expected a.b.c.d/n)")]
    InvalidSubnetCidr(String),

    #[error("No template variant registered for {provider}/{topology}")]
    NoSuchVariant {
        provider: CloudProvider,
        topology: Topology,
    },

    #[error("Invalid template {template}: {message}")]
    Template { template: String, message: String },

    #[error("Unresolved placeholder {{{{{placeholder}}}}} in template {template}")]
    UnresolvedPlaceholder {
        template: String,
        placeholder: String,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IacError {
    /// Whether the error was caused by what the caller submitted rather than
    /// by a packaging or environment defect.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            IacError::UnsupportedProvider(_)
                | IacError::UnsupportedTopology(_)
                | IacError::InvalidSubnetCidr(_)
                | IacError::NoSuchVariant { .. }
        )
    }

    pub(crate) fn template(template: impl Into<String>, message: impl Into<String>) -> Self {
        IacError::Template {
            template: template.into(),
            message: message.into(),
        }
    }
}
