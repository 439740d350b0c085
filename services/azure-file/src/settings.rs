use std::fmt::{Debug, Formatter};

use azfile_core::utils::Redact;
use azfile_core::{Error, Result};

use crate::connection_string::SettingsResolver;

/// Resolved connection settings of a storage account.
///
/// Settings are immutable once resolved. Use the `with_*` methods to derive
/// a copy with one endpoint replaced.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub(crate) name: String,
    pub(crate) key: String,
    pub(crate) blob_endpoint: Option<String>,
    pub(crate) queue_endpoint: Option<String>,
    pub(crate) table_endpoint: Option<String>,
    pub(crate) file_endpoint: Option<String>,
}

impl Debug for Settings {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("name", &self.name)
            .field("key", &Redact::from(&self.key))
            .field("blob_endpoint", &self.blob_endpoint)
            .field("queue_endpoint", &self.queue_endpoint)
            .field("table_endpoint", &self.table_endpoint)
            .field("file_endpoint", &self.file_endpoint)
            .finish()
    }
}

impl Settings {
    /// Build settings for an account that only talks to the file service.
    pub fn new(name: &str, key: &str, file_endpoint: &str) -> Self {
        Self {
            name: name.to_string(),
            key: key.to_string(),
            blob_endpoint: None,
            queue_endpoint: None,
            table_endpoint: None,
            file_endpoint: Some(file_endpoint.to_string()),
        }
    }

    /// Resolve settings from a connection string.
    ///
    /// Shortcut for [`SettingsResolver::resolve`] on a fresh resolver.
    pub fn from_connection_string(conn_str: &str) -> Result<Self> {
        SettingsResolver::new().resolve(conn_str)
    }

    /// Account name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base64 encoded account key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Blob service endpoint.
    pub fn blob_endpoint(&self) -> Option<&str> {
        self.blob_endpoint.as_deref()
    }

    /// Queue service endpoint.
    pub fn queue_endpoint(&self) -> Option<&str> {
        self.queue_endpoint.as_deref()
    }

    /// Table service endpoint.
    pub fn table_endpoint(&self) -> Option<&str> {
        self.table_endpoint.as_deref()
    }

    /// File service endpoint.
    pub fn file_endpoint(&self) -> Option<&str> {
        self.file_endpoint.as_deref()
    }

    /// File service endpoint, or a config error when it isn't set.
    ///
    /// Development storage never has one.
    pub fn file_endpoint_or_err(&self) -> Result<&str> {
        self.file_endpoint().ok_or_else(|| {
            Error::config_invalid(format!(
                "account {} has no file endpoint configured",
                self.name
            ))
        })
    }

    /// Copy of these settings with a different file endpoint.
    pub fn with_file_endpoint(mut self, endpoint: &str) -> Self {
        self.file_endpoint = Some(endpoint.to_string());
        self
    }
}
