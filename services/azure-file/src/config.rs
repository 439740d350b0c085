use std::fmt::{Debug, Formatter};

use azfile_core::utils::Redact;
use azfile_core::{Context, Error, Result};

use crate::connection_string::SettingsResolver;
use crate::constants::*;
use crate::settings::Settings;
use crate::specification::Tokens;

/// Config carries all the configuration for the file service client.
#[derive(Clone, Default)]
pub struct Config {
    /// `connection_string` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_STORAGE_CONNECTION_STRING`]
    pub connection_string: Option<String>,
    /// `account_name` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_STORAGE_ACCOUNT_NAME`]
    ///
    /// Only used when no connection string is set.
    pub account_name: Option<String>,
    /// `account_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_STORAGE_ACCOUNT_KEY`]
    ///
    /// Only used when no connection string is set.
    pub account_key: Option<String>,
    /// `file_endpoint` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_STORAGE_FILE_ENDPOINT`]
    ///
    /// Replaces whatever file endpoint the account settings would use.
    pub file_endpoint: Option<String>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("connection_string", &Redact::from(&self.connection_string))
            .field("account_name", &self.account_name)
            .field("account_key", &Redact::from(&self.account_key))
            .field("file_endpoint", &self.file_endpoint)
            .finish()
    }
}

impl Config {
    /// Load config from env.
    ///
    /// Values already set on the config are kept.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        let envs = ctx.env_vars();

        if self.connection_string.is_none() {
            self.connection_string = envs.get(AZURE_STORAGE_CONNECTION_STRING).cloned();
        }
        if self.account_name.is_none() {
            self.account_name = envs.get(AZURE_STORAGE_ACCOUNT_NAME).cloned();
        }
        if self.account_key.is_none() {
            self.account_key = envs.get(AZURE_STORAGE_ACCOUNT_KEY).cloned();
        }
        if self.file_endpoint.is_none() {
            self.file_endpoint = envs.get(AZURE_STORAGE_FILE_ENDPOINT).cloned();
        }

        self
    }

    /// Resolve the config into account settings with a fresh resolver.
    pub fn into_settings(self) -> Result<Settings> {
        self.into_settings_with(&SettingsResolver::new())
    }

    /// Resolve the config into account settings.
    ///
    /// A connection string takes precedence. Otherwise the account name and
    /// key are resolved as an https account with derived endpoints. The name
    /// must consist of ASCII letters, digits and `-`.
    pub fn into_settings_with(self, resolver: &SettingsResolver) -> Result<Settings> {
        let settings = match (&self.connection_string, &self.account_name, &self.account_key) {
            (Some(conn_str), _, _) => resolver.resolve(conn_str)?,
            (None, Some(name), Some(key)) => {
                if name.is_empty()
                    || !name
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '-')
                {
                    return Err(Error::config_invalid(format!(
                        "account name {name:?} is not a valid storage account name"
                    )));
                }

                let tokens = Tokens::from([
                    (DEFAULT_ENDPOINTS_PROTOCOL.to_string(), "https".to_string()),
                    (ACCOUNT_NAME.to_string(), name.clone()),
                    (ACCOUNT_KEY.to_string(), key.clone()),
                ]);
                resolver.resolve_tokens(&tokens)?
            }
            _ => {
                return Err(Error::config_invalid(
                    "neither a connection string nor an account name and key is configured",
                ))
            }
        };

        Ok(match self.file_endpoint {
            Some(endpoint) => settings.with_file_endpoint(&endpoint),
            None => settings,
        })
    }
}
