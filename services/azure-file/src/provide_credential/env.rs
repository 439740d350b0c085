use async_trait::async_trait;
use azfile_core::{Context, ProvideCredential, Result};

use crate::config::Config;
use crate::credential::Credential;

/// Loads a credential from environment variables.
///
/// - `AZURE_STORAGE_CONNECTION_STRING`, resolved like any connection string
/// - `AZURE_STORAGE_ACCOUNT_NAME` and `AZURE_STORAGE_ACCOUNT_KEY`
///
/// Returns `None` when neither is set.
#[derive(Debug, Default, Clone)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create a new environment credential provider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let config = Config::default().from_env(ctx);

        if config.connection_string.is_none()
            && (config.account_name.is_none() || config.account_key.is_none())
        {
            return Ok(None);
        }

        let settings = config.into_settings()?;
        Ok(Some(Credential::from(&settings)))
    }
}
