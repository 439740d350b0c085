use async_trait::async_trait;
use azfile_core::utils::Redact;
use azfile_core::{Context, ProvideCredential, Result};
use std::fmt::{Debug, Formatter};

use crate::connection_string::SettingsResolver;
use crate::credential::Credential;

/// Resolves a connection string each time a credential is needed.
///
/// Resolution errors are returned as is, so a malformed string fails the
/// first signing attempt instead of silently signing nothing.
pub struct ConnectionStringCredentialProvider {
    connection_string: String,
    resolver: SettingsResolver,
}

impl Debug for ConnectionStringCredentialProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionStringCredentialProvider")
            .field("connection_string", &Redact::from(&self.connection_string))
            .finish()
    }
}

impl ConnectionStringCredentialProvider {
    /// Create a provider for the given connection string.
    pub fn new(connection_string: &str) -> Self {
        Self {
            connection_string: connection_string.to_string(),
            resolver: SettingsResolver::new(),
        }
    }
}

#[async_trait]
impl ProvideCredential for ConnectionStringCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _ctx: &Context) -> Result<Option<Self::Credential>> {
        let settings = self.resolver.resolve(&self.connection_string)?;
        Ok(Some(Credential::from(&settings)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DEV_STORE_KEY, DEV_STORE_NAME};
    use azfile_core::ErrorKind;

    #[tokio::test]
    async fn test_connection_string_credential_provider() {
        let provider = ConnectionStringCredentialProvider::new("UseDevelopmentStorage=true");
        let cred = provider.provide_credential(&Context::new()).await.unwrap();

        assert_eq!(
            cred,
            Some(Credential::with_shared_key(DEV_STORE_NAME, DEV_STORE_KEY))
        );
    }

    #[tokio::test]
    async fn test_connection_string_credential_provider_malformed() {
        let provider = ConnectionStringCredentialProvider::new("AccountName=acct");
        let err = provider
            .provide_credential(&Context::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ConnectionStringMalformed);
    }
}
