// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use azfile_core::utils::Redact;
use azfile_core::SigningCredential;
use std::fmt::{Debug, Formatter};

use crate::settings::Settings;

/// Credential used to sign file service requests.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Shared Key authentication with account name and key
    SharedKey {
        /// Azure storage account name.
        account_name: String,
        /// Base64 encoded account key.
        account_key: String,
    },
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Credential::SharedKey {
                account_name,
                account_key,
            } => f
                .debug_struct("Credential::SharedKey")
                .field("account_name", &account_name)
                .field("account_key", &Redact::from(account_key))
                .finish(),
        }
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        match self {
            Credential::SharedKey {
                account_name,
                account_key,
            } => !account_name.is_empty() && !account_key.is_empty(),
        }
    }
}

impl Credential {
    /// Create a new credential with shared key authentication.
    pub fn with_shared_key(account_name: &str, account_key: &str) -> Self {
        Self::SharedKey {
            account_name: account_name.to_string(),
            account_key: account_key.to_string(),
        }
    }

    /// Account the credential belongs to.
    pub fn account_name(&self) -> &str {
        match self {
            Credential::SharedKey { account_name, .. } => account_name,
        }
    }
}

impl From<&Settings> for Credential {
    fn from(settings: &Settings) -> Self {
        Self::with_shared_key(settings.name(), settings.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid() {
        assert!(Credential::with_shared_key("acct", "a2V5").is_valid());
        assert!(!Credential::with_shared_key("", "a2V5").is_valid());
        assert!(!Credential::with_shared_key("acct", "").is_valid());
    }

    #[test]
    fn test_debug_redacts_key() {
        let cred = Credential::with_shared_key("acct", "c3VwZXItc2VjcmV0LWtleQ==");
        let s = format!("{cred:?}");

        assert!(s.contains("acct"));
        assert!(!s.contains("c3VwZXItc2VjcmV0LWtleQ=="));
    }

    #[test]
    fn test_from_settings() {
        let settings = Settings::new("acct", "a2V5", "https://acct.file.core.windows.net/");

        assert_eq!(
            Credential::from(&settings),
            Credential::with_shared_key("acct", "a2V5")
        );
    }
}
