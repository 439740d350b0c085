use azfile_core::utils::Redact;
use azfile_core::{Error, Result};
use http::Uri;
use log::debug;
use once_cell::sync::OnceCell;

use crate::constants::*;
use crate::settings::Settings;
use crate::specification::{
    is_account_key, is_present, is_protocol, is_true, is_uri, matched_specification, MatchRule,
    SettingSpec, Tokens,
};

const USE_DEVELOPMENT_STORAGE_SETTING: SettingSpec =
    SettingSpec::new(USE_DEVELOPMENT_STORAGE, is_true);
const DEVELOPMENT_STORAGE_PROXY_URI_SETTING: SettingSpec =
    SettingSpec::new(DEVELOPMENT_STORAGE_PROXY_URI, is_uri).with_default(DEV_STORE_URI);
const DEFAULT_ENDPOINTS_PROTOCOL_SETTING: SettingSpec =
    SettingSpec::new(DEFAULT_ENDPOINTS_PROTOCOL, is_protocol);
const ACCOUNT_NAME_SETTING: SettingSpec = SettingSpec::new(ACCOUNT_NAME, is_present);
const ACCOUNT_KEY_SETTING: SettingSpec = SettingSpec::new(ACCOUNT_KEY, is_account_key).secret();
const BLOB_ENDPOINT_SETTING: SettingSpec = SettingSpec::new(BLOB_ENDPOINT, is_uri);
const QUEUE_ENDPOINT_SETTING: SettingSpec = SettingSpec::new(QUEUE_ENDPOINT, is_uri);
const TABLE_ENDPOINT_SETTING: SettingSpec = SettingSpec::new(TABLE_ENDPOINT, is_uri);
const FILE_ENDPOINT_SETTING: SettingSpec = SettingSpec::new(FILE_ENDPOINT, is_uri);

const ENDPOINT_SETTINGS: [SettingSpec; 4] = [
    BLOB_ENDPOINT_SETTING,
    QUEUE_ENDPOINT_SETTING,
    TABLE_ENDPOINT_SETTING,
    FILE_ENDPOINT_SETTING,
];

/// Configuration shapes a connection string can take, in match priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Alternative {
    DevelopmentStorage,
    Automatic,
    Explicit,
}

/// Turns connection strings into [`Settings`].
///
/// The resolver owns its rule table and the memoised development storage
/// account, so a resolver kept around for the whole session computes the
/// latter at most once.
#[derive(Debug)]
pub struct SettingsResolver {
    alternatives: Vec<(Alternative, Vec<MatchRule>)>,
    development_storage: OnceCell<Settings>,
}

impl Default for SettingsResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsResolver {
    /// Create a resolver with the standard rule table.
    pub fn new() -> Self {
        let alternatives = vec![
            (
                Alternative::DevelopmentStorage,
                vec![
                    MatchRule::AllRequired(vec![USE_DEVELOPMENT_STORAGE_SETTING]),
                    MatchRule::Optional(vec![DEVELOPMENT_STORAGE_PROXY_URI_SETTING]),
                ],
            ),
            (
                Alternative::Automatic,
                vec![
                    MatchRule::AllRequired(vec![
                        DEFAULT_ENDPOINTS_PROTOCOL_SETTING,
                        ACCOUNT_NAME_SETTING,
                        ACCOUNT_KEY_SETTING,
                    ]),
                    MatchRule::Optional(ENDPOINT_SETTINGS.to_vec()),
                ],
            ),
            (
                Alternative::Explicit,
                vec![
                    MatchRule::AtLeastOne(ENDPOINT_SETTINGS.to_vec()),
                    MatchRule::AllRequired(vec![ACCOUNT_NAME_SETTING, ACCOUNT_KEY_SETTING]),
                ],
            ),
        ];

        Self {
            alternatives,
            development_storage: OnceCell::new(),
        }
    }

    /// Resolve a connection string.
    ///
    /// The first alternative whose keys fit wins: development storage, then
    /// endpoints derived from the account name, then explicit endpoints.
    pub fn resolve(&self, conn_str: &str) -> Result<Settings> {
        self.resolve_tokens(&parse_into_tokens(conn_str)?)
    }

    /// Resolve settings out of already parsed tokens.
    ///
    /// Keys must use the canonical spelling used in connection strings.
    pub fn resolve_tokens(&self, tokens: &Tokens) -> Result<Settings> {
        for (alternative, rules) in &self.alternatives {
            if !matched_specification(tokens, rules)? {
                continue;
            }

            debug!("connection string matched {alternative:?} settings");
            return match alternative {
                Alternative::DevelopmentStorage => self.development_storage_from(tokens),
                Alternative::Automatic => automatic_from(tokens),
                Alternative::Explicit => explicit_from(tokens),
            };
        }

        let mut keys: Vec<&str> = tokens.keys().map(String::as_str).collect();
        keys.sort_unstable();
        Err(Error::connection_string_malformed(format!(
            "connection string with settings [{}] matches no known configuration",
            keys.join(", ")
        )))
    }

    /// Settings of the local storage emulator at its default address.
    pub fn development_storage_account(&self) -> Result<Settings> {
        self.development_storage
            .get_or_try_init(|| development_storage_for(DEV_STORE_URI))
            .cloned()
    }

    fn development_storage_from(&self, tokens: &Tokens) -> Result<Settings> {
        match DEVELOPMENT_STORAGE_PROXY_URI_SETTING.resolve(tokens) {
            Some(proxy) if proxy != DEV_STORE_URI => development_storage_for(proxy),
            _ => self.development_storage_account(),
        }
    }
}

/// Split a connection string into tokens keyed by their canonical names.
///
/// Fields are `;` separated `key=value` pairs. Keys match the known
/// vocabulary case-insensitively and may appear once.
pub fn parse_into_tokens(conn_str: &str) -> Result<Tokens> {
    let mut tokens = Tokens::new();

    for field in conn_str
        .trim()
        .replace('\n', "")
        .split(';')
        .map(str::trim)
        .filter(|field| !field.is_empty())
    {
        let (key, value) = field.split_once('=').ok_or_else(|| {
            Error::connection_string_malformed(format!(
                "expected '=' in field: {}",
                Redact::from(field)
            ))
        })?;
        let key = key.trim();

        let canonical = CONNECTION_STRING_KEYS
            .iter()
            .find(|k| k.eq_ignore_ascii_case(key))
            .ok_or_else(|| {
                Error::connection_string_malformed(format!("unknown setting '{key}'"))
            })?;

        if tokens
            .insert(canonical.to_string(), value.trim().to_string())
            .is_some()
        {
            return Err(Error::connection_string_malformed(format!(
                "setting '{canonical}' appears more than once"
            )));
        }
    }

    Ok(tokens)
}

fn development_storage_for(proxy: &str) -> Result<Settings> {
    let uri: Uri = proxy.parse().map_err(|e| {
        Error::config_invalid(format!("invalid development storage proxy uri: {proxy}"))
            .with_source(e)
    })?;
    let (Some(scheme), Some(host)) = (uri.scheme_str(), uri.host()) else {
        return Err(Error::config_invalid(format!(
            "development storage proxy uri needs a scheme and host: {proxy}"
        )));
    };

    let prefix = format!("{scheme}://{host}");
    let endpoint = |port: u16| format!("{prefix}:{port}/{DEV_STORE_NAME}/");

    Ok(Settings {
        name: DEV_STORE_NAME.to_string(),
        key: DEV_STORE_KEY.to_string(),
        blob_endpoint: Some(endpoint(DEV_STORE_BLOB_PORT)),
        queue_endpoint: Some(endpoint(DEV_STORE_QUEUE_PORT)),
        table_endpoint: Some(endpoint(DEV_STORE_TABLE_PORT)),
        // The emulator doesn't serve files.
        file_endpoint: None,
    })
}

fn automatic_from(tokens: &Tokens) -> Result<Settings> {
    let protocol = required(tokens, &DEFAULT_ENDPOINTS_PROTOCOL_SETTING)?.to_ascii_lowercase();
    let name = required(tokens, &ACCOUNT_NAME_SETTING)?;
    let key = required(tokens, &ACCOUNT_KEY_SETTING)?;

    let endpoint = |spec: &SettingSpec, dns: &str| {
        spec.resolve(tokens)
            .map(str::to_string)
            .unwrap_or_else(|| format!("{protocol}://{name}.{dns}/"))
    };

    Ok(Settings {
        name: name.to_string(),
        key: key.to_string(),
        blob_endpoint: Some(endpoint(&BLOB_ENDPOINT_SETTING, BLOB_BASE_DNS_NAME)),
        queue_endpoint: Some(endpoint(&QUEUE_ENDPOINT_SETTING, QUEUE_BASE_DNS_NAME)),
        table_endpoint: Some(endpoint(&TABLE_ENDPOINT_SETTING, TABLE_BASE_DNS_NAME)),
        file_endpoint: Some(endpoint(&FILE_ENDPOINT_SETTING, FILE_BASE_DNS_NAME)),
    })
}

fn explicit_from(tokens: &Tokens) -> Result<Settings> {
    let endpoint = |spec: &SettingSpec| spec.resolve(tokens).map(str::to_string);

    Ok(Settings {
        name: required(tokens, &ACCOUNT_NAME_SETTING)?.to_string(),
        key: required(tokens, &ACCOUNT_KEY_SETTING)?.to_string(),
        blob_endpoint: endpoint(&BLOB_ENDPOINT_SETTING),
        queue_endpoint: endpoint(&QUEUE_ENDPOINT_SETTING),
        table_endpoint: endpoint(&TABLE_ENDPOINT_SETTING),
        file_endpoint: endpoint(&FILE_ENDPOINT_SETTING),
    })
}

fn required<'a>(tokens: &'a Tokens, spec: &SettingSpec) -> Result<&'a str> {
    spec.resolve(tokens).ok_or_else(|| {
        Error::unexpected(format!("matched settings lack required '{}'", spec.name()))
    })
}
