//! A small rule matcher deciding whether a set of connection string tokens
//! has the shape of one configuration alternative.
//!
//! Matching happens in two steps. The first only looks at which keys are
//! present: every rule must be satisfied by presence and every token must be
//! claimed by some rule. Only an alternative that passes this step runs its
//! validators, so a malformed value for a key that belongs to another
//! alternative can never fail this one.

use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt::{Debug, Formatter};

use azfile_core::hash::is_base64;
use azfile_core::utils::Redact;
use azfile_core::{Error, Result};
use http::Uri;

/// Tokens parsed out of a connection string, keyed by setting name.
pub type Tokens = HashMap<String, String>;

/// A pure predicate over a raw setting value.
pub type Validator = fn(&str) -> bool;

/// One named setting: how to validate it and what to use when it's absent.
#[derive(Clone, Copy)]
pub struct SettingSpec {
    name: &'static str,
    validator: Validator,
    default: Option<&'static str>,
    secret: bool,
}

impl Debug for SettingSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingSpec")
            .field("name", &self.name)
            .field("default", &self.default)
            .field("secret", &self.secret)
            .finish()
    }
}

impl SettingSpec {
    /// Create a setting validated by `validator`.
    pub const fn new(name: &'static str, validator: Validator) -> Self {
        Self {
            name,
            validator,
            default: None,
            secret: false,
        }
    }

    /// Value used by [`SettingSpec::resolve`] when the key is absent.
    ///
    /// A default never makes a key count as present while matching.
    pub const fn with_default(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    /// Mark the value as secret so it's redacted in errors.
    pub const fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    /// Name of this setting.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Look the setting up (case-insensitively) in `tokens`.
    pub fn lookup<'a>(&self, tokens: &'a Tokens) -> Option<(&'a str, &'a str)> {
        tokens
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(self.name))
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The present value, or the default when the key is absent.
    pub fn resolve<'a>(&self, tokens: &'a Tokens) -> Option<&'a str> {
        self.lookup(tokens).map(|(_, v)| v).or(self.default)
    }

    fn validate(&self, value: &str) -> Result<()> {
        if (self.validator)(value) {
            return Ok(());
        }

        let shown = if self.secret {
            Redact::from(value).to_string()
        } else {
            value.to_string()
        };
        Err(Error::config_invalid(format!(
            "invalid value '{shown}' for setting '{}'",
            self.name
        )))
    }
}

/// A group of settings and how many of them must be present.
#[derive(Debug, Clone)]
pub enum MatchRule {
    /// Every setting must be present.
    AllRequired(Vec<SettingSpec>),
    /// Settings may be absent.
    Optional(Vec<SettingSpec>),
    /// At least one setting of the group must be present.
    AtLeastOne(Vec<SettingSpec>),
}

/// Decide whether `tokens` satisfy every rule in `rules` at once.
///
/// - `Ok(false)`: the present keys don't fit the rules, or some key isn't
///   claimed by any rule. No validator has run.
/// - `Err(_)`: the keys fit, but a present value failed its validator. The
///   error is [`azfile_core::ErrorKind::ConfigInvalid`] and names the setting.
/// - `Ok(true)`: the keys fit and every present value is valid.
pub fn matched_specification(tokens: &Tokens, rules: &[MatchRule]) -> Result<bool> {
    let mut unclaimed: HashSet<&str> = tokens.keys().map(String::as_str).collect();
    let mut claimed: Vec<(&SettingSpec, &str)> = Vec::new();

    for rule in rules {
        match rule {
            MatchRule::AllRequired(specs) => {
                for spec in specs {
                    let Some((key, value)) = spec.lookup(tokens) else {
                        return Ok(false);
                    };
                    unclaimed.remove(key);
                    claimed.push((spec, value));
                }
            }
            MatchRule::Optional(specs) => {
                for spec in specs {
                    if let Some((key, value)) = spec.lookup(tokens) {
                        unclaimed.remove(key);
                        claimed.push((spec, value));
                    }
                }
            }
            MatchRule::AtLeastOne(specs) => {
                let mut found = false;
                for spec in specs {
                    if let Some((key, value)) = spec.lookup(tokens) {
                        unclaimed.remove(key);
                        claimed.push((spec, value));
                        found = true;
                    }
                }
                if !found {
                    return Ok(false);
                }
            }
        }
    }

    if !unclaimed.is_empty() {
        return Ok(false);
    }

    for (spec, value) in claimed {
        spec.validate(value)?;
    }
    Ok(true)
}

/// Accepts any non-empty value.
pub fn is_present(value: &str) -> bool {
    !value.is_empty()
}

/// Accepts `true`, case-insensitively.
pub fn is_true(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

/// Accepts `http` or `https`, case-insensitively.
pub fn is_protocol(value: &str) -> bool {
    value.eq_ignore_ascii_case("http") || value.eq_ignore_ascii_case("https")
}

/// Accepts absolute URIs carrying both a scheme and a host.
pub fn is_uri(value: &str) -> bool {
    value
        .parse::<Uri>()
        .map(|uri| uri.scheme().is_some() && uri.host().is_some_and(|h| !h.is_empty()))
        .unwrap_or(false)
}

/// Accepts strictly valid, non-empty base64.
pub fn is_account_key(value: &str) -> bool {
    is_base64(value)
}
