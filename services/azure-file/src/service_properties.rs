//! File service properties as exchanged with `comp=properties`.

use azfile_core::{Error, Result};
use quick_xml::{de, se};
use serde::{Deserialize, Serialize};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// Properties of the file service of an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "StorageServiceProperties")]
pub struct ServiceProperties {
    /// Hourly aggregated request statistics.
    #[serde(
        rename = "HourMetrics",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub hour_metrics: Option<Metrics>,
    /// Per-minute request statistics.
    #[serde(
        rename = "MinuteMetrics",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub minute_metrics: Option<Metrics>,
    /// Cross-origin resource sharing rules.
    #[serde(rename = "Cors", default, skip_serializing_if = "Option::is_none")]
    pub cors: Option<Cors>,
}

/// Storage analytics metrics settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    /// Version of storage analytics.
    #[serde(rename = "Version")]
    pub version: String,
    /// Whether metrics are collected.
    #[serde(rename = "Enabled")]
    pub enabled: bool,
    /// Whether API level statistics are included. Only set when enabled.
    #[serde(
        rename = "IncludeAPIs",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub include_apis: Option<bool>,
    /// How long collected data is kept.
    #[serde(rename = "RetentionPolicy")]
    pub retention_policy: RetentionPolicy,
}

/// Retention of collected metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    /// Whether old data is deleted.
    #[serde(rename = "Enabled")]
    pub enabled: bool,
    /// Days to keep data for. Only set when enabled.
    #[serde(rename = "Days", default, skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
}

/// The CORS rules of the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cors {
    /// Rules, at most five.
    #[serde(rename = "CorsRule", default)]
    pub rules: Vec<CorsRule>,
}

/// A single CORS rule. List values are comma separated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorsRule {
    /// Origins allowed to make requests.
    #[serde(rename = "AllowedOrigins")]
    pub allowed_origins: String,
    /// HTTP methods the origins may use.
    #[serde(rename = "AllowedMethods")]
    pub allowed_methods: String,
    /// Seconds a preflight response may be cached.
    #[serde(rename = "MaxAgeInSeconds")]
    pub max_age_in_seconds: u32,
    /// Response headers exposed to the origin.
    #[serde(rename = "ExposedHeaders", default)]
    pub exposed_headers: String,
    /// Request headers the origin may send.
    #[serde(rename = "AllowedHeaders", default)]
    pub allowed_headers: String,
}

impl ServiceProperties {
    /// Parse a `StorageServiceProperties` document.
    pub fn from_xml(s: &str) -> Result<Self> {
        de::from_str(s).map_err(|e| {
            Error::unexpected("failed to parse service properties").with_source(e)
        })
    }

    /// Render as a `StorageServiceProperties` document.
    pub fn to_xml(&self) -> Result<String> {
        let body = se::to_string(self).map_err(|e| {
            Error::unexpected("failed to serialize service properties").with_source(e)
        })?;
        Ok(format!("{XML_DECLARATION}{body}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PROPERTIES: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<StorageServiceProperties>
    <HourMetrics>
        <Version>1.0</Version>
        <Enabled>true</Enabled>
        <IncludeAPIs>false</IncludeAPIs>
        <RetentionPolicy>
            <Enabled>true</Enabled>
            <Days>7</Days>
        </RetentionPolicy>
    </HourMetrics>
    <MinuteMetrics>
        <Version>1.0</Version>
        <Enabled>false</Enabled>
        <RetentionPolicy>
            <Enabled>false</Enabled>
        </RetentionPolicy>
    </MinuteMetrics>
    <Cors>
        <CorsRule>
            <AllowedOrigins>http://www.contoso.com,http://www.fabrikam.com</AllowedOrigins>
            <AllowedMethods>GET,PUT</AllowedMethods>
            <MaxAgeInSeconds>500</MaxAgeInSeconds>
            <ExposedHeaders>x-ms-meta-data*</ExposedHeaders>
            <AllowedHeaders>x-ms-meta-target*</AllowedHeaders>
        </CorsRule>
    </Cors>
</StorageServiceProperties>"#;

    fn expected() -> ServiceProperties {
        ServiceProperties {
            hour_metrics: Some(Metrics {
                version: "1.0".to_string(),
                enabled: true,
                include_apis: Some(false),
                retention_policy: RetentionPolicy {
                    enabled: true,
                    days: Some(7),
                },
            }),
            minute_metrics: Some(Metrics {
                version: "1.0".to_string(),
                enabled: false,
                include_apis: None,
                retention_policy: RetentionPolicy {
                    enabled: false,
                    days: None,
                },
            }),
            cors: Some(Cors {
                rules: vec![CorsRule {
                    allowed_origins: "http://www.contoso.com,http://www.fabrikam.com".to_string(),
                    allowed_methods: "GET,PUT".to_string(),
                    max_age_in_seconds: 500,
                    exposed_headers: "x-ms-meta-data*".to_string(),
                    allowed_headers: "x-ms-meta-target*".to_string(),
                }],
            }),
        }
    }

    #[test]
    fn test_from_xml() {
        assert_eq!(ServiceProperties::from_xml(PROPERTIES).unwrap(), expected());
    }

    #[test]
    fn test_to_xml() {
        let xml = expected().to_xml().unwrap();

        assert!(xml.starts_with(XML_DECLARATION));
        assert!(xml.contains("<StorageServiceProperties>"));
        assert!(xml.contains("<Days>7</Days>"));
        assert!(!xml.contains("<IncludeAPIs>true"));
        assert_eq!(ServiceProperties::from_xml(&xml).unwrap(), expected());
    }

    #[test]
    fn test_from_xml_invalid() {
        let xml = "<StorageServiceProperties><HourMetrics><Enabled>maybe</Enabled></HourMetrics></StorageServiceProperties>";
        assert!(ServiceProperties::from_xml(xml).is_err());
    }
}
