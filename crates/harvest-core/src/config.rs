//! Environment-driven configuration validation
//!
//! Loads a typed configuration from environment variables, validating every
//! field and reporting all issues together in one
//! [`Error::Configuration`](crate::Error::Configuration). Configuration
//! failures are fatal at startup: nothing is partially constructed.
//!
//! The variable lookup is injected rather than read from a process-wide
//! global, so tests never have to mutate the real environment.

use std::fmt;
use std::str::FromStr;

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::error::{Error, FieldIssue, Result};

/// Deployment environment of the running service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
    Test,
    Staging,
}

impl Environment {
    pub const fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
            Environment::Staging => "staging",
        }
    }

    /// Production routes exports to upload targets; everything else writes
    /// local files
    pub const fn is_production(self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "development" => Ok(Environment::Development),
            "production" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            "staging" => Ok(Environment::Staging),
            other => Err(format!(
                "unknown environment '{other}' (expected development, production, test, or staging)"
            )),
        }
    }
}

/// Deployment scope tag used to build storage paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceLocation {
    Global,
    Site,
}

impl ServiceLocation {
    pub const fn as_str(self) -> &'static str {
        match self {
            ServiceLocation::Global => "global",
            ServiceLocation::Site => "site",
        }
    }
}

impl fmt::Display for ServiceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceLocation {
    type Err = String;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "global" => Ok(ServiceLocation::Global),
            "site" => Ok(ServiceLocation::Site),
            other => Err(format!(
                "unknown service location '{other}' (expected site or global)"
            )),
        }
    }
}

/// Upstream API endpoint settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub protocol: String,
    pub port: Option<u16>,
}

impl ApiConfig {
    /// Base URL assembled from protocol, host, and optional port
    pub fn base_url(&self) -> String {
        match self.port {
            Some(port) => format!("{}://{}:{port}", self.protocol, self.host),
            None => format!("{}://{}", self.protocol, self.host),
        }
    }
}

/// Validated service configuration loaded from the environment.
///
/// | Variable | Meaning | Default |
/// |----------|---------|---------|
/// | `LOG_LEVEL` | log level filter | `info` |
/// | `ENVIRONMENT` | development / production / test / staging | `development` |
/// | `SERVICE_NAME` | name of the collector service | required |
/// | `SERVICE_LOCATION` | `site` or `global` | `global` |
/// | `SITE_NAME` | site identifier | required when location is `site` |
/// | `CLOUD_PROVIDERS` | comma-separated provider list | required in production |
/// | `API_HOST` | upstream API host | required |
/// | `API_PROTOCOL` | `http` or `https` | `https` |
/// | `API_PORT` | upstream API port | none |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestConfig {
    pub log_level: LevelFilter,
    pub environment: Environment,
    pub service_name: String,
    pub service_location: ServiceLocation,
    pub site_name: Option<String>,
    pub cloud_providers: Vec<String>,
    pub api: ApiConfig,
}

impl HarvestConfig {
    /// Load and validate configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load and validate configuration through an injected variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut issues: Vec<FieldIssue> = Vec::new();

        let log_level = match lookup("LOG_LEVEL") {
            None => LevelFilter::Info,
            Some(raw) => LevelFilter::from_str(&raw).unwrap_or_else(|_| {
                issues.push(FieldIssue::new(
                    "LOG_LEVEL",
                    format!("unknown log level '{raw}'"),
                ));
                LevelFilter::Info
            }),
        };

        let environment = match lookup("ENVIRONMENT") {
            None => Environment::Development,
            Some(raw) => raw.parse().unwrap_or_else(|message: String| {
                issues.push(FieldIssue::new("ENVIRONMENT", message));
                Environment::Development
            }),
        };

        let service_name = match lookup("SERVICE_NAME") {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            Some(_) => {
                issues.push(FieldIssue::new("SERVICE_NAME", "must not be empty"));
                String::new()
            }
            None => {
                issues.push(FieldIssue::new("SERVICE_NAME", "is required"));
                String::new()
            }
        };

        let service_location = match lookup("SERVICE_LOCATION") {
            None => ServiceLocation::Global,
            Some(raw) => raw.parse().unwrap_or_else(|message: String| {
                issues.push(FieldIssue::new("SERVICE_LOCATION", message));
                ServiceLocation::Global
            }),
        };

        let site_name = lookup("SITE_NAME").filter(|name| !name.trim().is_empty());
        if service_location == ServiceLocation::Site && site_name.is_none() {
            issues.push(FieldIssue::new(
                "SITE_NAME",
                "required when SERVICE_LOCATION is 'site'",
            ));
        }

        let cloud_providers: Vec<String> = lookup("CLOUD_PROVIDERS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|entry| !entry.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        if environment.is_production() && cloud_providers.is_empty() {
            issues.push(FieldIssue::new(
                "CLOUD_PROVIDERS",
                "at least one provider is required in production",
            ));
        }

        let host = match lookup("API_HOST") {
            Some(host) if !host.trim().is_empty() => host.trim().to_string(),
            _ => {
                issues.push(FieldIssue::new("API_HOST", "is required"));
                String::new()
            }
        };

        let protocol = match lookup("API_PROTOCOL") {
            None => "https".to_string(),
            Some(raw) => {
                let lowered = raw.to_ascii_lowercase();
                if lowered == "http" || lowered == "https" {
                    lowered
                } else {
                    issues.push(FieldIssue::new(
                        "API_PROTOCOL",
                        format!("unknown protocol '{raw}' (expected http or https)"),
                    ));
                    "https".to_string()
                }
            }
        };

        let port = match lookup("API_PORT") {
            None => None,
            Some(raw) => match raw.parse::<u16>() {
                Ok(port) => Some(port),
                Err(_) => {
                    issues.push(FieldIssue::new(
                        "API_PORT",
                        format!("'{raw}' is not a valid port"),
                    ));
                    None
                }
            },
        };

        if !issues.is_empty() {
            return Err(Error::Configuration { issues });
        }

        Ok(Self {
            log_level,
            environment,
            service_name,
            service_location,
            site_name,
            cloud_providers,
            api: ApiConfig {
                host,
                protocol,
                port,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        move |name: &str| map.get(name).map(|value| value.to_string())
    }

    #[test]
    fn minimal_valid_configuration() {
        let config = HarvestConfig::from_lookup(lookup_from(&[
            ("SERVICE_NAME", "appliance"),
            ("API_HOST", "api.example.test"),
        ]))
        .unwrap();

        assert_eq!(config.service_name, "appliance");
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.service_location, ServiceLocation::Global);
        assert_eq!(config.log_level, LevelFilter::Info);
        assert_eq!(config.api.base_url(), "https://api.example.test");
    }

    #[test]
    fn full_configuration_parses() {
        let config = HarvestConfig::from_lookup(lookup_from(&[
            ("LOG_LEVEL", "debug"),
            ("ENVIRONMENT", "production"),
            ("SERVICE_NAME", "appliance"),
            ("SERVICE_LOCATION", "site"),
            ("SITE_NAME", "fra-01"),
            ("CLOUD_PROVIDERS", "aws, gcp"),
            ("API_HOST", "api.example.test"),
            ("API_PROTOCOL", "http"),
            ("API_PORT", "8080"),
        ]))
        .unwrap();

        assert!(config.environment.is_production());
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(config.site_name.as_deref(), Some("fra-01"));
        assert_eq!(config.cloud_providers, vec!["aws", "gcp"]);
        assert_eq!(config.api.base_url(), "http://api.example.test:8080");
    }

    #[test]
    fn every_issue_is_reported_at_once() {
        let err = HarvestConfig::from_lookup(lookup_from(&[
            ("ENVIRONMENT", "prod"),
            ("API_PORT", "eighty"),
        ]))
        .unwrap_err();

        match err {
            Error::Configuration { issues } => {
                let fields: Vec<&str> =
                    issues.iter().map(|issue| issue.field.as_str()).collect();
                assert!(fields.contains(&"ENVIRONMENT"));
                assert!(fields.contains(&"SERVICE_NAME"));
                assert!(fields.contains(&"API_HOST"));
                assert!(fields.contains(&"API_PORT"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn site_location_requires_a_site_name() {
        let err = HarvestConfig::from_lookup(lookup_from(&[
            ("SERVICE_NAME", "appliance"),
            ("SERVICE_LOCATION", "site"),
            ("API_HOST", "api.example.test"),
        ]))
        .unwrap_err();

        match err {
            Error::Configuration { issues } => {
                assert!(issues.iter().any(|issue| issue.field == "SITE_NAME"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn production_requires_cloud_providers() {
        let err = HarvestConfig::from_lookup(lookup_from(&[
            ("ENVIRONMENT", "production"),
            ("SERVICE_NAME", "appliance"),
            ("API_HOST", "api.example.test"),
        ]))
        .unwrap_err();

        match err {
            Error::Configuration { issues } => {
                assert!(issues.iter().any(|issue| issue.field == "CLOUD_PROVIDERS"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
