use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use axum::http::HeaderName;
use dataroom_core::AppError;
use dataroom_domain::UnknownCapabilityPolicy;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Debug, Clone)]
pub struct OcsRuntimeConfig {
    pub base_url: Url,
    pub username: String,
    pub app_password: String,
    pub timeout_seconds: u64,
    pub page_size: u32,
}

#[derive(Debug, Clone)]
pub enum DirectoryProviderConfig {
    Ocs(OcsRuntimeConfig),
    Memory { seed_path: Option<PathBuf> },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_host: String,
    pub api_port: u16,
    pub frontend_url: String,
    pub actor_header: HeaderName,
    pub directory_provider: DirectoryProviderConfig,
    pub menu_definition_path: Option<PathBuf>,
    pub unknown_capability_policy: UnknownCapabilityPolicy,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let optional = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };
        let required = |name: &str| {
            optional(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))
        };

        let api_host = optional("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = optional("API_PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);
        let frontend_url =
            optional("FRONTEND_URL").unwrap_or_else(|| "http://localhost:3000".to_owned());

        let actor_header = optional("ACTOR_HEADER").unwrap_or_else(|| "x-remote-user".to_owned());
        let actor_header = HeaderName::from_bytes(actor_header.to_ascii_lowercase().as_bytes())
            .map_err(|error| {
                AppError::Validation(format!("invalid ACTOR_HEADER '{actor_header}': {error}"))
            })?;

        let directory_provider = match optional("DIRECTORY_PROVIDER")
            .unwrap_or_else(|| "ocs".to_owned())
            .as_str()
        {
            "ocs" => {
                let base_url = required("OCS_BASE_URL")?;
                let base_url = Url::parse(base_url.as_str()).map_err(|error| {
                    AppError::Validation(format!("invalid OCS_BASE_URL '{base_url}': {error}"))
                })?;
                if !matches!(base_url.scheme(), "http" | "https") {
                    return Err(AppError::Validation(
                        "OCS_BASE_URL must use http or https".to_owned(),
                    ));
                }

                let timeout_seconds = match optional("OCS_TIMEOUT_SECONDS") {
                    Some(value) => value.parse::<u64>().map_err(|error| {
                        AppError::Validation(format!("invalid OCS_TIMEOUT_SECONDS: {error}"))
                    })?,
                    None => 10,
                };

                DirectoryProviderConfig::Ocs(OcsRuntimeConfig {
                    base_url,
                    username: required("OCS_USERNAME")?,
                    app_password: required("OCS_APP_PASSWORD")?,
                    timeout_seconds: timeout_seconds.max(1),
                    page_size: 100,
                })
            }
            "memory" => DirectoryProviderConfig::Memory {
                seed_path: optional("DIRECTORY_SEED_PATH").map(PathBuf::from),
            },
            other => {
                return Err(AppError::Validation(format!(
                    "DIRECTORY_PROVIDER must be either 'ocs' or 'memory', got '{other}'"
                )));
            }
        };

        let unknown_capability_policy = optional("UNKNOWN_CAPABILITY_POLICY")
            .map(|value| UnknownCapabilityPolicy::from_str(value.as_str()))
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            api_host,
            api_port,
            frontend_url,
            actor_header,
            directory_provider,
            menu_definition_path: optional("MENU_DEFINITION_PATH").map(PathBuf::from),
            unknown_capability_policy,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
