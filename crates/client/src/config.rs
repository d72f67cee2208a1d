use covin_core::types::StateId;

/// State whose districts the locator lists (Kerala).
pub const DEFAULT_STATE_ID: StateId = 17;

/// Default public availability aggregator.
pub const DEFAULT_SETU_BASE_URL: &str = "https://cdn-api.co-vin.in/api";

/// Configuration errors detected while reading the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Identity-provider tenant the access tokens are issued by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityConfig {
    pub region: String,
    pub user_pool_id: String,
    pub web_client_id: String,
}

impl IdentityConfig {
    /// Expected `iss` claim of access tokens from this user pool.
    pub fn issuer(&self) -> String {
        format!(
            "https://cognito-idp.{}.amazonaws.com/{}",
            self.region, self.user_pool_id
        )
    }
}

/// Extra headers sent to the primary availability source only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrimaryHeaders {
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub origin: Option<String>,
}

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the alerts / fallback API, without trailing slash.
    pub api_base_url: String,
    /// Base URL of the primary availability aggregator.
    pub setu_base_url: String,
    /// Bulk district directory document.
    pub districts_url: String,
    /// Bulk center directory document.
    pub centers_directory_url: String,
    /// Fixed state the district list is restricted to.
    pub state_id: StateId,
    pub primary_headers: PrimaryHeaders,
    pub identity: Option<IdentityConfig>,
    /// Access token of the signed-in user, if any.
    pub access_token: Option<String>,
}

impl ClientConfig {
    /// Configuration with defaults derived from a single API base URL.
    pub fn new(api_base_url: &str) -> Self {
        let api_base_url = trim_url(api_base_url);
        Self {
            setu_base_url: DEFAULT_SETU_BASE_URL.to_string(),
            districts_url: format!("{api_base_url}/districts"),
            centers_directory_url: format!("{api_base_url}/all_centers.json"),
            api_base_url,
            state_id: DEFAULT_STATE_ID,
            primary_headers: PrimaryHeaders::default(),
            identity: None,
            access_token: None,
        }
    }

    /// Load configuration from the process environment.
    ///
    /// | Env Var                        | Required | Default                              |
    /// |--------------------------------|----------|--------------------------------------|
    /// | `COVIN_API_BASE_URL`           | **yes**  | --                                   |
    /// | `COVIN_SETU_BASE_URL`          | no       | `https://cdn-api.co-vin.in/api`      |
    /// | `COVIN_DISTRICTS_URL`          | no       | `{COVIN_API_BASE_URL}/districts`     |
    /// | `COVIN_CENTERS_DIRECTORY_URL`  | no       | `{COVIN_API_BASE_URL}/all_centers.json` |
    /// | `COVIN_STATE_ID`               | no       | `17`                                 |
    /// | `COVIN_USER_AGENT`             | no       | --                                   |
    /// | `COVIN_REFERER`                | no       | --                                   |
    /// | `COVIN_ORIGIN`                 | no       | --                                   |
    /// | `COVIN_COGNITO_REGION`         | no       | --                                   |
    /// | `COVIN_COGNITO_POOL_ID`        | no       | --                                   |
    /// | `COVIN_COGNITO_WEB_CLIENT_ID`  | no       | --                                   |
    /// | `COVIN_ACCESS_TOKEN`           | no       | --                                   |
    ///
    /// The three `COVIN_COGNITO_*` variables must be set together or not at all.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an injectable variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_base_url = var("COVIN_API_BASE_URL").ok_or(ConfigError::Missing("COVIN_API_BASE_URL"))?;
        let mut config = Self::new(&api_base_url);

        if let Some(url) = var("COVIN_SETU_BASE_URL") {
            config.setu_base_url = trim_url(&url);
        }
        if let Some(url) = var("COVIN_DISTRICTS_URL") {
            config.districts_url = url;
        }
        if let Some(url) = var("COVIN_CENTERS_DIRECTORY_URL") {
            config.centers_directory_url = url;
        }
        if let Some(raw) = var("COVIN_STATE_ID") {
            config.state_id = raw.parse().map_err(|e| ConfigError::Invalid {
                var: "COVIN_STATE_ID",
                reason: format!("{e} ({raw:?})"),
            })?;
        }

        config.primary_headers = PrimaryHeaders {
            user_agent: var("COVIN_USER_AGENT"),
            referer: var("COVIN_REFERER"),
            origin: var("COVIN_ORIGIN"),
        };

        config.identity = match (
            var("COVIN_COGNITO_REGION"),
            var("COVIN_COGNITO_POOL_ID"),
            var("COVIN_COGNITO_WEB_CLIENT_ID"),
        ) {
            (Some(region), Some(user_pool_id), Some(web_client_id)) => Some(IdentityConfig {
                region,
                user_pool_id,
                web_client_id,
            }),
            (None, None, None) => None,
            _ => {
                return Err(ConfigError::Invalid {
                    var: "COVIN_COGNITO_*",
                    reason: "region, pool id and web client id must be set together".into(),
                })
            }
        };

        config.access_token = var("COVIN_ACCESS_TOKEN");

        Ok(config)
    }
}

fn trim_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
