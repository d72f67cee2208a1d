//! Process-wide client wiring, built once from [`ClientConfig`].

use std::sync::Arc;

use crate::alerts::{AlertWorkflow, AlertsApi};
use crate::availability::Availability;
use crate::config::ClientConfig;
use crate::directory::{DirectoryCache, HttpDirectorySource};
use crate::error::ClientResult;
use crate::http::HttpAccess;
use crate::session::{SessionProvider, TokenSession};

/// Everything a front-end needs, sharing one HTTP connection pool.
pub struct Services {
    pub directory: DirectoryCache,
    pub availability: Availability,
    pub alerts: AlertsApi,
    pub session: Arc<TokenSession>,
}

impl Services {
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let http = HttpAccess::new();

        let source = HttpDirectorySource::new(
            http.clone(),
            config.districts_url.clone(),
            config.centers_directory_url.clone(),
            config.state_id,
        );
        let directory = DirectoryCache::new(Arc::new(source), config.state_id);
        let availability = Availability::from_config(config, http.clone())?;
        let alerts = AlertsApi::new(http, &config.api_base_url);
        let session = Arc::new(TokenSession::new(
            config.access_token.clone(),
            config.identity.clone(),
        ));

        tracing::debug!(
            api = %config.api_base_url,
            state_id = config.state_id,
            signed_in = config.access_token.is_some(),
            "Client services ready"
        );

        Ok(Self {
            directory,
            availability,
            alerts,
            session,
        })
    }

    /// A fresh alerts-page workflow bound to this session.
    pub fn alert_workflow(&self) -> AlertWorkflow {
        let session: Arc<dyn SessionProvider> = self.session.clone();
        AlertWorkflow::new(self.alerts.clone(), session)
    }
}
