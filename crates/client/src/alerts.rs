//! Alert registration endpoint and the view/edit workflow built on it.
//!
//! Every call on `{API}/alerts/register` carries the session's bearer token;
//! the backend identifies the alert's owner from it.

use std::sync::Arc;

use covin_core::alert::Alert;
use covin_core::alert_form::{AlertDraft, AlertScreen};

use crate::error::{ClientError, ClientResult};
use crate::http::HttpAccess;
use crate::session::SessionProvider;

// ---------------------------------------------------------------------------
// API
// ---------------------------------------------------------------------------

/// Client for the signed-in user's alert registration.
#[derive(Debug, Clone)]
pub struct AlertsApi {
    http: HttpAccess,
    url: String,
}

impl AlertsApi {
    pub fn new(http: HttpAccess, api_base_url: &str) -> Self {
        Self {
            http,
            url: format!("{api_base_url}/alerts/register"),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// The stored alert, or `None` when the user has not registered one.
    ///
    /// A 404 and an empty or `null` body both mean "no alert".
    pub async fn get_alert(&self, session: &dyn SessionProvider) -> ClientResult<Option<Alert>> {
        let response = match self.http.auth_fetch(self.http.get(&self.url), session).await {
            Ok(response) => response,
            Err(ClientError::Http { status: 404, .. }) => {
                tracing::debug!("No alert registered");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let body = response.text().await?;
        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(None);
        }
        let alert: Alert = serde_json::from_str(trimmed).inspect_err(|e| {
            tracing::error!(error = %e, body = trimmed, "Unreadable alert document");
        })?;
        Ok(Some(alert))
    }

    /// Create or replace the user's alert.
    pub async fn create_alert(
        &self,
        alert: &Alert,
        session: &dyn SessionProvider,
    ) -> ClientResult<()> {
        self.http
            .auth_fetch(self.http.post(&self.url).json(alert), session)
            .await?;
        tracing::info!(district_id = alert.district_id, "Alert registered");
        Ok(())
    }

    pub async fn delete_alert(&self, session: &dyn SessionProvider) -> ClientResult<()> {
        self.http
            .auth_fetch(self.http.delete(&self.url), session)
            .await?;
        tracing::info!("Alert deleted");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// Drives the alerts page: load, edit, submit, delete.
pub struct AlertWorkflow {
    api: AlertsApi,
    session: Arc<dyn SessionProvider>,
    screen: AlertScreen,
}

impl AlertWorkflow {
    /// Start in the empty editing state; call [`load`](Self::load) next.
    pub fn new(api: AlertsApi, session: Arc<dyn SessionProvider>) -> Self {
        Self {
            api,
            session,
            screen: AlertScreen::default(),
        }
    }

    /// Fetch the current alert and pick the initial screen from it.
    pub async fn load(&mut self) -> ClientResult<&AlertScreen> {
        let existing = self.api.get_alert(self.session.as_ref()).await?;
        self.screen = AlertScreen::initial(existing);
        Ok(&self.screen)
    }

    pub fn screen(&self) -> &AlertScreen {
        &self.screen
    }

    /// Open the editor on the shown alert.
    pub fn edit(&mut self) -> &mut AlertScreen {
        self.screen = std::mem::take(&mut self.screen).edit();
        &mut self.screen
    }

    pub fn cancel(&mut self) -> &AlertScreen {
        self.screen = std::mem::take(&mut self.screen).cancel();
        &self.screen
    }

    /// The in-progress draft, if editing.
    pub fn draft_mut(&mut self) -> Option<&mut AlertDraft> {
        self.screen.draft_mut()
    }

    /// Validate the draft and store it.
    ///
    /// An invalid draft is reported with every violation and nothing is
    /// sent; the screen stays in the editor with the draft intact. A failed
    /// request also leaves the screen unchanged.
    pub async fn submit(&mut self) -> ClientResult<Alert> {
        let draft = self.screen.draft().ok_or(ClientError::NotEditing)?;
        let alert = draft.validate()?;

        self.api.create_alert(&alert, self.session.as_ref()).await?;
        self.screen = AlertScreen::submitted(alert.clone());
        Ok(alert)
    }

    /// Delete the stored alert once `confirm` acknowledges it.
    ///
    /// Returns `false` without sending anything when `confirm` declines.
    pub async fn delete<F>(&mut self, confirm: F) -> ClientResult<bool>
    where
        F: FnOnce() -> bool,
    {
        if !confirm() {
            tracing::debug!("Alert deletion not confirmed");
            return Ok(false);
        }
        self.api.delete_alert(self.session.as_ref()).await?;
        self.screen = AlertScreen::deleted();
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use covin_core::alert::Dose;

    use super::*;
    use crate::error::AuthError;
    use crate::session::TokenSession;

    fn workflow() -> AlertWorkflow {
        // Nothing listens here; tests below never reach the network.
        let api = AlertsApi::new(HttpAccess::new(), "http://127.0.0.1:9");
        AlertWorkflow::new(api, Arc::new(TokenSession::signed_out()))
    }

    #[test]
    fn url_targets_register_endpoint() {
        let api = AlertsApi::new(HttpAccess::new(), "https://api.example.com");
        assert_eq!(api.url(), "https://api.example.com/alerts/register");
    }

    #[tokio::test]
    async fn submit_while_viewing_is_rejected() {
        let mut flow = workflow();
        flow.screen = AlertScreen::Viewing(Alert {
            district_id: 296,
            centers: None,
            email: None,
            mobile_no: None,
            age: None,
            dose: Dose::Any,
        });
        assert_matches!(flow.submit().await, Err(ClientError::NotEditing));
    }

    #[tokio::test]
    async fn invalid_draft_is_not_sent() {
        let mut flow = workflow();
        flow.draft_mut().unwrap().age = "17".into();

        let err = flow.submit().await.unwrap_err();
        assert_matches!(err, ClientError::Validation(ref v) if v.has_field("districtId") && v.has_field("age"));
        assert_eq!(flow.screen().draft().unwrap().age, "17");
    }

    #[tokio::test]
    async fn valid_draft_without_session_fails_before_sending() {
        let mut flow = workflow();
        let draft = flow.draft_mut().unwrap();
        draft.district_id = "296".into();
        draft.set_any_centers(true);

        assert_matches!(
            flow.submit().await,
            Err(ClientError::Auth(AuthError::NoSession))
        );
        assert!(flow.screen().is_editing());
    }

    #[tokio::test]
    async fn declined_delete_sends_nothing() {
        let mut flow = workflow();
        let before = flow.screen().clone();
        assert!(!flow.delete(|| false).await.unwrap());
        assert_eq!(*flow.screen(), before);
    }

    #[test]
    fn edit_and_cancel_round_trip() {
        let mut flow = workflow();
        let alert = Alert {
            district_id: 296,
            centers: Some(vec![1, 2]),
            email: None,
            mobile_no: Some("+919123456789".into()),
            age: None,
            dose: Dose::First,
        };
        flow.screen = AlertScreen::Viewing(alert.clone());

        flow.edit();
        assert_eq!(flow.screen().draft().unwrap().mobile_no, "9123456789");
        flow.cancel();
        assert_eq!(*flow.screen(), AlertScreen::Viewing(alert));
    }
}
