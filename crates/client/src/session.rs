//! Session provider: the signed-in user's identity and access token.
//!
//! The identity service itself (sign-up, sign-in UI, token issuance) is
//! external. A [`SessionProvider`] is handed explicitly to anything that
//! needs the current bearer token.

use async_trait::async_trait;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::config::IdentityConfig;
use crate::error::AuthError;

/// User attributes read from the access-token claims.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub iss: Option<String>,
    /// Expiration time (UTC Unix timestamp).
    #[serde(default)]
    pub exp: Option<i64>,
}

impl UserInfo {
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp.is_some_and(|exp| exp <= now)
    }
}

/// Current sign-in state as seen by the rest of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInState {
    SignedOut,
    SignedIn(UserInfo),
    Expired(UserInfo),
}

/// Broker for the signed-in user's session token.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Resolve the current access token, failing when there is no usable session.
    async fn access_token(&self) -> Result<String, AuthError>;

    /// Current sign-in state.
    async fn sign_in_state(&self) -> SignInState;
}

/// Decode access-token claims without verifying the signature.
///
/// Tokens come straight from the identity service and are verified by the
/// backend; the client only reads the attributes.
pub fn decode_claims(token: &str) -> Result<UserInfo, AuthError> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<UserInfo>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::MalformedToken(e.to_string()))
}

/// Session backed by an access token handed over by the identity service.
pub struct TokenSession {
    token: RwLock<Option<String>>,
    identity: Option<IdentityConfig>,
}

impl TokenSession {
    pub fn new(token: Option<String>, identity: Option<IdentityConfig>) -> Self {
        Self {
            token: RwLock::new(token),
            identity,
        }
    }

    /// A session with nobody signed in.
    pub fn signed_out() -> Self {
        Self::new(None, None)
    }

    pub async fn sign_in(&self, token: String) {
        *self.token.write().await = Some(token);
        tracing::debug!("Session token updated");
    }

    pub async fn sign_out(&self) {
        *self.token.write().await = None;
        tracing::debug!("Session cleared");
    }

    /// Reject tokens issued for another user pool or app client.
    fn check_tenant(&self, claims: &UserInfo) -> Result<(), AuthError> {
        let Some(identity) = &self.identity else {
            return Ok(());
        };
        let issuer = identity.issuer();
        if claims.iss.as_deref() != Some(issuer.as_str()) {
            return Err(AuthError::ForeignIssuer(format!(
                "issuer {:?}",
                claims.iss.as_deref().unwrap_or_default()
            )));
        }
        if let Some(client_id) = &claims.client_id {
            if client_id != &identity.web_client_id {
                return Err(AuthError::ForeignIssuer(format!("client id {client_id:?}")));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl SessionProvider for TokenSession {
    async fn access_token(&self) -> Result<String, AuthError> {
        let token = self.token.read().await.clone().ok_or(AuthError::NoSession)?;
        let claims = decode_claims(&token)?;
        if claims.is_expired_at(chrono::Utc::now().timestamp()) {
            return Err(AuthError::Expired);
        }
        self.check_tenant(&claims)?;
        Ok(token)
    }

    async fn sign_in_state(&self) -> SignInState {
        let Some(token) = self.token.read().await.clone() else {
            return SignInState::SignedOut;
        };
        match decode_claims(&token) {
            Ok(claims) if claims.is_expired_at(chrono::Utc::now().timestamp()) => {
                SignInState::Expired(claims)
            }
            Ok(claims) => SignInState::SignedIn(claims),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable access token");
                SignInState::SignedOut
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
