//! HTTP access layer.
//!
//! Two entry points: [`HttpAccess::public_fetch`] for unauthenticated calls
//! and [`HttpAccess::auth_fetch`], which attaches the session's bearer
//! token first. Both turn non-2xx responses into [`ClientError::Http`].
//! A failed attempt is returned as-is; nothing is retried.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::error::{AuthError, ClientError, ClientResult};
use crate::session::SessionProvider;

/// Shared HTTP client. Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone, Default)]
pub struct HttpAccess {
    client: reqwest::Client,
}

impl HttpAccess {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Client that sends `headers` on every request.
    pub fn with_default_headers(headers: HeaderMap) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;
        Ok(Self { client })
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.client.get(url)
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.client.post(url)
    }

    pub fn delete(&self, url: &str) -> RequestBuilder {
        self.client.delete(url)
    }

    /// Send the request and accept only a 2xx response.
    pub async fn public_fetch(&self, request: RequestBuilder) -> ClientResult<Response> {
        let response = request.send().await?;
        ensure_success(response).await
    }

    /// Attach `Authorization: Bearer <token>` from `session`, then
    /// [`public_fetch`](Self::public_fetch).
    pub async fn auth_fetch(
        &self,
        request: RequestBuilder,
        session: &dyn SessionProvider,
    ) -> ClientResult<Response> {
        let token = session.access_token().await?;
        let mut bearer = HeaderValue::try_from(format!("Bearer {token}"))
            .map_err(|e| AuthError::MalformedToken(e.to_string()))?;
        bearer.set_sensitive(true);
        self.public_fetch(request.header(AUTHORIZATION, bearer)).await
    }

    /// [`public_fetch`](Self::public_fetch) and decode the JSON body.
    pub async fn fetch_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        Ok(self.public_fetch(request).await?.json::<T>().await?)
    }
}

/// Return the response unchanged on 2xx, otherwise an [`ClientError::Http`]
/// carrying the status and body text.
async fn ensure_success(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        tracing::debug!(status = status.as_u16(), "Non-success response");
        return Err(ClientError::Http {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}
