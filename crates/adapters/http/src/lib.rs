//! # nexus-adapter-http
//!
//! HTTP adapter — terminal handler for `http:` and `https:` actions.
//!
//! | Action method | Request |
//! |---------------|---------|
//! | absent or `GET` | `GET <target>` |
//! | anything else | `POST <target>` with `Content-Type: text/plain` and the payload as body |
//!
//! Non-2xx responses are logged and otherwise ignored; transport failures
//! abort the resolution chain.
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `nexus-app` and `nexus-domain`.

mod config;
mod error;

pub use config::HttpConfig;
pub use error::HttpError;

use async_trait::async_trait;
use nexus_app::ports::TerminalHandler;
use nexus_domain::action::Action;
use nexus_domain::error::ResolveError;
use reqwest::header::CONTENT_TYPE;

/// Registry key of this handler.
pub const HANDLER_KIND: &str = "http";

/// Performs one HTTP request per action.
#[derive(Debug, Clone)]
pub struct HttpHandler {
    client: reqwest::Client,
}

impl HttpHandler {
    /// Build the shared client.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Client`] when the TLS backend cannot be set up.
    pub fn new(config: &HttpConfig) -> Result<Self, HttpError> {
        let builder = reqwest::Client::builder();
        let builder = match config.timeout() {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        };
        let client = builder.build().map_err(HttpError::Client)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl TerminalHandler for HttpHandler {
    async fn accept(&self, action: &Action) -> Result<(), ResolveError> {
        let scheme = action.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(ResolveError::malformed(
                scheme,
                action.scheme_specific_part(),
                "only http and https targets are supported",
            ));
        }

        let url = action.target.to_string();
        let request = match action.method.as_deref() {
            None | Some("GET") => self.client.get(&url),
            Some(_) => self
                .client
                .post(&url)
                .header(CONTENT_TYPE, "text/plain")
                .body(action.payload.clone().unwrap_or_default()),
        };

        let response = request.send().await.map_err(|source| HttpError::Request {
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(%url, status = status.as_u16(), "http action done");
        } else {
            tracing::warn!(%url, status = status.as_u16(), "http action unsuccessful");
        }
        Ok(())
    }
}
