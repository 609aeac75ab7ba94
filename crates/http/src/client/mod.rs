//! Portal API client

pub mod account;
pub mod auth;
pub mod error;
pub mod reset;

use crate::config::ClientConfig;
use crate::host::Host;
use crate::middleware::MiddlewareChain;
use crate::middleware::auth::{BearerAuth, SessionExpiry};
use error::ClientError;
use reqwest::{Client, ClientBuilder, RequestBuilder, Response};
use std::rc::Rc;

/// Portal API client
///
/// Every request passes through the middleware chain before it is sent.
/// Failures run the response interceptors, their effects are applied to the
/// host, and the error is handed back unchanged.
#[derive(Clone)]
pub struct PortalClient {
    client: Client,
    config: Rc<ClientConfig>,
    host: Rc<dyn Host>,
    chain: MiddlewareChain,
}

impl PortalClient {
    /// Create a client with the default session middleware
    pub fn new(config: Rc<ClientConfig>, host: Rc<dyn Host>) -> Result<Self, ClientError> {
        let chain = MiddlewareChain::new()
            .with_request(BearerAuth::new(&config))
            .with_response(SessionExpiry::new(&config));
        Self::with_chain(config, host, chain)
    }

    /// Create a client with a custom middleware chain
    pub fn with_chain(
        config: Rc<ClientConfig>,
        host: Rc<dyn Host>,
        chain: MiddlewareChain,
    ) -> Result<Self, ClientError> {
        let client = ClientBuilder::new()
            .default_headers(config.default_headers().clone())
            .user_agent(config.user_agent())
            .build()?;

        Ok(Self {
            client,
            config,
            host,
            chain,
        })
    }

    /// Shared configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Host the client reads the session from
    pub fn host(&self) -> &dyn Host {
        self.host.as_ref()
    }

    /// Create a request builder for an API route, e.g. `/profile`.
    ///
    /// The configured timeout is attached per request; the fetch backend
    /// turns it into an abort signal.
    pub fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.config.api_url(path))
            .timeout(self.config.timeout())
    }

    /// Send a request through the middleware chain
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let host = self.host.as_ref();
        let request = self
            .chain
            .prepare(request.build().map_err(ClientError::from), host)?;

        debug!(method = %request.method(), url = %request.url(), "Sending request");

        let error = match self.client.execute(request).await {
            Ok(response) if response.status().is_success() => {
                self.chain.observe_response(&response);
                return Ok(response);
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                ClientError::from_response_body(status, &body)
            }
            Err(err) => ClientError::from(err),
        };

        debug!(error = %error, "Request failed");
        self.chain.observe_error(&error, host).apply(host);
        Err(error)
    }

    /// Send a request and decode the JSON response
    pub async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = self.send(request).await?;
        Ok(response.json().await?)
    }
}

impl std::fmt::Debug for PortalClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortalClient")
            .field("config", &self.config)
            .field("chain", &self.chain)
            .finish_non_exhaustive()
    }
}
