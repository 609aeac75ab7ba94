//! Ordered request/response middleware
//!
//! Request interceptors may rewrite the outgoing [`reqwest::Request`].
//! Response interceptors observe outcomes; on failure they do not touch the
//! host directly but append [`Effect`]s to an [`EffectLog`], which the client
//! applies once every interceptor has run. The error itself is always handed
//! back to the caller.

pub mod auth;

use crate::client::error::ClientError;
use crate::host::Host;
use reqwest::{Request, Response};
use std::fmt;
use std::rc::Rc;

/// Side effect requested by a response interceptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Delete a key from host storage
    RemoveItem(String),
    /// Navigate the page to a path
    Navigate(String),
}

/// Effects collected while handling one failed response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectLog(Vec<Effect>);

impl EffectLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an effect
    pub fn push(&mut self, effect: Effect) {
        self.0.push(effect);
    }

    /// Recorded effects in order
    pub fn effects(&self) -> &[Effect] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Run every effect against the host, in order
    pub fn apply(&self, host: &dyn Host) {
        for effect in &self.0 {
            match effect {
                Effect::RemoveItem(key) => host.remove_item(key),
                Effect::Navigate(path) => {
                    info!(path = %path, "Navigating after failed request");
                    host.navigate(path);
                }
            }
        }
    }
}

/// Hook run on every outgoing request
pub trait RequestInterceptor {
    /// Inspect or rewrite the request. Returning an error aborts the send.
    fn on_request(&self, request: &mut Request, host: &dyn Host) -> Result<(), ClientError>;
}

/// Hook run on every completed request
pub trait ResponseInterceptor {
    /// Observe a successful response. The response reaches the caller unchanged.
    fn on_response(&self, _response: &Response) {}

    /// Observe a failure and record any effects it should cause
    fn on_error(&self, error: &ClientError, host: &dyn Host, effects: &mut EffectLog);
}

/// Interceptors applied in registration order
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    request: Vec<Rc<dyn RequestInterceptor>>,
    response: Vec<Rc<dyn ResponseInterceptor>>,
}

impl fmt::Debug for MiddlewareChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareChain")
            .field("request", &self.request.len())
            .field("response", &self.response.len())
            .finish()
    }
}

impl MiddlewareChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a request interceptor
    #[must_use]
    pub fn with_request(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
        self.request.push(Rc::new(interceptor));
        self
    }

    /// Append a response interceptor
    #[must_use]
    pub fn with_response(mut self, interceptor: impl ResponseInterceptor + 'static) -> Self {
        self.response.push(Rc::new(interceptor));
        self
    }

    /// Run the request interceptors.
    ///
    /// A request that already failed to build is passed through untouched.
    pub fn prepare(
        &self,
        request: Result<Request, ClientError>,
        host: &dyn Host,
    ) -> Result<Request, ClientError> {
        let mut request = request?;
        for interceptor in &self.request {
            interceptor.on_request(&mut request, host)?;
        }
        Ok(request)
    }

    /// Run the response interceptors on a success
    pub fn observe_response(&self, response: &Response) {
        for interceptor in &self.response {
            interceptor.on_response(response);
        }
    }

    /// Run the response interceptors on a failure and collect their effects
    pub fn observe_error(&self, error: &ClientError, host: &dyn Host) -> EffectLog {
        let mut effects = EffectLog::new();
        for interceptor in &self.response {
            interceptor.on_error(error, host, &mut effects);
        }
        effects
    }
}
