//! HTTP plumbing for the LDAP self-service portal
//!
//! [`ClientConfig`] is built once at startup and shared by reference.
//! [`PortalClient`] sends every request through an ordered
//! [`MiddlewareChain`]; the default chain attaches the stored bearer token and
//! clears the session when the server answers 401. Browser state (storage and
//! location) is reached only through the [`Host`] trait so the same code runs
//! against `localStorage` in the page and against [`MemoryHost`] in tests.

#[macro_use]
extern crate tracing;

pub mod client;
pub mod config;
pub mod host;
pub mod middleware;
pub mod types;

pub use client::PortalClient;
pub use client::error::ClientError;
pub use config::{ClientConfig, ClientConfigBuilder, ClientSettings};
pub use host::{Host, MemoryHost};
pub use middleware::{
    Effect, EffectLog, MiddlewareChain, RequestInterceptor, ResponseInterceptor,
    auth::{BearerAuth, SessionExpiry},
};
