//! Page entry point

use crate::bootstrap::{BootstrapError, BootstrapOptions, PageBindings, install_page_bootstrap};
use crate::host::BrowserHost;
use portal_http::{ClientConfig, ClientError, PortalClient};
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),
}

/// A started portal page: the API client plus the page listeners
#[derive(Debug)]
pub struct App {
    client: PortalClient,
    bindings: PageBindings,
}

impl App {
    /// Build the client and install the page listeners.
    ///
    /// An empty base URL is replaced with the page origin so API routes
    /// resolve against the serving host.
    pub fn start(config: ClientConfig, options: BootstrapOptions) -> Result<Self, AppError> {
        let config = match BrowserHost::origin() {
            Some(origin) if config.base_url().is_empty() => config.with_base_url(origin),
            _ => config,
        };

        let client = PortalClient::new(Rc::new(config), Rc::new(BrowserHost::new()))?;
        let bindings = install_page_bootstrap(options)?;

        info!(base_url = client.config().base_url(), "Portal page started");
        Ok(Self { client, bindings })
    }

    pub const fn client(&self) -> &PortalClient {
        &self.client
    }

    /// Detach the page listeners. The client stays usable.
    pub fn teardown(&self) {
        self.bindings.teardown();
    }
}
