//! Operations context for dependency injection

use nutforge_config::Config;
use nutforge_errors::Error;
use nutforge_events::EventSender;
use nutforge_net::NetClient;
use nutforge_resolver::Resolver;

/// Operations context providing access to all system components
///
/// Paths (cellar, work directory, user root, search roots) all come from
/// the injected configuration, never from ad-hoc environment reads, so an
/// entire install can be pointed at temporary directories.
pub struct OpsCtx {
    /// Network client
    pub net: NetClient,
    /// Dependency resolver
    pub resolver: Resolver,
    /// Event sender for progress reporting
    pub tx: EventSender,
    /// System configuration
    pub config: Config,
}

/// Builder for [`OpsCtx`]
#[derive(Default)]
pub struct OpsContextBuilder {
    net: Option<NetClient>,
    resolver: Option<Resolver>,
    tx: Option<EventSender>,
    config: Option<Config>,
}

impl OpsContextBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the network client
    #[must_use]
    pub fn with_net(mut self, net: NetClient) -> Self {
        self.net = Some(net);
        self
    }

    /// Set the dependency resolver
    #[must_use]
    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Set the event sender
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Set the configuration
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the context
    ///
    /// # Errors
    ///
    /// Returns an error if a required component is missing.
    pub fn build(self) -> Result<OpsCtx, Error> {
        let net = self
            .net
            .ok_or_else(|| Error::internal("OpsCtx requires a network client"))?;
        let resolver = self
            .resolver
            .ok_or_else(|| Error::internal("OpsCtx requires a resolver"))?;
        let tx = self
            .tx
            .ok_or_else(|| Error::internal("OpsCtx requires an event sender"))?;
        let config = self
            .config
            .ok_or_else(|| Error::internal("OpsCtx requires a configuration"))?;

        Ok(OpsCtx {
            net,
            resolver,
            tx,
            config,
        })
    }
}
