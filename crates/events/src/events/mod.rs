//! Domain-driven event types
//!
//! Events are grouped by pipeline phase; `AppEvent` is the envelope carried
//! over the channel.

mod acquisition;
mod bootstrap;
mod build;
mod general;
mod install;
mod resolver;
mod verify;

pub use acquisition::AcquisitionEvent;
pub use bootstrap::BootstrapEvent;
pub use build::BuildEvent;
pub use general::GeneralEvent;
pub use install::InstallEvent;
pub use resolver::ResolverEvent;
pub use verify::VerifyEvent;

use serde::{Deserialize, Serialize};

/// Top-level event envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event")]
pub enum AppEvent {
    General(GeneralEvent),
    Acquisition(AcquisitionEvent),
    Resolver(ResolverEvent),
    Build(BuildEvent),
    Install(InstallEvent),
    Bootstrap(BootstrapEvent),
    Verify(VerifyEvent),
}

impl AppEvent {
    /// Route this event into the tracing subscriber at a sensible level
    pub fn trace(&self) {
        match self {
            Self::General(GeneralEvent::Warning { message, .. }) => {
                tracing::warn!("{message}");
            }
            Self::General(GeneralEvent::Error { message, .. }) => {
                tracing::error!("{message}");
            }
            Self::General(GeneralEvent::DebugLog { message }) => {
                tracing::debug!("{message}");
            }
            other => tracing::debug!(?other, "event"),
        }
    }
}

impl From<GeneralEvent> for AppEvent {
    fn from(event: GeneralEvent) -> Self {
        Self::General(event)
    }
}

impl From<AcquisitionEvent> for AppEvent {
    fn from(event: AcquisitionEvent) -> Self {
        Self::Acquisition(event)
    }
}

impl From<ResolverEvent> for AppEvent {
    fn from(event: ResolverEvent) -> Self {
        Self::Resolver(event)
    }
}

impl From<BuildEvent> for AppEvent {
    fn from(event: BuildEvent) -> Self {
        Self::Build(event)
    }
}

impl From<InstallEvent> for AppEvent {
    fn from(event: InstallEvent) -> Self {
        Self::Install(event)
    }
}

impl From<BootstrapEvent> for AppEvent {
    fn from(event: BootstrapEvent) -> Self {
        Self::Bootstrap(event)
    }
}

impl From<VerifyEvent> for AppEvent {
    fn from(event: VerifyEvent) -> Self {
        Self::Verify(event)
    }
}
