#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Install staging and post-install bootstrap for nutforge
//!
//! Staging copies the build artifact and bundled resources into the
//! versioned install prefix; any I/O failure there is fatal and the partial
//! prefix is left for the operator. The bootstrapper materializes the
//! per-user configuration tree and seeds default themes exactly once; all of
//! its failures degrade to warnings because the installed binary works
//! without themes.

mod bootstrap;
mod staging;

pub use bootstrap::{bootstrap_user_config, BootstrapSummary};
pub use staging::{stage_install, StagedInstall};
