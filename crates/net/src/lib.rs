#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Source archive acquisition for nutforge
//!
//! Fetches the recipe's source archive over `https`, `http`, or `file`,
//! hashing while writing, and gates everything downstream on a checksum
//! match. There is no caching, no resume, and no retry: a failed or
//! mismatched fetch aborts the install.

mod client;
mod download;

pub use client::NetClient;
pub use download::fetch_source;
