//! Core trait abstractions of the protocol.
//!
//! These are the seams concrete services implement: the per-resource
//! extractor state machine and the service registry entry.

pub mod extractor;
pub mod service;

pub use extractor::{Extractor, StepInput};
pub use service::{CredentialRefresher, Service};
