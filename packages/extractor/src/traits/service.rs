//! The service boundary: URL matching, identity and service-level
//! sub-extractors.
//!
//! A service represents one supported platform. It knows which URLs it owns,
//! builds the concrete extractor for a routed URL, and exposes optional
//! service-level operations (credential refresh, segment annotation).

use crate::error::Result;
use crate::segments::SegmentApiSettings;
use crate::traits::extractor::{Extractor, StepInput};
use crate::types::{JobStepResult, ServiceInfo};

/// One registered platform.
pub trait Service: Send + Sync {
    /// Stable identity and display name.
    fn info(&self) -> ServiceInfo;

    /// Routing precedence. Higher wins when two services match the same URL;
    /// ties fall back to registration order. See
    /// [`crate::registry::ServiceRegistry::select`].
    fn priority(&self) -> u8 {
        0
    }

    /// Build the extractor for a URL this service owns, or `None` when the
    /// URL is not recognized.
    fn route(&self, url: &str) -> Option<Box<dyn Extractor>>;

    /// The credential-refresh sub-extractor, for services that need one.
    fn credential_extractor(&self) -> Option<Box<dyn CredentialRefresher>> {
        None
    }

    /// Segment-annotation API settings, for services wired to one.
    fn segment_api(&self) -> Option<SegmentApiSettings> {
        None
    }
}

/// Service-level credential refresh.
///
/// Follows the same step-indexed continuation contract as
/// [`Extractor`] operations.
pub trait CredentialRefresher: Send + Sync {
    fn refresh(&self, input: &StepInput<'_>) -> Result<JobStepResult>;
}
