//! The service registry: the only shared resource in the system.
//!
//! Populated once at startup and never mutated afterwards, so arbitrarily
//! many concurrent job invocations may read it without coordination.

use std::sync::Arc;

use crate::error::{ExtractorError, Result};
use crate::traits::{Extractor, Service};
use crate::types::ServiceInfo;

/// Ordered table of registered services.
#[derive(Default)]
pub struct ServiceRegistry {
    services: Vec<Arc<dyn Service>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a service. Registration order is the tie-break for routing
    /// precedence, so register the most specific services first.
    pub fn register(&mut self, service: Arc<dyn Service>) -> &mut Self {
        self.services.push(service);
        self
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_service(mut self, service: Arc<dyn Service>) -> Self {
        self.services.push(service);
        self
    }

    /// The service whose matcher wins for a URL, together with the extractor
    /// it routed.
    ///
    /// Precedence is explicit: among the services whose matcher accepts the
    /// URL, the highest [`Service::priority`] wins; equal priorities fall
    /// back to registration order.
    fn matching(&self, url: &str) -> Option<(&Arc<dyn Service>, Box<dyn Extractor>)> {
        let mut best: Option<(u8, (&Arc<dyn Service>, Box<dyn Extractor>))> = None;
        for service in &self.services {
            if let Some(extractor) = service.route(url) {
                let priority = service.priority();
                match &best {
                    // Strictly-greater keeps the earlier registration on ties.
                    Some((current, _)) if priority <= *current => {}
                    _ => best = Some((priority, (service, extractor))),
                }
            }
        }
        best.map(|(_, matched)| matched)
    }

    /// Select the extractor for a URL.
    ///
    /// See [`matching`](Self::matching) for the precedence rule. No match is
    /// a caller error.
    pub fn select(&self, url: &str) -> Result<Box<dyn Extractor>> {
        self.matching(url)
            .map(|(_, extractor)| extractor)
            .ok_or_else(|| ExtractorError::UnsupportedUrl {
                url: url.to_string(),
            })
    }

    /// The service that owns a URL, under the same precedence rule as
    /// [`select`](Self::select), or `None` when no service claims it.
    pub fn owner_of(&self, url: &str) -> Option<Arc<dyn Service>> {
        self.matching(url).map(|(service, _)| Arc::clone(service))
    }

    /// Resolve a service by its stable identifier.
    pub fn select_by_id(&self, id: &str) -> Result<Arc<dyn Service>> {
        self.services
            .iter()
            .find(|service| service.info().id == id)
            .cloned()
            .ok_or_else(|| ExtractorError::UnknownService { id: id.to_string() })
    }

    /// Info descriptors of every registered service, in registration order.
    pub fn service_infos(&self) -> Vec<ServiceInfo> {
        self.services.iter().map(|s| s.info()).collect()
    }

    /// Number of registered services.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether no service is registered.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
