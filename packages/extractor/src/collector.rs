//! Partial-failure-tolerant batch collection.
//!
//! Feed-like pages regularly contain one malformed or unsupported entry
//! among hundreds of valid ones; aborting the whole page on one bad entry is
//! strictly worse than returning the good entries plus a recorded error.
//! [`ItemCollector`] isolates each item's parse so a single failure never
//! stops the rest of the batch and never fails the containing step.

use crate::error::{codes, ExtractorError, Result};
use crate::types::{ErrorDetail, InfoItem, PagedData};

/// Failed commits tolerated per batch before the collector gives up.
pub const DEFAULT_MAX_FAILED_COMMITS: u32 = 20;

/// Accumulator used while parsing a list of raw entries into domain items.
///
/// Successful parses land in `items` in input order; failures land in
/// `errors` as non-fatal [`ErrorDetail`]s. Exceeding the failure ceiling
/// turns into [`ExtractorError::TooManyFailedCommits`], which surfaces as a
/// call-level parse-exhaustion failure.
#[derive(Debug)]
pub struct ItemCollector {
    items: Vec<InfoItem>,
    errors: Vec<ErrorDetail>,
    attempted: u32,
    max_failed: u32,
}

impl Default for ItemCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemCollector {
    /// A collector with the default failure ceiling.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            errors: Vec::new(),
            attempted: 0,
            max_failed: DEFAULT_MAX_FAILED_COMMITS,
        }
    }

    /// Override the failure ceiling.
    pub fn with_max_failed_commits(mut self, max_failed: u32) -> Self {
        self.max_failed = max_failed;
        self
    }

    /// Parse one raw entry.
    ///
    /// A parse failure is recorded and `Ok(())` is still returned; only
    /// blowing the failure ceiling produces an `Err`.
    pub fn commit<F>(&mut self, parse: F) -> Result<()>
    where
        F: FnOnce() -> Result<InfoItem>,
    {
        self.attempted += 1;
        match parse() {
            Ok(item) => self.items.push(item),
            Err(err) => {
                tracing::warn!(error = %err, "item parse failed, continuing batch");
                self.errors
                    .push(ErrorDetail::from_error(codes::ITEM_PARSE_FAILED, &err));
                let failed = self.errors.len() as u32;
                if failed > self.max_failed {
                    return Err(ExtractorError::TooManyFailedCommits {
                        failed,
                        attempted: self.attempted,
                    });
                }
            }
        }
        Ok(())
    }

    /// Items parsed so far, in input order.
    pub fn items(&self) -> &[InfoItem] {
        &self.items
    }

    /// Per-item errors recorded so far.
    pub fn errors(&self) -> &[ErrorDetail] {
        &self.errors
    }

    /// Whether no item parsed successfully yet.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consume the collector into (items, errors).
    pub fn into_parts(self) -> (Vec<InfoItem>, Vec<ErrorDetail>) {
        (self.items, self.errors)
    }

    /// Consume the collector into paged data plus the recorded errors.
    pub fn into_paged(self, next_page: Option<String>) -> (PagedData, Vec<ErrorDetail>) {
        (PagedData::new(self.items, next_page), self.errors)
    }
}
