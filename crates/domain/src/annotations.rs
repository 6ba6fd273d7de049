//! Side-channel metadata returned next to sync and provisioning results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether the upstream API reported that the caller is being throttled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateLimitStatus {
    /// Requests are within the allowance.
    Ok,
    /// The allowance is exhausted until `reset_at`.
    Overlimit,
}

/// Rate-limit state extracted from upstream response headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitDescription {
    /// Throttling status.
    pub status: RateLimitStatus,
    /// Requests allowed per window, if reported.
    pub limit: Option<u64>,
    /// Requests left in the current window, if reported.
    pub remaining: Option<u64>,
    /// When the window resets, if reported.
    pub reset_at: Option<DateTime<Utc>>,
}

/// A single side-channel annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Annotation {
    /// Rate-limit information from the upstream response.
    RateLimit(RateLimitDescription),
}

/// Ordered collection of annotations. Callers may ignore it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Annotations(Vec<Annotation>);

impl Annotations {
    /// Creates an empty annotation set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one annotation.
    pub fn push(&mut self, annotation: Annotation) {
        self.0.push(annotation);
    }

    /// Appends every annotation of `other`.
    pub fn merge(&mut self, other: Annotations) {
        self.0.extend(other.0);
    }

    /// Returns true when no annotation was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the recorded annotations.
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.0.iter()
    }

    /// Returns the most recent rate-limit description, if any.
    #[must_use]
    pub fn rate_limit(&self) -> Option<&RateLimitDescription> {
        self.0.iter().rev().find_map(|annotation| match annotation {
            Annotation::RateLimit(description) => Some(description),
        })
    }
}

impl From<RateLimitDescription> for Annotations {
    fn from(value: RateLimitDescription) -> Self {
        Self(vec![Annotation::RateLimit(value)])
    }
}
