//! Time window a proof must have been created in.

use serde::{Deserialize, Serialize};

use crate::errors::PolicyViolation;

/// Accepted range of `created_at` values, both ends inclusive. Missing ends are unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProofPolicy {
    /// Earliest accepted creation time.
    pub since: Option<u32>,

    /// Latest accepted creation time.
    pub until: Option<u32>,
}

impl ProofPolicy {
    /// A policy accepting every creation time.
    pub const fn any() -> Self {
        Self {
            since: None,
            until: None,
        }
    }

    /// Sets the window start.
    pub const fn since(mut self, since: u32) -> Self {
        self.since = Some(since);
        self
    }

    /// Sets the window end.
    pub const fn until(mut self, until: u32) -> Self {
        self.until = Some(until);
        self
    }

    /// Checks `created_at` against the window, start first.
    pub const fn check(&self, created_at: u32) -> Result<(), PolicyViolation> {
        if let Some(since) = self.since {
            if created_at < since {
                return Err(PolicyViolation::TooEarly { created_at, since });
            }
        }

        if let Some(until) = self.until {
            if created_at > until {
                return Err(PolicyViolation::TooLate { created_at, until });
            }
        }

        Ok(())
    }
}
