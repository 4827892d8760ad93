//! Handling of NaN/inf gradients

use serde::{Deserialize, Serialize};

/// What the update step does when a gradient holds NaN or infinity
///
/// `Ignore` applies the update unchanged and lets non-finite values flow
/// into the parameters. `Warn` does the same but logs a warning. `Abort`
/// rejects the step before any parameter or velocity is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NonFinitePolicy {
    /// Propagate silently
    #[default]
    Ignore,
    /// Propagate and log a warning
    Warn,
    /// Fail the step with `Error::NumericInstability`
    Abort,
}

impl NonFinitePolicy {
    /// Whether gradients need to be scanned at all
    pub fn checks(self) -> bool {
        self != Self::Ignore
    }
}
