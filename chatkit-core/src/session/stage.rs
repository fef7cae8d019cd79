//! Isolated best-effort stages.
//!
//! Each post-connect or post-init step runs through [`run_stage`]. A stage
//! that fails or panics is logged and discarded; later stages still run.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::error::ReconcileError;

/// How a stage ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StageOutcome {
    Completed,
    Failed,
    Panicked,
}

impl StageOutcome {
    pub(crate) fn is_completed(&self) -> bool {
        matches!(self, StageOutcome::Completed)
    }
}

/// Runs `stage`, absorbing its error or panic.
pub(crate) fn run_stage<F>(name: &'static str, stage: F) -> StageOutcome
where
    F: FnOnce() -> Result<(), ReconcileError>,
{
    match panic::catch_unwind(AssertUnwindSafe(stage)) {
        Ok(Ok(())) => {
            debug!(stage = name, "stage completed");
            StageOutcome::Completed
        }
        Ok(Err(e)) => {
            warn!(stage = name, error = %e, "stage failed, continuing");
            StageOutcome::Failed
        }
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            warn!(stage = name, %message, "stage panicked, continuing");
            StageOutcome::Panicked
        }
    }
}
