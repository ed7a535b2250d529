//! Headless replay of scripted drops.
//!
//! A rejected drop is recorded and the replay moves on; the session has
//! already rolled itself back, so later drops see a consistent grid.

use serde::Serialize;
use tracing::warn;

use crate::cli::DropSpec;
use crate::core::{EngineError, GameConfig, GameSnapshot, PlacementPlan, Session, SessionSummary};
use crate::types::BlockValue;

/// Why a drop was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepError {
    pub code: &'static str,
    pub message: String,
    pub fatal: bool,
}

impl From<&EngineError> for StepError {
    fn from(err: &EngineError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
            fatal: err.is_fatal(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimStep {
    pub column: usize,
    /// Value forced by the script, if any.
    pub requested: Option<BlockValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<PlacementPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<StepError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimReport {
    pub steps: Vec<SimStep>,
    #[serde(rename = "final")]
    pub snapshot: GameSnapshot,
    pub summary: SessionSummary,
}

impl SimReport {
    pub fn rejected(&self) -> usize {
        self.steps.iter().filter(|s| s.error.is_some()).count()
    }
}

/// Play `drops` against a fresh session built from `config`.
pub fn replay(config: &GameConfig, drops: &[DropSpec]) -> Result<SimReport, EngineError> {
    let mut session = Session::from_config(config)?;
    let mut steps = Vec::with_capacity(drops.len());

    for drop in drops {
        let requested = drop.value.map(BlockValue::new);
        let result = match requested {
            Some(value) => session.spawn_scripted(drop.column, value),
            None => session.spawn(drop.column),
        };
        let (plan, error) = match result {
            Ok(plan) => (Some(plan), None),
            Err(err) => {
                warn!(column = drop.column, error = %err, "drop rejected");
                (None, Some(StepError::from(&err)))
            }
        };
        steps.push(SimStep {
            column: drop.column,
            requested,
            plan,
            error,
        });
    }

    let snapshot = session.snapshot();
    Ok(SimReport {
        steps,
        snapshot,
        summary: session.end(),
    })
}
