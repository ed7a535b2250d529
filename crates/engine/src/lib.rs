//! Presentation engine for placement plans.
//!
//! The core resolves a whole spawn in one call. Frontends that want to show
//! the block falling and the merges flashing feed the resulting
//! [`PlacementPlan`](core::PlacementPlan) to a [`Playback`] and advance it
//! with elapsed frame time.

pub mod playback;

pub use tui_merge_core as core;
pub use tui_merge_types as types;

pub use playback::{Playback, Stage};
