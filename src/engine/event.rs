//! Engine notification events
//!
//! Background work (detection, simulations) reports outcomes through an
//! unbounded channel handed out at engine construction, so the caller
//! can react without polling.

use crate::layout::LayoutKind;

/// Why a background simulation stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Explicit stop request
    Requested,
    /// Overlap residual fell under the tolerance
    Converged,
    /// A step produced a non-finite position; last good positions kept
    Diverged,
}

/// Notifications emitted by the engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    DetectionCompleted {
        community_count: usize,
        modularity: f64,
        resolution: f64,
    },
    /// A newer request landed before this detection finished; its result
    /// was discarded
    DetectionSuperseded {
        resolution: f64,
    },
    LayoutStarted(LayoutKind),
    LayoutStopped {
        kind: LayoutKind,
        reason: StopReason,
    },
}
