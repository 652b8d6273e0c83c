//! Background layout simulations
//!
//! Runs an iterative layout as a cancellable tokio task. Each tick takes
//! the store's write lock, advances the simulation one step over a plain
//! position buffer and writes the result back, so renderer reads between
//! ticks always see a consistent frame. Stop requests are level
//! triggered: the flag is checked at the top of every tick and repeated
//! requests are no-ops.

use super::LayoutKind;
use crate::algo;
use crate::engine::event::{EngineEvent, StopReason};
use crate::graph::{GraphStore, NodeId};
use notegraph_algorithms::{
    force_directed_step, noverlap_step, ForceSettings, NoverlapSettings,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// What to run and how, resolved from the engine configuration
#[derive(Debug, Clone)]
pub enum SimulationSpec {
    /// Settings inferred from the graph when `None`
    ForceDirected(Option<ForceSettings>),
    Noverlap {
        settings: NoverlapSettings,
        /// Residual overlap below which the simulation stops on its own
        tolerance: f64,
        /// Node size to circle radius multiplier
        radius_ratio: f64,
    },
}

impl SimulationSpec {
    pub fn kind(&self) -> LayoutKind {
        match self {
            SimulationSpec::ForceDirected(_) => LayoutKind::ForceDirected,
            SimulationSpec::Noverlap { .. } => LayoutKind::Noverlap,
        }
    }
}

/// Handle over a running simulation task
#[derive(Debug)]
pub struct SimulationHandle {
    kind: LayoutKind,
    stop: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl SimulationHandle {
    pub fn kind(&self) -> LayoutKind {
        self.kind
    }

    /// Ask the task to stop at its next tick. Idempotent.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the task to wind down after a stop request.
    pub async fn join(self) {
        let _ = self.task.await;
    }
}

/// Spawn a simulation loop over the shared store.
///
/// The topology is projected once at startup; stores are immutable
/// between rebuilds and a rebuild stops all simulations first.
pub fn spawn(
    spec: SimulationSpec,
    store: Arc<RwLock<GraphStore>>,
    tick: Duration,
    events: UnboundedSender<EngineEvent>,
) -> SimulationHandle {
    let kind = spec.kind();
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);

    let task = tokio::spawn(async move {
        let (view, radii) = {
            let guard = store.read().await;
            let view = algo::build_view(&guard);
            let radii = match &spec {
                SimulationSpec::Noverlap { radius_ratio, .. } => algo::node_sizes(&guard)
                    .into_iter()
                    .map(|size| size * radius_ratio)
                    .collect(),
                SimulationSpec::ForceDirected(_) => Vec::new(),
            };
            (view, radii)
        };

        // Settings are resolved once, before the loop starts
        enum Resolved {
            Force(ForceSettings),
            Noverlap {
                settings: NoverlapSettings,
                tolerance: f64,
            },
        }
        let resolved = match spec {
            SimulationSpec::ForceDirected(overrides) => {
                Resolved::Force(overrides.unwrap_or_else(|| ForceSettings::infer(&view)))
            }
            SimulationSpec::Noverlap {
                settings,
                tolerance,
                ..
            } => Resolved::Noverlap {
                settings,
                tolerance,
            },
        };

        let mut ticker = tokio::time::interval(tick);
        let reason = loop {
            ticker.tick().await;
            if flag.load(Ordering::Relaxed) {
                break StopReason::Requested;
            }

            let mut guard = store.write().await;
            let mut positions: Vec<(f64, f64)> = guard
                .nodes()
                .map(|node| node.position().unwrap_or((0.0, 0.0)))
                .collect();
            let before = positions.clone();

            let residual = match &resolved {
                Resolved::Force(settings) => {
                    force_directed_step(&view, &mut positions, settings);
                    None
                }
                Resolved::Noverlap {
                    settings,
                    tolerance,
                } => {
                    let residual = noverlap_step(&mut positions, &radii, settings);
                    Some((residual, *tolerance))
                }
            };

            let blown_up = positions
                .iter()
                .any(|&(x, y)| !x.is_finite() || !y.is_finite());
            if blown_up {
                for (index, &(x, y)) in before.iter().enumerate() {
                    guard.set_position(NodeId::new(index as u32), x, y);
                }
                warn!(?kind, "simulation step produced non-finite positions, stopping");
                break StopReason::Diverged;
            }

            for (index, &(x, y)) in positions.iter().enumerate() {
                guard.set_position(NodeId::new(index as u32), x, y);
            }
            drop(guard);

            if let Some((residual, tolerance)) = residual {
                if residual <= tolerance {
                    debug!(residual, "overlap removal converged");
                    break StopReason::Converged;
                }
            }
        };

        let _ = events.send(EngineEvent::LayoutStopped { kind, reason });
    });

    SimulationHandle { kind, stop, task }
}
