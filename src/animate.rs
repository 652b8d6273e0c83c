//! Animated position transitions
//!
//! Interpolates node positions from their current values to a target
//! set over a fixed duration, one tick at a time, under the store's
//! write lock. At most one transition is active; starting a new one
//! cancels the previous task between ticks, so positions are always a
//! point on exactly one transition's path.

use crate::graph::{GraphStore, NodeId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

/// Interpolation easing curves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    QuadInOut,
    CubicInOut,
}

impl Easing {
    /// Map a linear parameter in [0, 1] onto the eased curve
    pub fn apply(&self, t: f64) -> f64 {
        match self {
            Easing::Linear => t,
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

pub fn lerp(start: f64, end: f64, t: f64) -> f64 {
    start + (end - start) * t
}

/// Handle over a running transition task
#[derive(Debug)]
pub struct TransitionHandle {
    cancelled: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl TransitionHandle {
    /// Stop the transition; the store keeps the last tick's positions.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Owns the single active transition
#[derive(Debug, Default)]
pub struct AnimationController {
    active: Option<TransitionHandle>,
}

impl AnimationController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Animate the given nodes toward their targets.
    ///
    /// Any in-flight transition is cancelled first. Nodes that have no
    /// position yet start at their target, which places them instantly.
    pub fn transition(
        &mut self,
        store: Arc<RwLock<GraphStore>>,
        targets: Vec<(NodeId, (f64, f64))>,
        duration: Duration,
        tick: Duration,
        easing: Easing,
    ) {
        self.cancel();

        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        let task = tokio::spawn(async move {
            let legs: Vec<(NodeId, (f64, f64), (f64, f64))> = {
                let guard = store.read().await;
                targets
                    .into_iter()
                    .map(|(id, target)| {
                        let start = guard
                            .node(id)
                            .and_then(|node| node.position())
                            .unwrap_or(target);
                        (id, start, target)
                    })
                    .collect()
            };

            let started = Instant::now();
            let mut ticker = tokio::time::interval(tick);
            loop {
                ticker.tick().await;
                if flag.load(Ordering::Relaxed) {
                    return;
                }

                let t = if duration.is_zero() {
                    1.0
                } else {
                    (started.elapsed().as_secs_f64() / duration.as_secs_f64()).min(1.0)
                };
                let eased = easing.apply(t);

                {
                    let mut guard = store.write().await;
                    for &(id, start, target) in &legs {
                        if t >= 1.0 {
                            // Land exactly on the target, no rounding drift
                            guard.set_position(id, target.0, target.1);
                        } else {
                            guard.set_position(
                                id,
                                lerp(start.0, target.0, eased),
                                lerp(start.1, target.1, eased),
                            );
                        }
                    }
                }

                if t >= 1.0 {
                    debug!(nodes = legs.len(), "transition complete");
                    return;
                }
            }
        });

        self.active = Some(TransitionHandle {
            cancelled,
            task,
        });
    }

    /// Cancel the active transition, if any. Repeated calls are no-ops.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.active.take() {
            handle.cancel();
        }
    }

    pub fn is_animating(&self) -> bool {
        self.active
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeFlags;

    fn shared_store(keys: &[&str]) -> Arc<RwLock<GraphStore>> {
        let mut store = GraphStore::new();
        for key in keys {
            let id = store.add_node(*key, *key, NodeFlags::default()).unwrap();
            store.set_position(id, 0.0, 0.0);
        }
        Arc::new(RwLock::new(store))
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in [Easing::Linear, Easing::QuadInOut, Easing::CubicInOut] {
            assert!((easing.apply(0.0)).abs() < 1e-12);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-12);
        }
        assert_eq!(Easing::Linear.apply(0.25), 0.25);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.0), 0.0);
        assert_eq!(lerp(0.0, 10.0, 1.0), 10.0);
        assert_eq!(lerp(-5.0, 5.0, 0.5), 0.0);
    }

    #[tokio::test]
    async fn test_transition_reaches_targets() {
        let store = shared_store(&["a", "b"]);
        let (a, b) = {
            let guard = store.read().await;
            (guard.node_id("a").unwrap(), guard.node_id("b").unwrap())
        };

        let mut controller = AnimationController::new();
        controller.transition(
            Arc::clone(&store),
            vec![(a, (100.0, 50.0)), (b, (-20.0, 30.0))],
            Duration::from_millis(40),
            Duration::from_millis(5),
            Easing::Linear,
        );

        tokio::time::sleep(Duration::from_millis(150)).await;
        let guard = store.read().await;
        assert_eq!(guard.node(a).unwrap().position(), Some((100.0, 50.0)));
        assert_eq!(guard.node(b).unwrap().position(), Some((-20.0, 30.0)));
    }

    #[tokio::test]
    async fn test_cancel_then_restart_stays_on_new_path() {
        let store = shared_store(&["a"]);
        let a = store.read().await.node_id("a").unwrap();

        let mut controller = AnimationController::new();
        controller.transition(
            Arc::clone(&store),
            vec![(a, (1000.0, 0.0))],
            Duration::from_millis(200),
            Duration::from_millis(5),
            Easing::Linear,
        );
        tokio::time::sleep(Duration::from_millis(30)).await;

        // Restart toward a target on the y axis; the new start is wherever
        // the first transition got to, so x can only shrink from here on.
        controller.transition(
            Arc::clone(&store),
            vec![(a, (0.0, 500.0))],
            Duration::from_millis(40),
            Duration::from_millis(5),
            Easing::Linear,
        );
        tokio::time::sleep(Duration::from_millis(150)).await;

        let guard = store.read().await;
        let (x, y) = guard.node(a).unwrap().position().unwrap();
        assert!(x.is_finite() && y.is_finite());
        assert_eq!((x, y), (0.0, 500.0));
    }

    #[tokio::test]
    async fn test_cancel_is_idempotent() {
        let store = shared_store(&["a"]);
        let a = store.read().await.node_id("a").unwrap();

        let mut controller = AnimationController::new();
        controller.transition(
            Arc::clone(&store),
            vec![(a, (10.0, 10.0))],
            Duration::from_millis(100),
            Duration::from_millis(5),
            Easing::Linear,
        );
        controller.cancel();
        controller.cancel();
        assert!(!controller.is_animating());

        let guard = store.read().await;
        let (x, y) = guard.node(a).unwrap().position().unwrap();
        assert!(x.is_finite() && y.is_finite());
    }
}
