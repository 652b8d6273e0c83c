//! Engine control surface
//!
//! Owns the shared graph store and coordinates the pipeline: rebuild
//! from a snapshot, community detection and colorization, layout
//! placement and animation, background simulations and interaction
//! events. Position writers (animation, simulations) are mutually
//! exclusive in time: starting one halts any other first.

pub mod config;
pub mod event;
pub mod snapshot;

use crate::algo::{self, CentralityReport, CommunityReport};
use crate::animate::{AnimationController, Easing};
use crate::exchange::GraphDocument;
use crate::graph::{BoundingBox, GraphError, GraphStore};
use crate::interact::InteractionState;
use crate::layout::simulation::{self, SimulationSpec};
use crate::layout::{self, LayoutKind, LayoutRequest};
use crate::palette;
use config::EngineConfig;
use event::EngineEvent;
use notegraph_algorithms::{louvain, LouvainConfig, NoverlapSettings};
use snapshot::DocumentRecord;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

/// Errors surfaced by the control surface
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("resolution must be a positive finite number, got {0}")]
    InvalidResolution(f64),

    #[error("scale must be a positive finite number, got {0}")]
    InvalidScale(f64),

    #[error("{0:?} is not an iterative layout")]
    NotIterative(LayoutKind),

    #[error("{0:?} runs as a background simulation, start it instead")]
    NotStatic(LayoutKind),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("background task failed: {0}")]
    Task(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// The graph engine
///
/// Process state is deliberately small: the store, the last community
/// report and the currently running position writers. Everything else is
/// recomputed from the store on demand.
pub struct Engine {
    config: EngineConfig,
    store: Arc<RwLock<GraphStore>>,
    resolution: Mutex<f64>,
    report: Mutex<Option<CommunityReport>>,
    detection_epoch: AtomicU64,
    simulations: Mutex<HashMap<LayoutKind, simulation::SimulationHandle>>,
    animation: Mutex<AnimationController>,
    interaction: Mutex<InteractionState>,
    events: UnboundedSender<EngineEvent>,
}

impl Engine {
    /// Create an engine plus the receiving end of its event channel.
    pub fn new(config: EngineConfig) -> (Self, UnboundedReceiver<EngineEvent>) {
        let (events, receiver) = unbounded_channel();
        let resolution = config.resolution;
        let engine = Engine {
            config,
            store: Arc::new(RwLock::new(GraphStore::new())),
            resolution: Mutex::new(resolution),
            report: Mutex::new(None),
            detection_epoch: AtomicU64::new(0),
            simulations: Mutex::new(HashMap::new()),
            animation: Mutex::new(AnimationController::new()),
            interaction: Mutex::new(InteractionState::new()),
            events,
        };
        (engine, receiver)
    }

    /// Shared handle to the live attribute store. Writers hold the write
    /// lock for a whole tick, so readers always observe a consistent
    /// frame.
    pub fn store(&self) -> Arc<RwLock<GraphStore>> {
        Arc::clone(&self.store)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace the graph from a fresh snapshot and run the full
    /// pipeline: detection, colorization and the initial circle-pack
    /// placement.
    pub async fn rebuild(&self, records: &[DocumentRecord]) -> EngineResult<CommunityReport> {
        self.halt_position_writers().await;

        let store = snapshot::build_store(records, &self.config)?;
        info!(
            nodes = store.node_count(),
            edges = store.edge_count(),
            "rebuilt graph from snapshot"
        );
        *self.store.write().await = store;
        *self.interaction.lock().await = InteractionState::new();

        let resolution = *self.resolution.lock().await;
        let report = match self.run_detection(resolution).await? {
            Some(report) => report,
            // Superseded mid-rebuild by a newer request; serve its result
            None => self.report.lock().await.clone().unwrap_or_else(|| {
                CommunityReport {
                    assignments: HashMap::new(),
                    community_count: 0,
                    modularity: 0.0,
                    move_count: 0,
                    moves_per_level: Vec::new(),
                    delta_computations: 0,
                    visits_per_node: HashMap::new(),
                    level_count: 1,
                    resolution,
                }
            }),
        };

        // Initial placement honors the detected communities
        let request = LayoutRequest::new(LayoutKind::CirclePack);
        let positions = {
            let guard = self.store.read().await;
            layout::compute_static(&guard, &request)
        };
        if let Some(positions) = positions {
            let mut guard = self.store.write().await;
            for (id, (x, y)) in positions {
                guard.set_position(id, x, y);
            }
        }

        Ok(report)
    }

    /// Change the detection resolution and re-detect.
    ///
    /// Invalid values are rejected and the previous resolution stays in
    /// effect. If a newer request lands before this detection finishes,
    /// this one's result is discarded rather than queued.
    pub async fn set_resolution(&self, value: f64) -> EngineResult<()> {
        if !value.is_finite() || value <= 0.0 {
            return Err(EngineError::InvalidResolution(value));
        }
        *self.resolution.lock().await = value;
        self.run_detection(value).await?;
        Ok(())
    }

    pub async fn resolution(&self) -> f64 {
        *self.resolution.lock().await
    }

    /// Compute a static layout and animate the nodes toward it.
    pub async fn set_layout(&self, request: LayoutRequest) -> EngineResult<()> {
        if let Some(scale) = request.scale {
            if !scale.is_finite() || scale <= 0.0 {
                return Err(EngineError::InvalidScale(scale));
            }
        }
        if request.kind.is_iterative() {
            return Err(EngineError::NotStatic(request.kind));
        }

        let targets = {
            let guard = self.store.read().await;
            layout::compute_static(&guard, &request)
        };
        let Some(targets) = targets else {
            return Err(EngineError::NotStatic(request.kind));
        };

        self.stop_all_simulations().await;
        self.animation.lock().await.transition(
            Arc::clone(&self.store),
            targets,
            self.config.animation_duration(),
            self.config.tick_interval(),
            Easing::Linear,
        );
        Ok(())
    }

    /// Start a background simulation. Already running is a no-op.
    pub async fn start_layout(&self, kind: LayoutKind) -> EngineResult<()> {
        if !kind.is_iterative() {
            return Err(EngineError::NotIterative(kind));
        }

        self.animation.lock().await.cancel();

        let mut sims = self.simulations.lock().await;
        let other = match kind {
            LayoutKind::ForceDirected => LayoutKind::Noverlap,
            _ => LayoutKind::ForceDirected,
        };
        if let Some(handle) = sims.remove(&other) {
            handle.request_stop();
            handle.join().await;
        }

        if let Some(handle) = sims.get(&kind) {
            if !handle.is_finished() {
                debug!(?kind, "simulation already running");
                return Ok(());
            }
            sims.remove(&kind);
        }

        self.ensure_positions().await;

        let spec = match kind {
            LayoutKind::ForceDirected => SimulationSpec::ForceDirected(None),
            _ => SimulationSpec::Noverlap {
                settings: NoverlapSettings {
                    margin: self.config.noverlap_margin,
                    ..Default::default()
                },
                tolerance: self.config.noverlap_tolerance,
                radius_ratio: self.config.noverlap_radius_ratio,
            },
        };
        let handle = simulation::spawn(
            spec,
            Arc::clone(&self.store),
            self.config.tick_interval(),
            self.events.clone(),
        );
        sims.insert(kind, handle);
        let _ = self.events.send(EngineEvent::LayoutStarted(kind));
        Ok(())
    }

    /// Stop a background simulation. Not running is a no-op.
    pub async fn stop_layout(&self, kind: LayoutKind) -> EngineResult<()> {
        if !kind.is_iterative() {
            return Err(EngineError::NotIterative(kind));
        }
        self.stop_simulation(kind).await;
        Ok(())
    }

    /// Bounds of the current positions, for the external camera.
    pub async fn fit_request(&self) -> Option<BoundingBox> {
        self.store.read().await.bounding_box()
    }

    /// Serialize the current graph as an exchange document.
    pub async fn export_graph(&self) -> EngineResult<String> {
        let guard = self.store.read().await;
        Ok(GraphDocument::from_store(&guard).to_json()?)
    }

    /// Hover event from the renderer.
    pub async fn on_hover(&self, key: &str, entering: bool) {
        let mut guard = self.store.write().await;
        let Some(id) = guard.node_id(key) else {
            return;
        };
        let mut interaction = self.interaction.lock().await;
        if entering {
            interaction.hover_enter(&mut guard, id);
        } else {
            interaction.hover_leave(&mut guard, id);
        }
    }

    /// Search term change from the search box.
    pub async fn on_search(&self, term: &str) {
        let mut guard = self.store.write().await;
        self.interaction
            .lock()
            .await
            .search(&mut guard, term, self.config.search_min_length);
    }

    /// Last community detection snapshot, refreshed per rebuild or
    /// re-detection.
    pub async fn community_report(&self) -> Option<CommunityReport> {
        self.report.lock().await.clone()
    }

    /// Hub/authority ranking over the current topology, computed on
    /// demand.
    pub async fn centrality_report(&self) -> CentralityReport {
        let guard = self.store.read().await;
        algo::centrality_report(&guard, self.config.centrality_top_k)
    }

    /// Stop every background writer. Called when the owning view closes.
    pub async fn close(&self) {
        self.halt_position_writers().await;
    }

    // Detection runs off the interactive path; an epoch counter keeps
    // only the newest request's result.
    async fn run_detection(&self, resolution: f64) -> EngineResult<Option<CommunityReport>> {
        let epoch = self.detection_epoch.fetch_add(1, Ordering::SeqCst) + 1;

        let view = {
            let guard = self.store.read().await;
            algo::build_view(&guard)
        };
        let louvain_config = LouvainConfig {
            resolution,
            ..Default::default()
        };
        let result = tokio::task::spawn_blocking(move || louvain(&view, &louvain_config))
            .await
            .map_err(|error| EngineError::Task(error.to_string()))?;

        if self.detection_epoch.load(Ordering::SeqCst) != epoch {
            debug!(resolution, "detection superseded by a newer request");
            let _ = self
                .events
                .send(EngineEvent::DetectionSuperseded { resolution });
            return Ok(None);
        }

        let report = {
            let mut guard = self.store.write().await;
            algo::apply_communities(&mut guard, &result);
            palette::colorize(&mut guard);
            algo::build_report(&guard, &result)
        };
        *self.report.lock().await = Some(report.clone());
        let _ = self.events.send(EngineEvent::DetectionCompleted {
            community_count: report.community_count,
            modularity: report.modularity,
            resolution,
        });
        Ok(Some(report))
    }

    async fn stop_simulation(&self, kind: LayoutKind) {
        let handle = self.simulations.lock().await.remove(&kind);
        if let Some(handle) = handle {
            handle.request_stop();
            handle.join().await;
        }
    }

    async fn stop_all_simulations(&self) {
        self.stop_simulation(LayoutKind::ForceDirected).await;
        self.stop_simulation(LayoutKind::Noverlap).await;
    }

    async fn halt_position_writers(&self) {
        self.stop_all_simulations().await;
        self.animation.lock().await.cancel();
    }

    // Simulations need a starting position for every node; nodes the
    // pipeline has not placed yet get a circular fallback.
    async fn ensure_positions(&self) {
        let mut guard = self.store.write().await;
        if guard.nodes().all(|node| node.position().is_some()) {
            return;
        }
        let request = LayoutRequest::new(LayoutKind::Circular);
        if let Some(positions) = layout::compute_static(&guard, &request) {
            for (id, (x, y)) in positions {
                let placed = guard
                    .node(id)
                    .map(|node| node.position().is_some())
                    .unwrap_or(false);
                if !placed {
                    guard.set_position(id, x, y);
                }
            }
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        // Best effort: signal whatever can be reached without awaiting
        if let Ok(mut sims) = self.simulations.try_lock() {
            for (_, handle) in sims.drain() {
                handle.request_stop();
            }
        }
        if let Ok(mut animation) = self.animation.try_lock() {
            animation.cancel();
        }
    }
}
