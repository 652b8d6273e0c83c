pub mod common;
pub mod forces;
pub mod hits;
pub mod layout;
pub mod louvain;

pub use common::GraphView;
pub use forces::{force_directed_step, noverlap_step, ForceSettings, NoverlapSettings};
pub use hits::{hits, HitsConfig, HitsResult};
pub use layout::{circle_pack, circular, random, CirclePackSettings};
pub use louvain::{louvain, LouvainConfig, LouvainResult};
