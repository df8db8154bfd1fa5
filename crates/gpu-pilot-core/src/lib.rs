pub mod candidate;
pub mod catalog;
pub mod config;
pub mod corpus;
pub mod database;
pub mod engine;
pub mod error;
pub mod leaderboard;
pub mod normalize;
pub mod profile;
pub mod rank;
pub mod resolve;
pub mod select;

#[cfg(feature = "network")]
pub mod cache;
#[cfg(feature = "network")]
pub mod sync;

pub use candidate::ModelCandidate;
pub use database::GpuDatabase;
pub use error::PilotError;
pub use profile::{CapabilityProfile, GpuMemory, Performance, PlatformClass, Vendor};
pub use rank::TradeoffMode;
pub use select::{Selection, FALLBACK_MODELS};
