//! # replay-sim
//!
//! Host-side simulated backend for replay-core.
//!
//! Provides:
//! - `SimulatedService` — in-process recorder that runs the full session
//!   protocol against the local filesystem, with optional confirmation
//!   latency
//! - `ClipManifest` — JSON description of a simulated clip
//!
//! ## Usage
//! ```ignore
//! use replay_core::{ReplayKit, ReplaySettings};
//! use replay_sim::SimulatedService;
//!
//! let service = SimulatedService::new("/tmp/replays");
//! let kit = ReplayKit::new(Box::new(service), ReplaySettings::default());
//! kit.initialise();
//! ```

pub mod manifest;
pub mod service;

pub use manifest::ClipManifest;
pub use service::SimulatedService;
