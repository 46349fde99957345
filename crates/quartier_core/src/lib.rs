//! # Quartier Core
//!
//! The simulation engine for quartier - a Schelling-style segregation model
//! on a toroidal grid with stochastic tolerance shocks.
//!
//! This crate contains the deterministic simulation logic, including:
//! - The toroidal grid of population codes and its relocation primitive
//! - Wrapped Chebyshev-neighborhood similarity evaluation
//! - Lognormal shock and normal tolerance sample pools
//! - The per-step happy/unhappy classification and relocation engine
//! - The append-only happiness time series
//!
//! ## Architecture
//!
//! Each step draws one tolerance threshold and one latent shock intensity,
//! classifies every occupied cell under the active rule (inverted on shock
//! steps), then relocates the unhappy cells in shuffled order into live
//! empty lots. Runs are deterministic under a fixed seed; the classification
//! pass can run in parallel behind the `parallel` feature, relocation is
//! always sequential.
//!
//! ## Example
//!
//! ```
//! use quartier_core::{Engine, SimConfig};
//!
//! let mut config = SimConfig::default();
//! config.grid.rows = 20;
//! config.grid.cols = 20;
//! config.grid.seed = Some(42);
//! config.steps = 10;
//!
//! let mut engine = Engine::new(config).unwrap();
//! while !engine.is_finished() {
//!     engine.step().unwrap();
//! }
//! assert_eq!(engine.happiness().len(), 10);
//! ```

/// Configuration management for simulation parameters
pub mod config;
/// The step engine: classification and relocation
pub mod engine;
/// Typed errors surfaced at initialization
pub mod error;
/// Toroidal grid of category codes
pub mod grid;
/// Happiness time series and structured logging
pub mod metrics;
/// Wrapped Chebyshev neighborhoods and similarity counts
pub mod neighborhood;
/// Shock and tolerance sample pools
pub mod sampling;
/// Read-only per-step snapshots for external consumers
pub mod snapshot;

pub use config::{IsolatedPolicy, SimConfig};
pub use engine::{happiness_rule, Engine, StepReport, SHOCK_RATIO_FLOOR};
pub use error::{Result, SimError};
pub use grid::Grid;
pub use metrics::{init_logging, HappinessLog};
pub use sampling::{SamplePool, ShockSampler, ToleranceSampler};
pub use snapshot::StepSnapshot;
