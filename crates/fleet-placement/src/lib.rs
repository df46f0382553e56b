//! fleet-placement: decides which dispatcher runs each job.
//!
//! A run knows up front how many jobs it will submit. A providing strategy
//! turns that count and the dispatcher list into a finite sequence of
//! dispatcher slots and hands them out one `provide()` call at a time.
//!
//! # Components
//!
//! - **`strategy`**: the `ProvidingStrategy` trait, the shared slot
//!   sequence, and the block / round-robin strategies
//! - **`provider`**: `DispatcherProvider`, the facade the driver talks to

pub mod error;
pub mod provider;
pub mod strategy;

pub use error::{PlacementError, PlacementResult};
pub use provider::DispatcherProvider;
pub use strategy::{BlockStrategy, ProvidingStrategy, RoundRobinStrategy, SlotSequence, StrategyKind, StrategyState};
