//! Data context domain: contract, engines, binding, cache, validators, and
//! the lifecycle gate.

mod binding;
mod cache;
mod contract;
mod engine;
mod phase;
mod standalone;
mod state;
pub mod validate;
mod working;

pub use binding::DataContextBinding;
pub use cache::ContentCache;
pub use contract::DataContext;
pub use phase::{LifecyclePhase, Validity};
pub use standalone::StandaloneDataContext;
pub use state::SelectionState;
pub use working::WorkingDataContext;
