//! Meta-repository access: configuration, fetch contract, snapshot store,
//! and sync coordination.

mod config;
mod fetcher;
mod store;
mod sync;

pub use config::*;
pub use fetcher::*;
pub use store::*;
pub use sync::*;
