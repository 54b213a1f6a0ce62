//! Durable election rows and the snapshot reconciler.

mod model;
mod repository;

pub use model::*;
pub use repository::*;
