//! Election domain: status model, record parser, query service.

mod election_model;
mod election_parser;
mod election_service;

pub use election_model::*;
pub use election_parser::*;
pub use election_service::*;
