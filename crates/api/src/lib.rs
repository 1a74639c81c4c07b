//! Contract types shared between the descriptor producer and the graph builder.
//!
//! Everything in here is name-keyed: other types are referenced by their fully
//! qualified name only, never by object. The core crate turns these records into
//! a linked, immutable class graph.

pub mod error;
pub mod models;

pub use error::{ApiError, ApiResult};
pub use models::*;
