//! pf-core: stable foundation for propflow.
//!
//! Contains:
//! - units (uom SI types, constructors and the unit labels carried on graph signals)
//! - numeric (Real + tolerances + float helpers)
//! - ids (stable compact IDs for graph objects)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

pub use error::{PfError, PfResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
