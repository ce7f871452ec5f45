//! Service request domain entities.

pub mod incoterm;
pub mod model;

pub use incoterm::{Incoterm, IncotermFamily};
pub use model::ServiceRequestRecord;
