//! Domain models for the disaster forecast service

mod batch;
mod forecast;
mod location;

pub use batch::*;
pub use forecast::*;
pub use location::*;
