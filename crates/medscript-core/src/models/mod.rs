//! Domain models for the medscript pipeline.

mod candidate;
mod form;
mod input;
mod record;

pub use candidate::*;
pub use form::*;
pub use input::*;
pub use record::*;
