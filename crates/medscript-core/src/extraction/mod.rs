//! Heuristic extraction of medication candidates from prescription text.
//!
//! Per line, in order: form token → name + strength → frequency code →
//! duration → PRN marker. Works without any external service.

pub mod lexicon;
mod engine;

pub use engine::*;
