#![deny(missing_docs)]
//! Textbook SAT procedures (Resolution, Davis–Putnam, DPLL) and a harness for
//! measuring their cost across the random 3-CNF phase transition.

/// The `sat` module holds the CNF model, the three solvers, DIMACS I/O and the
/// random instance generator.
#[allow(missing_docs)]
pub mod sat;

/// The `bench` module times and memory-profiles solver runs and turns them
/// into CSV files and ratio summaries.
#[allow(missing_docs)]
pub mod bench;

/// Crate-wide error type.
pub mod error;

pub use error::{Error, Result};
