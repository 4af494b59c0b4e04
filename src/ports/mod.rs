//! Ports (trait boundaries) for external dependencies.
//!
//! Training logic depends only on these traits; concrete observers live in
//! the pipeline module.

pub mod observer;

pub use observer::Observer;
