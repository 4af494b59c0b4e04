//! Maze grid, file format, generation and rendering

pub mod generate;
pub mod grid;
pub mod render;

pub use generate::generate;
pub use grid::{Cell, Grid};
pub use render::render;
