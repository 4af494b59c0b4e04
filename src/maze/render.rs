//! ANSI-colored terminal rendering

use super::grid::{Cell, Grid};

const RESET: &str = "\x1b[0m";

fn color(cell: Cell) -> Option<&'static str> {
    match cell {
        Cell::Start => Some("\x1b[36m"),
        Cell::Goal => Some("\x1b[32m"),
        Cell::Wall => Some("\x1b[31m"),
        Cell::Trace => Some("\x1b[35m"),
        Cell::Free => None,
    }
}

/// Render a grid with one colored glyph per cell
pub fn render(grid: &Grid) -> String {
    let mut out = String::new();
    for row in grid.rows() {
        for &cell in row {
            match color(cell) {
                Some(code) => {
                    out.push_str(code);
                    out.push(cell.to_char());
                    out.push_str(RESET);
                }
                None => out.push(cell.to_char()),
            }
        }
        out.push('\n');
    }
    out
}
