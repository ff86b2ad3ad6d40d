#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares the Bubble Barrage experience.

use bubble_barrage_core::{BubbleView, Command};
use bubble_barrage_world::{query, HexGrid, World};

/// Board shape requested when a session starts.
#[derive(Clone, Copy, Debug)]
pub struct BoardLayout {
    /// Base number of columns; even rows gain one extra cell.
    pub columns: u32,
    /// Number of rows laid out in the grid.
    pub rows: u32,
    /// Diameter of a single bubble cell measured in world units.
    pub cell_size: f32,
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self {
            columns: 10,
            rows: 16,
            cell_size: 1.0,
        }
    }
}

/// Produces data required to start and present a session.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Emits the opening command batch for a fresh session.
    pub fn opening_commands(&self, layout: BoardLayout, out: &mut Vec<Command>) {
        out.push(Command::ConfigureGrid {
            columns: layout.columns,
            rows: layout.rows,
            cell_size: layout.cell_size,
        });
    }

    /// Exposes the hex grid configuration required for rendering.
    #[must_use]
    pub fn grid<'world>(&self, world: &'world World) -> &'world HexGrid {
        query::grid(world)
    }

    /// Exposes the bubbles currently placed for presentation purposes.
    #[must_use]
    pub fn bubbles(&self, world: &World) -> BubbleView {
        query::bubble_view(world)
    }
}
