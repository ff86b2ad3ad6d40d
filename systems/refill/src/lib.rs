#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic refill system that owns every random bubble-type draw.
//!
//! The world never draws randomness itself: this system seeds the opening
//! board when the grid is configured, counts landed shots, and requests a
//! new top row on a fixed shot cadence, drawing all types from an explicit
//! seeded stream so replays stay reproducible.

use bubble_barrage_core::{BubbleType, Command, Event};
use bubble_barrage_world::HexGrid;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const TYPE_POOL: [BubbleType; 6] = [
    BubbleType::Brown,
    BubbleType::Gray,
    BubbleType::Yellow,
    BubbleType::Red,
    BubbleType::Green,
    BubbleType::Blue,
];

/// Landed shots between successive row appends.
const SHOTS_PER_ROW: u32 = 15;

/// Bubbles placed on the opening board.
const OPENING_BUBBLE_BUDGET: usize = 21;

/// Configuration parameters required to construct the refill system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
    shots_per_row: u32,
    opening_budget: usize,
}

impl Config {
    /// Creates a configuration with the default cadence and opening budget.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            shots_per_row: SHOTS_PER_ROW,
            opening_budget: OPENING_BUBBLE_BUDGET,
        }
    }

    /// Creates a configuration with an explicit cadence and opening budget.
    #[must_use]
    pub const fn with_cadence(rng_seed: u64, shots_per_row: u32, opening_budget: usize) -> Self {
        Self {
            rng_seed,
            shots_per_row,
            opening_budget,
        }
    }
}

/// Pure system that deterministically emits board-population commands.
#[derive(Debug)]
pub struct Refill {
    rng: ChaCha8Rng,
    shots_per_row: u32,
    opening_budget: usize,
    shot_count: u32,
}

impl Refill {
    /// Creates a new refill system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            shots_per_row: config.shots_per_row,
            opening_budget: config.opening_budget,
            shot_count: 0,
        }
    }

    /// Consumes world events and emits seeding and row-append commands.
    ///
    /// The provided grid must reflect the state after the events were
    /// applied; the append budget is the width of the row that will become
    /// the top once the board descends.
    pub fn handle(&mut self, events: &[Event], grid: &HexGrid, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::GridConfigured { .. } => {
                    self.shot_count = 0;
                    let types = self.draw_types(self.opening_budget);
                    out.push(Command::SeedBoard { types });
                }
                Event::BubbleLanded { .. } => {
                    self.shot_count += 1;
                    if self.shot_count >= self.shots_per_row {
                        self.shot_count = 0;
                        let budget = grid.row_width(grid.rows() as i32) as usize;
                        let types = self.draw_types(budget);
                        out.push(Command::AppendRow { types });
                    }
                }
                _ => {}
            }
        }
    }

    fn draw_types(&mut self, count: usize) -> Vec<BubbleType> {
        (0..count)
            .map(|_| TYPE_POOL[self.rng.gen_range(0..TYPE_POOL.len())])
            .collect()
    }
}
