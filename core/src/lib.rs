#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Bubble Barrage engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for collaborators to react to deterministically. Systems consume event
//! streams, query immutable snapshots, and respond exclusively with new
//! command batches.

use serde::{Deserialize, Serialize};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Configures the world's hex grid using the provided dimensions.
    ///
    /// Resets all occupancy state; a fresh board is expected to follow via
    /// [`Command::SeedBoard`].
    ConfigureGrid {
        /// Base number of columns; even rows gain one extra cell.
        columns: u32,
        /// Number of rows laid out in the grid.
        rows: u32,
        /// Diameter of a single bubble cell measured in world units.
        cell_size: f32,
    },
    /// Populates the opening board from the top row downward.
    SeedBoard {
        /// Bubble types to place, one per filled cell, in fill order.
        types: Vec<BubbleType>,
    },
    /// Reports that an airborne bubble came to rest at a world position.
    LandBubble {
        /// Type carried by the landing bubble.
        bubble_type: BubbleType,
        /// Continuous position where the flight subsystem stopped the bubble.
        position: WorldPosition,
    },
    /// Requests that the board descend and a new top row be generated.
    AppendRow {
        /// Bubble types for the new top row, drawn by the requesting system.
        types: Vec<BubbleType>,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that the grid was reconfigured and the board reset.
    GridConfigured {
        /// Base number of columns; even rows gain one extra cell.
        columns: u32,
        /// Number of rows laid out in the grid.
        rows: u32,
        /// Diameter of a single bubble cell measured in world units.
        cell_size: f32,
    },
    /// Confirms that a bubble was placed by seeding or row generation.
    BubblePlaced {
        /// Identifier allocated to the bubble by the world.
        bubble: BubbleId,
        /// Cell the bubble occupies.
        cell: GridCoord,
        /// Type carried by the bubble.
        bubble_type: BubbleType,
    },
    /// Confirms that a fired bubble snapped onto the grid.
    BubbleLanded {
        /// Identifier allocated to the bubble by the world.
        bubble: BubbleId,
        /// Cell the landing resolved to.
        cell: GridCoord,
        /// Type carried by the bubble.
        bubble_type: BubbleType,
    },
    /// Reports that a landing request had no legal destination.
    PlacementRejected {
        /// Continuous position supplied with the landing request.
        position: WorldPosition,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Announces that a same-type cluster was removed from the board.
    ClusterEvicted {
        /// Identifiers of the removed bubbles in ascending order.
        bubbles: Vec<BubbleId>,
    },
    /// Announces that ceiling-disconnected bubbles were dropped.
    FloatingEvicted {
        /// Identifiers of the removed bubbles in ascending order.
        bubbles: Vec<BubbleId>,
    },
    /// Confirms that the board descended and a new top row was generated.
    RowAppended {
        /// Row count after the append.
        rows: u32,
        /// Total rows appended since the grid was configured.
        added_rows: u32,
    },
    /// Reports that the board was cleared; the session is over.
    GameWon,
    /// Reports that the board reached the lower bound; the session is over.
    GameLost,
}

/// Unique identifier assigned to a placed bubble.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BubbleId(u32);

impl BubbleId {
    /// Creates a new bubble identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Color classes a bubble may carry; matching is decided by equality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BubbleType {
    /// Brown bubble.
    Brown,
    /// Gray bubble.
    Gray,
    /// Yellow bubble.
    Yellow,
    /// Red bubble.
    Red,
    /// Green bubble.
    Green,
    /// Blue bubble.
    Blue,
}

/// Location of a single hex cell expressed as column and row indices.
///
/// Coordinates are signed so that conversions from continuous positions can
/// produce out-of-bounds candidates that validation later rejects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    column: i32,
    row: i32,
}

impl GridCoord {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index of the cell; higher rows sit closer to the ceiling.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }
}

/// Continuous 2D point used only for coordinate-system conversion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldPosition {
    x: f32,
    y: f32,
}

impl WorldPosition {
    /// Creates a new world position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal component in world units.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical component in world units; larger values sit closer to the ceiling.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }
}

/// Reasons a landing request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The resolved coordinate fails the parity-aware bounds check.
    OutOfBounds,
    /// The resolved coordinate already holds a bubble.
    Occupied,
    /// Neither the resolved coordinate nor any neighbor is a legal destination.
    Unresolvable,
}

/// Terminal outcome of a play session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    /// The board was cleared of bubbles.
    Won,
    /// The board descended past the lower bound.
    Lost,
}

/// Immutable representation of a single placed bubble used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BubbleSnapshot {
    /// Unique identifier assigned to the bubble.
    pub id: BubbleId,
    /// Cell currently occupied by the bubble.
    pub cell: GridCoord,
    /// Type carried by the bubble.
    pub bubble_type: BubbleType,
}

/// Read-only snapshot describing all bubbles placed on the board.
#[derive(Clone, Debug, Default)]
pub struct BubbleView {
    snapshots: Vec<BubbleSnapshot>,
}

impl BubbleView {
    /// Creates a new bubble view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<BubbleSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured bubble snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &BubbleSnapshot> {
        self.snapshots.iter()
    }

    /// Number of bubbles captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured an empty board.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<BubbleSnapshot> {
        self.snapshots
    }
}
