#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative board state management for Bubble Barrage.
//!
//! The world owns the occupancy map and resolves every landing through the
//! full placement, cluster, and floating sequence before control returns to
//! the caller; no collaborator ever observes a partially-resolved board.

mod hex;
mod search;

use std::collections::HashMap;

use bubble_barrage_core::{
    BubbleId, BubbleSnapshot, BubbleType, BubbleView, Command, Event, GameOutcome, GridCoord,
    PlacementError, WorldPosition,
};
use thiserror::Error;

pub use hex::HexGrid;

const DEFAULT_GRID_COLUMNS: u32 = 10;
const DEFAULT_GRID_ROWS: u32 = 16;
const DEFAULT_CELL_SIZE: f32 = 1.0;
const DEFAULT_ORIGIN: WorldPosition = WorldPosition::new(0.0, 0.0);

/// Smallest same-type cluster that pops when a landing completes it.
pub const MIN_CLUSTER_SIZE: usize = 2;

/// Rows above the moving board base that the lowest bubble may not enter.
const LOSS_ROW_MARGIN: i32 = 3;

/// Errors raised when mutating the occupancy map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum OccupancyError {
    /// The coordinate fails the parity-aware bounds check.
    #[error("coordinate ({}, {}) lies outside the configured grid", .0.column(), .0.row())]
    OutOfBounds(GridCoord),
    /// The coordinate already holds a bubble; overwriting would orphan it.
    #[error("coordinate ({}, {}) already holds a bubble", .0.column(), .0.row())]
    Occupied(GridCoord),
}

impl OccupancyError {
    /// Landing-rejection reason equivalent to this error.
    #[must_use]
    pub const fn rejection_reason(&self) -> PlacementError {
        match self {
            Self::OutOfBounds(_) => PlacementError::OutOfBounds,
            Self::Occupied(_) => PlacementError::Occupied,
        }
    }
}

/// Coordinate-keyed occupancy map with a maintained reverse index.
///
/// Every mutation updates both directions atomically, so entity-driven
/// lookups stay O(1) and a bubble can never appear under two cells.
#[derive(Clone, Debug, Default)]
pub struct BubbleMap {
    by_cell: HashMap<GridCoord, BubbleId>,
    bubbles: HashMap<BubbleId, BubbleSnapshot>,
}

impl BubbleMap {
    /// Returns the bubble occupying the provided cell, if any.
    #[must_use]
    pub fn occupant(&self, cell: GridCoord) -> Option<BubbleId> {
        self.by_cell.get(&cell).copied()
    }

    /// Reports whether the provided cell holds a bubble.
    #[must_use]
    pub fn contains(&self, cell: GridCoord) -> bool {
        self.by_cell.contains_key(&cell)
    }

    /// Returns the type carried by the bubble at the provided cell, if any.
    #[must_use]
    pub fn bubble_type_at(&self, cell: GridCoord) -> Option<BubbleType> {
        self.occupant(cell)
            .and_then(|id| self.bubbles.get(&id))
            .map(|bubble| bubble.bubble_type)
    }

    /// Returns the cell occupied by the provided bubble, if it is placed.
    #[must_use]
    pub fn cell_of(&self, bubble: BubbleId) -> Option<GridCoord> {
        self.bubbles.get(&bubble).map(|snapshot| snapshot.cell)
    }

    /// Adds a placed bubble; refuses occupied cells instead of overwriting.
    pub fn insert(&mut self, bubble: BubbleSnapshot) -> Result<(), OccupancyError> {
        if self.by_cell.contains_key(&bubble.cell) {
            return Err(OccupancyError::Occupied(bubble.cell));
        }
        let _ = self.by_cell.insert(bubble.cell, bubble.id);
        let _ = self.bubbles.insert(bubble.id, bubble);
        Ok(())
    }

    /// Removes and returns the bubble at the provided cell, if any.
    pub fn remove_at(&mut self, cell: GridCoord) -> Option<BubbleSnapshot> {
        let id = self.by_cell.remove(&cell)?;
        self.bubbles.remove(&id)
    }

    /// Returns the full snapshot of the bubble at the provided cell, if any.
    #[must_use]
    pub fn snapshot_at(&self, cell: GridCoord) -> Option<BubbleSnapshot> {
        self.occupant(cell)
            .and_then(|id| self.bubbles.get(&id))
            .copied()
    }

    /// Iterator over all occupied cells in arbitrary order.
    pub fn occupied_cells(&self) -> impl Iterator<Item = GridCoord> + '_ {
        self.by_cell.keys().copied()
    }

    /// Number of bubbles currently placed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_cell.len()
    }

    /// Reports whether the board holds no bubbles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_cell.is_empty()
    }

    /// Row index of the lowest placed bubble, if any.
    #[must_use]
    pub fn lowest_row(&self) -> Option<i32> {
        self.by_cell.keys().map(GridCoord::row).min()
    }

    fn snapshots(&self) -> Vec<BubbleSnapshot> {
        self.bubbles.values().copied().collect()
    }
}

/// Represents the authoritative Bubble Barrage board state.
#[derive(Debug)]
pub struct World {
    grid: HexGrid,
    bubbles: BubbleMap,
    added_rows: u32,
    next_bubble_id: u32,
    outcome: Option<GameOutcome>,
}

impl World {
    /// Creates a new world with the default grid and an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self {
            grid: HexGrid::new(
                DEFAULT_GRID_COLUMNS,
                DEFAULT_GRID_ROWS,
                DEFAULT_CELL_SIZE,
                DEFAULT_ORIGIN,
            ),
            bubbles: BubbleMap::default(),
            added_rows: 0,
            next_bubble_id: 0,
            outcome: None,
        }
    }

    fn allocate_bubble(
        &mut self,
        cell: GridCoord,
        bubble_type: BubbleType,
    ) -> Result<BubbleId, OccupancyError> {
        if !self.grid.is_valid(cell) {
            return Err(OccupancyError::OutOfBounds(cell));
        }
        let id = BubbleId::new(self.next_bubble_id);
        self.bubbles.insert(BubbleSnapshot {
            id,
            cell,
            bubble_type,
        })?;
        self.next_bubble_id += 1;
        Ok(id)
    }

    /// Row index at and below which a placed bubble ends the session.
    fn loss_row(&self) -> i32 {
        self.added_rows as i32 + LOSS_ROW_MARGIN
    }

    fn detect_loss(&mut self, out_events: &mut Vec<Event>) {
        if self.outcome.is_some() {
            return;
        }
        if let Some(lowest) = self.bubbles.lowest_row() {
            if lowest <= self.loss_row() {
                self.outcome = Some(GameOutcome::Lost);
                out_events.push(Event::GameLost);
            }
        }
    }

    fn resolve_outcome(&mut self, out_events: &mut Vec<Event>) {
        self.detect_loss(out_events);
        if self.outcome.is_none() && self.bubbles.is_empty() {
            self.outcome = Some(GameOutcome::Won);
            out_events.push(Event::GameWon);
        }
    }

    /// Reports whether the cell is reachable support for a landing bubble.
    ///
    /// The top row anchors itself; anywhere else needs at least one occupied
    /// neighbor, which is ceiling-connected whenever the board invariant
    /// holds before the landing.
    fn is_anchored(&self, cell: GridCoord) -> bool {
        cell.row() == self.grid.top_row()
            || self
                .grid
                .neighbors(cell)
                .any(|neighbor| self.bubbles.contains(neighbor))
    }

    fn is_legal_destination(&self, cell: GridCoord) -> bool {
        self.grid.is_valid(cell) && !self.bubbles.contains(cell) && self.is_anchored(cell)
    }

    /// Snaps a landing position to the coordinate it should commit to.
    fn resolve_destination(&self, position: WorldPosition) -> Result<GridCoord, PlacementError> {
        let candidate = self.grid.world_to_grid(position);
        if self.is_legal_destination(candidate) {
            return Ok(candidate);
        }

        // Stable sort keeps the fixed neighbor order on equal column distance.
        let mut neighbors: Vec<GridCoord> = self.grid.neighbors(candidate).collect();
        neighbors.sort_by_key(|neighbor| (neighbor.column() - candidate.column()).abs());
        neighbors
            .into_iter()
            .find(|neighbor| self.is_legal_destination(*neighbor))
            .ok_or(PlacementError::Unresolvable)
    }

    fn land_bubble(
        &mut self,
        bubble_type: BubbleType,
        position: WorldPosition,
        out_events: &mut Vec<Event>,
    ) {
        let destination = match self.resolve_destination(position) {
            Ok(cell) => cell,
            Err(reason) => {
                out_events.push(Event::PlacementRejected { position, reason });
                return;
            }
        };

        let bubble = match self.allocate_bubble(destination, bubble_type) {
            Ok(bubble) => bubble,
            Err(error) => {
                out_events.push(Event::PlacementRejected {
                    position,
                    reason: error.rejection_reason(),
                });
                return;
            }
        };
        out_events.push(Event::BubbleLanded {
            bubble,
            cell: destination,
            bubble_type,
        });

        let cluster = search::same_type_cluster(&self.grid, &self.bubbles, destination);
        if cluster.len() >= MIN_CLUSTER_SIZE {
            let mut evicted = self.evict(&cluster);
            evicted.sort();
            out_events.push(Event::ClusterEvicted { bubbles: evicted });

            let floating = search::floating_cells(&self.grid, &self.bubbles);
            if !floating.is_empty() {
                let mut dropped = self.evict(&floating);
                dropped.sort();
                out_events.push(Event::FloatingEvicted { bubbles: dropped });
            }
        }

        self.resolve_outcome(out_events);
    }

    fn evict(&mut self, cells: &[GridCoord]) -> Vec<BubbleId> {
        cells
            .iter()
            .filter_map(|cell| self.bubbles.remove_at(*cell))
            .map(|bubble| bubble.id)
            .collect()
    }

    fn seed_board(&mut self, types: &[BubbleType], out_events: &mut Vec<Event>) {
        let mut remaining = types.iter().copied();
        let mut row = self.grid.top_row();
        'rows: while row >= 0 {
            for column in 0..self.grid.row_width(row) as i32 {
                let cell = GridCoord::new(column, row);
                if self.bubbles.contains(cell) {
                    continue;
                }
                let Some(bubble_type) = remaining.next() else {
                    break 'rows;
                };
                let Ok(bubble) = self.allocate_bubble(cell, bubble_type) else {
                    continue;
                };
                out_events.push(Event::BubblePlaced {
                    bubble,
                    cell,
                    bubble_type,
                });
            }
            row -= 1;
        }
    }

    fn append_row(&mut self, types: &[BubbleType], out_events: &mut Vec<Event>) {
        self.grid = self.grid.descended();
        self.added_rows += 1;
        out_events.push(Event::RowAppended {
            rows: self.grid.rows(),
            added_rows: self.added_rows,
        });

        let top_row = self.grid.top_row();
        let budget = self.grid.row_width(top_row) as usize;
        for (column, bubble_type) in types.iter().copied().take(budget).enumerate() {
            let cell = GridCoord::new(column as i32, top_row);
            let Ok(bubble) = self.allocate_bubble(cell, bubble_type) else {
                continue;
            };
            out_events.push(Event::BubblePlaced {
                bubble,
                cell,
                bubble_type,
            });
        }

        self.detect_loss(out_events);
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid {
            columns,
            rows,
            cell_size,
        } => {
            world.grid = HexGrid::new(columns, rows, cell_size, DEFAULT_ORIGIN);
            world.bubbles = BubbleMap::default();
            world.added_rows = 0;
            world.next_bubble_id = 0;
            world.outcome = None;
            out_events.push(Event::GridConfigured {
                columns,
                rows,
                cell_size,
            });
        }
        Command::SeedBoard { types } => {
            if world.outcome.is_none() {
                world.seed_board(&types, out_events);
            }
        }
        Command::LandBubble {
            bubble_type,
            position,
        } => {
            if world.outcome.is_none() {
                world.land_bubble(bubble_type, position, out_events);
            }
        }
        Command::AppendRow { types } => {
            if world.outcome.is_none() {
                world.append_row(&types, out_events);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{search, BubbleView, GameOutcome, HexGrid, World};
    use bubble_barrage_core::{BubbleId, BubbleType, GridCoord};

    /// Provides read-only access to the world's hex grid definition.
    #[must_use]
    pub fn grid(world: &World) -> &HexGrid {
        &world.grid
    }

    /// Reports whether the provided cell currently holds a bubble.
    #[must_use]
    pub fn is_occupied(world: &World, cell: GridCoord) -> bool {
        world.bubbles.contains(cell)
    }

    /// Returns the type carried by the bubble at the provided cell, if any.
    #[must_use]
    pub fn bubble_type_at(world: &World, cell: GridCoord) -> Option<BubbleType> {
        world.bubbles.bubble_type_at(cell)
    }

    /// Returns the cell occupied by the provided bubble, if it is placed.
    #[must_use]
    pub fn cell_of(world: &World, bubble: BubbleId) -> Option<GridCoord> {
        world.bubbles.cell_of(bubble)
    }

    /// Index of the topmost row, the anchor for ceiling connectivity.
    #[must_use]
    pub fn top_row(world: &World) -> i32 {
        world.grid.top_row()
    }

    /// Total rows appended since the grid was configured.
    #[must_use]
    pub fn added_rows(world: &World) -> u32 {
        world.added_rows
    }

    /// Terminal outcome of the session, once one has been reached.
    #[must_use]
    pub fn outcome(world: &World) -> Option<GameOutcome> {
        world.outcome
    }

    /// Captures a read-only view of every placed bubble.
    #[must_use]
    pub fn bubble_view(world: &World) -> BubbleView {
        BubbleView::from_snapshots(world.bubbles.snapshots())
    }

    /// Reports whether the provided bubble lacks an occupied path to the top
    /// row. Returns `None` when the bubble is not placed.
    #[must_use]
    pub fn is_floating(world: &World, bubble: BubbleId) -> Option<bool> {
        let cell = world.bubbles.cell_of(bubble)?;
        Some(search::floating_cells(&world.grid, &world.bubbles).contains(&cell))
    }

    /// Captures every placed bubble with no occupied path to the top row.
    #[must_use]
    pub fn floating_view(world: &World) -> BubbleView {
        let snapshots = search::floating_cells(&world.grid, &world.bubbles)
            .into_iter()
            .filter_map(|cell| world.bubbles.snapshot_at(cell))
            .collect();
        BubbleView::from_snapshots(snapshots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured_world(columns: u32, rows: u32) -> World {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ConfigureGrid {
                columns,
                rows,
                cell_size: 1.0,
            },
            &mut events,
        );
        world
    }

    fn seed(world: &mut World, types: Vec<BubbleType>) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, Command::SeedBoard { types }, &mut events);
        events
    }

    fn land_at(world: &mut World, bubble_type: BubbleType, cell: GridCoord) -> Vec<Event> {
        let position = query::grid(world).grid_to_world(cell);
        let mut events = Vec::new();
        apply(
            world,
            Command::LandBubble {
                bubble_type,
                position,
            },
            &mut events,
        );
        events
    }

    #[test]
    fn apply_configures_grid_and_resets_state() {
        let mut world = World::new();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::ConfigureGrid {
                columns: 8,
                rows: 12,
                cell_size: 0.5,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::GridConfigured {
                columns: 8,
                rows: 12,
                cell_size: 0.5,
            }]
        );
        assert_eq!(query::grid(&world).rows(), 12);
        assert_eq!(query::top_row(&world), 11);
        assert_eq!(query::added_rows(&world), 0);
        assert!(query::bubble_view(&world).is_empty());
    }

    #[test]
    fn seed_board_fills_from_the_top_row_down() {
        let mut world = configured_world(10, 16);
        let events = seed(&mut world, vec![BubbleType::Red; 21]);

        assert_eq!(events.len(), 21);
        // Row 15 is odd and holds 10 cells; the remaining 11 wrap onto row 14.
        for column in 0..10 {
            assert!(query::is_occupied(&world, GridCoord::new(column, 15)));
        }
        for column in 0..11 {
            assert!(query::is_occupied(&world, GridCoord::new(column, 14)));
        }
        assert!(!query::is_occupied(&world, GridCoord::new(0, 13)));
    }

    #[test]
    fn landing_accepts_a_legal_candidate_cell() {
        let mut world = configured_world(3, 8);
        let events = land_at(&mut world, BubbleType::Green, GridCoord::new(1, 7));

        assert_eq!(events.len(), 1);
        match &events[0] {
            Event::BubbleLanded {
                cell, bubble_type, ..
            } => {
                assert_eq!(*cell, GridCoord::new(1, 7));
                assert_eq!(*bubble_type, BubbleType::Green);
            }
            other => panic!("expected BubbleLanded, got {other:?}"),
        }
        assert_eq!(
            query::bubble_type_at(&world, GridCoord::new(1, 7)),
            Some(BubbleType::Green)
        );
    }

    #[test]
    fn landing_snaps_to_the_only_legal_neighbor() {
        let mut world = configured_world(3, 8);
        // Fill the whole top row and part of the row below it with one color
        // family the landing bubble cannot match.
        let _ = seed(&mut world, vec![BubbleType::Red; 5]);
        assert!(query::is_occupied(&world, GridCoord::new(1, 7)));
        assert!(query::is_occupied(&world, GridCoord::new(1, 6)));

        // The landing position resolves to the occupied (1, 7); the only
        // neighbor that is valid, empty, and anchored is (2, 6).
        let events = land_at(&mut world, BubbleType::Blue, GridCoord::new(1, 7));

        match &events[0] {
            Event::BubbleLanded { cell, .. } => assert_eq!(*cell, GridCoord::new(2, 6)),
            other => panic!("expected BubbleLanded, got {other:?}"),
        }
        assert_eq!(
            query::bubble_type_at(&world, GridCoord::new(2, 6)),
            Some(BubbleType::Blue)
        );
    }

    #[test]
    fn lone_landing_never_pops() {
        let mut world = configured_world(3, 8);
        let _ = seed(&mut world, vec![BubbleType::Red; 3]);

        let events = land_at(&mut world, BubbleType::Blue, GridCoord::new(0, 6));

        assert_eq!(events.len(), 1, "a single-bubble cluster must survive");
        assert_eq!(query::bubble_view(&world).len(), 4);
    }

    #[test]
    fn landing_pops_cluster_then_drops_floating_and_wins() {
        let mut world = configured_world(3, 8);
        let mut events = Vec::new();
        let position = query::grid(&world).grid_to_world(GridCoord::new(0, 7));
        apply(
            &mut world,
            Command::LandBubble {
                bubble_type: BubbleType::Red,
                position,
            },
            &mut events,
        );
        let position = query::grid(&world).grid_to_world(GridCoord::new(0, 6));
        apply(
            &mut world,
            Command::LandBubble {
                bubble_type: BubbleType::Blue,
                position,
            },
            &mut events,
        );
        events.clear();

        // Landing a second red next to (0, 7) completes the cluster; the blue
        // bubble below loses its anchor and drops; the board empties.
        let position = query::grid(&world).grid_to_world(GridCoord::new(1, 7));
        apply(
            &mut world,
            Command::LandBubble {
                bubble_type: BubbleType::Red,
                position,
            },
            &mut events,
        );

        let labels: Vec<&'static str> = events
            .iter()
            .map(|event| match event {
                Event::BubbleLanded { .. } => "landed",
                Event::ClusterEvicted { .. } => "cluster",
                Event::FloatingEvicted { .. } => "floating",
                Event::GameWon => "won",
                other => panic!("unexpected event {other:?}"),
            })
            .collect();
        assert_eq!(labels, vec!["landed", "cluster", "floating", "won"]);

        match &events[1] {
            Event::ClusterEvicted { bubbles } => assert_eq!(bubbles.len(), 2),
            other => panic!("expected ClusterEvicted, got {other:?}"),
        }
        match &events[2] {
            Event::FloatingEvicted { bubbles } => assert_eq!(bubbles.len(), 1),
            other => panic!("expected FloatingEvicted, got {other:?}"),
        }
        assert!(query::bubble_view(&world).is_empty());
        assert_eq!(query::outcome(&world), Some(GameOutcome::Won));
    }

    #[test]
    fn terminal_outcome_gates_further_gameplay_commands() {
        let mut world = configured_world(3, 8);
        let _ = land_at(&mut world, BubbleType::Red, GridCoord::new(0, 7));
        let _ = land_at(&mut world, BubbleType::Red, GridCoord::new(1, 7));
        assert_eq!(query::outcome(&world), Some(GameOutcome::Won));

        let landing = land_at(&mut world, BubbleType::Blue, GridCoord::new(0, 7));
        assert!(landing.is_empty(), "won sessions ignore landings");

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::AppendRow {
                types: vec![BubbleType::Gray; 3],
            },
            &mut events,
        );
        assert!(events.is_empty(), "won sessions ignore row appends");
        assert!(query::bubble_view(&world).is_empty());
    }

    #[test]
    fn landing_without_support_is_rejected_without_mutation() {
        let mut world = configured_world(3, 8);

        let events = land_at(&mut world, BubbleType::Green, GridCoord::new(1, 1));

        assert_eq!(events.len(), 1);
        match &events[0] {
            Event::PlacementRejected { reason, .. } => {
                assert_eq!(*reason, PlacementError::Unresolvable);
            }
            other => panic!("expected PlacementRejected, got {other:?}"),
        }
        assert!(query::bubble_view(&world).is_empty());
    }

    #[test]
    fn no_occupied_cell_floats_after_resolution() {
        let mut world = configured_world(4, 6);
        let _ = seed(
            &mut world,
            vec![
                BubbleType::Red,
                BubbleType::Blue,
                BubbleType::Red,
                BubbleType::Green,
                BubbleType::Blue,
                BubbleType::Blue,
                BubbleType::Yellow,
            ],
        );
        let _ = land_at(&mut world, BubbleType::Blue, GridCoord::new(0, 4));

        assert!(
            search::floating_cells(&world.grid, &world.bubbles).is_empty(),
            "every surviving bubble must stay ceiling-connected",
        );
    }

    #[test]
    fn append_row_descends_board_and_populates_the_new_top() {
        let mut world = configured_world(10, 16);
        let _ = seed(&mut world, vec![BubbleType::Red; 10]);
        let anchored = query::bubble_view(&world).into_vec();

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::AppendRow {
                types: vec![BubbleType::Gray; 11],
            },
            &mut events,
        );

        assert_eq!(query::grid(&world).rows(), 17);
        assert_eq!(query::added_rows(&world), 1);
        assert_eq!(
            events[0],
            Event::RowAppended {
                rows: 17,
                added_rows: 1,
            }
        );

        // Existing bubbles keep their coordinates.
        for snapshot in &anchored {
            assert_eq!(query::cell_of(&world, snapshot.id), Some(snapshot.cell));
        }
        // The new top row is even (index 16) and holds eleven cells.
        for column in 0..11 {
            assert_eq!(
                query::bubble_type_at(&world, GridCoord::new(column, 16)),
                Some(BubbleType::Gray)
            );
        }
    }

    #[test]
    fn append_row_clamps_generation_to_the_row_width() {
        let mut world = configured_world(3, 5);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::AppendRow {
                types: vec![BubbleType::Green; 9],
            },
            &mut events,
        );

        // The new top row has index 5, odd parity, and only three cells.
        let placed = events
            .iter()
            .filter(|event| matches!(event, Event::BubblePlaced { .. }))
            .count();
        assert_eq!(placed, 3);
        assert!(!query::is_occupied(&world, GridCoord::new(3, 5)));
    }

    #[test]
    fn append_row_reports_loss_when_the_board_reaches_the_line() {
        let mut world = configured_world(3, 6);
        // Rows 5 and 4 hold seven cells; the lowest seeded bubble sits at
        // row 4, one above the opening loss line.
        let _ = seed(&mut world, vec![BubbleType::Red; 7]);
        assert_eq!(query::outcome(&world), None);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::AppendRow {
                types: vec![BubbleType::Blue; 3],
            },
            &mut events,
        );

        assert_eq!(query::outcome(&world), Some(GameOutcome::Lost));
        assert_eq!(events.last(), Some(&Event::GameLost));
    }

    #[test]
    fn landing_reports_loss_when_the_lowest_bubble_is_out_of_bounds() {
        let mut world = configured_world(3, 5);
        // Top row 4 holds four cells, then (0, 3) lands on the loss line.
        let _ = seed(&mut world, vec![BubbleType::Red; 5]);
        assert_eq!(query::outcome(&world), None);

        let events = land_at(&mut world, BubbleType::Gray, GridCoord::new(1, 3));

        assert_eq!(events.last(), Some(&Event::GameLost));
        assert_eq!(query::outcome(&world), Some(GameOutcome::Lost));
    }

    #[test]
    fn floating_queries_expose_connectivity() {
        let mut world = configured_world(3, 8);
        // Bypass placement to build a board with a detached pocket.
        world
            .bubbles
            .insert(BubbleSnapshot {
                id: BubbleId::new(0),
                cell: GridCoord::new(0, 7),
                bubble_type: BubbleType::Red,
            })
            .expect("top-row cell is vacant");
        world
            .bubbles
            .insert(BubbleSnapshot {
                id: BubbleId::new(1),
                cell: GridCoord::new(1, 1),
                bubble_type: BubbleType::Blue,
            })
            .expect("pocket cell is vacant");

        assert_eq!(query::is_floating(&world, BubbleId::new(0)), Some(false));
        assert_eq!(query::is_floating(&world, BubbleId::new(1)), Some(true));
        assert_eq!(query::is_floating(&world, BubbleId::new(9)), None);

        let floating = query::floating_view(&world).into_vec();
        assert_eq!(floating.len(), 1);
        assert_eq!(floating[0].cell, GridCoord::new(1, 1));
    }

    #[test]
    fn occupancy_map_refuses_double_insert() {
        let mut bubbles = BubbleMap::default();
        let cell = GridCoord::new(2, 2);
        bubbles
            .insert(BubbleSnapshot {
                id: BubbleId::new(0),
                cell,
                bubble_type: BubbleType::Red,
            })
            .expect("first insert succeeds");

        let refused = bubbles.insert(BubbleSnapshot {
            id: BubbleId::new(1),
            cell,
            bubble_type: BubbleType::Blue,
        });

        assert_eq!(refused, Err(OccupancyError::Occupied(cell)));
        assert_eq!(bubbles.occupant(cell), Some(BubbleId::new(0)));
        assert_eq!(
            refused.unwrap_err().rejection_reason(),
            PlacementError::Occupied
        );
    }

    #[test]
    fn occupancy_map_keeps_reverse_index_in_step() {
        let mut bubbles = BubbleMap::default();
        let cell = GridCoord::new(1, 3);
        bubbles
            .insert(BubbleSnapshot {
                id: BubbleId::new(7),
                cell,
                bubble_type: BubbleType::Yellow,
            })
            .expect("insert succeeds");
        assert_eq!(bubbles.cell_of(BubbleId::new(7)), Some(cell));

        let removed = bubbles.remove_at(cell).expect("bubble present");
        assert_eq!(removed.id, BubbleId::new(7));
        assert_eq!(bubbles.cell_of(BubbleId::new(7)), None);
        assert!(bubbles.is_empty());
    }
}
