//! Uniform grid over the field for fuel proximity queries
//!
//! Rebuilt from scratch every tick. A query scans only the 3x3 block of
//! cells around the query point; configuration validation guarantees a cell
//! is at least as large as any robot's collection range, so nothing outside
//! that block can be in range.

use crate::util::vec2::Vec2;
use hashbrown::HashMap;

/// Initial capacity for fuel index vectors within cells
const CELL_INITIAL_CAPACITY: usize = 32;

/// Grid cell key - (column, row)
pub type CellKey = (i32, i32);

/// Spatial grid of fuel indices
#[derive(Debug, Clone)]
pub struct FuelGrid {
    columns: i32,
    rows: i32,
    /// Inverse cell size for fast position-to-cell conversion
    inv_cell_width: f32,
    inv_cell_length: f32,
    /// Map from cell key to indices into the manager's fuel list
    cells: HashMap<CellKey, Vec<usize>>,
    /// Pre-allocated neighbor offsets for 9-cell query
    neighbor_offsets: [(i32, i32); 9],
}

impl FuelGrid {
    pub fn new(width: f32, length: f32, columns: usize, rows: usize) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);
        Self {
            columns: columns as i32,
            rows: rows as i32,
            inv_cell_width: columns as f32 / width,
            inv_cell_length: rows as f32 / length,
            cells: HashMap::with_capacity(columns * rows),
            neighbor_offsets: [
                (-1, -1), (0, -1), (1, -1),
                (-1,  0), (0,  0), (1,  0),
                (-1,  1), (0,  1), (1,  1),
            ],
        }
    }

    /// Empty every cell, keeping allocations
    #[inline]
    pub fn clear(&mut self) {
        for cell in self.cells.values_mut() {
            cell.clear();
        }
    }

    /// Cell containing `position`, clamped onto the grid
    #[inline]
    pub fn cell_of(&self, position: Vec2) -> CellKey {
        let col = (position.x * self.inv_cell_width).floor() as i32;
        let row = (position.y * self.inv_cell_length).floor() as i32;
        (col.clamp(0, self.columns - 1), row.clamp(0, self.rows - 1))
    }

    #[inline]
    pub fn insert(&mut self, index: usize, position: Vec2) {
        let key = self.cell_of(position);
        self.cells
            .entry(key)
            .or_insert_with(|| Vec::with_capacity(CELL_INITIAL_CAPACITY))
            .push(index);
    }

    /// Rebuild the grid from `(index, position)` pairs
    pub fn rebuild(&mut self, entries: impl Iterator<Item = (usize, Vec2)>) {
        self.clear();
        for (index, position) in entries {
            self.insert(index, position);
        }
    }

    /// Indices in the 3x3 block around `position`; empty cells yield nothing
    pub fn query_neighborhood(&self, position: Vec2) -> impl Iterator<Item = usize> + '_ {
        let (cx, cy) = self.cell_of(position);
        self.neighbor_offsets.iter().flat_map(move |&(dx, dy)| {
            self.cells
                .get(&(cx + dx, cy + dy))
                .into_iter()
                .flat_map(|cell| cell.iter().copied())
        })
    }

    /// Occupancy of one cell
    pub fn count_in(&self, key: CellKey) -> usize {
        self.cells.get(&key).map_or(0, Vec::len)
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.columns as usize, self.rows as usize)
    }

    /// Get statistics about the grid
    pub fn stats(&self) -> FuelGridStats {
        let non_empty_cells = self.cells.values().filter(|c| !c.is_empty()).count();
        let total_entries: usize = self.cells.values().map(Vec::len).sum();
        let max_per_cell = self.cells.values().map(Vec::len).max().unwrap_or(0);

        FuelGridStats {
            non_empty_cells,
            total_entries,
            max_per_cell,
        }
    }
}

/// Statistics about the fuel grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuelGridStats {
    pub non_empty_cells: usize,
    pub total_entries: usize,
    pub max_per_cell: usize,
}
