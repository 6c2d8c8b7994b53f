//! Geometry of the physical LED grid and the centered capture sub-grid.

use std::path::PathBuf;

use heapless::Vec;

/// Side length of the physical LED grid
pub const GRID_SIZE: u8 = 8;

/// Number of addressable LEDs in the physical grid
pub const GRID_CELLS: usize = GRID_SIZE as usize * GRID_SIZE as usize;

/// Coordinate of a single LED in the physical grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCoord {
    pub row: u8,
    pub col: u8,
}

impl GridCoord {
    /// Returns `None` if the coordinate lies outside the physical grid
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if row < GRID_SIZE && col < GRID_SIZE {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// Flat strip index, `row * 8 + col`
    pub const fn flat_index(self) -> usize {
        self.row as usize * GRID_SIZE as usize + self.col as usize
    }
}

/// Number of LEDs lit during a capture run
///
/// Always a positive perfect square that fits in the physical grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveLedCount(u8);

impl ActiveLedCount {
    /// Validate a requested count. Never coerces.
    pub fn new(count: i64) -> Option<Self> {
        let count = u8::try_from(count).ok()?;
        if count == 0 || usize::from(count) > GRID_CELLS {
            return None;
        }
        let side = count.isqrt();
        if side * side != count {
            return None;
        }
        Some(Self(count))
    }

    pub const fn count(self) -> u8 {
        self.0
    }

    /// Side length of the square sub-grid
    pub const fn side(self) -> u8 {
        self.0.isqrt()
    }
}

impl Default for ActiveLedCount {
    fn default() -> Self {
        Self(4)
    }
}

/// Ordered set of coordinates lit during one capture run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubGridPlan {
    side: u8,
    start: u8,
    coords: Vec<GridCoord, GRID_CELLS>,
}

impl SubGridPlan {
    pub const fn side(&self) -> u8 {
        self.side
    }

    /// First row (and column) covered by the plan
    pub const fn start(&self) -> u8 {
        self.start
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = GridCoord> + '_ {
        self.coords.iter().copied()
    }

    pub fn contains(&self, coord: GridCoord) -> bool {
        self.coords.contains(&coord)
    }

    pub fn coords(&self) -> &[GridCoord] {
        &self.coords
    }
}

/// Compute the centered square of `count` LEDs on a `grid_size` grid
///
/// The start offset uses integer division, so when `grid_size - side` is odd
/// the square sits one cell closer to index 0. `grid_size` is clamped to the
/// physical grid and must be at least the side of `count`. The plan always
/// holds exactly `count` coordinates.
pub fn compute_sub_grid_plan(count: ActiveLedCount, grid_size: u8) -> SubGridPlan {
    let grid_size = grid_size.min(GRID_SIZE);
    let side = count.side();
    debug_assert!(
        side <= grid_size,
        "{}-LED square does not fit a {grid_size}x{grid_size} grid",
        count.count()
    );
    let start = grid_size.saturating_sub(side) / 2;

    let mut coords = Vec::new();
    for row in start..start + side {
        for col in start..start + side {
            // Capacity equals the physical grid, so this never overflows
            let _ = coords.push(GridCoord { row, col });
        }
    }

    SubGridPlan {
        side,
        start,
        coords,
    }
}

/// File name a frame for `coord` is saved under
pub fn frame_file_name(coord: GridCoord) -> String {
    format!("led_r{}_c{}.jpg", coord.row, coord.col)
}

/// Provenance of one captured image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureFrame {
    pub coord: GridCoord,
    pub flat_index: usize,
    pub path: PathBuf,
}
