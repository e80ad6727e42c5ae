// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Sparse 2D tile grid with a bounding box maintained over nonzero writes.
//!
//! Cells default to 0 ("unknown"); writing 0 somewhere never grows the box. The box
//! drives rendering and scopes the pathfinding in [`crate::path`].

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use rustc_hash::FxHashMap;

// base64 alphabet, so up to 64 distinct nonzero tile kinds render distinctly
const DISPLAY_CHARS: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// A grid coordinate. `y` grows downward, matching row-major rendering.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Point {
    /// Point at `(x, y)`.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance, computed in i64 so opposite extremes can't overflow.
    pub fn manhattan(self, other: Self) -> i64 {
        (i64::from(self.x) - i64::from(other.x)).abs()
            + (i64::from(self.y) - i64::from(other.y)).abs()
    }

    /// The four orthogonal neighbors.
    pub fn neighbors(self) -> [Self; 4] {
        [
            Self::new(self.x - 1, self.y),
            Self::new(self.x + 1, self.y),
            Self::new(self.x, self.y - 1),
            Self::new(self.x, self.y + 1),
        ]
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Identity tag distinguishing grids, so that [`Tile`] handles can't be replayed
/// against a different grid. Cloning a grid mints a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridId(u64);

/// A position bound to the grid that issued it. Obtained from [`TileGrid::tile`];
/// consumed by the pathfinding entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub(crate) grid: GridId,
    /// The wrapped coordinate.
    pub pos: Point,
}

/// Inclusive bounding box over the nonzero cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    /// Leftmost column.
    pub min_x: i32,
    /// Topmost row.
    pub min_y: i32,
    /// Rightmost column.
    pub max_x: i32,
    /// Bottommost row.
    pub max_y: i32,
}

impl Bounds {
    fn at(p: Point) -> Self {
        Self {
            min_x: p.x,
            min_y: p.y,
            max_x: p.x,
            max_y: p.y,
        }
    }

    fn grow(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    /// The box widened by `margin` cells in every direction.
    pub fn expand(self, margin: i32) -> Self {
        Self {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    /// Whether `p` falls inside the box, edges included.
    pub fn contains(&self, p: Point) -> bool {
        (self.min_x..=self.max_x).contains(&p.x) && (self.min_y..=self.max_y).contains(&p.y)
    }
}

/// Unbounded grid of `i64` tiles, stored sparsely.
#[derive(Debug)]
pub struct TileGrid {
    id: GridId,
    tiles: FxHashMap<Point, i64>,
    bounds: Option<Bounds>,
}

impl TileGrid {
    /// Empty grid with a fresh identity.
    pub fn new() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self {
            id: GridId(NEXT.fetch_add(1, Ordering::Relaxed)),
            tiles: FxHashMap::default(),
            bounds: None,
        }
    }

    pub(crate) fn id(&self) -> GridId {
        self.id
    }

    /// The value at `p`, 0 if never written.
    pub fn get(&self, p: Point) -> i64 {
        self.tiles.get(&p).copied().unwrap_or(0)
    }

    /// Write `value` at `p`. Nonzero writes extend the bounding box; zero writes are
    /// stored but leave the box alone.
    pub fn set(&mut self, p: Point, value: i64) {
        self.tiles.insert(p, value);
        if value != 0 {
            match &mut self.bounds {
                Some(b) => b.grow(p),
                None => self.bounds = Some(Bounds::at(p)),
            }
        }
    }

    /// Drop every tile and the bounding box. The grid keeps its identity, so
    /// previously issued [`Tile`] handles stay valid.
    pub fn clear(&mut self) {
        self.tiles.clear();
        self.bounds = None;
    }

    /// Bind `p` to this grid for use with the pathfinding entry points.
    pub fn tile(&self, p: Point) -> Tile {
        Tile { grid: self.id, pos: p }
    }

    /// The bounding box of nonzero writes, `None` while the grid is all zeroes.
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Row-major scan over the bounding box expanded by one, yielding the points the
    /// predicate accepts. Empty when there is no bounding box.
    pub fn find<'a>(
        &'a self,
        predicate: impl Fn(Point, i64) -> bool + 'a,
    ) -> impl Iterator<Item = Point> + 'a {
        let scan = self.bounds.map(|b| b.expand(1));
        scan.into_iter().flat_map(move |b| {
            (b.min_y..=b.max_y).flat_map(move |y| (b.min_x..=b.max_x).map(move |x| Point::new(x, y)))
        })
        .filter(move |&p| predicate(p, self.get(p)))
    }

    /// Render the exact bounding box, one row per line, mapping each value through
    /// `style`. The empty grid renders as the empty string.
    pub fn render_with(&self, style: impl Fn(i64) -> char) -> String {
        let Some(b) = self.bounds else {
            return String::new();
        };
        let mut out = String::with_capacity(
            ((b.max_x - b.min_x + 2) as usize) * ((b.max_y - b.min_y + 1) as usize),
        );
        for y in b.min_y..=b.max_y {
            for x in b.min_x..=b.max_x {
                out.push(style(self.get(Point::new(x, y))));
            }
            out.push('\n');
        }
        out
    }
}

impl Default for TileGrid {
    fn default() -> Self {
        Self::new()
    }
}

// a clone is a distinct grid, so it mints a fresh id
impl Clone for TileGrid {
    fn clone(&self) -> Self {
        let mut fresh = Self::new();
        fresh.tiles = self.tiles.clone();
        fresh.bounds = self.bounds;
        fresh
    }
}

impl fmt::Display for TileGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with(|v| {
            if v == 0 {
                ' '
            } else {
                DISPLAY_CHARS[((v - 1) & 63) as usize] as char
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwritten_tiles_read_zero() {
        let grid = TileGrid::new();
        assert_eq!(grid.get(Point::new(-7, 300)), 0);
        assert_eq!(grid.bounds(), None);
    }

    #[test]
    fn only_nonzero_writes_grow_the_box() {
        let mut grid = TileGrid::new();
        grid.set(Point::new(100, 100), 0);
        assert_eq!(grid.bounds(), None);

        grid.set(Point::new(2, 3), 5);
        grid.set(Point::new(-1, 4), 1);
        grid.set(Point::new(50, -50), 0);
        assert_eq!(
            grid.bounds(),
            Some(Bounds {
                min_x: -1,
                min_y: 3,
                max_x: 2,
                max_y: 4
            })
        );
    }

    #[test]
    fn find_scans_the_expanded_box_row_major() {
        let mut grid = TileGrid::new();
        grid.set(Point::new(0, 0), 9);
        // box is the single cell; the scan covers the 3x3 ring around it
        let zeroes: Vec<Point> = grid.find(|_, v| v == 0).collect();
        assert_eq!(zeroes.len(), 8);
        assert_eq!(zeroes[0], Point::new(-1, -1));
        assert_eq!(zeroes[7], Point::new(1, 1));
        assert_eq!(
            grid.find(|_, v| v == 9).collect::<Vec<_>>(),
            [Point::new(0, 0)]
        );
    }

    #[test]
    fn display_uses_the_64_char_alphabet() {
        let mut grid = TileGrid::new();
        grid.set(Point::new(0, 0), 1);
        grid.set(Point::new(1, 0), 2);
        grid.set(Point::new(3, 0), 64);
        grid.set(Point::new(4, 0), 65);
        assert_eq!(grid.to_string(), "AB /A\n");
    }

    #[test]
    fn render_with_custom_style() {
        let mut grid = TileGrid::new();
        grid.set(Point::new(0, 0), 2);
        grid.set(Point::new(1, 1), 1);
        let s = grid.render_with(|v| match v {
            2 => '#',
            1 => '.',
            _ => ' ',
        });
        assert_eq!(s, "# \n .\n");
    }

    #[test]
    fn clone_mints_a_fresh_identity() {
        let grid = TileGrid::new();
        let copy = grid.clone();
        assert_ne!(grid.id(), copy.id());
    }

    #[test]
    fn clear_keeps_identity() {
        let mut grid = TileGrid::new();
        let t = grid.tile(Point::new(1, 1));
        grid.set(Point::new(1, 1), 3);
        grid.clear();
        assert_eq!(grid.bounds(), None);
        assert_eq!(grid.tile(Point::new(1, 1)), t);
    }
}
