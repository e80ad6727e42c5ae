// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Pathfinding over a [`TileGrid`].
//!
//! Both searches expand only within the grid's bounding box widened by one cell, and
//! only through tiles the caller's predicate accepts. The destination of
//! [`TileGrid::shortest_path`] is exempt from the predicate so a route *to* a wall
//! (or any other special tile) can still be planned.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::error::Error;
use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::grid::{GridId, Point, Tile, TileGrid};

/// Misuse of the grid API detected at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// A [`Tile`] issued by one grid was passed to another.
    CrossGrid {
        /// Identity of the grid the operation ran on.
        expected: GridId,
        /// Identity of the grid that issued the tile.
        got: GridId,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::CrossGrid { expected, got } => {
                write!(f, "tile from grid {got:?} used with grid {expected:?}")
            }
        }
    }
}

impl Error for GridError {}

impl TileGrid {
    fn check(&self, tile: Tile) -> Result<Point, GridError> {
        if tile.grid == self.id() {
            Ok(tile.pos)
        } else {
            Err(GridError::CrossGrid {
                expected: self.id(),
                got: tile.grid,
            })
        }
    }

    /// Shortest orthogonal path from `source` to `dest`, inclusive of both, through
    /// tiles `walkable` accepts. Returns `Ok(None)` when no such path exists.
    ///
    /// A* with the Manhattan heuristic; ties broken toward the node nearer the
    /// destination. The heap holds duplicates instead of re-prioritizing, and stale
    /// entries are skipped on pop.
    pub fn shortest_path(
        &self,
        source: Tile,
        dest: Tile,
        walkable: impl Fn(i64) -> bool,
    ) -> Result<Option<Vec<Point>>, GridError> {
        let src = self.check(source)?;
        let dst = self.check(dest)?;

        if src == dst {
            return Ok(Some(vec![src]));
        }
        if src.manhattan(dst) == 1 {
            return Ok(Some(vec![src, dst]));
        }
        let Some(scan) = self.bounds().map(|b| b.expand(1)) else {
            return Ok(None);
        };

        // (f, h, point) in a min-heap; g is recovered as f - h
        let mut open = BinaryHeap::new();
        let mut best: FxHashMap<Point, (i64, Point)> = FxHashMap::default();
        let mut visited: FxHashSet<Point> = FxHashSet::default();

        open.push(Reverse((src.manhattan(dst), src.manhattan(dst), src)));
        while let Some(Reverse((f, h, p))) = open.pop() {
            if !visited.insert(p) {
                continue;
            }
            if p == dst {
                break;
            }
            let g = f - h;
            for n in p.neighbors() {
                if n != dst && !(scan.contains(n) && walkable(self.get(n))) {
                    continue;
                }
                if visited.contains(&n) {
                    continue;
                }
                let ng = g + 1;
                if best.get(&n).map_or(true, |&(old, _)| ng < old) {
                    best.insert(n, (ng, p));
                    let nh = n.manhattan(dst);
                    open.push(Reverse((ng + nh, nh, n)));
                }
            }
        }

        if !visited.contains(&dst) {
            return Ok(None);
        }
        let mut path = vec![dst];
        let mut cursor = dst;
        while cursor != src {
            cursor = best[&cursor].1;
            path.push(cursor);
        }
        path.reverse();
        Ok(Some(path))
    }

    /// Dijkstra flood from `source` through tiles `walkable` accepts. The returned
    /// grid stores `distance + 1` at each reached point (so the source holds 1 and
    /// unreached points read 0).
    pub fn distance_map(
        &self,
        source: Tile,
        walkable: impl Fn(i64) -> bool,
    ) -> Result<TileGrid, GridError> {
        let src = self.check(source)?;
        let scan = self.bounds().map(|b| b.expand(1));

        let mut out = TileGrid::new();
        let mut open = BinaryHeap::new();
        open.push(Reverse((0i64, src)));
        while let Some(Reverse((dist, p))) = open.pop() {
            if out.get(p) != 0 {
                continue;
            }
            out.set(p, dist + 1);
            for n in p.neighbors() {
                if out.get(n) == 0
                    && scan.is_some_and(|b| b.contains(n))
                    && walkable(self.get(n))
                {
                    open.push(Reverse((dist + 1, n)));
                }
            }
        }
        Ok(out)
    }
}
