// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Maze-exploring repair droid peripheral.
//!
//! The program accepts movement commands (1 north, 2 south, 3 west, 4 east) and
//! reports 0 (blocked by a wall), 1 (moved), or 2 (moved onto the vent). The droid
//! explores the maze on its own: it repeatedly routes itself to the cheapest frontier
//! tile until no frontier remains, then suspends the machine by refusing input.

use std::collections::VecDeque;

use crate::device::Device;
use crate::grid::{Point, TileGrid};

/// Never visited or probed.
pub const TILE_UNKNOWN: i64 = 0;
/// Open floor.
pub const TILE_EMPTY: i64 = 1;
/// Wall the droid bounced off.
pub const TILE_WALL: i64 = 2;
/// The oxygen-system vent.
pub const TILE_VENT: i64 = 3;
/// The droid's starting cell.
pub const TILE_START: i64 = 4;
/// The droid's current cell.
pub const TILE_DROID: i64 = 5;

/// Whether the droid can stand on a tile with this id.
pub fn walkable(id: i64) -> bool {
    matches!(id, TILE_EMPTY | TILE_VENT | TILE_START | TILE_DROID)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Move {
    North = 1,
    South = 2,
    West = 3,
    East = 4,
}

impl Move {
    // north is toward smaller y, matching row-major rendering
    fn delta(self) -> (i32, i32) {
        match self {
            Move::North => (0, -1),
            Move::South => (0, 1),
            Move::West => (-1, 0),
            Move::East => (1, 0),
        }
    }

    fn toward(from: Point, to: Point) -> Option<Self> {
        match (to.x - from.x, to.y - from.y) {
            (0, -1) => Some(Move::North),
            (0, 1) => Some(Move::South),
            (-1, 0) => Some(Move::West),
            (1, 0) => Some(Move::East),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Searching,
    Walking,
    Done,
}

/// Device exploring the maze a repair-droid program defines.
#[derive(Debug)]
pub struct RepairDroid {
    maze: TileGrid,
    pos: Point,
    standing_on: i64,
    pending: Option<Move>,
    route: VecDeque<Point>,
    phase: Phase,
    vent: Option<Point>,
}

impl RepairDroid {
    /// Droid at the start cell of an entirely unknown maze.
    pub fn new() -> Self {
        let mut maze = TileGrid::new();
        let pos = Point::new(0, 0);
        maze.set(pos, TILE_DROID);
        Self {
            maze,
            pos,
            standing_on: TILE_START,
            pending: None,
            route: VecDeque::new(),
            phase: Phase::Searching,
            vent: None,
        }
    }

    /// Unknown tiles adjacent to somewhere the droid could stand.
    fn frontier(&self) -> Vec<Point> {
        self.maze
            .find(|p, v| {
                v == TILE_UNKNOWN && p.neighbors().iter().any(|&n| walkable(self.maze.get(n)))
            })
            .collect()
    }

    /// Decide the next move, replanning as needed. `None` means the maze is fully
    /// explored.
    fn plan(&mut self) -> Option<Move> {
        let origin = self.maze.tile(Point::new(0, 0));
        loop {
            match self.phase {
                Phase::Done => return None,
                Phase::Searching => {
                    let mut best: Option<(i64, Vec<Point>)> = None;
                    for target in self.frontier() {
                        let target = self.maze.tile(target);
                        let from_origin = self
                            .maze
                            .shortest_path(origin, target, walkable)
                            .expect("tiles come from this maze");
                        let from_droid = self
                            .maze
                            .shortest_path(self.maze.tile(self.pos), target, walkable)
                            .expect("tiles come from this maze");
                        let (Some(from_origin), Some(from_droid)) = (from_origin, from_droid)
                        else {
                            continue;
                        };
                        // revisiting cells is cheap, uncovering distant regions is not
                        let score = 2 * from_origin.len() as i64 + from_droid.len() as i64;
                        if best.as_ref().map_or(true, |&(s, _)| score < s) {
                            best = Some((score, from_droid));
                        }
                    }
                    match best {
                        Some((_, route)) => {
                            self.route = route.into_iter().skip(1).collect();
                            self.phase = Phase::Walking;
                        }
                        None => self.phase = Phase::Done,
                    }
                }
                Phase::Walking => match self.route.pop_front() {
                    Some(next) => return Move::toward(self.pos, next),
                    None => self.phase = Phase::Searching,
                },
            }
        }
    }

    /// The maze discovered so far.
    pub fn maze(&self) -> &TileGrid {
        &self.maze
    }

    /// Where the droid currently stands.
    pub fn position(&self) -> Point {
        self.pos
    }

    /// Where the vent was found, once the droid has stepped onto it.
    pub fn vent(&self) -> Option<Point> {
        self.vent
    }

    /// Whether every reachable tile has been discovered.
    pub fn fully_explored(&self) -> bool {
        self.phase == Phase::Done
    }
}

impl Default for RepairDroid {
    fn default() -> Self {
        Self::new()
    }
}

impl Device for RepairDroid {
    fn input(&mut self) -> Option<i64> {
        let mv = self.plan()?;
        self.pending = Some(mv);
        Some(mv as i64)
    }

    fn output(&mut self, value: i64) {
        let Some(mv) = self.pending.take() else {
            return;
        };
        let (dx, dy) = mv.delta();
        let target = Point::new(self.pos.x + dx, self.pos.y + dy);
        if value == 0 {
            self.maze.set(target, TILE_WALL);
            // a wall can only end a route, but replan to be sure
            self.route.clear();
            if self.phase == Phase::Walking {
                self.phase = Phase::Searching;
            }
            return;
        }
        self.maze.set(self.pos, self.standing_on);
        self.pos = target;
        self.standing_on = if value == 2 {
            self.vent = Some(target);
            TILE_VENT
        } else {
            match self.maze.get(target) {
                TILE_UNKNOWN => TILE_EMPTY,
                known => known,
            }
        };
        self.maze.set(target, TILE_DROID);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    // 'S' is the droid's start at world (0, 0); y grows downward.
    const MAP: [&str; 5] = [
        "#####", //
        "#S..#",
        "#.#.#",
        "#V..#",
        "#####",
    ];

    fn parse_map() -> (FxHashSet<Point>, Point) {
        let mut walls = FxHashSet::default();
        let mut vent = None;
        for (y, row) in MAP.iter().enumerate() {
            for (x, ch) in row.bytes().enumerate() {
                let world = Point::new(x as i32 - 1, y as i32 - 1);
                match ch {
                    b'#' => {
                        walls.insert(world);
                    }
                    b'V' => vent = Some(world),
                    b'S' => assert_eq!(world, Point::new(0, 0)),
                    _ => (),
                }
            }
        }
        (walls, vent.unwrap())
    }

    /// Drive the droid directly, playing the maze oracle ourselves.
    fn explore() -> RepairDroid {
        let (walls, vent) = parse_map();
        let mut droid = RepairDroid::new();
        let mut oracle = Point::new(0, 0);
        let mut steps = 0;
        while let Some(code) = droid.input() {
            steps += 1;
            assert!(steps < 10_000, "exploration does not terminate");
            let (dx, dy) = match code {
                1 => (0, -1),
                2 => (0, 1),
                3 => (-1, 0),
                4 => (1, 0),
                other => panic!("bad movement command {other}"),
            };
            let target = Point::new(oracle.x + dx, oracle.y + dy);
            if walls.contains(&target) {
                droid.output(0);
            } else {
                oracle = target;
                droid.output(if target == vent { 2 } else { 1 });
            }
        }
        droid
    }

    #[test]
    fn explores_the_whole_maze_and_finds_the_vent() {
        let droid = explore();
        assert!(droid.fully_explored());
        assert_eq!(droid.vent(), Some(Point::new(0, 2)));
        // all 8 open cells discovered
        let open = droid.maze().find(|_, v| walkable(v)).count();
        assert_eq!(open, 8);
        assert_eq!(droid.maze().get(Point::new(1, 1)), TILE_WALL);
    }

    #[test]
    fn discovered_maze_supports_pathfinding() {
        let droid = explore();
        let maze = droid.maze();
        let vent = droid.vent().unwrap();
        let path = maze
            .shortest_path(maze.tile(Point::new(0, 0)), maze.tile(vent), walkable)
            .unwrap()
            .unwrap();
        assert_eq!(path.len(), 3);

        // farthest open cell from the vent is (2, 0), 4 steps away
        let dmap = maze.distance_map(maze.tile(vent), walkable).unwrap();
        let max = maze
            .find(|p, v| walkable(v) && dmap.get(p) != 0)
            .map(|p| dmap.get(p))
            .max()
            .unwrap();
        assert_eq!(max, 5);
        assert_eq!(dmap.get(Point::new(2, 0)), 5);
    }
}
