// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Hull-painting robot peripheral.
//!
//! The program reads the color under the robot, then emits a color to paint followed
//! by a turn direction (0 left, 1 right); the robot moves one cell forward after each
//! turn.

use rustc_hash::FxHashSet;

use crate::device::Device;
use crate::grid::{Point, TileGrid};

/// An unpainted (or black-painted) panel.
pub const COLOR_BLACK: i64 = 0;
/// A white-painted panel.
pub const COLOR_WHITE: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Heading {
    Up,
    Right,
    Down,
    Left,
}

impl Heading {
    fn left(self) -> Self {
        match self {
            Heading::Up => Heading::Left,
            Heading::Left => Heading::Down,
            Heading::Down => Heading::Right,
            Heading::Right => Heading::Up,
        }
    }

    fn right(self) -> Self {
        match self {
            Heading::Up => Heading::Right,
            Heading::Right => Heading::Down,
            Heading::Down => Heading::Left,
            Heading::Left => Heading::Up,
        }
    }

    // up is toward smaller y, matching row-major rendering
    fn delta(self) -> (i32, i32) {
        match self {
            Heading::Up => (0, -1),
            Heading::Right => (1, 0),
            Heading::Down => (0, 1),
            Heading::Left => (-1, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expecting {
    Paint,
    Turn,
}

/// Device driving a paint robot over a hull grid.
#[derive(Debug)]
pub struct PaintRobot {
    hull: TileGrid,
    painted: FxHashSet<Point>,
    pos: Point,
    heading: Heading,
    expecting: Expecting,
}

impl PaintRobot {
    /// Robot at the origin on an all-black hull.
    pub fn new() -> Self {
        Self {
            hull: TileGrid::new(),
            painted: FxHashSet::default(),
            pos: Point::new(0, 0),
            heading: Heading::Up,
            expecting: Expecting::Paint,
        }
    }

    /// Robot at the origin with the starting panel already white. The pre-painted
    /// panel doesn't count toward [`painted_count`](Self::painted_count).
    pub fn starting_on_white() -> Self {
        let mut robot = Self::new();
        robot.hull.set(robot.pos, COLOR_WHITE);
        robot
    }

    /// Number of distinct panels the program painted at least once.
    pub fn painted_count(&self) -> usize {
        self.painted.len()
    }

    /// The hull grid of panel colors.
    pub fn hull(&self) -> &TileGrid {
        &self.hull
    }

    /// Where the robot currently stands.
    pub fn position(&self) -> Point {
        self.pos
    }
}

impl Default for PaintRobot {
    fn default() -> Self {
        Self::new()
    }
}

impl Device for PaintRobot {
    fn input(&mut self) -> Option<i64> {
        Some(self.hull.get(self.pos))
    }

    fn output(&mut self, value: i64) {
        match self.expecting {
            Expecting::Paint => {
                self.hull.set(self.pos, value);
                self.painted.insert(self.pos);
                self.expecting = Expecting::Turn;
            }
            Expecting::Turn => {
                self.heading = if value == 0 {
                    self.heading.left()
                } else {
                    self.heading.right()
                };
                let (dx, dy) = self.heading.delta();
                self.pos = Point::new(self.pos.x + dx, self.pos.y + dy);
                self.expecting = Expecting::Paint;
            }
        }
    }
}
