// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Arcade cabinet peripheral.
//!
//! The program emits draw commands as output triples `(x, y, tile)`; the triple
//! `(-1, 0, score)` updates the score display instead. Joystick reads steer the
//! paddle toward the ball's column.

use crate::device::Device;
use crate::grid::{Point, TileGrid};

/// Nothing drawn here.
pub const TILE_EMPTY: i64 = 0;
/// Indestructible wall.
pub const TILE_WALL: i64 = 1;
/// Breakable block.
pub const TILE_BLOCK: i64 = 2;
/// The horizontal paddle.
pub const TILE_PADDLE: i64 = 3;
/// The ball.
pub const TILE_BALL: i64 = 4;

/// Device playing the block-breaking game.
#[derive(Debug, Default)]
pub struct ArcadeCabinet {
    screen: TileGrid,
    score: i64,
    pending: Vec<i64>,
    ball: Option<Point>,
    paddle: Option<Point>,
}

impl ArcadeCabinet {
    /// Cabinet with a blank screen and zero score.
    pub fn new() -> Self {
        Self::default()
    }

    /// The last value received on the score channel.
    pub fn score(&self) -> i64 {
        self.score
    }

    /// The screen contents.
    pub fn screen(&self) -> &TileGrid {
        &self.screen
    }

    /// Count of block tiles still on screen.
    pub fn blocks_remaining(&self) -> usize {
        self.screen.find(|_, v| v == TILE_BLOCK).count()
    }
}

impl Device for ArcadeCabinet {
    fn input(&mut self) -> Option<i64> {
        // joystick: -1 left, 0 neutral, 1 right
        match (self.ball, self.paddle) {
            (Some(ball), Some(paddle)) => Some(i64::from(ball.x - paddle.x).signum()),
            _ => Some(0),
        }
    }

    fn output(&mut self, value: i64) {
        self.pending.push(value);
        if self.pending.len() < 3 {
            return;
        }
        let (x, y, id) = (self.pending[0], self.pending[1], self.pending[2]);
        self.pending.clear();
        if (x, y) == (-1, 0) {
            self.score = id;
            return;
        }
        let p = Point::new(x as i32, y as i32);
        self.screen.set(p, id);
        match id {
            TILE_BALL => self.ball = Some(p),
            TILE_PADDLE => self.paddle = Some(p),
            _ => (),
        }
    }

    fn on_reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(cab: &mut ArcadeCabinet, triples: &[(i64, i64, i64)]) {
        for &(x, y, id) in triples {
            cab.output(x);
            cab.output(y);
            cab.output(id);
        }
    }

    #[test]
    fn triples_become_screen_tiles() {
        let mut cab = ArcadeCabinet::new();
        feed(
            &mut cab,
            &[(1, 2, TILE_BLOCK), (3, 2, TILE_BLOCK), (1, 2, TILE_EMPTY)],
        );
        assert_eq!(cab.screen().get(Point::new(1, 2)), TILE_EMPTY);
        assert_eq!(cab.screen().get(Point::new(3, 2)), TILE_BLOCK);
        assert_eq!(cab.blocks_remaining(), 1);
    }

    #[test]
    fn score_channel_does_not_draw() {
        let mut cab = ArcadeCabinet::new();
        feed(&mut cab, &[(-1, 0, 12345)]);
        assert_eq!(cab.score(), 12345);
        assert_eq!(cab.screen().bounds(), None);
    }

    #[test]
    fn joystick_chases_the_ball() {
        let mut cab = ArcadeCabinet::new();
        assert_eq!(cab.input(), Some(0));
        feed(&mut cab, &[(5, 10, TILE_PADDLE), (8, 3, TILE_BALL)]);
        assert_eq!(cab.input(), Some(1));
        feed(&mut cab, &[(2, 3, TILE_BALL)]);
        assert_eq!(cab.input(), Some(-1));
        feed(&mut cab, &[(5, 3, TILE_BALL)]);
        assert_eq!(cab.input(), Some(0));
    }
}
