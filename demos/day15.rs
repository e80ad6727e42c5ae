// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Solve AoC 2019 day 15 (repair droid) for the program file given as the first
//! argument.

use std::error::Error;
use std::fs::read_to_string;

use icvm::droid::{self, RepairDroid};
use icvm::grid::Point;
use icvm::prelude::*;

fn main() -> Result<(), Box<dyn Error>> {
    let path = std::env::args().nth(1).ok_or("usage: day15 <program file>")?;
    let program: Program = read_to_string(path)?.parse()?;

    let mut computer = Computer::with_device(program, RepairDroid::new());
    // the droid refuses input once the maze is mapped
    let state = computer.run()?;
    assert_eq!(state, State::Awaiting);

    let explorer = computer.device();
    print!(
        "{}",
        explorer.maze().render_with(|v| match v {
            droid::TILE_UNKNOWN => ' ',
            droid::TILE_EMPTY => '.',
            droid::TILE_WALL => '#',
            droid::TILE_VENT => '*',
            droid::TILE_START => '@',
            droid::TILE_DROID => 'D',
            _ => '!',
        })
    );

    let maze = explorer.maze();
    let vent = maze.tile(explorer.vent().ok_or("no vent found")?);
    let origin = maze.tile(Point::new(0, 0));

    let route = maze
        .shortest_path(origin, vent, droid::walkable)?
        .ok_or("vent unreachable")?;
    println!("Part 1: {}", route.len() - 1);

    // distances come back offset by one
    let oxygen = maze.distance_map(vent, droid::walkable)?;
    let fill_time = maze
        .find(|p, v| droid::walkable(v) && oxygen.get(p) != 0)
        .map(|p| oxygen.get(p) - 1)
        .max()
        .ok_or("vent unreachable")?;
    println!("Part 2: {fill_time}");
    Ok(())
}
