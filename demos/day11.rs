// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Solve AoC 2019 day 11 (hull-painting robot) for the program file given as the
//! first argument.

use std::error::Error;
use std::fs::read_to_string;

use icvm::prelude::*;
use icvm::robot::{PaintRobot, COLOR_WHITE};

fn main() -> Result<(), Box<dyn Error>> {
    let path = std::env::args().nth(1).ok_or("usage: day11 <program file>")?;
    let program: Program = read_to_string(path)?.parse()?;

    let mut computer = Computer::with_device(program.clone(), PaintRobot::new());
    computer.run()?;
    println!("Part 1: {}", computer.device().painted_count());

    let mut computer = Computer::with_device(program, PaintRobot::starting_on_white());
    computer.run()?;
    println!("Part 2:");
    print!(
        "{}",
        computer
            .device()
            .hull()
            .render_with(|v| if v == COLOR_WHITE { '#' } else { ' ' })
    );
    Ok(())
}
