// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Solve AoC 2019 day 13 (arcade cabinet) for the program file given as the first
//! argument.

use std::error::Error;
use std::fs::read_to_string;

use icvm::arcade::ArcadeCabinet;
use icvm::prelude::*;

fn main() -> Result<(), Box<dyn Error>> {
    let path = std::env::args().nth(1).ok_or("usage: day13 <program file>")?;
    let program: Program = read_to_string(path)?.parse()?;

    let mut computer = Computer::with_device(program, ArcadeCabinet::new());
    computer.run()?;
    println!("Part 1: {}", computer.device().blocks_remaining());

    // play for free: memory address 0 is the coin slot
    computer.reset();
    computer.mem_set(0, 2)?;
    computer.run()?;
    let cabinet = computer.device();
    if cabinet.blocks_remaining() == 0 {
        println!("Part 2: {}", cabinet.score());
    } else {
        println!(
            "Part 2: game over with {} blocks left (score {})",
            cabinet.blocks_remaining(),
            cabinet.score()
        );
    }
    Ok(())
}
