// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Peripheral devices the virtual machine talks to.
//!
//! A [`Computer`] owns exactly one [`Device`], chosen at construction. Every input
//! instruction asks the device for a value, and every output instruction hands the
//! device a value. Returning `None` from [`Device::input`] suspends the machine
//! without side effects; the same instruction runs again on the next step.
//!
//! [`Computer`]: crate::Computer

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Hooks connecting a [`Computer`] to the outside world.
///
/// [`Computer`]: crate::Computer
pub trait Device {
    /// Provide the next input value, or `None` to suspend the machine.
    fn input(&mut self) -> Option<i64>;
    /// Receive an output value.
    fn output(&mut self, value: i64);
    /// Called after the machine's state is restored to the program image.
    fn on_reset(&mut self) {}
    /// Called when a halt instruction executes.
    fn on_halt(&mut self) {}
    /// Called before each instruction is decoded.
    fn on_step(&mut self) {}
}

/// Interactive device that prompts on stdin and reports on stdout.
///
/// Re-prompts until a line parses as an integer; EOF or a read error suspends the
/// machine instead.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Console;

impl Device for Console {
    fn input(&mut self) -> Option<i64> {
        println!("Program requests an integer:");
        let stdin = io::stdin();
        loop {
            print!("> ");
            let _ = io::stdout().flush();
            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                Ok(0) | Err(_) => return None,
                Ok(_) => (),
            }
            match line.trim().parse() {
                Ok(value) => return Some(value),
                Err(_) => println!("Invalid integer. Try again:"),
            }
        }
    }

    fn output(&mut self, value: i64) {
        println!("Program emits {value}");
    }
}

/// Non-interactive device backed by in-memory buffers.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Queue {
    inputs: VecDeque<i64>,
    outputs: Vec<i64>,
}

impl Queue {
    /// Empty input and output buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue with its input buffer pre-seeded.
    pub fn with_inputs(inputs: impl IntoIterator<Item = i64>) -> Self {
        Self {
            inputs: inputs.into_iter().collect(),
            outputs: Vec::new(),
        }
    }

    /// Append a value to the back of the input queue.
    pub fn push_input(&mut self, value: i64) {
        self.inputs.push_back(value);
    }

    /// Everything output so far, oldest first.
    pub fn outputs(&self) -> &[i64] {
        &self.outputs
    }

    /// Drain the output buffer.
    pub fn take_outputs(&mut self) -> Vec<i64> {
        std::mem::take(&mut self.outputs)
    }
}

impl Device for Queue {
    fn input(&mut self) -> Option<i64> {
        self.inputs.pop_front()
    }

    fn output(&mut self, value: i64) {
        self.outputs.push(value);
    }
}
