// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Amplifier chains: several copies of one program wired output-to-input in a ring.

use itertools::Itertools;

use crate::{Computer, Program, Queue, State, VmError};

/// Run `phases.len()` copies of `program` in a feedback ring, each seeded with its
/// phase setting and the first additionally with 0. Returns the last value the final
/// amplifier emits.
///
/// Also handles the straight-line case: with phases that never loop the signal, every
/// amplifier halts after one pass and the ring pumps exactly once.
pub fn thruster_signal(program: &Program, phases: &[i64]) -> Result<i64, VmError> {
    let mut amps: Vec<Computer<Queue>> = phases
        .iter()
        .map(|&phase| Computer::with_device(program.clone(), Queue::with_inputs([phase])))
        .collect();
    amps[0].device_mut().push_input(0);

    let mut signal = 0;
    loop {
        let mut all_halted = true;
        let mut progress = false;
        for i in 0..amps.len() {
            let state = amps[i].run()?;
            all_halted &= state == State::Halted;
            let outputs = amps[i].device_mut().take_outputs();
            if outputs.is_empty() {
                continue;
            }
            progress = true;
            if i == amps.len() - 1 {
                signal = *outputs.last().unwrap_or(&signal);
            }
            let next = (i + 1) % amps.len();
            for value in outputs {
                amps[next].device_mut().push_input(value);
            }
        }
        // a ring where nobody halts and nobody emits would spin forever
        if all_halted || !progress {
            return Ok(signal);
        }
    }
}

/// The best thruster signal over every permutation of `phases`.
pub fn max_thruster_signal(program: &Program, phases: &[i64]) -> Result<i64, VmError> {
    let mut best = i64::MIN;
    for perm in phases.iter().copied().permutations(phases.len()) {
        best = best.max(thruster_signal(program, &perm)?);
    }
    Ok(best)
}
