// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD
#![warn(missing_docs)]

//! Library providing an Intcode virtual machine, peripheral devices, and grid pathfinding
//!
//! The virtual machine implements the full instruction set of the completed Intcode
//! computer from [Day 9], with all three parameter modes. I/O is routed through a
//! [`Device`] chosen when the [`Computer`] is built: the default [`Console`] prompts on
//! stdin, [`Queue`](device::Queue) buffers integers for programmatic use, and the
//! [`robot`], [`arcade`], and [`droid`] modules provide the peripheral adapters that the
//! painting, breakout, and maze-exploration programs expect. The maze built by the droid
//! is a sparse [`TileGrid`](grid::TileGrid) that can be queried with the A*/Dijkstra
//! searches in [`path`].
//!
//! # Example
//!
//! ```rust
//! use icvm::prelude::*;
//!
//! let program: Program = "104,1024,99".parse().unwrap();
//! let mut computer = Computer::with_device(program, Queue::new());
//!
//! assert_eq!(computer.run().unwrap(), State::Halted);
//! assert_eq!(computer.device().outputs(), [1024]);
//! ```
//!
//! Execution is cooperative: [`Computer::step`] runs exactly one instruction and returns
//! control, and an input instruction whose device has nothing to offer suspends the
//! machine without side effects, to be resumed later.
//!
//! [Day 9]: https://adventofcode.com/2019/day/9

mod exec;
mod mem;

pub mod amps;
pub mod arcade;
pub mod device;
pub mod droid;
pub mod grid;
pub mod path;
pub mod robot;

use std::error::Error;
use std::fmt::{self, Display};
use std::io;
use std::num::ParseIntError;
use std::str::FromStr;

use device::{Console, Device, Queue};
use mem::Memory;

/// A small module that re-exports items needed when working with the virtual machine
pub mod prelude {
    pub use crate::device::{Console, Device, Queue};
    pub use crate::{Computer, Program, State, Step, VmError};
}

/// An immutable Intcode program: the read-only template for a [`Computer`]'s memory.
///
/// Parsed from the comma-separated decimal wire format with [`FromStr`]:
///
/// ```rust
/// use icvm::Program;
/// let program: Program = " 109,-1,99 ".parse().unwrap();
/// assert_eq!(program.as_slice(), [109, -1, 99]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program(Vec<i64>);

impl Program {
    /// Collect `code` into a program image.
    pub fn new(code: impl IntoIterator<Item = i64>) -> Self {
        Self(code.into_iter().collect())
    }

    /// The program's cells in address order.
    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    /// Number of cells in the image.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the image contains no cells at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for Program {
    type Err = ProgramParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .split(',')
            .enumerate()
            .map(|(index, token)| {
                token
                    .trim()
                    .parse()
                    .map_err(|source| ProgramParseError { index, source })
            })
            .collect::<Result<Vec<i64>, _>>()
            .map(Self)
    }
}

/// An element of the comma-separated program text failed to parse as an integer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramParseError {
    index: usize,
    source: ParseIntError,
}

impl Display for ProgramParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid integer at element {}: {}", self.index, self.source)
    }
}

impl Error for ProgramParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// The state of the machine, returned whenever it has stopped.
///
/// [Awaiting](State::Awaiting) means that there are more instructions to execute, but the
/// device had no input to offer when an input instruction executed. Execution can resume
/// once the device has something to say.
///
/// [Halted](State::Halted) means that a `HALT` instruction was executed.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum State {
    /// Execution is suspended at an input instruction
    Awaiting,
    /// Execution has halted
    Halted,
}

/// The outcome of executing a single instruction with [`Computer::step`].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Step {
    /// The instruction completed; more remain
    Continue,
    /// An input instruction found no input available; nothing was changed
    AwaitingInput,
    /// A `HALT` instruction executed
    Halted,
}

/// Parameter mode for an Intcode instruction parameter
///
/// Each parameter of an instruction is interpreted according to its mode digit, read
/// least-significant-digit-first from the instruction value divided by 100, defaulting
/// to [position](Mode::Position) when unspecified.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Mode {
    /// The parameter is the address of the value (and of the write target).
    Position = 0,
    /// The parameter is the value itself. Never a valid write target.
    Immediate = 1,
    /// The parameter is an offset from the relative base register.
    Relative = 2,
}

/// An error raised while executing an Intcode instruction.
///
/// Every variant except [`Logger`](VmError::Logger) carries `at`, the address of the
/// offending instruction. These errors are fatal to the machine that raised them; there
/// is no internal retry or recovery.
#[derive(Debug)]
pub enum VmError {
    /// A negative memory address was computed
    NegativeAddress {
        /// the out-of-range address
        addr: i64,
        /// address of the offending instruction
        at: i64,
    },
    /// An unrecognized opcode was encountered
    InvalidOpcode {
        /// the unrecognized opcode (instruction value modulo 100)
        opcode: i64,
        /// address of the offending instruction
        at: i64,
    },
    /// An unrecognized parameter mode digit was encountered
    InvalidMode {
        /// the unrecognized mode digit
        mode: i64,
        /// address of the offending instruction
        at: i64,
    },
    /// An instruction tried to write through an immediate-mode parameter
    WriteToImmediate {
        /// the raw operand of the immediate parameter
        operand: i64,
        /// address of the offending instruction
        at: i64,
    },
    /// The instruction logger failed
    Logger(io::Error),
}

// Logger errors compare unequal; io::Error has no useful equality
impl PartialEq for VmError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::NegativeAddress { addr, at },
                Self::NegativeAddress { addr: a2, at: i2 },
            ) => addr == a2 && at == i2,
            (
                Self::InvalidOpcode { opcode, at },
                Self::InvalidOpcode { opcode: o2, at: i2 },
            ) => opcode == o2 && at == i2,
            (Self::InvalidMode { mode, at }, Self::InvalidMode { mode: m2, at: i2 }) => {
                mode == m2 && at == i2
            }
            (
                Self::WriteToImmediate { operand, at },
                Self::WriteToImmediate { operand: o2, at: i2 },
            ) => operand == o2 && at == i2,
            _ => false,
        }
    }
}

impl Display for VmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VmError::NegativeAddress { addr, at } => {
                write!(f, "accessed negative memory address {addr} at instruction address {at}")
            }
            VmError::InvalidOpcode { opcode, at } => {
                write!(f, "encountered invalid opcode {opcode} at instruction address {at}")
            }
            VmError::InvalidMode { mode, at } => {
                write!(f, "encountered unknown parameter mode {mode} at instruction address {at}")
            }
            VmError::WriteToImmediate { operand, at } => {
                write!(
                    f,
                    "attempted write through immediate parameter {operand} at instruction address {at}"
                )
            }
            VmError::Logger(e) => write!(f, "logger encountered an error: {e}"),
        }
    }
}

impl Error for VmError {}

impl From<io::Error> for VmError {
    fn from(err: io::Error) -> Self {
        Self::Logger(err)
    }
}

/// An Intcode virtual machine.
///
/// Owns a memory image cloned from a read-only [`Program`], the instruction pointer, the
/// relative-base register, and the [`Device`] its input and output instructions talk to.
/// The device is fixed at construction time; [`Console`] is the fallback when none is
/// given.
pub struct Computer<D: Device = Console> {
    program: Program,
    mem: Memory,
    ip: i64,
    rel_base: i64,
    device: D,
    logger: Option<Box<dyn io::Write + Send>>,
}

impl Computer<Console> {
    /// Create a machine wired to the interactive console device.
    pub fn new(program: Program) -> Self {
        Self::with_device(program, Console)
    }
}

impl<D: Device> Computer<D> {
    /// Create a machine wired to `device`.
    pub fn with_device(program: Program, device: D) -> Self {
        let mem = Memory::from_image(program.as_slice());
        Self {
            program,
            mem,
            ip: 0,
            rel_base: 0,
            device,
            logger: None,
        }
    }

    /// Borrow the attached device.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Mutably borrow the attached device.
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Consume the machine, keeping the device.
    pub fn into_device(self) -> D {
        self.device
    }

    /// Current instruction pointer.
    pub fn ip(&self) -> i64 {
        self.ip
    }

    /// Current relative-base register.
    pub fn relative_base(&self) -> i64 {
        self.rel_base
    }

    /// Get the memory at `address`
    #[doc(alias = "peek")]
    pub fn mem_get(&self, address: i64) -> Result<i64, VmError> {
        self.mem
            .get(address)
            .map_err(|e| VmError::NegativeAddress { addr: e.0, at: self.ip })
    }

    /// Manually overwrite a memory location
    #[doc(alias("poke", "write"))]
    pub fn mem_set(&mut self, address: i64, value: i64) -> Result<(), VmError> {
        self.mem
            .set(address, value)
            .map_err(|e| VmError::NegativeAddress { addr: e.0, at: self.ip })
    }

    /// Restore memory from the original program, zero the instruction pointer and the
    /// relative base, then notify the device via [`Device::on_reset`].
    pub fn reset(&mut self) {
        self.mem = Memory::from_image(self.program.as_slice());
        self.ip = 0;
        self.rel_base = 0;
        self.device.on_reset();
    }

    /// Log each executed instruction to `logger`.
    pub fn log_with(&mut self, logger: impl io::Write + Send + 'static) {
        self.logger = Some(Box::new(logger));
    }

    /// Execute instructions until the program halts or suspends awaiting input.
    pub fn run(&mut self) -> Result<State, VmError> {
        loop {
            match self.step()? {
                Step::Continue => (),
                Step::AwaitingInput => return Ok(State::Awaiting),
                Step::Halted => return Ok(State::Halted),
            }
        }
    }
}

impl Computer<Queue> {
    /// Push `inputs` onto the queue device, run until halt or input starvation, and
    /// return the outputs collected along the way together with the stopping [`State`].
    pub fn run_with_inputs(
        &mut self,
        inputs: impl IntoIterator<Item = i64>,
    ) -> Result<(Vec<i64>, State), VmError> {
        for value in inputs {
            self.device.push_input(value);
        }
        let state = self.run()?;
        Ok((self.device.take_outputs(), state))
    }
}

// the device and logger fields are intentionally not compared
impl<D: Device> PartialEq for Computer<D> {
    fn eq(&self, other: &Self) -> bool {
        self.ip == other.ip && self.rel_base == other.rel_base && self.mem == other.mem
    }
}

impl<D: Device> fmt::Debug for Computer<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Computer")
            .field("ip", &self.ip)
            .field("rel_base", &self.rel_base)
            .field("mem", &self.mem)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_program() {
        let program: Program = "1,0,0,0,99\n".parse().unwrap();
        assert_eq!(program.as_slice(), [1, 0, 0, 0, 99]);

        let program: Program = " 109, -7 ,99 ".parse().unwrap();
        assert_eq!(program.as_slice(), [109, -7, 99]);
    }

    #[test]
    fn parse_program_reports_element() {
        let err = "1,0,x,0,99".parse::<Program>().unwrap_err();
        assert_eq!(err.index, 2);
    }

    /// `[1,0,0,0,99]` doubles cell 0 in a single step, then halts.
    #[test]
    fn add_then_halt() {
        let program = Program::new([1, 0, 0, 0, 99]);
        let mut computer = Computer::with_device(program, Queue::new());
        assert_eq!(computer.step().unwrap(), Step::Continue);
        assert_eq!(computer.mem_get(0).unwrap(), 2);
        assert_eq!(computer.step().unwrap(), Step::Halted);
        assert_eq!(computer.ip(), 4);
    }

    #[test]
    fn reset_restores_program_image() {
        let program = Program::new([1, 0, 0, 0, 99]);
        let mut computer = Computer::with_device(program.clone(), Queue::new());
        let pristine = Computer::with_device(program, Queue::new());

        assert_eq!(computer.run().unwrap(), State::Halted);
        assert_ne!(computer, pristine);

        computer.reset();
        assert_eq!(computer, pristine);
        assert_eq!(computer.mem_get(0).unwrap(), 1);
        assert_eq!(computer.ip(), 0);
        assert_eq!(computer.relative_base(), 0);
    }

    #[test]
    fn logger_receives_instruction_trace() {
        use std::sync::{Arc, Mutex};

        #[derive(Clone)]
        struct Sink(Arc<Mutex<Vec<u8>>>);
        impl io::Write for Sink {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let sink = Sink(Arc::new(Mutex::new(Vec::new())));
        let mut computer = Computer::with_device(Program::new([104, 7, 99]), Queue::new());
        computer.log_with(sink.clone());
        computer.run().unwrap();

        let log = String::from_utf8(sink.0.lock().unwrap().clone()).unwrap();
        assert!(log.contains("[output]"), "{log}");
        assert!(log.contains("[halt]"), "{log}");
    }
}
