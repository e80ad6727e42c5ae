// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Instruction decoding and execution

use super::*;

// Given a 5 digit instruction value, digits ABCDE are used as follows:
// DE is the two-digit opcode
// C is the 1st parameter's mode
// B is the 2nd parameter's mode
// A is the 3rd parameter's mode
//
// So 01202 would be parsed as follows:
//
// Opcode 02 is multiply
// C=2: 1st parameter is in relative mode
// B=1: 2nd parameter is in immediate mode
// A=0: 3rd parameter is in position mode
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) enum OpCode {
    Add = 1,
    Mul = 2,
    In = 3,
    Out = 4,
    Jnz = 5,
    Jz = 6,
    Lt = 7,
    Eq = 8,
    Rbo = 9,
    Halt = 99,
}

impl OpCode {
    fn mnemonic(self) -> &'static str {
        match self {
            OpCode::Add => "add",
            OpCode::Mul => "mul",
            OpCode::In => "input",
            OpCode::Out => "output",
            OpCode::Jnz => "jnz",
            OpCode::Jz => "jz",
            OpCode::Lt => "lt",
            OpCode::Eq => "eq",
            OpCode::Rbo => "rbo",
            OpCode::Halt => "halt",
        }
    }
}

pub(crate) fn decode(instr: i64, at: i64) -> Result<(OpCode, [Mode; 3]), VmError> {
    let opcode = match instr % 100 {
        1 => OpCode::Add,
        2 => OpCode::Mul,
        3 => OpCode::In,
        4 => OpCode::Out,
        5 => OpCode::Jnz,
        6 => OpCode::Jz,
        7 => OpCode::Lt,
        8 => OpCode::Eq,
        9 => OpCode::Rbo,
        99 => OpCode::Halt,
        other => return Err(VmError::InvalidOpcode { opcode: other, at }),
    };

    let mut digits = instr / 100;
    let mut modes = [Mode::Position; 3];
    for mode in &mut modes {
        *mode = match digits % 10 {
            0 => Mode::Position,
            1 => Mode::Immediate,
            2 => Mode::Relative,
            other => return Err(VmError::InvalidMode { mode: other, at }),
        };
        digits /= 10;
    }
    Ok((opcode, modes))
}

impl<D: Device> Computer<D> {
    fn checked_get(&self, addr: i64) -> Result<i64, VmError> {
        self.mem
            .get(addr)
            .map_err(|e| VmError::NegativeAddress { addr: e.0, at: self.ip })
    }

    /// Resolve the `n`th parameter (1-based) to a concrete value using its mode.
    fn read_param(&self, modes: [Mode; 3], n: i64) -> Result<i64, VmError> {
        let operand = self.checked_get(self.ip + n)?;
        match modes[n as usize - 1] {
            Mode::Position => self.checked_get(operand),
            Mode::Immediate => Ok(operand),
            Mode::Relative => self.checked_get(self.rel_base + operand),
        }
    }

    /// Resolve the `n`th parameter (1-based) to the address it writes to. Immediate-mode
    /// parameters are never valid write targets.
    fn write_target(&self, modes: [Mode; 3], n: i64) -> Result<i64, VmError> {
        let operand = self.checked_get(self.ip + n)?;
        match modes[n as usize - 1] {
            Mode::Position if operand < 0 => Err(VmError::NegativeAddress {
                addr: operand,
                at: self.ip,
            }),
            Mode::Position => Ok(operand),
            Mode::Immediate => Err(VmError::WriteToImmediate {
                operand,
                at: self.ip,
            }),
            Mode::Relative if self.rel_base + operand < 0 => Err(VmError::NegativeAddress {
                addr: self.rel_base + operand,
                at: self.ip,
            }),
            Mode::Relative => Ok(self.rel_base + operand),
        }
    }

    /// common logic of the 4 instructions that compute a value from 2 parameters
    fn binary_op(
        &mut self,
        modes: [Mode; 3],
        operation: impl Fn(i64, i64) -> i64,
    ) -> Result<Step, VmError> {
        let a = self.read_param(modes, 1)?;
        let b = self.read_param(modes, 2)?;
        let dest = self.write_target(modes, 3)?;
        self.mem
            .set(dest, operation(a, b))
            .expect("write target is non-negative");
        self.ip += 4;
        Ok(Step::Continue)
    }

    fn jump(&mut self, modes: [Mode; 3], taken: impl Fn(i64) -> bool) -> Result<Step, VmError> {
        let cond = self.read_param(modes, 1)?;
        let target = self.read_param(modes, 2)?;
        if taken(cond) {
            if target < 0 {
                return Err(VmError::NegativeAddress {
                    addr: target,
                    at: self.ip,
                });
            }
            self.ip = target;
        } else {
            self.ip += 3;
        }
        Ok(Step::Continue)
    }

    fn log_instruction(&mut self, instr: i64, opcode: OpCode) -> Result<(), VmError> {
        if let Some(logger) = &mut self.logger {
            writeln!(
                logger,
                "ip: {:>8} | rbo: {:>5} | {:05} [{}]",
                self.ip,
                self.rel_base,
                instr,
                opcode.mnemonic()
            )?;
        }
        Ok(())
    }

    /// Decode and execute exactly one instruction.
    ///
    /// Returns [`Step::AwaitingInput`] without changing any state when an input
    /// instruction executes and the device has nothing to offer; calling `step` again
    /// retries the same instruction. All errors are fatal to this machine and carry the
    /// address of the offending instruction.
    pub fn step(&mut self) -> Result<Step, VmError> {
        self.device.on_step();
        let instr = self.checked_get(self.ip)?;
        let (opcode, modes) = decode(instr, self.ip)?;
        self.log_instruction(instr, opcode)?;

        match opcode {
            OpCode::Add => self.binary_op(modes, |a, b| a + b),
            OpCode::Mul => self.binary_op(modes, |a, b| a * b),
            OpCode::In => {
                let Some(value) = self.device.input() else {
                    return Ok(Step::AwaitingInput);
                };
                let dest = self.write_target(modes, 1)?;
                self.mem
                    .set(dest, value)
                    .expect("write target is non-negative");
                self.ip += 2;
                Ok(Step::Continue)
            }
            OpCode::Out => {
                let value = self.read_param(modes, 1)?;
                self.device.output(value);
                self.ip += 2;
                Ok(Step::Continue)
            }
            OpCode::Jnz => self.jump(modes, |a| a != 0),
            OpCode::Jz => self.jump(modes, |a| a == 0),
            OpCode::Lt => self.binary_op(modes, |a, b| i64::from(a < b)),
            OpCode::Eq => self.binary_op(modes, |a, b| i64::from(a == b)),
            OpCode::Rbo => {
                self.rel_base += self.read_param(modes, 1)?;
                self.ip += 2;
                Ok(Step::Continue)
            }
            OpCode::Halt => {
                self.device.on_halt();
                Ok(Step::Halted)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn computer(code: impl IntoIterator<Item = i64>) -> Computer<Queue> {
        Computer::with_device(Program::new(code), Queue::new())
    }

    #[test]
    fn decode_reads_modes_least_significant_first() {
        let (opcode, modes) = decode(1202, 0).unwrap();
        assert_eq!(opcode, OpCode::Mul);
        assert_eq!(modes, [Mode::Relative, Mode::Immediate, Mode::Position]);
    }

    #[test]
    fn decode_is_pure() {
        assert_eq!(decode(21107, 4).unwrap(), decode(21107, 4).unwrap());
    }

    #[test]
    fn invalid_opcode_carries_address() {
        let mut c = computer([1101, 1, 1, 5, 11, 0]);
        assert_eq!(c.run(), Err(VmError::InvalidOpcode { opcode: 11, at: 4 }));
    }

    #[test]
    fn invalid_mode_carries_address() {
        let mut c = computer([302, 0, 0, 0, 99]);
        assert_eq!(c.run(), Err(VmError::InvalidMode { mode: 3, at: 0 }));
    }

    #[test]
    fn write_through_immediate_fails() {
        let mut c = computer([10001, 0, 0, 0, 99]);
        assert_eq!(
            c.run(),
            Err(VmError::WriteToImmediate { operand: 0, at: 0 })
        );
    }

    #[test]
    fn negative_position_read_fails() {
        let mut c = computer([4, -1, 99]);
        assert_eq!(c.run(), Err(VmError::NegativeAddress { addr: -1, at: 0 }));
    }

    #[test]
    fn arithmetic_advances_pointer_by_four() {
        let mut c = computer([1101, 2, 3, 9, 1102, 2, 3, 9, 99, 0]);
        c.step().unwrap();
        assert_eq!(c.ip(), 4);
        c.step().unwrap();
        assert_eq!(c.ip(), 8);
        assert_eq!(c.mem_get(9).unwrap(), 6);
    }

    #[test]
    fn io_and_rbo_advance_pointer_by_two() {
        let mut c = computer([3, 7, 4, 7, 109, 5, 99, 0]);
        c.device_mut().push_input(42);
        c.step().unwrap();
        assert_eq!(c.ip(), 2);
        c.step().unwrap();
        assert_eq!(c.ip(), 4);
        c.step().unwrap();
        assert_eq!(c.ip(), 6);
        assert_eq!(c.relative_base(), 5);
        assert_eq!(c.device().outputs(), [42]);
    }

    #[test]
    fn jumps_depend_only_on_first_parameter() {
        // jnz taken
        let mut c = computer([1105, 1, 7, 0, 0, 0, 0, 99]);
        c.step().unwrap();
        assert_eq!(c.ip(), 7);
        // jnz not taken
        let mut c = computer([1105, 0, 7, 99]);
        c.step().unwrap();
        assert_eq!(c.ip(), 3);
        // jz taken
        let mut c = computer([1106, 0, 7, 0, 0, 0, 0, 99]);
        c.step().unwrap();
        assert_eq!(c.ip(), 7);
        // jz not taken
        let mut c = computer([1106, 1, 7, 99]);
        c.step().unwrap();
        assert_eq!(c.ip(), 3);
    }

    #[test]
    fn jump_to_negative_target_fails() {
        let mut c = computer([1105, 1, -4, 99]);
        assert_eq!(c.run(), Err(VmError::NegativeAddress { addr: -4, at: 0 }));
    }

    /// Relative reads and writes at base B with operand K resolve to address B+K, and
    /// adjusting the base stacks.
    #[test]
    fn relative_base_resolution() {
        // rbo #6; write input to @1 (= address 7); rbo #2; output @-1 (= address 7)
        let mut c = computer([109, 6, 203, 1, 109, 2, 204, -1, 99]);
        c.device_mut().push_input(1234);
        assert_eq!(c.run().unwrap(), State::Halted);
        assert_eq!(c.relative_base(), 8);
        assert_eq!(c.mem_get(7).unwrap(), 1234);
        assert_eq!(c.device().outputs(), [1234]);
    }

    #[test]
    fn awaiting_input_changes_nothing() {
        let mut c = computer([3, 0, 99]);
        assert_eq!(c.step().unwrap(), Step::AwaitingInput);
        assert_eq!(c.ip(), 0);
        assert_eq!(c.mem_get(0).unwrap(), 3);
        c.device_mut().push_input(-5);
        assert_eq!(c.step().unwrap(), Step::Continue);
        assert_eq!(c.mem_get(0).unwrap(), -5);
    }
}
