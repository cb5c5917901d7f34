pub(crate) mod table;

use crate::cpu::registers::{CpuRegister, CpuRegisterPair, CpuRegisters, Flags};
use crate::memory::Bus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum JumpCondition {
    NZ,
    Z,
    NC,
    C,
}

impl JumpCondition {
    fn check(self, registers: &CpuRegisters) -> bool {
        match self {
            Self::NZ => !registers.zero_flag(),
            Self::Z => registers.zero_flag(),
            Self::NC => !registers.carry_flag(),
            Self::C => registers.carry_flag(),
        }
    }
}

/// Where an 8-bit operand comes from. `Immediate` and the direct forms fetch their bytes from
/// the instruction stream during execution, advancing PC past them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReadTarget {
    Accumulator,
    Register(CpuRegister),
    Immediate,
    IndirectHL,
    IndirectBC,
    IndirectDE,
    IndirectHLInc,
    IndirectHLDec,
    // (nn)
    Direct,
    // (0xFF00 + n)
    FFDirect,
    // (0xFF00 + C)
    FFIndirectC,
}

impl ReadTarget {
    fn read_value<B: Bus>(self, bus: &B, registers: &mut CpuRegisters) -> u8 {
        match self {
            Self::Accumulator => registers.accumulator(),
            Self::Register(register) => registers.read_register(register),
            Self::Immediate => fetch_immediate_u8(bus, registers),
            Self::IndirectHL => bus.read_address_u8(registers.hl()),
            Self::IndirectBC => {
                bus.read_address_u8(registers.read_register_pair(CpuRegisterPair::BC))
            }
            Self::IndirectDE => {
                bus.read_address_u8(registers.read_register_pair(CpuRegisterPair::DE))
            }
            Self::IndirectHLInc => {
                let hl = registers.hl();
                registers.set_hl(hl.wrapping_add(1));
                bus.read_address_u8(hl)
            }
            Self::IndirectHLDec => {
                let hl = registers.hl();
                registers.set_hl(hl.wrapping_sub(1));
                bus.read_address_u8(hl)
            }
            Self::Direct => {
                let address = fetch_immediate_u16(bus, registers);
                bus.read_address_u8(address)
            }
            Self::FFDirect => {
                let offset = fetch_immediate_u8(bus, registers);
                bus.read_address_u8(u16::from_be_bytes([0xFF, offset]))
            }
            Self::FFIndirectC => {
                bus.read_address_u8(u16::from_be_bytes([0xFF, registers.read_register(CpuRegister::C)]))
            }
        }
    }

    fn access_cycles(self) -> u32 {
        match self {
            Self::Accumulator | Self::Register(_) => 0,
            Self::Immediate
            | Self::IndirectHL
            | Self::IndirectBC
            | Self::IndirectDE
            | Self::IndirectHLInc
            | Self::IndirectHLDec
            | Self::FFIndirectC => 4,
            Self::FFDirect => 8,
            Self::Direct => 12,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WriteTarget {
    Accumulator,
    Register(CpuRegister),
    IndirectHL,
    IndirectBC,
    IndirectDE,
    IndirectHLInc,
    IndirectHLDec,
    Direct,
    FFDirect,
    FFIndirectC,
}

impl WriteTarget {
    fn write_value<B: Bus>(self, bus: &mut B, registers: &mut CpuRegisters, value: u8) {
        match self {
            Self::Accumulator => registers.set_accumulator(value),
            Self::Register(register) => registers.set_register(register, value),
            Self::IndirectHL => bus.write_address_u8(registers.hl(), value),
            Self::IndirectBC => {
                bus.write_address_u8(registers.read_register_pair(CpuRegisterPair::BC), value);
            }
            Self::IndirectDE => {
                bus.write_address_u8(registers.read_register_pair(CpuRegisterPair::DE), value);
            }
            Self::IndirectHLInc => {
                let hl = registers.hl();
                registers.set_hl(hl.wrapping_add(1));
                bus.write_address_u8(hl, value);
            }
            Self::IndirectHLDec => {
                let hl = registers.hl();
                registers.set_hl(hl.wrapping_sub(1));
                bus.write_address_u8(hl, value);
            }
            Self::Direct => {
                let address = fetch_immediate_u16(bus, registers);
                bus.write_address_u8(address, value);
            }
            Self::FFDirect => {
                let offset = fetch_immediate_u8(bus, registers);
                bus.write_address_u8(u16::from_be_bytes([0xFF, offset]), value);
            }
            Self::FFIndirectC => {
                bus.write_address_u8(
                    u16::from_be_bytes([0xFF, registers.read_register(CpuRegister::C)]),
                    value,
                );
            }
        }
    }

    fn access_cycles(self) -> u32 {
        match self {
            Self::Accumulator | Self::Register(_) => 0,
            Self::IndirectHL
            | Self::IndirectBC
            | Self::IndirectDE
            | Self::IndirectHLInc
            | Self::IndirectHLDec
            | Self::FFIndirectC => 4,
            Self::FFDirect => 8,
            Self::Direct => 12,
        }
    }
}

/// An operand that is read, transformed, and written back in place. `Accumulator` marks the
/// one-byte rotate forms, which force the zero flag clear instead of computing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ModifyTarget {
    Accumulator,
    Register(CpuRegister),
    IndirectHL,
}

impl ModifyTarget {
    fn read_value<B: Bus>(self, bus: &B, registers: &CpuRegisters) -> u8 {
        match self {
            Self::Accumulator => registers.accumulator(),
            Self::Register(register) => registers.read_register(register),
            Self::IndirectHL => bus.read_address_u8(registers.hl()),
        }
    }

    fn write_value<B: Bus>(self, bus: &mut B, registers: &mut CpuRegisters, value: u8) {
        match self {
            Self::Accumulator => registers.set_accumulator(value),
            Self::Register(register) => registers.set_register(register, value),
            Self::IndirectHL => bus.write_address_u8(registers.hl(), value),
        }
    }

    fn access_cycles(self) -> u32 {
        match self {
            Self::Accumulator => 0,
            Self::Register(_) => 4,
            Self::IndirectHL => 12,
        }
    }
}

/// A 16-bit operand: one of the register pairs or the stack pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WordOperand {
    Pair(CpuRegisterPair),
    StackPointer,
}

impl WordOperand {
    fn read(self, registers: &CpuRegisters) -> u16 {
        match self {
            Self::Pair(pair) => registers.read_register_pair(pair),
            Self::StackPointer => registers.sp,
        }
    }

    fn write(self, registers: &mut CpuRegisters, value: u16) {
        match self {
            Self::Pair(pair) => registers.set_register_pair(pair, value),
            Self::StackPointer => {
                registers.sp = value;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    // LD
    Load(WriteTarget, ReadTarget),
    // LD rr, nn
    LoadRegisterPairImmediate(WordOperand),
    // LD (nn), SP
    LoadDirectStackPointer,
    // LD SP, HL
    LoadStackPointerHL,
    // LDHL SP, e
    LoadHLStackPointerOffset,
    // PUSH rr
    PushStack(CpuRegisterPair),
    // POP rr
    PopStack(CpuRegisterPair),
    // ADD / ADC / SUB / SBC / CP
    Add(ReadTarget),
    AddWithCarry(ReadTarget),
    Subtract(ReadTarget),
    SubtractWithCarry(ReadTarget),
    Compare(ReadTarget),
    // INC / DEC
    Increment(ModifyTarget),
    Decrement(ModifyTarget),
    // AND / OR / XOR
    And(ReadTarget),
    Or(ReadTarget),
    Xor(ReadTarget),
    // ADD HL, rr
    AddHLRegister(WordOperand),
    // INC rr / DEC rr
    IncRegisterPair(WordOperand),
    DecRegisterPair(WordOperand),
    // ADD SP, e
    AddSPImmediate,
    // RLCA/RLA/RRCA/RRA and CB RLC/RL/RRC/RR
    RotateLeft(ModifyTarget),
    RotateLeftThruCarry(ModifyTarget),
    RotateRight(ModifyTarget),
    RotateRightThruCarry(ModifyTarget),
    // SLA / SRA / SRL / SWAP
    ShiftLeft(ModifyTarget),
    ArithmeticShiftRight(ModifyTarget),
    LogicalShiftRight(ModifyTarget),
    Swap(ModifyTarget),
    // BIT n / RES n / SET n
    TestBit(u8, ReadTarget),
    ResetBit(u8, ModifyTarget),
    SetBit(u8, ModifyTarget),
    // CCF / SCF / DAA / CPL
    ComplementCarryFlag,
    SetCarryFlag,
    DecimalAdjustAccumulator,
    ComplementAccumulator,
    // JP / JR
    Jump,
    JumpHL,
    JumpCond(JumpCondition),
    RelativeJump,
    RelativeJumpCond(JumpCondition),
    // CALL / RET / RETI / RST
    Call,
    CallCond(JumpCondition),
    Return,
    ReturnCond(JumpCondition),
    ReturnFromInterruptHandler,
    RestartCall(u8),
    // HALT / STOP / DI / EI / NOP
    Halt,
    Stop,
    DisableInterrupts,
    EnableInterrupts,
    NoOp,
    // Opcode with no table entry
    Unimplemented,
}

impl Operation {
    /// Executes the operation against the bus and register file, fetching any immediate operand
    /// bytes from the instruction stream. The opcode byte(s) themselves have already been
    /// consumed by the caller.
    pub(crate) fn execute<B: Bus>(self, bus: &mut B, registers: &mut CpuRegisters) {
        match self {
            Self::Load(write_target, read_target) => {
                let value = read_target.read_value(bus, registers);
                write_target.write_value(bus, registers, value);
            }
            Self::LoadRegisterPairImmediate(operand) => {
                let value = fetch_immediate_u16(bus, registers);
                operand.write(registers, value);
            }
            Self::LoadDirectStackPointer => {
                let address = fetch_immediate_u16(bus, registers);
                bus.write_address_u16(address, registers.sp);
            }
            Self::LoadStackPointerHL => {
                registers.sp = registers.hl();
            }
            Self::LoadHLStackPointerOffset => {
                let offset = fetch_immediate_u8(bus, registers) as i8;
                let (value, carry, half_carry) = add_sp_offset(registers.sp, offset);
                registers.set_hl(value);
                registers.set_flags(false, false, half_carry, carry);
            }
            Self::PushStack(pair) => {
                let value = registers.read_register_pair(pair);
                push_stack(bus, registers, value);
            }
            Self::PopStack(pair) => {
                let value = pop_stack(bus, registers);
                registers.set_register_pair(pair, value);
            }
            Self::Add(read_target) => {
                let value = read_target.read_value(bus, registers);
                let (sum, carry, half_carry) = add(registers.accumulator(), value, false);
                registers.set_accumulator(sum);
                registers.set_flags(sum == 0, false, half_carry, carry);
            }
            Self::AddWithCarry(read_target) => {
                let value = read_target.read_value(bus, registers);
                let (sum, carry, half_carry) =
                    add(registers.accumulator(), value, registers.carry_flag());
                registers.set_accumulator(sum);
                registers.set_flags(sum == 0, false, half_carry, carry);
            }
            Self::Subtract(read_target) => {
                let value = read_target.read_value(bus, registers);
                let (difference, carry, half_carry) = sub(registers.accumulator(), value, false);
                registers.set_accumulator(difference);
                registers.set_flags(difference == 0, true, half_carry, carry);
            }
            Self::SubtractWithCarry(read_target) => {
                let value = read_target.read_value(bus, registers);
                let (difference, carry, half_carry) =
                    sub(registers.accumulator(), value, registers.carry_flag());
                registers.set_accumulator(difference);
                registers.set_flags(difference == 0, true, half_carry, carry);
            }
            Self::Compare(read_target) => {
                let value = read_target.read_value(bus, registers);
                let (difference, carry, half_carry) = sub(registers.accumulator(), value, false);
                registers.set_flags(difference == 0, true, half_carry, carry);
            }
            Self::Increment(target) => {
                let (sum, _, half_carry) = add(target.read_value(bus, registers), 1, false);
                target.write_value(bus, registers, sum);
                registers.set_some_flags(Some(sum == 0), Some(false), Some(half_carry), None);
            }
            Self::Decrement(target) => {
                let (difference, _, half_carry) = sub(target.read_value(bus, registers), 1, false);
                target.write_value(bus, registers, difference);
                registers.set_some_flags(
                    Some(difference == 0),
                    Some(true),
                    Some(half_carry),
                    None,
                );
            }
            Self::And(read_target) => {
                let value = registers.accumulator() & read_target.read_value(bus, registers);
                registers.set_accumulator(value);
                registers.set_flags(value == 0, false, true, false);
            }
            Self::Or(read_target) => {
                let value = registers.accumulator() | read_target.read_value(bus, registers);
                registers.set_accumulator(value);
                registers.set_flags(value == 0, false, false, false);
            }
            Self::Xor(read_target) => {
                let value = registers.accumulator() ^ read_target.read_value(bus, registers);
                registers.set_accumulator(value);
                registers.set_flags(value == 0, false, false, false);
            }
            Self::AddHLRegister(operand) => {
                let (sum, carry, half_carry) = add_u16(registers.hl(), operand.read(registers));
                registers.set_hl(sum);
                registers.set_some_flags(None, Some(false), Some(half_carry), Some(carry));
            }
            Self::IncRegisterPair(operand) => {
                let value = operand.read(registers).wrapping_add(1);
                operand.write(registers, value);
            }
            Self::DecRegisterPair(operand) => {
                let value = operand.read(registers).wrapping_sub(1);
                operand.write(registers, value);
            }
            Self::AddSPImmediate => {
                let offset = fetch_immediate_u8(bus, registers) as i8;
                let (value, carry, half_carry) = add_sp_offset(registers.sp, offset);
                registers.sp = value;
                registers.set_flags(false, false, half_carry, carry);
            }
            Self::RotateLeft(target) => {
                let (value, carry) = rotate_left(target.read_value(bus, registers));
                target.write_value(bus, registers, value);
                let zero = value == 0 && target != ModifyTarget::Accumulator;
                registers.set_flags(zero, false, false, carry);
            }
            Self::RotateLeftThruCarry(target) => {
                let (value, carry) =
                    rotate_left_thru_carry(target.read_value(bus, registers), registers.carry_flag());
                target.write_value(bus, registers, value);
                let zero = value == 0 && target != ModifyTarget::Accumulator;
                registers.set_flags(zero, false, false, carry);
            }
            Self::RotateRight(target) => {
                let (value, carry) = rotate_right(target.read_value(bus, registers));
                target.write_value(bus, registers, value);
                let zero = value == 0 && target != ModifyTarget::Accumulator;
                registers.set_flags(zero, false, false, carry);
            }
            Self::RotateRightThruCarry(target) => {
                let (value, carry) = rotate_right_thru_carry(
                    target.read_value(bus, registers),
                    registers.carry_flag(),
                );
                target.write_value(bus, registers, value);
                let zero = value == 0 && target != ModifyTarget::Accumulator;
                registers.set_flags(zero, false, false, carry);
            }
            Self::ShiftLeft(target) => {
                let (value, carry) = shift_left(target.read_value(bus, registers));
                target.write_value(bus, registers, value);
                registers.set_flags(value == 0, false, false, carry);
            }
            Self::ArithmeticShiftRight(target) => {
                let (value, carry) = shift_right_arithmetic(target.read_value(bus, registers));
                target.write_value(bus, registers, value);
                registers.set_flags(value == 0, false, false, carry);
            }
            Self::LogicalShiftRight(target) => {
                let (value, carry) = shift_right_logical(target.read_value(bus, registers));
                target.write_value(bus, registers, value);
                registers.set_flags(value == 0, false, false, carry);
            }
            Self::Swap(target) => {
                let value = target.read_value(bus, registers).rotate_left(4);
                target.write_value(bus, registers, value);
                registers.set_flags(value == 0, false, false, false);
            }
            Self::TestBit(bit, read_target) => {
                let value = read_target.read_value(bus, registers);
                let zero = value & (1 << bit) == 0;
                registers.set_some_flags(Some(zero), Some(false), Some(true), None);
            }
            Self::ResetBit(bit, target) => {
                let value = target.read_value(bus, registers) & !(1 << bit);
                target.write_value(bus, registers, value);
            }
            Self::SetBit(bit, target) => {
                let value = target.read_value(bus, registers) | (1 << bit);
                target.write_value(bus, registers, value);
            }
            Self::ComplementCarryFlag => {
                registers.set_some_flags(
                    None,
                    Some(false),
                    Some(false),
                    Some(!registers.carry_flag()),
                );
            }
            Self::SetCarryFlag => {
                registers.set_some_flags(None, Some(false), Some(false), Some(true));
            }
            Self::DecimalAdjustAccumulator => {
                let (value, carry) = decimal_adjust(registers.accumulator(), registers.flags());
                registers.set_accumulator(value);
                registers.set_some_flags(Some(value == 0), None, Some(false), Some(carry));
            }
            Self::ComplementAccumulator => {
                registers.set_accumulator(!registers.accumulator());
                registers.set_some_flags(None, Some(true), Some(true), None);
            }
            Self::Jump => {
                registers.pc = fetch_immediate_u16(bus, registers);
            }
            Self::JumpHL => {
                registers.pc = registers.hl();
            }
            Self::JumpCond(condition) => {
                // The operand bytes are consumed whether or not the jump is taken
                let address = fetch_immediate_u16(bus, registers);
                if condition.check(registers) {
                    registers.pc = address;
                }
            }
            Self::RelativeJump => {
                let offset = fetch_immediate_u8(bus, registers) as i8;
                registers.pc = relative_jump_target(registers.pc, offset);
            }
            Self::RelativeJumpCond(condition) => {
                let offset = fetch_immediate_u8(bus, registers) as i8;
                if condition.check(registers) {
                    registers.pc = relative_jump_target(registers.pc, offset);
                }
            }
            Self::Call => {
                let address = fetch_immediate_u16(bus, registers);
                let return_address = registers.pc;
                push_stack(bus, registers, return_address);
                registers.pc = address;
            }
            Self::CallCond(condition) => {
                let address = fetch_immediate_u16(bus, registers);
                if condition.check(registers) {
                    let return_address = registers.pc;
                    push_stack(bus, registers, return_address);
                    registers.pc = address;
                }
            }
            Self::Return => {
                registers.pc = pop_stack(bus, registers);
            }
            Self::ReturnCond(condition) => {
                if condition.check(registers) {
                    registers.pc = pop_stack(bus, registers);
                }
            }
            Self::ReturnFromInterruptHandler => {
                registers.pc = pop_stack(bus, registers);
            }
            Self::RestartCall(address) => {
                let return_address = registers.pc;
                push_stack(bus, registers, return_address);
                registers.pc = u16::from(address);
            }
            Self::Stop => {
                // STOP is encoded with a padding byte after the opcode
                let _ = fetch_immediate_u8(bus, registers);
            }
            Self::Halt
            | Self::DisableInterrupts
            | Self::EnableInterrupts
            | Self::NoOp => {}
            Self::Unimplemented => {
                panic!("attempted to execute an opcode with no table entry");
            }
        }
    }

    /// The number of clock cycles the operation takes. Conditional control flow costs depend on
    /// whether the condition currently holds, so this must be evaluated before `execute`.
    pub(crate) fn cycles_required(self, registers: &CpuRegisters) -> u32 {
        match self {
            Self::Load(write_target, read_target) => {
                4 + write_target.access_cycles() + read_target.access_cycles()
            }
            Self::LoadRegisterPairImmediate(_) => 12,
            Self::LoadDirectStackPointer => 20,
            Self::LoadStackPointerHL | Self::AddHLRegister(_) => 8,
            Self::LoadHLStackPointerOffset | Self::PopStack(_) => 12,
            Self::PushStack(_) | Self::AddSPImmediate => 16,
            Self::Add(read_target)
            | Self::AddWithCarry(read_target)
            | Self::Subtract(read_target)
            | Self::SubtractWithCarry(read_target)
            | Self::Compare(read_target)
            | Self::And(read_target)
            | Self::Or(read_target)
            | Self::Xor(read_target) => 4 + read_target.access_cycles(),
            Self::Increment(target) | Self::Decrement(target) => match target {
                ModifyTarget::IndirectHL => 12,
                _ => 4,
            },
            Self::IncRegisterPair(_) | Self::DecRegisterPair(_) => 8,
            Self::RotateLeft(target)
            | Self::RotateLeftThruCarry(target)
            | Self::RotateRight(target)
            | Self::RotateRightThruCarry(target)
            | Self::ShiftLeft(target)
            | Self::ArithmeticShiftRight(target)
            | Self::LogicalShiftRight(target)
            | Self::Swap(target)
            | Self::ResetBit(_, target)
            | Self::SetBit(_, target) => 4 + target.access_cycles(),
            Self::TestBit(_, read_target) => match read_target {
                ReadTarget::IndirectHL => 12,
                _ => 8,
            },
            Self::ComplementCarryFlag
            | Self::SetCarryFlag
            | Self::DecimalAdjustAccumulator
            | Self::ComplementAccumulator
            | Self::JumpHL
            | Self::Halt
            | Self::Stop
            | Self::DisableInterrupts
            | Self::EnableInterrupts
            | Self::NoOp => 4,
            Self::Jump | Self::Return | Self::ReturnFromInterruptHandler | Self::RestartCall(_) => {
                16
            }
            Self::JumpCond(condition) => {
                if condition.check(registers) {
                    16
                } else {
                    12
                }
            }
            Self::RelativeJump => 12,
            Self::RelativeJumpCond(condition) => {
                if condition.check(registers) {
                    12
                } else {
                    8
                }
            }
            Self::Call => 24,
            Self::CallCond(condition) => {
                if condition.check(registers) {
                    24
                } else {
                    12
                }
            }
            Self::ReturnCond(condition) => {
                if condition.check(registers) {
                    20
                } else {
                    8
                }
            }
            Self::Unimplemented => {
                panic!("attempted to count cycles for an opcode with no table entry");
            }
        }
    }
}

fn fetch_immediate_u8<B: Bus>(bus: &B, registers: &mut CpuRegisters) -> u8 {
    let value = bus.read_address_u8(registers.pc);
    registers.pc = registers.pc.wrapping_add(1);
    value
}

fn fetch_immediate_u16<B: Bus>(bus: &B, registers: &mut CpuRegisters) -> u16 {
    let value = bus.read_address_u16(registers.pc);
    registers.pc = registers.pc.wrapping_add(2);
    value
}

/// Pushes a 16-bit value: high byte at the higher address, decrementing SP before each byte.
pub(crate) fn push_stack<B: Bus>(bus: &mut B, registers: &mut CpuRegisters, value: u16) {
    let [high, low] = value.to_be_bytes();
    registers.sp = registers.sp.wrapping_sub(1);
    bus.write_address_u8(registers.sp, high);
    registers.sp = registers.sp.wrapping_sub(1);
    bus.write_address_u8(registers.sp, low);
}

fn pop_stack<B: Bus>(bus: &mut B, registers: &mut CpuRegisters) -> u16 {
    let low = bus.read_address_u8(registers.sp);
    registers.sp = registers.sp.wrapping_add(1);
    let high = bus.read_address_u8(registers.sp);
    registers.sp = registers.sp.wrapping_add(1);
    u16::from_be_bytes([high, low])
}

fn relative_jump_target(pc: u16, offset: i8) -> u16 {
    (i32::from(pc) + i32::from(offset)) as u16
}

// Returns (sum, carry out of bit 7, carry out of bit 3). The half-carry is computed from the
// two operands alone, ignoring any carry-in.
fn add(a: u8, b: u8, carry_in: bool) -> (u8, bool, bool) {
    let carry_in = u8::from(carry_in);
    let (sum, carry) = match a.overflowing_add(b) {
        (sum, true) => (sum + carry_in, true),
        (sum, false) => sum.overflowing_add(carry_in),
    };
    let half_carry = (a & 0x0F) + (b & 0x0F) > 0x0F;

    (sum, carry, half_carry)
}

// Returns (sum, carry out of bit 15, carry out of bit 11).
fn add_u16(a: u16, b: u16) -> (u16, bool, bool) {
    let (sum, carry) = a.overflowing_add(b);
    let half_carry = (a & 0x0FFF) + (b & 0x0FFF) > 0x0FFF;

    (sum, carry, half_carry)
}

// Returns (difference, full borrow, borrow into bit 4). As with `add`, the half-borrow ignores
// any carry-in.
fn sub(a: u8, b: u8, carry_in: bool) -> (u8, bool, bool) {
    let carry_in = u8::from(carry_in);
    let (difference, carry) = match a.overflowing_sub(b) {
        (difference, true) => (difference - carry_in, true),
        (difference, false) => difference.overflowing_sub(carry_in),
    };
    let half_carry = b & 0x0F > a & 0x0F;

    (difference, carry, half_carry)
}

// The flags for SP + signed offset come from the low-byte addition, treating the offset byte
// as unsigned there.
fn add_sp_offset(sp: u16, offset: i8) -> (u16, bool, bool) {
    let result = (i32::from(sp) + i32::from(offset)) as u16;
    let (_, carry, half_carry) = add(sp as u8, offset as u8, false);

    (result, carry, half_carry)
}

fn rotate_left(value: u8) -> (u8, bool) {
    let carry = value & 0x80 != 0;
    ((value << 1) | u8::from(carry), carry)
}

fn rotate_left_thru_carry(value: u8, carry_in: bool) -> (u8, bool) {
    let carry = value & 0x80 != 0;
    ((value << 1) | u8::from(carry_in), carry)
}

fn rotate_right(value: u8) -> (u8, bool) {
    let carry = value & 0x01 != 0;
    ((value >> 1) | (u8::from(carry) << 7), carry)
}

fn rotate_right_thru_carry(value: u8, carry_in: bool) -> (u8, bool) {
    let carry = value & 0x01 != 0;
    ((value >> 1) | (u8::from(carry_in) << 7), carry)
}

fn shift_left(value: u8) -> (u8, bool) {
    (value << 1, value & 0x80 != 0)
}

fn shift_right_arithmetic(value: u8) -> (u8, bool) {
    ((value >> 1) | (value & 0x80), value & 0x01 != 0)
}

fn shift_right_logical(value: u8) -> (u8, bool) {
    (value >> 1, value & 0x01 != 0)
}

// BCD correction after an add or subtract, driven by the current flags. The subtract path only
// ever undoes the existing carries and never produces a new one.
fn decimal_adjust(value: u8, flags: Flags) -> (u8, bool) {
    if flags.subtract {
        let mut adjusted = value;
        if flags.half_carry {
            adjusted = adjusted.wrapping_sub(0x06);
        }
        if flags.carry {
            adjusted = adjusted.wrapping_sub(0x60);
        }

        (adjusted, flags.carry)
    } else {
        let mut adjusted = u16::from(value);
        if flags.half_carry || value & 0x0F > 0x09 {
            adjusted += 0x06;
        }
        let carry = flags.carry || adjusted > 0x99;
        if carry {
            adjusted += 0x60;
        }

        (adjusted as u8, carry)
    }
}
