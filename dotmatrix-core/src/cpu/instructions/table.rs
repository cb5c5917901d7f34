//! Opcode decode tables: fixed 256-entry arrays mapping each opcode byte to an operation
//! descriptor. Immediate operand bytes are not decoded here; operations fetch them from the
//! instruction stream when they execute.

use crate::cpu::instructions::{
    JumpCondition, ModifyTarget, Operation, ReadTarget, WordOperand, WriteTarget,
};
use crate::cpu::registers::{CpuRegister, CpuRegisterPair};
use once_cell::sync::Lazy;
use std::array;

/// Decode table for unprefixed opcodes, indexed by opcode byte.
pub(crate) static OPCODE_TABLE: Lazy<[Operation; 256]> =
    Lazy::new(|| array::from_fn(|opcode| standard_operation(opcode as u8)));

/// Decode table for 0xCB-prefixed opcodes, indexed by the byte following the prefix.
pub(crate) static CB_OPCODE_TABLE: Lazy<[Operation; 256]> =
    Lazy::new(|| array::from_fn(|opcode| cb_prefixed_operation(opcode as u8)));

fn standard_operation(opcode: u8) -> Operation {
    match opcode {
        0x00 => Operation::NoOp,
        0x01 | 0x11 | 0x21 | 0x31 => {
            Operation::LoadRegisterPairImmediate(word_operand(opcode))
        }
        0x02 => Operation::Load(WriteTarget::IndirectBC, ReadTarget::Accumulator),
        0x03 | 0x13 | 0x23 | 0x33 => Operation::IncRegisterPair(word_operand(opcode)),
        0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => {
            Operation::Increment(modify_target_from_mid_bits(opcode))
        }
        0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => {
            Operation::Decrement(modify_target_from_mid_bits(opcode))
        }
        0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => {
            Operation::Load(write_target_from_mid_bits(opcode), ReadTarget::Immediate)
        }
        0x07 => Operation::RotateLeft(ModifyTarget::Accumulator),
        0x08 => Operation::LoadDirectStackPointer,
        0x09 | 0x19 | 0x29 | 0x39 => Operation::AddHLRegister(word_operand(opcode)),
        0x0A => Operation::Load(WriteTarget::Accumulator, ReadTarget::IndirectBC),
        0x0B | 0x1B | 0x2B | 0x3B => Operation::DecRegisterPair(word_operand(opcode)),
        0x0F => Operation::RotateRight(ModifyTarget::Accumulator),
        0x10 => Operation::Stop,
        0x12 => Operation::Load(WriteTarget::IndirectDE, ReadTarget::Accumulator),
        0x17 => Operation::RotateLeftThruCarry(ModifyTarget::Accumulator),
        0x18 => Operation::RelativeJump,
        0x1A => Operation::Load(WriteTarget::Accumulator, ReadTarget::IndirectDE),
        0x1F => Operation::RotateRightThruCarry(ModifyTarget::Accumulator),
        0x20 | 0x28 | 0x30 | 0x38 => Operation::RelativeJumpCond(jump_condition(opcode)),
        0x22 => Operation::Load(WriteTarget::IndirectHLInc, ReadTarget::Accumulator),
        0x27 => Operation::DecimalAdjustAccumulator,
        0x2A => Operation::Load(WriteTarget::Accumulator, ReadTarget::IndirectHLInc),
        0x2F => Operation::ComplementAccumulator,
        0x32 => Operation::Load(WriteTarget::IndirectHLDec, ReadTarget::Accumulator),
        0x37 => Operation::SetCarryFlag,
        0x3A => Operation::Load(WriteTarget::Accumulator, ReadTarget::IndirectHLDec),
        0x3F => Operation::ComplementCarryFlag,
        0x40..=0x7F => {
            if opcode == 0x76 {
                Operation::Halt
            } else {
                Operation::Load(
                    write_target_from_mid_bits(opcode),
                    read_target_from_low_bits(opcode),
                )
            }
        }
        0x80..=0x87 => Operation::Add(read_target_from_low_bits(opcode)),
        0x88..=0x8F => Operation::AddWithCarry(read_target_from_low_bits(opcode)),
        0x90..=0x97 => Operation::Subtract(read_target_from_low_bits(opcode)),
        0x98..=0x9F => Operation::SubtractWithCarry(read_target_from_low_bits(opcode)),
        0xA0..=0xA7 => Operation::And(read_target_from_low_bits(opcode)),
        0xA8..=0xAF => Operation::Xor(read_target_from_low_bits(opcode)),
        0xB0..=0xB7 => Operation::Or(read_target_from_low_bits(opcode)),
        0xB8..=0xBF => Operation::Compare(read_target_from_low_bits(opcode)),
        0xC0 | 0xC8 | 0xD0 | 0xD8 => Operation::ReturnCond(jump_condition(opcode)),
        0xC1 | 0xD1 | 0xE1 | 0xF1 => Operation::PopStack(push_pop_pair(opcode)),
        0xC2 | 0xCA | 0xD2 | 0xDA => Operation::JumpCond(jump_condition(opcode)),
        0xC3 => Operation::Jump,
        0xC4 | 0xCC | 0xD4 | 0xDC => Operation::CallCond(jump_condition(opcode)),
        0xC5 | 0xD5 | 0xE5 | 0xF5 => Operation::PushStack(push_pop_pair(opcode)),
        0xC6 => Operation::Add(ReadTarget::Immediate),
        0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => {
            Operation::RestartCall(opcode & 0x38)
        }
        0xC9 => Operation::Return,
        // The CB prefix byte is consumed by the fetch loop, which dispatches the following
        // byte through CB_OPCODE_TABLE; it is never executed from this table
        0xCB => Operation::Unimplemented,
        0xCD => Operation::Call,
        0xCE => Operation::AddWithCarry(ReadTarget::Immediate),
        0xD6 => Operation::Subtract(ReadTarget::Immediate),
        0xD9 => Operation::ReturnFromInterruptHandler,
        0xDE => Operation::SubtractWithCarry(ReadTarget::Immediate),
        0xE0 => Operation::Load(WriteTarget::FFDirect, ReadTarget::Accumulator),
        0xE2 => Operation::Load(WriteTarget::FFIndirectC, ReadTarget::Accumulator),
        0xE6 => Operation::And(ReadTarget::Immediate),
        0xE8 => Operation::AddSPImmediate,
        0xE9 => Operation::JumpHL,
        0xEA => Operation::Load(WriteTarget::Direct, ReadTarget::Accumulator),
        0xEE => Operation::Xor(ReadTarget::Immediate),
        0xF0 => Operation::Load(WriteTarget::Accumulator, ReadTarget::FFDirect),
        0xF2 => Operation::Load(WriteTarget::Accumulator, ReadTarget::FFIndirectC),
        0xF3 => Operation::DisableInterrupts,
        0xF6 => Operation::Or(ReadTarget::Immediate),
        0xF8 => Operation::LoadHLStackPointerOffset,
        0xF9 => Operation::LoadStackPointerHL,
        0xFA => Operation::Load(WriteTarget::Accumulator, ReadTarget::Direct),
        0xFB => Operation::EnableInterrupts,
        0xFE => Operation::Compare(ReadTarget::Immediate),
        _ => Operation::Unimplemented,
    }
}

fn cb_prefixed_operation(opcode: u8) -> Operation {
    match opcode {
        0x00..=0x07 => Operation::RotateLeft(modify_target_from_low_bits(opcode)),
        0x08..=0x0F => Operation::RotateRight(modify_target_from_low_bits(opcode)),
        0x10..=0x17 => Operation::RotateLeftThruCarry(modify_target_from_low_bits(opcode)),
        0x18..=0x1F => Operation::RotateRightThruCarry(modify_target_from_low_bits(opcode)),
        0x20..=0x27 => Operation::ShiftLeft(modify_target_from_low_bits(opcode)),
        0x28..=0x2F => Operation::ArithmeticShiftRight(modify_target_from_low_bits(opcode)),
        0x30..=0x37 => Operation::Swap(modify_target_from_low_bits(opcode)),
        0x38..=0x3F => Operation::LogicalShiftRight(modify_target_from_low_bits(opcode)),
        0x40..=0x7F => Operation::TestBit(cb_bit(opcode), read_target_from_low_bits(opcode)),
        0x80..=0xBF => Operation::ResetBit(cb_bit(opcode), modify_target_from_low_bits(opcode)),
        0xC0..=0xFF => Operation::SetBit(cb_bit(opcode), modify_target_from_low_bits(opcode)),
    }
}

fn read_target_from_low_bits(opcode: u8) -> ReadTarget {
    match CpuRegister::from_opcode_bits(opcode) {
        Some(register) => ReadTarget::Register(register),
        None => ReadTarget::IndirectHL,
    }
}

fn write_target_from_mid_bits(opcode: u8) -> WriteTarget {
    match CpuRegister::from_opcode_bits(opcode >> 3) {
        Some(register) => WriteTarget::Register(register),
        None => WriteTarget::IndirectHL,
    }
}

fn modify_target_from_mid_bits(opcode: u8) -> ModifyTarget {
    match CpuRegister::from_opcode_bits(opcode >> 3) {
        Some(register) => ModifyTarget::Register(register),
        None => ModifyTarget::IndirectHL,
    }
}

fn modify_target_from_low_bits(opcode: u8) -> ModifyTarget {
    match CpuRegister::from_opcode_bits(opcode) {
        Some(register) => ModifyTarget::Register(register),
        None => ModifyTarget::IndirectHL,
    }
}

fn word_operand(opcode: u8) -> WordOperand {
    match opcode & 0x30 {
        0x00 => WordOperand::Pair(CpuRegisterPair::BC),
        0x10 => WordOperand::Pair(CpuRegisterPair::DE),
        0x20 => WordOperand::Pair(CpuRegisterPair::HL),
        0x30 => WordOperand::StackPointer,
        _ => panic!("{opcode:02X} & 0x30 produced a value outside 0x00..=0x30"),
    }
}

fn push_pop_pair(opcode: u8) -> CpuRegisterPair {
    match opcode & 0x30 {
        0x00 => CpuRegisterPair::BC,
        0x10 => CpuRegisterPair::DE,
        0x20 => CpuRegisterPair::HL,
        0x30 => CpuRegisterPair::AF,
        _ => panic!("{opcode:02X} & 0x30 produced a value outside 0x00..=0x30"),
    }
}

fn jump_condition(opcode: u8) -> JumpCondition {
    match opcode & 0x18 {
        0x00 => JumpCondition::NZ,
        0x08 => JumpCondition::Z,
        0x10 => JumpCondition::NC,
        0x18 => JumpCondition::C,
        _ => panic!("{opcode:02X} & 0x18 produced a value outside 0x00..=0x18"),
    }
}

fn cb_bit(opcode: u8) -> u8 {
    (opcode & 0x38) >> 3
}
