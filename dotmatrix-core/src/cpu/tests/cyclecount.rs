use crate::cpu::instructions::{JumpCondition, ModifyTarget, ReadTarget, WordOperand, WriteTarget};
use crate::cpu::registers::{CpuRegister, CpuRegisterPair};
use crate::cpu::CpuRegisters;

#[test]
fn validate_cycles_required() {
    use crate::cpu::instructions::Operation as O;

    let cr = CpuRegisters::new();

    // 8-bit load instructions
    assert_eq!(
        4,
        O::Load(WriteTarget::Register(CpuRegister::A), ReadTarget::Register(CpuRegister::B))
            .cycles_required(&cr)
    );
    assert_eq!(
        8,
        O::Load(WriteTarget::Register(CpuRegister::A), ReadTarget::Immediate).cycles_required(&cr)
    );
    assert_eq!(
        8,
        O::Load(WriteTarget::Register(CpuRegister::A), ReadTarget::IndirectHL).cycles_required(&cr)
    );
    assert_eq!(
        8,
        O::Load(WriteTarget::IndirectHL, ReadTarget::Register(CpuRegister::A)).cycles_required(&cr)
    );
    assert_eq!(12, O::Load(WriteTarget::IndirectHL, ReadTarget::Immediate).cycles_required(&cr));
    assert_eq!(8, O::Load(WriteTarget::Accumulator, ReadTarget::IndirectBC).cycles_required(&cr));
    assert_eq!(8, O::Load(WriteTarget::Accumulator, ReadTarget::IndirectDE).cycles_required(&cr));
    assert_eq!(8, O::Load(WriteTarget::IndirectBC, ReadTarget::Accumulator).cycles_required(&cr));
    assert_eq!(8, O::Load(WriteTarget::IndirectDE, ReadTarget::Accumulator).cycles_required(&cr));
    assert_eq!(16, O::Load(WriteTarget::Accumulator, ReadTarget::Direct).cycles_required(&cr));
    assert_eq!(16, O::Load(WriteTarget::Direct, ReadTarget::Accumulator).cycles_required(&cr));
    assert_eq!(8, O::Load(WriteTarget::Accumulator, ReadTarget::FFIndirectC).cycles_required(&cr));
    assert_eq!(8, O::Load(WriteTarget::FFIndirectC, ReadTarget::Accumulator).cycles_required(&cr));
    assert_eq!(12, O::Load(WriteTarget::Accumulator, ReadTarget::FFDirect).cycles_required(&cr));
    assert_eq!(12, O::Load(WriteTarget::FFDirect, ReadTarget::Accumulator).cycles_required(&cr));
    assert_eq!(
        8,
        O::Load(WriteTarget::Accumulator, ReadTarget::IndirectHLDec).cycles_required(&cr)
    );
    assert_eq!(
        8,
        O::Load(WriteTarget::IndirectHLDec, ReadTarget::Accumulator).cycles_required(&cr)
    );
    assert_eq!(
        8,
        O::Load(WriteTarget::Accumulator, ReadTarget::IndirectHLInc).cycles_required(&cr)
    );
    assert_eq!(
        8,
        O::Load(WriteTarget::IndirectHLInc, ReadTarget::Accumulator).cycles_required(&cr)
    );

    // 16-bit load instructions
    assert_eq!(
        12,
        O::LoadRegisterPairImmediate(WordOperand::Pair(CpuRegisterPair::BC)).cycles_required(&cr)
    );
    assert_eq!(
        12,
        O::LoadRegisterPairImmediate(WordOperand::StackPointer).cycles_required(&cr)
    );
    assert_eq!(20, O::LoadDirectStackPointer.cycles_required(&cr));
    assert_eq!(8, O::LoadStackPointerHL.cycles_required(&cr));
    assert_eq!(16, O::PushStack(CpuRegisterPair::BC).cycles_required(&cr));
    assert_eq!(12, O::PopStack(CpuRegisterPair::BC).cycles_required(&cr));

    // 8-bit arithmetic/logical instructions
    assert_eq!(4, O::Add(ReadTarget::Register(CpuRegister::B)).cycles_required(&cr));
    assert_eq!(8, O::Add(ReadTarget::IndirectHL).cycles_required(&cr));
    assert_eq!(8, O::Add(ReadTarget::Immediate).cycles_required(&cr));
    assert_eq!(4, O::AddWithCarry(ReadTarget::Register(CpuRegister::B)).cycles_required(&cr));
    assert_eq!(8, O::AddWithCarry(ReadTarget::IndirectHL).cycles_required(&cr));
    assert_eq!(8, O::AddWithCarry(ReadTarget::Immediate).cycles_required(&cr));
    assert_eq!(4, O::Subtract(ReadTarget::Register(CpuRegister::B)).cycles_required(&cr));
    assert_eq!(8, O::Subtract(ReadTarget::IndirectHL).cycles_required(&cr));
    assert_eq!(8, O::Subtract(ReadTarget::Immediate).cycles_required(&cr));
    assert_eq!(4, O::SubtractWithCarry(ReadTarget::Register(CpuRegister::B)).cycles_required(&cr));
    assert_eq!(8, O::SubtractWithCarry(ReadTarget::IndirectHL).cycles_required(&cr));
    assert_eq!(8, O::SubtractWithCarry(ReadTarget::Immediate).cycles_required(&cr));
    assert_eq!(4, O::Compare(ReadTarget::Register(CpuRegister::B)).cycles_required(&cr));
    assert_eq!(8, O::Compare(ReadTarget::IndirectHL).cycles_required(&cr));
    assert_eq!(8, O::Compare(ReadTarget::Immediate).cycles_required(&cr));
    assert_eq!(4, O::Increment(ModifyTarget::Register(CpuRegister::B)).cycles_required(&cr));
    assert_eq!(12, O::Increment(ModifyTarget::IndirectHL).cycles_required(&cr));
    assert_eq!(4, O::Decrement(ModifyTarget::Register(CpuRegister::B)).cycles_required(&cr));
    assert_eq!(12, O::Decrement(ModifyTarget::IndirectHL).cycles_required(&cr));
    assert_eq!(4, O::And(ReadTarget::Register(CpuRegister::B)).cycles_required(&cr));
    assert_eq!(8, O::And(ReadTarget::IndirectHL).cycles_required(&cr));
    assert_eq!(8, O::And(ReadTarget::Immediate).cycles_required(&cr));
    assert_eq!(4, O::Or(ReadTarget::Register(CpuRegister::B)).cycles_required(&cr));
    assert_eq!(8, O::Or(ReadTarget::IndirectHL).cycles_required(&cr));
    assert_eq!(8, O::Or(ReadTarget::Immediate).cycles_required(&cr));
    assert_eq!(4, O::Xor(ReadTarget::Register(CpuRegister::B)).cycles_required(&cr));
    assert_eq!(8, O::Xor(ReadTarget::IndirectHL).cycles_required(&cr));
    assert_eq!(8, O::Xor(ReadTarget::Immediate).cycles_required(&cr));
    assert_eq!(4, O::ComplementCarryFlag.cycles_required(&cr));
    assert_eq!(4, O::SetCarryFlag.cycles_required(&cr));
    assert_eq!(4, O::DecimalAdjustAccumulator.cycles_required(&cr));
    assert_eq!(4, O::ComplementAccumulator.cycles_required(&cr));

    // 16-bit arithmetic instructions
    assert_eq!(8, O::AddHLRegister(WordOperand::Pair(CpuRegisterPair::BC)).cycles_required(&cr));
    assert_eq!(8, O::AddHLRegister(WordOperand::StackPointer).cycles_required(&cr));
    assert_eq!(8, O::IncRegisterPair(WordOperand::Pair(CpuRegisterPair::BC)).cycles_required(&cr));
    assert_eq!(8, O::DecRegisterPair(WordOperand::Pair(CpuRegisterPair::BC)).cycles_required(&cr));
    assert_eq!(16, O::AddSPImmediate.cycles_required(&cr));
    assert_eq!(12, O::LoadHLStackPointerOffset.cycles_required(&cr));

    // Bit rotate/shift instructions
    assert_eq!(4, O::RotateLeft(ModifyTarget::Accumulator).cycles_required(&cr));
    assert_eq!(4, O::RotateLeftThruCarry(ModifyTarget::Accumulator).cycles_required(&cr));
    assert_eq!(4, O::RotateRight(ModifyTarget::Accumulator).cycles_required(&cr));
    assert_eq!(4, O::RotateRightThruCarry(ModifyTarget::Accumulator).cycles_required(&cr));
    assert_eq!(8, O::RotateLeft(ModifyTarget::Register(CpuRegister::B)).cycles_required(&cr));
    assert_eq!(16, O::RotateLeft(ModifyTarget::IndirectHL).cycles_required(&cr));
    assert_eq!(
        8,
        O::RotateLeftThruCarry(ModifyTarget::Register(CpuRegister::B)).cycles_required(&cr)
    );
    assert_eq!(16, O::RotateLeftThruCarry(ModifyTarget::IndirectHL).cycles_required(&cr));
    assert_eq!(8, O::RotateRight(ModifyTarget::Register(CpuRegister::B)).cycles_required(&cr));
    assert_eq!(16, O::RotateRight(ModifyTarget::IndirectHL).cycles_required(&cr));
    assert_eq!(
        8,
        O::RotateRightThruCarry(ModifyTarget::Register(CpuRegister::B)).cycles_required(&cr)
    );
    assert_eq!(16, O::RotateRightThruCarry(ModifyTarget::IndirectHL).cycles_required(&cr));
    assert_eq!(8, O::ShiftLeft(ModifyTarget::Register(CpuRegister::B)).cycles_required(&cr));
    assert_eq!(16, O::ShiftLeft(ModifyTarget::IndirectHL).cycles_required(&cr));
    assert_eq!(
        8,
        O::ArithmeticShiftRight(ModifyTarget::Register(CpuRegister::B)).cycles_required(&cr)
    );
    assert_eq!(16, O::ArithmeticShiftRight(ModifyTarget::IndirectHL).cycles_required(&cr));
    assert_eq!(
        8,
        O::LogicalShiftRight(ModifyTarget::Register(CpuRegister::B)).cycles_required(&cr)
    );
    assert_eq!(16, O::LogicalShiftRight(ModifyTarget::IndirectHL).cycles_required(&cr));
    assert_eq!(8, O::Swap(ModifyTarget::Register(CpuRegister::B)).cycles_required(&cr));
    assert_eq!(16, O::Swap(ModifyTarget::IndirectHL).cycles_required(&cr));

    // Single bit instructions
    assert_eq!(8, O::TestBit(0, ReadTarget::Register(CpuRegister::B)).cycles_required(&cr));
    assert_eq!(12, O::TestBit(0, ReadTarget::IndirectHL).cycles_required(&cr));
    assert_eq!(8, O::SetBit(0, ModifyTarget::Register(CpuRegister::B)).cycles_required(&cr));
    assert_eq!(16, O::SetBit(0, ModifyTarget::IndirectHL).cycles_required(&cr));
    assert_eq!(8, O::ResetBit(0, ModifyTarget::Register(CpuRegister::B)).cycles_required(&cr));
    assert_eq!(16, O::ResetBit(0, ModifyTarget::IndirectHL).cycles_required(&cr));

    // Unconditional control flow instructions
    assert_eq!(16, O::Jump.cycles_required(&cr));
    assert_eq!(4, O::JumpHL.cycles_required(&cr));
    assert_eq!(12, O::RelativeJump.cycles_required(&cr));
    assert_eq!(24, O::Call.cycles_required(&cr));
    assert_eq!(16, O::Return.cycles_required(&cr));
    assert_eq!(16, O::ReturnFromInterruptHandler.cycles_required(&cr));
    assert_eq!(16, O::RestartCall(0x18).cycles_required(&cr));
    assert_eq!(4, O::DisableInterrupts.cycles_required(&cr));
    assert_eq!(4, O::EnableInterrupts.cycles_required(&cr));
    assert_eq!(4, O::NoOp.cycles_required(&cr));
    assert_eq!(4, O::Halt.cycles_required(&cr));
    assert_eq!(4, O::Stop.cycles_required(&cr));

    // Conditional control flow instructions
    let all_flags_false = CpuRegisters::zeroed();

    assert_eq!(12, O::JumpCond(JumpCondition::Z).cycles_required(&all_flags_false));
    assert_eq!(16, O::JumpCond(JumpCondition::NZ).cycles_required(&all_flags_false));
    assert_eq!(12, O::JumpCond(JumpCondition::C).cycles_required(&all_flags_false));
    assert_eq!(16, O::JumpCond(JumpCondition::NC).cycles_required(&all_flags_false));

    assert_eq!(8, O::RelativeJumpCond(JumpCondition::Z).cycles_required(&all_flags_false));
    assert_eq!(12, O::RelativeJumpCond(JumpCondition::NZ).cycles_required(&all_flags_false));

    assert_eq!(12, O::CallCond(JumpCondition::Z).cycles_required(&all_flags_false));
    assert_eq!(24, O::CallCond(JumpCondition::NZ).cycles_required(&all_flags_false));

    assert_eq!(8, O::ReturnCond(JumpCondition::Z).cycles_required(&all_flags_false));
    assert_eq!(20, O::ReturnCond(JumpCondition::NZ).cycles_required(&all_flags_false));

    let mut carry_set = CpuRegisters::zeroed();
    carry_set.set_flags(false, false, false, true);

    assert_eq!(16, O::JumpCond(JumpCondition::C).cycles_required(&carry_set));
    assert_eq!(12, O::JumpCond(JumpCondition::NC).cycles_required(&carry_set));
    assert_eq!(12, O::RelativeJumpCond(JumpCondition::C).cycles_required(&carry_set));
    assert_eq!(8, O::RelativeJumpCond(JumpCondition::NC).cycles_required(&carry_set));
}
