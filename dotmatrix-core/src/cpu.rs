//! Sharp SM83 interpreter: fetch and dispatch through fixed 256-entry decode tables, the
//! interrupt service routine, and the HALT wake rules.

pub(crate) mod instructions;
mod registers;

pub use registers::{CpuRegister, CpuRegisterPair, CpuRegisters, Flags};

use crate::cpu::instructions::table::{CB_OPCODE_TABLE, OPCODE_TABLE};
use crate::cpu::instructions::Operation;
use crate::interrupts::{InterruptLatch, InterruptType};
use crate::memory::Bus;
use thiserror::Error;

const ISR_CYCLES_REQUIRED: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepError {
    #[error("opcode 0x{opcode:02X} at address 0x{address:04X} has no implementation")]
    UnimplementedOpcode { opcode: u8, address: u16 },
}

#[derive(Debug, Clone)]
pub(crate) struct Cpu {
    pub(crate) registers: CpuRegisters,
    pub(crate) ime: bool,
    pub(crate) interrupt_delay: bool,
    pub(crate) halted: bool,
}

impl Cpu {
    /// A CPU in the post-boot state, about to execute the cartridge entry point.
    pub(crate) fn new() -> Self {
        Self {
            registers: CpuRegisters::new(),
            ime: false,
            interrupt_delay: false,
            halted: false,
        }
    }

    /// A zeroed CPU for running a boot ROM from address 0.
    pub(crate) fn zeroed() -> Self {
        Self {
            registers: CpuRegisters::zeroed(),
            ime: false,
            interrupt_delay: false,
            halted: false,
        }
    }

    /// Runs one step: either services a pending interrupt, burns a halted cycle, or fetches
    /// and executes the instruction at PC. Returns the number of clock cycles consumed,
    /// always a positive multiple of 4.
    pub(crate) fn step<B: Bus>(&mut self, bus: &mut B) -> Result<u32, StepError> {
        if self.interrupt_triggered(bus) {
            self.halted = false;
            self.service_interrupt(bus);
            return Ok(ISR_CYCLES_REQUIRED);
        }

        if self.halted {
            // A requested + enabled interrupt ends the halt even while IME is cleared; the
            // CPU resumes at the instruction after HALT without servicing anything
            if bus.interrupts().pending() {
                self.halted = false;
            } else {
                return Ok(4);
            }
        }

        let address = self.registers.pc;
        let opcode = bus.read_address_u8(address);
        self.registers.pc = address.wrapping_add(1);

        let operation = if opcode == 0xCB {
            let cb_opcode = bus.read_address_u8(self.registers.pc);
            self.registers.pc = self.registers.pc.wrapping_add(1);
            CB_OPCODE_TABLE[usize::from(cb_opcode)]
        } else {
            OPCODE_TABLE[usize::from(opcode)]
        };

        if operation == Operation::Unimplemented {
            return Err(StepError::UnimplementedOpcode { opcode, address });
        }

        // Conditional control flow costs depend on the flags as they are right now, so the
        // cycle count must be taken before execution
        let cycles_required = operation.cycles_required(&self.registers);
        log::trace!(
            "Executing {operation:02X?} at 0x{address:04X}, will take {cycles_required} cycles"
        );

        operation.execute(bus, &mut self.registers);

        self.interrupt_delay = false;
        match operation {
            Operation::EnableInterrupts => {
                self.ime = true;
                // The enable only takes effect after the following instruction
                self.interrupt_delay = true;
            }
            Operation::DisableInterrupts => {
                self.ime = false;
            }
            Operation::ReturnFromInterruptHandler => {
                self.ime = true;
            }
            Operation::Halt | Operation::Stop => {
                self.halted = true;
            }
            _ => {}
        }

        Ok(cycles_required)
    }

    fn interrupt_triggered<B: Bus>(&self, bus: &B) -> bool {
        self.ime && !self.interrupt_delay && bus.interrupts().pending()
    }

    fn service_interrupt<B: Bus>(&mut self, bus: &mut B) {
        let Some(interrupt_type) = highest_priority_interrupt(bus.interrupts()) else {
            panic!("interrupt service routine entered with no pending interrupt");
        };

        log::trace!(
            "Servicing {interrupt_type:?} interrupt, pushing PC=0x{:04X} and jumping to 0x{:04X}",
            self.registers.pc,
            interrupt_type.handler_address()
        );

        let return_address = self.registers.pc;
        instructions::push_stack(bus, &mut self.registers, return_address);
        self.registers.pc = interrupt_type.handler_address();

        bus.interrupts_mut().clear(interrupt_type);
        self.ime = false;
    }
}

/// The requested + enabled interrupt that the service routine should dispatch next. The latch
/// stores bits only; the priority order (V-blank first, joypad last) is fixed here.
fn highest_priority_interrupt(latch: &InterruptLatch) -> Option<InterruptType> {
    let masked = latch.read_flags() & latch.read_enabled() & 0x1F;
    [
        InterruptType::VBlank,
        InterruptType::LcdStatus,
        InterruptType::Timer,
        InterruptType::Serial,
        InterruptType::Joypad,
    ]
    .into_iter()
    .find(|interrupt_type| masked & interrupt_type.bit() != 0)
}
