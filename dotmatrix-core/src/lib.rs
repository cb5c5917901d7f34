//! Emulation core for the original monochrome handheld: the SM83 CPU, the memory
//! bus and cartridge, the pixel processing unit, the timer, the serial port, and
//! the joypad, all driven one CPU instruction at a time through [`Console`].

mod cpu;
mod interrupts;
mod joypad;
mod memory;
mod ppu;
mod timer;

pub use cpu::{CpuRegister, CpuRegisterPair, CpuRegisters, Flags, StepError};
pub use joypad::Button;
pub use memory::address::BOOT_ROM_LEN;
pub use memory::{Cartridge, CartridgeLoadError};
pub use ppu::{FrameBuffer, SCREEN_HEIGHT, SCREEN_WIDTH};

use crate::cpu::Cpu;
use crate::interrupts::InterruptType;
use crate::memory::{AddressSpace, Bus};
use crate::ppu::PpuState;

/// The fully assembled console: CPU, address space, and PPU wired together.
///
/// Callers drive emulation with [`Console::step`], which executes one CPU
/// instruction and advances every other component by the cycles it consumed.
pub struct Console {
    cpu: Cpu,
    address_space: AddressSpace,
    ppu_state: PpuState,
}

impl Console {
    /// Create a console in the post-boot state, with registers set to the values
    /// the boot ROM leaves behind and execution starting at the cartridge entry
    /// point.
    pub fn new(cartridge: Cartridge) -> Self {
        Self {
            cpu: Cpu::new(),
            address_space: AddressSpace::new(cartridge),
            ppu_state: PpuState::new(),
        }
    }

    /// Create a console that boots through the given boot ROM, with all CPU
    /// registers zeroed and execution starting at address 0x0000. The boot ROM
    /// stays mapped over the cartridge until it writes to the unmap register.
    pub fn with_boot_rom(cartridge: Cartridge, boot_rom: [u8; BOOT_ROM_LEN]) -> Self {
        Self {
            cpu: Cpu::zeroed(),
            address_space: AddressSpace::with_boot_rom(cartridge, boot_rom),
            ppu_state: PpuState::new(),
        }
    }

    /// Execute one CPU instruction (or service one interrupt) and advance the
    /// PPU and timer by the number of clock cycles that took. Returns the cycle
    /// count on success.
    ///
    /// Returns an error if the CPU fetches an opcode that has no implementation;
    /// the console is left in a resumable state and the caller decides whether
    /// to continue.
    pub fn step(&mut self) -> Result<u32, StepError> {
        // Read the TMA register before executing anything in case the
        // instruction updates the register
        let timer_modulo = timer::read_timer_modulo(self.address_space.io_registers());

        let cycles = self.cpu.step(&mut self.address_space)?;
        assert!(cycles > 0 && cycles % 4 == 0);

        self.ppu_state.tick(cycles, &mut self.address_space);
        self.address_space.tick_timer(timer_modulo, cycles);

        Ok(cycles)
    }

    /// Step repeatedly until the PPU finishes the current frame.
    ///
    /// This ignores breakpoints; callers that poll [`Console::breakpoint_hit`]
    /// should drive [`Console::step`] directly.
    pub fn step_frame(&mut self) -> Result<(), StepError> {
        self.ppu_state.clear_frame_complete();
        while !self.ppu_state.frame_complete() {
            self.step()?;
        }
        Ok(())
    }

    /// Whether the PPU has entered VBlank since the flag was last cleared.
    pub fn frame_ready(&self) -> bool {
        self.ppu_state.frame_complete()
    }

    pub fn clear_frame_ready(&mut self) {
        self.ppu_state.clear_frame_complete();
    }

    /// The most recently completed frame, one shade (0-3) per pixel in row-major
    /// order.
    pub fn frame_buffer(&self) -> &FrameBuffer {
        self.ppu_state.frame_buffer()
    }

    /// Press a button. Requests a joypad interrupt on the released-to-pressed
    /// edge; holding a button does not re-request.
    pub fn press_button(&mut self, button: Button) {
        if self.address_space.joypad_mut().press(button as u8) {
            log::debug!("{button} pressed");
            self.address_space
                .interrupts_mut()
                .request(InterruptType::Joypad);
        }
    }

    pub fn release_button(&mut self, button: Button) {
        self.address_space.joypad_mut().release(button as u8);
    }

    /// Every byte the game has pushed out the serial port so far.
    pub fn serial_output(&self) -> &[u8] {
        self.address_space.serial_output()
    }

    /// Drain the serial output buffer.
    pub fn take_serial_output(&mut self) -> Vec<u8> {
        self.address_space.take_serial_output()
    }

    /// Arm a breakpoint that trips when the CPU writes to the given address.
    /// Only one breakpoint can be armed at a time.
    pub fn set_breakpoint(&mut self, address: u16) {
        self.address_space.set_breakpoint(address);
    }

    pub fn clear_breakpoint(&mut self) {
        self.address_space.clear_breakpoint();
    }

    /// Whether the armed breakpoint has tripped since the flag was last cleared.
    /// Stepping never stops mid-instruction; the flag latches and the caller
    /// checks it between steps.
    pub fn breakpoint_hit(&self) -> bool {
        self.address_space.breakpoint_hit()
    }

    pub fn clear_breakpoint_hit(&mut self) {
        self.address_space.clear_breakpoint_hit();
    }

    pub fn registers(&self) -> &CpuRegisters {
        &self.cpu.registers
    }

    /// Reads a byte through the bus, for memory dumps. Has no side effects.
    pub fn read_memory(&self, address: u16) -> u8 {
        self.address_space.read_address_u8(address)
    }

    /// The game title from the cartridge header.
    pub fn cartridge_title(&self) -> &str {
        self.address_space.cartridge_title()
    }
}
