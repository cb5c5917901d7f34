mod lcdc;

use crate::memory::address;
pub use lcdc::{Lcdc, SpriteMode, TileDataRange};

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoRegister {
    JOYP,
    SB,
    SC,
    DIV,
    TIMA,
    TMA,
    TAC,
    NR10,
    NR11,
    NR12,
    NR13,
    NR14,
    NR21,
    NR22,
    NR23,
    NR24,
    NR30,
    NR31,
    NR32,
    NR33,
    NR34,
    NR41,
    NR42,
    NR43,
    NR44,
    NR50,
    NR51,
    NR52,
    LCDC,
    STAT,
    SCY,
    SCX,
    LY,
    LYC,
    DMA,
    BGP,
    OBP0,
    OBP1,
    WY,
    WX,
}

impl IoRegister {
    /// Return the hardware register corresponding to the given address. The interrupt flag
    /// register (0xFF0F) is not part of this block; the bus routes it to the interrupt latch.
    pub fn from_address(address: u16) -> Option<Self> {
        let register = match address {
            0xFF00 => Self::JOYP,
            0xFF01 => Self::SB,
            0xFF02 => Self::SC,
            0xFF04 => Self::DIV,
            0xFF05 => Self::TIMA,
            0xFF06 => Self::TMA,
            0xFF07 => Self::TAC,
            0xFF10 => Self::NR10,
            0xFF11 => Self::NR11,
            0xFF12 => Self::NR12,
            0xFF13 => Self::NR13,
            0xFF14 => Self::NR14,
            0xFF16 => Self::NR21,
            0xFF17 => Self::NR22,
            0xFF18 => Self::NR23,
            0xFF19 => Self::NR24,
            0xFF1A => Self::NR30,
            0xFF1B => Self::NR31,
            0xFF1C => Self::NR32,
            0xFF1D => Self::NR33,
            0xFF1E => Self::NR34,
            0xFF20 => Self::NR41,
            0xFF21 => Self::NR42,
            0xFF22 => Self::NR43,
            0xFF23 => Self::NR44,
            0xFF24 => Self::NR50,
            0xFF25 => Self::NR51,
            0xFF26 => Self::NR52,
            0xFF40 => Self::LCDC,
            0xFF41 => Self::STAT,
            0xFF42 => Self::SCY,
            0xFF43 => Self::SCX,
            0xFF44 => Self::LY,
            0xFF45 => Self::LYC,
            0xFF46 => Self::DMA,
            0xFF47 => Self::BGP,
            0xFF48 => Self::OBP0,
            0xFF49 => Self::OBP1,
            0xFF4A => Self::WY,
            0xFF4B => Self::WX,
            _ => return None,
        };

        Some(register)
    }

    /// Return the address for this hardware register.
    pub fn to_address(self) -> u16 {
        match self {
            Self::JOYP => 0xFF00,
            Self::SB => 0xFF01,
            Self::SC => 0xFF02,
            Self::DIV => 0xFF04,
            Self::TIMA => 0xFF05,
            Self::TMA => 0xFF06,
            Self::TAC => 0xFF07,
            Self::NR10 => 0xFF10,
            Self::NR11 => 0xFF11,
            Self::NR12 => 0xFF12,
            Self::NR13 => 0xFF13,
            Self::NR14 => 0xFF14,
            Self::NR21 => 0xFF16,
            Self::NR22 => 0xFF17,
            Self::NR23 => 0xFF18,
            Self::NR24 => 0xFF19,
            Self::NR30 => 0xFF1A,
            Self::NR31 => 0xFF1B,
            Self::NR32 => 0xFF1C,
            Self::NR33 => 0xFF1D,
            Self::NR34 => 0xFF1E,
            Self::NR41 => 0xFF20,
            Self::NR42 => 0xFF21,
            Self::NR43 => 0xFF22,
            Self::NR44 => 0xFF23,
            Self::NR50 => 0xFF24,
            Self::NR51 => 0xFF25,
            Self::NR52 => 0xFF26,
            Self::LCDC => 0xFF40,
            Self::STAT => 0xFF41,
            Self::SCY => 0xFF42,
            Self::SCX => 0xFF43,
            Self::LY => 0xFF44,
            Self::LYC => 0xFF45,
            Self::DMA => 0xFF46,
            Self::BGP => 0xFF47,
            Self::OBP0 => 0xFF48,
            Self::OBP1 => 0xFF49,
            Self::WY => 0xFF4A,
            Self::WX => 0xFF4B,
        }
    }

    /// Return whether or not the CPU is allowed to read this hardware register.
    pub fn is_cpu_readable(self) -> bool {
        !matches!(self, Self::NR13 | Self::NR23 | Self::NR31 | Self::NR33 | Self::NR41)
    }

    /// Return whether or not the CPU is allowed to write to this hardware register.
    pub fn is_cpu_writable(self) -> bool {
        !matches!(self, Self::LY)
    }

    /// Return whether or not this is an audio register.
    pub fn is_audio_register(self) -> bool {
        matches!(
            self,
            Self::NR10
                | Self::NR11
                | Self::NR12
                | Self::NR13
                | Self::NR14
                | Self::NR21
                | Self::NR22
                | Self::NR23
                | Self::NR24
                | Self::NR30
                | Self::NR31
                | Self::NR32
                | Self::NR33
                | Self::NR34
                | Self::NR41
                | Self::NR42
                | Self::NR43
                | Self::NR44
                | Self::NR50
                | Self::NR51
                | Self::NR52
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoRegisters {
    contents: [u8; 0x80],
}

impl IoRegisters {
    const JOYP_RELATIVE_ADDR: usize = 0x00;
    const DIV_RELATIVE_ADDR: usize = 0x04;
    const NR52_RELATIVE_ADDR: usize = 0x26;
    const LCDC_RELATIVE_ADDR: usize = 0x40;
    const STAT_RELATIVE_ADDR: usize = 0x41;
    const LY_RELATIVE_ADDR: usize = 0x44;

    pub fn new() -> Self {
        let mut contents = [0; 0x80];

        // JOYP
        contents[0x00] = 0xCF;

        // SC
        contents[0x02] = 0x7E;

        // DIV
        contents[0x04] = 0x18;

        // TAC
        contents[0x07] = 0xF8;

        // NR52
        contents[0x26] = 0xF1;

        // LCDC
        contents[0x40] = 0x91;

        // STAT
        contents[0x41] = 0x86;

        // DMA
        contents[0x46] = 0xFF;

        // BGP
        contents[0x47] = 0xFC;

        Self { contents }
    }

    /// Read the value from the hardware register at the given address. Returns 0xFF if the address
    /// is invalid or the register is not readable by the CPU.
    pub fn read_address(&self, address: u16) -> u8 {
        if is_waveform_address(address) {
            return self.contents[(address - address::IO_REGISTERS_START) as usize];
        }

        let Some(register) = IoRegister::from_address(address) else { return 0xFF };

        if !register.is_cpu_readable() {
            return 0xFF;
        }

        let byte = self.contents[(address - address::IO_REGISTERS_START) as usize];
        match register {
            IoRegister::JOYP => (byte & 0x3F) | 0xC0,
            IoRegister::SC => byte | 0x7E,
            IoRegister::STAT | IoRegister::NR10 => byte | 0x80,
            IoRegister::NR11 | IoRegister::NR21 => byte | 0x3F,
            IoRegister::NR30 => byte | 0x7F,
            IoRegister::NR32 => byte | 0x9F,
            IoRegister::NR14 | IoRegister::NR24 | IoRegister::NR34 | IoRegister::NR44 => {
                byte | 0xBF
            }
            IoRegister::NR52 => byte | 0x70,
            _ => byte,
        }
    }

    /// Assign a value to the hardware register at the given address. Does nothing if the address
    /// is invalid or the register is not writable by the CPU.
    pub fn write_address(&mut self, address: u16, value: u8) {
        if is_waveform_address(address) {
            self.contents[(address - address::IO_REGISTERS_START) as usize] = value;
            return;
        }

        let Some(register) = IoRegister::from_address(address) else { return };

        if !register.is_cpu_writable() {
            return;
        }

        // Audio registers other than NR52 are not writable while the APU is disabled
        let apu_enabled = self.contents[Self::NR52_RELATIVE_ADDR] & 0x80 != 0;
        if !apu_enabled && register.is_audio_register() && register != IoRegister::NR52 {
            return;
        }

        let relative_addr = (address - address::IO_REGISTERS_START) as usize;
        match register {
            IoRegister::DIV => {
                // All writes to DIV reset the value to 0
                self.contents[relative_addr] = 0x00;
            }
            IoRegister::JOYP => {
                // Only the group-select bits are writable
                let existing_value = self.contents[relative_addr];
                self.contents[relative_addr] = (existing_value & 0xCF) | (value & 0x30);
            }
            IoRegister::STAT => {
                // Bits 0-2 belong to the PPU
                let existing_value = self.contents[relative_addr];
                self.contents[relative_addr] = (existing_value & 0x87) | (value & 0x78);
            }
            IoRegister::NR52 => {
                let existing_value = self.contents[relative_addr];
                self.contents[relative_addr] = (value & 0x80) | (existing_value & 0x0F);
            }
            _ => {
                self.contents[relative_addr] = value;
            }
        }
    }

    /// Read the value from the given hardware register. Returns 0xFF if the register is not
    /// readable by the CPU.
    pub fn read_register(&self, register: IoRegister) -> u8 {
        self.read_address(register.to_address())
    }

    /// Assign a value to the given hardware register. Does nothing if the register is not
    /// writable by the CPU.
    pub fn write_register(&mut self, register: IoRegister, value: u8) {
        self.write_address(register.to_address(), value);
    }

    /// Read the JOYP register including bits the CPU cannot read. The bus uses this to pick up
    /// the group-select bits when composing a JOYP read.
    pub fn privileged_read_joyp(&self) -> u8 {
        self.contents[Self::JOYP_RELATIVE_ADDR] | 0xC0
    }

    /// Assign a value to the STAT register (LCD status), including bits that the CPU cannot
    /// write. Should only be used by the PPU.
    pub fn privileged_set_stat(&mut self, value: u8) {
        self.contents[Self::STAT_RELATIVE_ADDR] = value & 0x7F;
    }

    /// Assign a value to the LY register (current scanline), which the CPU cannot normally write
    /// to. Should only be used by the PPU.
    pub fn privileged_set_ly(&mut self, value: u8) {
        self.contents[Self::LY_RELATIVE_ADDR] = value;
    }

    /// Assign a value to the DIV register (timer divider), which is normally always reset to 0x00
    /// when the CPU writes to it. Should only be used by the timer code.
    pub fn privileged_set_div(&mut self, value: u8) {
        self.contents[Self::DIV_RELATIVE_ADDR] = value;
    }

    /// Obtain a read-only view around the LCDC register (LCD control).
    pub fn lcdc(&self) -> Lcdc<'_> {
        Lcdc(&self.contents[Self::LCDC_RELATIVE_ADDR])
    }
}

impl Default for IoRegisters {
    fn default() -> Self {
        Self::new()
    }
}

fn is_waveform_address(address: u16) -> bool {
    (0xFF30..=0xFF3F).contains(&address)
}
