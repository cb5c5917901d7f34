pub(crate) mod address;
pub(crate) mod ioregisters;
mod mapper;

use crate::interrupts::{InterruptLatch, InterruptType};
use crate::joypad::JoypadState;
use crate::memory::ioregisters::{IoRegister, IoRegisters};
use crate::memory::mapper::Mapper;
use crate::timer::{self, TimerCounter};
use std::path::Path;
use std::{fs, io};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CartridgeLoadError {
    #[error("error reading ROM image from '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("ROM image is too short to contain a cartridge header: {length} bytes")]
    HeaderTooShort { length: usize },
    #[error("unknown cartridge type byte: {mapper_byte:02X}")]
    UnknownMapperType { mapper_byte: u8 },
    #[error("unsupported cartridge type: {mapper_type}")]
    UnsupportedMapperType { mapper_type: String },
    #[error("invalid ROM size code in cartridge header: {rom_size_code:02X}")]
    InvalidRomSize { rom_size_code: u8 },
    #[error("ROM image is {actual} bytes but the header declares {declared} bytes")]
    RomSizeMismatch { declared: u32, actual: usize },
    #[error("invalid RAM size code in cartridge header: {ram_size_code:02X}")]
    InvalidRamSize { ram_size_code: u8 },
}

/// A loaded cartridge: the ROM image, any cartridge RAM, and the mapper chip state that
/// decodes banked accesses.
pub struct Cartridge {
    rom: Vec<u8>,
    ram: Vec<u8>,
    mapper: Mapper,
    title: String,
}

impl Cartridge {
    /// Parse the cartridge header and build the matching mapper.
    ///
    /// # Errors
    ///
    /// Returns an error if the header is truncated or malformed, if the ROM image is smaller
    /// than the size the header declares, or if the header names a mapper chip that this
    /// emulator does not implement.
    pub fn new(rom: Vec<u8>) -> Result<Self, CartridgeLoadError> {
        if rom.len() < address::HEADER_LEN {
            return Err(CartridgeLoadError::HeaderTooShort { length: rom.len() });
        }

        let title = parse_title(&rom);

        let mapper_byte = rom[address::MAPPER as usize];
        let (mapper_type, features) = mapper::parse_byte(mapper_byte)
            .ok_or(CartridgeLoadError::UnknownMapperType { mapper_byte })?;

        let rom_size_code = rom[address::ROM_SIZE as usize];
        if rom_size_code > 0x08 {
            return Err(CartridgeLoadError::InvalidRomSize { rom_size_code });
        }
        let rom_size = 0x8000_u32 << rom_size_code;
        if rom.len() < rom_size as usize {
            return Err(CartridgeLoadError::RomSizeMismatch {
                declared: rom_size,
                actual: rom.len(),
            });
        }

        let ram_size_code = rom[address::RAM_SIZE as usize];
        let ram_size: u32 = match ram_size_code {
            0x00 => 0,
            0x01 => 0x800,
            0x02 => 0x2000,
            0x03 => 0x8000,
            0x04 => 0x20000,
            0x05 => 0x10000,
            _ => return Err(CartridgeLoadError::InvalidRamSize { ram_size_code }),
        };

        let mapper = Mapper::new(mapper_type, rom_size, ram_size).ok_or_else(|| {
            CartridgeLoadError::UnsupportedMapperType {
                mapper_type: mapper_type.to_string(),
            }
        })?;

        log::info!(
            "loaded cartridge '{title}': mapper type {mapper_type} ({features}), {rom_size} bytes of ROM, {ram_size} bytes of RAM"
        );

        Ok(Self {
            rom,
            ram: vec![0; ram_size as usize],
            mapper,
            title,
        })
    }

    /// Read a ROM image from disk and parse it as a cartridge.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, or any error that [`Cartridge::new`] can
    /// return.
    pub fn from_file(file_path: &str) -> Result<Self, CartridgeLoadError> {
        let rom = fs::read(Path::new(file_path)).map_err(|source| {
            CartridgeLoadError::FileReadError {
                path: file_path.into(),
                source,
            }
        })?;
        Self::new(rom)
    }

    /// The title string from the cartridge header.
    pub fn title(&self) -> &str {
        &self.title
    }

    fn read_rom_address(&self, address: u16) -> u8 {
        let mapped = self.mapper.map_rom_address(address);
        self.rom.get(mapped as usize).copied().unwrap_or(0xFF)
    }

    fn write_rom_address(&mut self, address: u16, value: u8) {
        self.mapper.write_rom_address(address, value);
    }

    fn read_ram_address(&self, address: u16) -> u8 {
        match self.mapper.map_ram_address(address) {
            Some(mapped) => self.ram.get(mapped as usize).copied().unwrap_or(0xFF),
            None => 0xFF,
        }
    }

    fn write_ram_address(&mut self, address: u16, value: u8) {
        if let Some(mapped) = self.mapper.map_ram_address(address) {
            if let Some(ram_byte) = self.ram.get_mut(mapped as usize) {
                *ram_byte = value;
            }
        }
    }
}

fn parse_title(rom: &[u8]) -> String {
    let title_bytes = &rom[address::TITLE_START as usize..=address::TITLE_END as usize];
    let title_len = title_bytes.iter().position(|&byte| byte == 0x00).unwrap_or(title_bytes.len());
    String::from_utf8_lossy(&title_bytes[..title_len]).into_owned()
}

/// The CPU's view of memory: byte reads and writes across the full 16-bit address space, plus
/// access to the interrupt latch that the dispatch step consults.
///
/// [`AddressSpace`] is the hardware implementation; CPU tests run against a flat 64KB array.
pub trait Bus {
    fn read_address_u8(&self, address: u16) -> u8;

    fn write_address_u8(&mut self, address: u16, value: u8);

    fn interrupts(&self) -> &InterruptLatch;

    fn interrupts_mut(&mut self) -> &mut InterruptLatch;

    /// Read a little-endian 16-bit value.
    fn read_address_u16(&self, address: u16) -> u16 {
        let lsb = self.read_address_u8(address);
        let msb = self.read_address_u8(address.wrapping_add(1));
        u16::from_le_bytes([lsb, msb])
    }

    /// Write a little-endian 16-bit value.
    fn write_address_u16(&mut self, address: u16, value: u16) {
        let [lsb, msb] = value.to_le_bytes();
        self.write_address_u8(address, lsb);
        self.write_address_u8(address.wrapping_add(1), msb);
    }
}

/// Routes every address to the cartridge, a device RAM array, or a register. Owns no cartridge
/// bytes itself; accesses in the cartridge-mapped regions are delegated to [`Cartridge`].
pub struct AddressSpace {
    cartridge: Cartridge,
    vram: [u8; 8192],
    working_ram: [u8; 8192],
    oam: [u8; address::OAM_LEN],
    io_registers: IoRegisters,
    interrupt_latch: InterruptLatch,
    joypad: JoypadState,
    timer_counter: TimerCounter,
    hram: [u8; 0x7F],
    boot_rom: Option<[u8; address::BOOT_ROM_LEN]>,
    boot_rom_mapped: bool,
    serial_output: Vec<u8>,
    breakpoint: Option<u16>,
    breakpoint_hit: bool,
}

impl AddressSpace {
    pub fn new(cartridge: Cartridge) -> Self {
        Self {
            cartridge,
            vram: [0; 8192],
            working_ram: [0; 8192],
            oam: [0; address::OAM_LEN],
            io_registers: IoRegisters::new(),
            interrupt_latch: InterruptLatch::new(),
            joypad: JoypadState::new(),
            timer_counter: TimerCounter::new(),
            hram: [0; 0x7F],
            boot_rom: None,
            boot_rom_mapped: false,
            serial_output: Vec::new(),
            breakpoint: None,
            breakpoint_hit: false,
        }
    }

    /// Build an address space with a boot ROM overlaying 0x0000-0x00FF. The overlay stays
    /// mapped until something writes to the boot ROM disable register.
    pub fn with_boot_rom(cartridge: Cartridge, boot_rom: [u8; address::BOOT_ROM_LEN]) -> Self {
        let mut address_space = Self::new(cartridge);
        address_space.boot_rom = Some(boot_rom);
        address_space.boot_rom_mapped = true;
        address_space
    }

    pub(crate) fn io_registers(&self) -> &IoRegisters {
        &self.io_registers
    }

    pub(crate) fn io_registers_mut(&mut self) -> &mut IoRegisters {
        &mut self.io_registers
    }

    pub(crate) fn joypad_mut(&mut self) -> &mut JoypadState {
        &mut self.joypad
    }

    pub fn cartridge_title(&self) -> &str {
        self.cartridge.title()
    }

    /// Bytes pushed out the serial port so far. With no link partner attached, transfers
    /// complete instantly.
    pub fn serial_output(&self) -> &[u8] {
        &self.serial_output
    }

    pub fn take_serial_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.serial_output)
    }

    pub fn set_breakpoint(&mut self, address: u16) {
        self.breakpoint = Some(address);
    }

    pub fn clear_breakpoint(&mut self) {
        self.breakpoint = None;
        self.breakpoint_hit = false;
    }

    /// Whether a write has hit the armed breakpoint address. Stays set until cleared so that
    /// callers can poll between steps.
    pub fn breakpoint_hit(&self) -> bool {
        self.breakpoint_hit
    }

    pub fn clear_breakpoint_hit(&mut self) {
        self.breakpoint_hit = false;
    }

    pub(crate) fn tick_timer(&mut self, timer_modulo: u8, cycles: u32) {
        timer::update_timer_registers(
            &mut self.io_registers,
            &mut self.interrupt_latch,
            &mut self.timer_counter,
            timer_modulo,
            cycles,
        );
    }

    /// Bulk-copy bytes into OAM, bypassing the single-byte write path. Copies at most one
    /// OAM's worth of bytes.
    pub(crate) fn dma_transfer<I: IntoIterator<Item = u8>>(&mut self, source: I) {
        for (oam_byte, byte) in self.oam.iter_mut().zip(source) {
            *oam_byte = byte;
        }
    }

    fn run_oam_dma(&mut self, source_msb: u8) {
        let source_start = u16::from(source_msb) << 8;
        let bytes: Vec<u8> = (0..address::OAM_LEN as u16)
            .map(|i| self.read_address_u8(source_start + i))
            .collect();
        self.dma_transfer(bytes);
    }

    // Composes the stored group-select bits with the joypad latch's multiplexed nibble. Both
    // groups can be selected at once, in which case the nibbles AND together.
    fn read_joyp(&self) -> u8 {
        let select = self.io_registers.privileged_read_joyp();
        let mut nibble = 0x0F;
        if select & 0x10 == 0 {
            nibble &= self.joypad.direction_nibble();
        }
        if select & 0x20 == 0 {
            nibble &= self.joypad.action_nibble();
        }
        (select & 0xF0) | nibble
    }

    fn write_io_address(&mut self, address: u16, value: u8) {
        if address == address::IF_REGISTER {
            self.interrupt_latch.write_flags(value);
            return;
        }

        if address == address::BOOT_ROM_DISABLE {
            // Unmapping is permanent; the register is never cleared
            if value & 0x01 != 0 {
                self.boot_rom_mapped = false;
            }
            return;
        }

        match IoRegister::from_address(address) {
            Some(IoRegister::DIV) => {
                // Writing DIV also resets the internal counter it is derived from
                self.timer_counter.reset();
                self.io_registers.write_address(address, value);
            }
            // Transfers only complete under the internal clock (bit 0); with the external
            // clock selected there is no link partner to drive the shift
            Some(IoRegister::SC) if value & 0x81 == 0x81 => {
                let byte = self.io_registers.read_register(IoRegister::SB);
                self.serial_output.push(byte);
                log::debug!("serial transfer completed: 0x{byte:02X}");

                // The absent link partner shifts in all 1s
                self.io_registers.write_register(IoRegister::SB, 0xFF);
                self.io_registers.write_register(IoRegister::SC, value & 0x7F);
                self.interrupt_latch.request(InterruptType::Serial);
            }
            Some(IoRegister::DMA) => {
                self.io_registers.write_address(address, value);
                self.run_oam_dma(value);
            }
            _ => {
                self.io_registers.write_address(address, value);
            }
        }
    }
}

impl Bus for AddressSpace {
    fn read_address_u8(&self, address: u16) -> u8 {
        match address {
            address @ address::ROM_START..=address::ROM_END => {
                if self.boot_rom_mapped && address <= address::BOOT_ROM_END {
                    match &self.boot_rom {
                        Some(boot_rom) => boot_rom[address as usize],
                        None => 0xFF,
                    }
                } else {
                    self.cartridge.read_rom_address(address)
                }
            }
            address @ address::VRAM_START..=address::VRAM_END => {
                self.vram[(address - address::VRAM_START) as usize]
            }
            address @ address::EXTERNAL_RAM_START..=address::EXTERNAL_RAM_END => {
                self.cartridge.read_ram_address(address)
            }
            address @ address::WORKING_RAM_START..=address::WORKING_RAM_END => {
                self.working_ram[(address - address::WORKING_RAM_START) as usize]
            }
            address @ address::ECHO_RAM_START..=address::ECHO_RAM_END => {
                self.working_ram
                    [(address - address::ECHO_RAM_OFFSET - address::WORKING_RAM_START) as usize]
            }
            address @ address::OAM_START..=address::OAM_END => {
                self.oam[(address - address::OAM_START) as usize]
            }
            address::UNUSABLE_START..=address::UNUSABLE_END => 0xFF,
            address::IF_REGISTER => self.interrupt_latch.read_flags(),
            address @ address::IO_REGISTERS_START..=address::IO_REGISTERS_END => {
                if address == IoRegister::JOYP.to_address() {
                    self.read_joyp()
                } else {
                    self.io_registers.read_address(address)
                }
            }
            address @ address::HRAM_START..=address::HRAM_END => {
                self.hram[(address - address::HRAM_START) as usize]
            }
            address::IE_REGISTER => self.interrupt_latch.read_enabled(),
        }
    }

    fn write_address_u8(&mut self, address: u16, value: u8) {
        if self.breakpoint == Some(address) {
            self.breakpoint_hit = true;
        }

        match address {
            address @ address::ROM_START..=address::ROM_END => {
                self.cartridge.write_rom_address(address, value);
            }
            address @ address::VRAM_START..=address::VRAM_END => {
                self.vram[(address - address::VRAM_START) as usize] = value;
            }
            address @ address::EXTERNAL_RAM_START..=address::EXTERNAL_RAM_END => {
                self.cartridge.write_ram_address(address, value);
            }
            address @ address::WORKING_RAM_START..=address::WORKING_RAM_END => {
                self.working_ram[(address - address::WORKING_RAM_START) as usize] = value;
            }
            address @ address::ECHO_RAM_START..=address::ECHO_RAM_END => {
                self.working_ram
                    [(address - address::ECHO_RAM_OFFSET - address::WORKING_RAM_START) as usize] =
                    value;
            }
            address @ address::OAM_START..=address::OAM_END => {
                self.oam[(address - address::OAM_START) as usize] = value;
            }
            address::UNUSABLE_START..=address::UNUSABLE_END => {}
            address @ address::IO_REGISTERS_START..=address::IO_REGISTERS_END => {
                self.write_io_address(address, value);
            }
            address @ address::HRAM_START..=address::HRAM_END => {
                self.hram[(address - address::HRAM_START) as usize] = value;
            }
            address::IE_REGISTER => {
                self.interrupt_latch.write_enabled(value);
            }
        }
    }

    fn interrupts(&self) -> &InterruptLatch {
        &self.interrupt_latch
    }

    fn interrupts_mut(&mut self) -> &mut InterruptLatch {
        &mut self.interrupt_latch
    }
}
