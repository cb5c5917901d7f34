use crate::memory::address;
use dotmatrix_proc_macros::EnumDisplay;
use std::fmt::Formatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumDisplay)]
pub(crate) enum MapperType {
    None,
    MBC1,
    MBC2,
    MBC3,
    MBC5,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MapperFeatures {
    pub(crate) has_ram: bool,
    pub(crate) has_battery: bool,
}

impl std::fmt::Display for MapperFeatures {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "has_ram={}, has_battery={}", self.has_ram, self.has_battery)
    }
}

pub(crate) fn parse_byte(mapper_byte: u8) -> Option<(MapperType, MapperFeatures)> {
    let (mapper_type, has_ram, has_battery) = match mapper_byte {
        0x00 => (MapperType::None, false, false),
        0x01 => (MapperType::MBC1, false, false),
        0x02 => (MapperType::MBC1, true, false),
        0x03 => (MapperType::MBC1, true, true),
        0x05 => (MapperType::MBC2, true, false),
        0x06 => (MapperType::MBC2, true, true),
        0x0F => (MapperType::MBC3, false, true),
        // 0x10 is w/ RTC, 0x13 is w/o RTC
        0x10 | 0x13 => (MapperType::MBC3, true, true),
        0x11 => (MapperType::MBC3, false, false),
        0x12 => (MapperType::MBC3, true, false),
        // 0x19 is w/o rumble, 0x1C is w/ rumble
        0x19 | 0x1C => (MapperType::MBC5, false, false),
        0x1A | 0x1D => (MapperType::MBC5, true, false),
        0x1B | 0x1E => (MapperType::MBC5, true, true),
        _ => return None,
    };

    let features = MapperFeatures {
        has_ram,
        has_battery,
    };
    Some((mapper_type, features))
}

// Smallest mask that covers every valid bank index, built by setting the
// lowest unset bit until the mask reaches bank_count - 1
fn bank_bit_mask(bank_count: u32) -> u8 {
    let mut mask: u32 = 0x00;
    while mask < bank_count.saturating_sub(1) {
        mask |= mask + 1;
    }
    mask as u8
}

#[derive(Debug, Clone)]
pub(crate) enum Mapper {
    None,
    MBC1 {
        rom_bank_bit_mask: u8,
        ram_bank_bit_mask: u8,
        ram_enable: u8,
        rom_bank_number: u8,
        ram_bank_number: u8,
        banking_mode_select: u8,
    },
}

impl Mapper {
    /// Construct a mapper of the given type. Returns None for mapper types that the
    /// header decoder recognizes but this emulator does not implement.
    pub(crate) fn new(mapper_type: MapperType, rom_size: u32, ram_size: u32) -> Option<Self> {
        match mapper_type {
            MapperType::None => Some(Self::None),
            MapperType::MBC1 => {
                let rom_bank_bit_mask = bank_bit_mask(rom_size >> 14);
                let ram_bank_bit_mask = bank_bit_mask(ram_size >> 13);

                log::debug!("setting ROM bank bit mask to {rom_bank_bit_mask:02X} for size {rom_size}");
                log::debug!("setting RAM bank bit mask to {ram_bank_bit_mask:02X} for size {ram_size}");

                Some(Self::MBC1 {
                    rom_bank_bit_mask,
                    ram_bank_bit_mask,
                    ram_enable: 0x00,
                    rom_bank_number: 0x01,
                    ram_bank_number: 0x00,
                    banking_mode_select: 0x00,
                })
            }
            MapperType::MBC2 | MapperType::MBC3 | MapperType::MBC5 => None,
        }
    }

    pub(crate) fn map_rom_address(&self, address: u16) -> u32 {
        match self {
            Self::None => u32::from(address),
            &Self::MBC1 {
                rom_bank_bit_mask,
                rom_bank_number,
                ram_bank_number,
                banking_mode_select,
                ..
            } => match address {
                address @ 0x0000..=0x3FFF => {
                    if banking_mode_select == 0x00 {
                        u32::from(address)
                    } else {
                        let bank_number = (ram_bank_number << 5) & rom_bank_bit_mask;
                        u32::from(address) + (u32::from(bank_number) << 14)
                    }
                }
                address @ 0x4000..=0x7FFF => {
                    let bank_number = rom_bank_number & rom_bank_bit_mask;
                    u32::from(address - 0x4000) + (u32::from(bank_number) << 14)
                }
                _ => panic!("mapper called for address outside of cartridge address range: {address:04X}")
            },
        }
    }

    // ROM writes don't actually modify the ROM (it is read-only after all) but they do modify
    // cartridge registers
    pub(crate) fn write_rom_address(&mut self, address: u16, value: u8) {
        match self {
            Self::None => {}
            Self::MBC1 {
                ram_enable,
                rom_bank_number,
                ram_bank_number,
                banking_mode_select,
                ..
            } => match address {
                _address @ 0x0000..=0x1FFF => {
                    log::trace!("ram_enable changed to {value:02X}");
                    *ram_enable = value;
                }
                _address @ 0x2000..=0x3FFF => {
                    // Writing 0 to the low bank bits selects bank 1
                    let low_bits = if value & 0x1F == 0x00 { 0x01 } else { value & 0x1F };
                    *rom_bank_number = (*rom_bank_number & 0x60) | low_bits;
                    log::trace!("rom_bank_number changed to {:02X}", *rom_bank_number);
                }
                _address @ 0x4000..=0x5FFF => {
                    if *banking_mode_select == 0x00 {
                        *rom_bank_number = (*rom_bank_number & 0x1F) | ((value & 0x03) << 5);
                        log::trace!("rom_bank_number changed to {:02X}", *rom_bank_number);
                    } else {
                        *ram_bank_number = value & 0x03;
                        log::trace!("ram_bank_number changed to {:02X}", *ram_bank_number);
                    }
                }
                _address @ 0x6000..=0x7FFF => {
                    log::trace!("banking_mode_select changed to {value:02X}");
                    *banking_mode_select = value & 0x01;
                }
                _ => panic!("invalid ROM write address in MBC1 mapper: {address:04X}"),
            },
        }
    }

    /// Map an external RAM address (0xA000-0xBFFF) to a relative address into the
    /// cartridge RAM array, or None if RAM access is currently locked out.
    pub(crate) fn map_ram_address(&self, address: u16) -> Option<u32> {
        let relative_address = address - address::EXTERNAL_RAM_START;

        match self {
            Self::None => Some(u32::from(relative_address)),
            &Self::MBC1 {
                ram_bank_bit_mask,
                ram_enable,
                ram_bank_number,
                banking_mode_select,
                ..
            } => {
                if ram_enable & 0x0F != 0x0A {
                    return None;
                }

                if banking_mode_select == 0x00 {
                    Some(u32::from(relative_address))
                } else {
                    let bank_number = ram_bank_number & ram_bank_bit_mask;
                    Some(u32::from(relative_address) + (u32::from(bank_number) << 13))
                }
            }
        }
    }
}
