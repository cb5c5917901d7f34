use crate::memory::address;

/// One of the eight 8-bit register cells. The discriminant is the cell's slot in the register
/// array.
///
/// F is a real cell (the AF pair is a view over it) but it never appears as an instruction
/// operand; `from_opcode_bits` can only produce the other seven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuRegister {
    A = 0,
    F = 1,
    B = 2,
    C = 3,
    D = 4,
    E = 5,
    H = 6,
    L = 7,
}

impl CpuRegister {
    /// Decode the 3-bit register operand field used throughout the opcode tables. 0x06 is the
    /// (HL) indirect slot, not a register.
    pub fn from_opcode_bits(bits: u8) -> Option<Self> {
        match bits & 0x07 {
            0x00 => Some(Self::B),
            0x01 => Some(Self::C),
            0x02 => Some(Self::D),
            0x03 => Some(Self::E),
            0x04 => Some(Self::H),
            0x05 => Some(Self::L),
            0x07 => Some(Self::A),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    /// Inverse of `from_opcode_bits`, for synthesizing opcodes in tests.
    #[cfg(test)]
    pub(crate) fn to_opcode_bits(self) -> u8 {
        match self {
            Self::B => 0x00,
            Self::C => 0x01,
            Self::D => 0x02,
            Self::E => 0x03,
            Self::H => 0x04,
            Self::L => 0x05,
            Self::A => 0x07,
            Self::F => panic!("F is never encoded as an instruction operand"),
        }
    }
}

/// A 16-bit view over two register cells. Pairs own no storage; reading composes
/// `(high << 8) | low` from the two cells and writing splits the value back into them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuRegisterPair {
    AF,
    BC,
    DE,
    HL,
}

impl CpuRegisterPair {
    /// The (high, low) cells this pair addresses.
    pub fn cells(self) -> (CpuRegister, CpuRegister) {
        match self {
            Self::AF => (CpuRegister::A, CpuRegister::F),
            Self::BC => (CpuRegister::B, CpuRegister::C),
            Self::DE => (CpuRegister::D, CpuRegister::E),
            Self::HL => (CpuRegister::H, CpuRegister::L),
        }
    }
}

/// The four condition flags as independent booleans. The F cell always holds `pack()` of the
/// current flags; the low nibble of F is wired to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags {
    pub zero: bool,
    pub subtract: bool,
    pub half_carry: bool,
    pub carry: bool,
}

impl Flags {
    pub fn pack(self) -> u8 {
        (u8::from(self.zero) << 7)
            | (u8::from(self.subtract) << 6)
            | (u8::from(self.half_carry) << 5)
            | (u8::from(self.carry) << 4)
    }

    pub fn unpack(byte: u8) -> Self {
        Self {
            zero: byte & 0x80 != 0,
            subtract: byte & 0x40 != 0,
            half_carry: byte & 0x20 != 0,
            carry: byte & 0x10 != 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuRegisters {
    cells: [u8; 8],
    pub sp: u16,
    pub pc: u16,
}

impl CpuRegisters {
    /// Registers as left by the boot ROM: execution continues at the cartridge entry point.
    pub fn new() -> Self {
        Self {
            // AF=0x01B0, BC=0x0013, DE=0x00D8, HL=0x014D
            cells: [0x01, 0xB0, 0x00, 0x13, 0x00, 0xD8, 0x01, 0x4D],
            sp: 0xFFFE,
            pc: address::ENTRY_POINT,
        }
    }

    /// All-zero registers for running a boot ROM from address 0.
    pub fn zeroed() -> Self {
        Self { cells: [0; 8], sp: 0, pc: 0 }
    }

    pub fn read_register(&self, register: CpuRegister) -> u8 {
        self.cells[register.index()]
    }

    pub fn set_register(&mut self, register: CpuRegister, value: u8) {
        let value = if register == CpuRegister::F { value & 0xF0 } else { value };
        self.cells[register.index()] = value;
    }

    pub fn read_register_pair(&self, register_pair: CpuRegisterPair) -> u16 {
        let (high, low) = register_pair.cells();
        u16::from_be_bytes([self.read_register(high), self.read_register(low)])
    }

    pub fn set_register_pair(&mut self, register_pair: CpuRegisterPair, value: u16) {
        let (high, low) = register_pair.cells();
        let [high_byte, low_byte] = value.to_be_bytes();
        self.set_register(high, high_byte);
        self.set_register(low, low_byte);
    }

    pub fn accumulator(&self) -> u8 {
        self.read_register(CpuRegister::A)
    }

    pub fn set_accumulator(&mut self, value: u8) {
        self.set_register(CpuRegister::A, value);
    }

    pub fn hl(&self) -> u16 {
        self.read_register_pair(CpuRegisterPair::HL)
    }

    pub fn set_hl(&mut self, hl: u16) {
        self.set_register_pair(CpuRegisterPair::HL, hl);
    }

    pub fn flags(&self) -> Flags {
        Flags::unpack(self.read_register(CpuRegister::F))
    }

    pub fn set_flags(&mut self, z: bool, n: bool, h: bool, c: bool) {
        self.set_register(
            CpuRegister::F,
            Flags { zero: z, subtract: n, half_carry: h, carry: c }.pack(),
        );
    }

    /// Update only the flags that are `Some`, leaving the others in place.
    pub fn set_some_flags(
        &mut self,
        z: Option<bool>,
        n: Option<bool>,
        h: Option<bool>,
        c: Option<bool>,
    ) {
        let current = self.flags();
        self.set_flags(
            z.unwrap_or(current.zero),
            n.unwrap_or(current.subtract),
            h.unwrap_or(current.half_carry),
            c.unwrap_or(current.carry),
        );
    }

    pub fn zero_flag(&self) -> bool {
        self.flags().zero
    }

    pub fn carry_flag(&self) -> bool {
        self.flags().carry
    }
}

impl Default for CpuRegisters {
    fn default() -> Self {
        Self::new()
    }
}
