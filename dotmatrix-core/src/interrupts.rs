#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptType {
    VBlank,
    LcdStatus,
    Timer,
    Serial,
    Joypad,
}

impl InterruptType {
    pub fn handler_address(self) -> u16 {
        match self {
            Self::VBlank => 0x0040,
            Self::LcdStatus => 0x0048,
            Self::Timer => 0x0050,
            Self::Serial => 0x0058,
            Self::Joypad => 0x0060,
        }
    }

    pub fn bit(self) -> u8 {
        match self {
            Self::VBlank => 0x01,
            Self::LcdStatus => 0x02,
            Self::Timer => 0x04,
            Self::Serial => 0x08,
            Self::Joypad => 0x10,
        }
    }
}

/// The IF/IE register pair. Devices set request bits; the CPU's dispatch step consumes them.
///
/// Only the low 5 bits of IF are backed by hardware; its three high bits read as 1. IE stores
/// all eight written bits even though only the low 5 participate in dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterruptLatch {
    requested: u8,
    enabled: u8,
}

impl InterruptLatch {
    pub fn new() -> Self {
        // The boot sequence leaves a V-blank request already latched
        Self { requested: 0x01, enabled: 0x00 }
    }

    /// Sets the request bit for the given interrupt type.
    pub fn request(&mut self, interrupt_type: InterruptType) {
        self.requested |= interrupt_type.bit();
    }

    /// Clears the request bit for the given interrupt type.
    pub fn clear(&mut self, interrupt_type: InterruptType) {
        self.requested &= !interrupt_type.bit();
    }

    pub fn read_flags(&self) -> u8 {
        self.requested | 0xE0
    }

    pub fn write_flags(&mut self, value: u8) {
        self.requested = value & 0x1F;
    }

    pub fn read_enabled(&self) -> u8 {
        self.enabled
    }

    pub fn write_enabled(&mut self, value: u8) {
        self.enabled = value;
    }

    /// Whether any enabled interrupt has been requested.
    pub fn pending(&self) -> bool {
        self.requested & self.enabled & 0x1F != 0
    }

    #[cfg(test)]
    pub fn is_requested(&self, interrupt_type: InterruptType) -> bool {
        self.requested & interrupt_type.bit() != 0
    }
}

impl Default for InterruptLatch {
    fn default() -> Self {
        Self::new()
    }
}
