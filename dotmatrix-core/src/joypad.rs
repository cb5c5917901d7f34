use dotmatrix_proc_macros::EnumDisplay;

/// One of the eight keys. The discriminant is the key's bit index in the latch: directions in the
/// low nibble, actions in the high nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumDisplay)]
pub enum Button {
    Right = 0,
    Left = 1,
    Up = 2,
    Down = 3,
    A = 4,
    B = 5,
    Select = 6,
    Start = 7,
}

/// Pressed-key latch behind the JOYP register. A cleared bit means the key is held; the register
/// read multiplexes one 4-key group at a time onto the low nibble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoypadState {
    keys: u8,
}

impl JoypadState {
    pub fn new() -> Self {
        Self { keys: 0xFF }
    }

    /// Latches the key as held. Returns true if the key was previously released (the edge that
    /// raises the joypad interrupt). Indices >= 8 are ignored.
    pub fn press(&mut self, key: u8) -> bool {
        if key >= 8 {
            return false;
        }

        let was_released = self.keys & (1 << key) != 0;
        self.keys &= !(1 << key);
        was_released
    }

    /// Releases the key. Indices >= 8 are ignored.
    pub fn release(&mut self, key: u8) {
        if key < 8 {
            self.keys |= 1 << key;
        }
    }

    /// The low nibble for one selected key group, OR'd with the selector identification pattern
    /// in the upper bits.
    pub fn state(&self, select_directions: bool) -> u8 {
        if select_directions { 0xE0 | self.direction_nibble() } else { 0xD0 | self.action_nibble() }
    }

    pub(crate) fn direction_nibble(&self) -> u8 {
        self.keys & 0x0F
    }

    pub(crate) fn action_nibble(&self) -> u8 {
        self.keys >> 4
    }
}

impl Default for JoypadState {
    fn default() -> Self {
        Self::new()
    }
}
