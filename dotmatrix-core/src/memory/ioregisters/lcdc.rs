/// Tile data addressing scheme for the background and window layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileDataRange {
    /// Tile index is unsigned, data at 0x8000 + 16 * index
    Unsigned,
    /// Tile index is two's-complement, data at 0x9000 + 16 * index
    Signed,
}

impl TileDataRange {
    pub fn base_address(self) -> u16 {
        match self {
            Self::Unsigned => 0x8000,
            Self::Signed => 0x9000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteMode {
    /// 8x8 sprites
    Single,
    /// 8x16 sprites; the tile index's low bit is ignored
    Stacked,
}

impl SpriteMode {
    pub fn height(self) -> u8 {
        match self {
            Self::Single => 8,
            Self::Stacked => 16,
        }
    }
}

const TILE_MAP_AREA_0: u16 = 0x9800;
const TILE_MAP_AREA_1: u16 = 0x9C00;

/// A read-only view around the LCDC register (LCD control).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lcdc<'a>(pub(super) &'a u8);

impl<'a> Lcdc<'a> {
    pub fn lcd_enabled(self) -> bool {
        *self.0 & 0x80 != 0
    }

    pub fn window_tile_map_address(self) -> u16 {
        if *self.0 & 0x40 != 0 { TILE_MAP_AREA_1 } else { TILE_MAP_AREA_0 }
    }

    pub fn window_enabled(self) -> bool {
        *self.0 & 0x20 != 0
    }

    pub fn tile_data_range(self) -> TileDataRange {
        if *self.0 & 0x10 != 0 { TileDataRange::Unsigned } else { TileDataRange::Signed }
    }

    pub fn bg_tile_map_address(self) -> u16 {
        if *self.0 & 0x08 != 0 { TILE_MAP_AREA_1 } else { TILE_MAP_AREA_0 }
    }

    pub fn sprite_mode(self) -> SpriteMode {
        if *self.0 & 0x04 != 0 { SpriteMode::Stacked } else { SpriteMode::Single }
    }

    pub fn sprites_enabled(self) -> bool {
        *self.0 & 0x02 != 0
    }

    pub fn bg_enabled(self) -> bool {
        *self.0 & 0x01 != 0
    }
}
