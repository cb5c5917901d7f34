//! Pixel processing unit: scanline state machine, background/window/sprite
//! rasterization, and STAT interrupt tracking.

use crate::interrupts::InterruptType;
use crate::memory::ioregisters::{IoRegister, IoRegisters, SpriteMode, TileDataRange};
use crate::memory::{address, AddressSpace, Bus};
use tinyvec::ArrayVec;

pub const SCREEN_WIDTH: usize = 160;
pub const SCREEN_HEIGHT: usize = 144;

/// One shade per pixel, values 0-3 with 0 lightest.
pub type FrameBuffer = [[u8; SCREEN_WIDTH]; SCREEN_HEIGHT];

const DOTS_PER_LINE: u32 = 456;
const OAM_SCAN_DOTS: u32 = 80;
const PIXEL_TRANSFER_DOTS: u32 = 172;
const VISIBLE_LINES: u8 = 144;
const LINES_PER_FRAME: u8 = 154;

const OAM_ENTRIES: u16 = 40;
const MAX_SPRITES_PER_LINE: usize = 10;

const SPRITE_TILE_DATA_START: u16 = 0x8000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PpuMode {
    HBlank,
    VBlank,
    ScanningOam,
    TransferringPixels,
}

impl PpuMode {
    fn stat_bits(self) -> u8 {
        match self {
            Self::HBlank => 0x00,
            Self::VBlank => 0x01,
            Self::ScanningOam => 0x02,
            Self::TransferringPixels => 0x03,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct SpriteData {
    y: u8,
    x: u8,
    tile_index: u8,
    attributes: u8,
}

#[derive(Debug, Clone)]
pub struct PpuState {
    mode: PpuMode,
    line: u8,
    line_clock: u32,
    // Window rows consumed so far this frame; advances independently of LY
    window_line: u8,
    stat_line: bool,
    frame_buffer: FrameBuffer,
    frame_complete: bool,
}

impl PpuState {
    pub fn new() -> Self {
        Self {
            mode: PpuMode::ScanningOam,
            line: 0,
            line_clock: 0,
            window_line: 0,
            stat_line: false,
            frame_buffer: [[0; SCREEN_WIDTH]; SCREEN_HEIGHT],
            frame_complete: false,
        }
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.frame_buffer
    }

    /// Whether a full frame has been rasterized since the flag was last cleared.
    pub fn frame_complete(&self) -> bool {
        self.frame_complete
    }

    pub fn clear_frame_complete(&mut self) {
        self.frame_complete = false;
    }

    /// Advances the scanline state machine by the given number of CPU clock cycles.
    pub(crate) fn tick(&mut self, cycles: u32, address_space: &mut AddressSpace) {
        let lcd_enabled = address_space.io_registers().lcdc().lcd_enabled();
        if !lcd_enabled {
            self.mode = PpuMode::ScanningOam;
            self.line = 0;
            self.line_clock = 0;
            self.window_line = 0;
            self.stat_line = false;

            let io_registers = address_space.io_registers_mut();
            io_registers.privileged_set_ly(0x00);
            let existing = io_registers.read_register(IoRegister::STAT);
            io_registers.privileged_set_stat(existing & 0x78);
            return;
        }

        self.line_clock += cycles;
        loop {
            match self.mode {
                PpuMode::ScanningOam => {
                    if self.line_clock < OAM_SCAN_DOTS {
                        break;
                    }
                    self.mode = PpuMode::TransferringPixels;
                    self.rasterize_line(address_space);
                }
                PpuMode::TransferringPixels => {
                    if self.line_clock < OAM_SCAN_DOTS + PIXEL_TRANSFER_DOTS {
                        break;
                    }
                    self.mode = PpuMode::HBlank;
                }
                PpuMode::HBlank => {
                    if self.line_clock < DOTS_PER_LINE {
                        break;
                    }
                    self.line_clock -= DOTS_PER_LINE;
                    self.line += 1;
                    if self.line == VISIBLE_LINES {
                        self.mode = PpuMode::VBlank;
                        self.frame_complete = true;
                        address_space.interrupts_mut().request(InterruptType::VBlank);
                        log::trace!("entered VBlank, frame complete");
                    } else {
                        self.mode = PpuMode::ScanningOam;
                    }
                    address_space.io_registers_mut().privileged_set_ly(self.line);
                }
                PpuMode::VBlank => {
                    if self.line_clock < DOTS_PER_LINE {
                        break;
                    }
                    self.line_clock -= DOTS_PER_LINE;
                    self.line += 1;
                    if self.line == LINES_PER_FRAME {
                        self.line = 0;
                        self.window_line = 0;
                        self.mode = PpuMode::ScanningOam;
                    }
                    address_space.io_registers_mut().privileged_set_ly(self.line);
                }
            }
        }

        self.sync_stat(address_space);
    }

    // Rewrites the STAT mode/coincidence bits and raises an LCD status interrupt
    // on a rising edge of the composite interrupt line.
    fn sync_stat(&mut self, address_space: &mut AddressSpace) {
        let stat = self.update_stat(address_space.io_registers_mut());
        let line_high = stat_interrupt_line(stat, self.mode);
        if line_high && !self.stat_line {
            address_space
                .interrupts_mut()
                .request(InterruptType::LcdStatus);
        }
        self.stat_line = line_high;
    }

    fn update_stat(&self, io_registers: &mut IoRegisters) -> u8 {
        let lyc = io_registers.read_register(IoRegister::LYC);
        let coincidence = self.line == lyc;
        let existing = io_registers.read_register(IoRegister::STAT);
        let stat = (existing & 0x78) | (u8::from(coincidence) << 2) | self.mode.stat_bits();
        io_registers.privileged_set_stat(stat);
        stat
    }

    fn rasterize_line(&mut self, address_space: &AddressSpace) {
        let line = usize::from(self.line);

        let io_registers = address_space.io_registers();
        let lcdc = io_registers.lcdc();
        let bg_palette = io_registers.read_register(IoRegister::BGP);

        // Color indices (pre-palette) for the BG/window layer, kept for
        // sprite priority resolution
        let mut bg_color_indices = [0_u8; SCREEN_WIDTH];

        if lcdc.bg_enabled() {
            let scy = io_registers.read_register(IoRegister::SCY);
            let scx = io_registers.read_register(IoRegister::SCX);

            let bg_y = self.line.wrapping_add(scy);
            let tile_row = u16::from(bg_y / 8);
            let row_in_tile = u16::from(bg_y % 8);

            for screen_x in 0..SCREEN_WIDTH {
                let bg_x = (screen_x as u8).wrapping_add(scx);
                let map_address = lcdc.bg_tile_map_address() + 32 * tile_row + u16::from(bg_x / 8);
                let tile_index = address_space.read_address_u8(map_address);
                let tile_address = tile_data_address(lcdc.tile_data_range(), tile_index);
                let color_index =
                    tile_row_pixel(address_space, tile_address, row_in_tile, bg_x % 8);

                bg_color_indices[screen_x] = color_index;
                self.frame_buffer[line][screen_x] = palette_shade(bg_palette, color_index);
            }
        } else {
            self.frame_buffer[line] = [0; SCREEN_WIDTH];
        }

        if lcdc.window_enabled() {
            let wy = io_registers.read_register(IoRegister::WY);
            let wx = io_registers.read_register(IoRegister::WX);

            if self.line >= wy && wx <= 166 {
                let window_row = u16::from(self.window_line);
                let tile_row = window_row / 8;
                let row_in_tile = window_row % 8;
                let start_x = i32::from(wx) - 7;

                let mut rendered = false;
                for screen_x in 0..SCREEN_WIDTH {
                    let window_x = screen_x as i32 - start_x;
                    if window_x < 0 {
                        continue;
                    }
                    let window_x = window_x as u16;

                    let map_address =
                        lcdc.window_tile_map_address() + 32 * tile_row + window_x / 8;
                    let tile_index = address_space.read_address_u8(map_address);
                    let tile_address = tile_data_address(lcdc.tile_data_range(), tile_index);
                    let color_index = tile_row_pixel(
                        address_space,
                        tile_address,
                        row_in_tile,
                        (window_x % 8) as u8,
                    );

                    bg_color_indices[screen_x] = color_index;
                    self.frame_buffer[line][screen_x] = palette_shade(bg_palette, color_index);
                    rendered = true;
                }

                if rendered {
                    self.window_line += 1;
                }
            }
        }

        if lcdc.sprites_enabled() {
            let obp0 = io_registers.read_register(IoRegister::OBP0);
            let obp1 = io_registers.read_register(IoRegister::OBP1);
            let sprite_height = lcdc.sprite_mode().height();

            let mut sprites = scan_sprites(address_space, self.line, sprite_height);
            sprites.sort_by_key(|sprite| sprite.x);

            // Reverse order so the highest-priority sprite (lowest X, then
            // lowest OAM index) is drawn last
            for sprite in sprites.iter().rev() {
                let palette = if sprite.attributes & 0x10 != 0 { obp1 } else { obp0 };
                let behind_bg = sprite.attributes & 0x80 != 0;
                let flip_x = sprite.attributes & 0x20 != 0;
                let flip_y = sprite.attributes & 0x40 != 0;

                let mut sprite_row = self.line.wrapping_sub(sprite.y.wrapping_sub(16));
                if flip_y {
                    sprite_row = sprite_height - 1 - sprite_row;
                }

                let mut tile_index = match lcdc.sprite_mode() {
                    SpriteMode::Single => sprite.tile_index,
                    SpriteMode::Stacked => sprite.tile_index & 0xFE,
                };
                if sprite_row >= 8 {
                    tile_index += 1;
                    sprite_row -= 8;
                }
                let tile_address = SPRITE_TILE_DATA_START + 16 * u16::from(tile_index);

                for pixel in 0..8_u8 {
                    let screen_x = i32::from(sprite.x) - 8 + i32::from(pixel);
                    if !(0..SCREEN_WIDTH as i32).contains(&screen_x) {
                        continue;
                    }
                    let screen_x = screen_x as usize;

                    let column = if flip_x { 7 - pixel } else { pixel };
                    let color_index = tile_row_pixel(
                        address_space,
                        tile_address,
                        u16::from(sprite_row),
                        column,
                    );
                    if color_index == 0 {
                        continue;
                    }
                    if behind_bg && bg_color_indices[screen_x] != 0 {
                        continue;
                    }

                    self.frame_buffer[line][screen_x] = palette_shade(palette, color_index);
                }
            }
        }
    }
}

impl Default for PpuState {
    fn default() -> Self {
        Self::new()
    }
}

fn stat_interrupt_line(stat: u8, mode: PpuMode) -> bool {
    let coincidence = stat & 0x04 != 0;
    (stat & 0x40 != 0 && coincidence)
        || (stat & 0x20 != 0 && mode == PpuMode::ScanningOam)
        || (stat & 0x10 != 0 && mode == PpuMode::VBlank)
        || (stat & 0x08 != 0 && mode == PpuMode::HBlank)
}

fn scan_sprites(
    address_space: &AddressSpace,
    line: u8,
    sprite_height: u8,
) -> ArrayVec<[SpriteData; MAX_SPRITES_PER_LINE]> {
    let mut sprites: ArrayVec<[SpriteData; MAX_SPRITES_PER_LINE]> = ArrayVec::new();

    for oam_index in 0..OAM_ENTRIES {
        let oam_address = address::OAM_START + 4 * oam_index;
        let y = address_space.read_address_u8(oam_address);

        let top = i16::from(y) - 16;
        if i16::from(line) < top || i16::from(line) >= top + i16::from(sprite_height) {
            continue;
        }

        sprites.push(SpriteData {
            y,
            x: address_space.read_address_u8(oam_address + 1),
            tile_index: address_space.read_address_u8(oam_address + 2),
            attributes: address_space.read_address_u8(oam_address + 3),
        });
        if sprites.len() == MAX_SPRITES_PER_LINE {
            break;
        }
    }

    sprites
}

fn tile_data_address(tile_data_range: TileDataRange, tile_index: u8) -> u16 {
    match tile_data_range {
        TileDataRange::Unsigned => tile_data_range.base_address() + 16 * u16::from(tile_index),
        TileDataRange::Signed => {
            let offset = 16 * i32::from(tile_index as i8);
            (i32::from(tile_data_range.base_address()) + offset) as u16
        }
    }
}

// Tiles store each row as two bit planes; the high plane holds bit 1 of each
// pixel's color index and the low plane holds bit 0.
fn tile_row_pixel(address_space: &AddressSpace, tile_address: u16, row: u16, col: u8) -> u8 {
    let row_address = tile_address + 2 * row;
    let low_plane = address_space.read_address_u8(row_address);
    let high_plane = address_space.read_address_u8(row_address + 1);

    let bit = 7 - col;
    (((high_plane >> bit) & 0x01) << 1) | ((low_plane >> bit) & 0x01)
}

fn palette_shade(palette: u8, color_index: u8) -> u8 {
    (palette >> (2 * color_index)) & 0x03
}
