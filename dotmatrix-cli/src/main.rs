mod config;

use anyhow::Context;
use clap::Parser;
use dotmatrix_core::{
    Cartridge, Console, CpuRegisterPair, CpuRegisters, FrameBuffer, StepError, BOOT_ROM_LEN,
    SCREEN_HEIGHT, SCREEN_WIDTH,
};
use std::fs;

use crate::config::{AppConfig, Palette};

#[derive(Parser)]
struct Cli {
    #[arg(short = 'f', long = "rom_file_path")]
    rom_file_path: String,
    #[arg(short = 'b', long = "boot_rom_path")]
    boot_rom_path: Option<String>,
    #[arg(short = 'c', long = "config_path")]
    config_path: Option<String>,
    #[arg(short = 'n', long = "frame_limit")]
    frame_limit: Option<u64>,
    #[arg(short = 'd', long = "frame_dump_path")]
    frame_dump_path: Option<String>,
    #[arg(short = 'p', long = "palette")]
    palette: Option<Palette>,
    #[arg(short = 'k', long = "breakpoint_address", value_parser = parse_hex_address)]
    breakpoint_address: Option<u16>,
}

fn parse_hex_address(s: &str) -> Result<u16, String> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    u16::from_str_radix(digits, 16).map_err(|err| format!("invalid hex address '{s}': {err}"))
}

enum RunOutcome {
    FrameLimitReached { frames: u64 },
    BreakpointHit { frame: u64 },
    UnimplementedOpcode { frame: u64, error: StepError },
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let args = Cli::parse();

    let file_config = match &args.config_path {
        Some(path) => AppConfig::from_toml_file(path)?,
        None => AppConfig::default(),
    };
    let palette = args.palette.unwrap_or(file_config.palette);
    let frame_limit = args.frame_limit.unwrap_or(file_config.frame_limit);
    let boot_rom_path = args.boot_rom_path.clone().or(file_config.boot_rom_path);

    let cartridge = Cartridge::from_file(&args.rom_file_path)?;

    let mut console = match boot_rom_path {
        Some(path) => Console::with_boot_rom(cartridge, read_boot_rom(&path)?),
        None => Console::new(cartridge),
    };

    log::info!(
        "Running '{}' from {} for up to {frame_limit} frames",
        console.cartridge_title(),
        args.rom_file_path
    );

    if let Some(address) = args.breakpoint_address {
        console.set_breakpoint(address);
    }

    match run(&mut console, frame_limit) {
        RunOutcome::FrameLimitReached { frames } => println!("Ran {frames} frames"),
        RunOutcome::BreakpointHit { frame } => println!("Breakpoint hit during frame {frame}"),
        RunOutcome::UnimplementedOpcode { frame, error } => {
            println!("Emulation stopped during frame {frame}: {error}");
        }
    }

    let serial_output = console.take_serial_output();
    if !serial_output.is_empty() {
        println!("Serial output: {}", String::from_utf8_lossy(&serial_output));
    }

    print_register_dump(console.registers());

    if let Some(path) = &args.frame_dump_path {
        fs::write(path, ppm_contents(console.frame_buffer(), palette))
            .with_context(|| format!("error writing frame dump to '{path}'"))?;
        println!("Wrote final frame to {path}");
    }

    Ok(())
}

fn read_boot_rom(path: &str) -> Result<[u8; BOOT_ROM_LEN], anyhow::Error> {
    let bytes =
        fs::read(path).with_context(|| format!("error reading boot ROM from '{path}'"))?;
    <[u8; BOOT_ROM_LEN]>::try_from(bytes).map_err(|bytes| {
        anyhow::anyhow!(
            "boot ROM at '{path}' must be exactly {BOOT_ROM_LEN} bytes, got {}",
            bytes.len()
        )
    })
}

fn run(console: &mut Console, frame_limit: u64) -> RunOutcome {
    for frame in 0..frame_limit {
        while !console.frame_ready() {
            match console.step() {
                Ok(_) => {}
                // Reported rather than propagated so the run still ends with serial
                // output and a register dump
                Err(error) => return RunOutcome::UnimplementedOpcode { frame, error },
            }

            if console.breakpoint_hit() {
                return RunOutcome::BreakpointHit { frame };
            }
        }
        console.clear_frame_ready();
    }

    RunOutcome::FrameLimitReached { frames: frame_limit }
}

fn print_register_dump(registers: &CpuRegisters) {
    println!(
        "AF={:04X} BC={:04X} DE={:04X} HL={:04X} SP={:04X} PC={:04X}",
        registers.read_register_pair(CpuRegisterPair::AF),
        registers.read_register_pair(CpuRegisterPair::BC),
        registers.read_register_pair(CpuRegisterPair::DE),
        registers.read_register_pair(CpuRegisterPair::HL),
        registers.sp,
        registers.pc,
    );
}

fn ppm_contents(frame_buffer: &FrameBuffer, palette: Palette) -> Vec<u8> {
    let colors = palette.colors();

    let mut contents = format!("P6\n{SCREEN_WIDTH} {SCREEN_HEIGHT}\n255\n").into_bytes();
    contents.reserve(3 * SCREEN_WIDTH * SCREEN_HEIGHT);
    for row in frame_buffer {
        for &shade in row {
            contents.extend_from_slice(&colors[usize::from(shade)]);
        }
    }

    contents
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_address_parsing() {
        assert_eq!(Ok(0xC100), parse_hex_address("C100"));
        assert_eq!(Ok(0xC100), parse_hex_address("0xc100"));
        assert_eq!(Ok(0x0040), parse_hex_address("40"));
        assert!(parse_hex_address("12345").is_err());
        assert!(parse_hex_address("wxyz").is_err());
    }

    #[test]
    fn ppm_dump_has_header_and_pixel_data() {
        let mut frame_buffer = [[0; SCREEN_WIDTH]; SCREEN_HEIGHT];
        frame_buffer[0][0] = 3;

        let contents = ppm_contents(&frame_buffer, Palette::Grey);

        let header = b"P6\n160 144\n255\n";
        assert_eq!(header, &contents[..header.len()]);
        assert_eq!(header.len() + 3 * SCREEN_WIDTH * SCREEN_HEIGHT, contents.len());

        // First pixel is the darkest shade, the rest are the lightest
        assert_eq!([0x00, 0x00, 0x00], contents[header.len()..header.len() + 3]);
        assert_eq!([0xFF, 0xFF, 0xFF], contents[header.len() + 3..header.len() + 6]);
    }
}
