//! gbaview-cli - Command-line interface for gbaview
//!
//! A command-line tool for finding, decompressing and rendering graphics in GBA ROMs.

use clap::{Parser, Subcommand, ValueEnum};
use gbaview::{
    classify, decompress_with_stats, is_candidate, lz77, scan, scan_candidates, to_mapped_address,
    to_raw_offset, Bpp, ByteSource, Candidate, DecodeOptions, LinearCodec, PointerSet, ViewState,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "gbaview-cli")]
#[command(about = "A CLI tool for exploring graphics in GBA ROMs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List pointers that look like compressed streams
    Scan {
        /// ROM file to scan
        rom: PathBuf,

        /// List every pointer, not only plausible LZ77 headers
        #[arg(short, long)]
        all: bool,

        /// Keep only streams that decompress cleanly
        #[arg(short, long, conflicts_with = "all")]
        strict: bool,
    },

    /// Show the stream header at an address
    Info {
        /// ROM file
        rom: PathBuf,

        /// Address (hex with 0x prefix or decimal, mapped or raw)
        #[arg(value_parser = parse_address)]
        address: u32,
    },

    /// Decompress the LZ77 stream at an address
    Decompress {
        /// ROM file
        rom: PathBuf,

        /// Address (hex with 0x prefix or decimal, mapped or raw)
        #[arg(value_parser = parse_address)]
        address: u32,

        /// Output file for the decompressed bytes
        output: PathBuf,

        /// Force overwrite of output file
        #[arg(short, long)]
        force: bool,
    },

    /// Decode an image and save it as PNG
    Render {
        /// ROM file
        rom: PathBuf,

        /// Output PNG file
        output: PathBuf,

        /// Image address
        #[arg(short, long, value_parser = parse_address)]
        image: u32,

        /// Palette address
        #[arg(short, long, value_parser = parse_address)]
        palette: u32,

        /// Tilemap address; enables tilemap decoding
        #[arg(short, long, value_parser = parse_address)]
        tilemap: Option<u32>,

        /// Width in tiles
        #[arg(short, long, default_value_t = 16)]
        width: u32,

        /// Bits per pixel
        #[arg(short, long, value_enum, default_value_t = CliBpp::Four)]
        bpp: CliBpp,

        /// Cap on the raw span read for uncompressed images
        #[arg(long, default_value_t = 20480)]
        span_cap: usize,

        /// Force overwrite of output file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum CliBpp {
    /// 2 bits per pixel (4 colors)
    #[value(name = "2")]
    Two,
    /// 4 bits per pixel (16 colors) - Default
    #[value(name = "4")]
    Four,
    /// 8 bits per pixel (256 colors)
    #[value(name = "8")]
    Eight,
}

impl From<CliBpp> for Bpp {
    fn from(bpp: CliBpp) -> Self {
        match bpp {
            CliBpp::Two => Bpp::Two,
            CliBpp::Four => Bpp::Four,
            CliBpp::Eight => Bpp::Eight,
        }
    }
}

/// Parse `0x`-prefixed hex or decimal
fn parse_address(text: &str) -> Result<u32, String> {
    let text = text.trim();
    let parsed = match text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => text.parse::<u32>(),
    };
    parsed.map_err(|_| format!("Could not convert {text} to a number"))
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Scan { rom, all, strict } => scan_rom(&rom, all, strict, cli.quiet),
        Commands::Info { rom, address } => show_stream_info(&rom, address, cli.verbose),
        Commands::Decompress {
            rom,
            address,
            output,
            force,
        } => decompress_stream(&rom, address, &output, force, cli.verbose, cli.quiet),
        Commands::Render {
            rom,
            output,
            image,
            palette,
            tilemap,
            width,
            bpp,
            span_cap,
            force,
        } => {
            let mut view = ViewState::new()
                .with_options(DecodeOptions::default().with_image_span_cap(span_cap));
            view.set_image(image);
            view.set_palette(palette);
            if let Some(tilemap) = tilemap {
                view.set_tilemap(tilemap);
                view.tilemap_enabled = true;
            }
            view.set_width(width);
            render_image(&rom, &output, &view, bpp.into(), force, cli.quiet)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else if quiet {
        log::LevelFilter::Error
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_module("gbaview", level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn load_rom(path: &Path) -> Result<ByteSource, Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("ROM file '{}' does not exist", path.display()).into());
    }
    let data = fs::read(path)?;
    log::info!("Loaded {} ({} bytes)", path.display(), data.len());
    Ok(ByteSource::from(data))
}

fn check_output(output: &Path, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if output.exists() && !force {
        return Err(format!(
            "Output file '{}' already exists. Use --force to overwrite",
            output.display()
        )
        .into());
    }
    Ok(())
}

fn collect_pointers(
    rom: &ByteSource,
    all: bool,
    strict: bool,
    quiet: bool,
) -> Result<PointerSet, Box<dyn std::error::Error>> {
    if all {
        return Ok(scan(rom));
    }
    let candidates = scan_candidates(rom);
    if !strict {
        return Ok(candidates);
    }

    // Trial decompression of every candidate; show progress for long lists
    let progress = if !quiet && candidates.len() > 256 {
        let pb = ProgressBar::new(candidates.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}",
                )?
                .progress_chars("#>-"),
        );
        pb.set_message("Validating...");
        Some(pb)
    } else {
        None
    };

    let confirmed = candidates.filter(|&offset| {
        if let Some(ref pb) = progress {
            pb.inc(1);
        }
        is_candidate(rom, offset, true)
    });

    if let Some(ref pb) = progress {
        pb.finish_with_message("Validation complete");
    }
    Ok(confirmed)
}

fn scan_rom(
    input: &Path,
    all: bool,
    strict: bool,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let rom = load_rom(input)?;
    let start_time = Instant::now();
    let pointers = collect_pointers(&rom, all, strict, quiet)?;

    for offset in pointers.iter() {
        match lz77::read_header(&rom, offset) {
            Ok(header) if header.is_lz77() => {
                println!("0x{:08X}  {:>6} bytes", to_mapped_address(offset), header.size)
            }
            _ => println!("0x{:08X}", to_mapped_address(offset)),
        }
    }

    if !quiet {
        eprintln!(
            "{} pointers in {:.2?}",
            pointers.len(),
            start_time.elapsed()
        );
    }
    Ok(())
}

fn show_stream_info(
    input: &Path,
    address: u32,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let rom = load_rom(input)?;
    let offset = to_raw_offset(address);
    let header = lz77::read_header(&rom, offset)?;

    println!("Stream Information:");
    println!("  Address: 0x{:08X} (offset 0x{:X})", to_mapped_address(offset), offset);
    println!("  Tag: 0x{:02X}", header.tag);
    println!("  Declared Size: {} bytes", header.size);

    let status = match classify(&rom, offset) {
        Candidate::NotCandidate => "✗ Not a plausible LZ77 image stream",
        Candidate::Plausible => "~ Plausible header, stream does not decode",
        Candidate::Confirmed => "✓ Valid LZ77 stream",
    };
    println!("  Status: {}", status);

    match decompress_with_stats(&rom, offset) {
        Ok((_, stats)) => {
            let ratio = (stats.compressed_size as f64 / header.size.max(1) as f64) * 100.0;
            println!("  Compressed Size: {} bytes", stats.compressed_size);
            println!("  Compression Ratio: {:.1}%", ratio);
            if verbose {
                println!("  Literals: {}", stats.literal_count);
                println!("  Back-references: {}", stats.back_reference_count);
                println!("  Longest Copy: {} bytes", stats.longest_copy);
            }
        }
        Err(e) => {
            if verbose {
                println!("  Error: {}", e);
            }
        }
    }

    Ok(())
}

fn decompress_stream(
    input: &Path,
    address: u32,
    output: &Path,
    force: bool,
    verbose: bool,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    check_output(output, force)?;
    let rom = load_rom(input)?;

    if verbose {
        println!(
            "Decompressing 0x{:08X} from '{}' to '{}'",
            to_mapped_address(address),
            input.display(),
            output.display()
        );
    }

    let start_time = Instant::now();
    let (data, stats) = decompress_with_stats(&rom, address)
        .map_err(|e| format!("Decompression failed: {}", e))?;
    fs::write(output, &data)?;

    if !quiet {
        println!("✓ Decompression successful!");
        println!("  Input:  {} bytes", stats.compressed_size);
        println!("  Output: {} bytes", data.len());
        println!("  Time:   {:.2?}", start_time.elapsed());
    }

    Ok(())
}

fn render_image(
    input: &Path,
    output: &Path,
    view: &ViewState,
    bpp: Bpp,
    force: bool,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    check_output(output, force)?;
    let rom = load_rom(input)?;
    let pointers = scan_candidates(&rom);
    let codec = LinearCodec::new(bpp);

    let image = view
        .decode(&rom, &pointers, &codec)
        .map_err(|e| view.describe_error(&e))?;
    image.save(output)?;

    if !quiet {
        println!("✓ Saved {}x{} image to '{}'", image.width(), image.height(), output.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_rom() -> Vec<u8> {
        // 2bpp tiles: 64-byte LZ77 stream at 0x100, raw palette at 0x200
        let mut rom = vec![0u8; 0x300];
        let mut stream = vec![0x10, 0x40, 0x00, 0x00];
        for chunk in 0..8u8 {
            stream.push(0x00);
            stream.extend((0..8u8).map(|i| chunk * 8 + i));
        }
        rom[0x100..0x100 + stream.len()].copy_from_slice(&stream);
        rom[0x200..0x208].copy_from_slice(&[0x00, 0x00, 0x1F, 0x00, 0xE0, 0x03, 0x00, 0x7C]);
        // A pointer to the stream so scanning finds it
        rom[0x10..0x14].copy_from_slice(&0x0800_0100u32.to_le_bytes());
        rom
    }

    #[test]
    fn test_parse_address() {
        assert_eq!(parse_address("0x08000100"), Ok(0x0800_0100));
        assert_eq!(parse_address("0XFF"), Ok(0xFF));
        assert_eq!(parse_address("256"), Ok(256));
        assert!(parse_address("0xZZ").is_err());
        assert!(parse_address("").is_err());
    }

    #[test]
    fn test_decompress_and_render() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let rom_path = dir.path().join("test.gba");
        let raw_path = dir.path().join("tiles.bin");
        let png_path = dir.path().join("tiles.png");
        fs::write(&rom_path, test_rom())?;

        decompress_stream(&rom_path, 0x0800_0100, &raw_path, false, false, true)?;
        assert_eq!(fs::read(&raw_path)?, (0..64u8).collect::<Vec<_>>());

        // Refuses to overwrite without --force
        assert!(decompress_stream(&rom_path, 0x100, &raw_path, false, false, true).is_err());

        let mut view = ViewState::new();
        view.set_image(0x100);
        view.set_palette(0x200);
        view.set_width(1);
        render_image(&rom_path, &png_path, &view, Bpp::Two, false, true)?;
        let image = image::open(&png_path)?;
        assert_eq!((image.width(), image.height()), (8, 32));

        Ok(())
    }

    #[test]
    fn test_collect_pointers() -> Result<(), Box<dyn std::error::Error>> {
        let rom = ByteSource::from(test_rom());
        assert_eq!(collect_pointers(&rom, false, false, true)?.as_slice(), &[0x100]);
        assert_eq!(collect_pointers(&rom, false, true, true)?.as_slice(), &[0x100]);
        assert!(collect_pointers(&rom, true, false, true)?.contains(0x100));
        Ok(())
    }
}
