//! tqtex CLI - Command-line tool for converting Titan Quest textures.
//!
//! This is the main entry point for the tqtex command-line application.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use walkdir::WalkDir;

use tqtex::prelude::*;

/// tqtex - Titan Quest .tex to PNG converter
#[derive(Parser)]
#[command(name = "tqtex")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a single .tex file to PNG
    Convert {
        /// Input .tex file
        input: PathBuf,

        /// Output PNG file (default: <output-dir>/<name>.png)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory for the output when no output file is given
        #[arg(long, env = "TQTEX_EXPORT", default_value = "export")]
        output_dir: PathBuf,
    },

    /// Convert every .tex file in a directory to PNG
    Batch {
        /// Directory containing .tex files
        #[arg(short, long, env = "TQTEX_IMPORT", default_value = "import")]
        input: PathBuf,

        /// Directory for the PNG files
        #[arg(short, long, env = "TQTEX_EXPORT", default_value = "export")]
        output: PathBuf,

        /// Do not clean the output directory before converting
        #[arg(long)]
        keep_existing: bool,

        /// Descend into subdirectories, mirroring them in the output
        #[arg(short, long)]
        recursive: bool,
    },

    /// Extract the embedded DDS stream from a .tex file
    ExtractDds {
        /// Input .tex file
        input: PathBuf,

        /// Output DDS file (default: input with a .dds extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show header and surface details of a .tex file
    Info {
        /// Input .tex file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = log_level(cli.verbose, cli.quiet) {
        logger.filter_level(level);
    }
    logger.init();

    match cli.command {
        Commands::Convert {
            input,
            output,
            output_dir,
        } => {
            cmd_convert(&input, output.as_deref(), &output_dir)?;
        }
        Commands::Batch {
            input,
            output,
            keep_existing,
            recursive,
        } => {
            cmd_batch(&input, &output, keep_existing, recursive)?;
        }
        Commands::ExtractDds { input, output } => {
            cmd_extract_dds(&input, output.as_deref())?;
        }
        Commands::Info { input } => {
            cmd_info(&input)?;
        }
    }

    Ok(())
}

fn cmd_convert(input: &Path, output: Option<&Path>, output_dir: &Path) -> Result<()> {
    if !input.is_file() {
        bail!("File not found: {}", input.display());
    }

    let output = match output {
        Some(path) => path.to_path_buf(),
        None => output_dir.join(png_name(input)),
    };

    convert_file(input, &output)?;
    println!("Successfully converted: {} -> {}", input.display(), output.display());

    Ok(())
}

fn cmd_batch(input: &Path, output: &Path, keep_existing: bool, recursive: bool) -> Result<()> {
    fs::create_dir_all(input)
        .with_context(|| format!("Cannot create or access import folder '{}'", input.display()))?;
    fs::create_dir_all(output)
        .with_context(|| format!("Cannot create or access export folder '{}'", output.display()))?;

    if !keep_existing {
        clean_dir(output)?;
    }

    let files = find_tex_files(input, recursive)?;
    if files.is_empty() {
        println!("No .tex files found in '{}'. Nothing to convert.", input.display());
        return Ok(());
    }

    println!("Converting {} files...", files.len());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%)")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let results: Vec<(&PathBuf, Result<()>)> = files
        .par_iter()
        .map(|file| {
            let relative = file.strip_prefix(input).unwrap_or(file);
            let target = output.join(relative).with_extension("png");
            let result = convert_file(file, &target);

            if let Err(e) = &result {
                pb.println(format!("[Skipped] {}: {:#}", relative.display(), e));
            }
            pb.inc(1);
            (file, result)
        })
        .collect();

    pb.finish_and_clear();

    let failed: Vec<&PathBuf> = results
        .iter()
        .filter(|(_, result)| result.is_err())
        .map(|(file, _)| *file)
        .collect();

    println!("\nConversion complete in {:?}.", start.elapsed());
    println!("Successfully converted: {}", results.len() - failed.len());
    println!("Skipped (errors): {}", failed.len());

    if !failed.is_empty() {
        println!("\nThe following files were skipped due to errors:");
        for file in failed {
            println!("  - {}", file.strip_prefix(input).unwrap_or(file).display());
        }
    }

    Ok(())
}

fn cmd_extract_dds(input: &Path, output: Option<&Path>) -> Result<()> {
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.with_extension("dds"));

    let data = fs::read(input).context("Failed to read input file")?;
    let dds = tex_to_dds(&data).context("Failed to extract DDS stream")?;
    write_output(&output, &dds)?;

    println!("Extracted: {} -> {}", input.display(), output.display());

    Ok(())
}

fn cmd_info(input: &Path) -> Result<()> {
    let data = fs::read(input).context("Failed to read input file")?;
    let header = parse_header(&data).context("Failed to parse TEX header")?;

    println!("File:        {}", input.display());
    println!("Container:   {}", header.version);
    println!("Frame rate:  {}", header.frame_rate);
    println!("Dimensions:  {}x{}", header.width, header.height);
    println!(
        "Payload:     {:?}, {} bytes at offset {}",
        header.format, header.payload_len, header.payload_offset
    );

    match header.format {
        PayloadFormat::Dds => {
            let payload = header.payload(&data)?;
            let surface = DdsSurface::parse(payload).context("Failed to parse DDS header")?;
            println!("Format:      {}", surface.format);
            println!("Mip levels:  {}", surface.header.mip_levels());
            println!("Pitch/size:  {}", { surface.header.pitch_or_linear_size });
            if let Some(dx10) = surface.dx10 {
                println!("DXGI format: {}", { dx10.dxgi_format });
            }
        }
        PayloadFormat::RawBgra => {
            println!("Format:      {} (bottom-up rows)", DdsFormat::Bgra8 { opaque: false });
        }
    }

    Ok(())
}

/// Level forced by `-v`/`-q`; `None` leaves `RUST_LOG` (default `warn`) in charge.
fn log_level(verbose: u8, quiet: bool) -> Option<log::LevelFilter> {
    match (verbose, quiet) {
        (0, false) => None,
        (0, true) => Some(log::LevelFilter::Error),
        (1, _) => Some(log::LevelFilter::Info),
        (2, _) => Some(log::LevelFilter::Debug),
        _ => Some(log::LevelFilter::Trace),
    }
}

/// Read, decode and write one texture.
fn convert_file(input: &Path, output: &Path) -> Result<()> {
    let data = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let image = convert(&data)?;

    log::info!(
        "{}: {}x{} -> {}",
        input.display(),
        image.width(),
        image.height(),
        output.display()
    );

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    image
        .save_png(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    Ok(())
}

fn write_output(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, data).context("Failed to write output file")?;
    Ok(())
}

/// `<stem>.png` for an input path.
fn png_name(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or(input.as_os_str());
    PathBuf::from(stem).with_extension("png")
}

/// Remove everything inside a directory, keeping the directory itself.
fn clean_dir(dir: &Path) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let result = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        if let Err(e) = result {
            log::warn!("Error while cleaning export folder ({}): {}", path.display(), e);
        }
    }
    Ok(())
}

/// Collect `.tex` files (case-insensitive), sorted for stable output.
fn find_tex_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(max_depth) {
        let entry = entry.with_context(|| format!("Cannot read from import folder '{}'", dir.display()))?;
        let is_tex = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("tex"));

        if entry.file_type().is_file() && is_tex {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_flags() {
        assert_eq!(log_level(0, false), None);
        assert_eq!(log_level(0, true), Some(log::LevelFilter::Error));
        assert_eq!(log_level(1, false), Some(log::LevelFilter::Info));
        assert_eq!(log_level(2, false), Some(log::LevelFilter::Debug));
        assert_eq!(log_level(3, false), Some(log::LevelFilter::Trace));
        assert_eq!(log_level(7, false), Some(log::LevelFilter::Trace));
    }

    #[test]
    fn test_verbose_flags_parse() {
        let cli = Cli::try_parse_from(["tqtex", "-vv", "info", "a.tex"]).unwrap();
        assert_eq!(log_level(cli.verbose, cli.quiet), Some(log::LevelFilter::Debug));

        let cli = Cli::try_parse_from(["tqtex", "info", "a.tex", "-q"]).unwrap();
        assert_eq!(log_level(cli.verbose, cli.quiet), Some(log::LevelFilter::Error));

        assert!(Cli::try_parse_from(["tqtex", "-v", "-q", "info", "a.tex"]).is_err());
    }

    #[test]
    fn test_png_name() {
        assert_eq!(png_name(Path::new("textures/Rock01.tex")), PathBuf::from("Rock01.png"));
    }
}
