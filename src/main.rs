//! ntsp CLI - Command-line tool for building texture streaming packages.
//!
//! This is the main entry point for the ntsp command-line application.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use ntsp::dds::decode_dds_header;
use ntsp::package::THUMBNAIL_MAX_DIM;
use ntsp::prelude::*;

/// ntsp - texture streaming package builder
#[derive(Parser)]
#[command(name = "ntsp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack DDS textures into a package and write one sidecar per texture
    Pack {
        /// DDS files, directories or glob patterns; a .ntsp path names the package
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output package file
        #[arg(short, long, env = "NTSP_OUTPUT")]
        output: Option<PathBuf>,

        /// Write sidecars here instead of over the source files
        #[arg(long, env = "NTSP_SIDECAR_DIR")]
        sidecar_dir: Option<PathBuf>,

        /// Scan directories recursively
        #[arg(short, long)]
        recursive: bool,

        /// Largest width or height of the embedded thumbnail
        #[arg(long, default_value_t = THUMBNAIL_MAX_DIM, value_parser = clap::value_parser!(u32).range(1..))]
        thumbnail_size: u32,
    },

    /// List the contents of a package
    List {
        /// Path to the package
        package: PathBuf,

        /// Show every mip level
        #[arg(short, long)]
        detailed: bool,
    },

    /// Show the header of a sidecar file
    Info {
        /// Path to the sidecar
        sidecar: PathBuf,
    },

    /// Check the layout of a package
    Verify {
        /// Path to the package
        package: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Pack {
            inputs,
            output,
            sidecar_dir,
            recursive,
            thumbnail_size,
        } => {
            cmd_pack(&inputs, output, sidecar_dir, recursive, thumbnail_size)?;
        }
        Commands::List { package, detailed } => {
            cmd_list(&package, detailed)?;
        }
        Commands::Info { sidecar } => {
            cmd_info(&sidecar)?;
        }
        Commands::Verify { package } => {
            cmd_verify(&package)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "ntsp_cli=debug,ntsp_pack=debug"
    } else {
        "ntsp_cli=info,ntsp_pack=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_pack(
    inputs: &[PathBuf],
    output: Option<PathBuf>,
    sidecar_dir: Option<PathBuf>,
    recursive: bool,
    thumbnail_size: u32,
) -> Result<()> {
    let discovered = discover_inputs(inputs, recursive)?;

    let package_path = output
        .or(discovered.package)
        .context("No package path given (use --output or pass a .ntsp path)")?;
    if discovered.textures.is_empty() {
        anyhow::bail!("No .dds inputs found");
    }

    let mut config = PackConfig::new(&package_path).with_thumbnail_max_dim(thumbnail_size);
    if let Some(dir) = sidecar_dir {
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
        config = config.with_sidecar_dir(dir);
    }

    println!("Loading {} textures...", discovered.textures.len());

    let pb = ProgressBar::new(discovered.textures.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let (textures, skipped) = load_textures(&discovered.textures, |_| pb.inc(1));
    pb.finish_and_clear();

    println!("Packing into {}", package_path.display());

    let mut report = pack_textures(textures, &config).context("Failed to build package")?;
    report.skipped_inputs = skipped;

    println!(
        "Packed {} textures ({} mip levels, {} bytes) in {:?}",
        report.entry_count,
        report.blob_count,
        report.package_size,
        start.elapsed()
    );
    println!(
        "Sidecars: {} written, {} failed; inputs skipped: {}",
        report.sidecars_written.len(),
        report.sidecar_failures.len(),
        report.skipped_inputs.len()
    );

    for failure in report.skipped_inputs.iter().chain(&report.sidecar_failures) {
        eprintln!("  {}: {}", failure.path.display(), failure.reason);
    }

    Ok(())
}

fn cmd_list(package_path: &Path, detailed: bool) -> Result<()> {
    let data = fs::read(package_path).context("Failed to read package")?;
    let package = PackageReader::parse(&data).context("Failed to parse package")?;

    for entry in package.entries() {
        let name = package.name(entry)?;
        let blobs = package.entry_blobs(entry)?;
        let size: u64 = blobs.iter().map(|b| b.data_size).sum();

        println!(
            "{:08x} {:>5}x{:<5} {:>3} {:>12} {}",
            entry.name_hash, entry.width, entry.height, entry.blob_count, size, name
        );

        if detailed {
            for (i, blob) in blobs.iter().enumerate() {
                println!("           mip {:>2} @ {:>12} {:>12}", i, blob.data_offset, blob.data_size);
            }
        }
    }

    println!(
        "\nTotal: {} entries, {} blobs, header {} bytes",
        package.header().entry_count,
        package.header().blob_count,
        package.header().header_size
    );

    Ok(())
}

fn cmd_info(sidecar_path: &Path) -> Result<()> {
    let data = fs::read(sidecar_path).context("Failed to read sidecar")?;
    let sidecar = Sidecar::parse(&data).context("Failed to parse sidecar")?;

    println!("Package:   {}", sidecar.package_name);
    println!(
        "Thumbnail: mip {} ({} bytes)",
        sidecar.header.thumbnail_index, sidecar.header.thumbnail_size
    );

    let texture = decode_dds_header(sidecar.format_block).context("Failed to decode format block")?;
    let layout = match (texture.is_cubemap, texture.array_size) {
        (true, 1) => " cube".to_string(),
        (true, n) => format!(" cube x{}", n),
        (false, 1) => String::new(),
        (false, n) => format!(" array x{}", n),
    };
    println!(
        "Texture:   {}x{}{}, {} mips, {:?}",
        texture.width, texture.height, layout, texture.mip_levels, texture.format
    );

    Ok(())
}

fn cmd_verify(package_path: &Path) -> Result<()> {
    let data = fs::read(package_path).context("Failed to read package")?;
    let package = PackageReader::parse(&data).context("Failed to parse package")?;
    package.verify().context("Package is invalid")?;

    println!(
        "{}: OK ({} entries, {} blobs)",
        package_path.display(),
        package.header().entry_count,
        package.header().blob_count
    );

    Ok(())
}

/// Inputs sorted out of the command line.
#[derive(Debug, Default)]
struct Discovered {
    textures: Vec<PathBuf>,
    package: Option<PathBuf>,
}

impl Discovered {
    fn classify(&mut self, path: PathBuf) {
        if has_extension(&path, "dds") {
            self.textures.push(path);
        } else if has_extension(&path, "ntsp") {
            self.package = Some(path);
        } else {
            tracing::debug!("Ignoring {}", path.display());
        }
    }
}

/// Expand files, directories and glob patterns into texture paths.
fn discover_inputs(args: &[PathBuf], recursive: bool) -> Result<Discovered> {
    let mut discovered = Discovered::default();

    for arg in args {
        let pattern = arg.to_string_lossy();

        if pattern.contains(['*', '?', '[']) {
            for entry in glob::glob(&pattern).with_context(|| format!("Invalid pattern {}", pattern))? {
                let path = entry?;
                if path.is_file() {
                    discovered.classify(path);
                }
            }
        } else if arg.is_dir() {
            let walker = WalkDir::new(arg)
                .min_depth(1)
                .max_depth(if recursive { usize::MAX } else { 1 })
                .sort_by_file_name();

            for entry in walker {
                let entry = entry.with_context(|| format!("Failed to scan {}", arg.display()))?;
                if entry.file_type().is_file() && has_extension(entry.path(), "dds") {
                    discovered.textures.push(entry.into_path());
                }
            }
        } else {
            discovered.classify(arg.clone());
        }
    }

    discovered.textures.sort();
    discovered.textures.dedup();

    Ok(discovered)
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}
