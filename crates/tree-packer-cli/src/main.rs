use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use tree_packer_core::{DuplicateNamePolicy, PackerConfig, pack, pack_layout};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "tree-packer",
    about = "Pack images into a single texture atlas",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack image files and directories into one atlas
    Pack(PackArgs),
    /// Compute the layout and print stats without writing files
    Layout(PackArgs),
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    // Input/Output
    /// Input image files and directories
    #[arg(required = true, help_heading = "Input/Output")]
    inputs: Vec<PathBuf>,
    /// Output image file path (schema goes next to it with a .json extension)
    #[arg(short, long, help_heading = "Input/Output")]
    out: Option<PathBuf>,
    /// Output image format (only png)
    #[arg(short, long, default_value = "png", help_heading = "Input/Output")]
    format: String,
    /// Output schema format (only json)
    #[arg(short, long, default_value = "json", help_heading = "Input/Output")]
    schema: String,
    /// Indent the JSON schema
    #[arg(long, default_value_t = false, help_heading = "Input/Output")]
    pretty: bool,

    // Layout
    /// Output image width
    #[arg(long, default_value_t = 1024, help_heading = "Layout")]
    width: u32,
    /// Output image height
    #[arg(long, default_value_t = 1024, help_heading = "Layout")]
    height: u32,
    /// Atlas padding around every image
    #[arg(long, default_value_t = 1, help_heading = "Layout")]
    padding: u32,
    /// Ignore images too large to fit in the atlas
    #[arg(short = 'i', long, default_value_t = false, help_heading = "Layout")]
    ignore_large_image: bool,
    /// Duplicate display names: overwrite | error
    #[arg(long, default_value = "overwrite", help_heading = "Layout")]
    duplicate_names: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Pack(args) => run_pack(args, false),
        Commands::Layout(args) => run_pack(args, true),
    }
}

fn run_pack(cli: &PackArgs, dry_run: bool) -> anyhow::Result<()> {
    if !cli.schema.eq_ignore_ascii_case("json") {
        anyhow::bail!("unsupported schema format: {} (only json)", cli.schema);
    }
    if !cli.format.eq_ignore_ascii_case("png") {
        anyhow::bail!("unsupported output format: {} (only png)", cli.format);
    }
    let duplicate_names: DuplicateNamePolicy = cli
        .duplicate_names
        .parse()
        .map_err(|_| anyhow::anyhow!("unknown duplicate name policy: {}", cli.duplicate_names))?;

    let output_image = match &cli.out {
        Some(p) => p.clone(),
        None => default_output_file()?,
    };
    let cfg = PackerConfig::builder()
        .with_dimensions(cli.width, cli.height)
        .padding(cli.padding)
        .ignore_oversize(cli.ignore_large_image)
        .duplicate_names(duplicate_names)
        .output(output_image)
        .pretty_schema(cli.pretty)
        .build();
    cfg.validate()?;

    let images = gather_images(&cli.inputs);
    if images.is_empty() {
        anyhow::bail!("no available input image, abort");
    }

    info!(
        width = cfg.width,
        height = cfg.height,
        padding = cfg.padding,
        "output image size"
    );
    info!(ignore_oversize = cfg.ignore_oversize, "oversize policy");
    info!(count = images.len(), "start packing");

    let start = Instant::now();
    let out = if dry_run {
        pack_layout(images, &cfg)?
    } else {
        pack(images, &cfg).context("cannot pack textures")?
    };
    let elapsed = start.elapsed();

    if dry_run {
        println!("{}", out.stats.summary());
    } else {
        info!(image = %cfg.output_image.display(), "output image");
        info!(schema = %cfg.output_schema.display(), "output atlas");
    }
    info!(
        packed = out.stats.packed,
        occupancy = out.stats.occupancy(),
        elapsed_ms = elapsed.as_millis() as u64,
        "done"
    );
    Ok(())
}

/// `packed_<unix seconds>.png` in the working directory.
fn default_output_file() -> anyhow::Result<PathBuf> {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock before unix epoch")?
        .as_secs();
    let cwd = std::env::current_dir().context("cannot obtain working directory")?;
    Ok(cwd.join(format!("packed_{secs}.png")))
}

/// Absolute path -> file name for every image under `inputs`.
fn gather_images(inputs: &[PathBuf]) -> BTreeMap<PathBuf, String> {
    let mut images = BTreeMap::new();
    for input in inputs {
        if input.is_dir() {
            debug!(dir = %input.display(), "searching");
            for entry in WalkDir::new(input).into_iter() {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!(error = %e, "cannot walk entry");
                        continue;
                    }
                };
                if entry.file_type().is_file() && is_image(entry.path()) {
                    add_image(&mut images, entry.path());
                }
            }
        } else if input.is_file() {
            if is_image(input) {
                add_image(&mut images, input);
            } else {
                debug!(path = %input.display(), "not an image, skipped");
            }
        } else {
            warn!(path = %input.display(), "cannot access input");
        }
    }
    images
}

fn add_image(images: &mut BTreeMap<PathBuf, String>, path: &Path) {
    let abs = match std::path::absolute(path) {
        Ok(abs) => abs,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot obtain absolute path");
            return;
        }
    };
    let name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    debug!(path = %abs.display(), "found");
    images.insert(abs, name);
}

fn is_image(p: &Path) -> bool {
    matches!(
        p.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "bmp")
    )
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}
