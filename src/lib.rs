//! Labelkit: the data engine behind an image annotation widget.
//!
//! Labelkit holds the parts of an annotator that do not draw pixels: a
//! geometry kernel for boxes and polygons, a bit-exact YOLO text codec, an
//! undoable annotation store, a keyboard shortcut dispatch table and the
//! small state machines behind box and polygon drawing. The `labelkit`
//! binary exposes the codec over project JSON files.
//!
//! # Modules
//!
//! - [`geometry`]: Boxes, points, polygons and resize handles
//! - [`model`]: Ids, labels, annotations, images and the project document
//! - [`yolo`]: YOLO text formats and label directory I/O
//! - [`export`]: Per-image export payloads
//! - [`store`]: Annotation state with bounded undo/redo
//! - [`shortcuts`]: Chord matching and shortcut resolution
//! - [`drawing`]: Viewport mapping plus box and polygon drafts
//! - [`session`]: Tool, selection, navigation and favorites
//! - [`tags`]: Label catalog over optional host tag capabilities
//! - [`image_cache`]: Image size lookup from files on disk
//! - [`error`]: Error types for labelkit operations

pub mod drawing;
pub mod error;
pub mod export;
pub mod geometry;
pub mod image_cache;
pub mod logging;
pub mod model;
pub mod session;
pub mod shortcuts;
pub mod store;
pub mod tags;
pub mod yolo;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;

pub use error::LabelkitError;

use image_cache::ImageDimensionCache;
use model::io_json::{read_project_json, write_project_json};
use model::Project;
use shortcuts::ShortcutMap;
use store::AnnotationStore;
use yolo::LabelFormat;

/// The labelkit CLI application.
#[derive(Parser)]
#[command(name = "labelkit")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Log progress to stderr (honours RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Write a project's annotations as a YOLO label directory.
    Export(ExportArgs),
    /// Read a YOLO label directory back into a project.
    Import(ImportArgs),
    /// Print the detected YOLO format of each line in a label file.
    Detect(DetectArgs),
    /// Print the effective keyboard shortcut table.
    Shortcuts(ShortcutsArgs),
}

/// Arguments for the export subcommand.
#[derive(clap::Args)]
struct ExportArgs {
    /// Project JSON file.
    input: PathBuf,

    /// Output directory; label files go under `labels/`.
    #[arg(short, long)]
    output: PathBuf,

    /// Label format ('auto', 'detection', 'segmentation', 'obb' or 'classification').
    #[arg(long, default_value = "auto")]
    format: String,

    /// Directory holding the images, used for sizes the project lacks.
    #[arg(long, env = "LABELKIT_IMAGES")]
    images: Option<PathBuf>,

    /// Also write the export payload as JSON to this file.
    #[arg(long)]
    payload: Option<PathBuf>,
}

/// Arguments for the import subcommand.
#[derive(clap::Args)]
struct ImportArgs {
    /// Project JSON file supplying images and labels.
    input: PathBuf,

    /// Dataset root containing `labels/`, or the labels directory itself.
    #[arg(long)]
    labels: PathBuf,

    /// Where to write the updated project JSON.
    #[arg(short, long)]
    output: PathBuf,

    /// Label format ('auto', 'detection', 'segmentation', 'obb' or 'classification').
    #[arg(long, default_value = "auto")]
    format: String,

    /// Directory holding the images, used for sizes the project lacks.
    #[arg(long, env = "LABELKIT_IMAGES")]
    images: Option<PathBuf>,
}

/// Arguments for the detect subcommand.
#[derive(clap::Args)]
struct DetectArgs {
    /// YOLO label file.
    input: PathBuf,
}

/// Arguments for the shortcuts subcommand.
#[derive(clap::Args)]
struct ShortcutsArgs {
    /// YAML file of `action: chord` overrides.
    #[arg(long, env = "LABELKIT_SHORTCUTS")]
    config: Option<PathBuf>,

    /// Output format ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Run the labelkit CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), LabelkitError> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Some(Commands::Export(args)) => run_export(args),
        Some(Commands::Import(args)) => run_import(args),
        Some(Commands::Detect(args)) => run_detect(args),
        Some(Commands::Shortcuts(args)) => run_shortcuts(args),
        None => {
            println!("labelkit {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Annotation data engine and YOLO label tool.");
            println!();
            println!("Run 'labelkit --help' for usage information.");
            Ok(())
        }
    }
}

fn parse_format(raw: &str) -> Result<LabelFormat, LabelkitError> {
    raw.parse().map_err(LabelkitError::UnsupportedFormat)
}

/// Reads a project and fills in missing image sizes from `images`, if given.
fn load_project(input: &Path, images: Option<&Path>) -> Result<Project, LabelkitError> {
    let mut project = read_project_json(input)?;
    if let Some(images_dir) = images {
        let mut cache = ImageDimensionCache::new(images_dir);
        let filled = cache.fill_missing(&mut project.images)?;
        info!(filled, dir = %images_dir.display(), "read image sizes");
    }
    Ok(project)
}

/// Execute the export subcommand.
fn run_export(args: ExportArgs) -> Result<(), LabelkitError> {
    let format = parse_format(&args.format)?;
    let project = load_project(&args.input, args.images.as_deref())?;

    let entries = export::export_all(&project.images, &project.annotations, &project.labels, format);
    yolo::io::write_label_dir(&args.output, &entries, &project.labels)?;

    if let Some(payload_path) = &args.payload {
        let json = export::to_json_string(&entries)?;
        std::fs::write(payload_path, json).map_err(LabelkitError::Io)?;
    }

    let annotation_count: usize = entries.iter().map(|entry| entry.annotations.len()).sum();
    println!(
        "Exported {} annotations across {} images ({}) to {}",
        annotation_count,
        entries.len(),
        format,
        args.output.display()
    );
    Ok(())
}

/// Execute the import subcommand.
///
/// Images with a label file get exactly the parsed annotations; other images
/// keep what the project already had.
fn run_import(args: ImportArgs) -> Result<(), LabelkitError> {
    let format = parse_format(&args.format)?;
    let mut project = load_project(&args.input, args.images.as_deref())?;

    let imported = yolo::io::read_label_dir(&args.labels, &project, format)?;
    let annotation_count: usize = imported.values().map(Vec::len).sum();
    let image_count = imported.len();

    let mut store = AnnotationStore::with_annotations(std::mem::take(&mut project.annotations));
    for (image_id, annotations) in imported {
        store.set_annotations(&image_id, annotations);
    }
    project.annotations = store.annotations().clone();

    write_project_json(&args.output, &project)?;
    println!(
        "Imported {} annotations across {} images ({}) into {}",
        annotation_count,
        image_count,
        format,
        args.output.display()
    );
    Ok(())
}

/// Execute the detect subcommand.
fn run_detect(args: DetectArgs) -> Result<(), LabelkitError> {
    let txt = std::fs::read_to_string(&args.input).map_err(LabelkitError::Io)?;

    for (index, line) in txt.lines().filter(|line| !line.trim().is_empty()).enumerate() {
        let detected = yolo::detect_yolo_format(line)
            .map(|format| format.as_str())
            .unwrap_or("unknown");
        println!("{index}\t{detected}");
    }
    Ok(())
}

/// Execute the shortcuts subcommand.
fn run_shortcuts(args: ShortcutsArgs) -> Result<(), LabelkitError> {
    let map = match &args.config {
        Some(path) => ShortcutMap::load_yaml(path)?,
        None => ShortcutMap::default(),
    };

    match args.output.as_str() {
        "text" => {
            for (action, chord) in map.iter() {
                println!("{:<20} {}", action.as_str(), chord);
            }
        }
        "json" => {
            let json = serde_json::to_string_pretty(&map).map_err(LabelkitError::ExportJsonWrite)?;
            println!("{json}");
        }
        other => {
            return Err(LabelkitError::UnsupportedFormat(format!(
                "'{other}' (supported: text, json)"
            )));
        }
    }
    Ok(())
}
