// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! TRLE export CLI

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;
use trle_export::cli::Reporter;
use trle_export::config::DEFAULT_CONFIG_FILE;
use trle_export::{import_obj_file, ExportConfig, ExportError, Exporter, Scene};

#[derive(Parser)]
#[command(name = "trle-export")]
#[command(about = "Export UV layouts to TextureAdd .rec and StrPix .mqo files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ./trle-export.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args)]
struct Target {
    /// Input OBJ file
    input: PathBuf,

    /// Object to export (defaults to the first object)
    #[arg(long)]
    object: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export UVs to TextureAdd texture records
    Rec {
        #[command(flatten)]
        target: Target,

        /// Output file (defaults to the input name with .rec)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Texture page written into every record
        #[arg(long)]
        page: Option<u32>,

        /// Texture page size in pixels
        #[arg(long)]
        image_size: Option<u32>,
    },

    /// Export the mesh as a StrPix-compatible Metasequoia file
    Mqo {
        #[command(flatten)]
        target: Target,

        /// Output file (defaults to the input name with .mqo)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Mesh scale, 0.001 to 1000
        #[arg(short, long)]
        scale: Option<f64>,

        /// Texture file name referenced by the materials
        #[arg(short, long)]
        texture: Option<String>,

        /// Skip the per-face StrPix materials
        #[arg(long)]
        no_materials: bool,

        /// Write every object instead of only the selected one
        #[arg(long)]
        all_objects: bool,
    },

    /// Print the classification of every face
    Classify {
        #[command(flatten)]
        target: Target,

        /// Print a table instead of JSON
        #[arg(long)]
        table: bool,
    },

    /// Write the effective configuration to a TOML file
    Init {
        /// Destination (defaults to ./trle-export.toml)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        Reporter::report_error(&format!("{:#}", err));
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let mut config = ExportConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Rec {
            target,
            output,
            page,
            image_size,
        } => {
            config.page = page.unwrap_or(config.page);
            config.image_size = image_size.unwrap_or(config.image_size);
            let output = output.unwrap_or_else(|| target.input.with_extension("rec"));
            rec_command(config, &target, &output, cli.verbose)
        }
        Commands::Mqo {
            target,
            output,
            scale,
            texture,
            no_materials,
            all_objects,
        } => {
            config.scale = scale.unwrap_or(config.scale);
            config.texture = texture.or(config.texture);
            config.materials = config.materials && !no_materials;
            config.all_objects = config.all_objects || all_objects;
            let output = output.unwrap_or_else(|| target.input.with_extension("mqo"));
            mqo_command(config, &target, &output, cli.verbose)
        }
        Commands::Classify { target, table } => classify_command(config, &target, table),
        Commands::Init { path, force } => init_command(&config, path, force),
        Commands::Version => {
            println!("trle-export v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Import the input and make the requested object active
fn load(config: &mut ExportConfig, target: &Target) -> Result<Scene> {
    if !target.input.exists() {
        anyhow::bail!("Input file not found: {}", target.input.display());
    }

    let mut scene = import_obj_file(&target.input)?;
    match target.object.clone().or_else(|| config.object.take()) {
        Some(name) => scene.select(&name).with_context(|| {
            format!("no object named \"{}\" in {}", name, target.input.display())
        })?,
        None if scene.objects.len() > 1 && !config.all_objects => {
            Reporter::report_warning(&format!(
                "{} objects in {}, exporting the first one (use --object to choose)",
                scene.objects.len(),
                target.input.display()
            ));
        }
        None => {}
    }
    config.object = None;
    Ok(scene)
}

fn rec_command(
    mut config: ExportConfig,
    target: &Target,
    output: &Path,
    verbose: bool,
) -> Result<()> {
    let scene = load(&mut config, target)?;
    let exporter = Exporter::with_config(config)?;

    if verbose {
        Reporter::report_info(".rec export: processing UVs");
    }
    let start = Instant::now();
    let progress = Reporter::face_progress(exporter.face_count(&scene), verbose);
    let result = exporter.export_rec_with_progress(&scene, output, |_| progress.inc(1));
    progress.finish_and_clear();

    let summary = result.map_err(explain)?;
    Reporter::report_export(".rec", &summary, start.elapsed());
    Ok(())
}

fn mqo_command(
    mut config: ExportConfig,
    target: &Target,
    output: &Path,
    verbose: bool,
) -> Result<()> {
    let scene = load(&mut config, target)?;
    let exporter = Exporter::with_config(config)?;

    let start = Instant::now();
    let progress = Reporter::face_progress(exporter.face_count(&scene), verbose);
    let result = exporter.export_mqo_with_progress(&scene, output, |_| progress.inc(1));
    progress.finish_and_clear();

    let summary = result.map_err(explain)?;
    Reporter::report_export(".mqo", &summary, start.elapsed());
    Ok(())
}

fn classify_command(mut config: ExportConfig, target: &Target, table: bool) -> Result<()> {
    let scene = load(&mut config, target)?;
    let exporter = Exporter::with_config(config)?;
    let reports = exporter.classify_faces(&scene).map_err(explain)?;

    if table {
        let object = exporter.target(&scene)?;
        Reporter::report_classifications(&object.name, &reports);
    } else {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }
    Ok(())
}

fn init_command(config: &ExportConfig, path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    config.validate()?;
    config.save(&path)?;
    Reporter::success(&format!("Wrote {}", path.display()));
    Ok(())
}

/// Attach the usual fix to data-quality errors
fn explain(err: ExportError) -> anyhow::Error {
    let hint = match &err {
        ExportError::UnsupportedGeometry { .. } => Some("export aborted, no file was written"),
        ExportError::MissingUvData { .. } => {
            Some("unwrap the mesh (lightmap pack, 256x256) and try again")
        }
        ExportError::DegenerateFace { .. } => Some("every UV face must cover at least one pixel"),
        _ => None,
    };
    match hint {
        Some(hint) => anyhow::Error::new(err).context(hint),
        None => err.into(),
    }
}
