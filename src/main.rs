//! roomplan - headless driver for the room planner.
//!
//! Usage:
//!   roomplan replay --catalog demos/catalog.json --session demos/session.json
//!   roomplan classify "Velvet Sofa" "Living Room"
//!   roomplan designs list --store designs.json

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use roomplan::app::input::InteractionEvent;
use roomplan::canvas2d::LayoutCanvas;
use roomplan::catalog::{archetype_for, Catalog};
use roomplan::config::WorkspaceConfig;
use roomplan::design::store::{DesignStore, JsonFileDesignStore};
use roomplan::render::LogRenderer;
use roomplan::{Notification, Workspace};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "roomplan")]
#[command(about = "Furniture placement for a virtual room")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded interaction session against the 3D room
    Replay {
        /// Product catalog (JSON array of products)
        #[arg(long)]
        catalog: PathBuf,
        /// Session file (JSON array of interaction events)
        #[arg(long)]
        session: PathBuf,
        /// Workspace config; defaults apply when omitted
        #[arg(long)]
        config: Option<PathBuf>,
        /// Design store that saved designs are appended to
        #[arg(long, default_value = "designs.json")]
        store: PathBuf,
        /// Directory for exported scene files
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Print the 3D archetype a product would be drawn as
    Classify { name: String, category: String },
    /// Inspect the design store
    Designs {
        #[arg(long, default_value = "designs.json")]
        store: PathBuf,
        #[command(subcommand)]
        action: DesignsAction,
    },
}

#[derive(Subcommand)]
enum DesignsAction {
    List,
    /// Show a design as it would open on the 2D canvas
    Show { id: String },
    Delete { id: String },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay {
            catalog,
            session,
            config,
            store,
            out_dir,
        } => replay(&catalog, &session, config.as_deref(), &store, &out_dir),
        Commands::Classify { name, category } => {
            println!("{}", archetype_for(&name, &category));
            Ok(())
        }
        Commands::Designs { store, action } => designs(&store, action),
    }
}

fn load_config(path: Option<&Path>) -> Result<WorkspaceConfig> {
    let Some(path) = path else {
        return Ok(WorkspaceConfig::default());
    };
    WorkspaceConfig::load(path)
        .with_context(|| format!("Failed to load config {}", path.display()))
}

fn replay(
    catalog_path: &Path,
    session_path: &Path,
    config_path: Option<&Path>,
    store_path: &Path,
    out_dir: &Path,
) -> Result<()> {
    let config = load_config(config_path)?;
    let catalog = Catalog::load(catalog_path)
        .with_context(|| format!("Failed to load catalog {}", catalog_path.display()))?;
    let session = std::fs::read(session_path)
        .with_context(|| format!("Failed to read session {}", session_path.display()))?;
    let events: Vec<InteractionEvent> =
        serde_json::from_slice(&session).context("Failed to parse session events")?;
    let mut store = JsonFileDesignStore::open(store_path)
        .with_context(|| format!("Failed to open design store {}", store_path.display()))?;

    log::info!(
        "Replaying {} events with {} catalog products",
        events.len(),
        catalog.len()
    );

    let mut workspace = Workspace::new(config);
    let mut renderer = LogRenderer::default();
    let report = workspace
        .replay(&events, &catalog, &mut store, &mut renderer)
        .context("Session aborted")?;

    for notification in workspace.take_notifications() {
        match notification {
            Notification::Success(message) => println!("ok    {message}"),
            Notification::Error(message) => println!("error {message}"),
        }
    }

    if !report.exports.is_empty() {
        std::fs::create_dir_all(out_dir)
            .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    }
    for (index, export) in report.exports.iter().enumerate() {
        let file_name = if index == 0 {
            export.file_name.clone()
        } else {
            format!("{index}-{}", export.file_name)
        };
        let path = out_dir.join(file_name);
        std::fs::write(&path, &export.contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("exported {}", path.display());
    }

    for doc in &report.saved {
        println!("saved {} '{}' ({} items)", doc.id, doc.name, doc.items.len());
    }
    println!(
        "{} items in room, {} events ({} ignored, {} rejected)",
        workspace.scene().len(),
        report.events,
        report.ignored,
        report.rejected.len()
    );
    Ok(())
}

fn designs(store_path: &Path, action: DesignsAction) -> Result<()> {
    let mut store = JsonFileDesignStore::open(store_path)
        .with_context(|| format!("Failed to open design store {}", store_path.display()))?;

    match action {
        DesignsAction::List => {
            if store.list().is_empty() {
                println!("No saved designs in {}", store_path.display());
            }
            for doc in store.list() {
                println!(
                    "{}  {}  {} items  {}",
                    doc.id,
                    doc.created_at.format("%Y-%m-%d %H:%M"),
                    doc.items.len(),
                    doc.name
                );
            }
        }
        DesignsAction::Show { id } => {
            let doc = store
                .get(&id)
                .with_context(|| format!("No design with id {id}"))?;
            let mut canvas = LayoutCanvas::new(&WorkspaceConfig::default());
            canvas.load(doc);
            println!("{} ({})", doc.name, doc.created_at.to_rfc3339());
            for item in canvas.items() {
                println!(
                    "  {:<24} x {:>6.1}  y {:>6.1}  rot {:>5.1}",
                    item.product.name, item.x, item.y, item.rotation_degrees
                );
            }
        }
        DesignsAction::Delete { id } => {
            let doc = store
                .delete(&id)
                .with_context(|| format!("Failed to delete design {id}"))?;
            println!("deleted {} '{}'", doc.id, doc.name);
        }
    }
    Ok(())
}
