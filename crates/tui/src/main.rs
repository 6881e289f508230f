mod page;
mod palette;
mod renderer;
mod store;

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use folio_core::SiteConfig;
use tracing_subscriber::EnvFilter;

use crate::store::FileStore;

fn load_site(path: Option<&PathBuf>) -> Result<SiteConfig> {
    let Some(path) = path else {
        return Ok(SiteConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    SiteConfig::from_json(&raw).with_context(|| format!("parsing config {}", path.display()))
}

/// Log to a file: stdout belongs to the terminal UI.
fn init_tracing(level: &str) -> Result<PathBuf> {
    let path = std::env::var_os("FOLIO_LOG")
        .map_or_else(|| std::env::temp_dir().join("folio.log"), PathBuf::from);
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();
    Ok(path)
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 2 || args.get(1).is_some_and(|a| a == "-h" || a == "--help") {
        eprintln!("Usage: folio [site.json]");
        std::process::exit(1);
    }

    let config_path = args.get(1).map(PathBuf::from);
    let site = load_site(config_path.as_ref())?;
    let log_path = init_tracing(&site.log_level)?;
    tracing::debug!(log = %log_path.display(), config = ?config_path, "config loaded");

    let state_path = std::env::var_os("FOLIO_STATE")
        .map_or_else(|| std::env::temp_dir().join("folio-state.json"), PathBuf::from);
    let store = FileStore::open(state_path)?;

    renderer::run(&site, store)
}
