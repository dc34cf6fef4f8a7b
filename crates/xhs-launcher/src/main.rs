//! Bootstrap: load the settings once, then tidy the download folder.

mod config;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;
use xhs_core::{remove_empty_directories, Settings, TextEncoding};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let root = config::root_dir().context("could not determine the settings directory")?;
    std::fs::create_dir_all(&root)
        .with_context(|| format!("failed to create {}", root.display()))?;

    let encoding = TextEncoding::for_host();
    let store = Settings::new(&root, config::USERAGENT).with_encoding(encoding);
    let settings = store
        .run()
        .with_context(|| format!("failed to load {}", store.path().display()))?;
    info!(
        path = %store.path().display(),
        encoding = encoding.as_str(),
        keys = settings.len(),
        "settings ready"
    );

    let download = config::download_dir(&root, &settings);
    if download.is_dir() {
        remove_empty_directories(&download);
        info!(path = %download.display(), "pruned empty folders");
    }
    Ok(())
}
