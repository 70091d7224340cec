use std::path::{Path, PathBuf};

use crate::{PipelineStore, PipenetConfig, PipenetResult};

const DEFAULT_DB_NAME: &str = "pipenet.sqlite";

pub fn load_or_init_config(base: &Path) -> PipenetResult<PipenetConfig> {
    let default_sqlite = base.join(DEFAULT_DB_NAME);
    PipenetConfig::load_or_init(base, &default_sqlite)
}

pub async fn open_store(base: &Path) -> PipenetResult<PipelineStore> {
    let config = load_or_init_config(base)?;
    PipelineStore::connect(&config, base).await
}

pub fn default_sqlite_path(base: &Path) -> PathBuf {
    base.join(DEFAULT_DB_NAME)
}
