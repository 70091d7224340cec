pub mod config;
pub mod datastore;
mod db;
pub mod migration;
mod neighbor_flow;
pub mod search;
pub mod store;

pub use config::{DatabaseConfig, PipenetConfig, PoolConfig, QueryConfig};
pub use datastore::{default_sqlite_path, load_or_init_config, open_store};
pub use pipenet_core::*;
pub use store::PipelineStore;
