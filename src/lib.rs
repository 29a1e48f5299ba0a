pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::{cli::LocalStorage, ScanConfig};
pub use crate::core::{
    engine::{ScanEngine, ScanOutcome},
    pipeline::ScanPipeline,
};
pub use crate::domain::model::{CmsInfo, CmsLookup, ScanReport};
pub use crate::utils::error::{Result, ScanError};
