pub mod checks;
pub mod engine;
pub mod pipeline;
pub mod report;
pub mod target;
pub mod whatcms;

pub use crate::domain::model::{CmsInfo, CmsKind, CmsLookup, ScanReport};
pub use crate::domain::ports::{ConfigProvider, Scanner, Storage};
pub use crate::utils::error::Result;
