//! Export pipeline: render surface → supersampled bitmap → A4 PDF on disk.

pub mod fitting;
pub mod handlers;
pub mod pdf;
pub mod pipeline;
pub mod surface;

use thiserror::Error;

pub use fitting::{OverflowPolicy, PageSize, Placement};
pub use pipeline::{ExportConfig, ExportPipeline, ExportedFile, FileStem};
pub use surface::{ElementTree, RenderSurface, SnapshotSurface};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no render surface was provided")]
    MissingSurface,

    #[error("rasterization failed: {0}")]
    Rasterize(String),

    #[error("PDF encoding failed: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("another export is already running")]
    Busy,

    #[error("first and last name are required to name the exported file")]
    MissingName,

    #[error("supersampling factor must be at least 2, got {0}")]
    InvalidScale(u32),
}
