//! Export orchestration: one export at a time, CPU work off the async runtime, and
//! an all-or-nothing write of `<stem>.pdf`.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::export::fitting::{layout_pages, OverflowPolicy, PageSize};
use crate::export::pdf::render_pdf;
use crate::export::surface::RenderSurface;
use crate::export::ExportError;
use crate::models::{DocumentContent, DocumentKind};

pub const MIN_SCALE: u32 = 2;

#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Device pixels per layout pixel.
    pub scale: u32,
    pub page: PageSize,
    pub overflow: OverflowPolicy,
    pub output_dir: PathBuf,
}

impl ExportConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            scale: MIN_SCALE,
            page: PageSize::A4,
            overflow: OverflowPolicy::default(),
            output_dir: output_dir.into(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// File naming
// ────────────────────────────────────────────────────────────────────────────

/// `<First>_<Last>_<Kind>`, without extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStem(String);

fn sanitize(part: &str) -> String {
    part.trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '-',
            c if c.is_control() => '-',
            c if c.is_whitespace() => '-',
            c => c,
        })
        .collect()
}

impl FileStem {
    pub fn new(first_name: &str, last_name: &str, kind: DocumentKind) -> Result<Self, ExportError> {
        if first_name.trim().is_empty() || last_name.trim().is_empty() {
            return Err(ExportError::MissingName);
        }
        Ok(FileStem(format!(
            "{}_{}_{}",
            sanitize(first_name),
            sanitize(last_name),
            kind.file_label()
        )))
    }

    /// Stem from the author of a document: résumé owner, applicant, or sender.
    pub fn for_document(content: &DocumentContent) -> Result<Self, ExportError> {
        let (first, last) = content.author_name();
        Self::new(first, last, content.kind())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn file_name(&self) -> String {
        format!("{}.pdf", self.0)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub file_name: String,
    pub path: PathBuf,
    pub pages: usize,
    pub bytes: Bytes,
}

pub struct ExportPipeline {
    config: ExportConfig,
    busy: Arc<AtomicBool>,
}

/// Clears the busy flag when the render task finishes, however it finishes.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ExportPipeline {
    pub fn new(config: ExportConfig) -> Result<Self, ExportError> {
        if config.scale < MIN_SCALE {
            return Err(ExportError::InvalidScale(config.scale));
        }
        Ok(Self {
            config,
            busy: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    fn acquire(&self) -> Result<BusyGuard, ExportError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ExportError::Busy)?;
        Ok(BusyGuard(Arc::clone(&self.busy)))
    }

    /// Rasterizes `surface`, lays it out on pages and writes `<stem>.pdf` into the
    /// output directory. Nothing is written unless every step succeeds.
    pub async fn export(
        &self,
        surface: Option<Arc<dyn RenderSurface>>,
        stem: &FileStem,
    ) -> Result<ExportedFile, ExportError> {
        let surface = surface.ok_or(ExportError::MissingSurface)?;
        let guard = self.acquire()?;

        let config = self.config.clone();
        let file_name = stem.file_name();
        info!(
            "Exporting {file_name} at {}x ({:?} overflow)",
            config.scale, config.overflow
        );

        let task_name = file_name.clone();
        // The guard moves into the task: a dropped request must not free the slot early.
        let (path, pages, bytes) = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            render_and_write(surface.as_ref(), &config, &task_name)
        })
        .await
        .map_err(|e| ExportError::Rasterize(format!("export task failed: {e}")))??;

        info!("Exported {} ({pages} page(s), {} bytes)", path.display(), bytes.len());
        Ok(ExportedFile {
            file_name,
            path,
            pages,
            bytes: Bytes::from(bytes),
        })
    }
}

fn render_and_write(
    surface: &dyn RenderSurface,
    config: &ExportConfig,
    file_name: &str,
) -> Result<(PathBuf, usize, Vec<u8>), ExportError> {
    let (lw, lh) = surface.logical_size();
    if lw == 0 || lh == 0 {
        return Err(ExportError::MissingSurface);
    }

    let bitmap = surface.rasterize(config.scale)?;
    debug!("Rasterized {lw}x{lh} surface to {}x{}", bitmap.width(), bitmap.height());

    let placements = layout_pages(bitmap.dimensions(), config.page, config.overflow);
    let pdf = render_pdf(&bitmap, &placements, config.page)?;

    let path = write_atomically(&config.output_dir, file_name, &pdf)?;
    Ok((path, placements.len(), pdf))
}

fn write_atomically(dir: &Path, file_name: &str, contents: &[u8]) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;

    let path = dir.join(file_name);
    tmp.persist(&path).map_err(|e| ExportError::Io(e.error))?;
    Ok(path)
}
