//! Export transformers. Each one reads a shared document and owns its output buffers, so
//! exports can run side by side.

pub mod markdown;
pub mod pdf;
pub mod print;
pub mod raster;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::ExportError;

pub use markdown::{to_markdown, MarkdownExporter};
pub use pdf::{paginate, PageFormat, PageSlice, PdfExporter};
pub use print::{HtmlFilePrintHost, PrintHost, PrintJob};
pub use raster::{CommandRasterizer, Raster, Rasterizer};

/// Download name for an exported itinerary: `{title}_攻略.{ext}`, with each whitespace run
/// and each path separator in the title replaced by `_`.
pub fn export_file_name(title: &str, ext: &str) -> String {
    let mut stem = String::with_capacity(title.len());
    let mut in_whitespace = false;
    for ch in title.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                stem.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        stem.push(if ch == '/' || ch == '\\' { '_' } else { ch });
    }
    format!("{stem}_攻略.{ext}")
}

/// A finished export, ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportedFile {
    pub fn new(file_name: String, mime: &'static str, bytes: Vec<u8>) -> Self {
        Self {
            file_name,
            mime,
            bytes,
        }
    }

    pub async fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let path = dir.join(&self.file_name);
        tokio::fs::write(&path, &self.bytes).await?;
        info!(
            target: "wander::export",
            path = %path.display(),
            bytes = self.bytes.len(),
            "export written"
        );
        Ok(path)
    }
}
