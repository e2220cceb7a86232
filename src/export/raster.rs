use std::process::Stdio;

use async_trait::async_trait;
use printpdf::image_crate::{load_from_memory_with_format, ImageFormat};
use tokio::{io::AsyncWriteExt, process::Command};
use tracing::debug;

use crate::{error::ExportError, render::html::to_html_document, render::VisualTree};

/// An RGB8 bitmap, rows top to bottom.
#[derive(Clone, PartialEq, Eq)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

impl std::fmt::Debug for Raster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl Raster {
    pub fn new(width: u32, height: u32, rgb: Vec<u8>) -> Result<Self, ExportError> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(3))
            .ok_or_else(|| {
                ExportError::Rasterize(format!("{width}x{height} raster is too large"))
            })?;
        if rgb.len() != expected {
            return Err(ExportError::Rasterize(format!(
                "{width}x{height} raster needs {expected} bytes, got {}",
                rgb.len()
            )));
        }
        Ok(Self { width, height, rgb })
    }

    /// Rows `top..top + rows` as their own raster.
    pub fn crop_rows(&self, top: u32, rows: u32) -> Result<Raster, ExportError> {
        let end = top.checked_add(rows).filter(|end| *end <= self.height).ok_or_else(|| {
            ExportError::Pagination(format!(
                "rows {top}..{} exceed raster height {}",
                top as u64 + rows as u64,
                self.height
            ))
        })?;
        let stride = self.width as usize * 3;
        let bytes = self.rgb[top as usize * stride..end as usize * stride].to_vec();
        Raster::new(self.width, rows, bytes)
    }

    /// Decode a binary PPM (`P6`) into RGB8.
    pub fn from_ppm(bytes: &[u8]) -> Result<Raster, ExportError> {
        if !bytes.starts_with(b"P6") {
            return Err(ExportError::Rasterize(
                "rasterizer output is not a binary PPM (P6)".to_string(),
            ));
        }

        let image = load_from_memory_with_format(bytes, ImageFormat::Pnm)
            .map_err(|err| ExportError::Rasterize(format!("invalid PPM output: {err}")))?
            .to_rgb8();
        let (width, height) = image.dimensions();
        Raster::new(width, height, image.into_raw())
    }
}

/// Turns the printable visual tree into one tall bitmap.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn rasterize(&self, tree: &VisualTree) -> Result<Raster, ExportError>;
}

#[async_trait]
impl<R: Rasterizer + ?Sized> Rasterizer for &R {
    async fn rasterize(&self, tree: &VisualTree) -> Result<Raster, ExportError> {
        (**self).rasterize(tree).await
    }
}

/// Rasterizes by piping the tree's HTML into an external renderer that prints a `P6` PPM on
/// stdout, e.g. `my-html-shot --format ppm -`.
#[derive(Debug, Clone)]
pub struct CommandRasterizer {
    program: String,
    args: Vec<String>,
}

impl CommandRasterizer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Split a whitespace-separated command line. `None` when it is blank.
    pub fn from_command_line(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }
}

#[async_trait]
impl Rasterizer for CommandRasterizer {
    async fn rasterize(&self, tree: &VisualTree) -> Result<Raster, ExportError> {
        let html = to_html_document(tree, "", "");
        debug!(
            target: "wander::export",
            program = %self.program,
            html_bytes = html.len(),
            "spawning rasterizer"
        );

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| {
                ExportError::Rasterize(format!("failed to start `{}`: {err}", self.program))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| ExportError::Rasterize("rasterizer stdin unavailable".to_string()))?;
        let feed = async move {
            stdin.write_all(html.as_bytes()).await?;
            stdin.shutdown().await
        };

        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output?;

        if !output.status.success() {
            return Err(ExportError::Rasterize(format!(
                "`{}` exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        // A renderer may close stdin early once it has what it needs.
        if let Err(err) = fed {
            debug!(target: "wander::export", error = %err, "rasterizer closed stdin early");
        }

        Raster::from_ppm(&output.stdout)
    }
}
