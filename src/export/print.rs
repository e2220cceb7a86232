use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use crate::{
    error::ExportError,
    export::{export_file_name, ExportedFile},
    render::RenderedDocument,
};

pub const HTML_MIME: &str = "text/html; charset=utf-8";

const PRINT_ON_LOAD: &str =
    "<script>window.addEventListener(\"load\",function(){window.print();});</script>\n";

/// A browser print job: the document as-is, with interactive nodes hidden by the print
/// stylesheet and the print dialog opened on load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintJob {
    pub file_name: String,
    pub html: String,
}

impl PrintJob {
    pub fn from_document(document: &RenderedDocument) -> Self {
        Self {
            file_name: export_file_name(&document.title, "html"),
            html: document.to_html_with_head(PRINT_ON_LOAD),
        }
    }

    pub fn into_file(self) -> ExportedFile {
        ExportedFile::new(self.file_name, HTML_MIME, self.html.into_bytes())
    }
}

/// Hands a print job to whatever does the printing.
#[async_trait]
pub trait PrintHost: Send + Sync {
    async fn print(&self, job: &PrintJob) -> Result<(), ExportError>;
}

/// Writes print jobs as HTML files to open in a browser.
#[derive(Debug, Clone)]
pub struct HtmlFilePrintHost {
    out_dir: PathBuf,
}

impl HtmlFilePrintHost {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn path_for(&self, job: &PrintJob) -> PathBuf {
        self.out_dir.join(&job.file_name)
    }
}

#[async_trait]
impl PrintHost for HtmlFilePrintHost {
    async fn print(&self, job: &PrintJob) -> Result<(), ExportError> {
        let path = self.path_for(job);
        tokio::fs::write(&path, job.html.as_bytes()).await?;
        info!(target: "wander::export", path = %path.display(), "print job written");
        Ok(())
    }
}
