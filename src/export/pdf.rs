use printpdf::{
    image_crate::{DynamicImage, RgbImage},
    Image, ImageTransform, Mm, PdfDocument,
};
use tracing::{debug, info, warn};

use crate::{
    error::ExportError,
    export::{export_file_name, raster::Raster, raster::Rasterizer, ExportedFile},
    render::RenderedDocument,
};

pub const PDF_MIME: &str = "application/pdf";

const MM_PER_INCH: f32 = 25.4;

/// Physical page size and uniform margin, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFormat {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_mm: f32,
}

impl PageFormat {
    pub const A4: PageFormat = PageFormat {
        width_mm: 210.0,
        height_mm: 297.0,
        margin_mm: 10.0,
    };

    pub fn content_width_mm(&self) -> f32 {
        self.width_mm - 2.0 * self.margin_mm
    }

    pub fn content_height_mm(&self) -> f32 {
        self.height_mm - 2.0 * self.margin_mm
    }
}

impl Default for PageFormat {
    fn default() -> Self {
        PageFormat::A4
    }
}

/// One page worth of raster rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSlice {
    pub top: u32,
    pub rows: u32,
}

/// Cut a `width x height` raster into page-height slices. The raster is scaled so its width
/// fills the content width; the last slice may be shorter than the rest.
pub fn paginate(
    width: u32,
    height: u32,
    format: &PageFormat,
) -> Result<Vec<PageSlice>, ExportError> {
    if width == 0 || height == 0 {
        return Err(ExportError::Pagination(format!(
            "cannot paginate an empty {width}x{height} raster"
        )));
    }

    let px_per_mm = width as f32 / format.content_width_mm();
    let page_px = (format.content_height_mm() * px_per_mm).floor() as u32;
    if page_px == 0 {
        return Err(ExportError::Pagination(format!(
            "raster {width}px wide is too narrow to fill a page"
        )));
    }

    let pages = height.div_ceil(page_px);
    Ok((0..pages)
        .map(|page| {
            let top = page * page_px;
            PageSlice {
                top,
                rows: page_px.min(height - top),
            }
        })
        .collect())
}

/// Rasterizes the printable part of a document and lays it out over fixed-size pages.
#[derive(Debug, Clone)]
pub struct PdfExporter<R> {
    rasterizer: R,
    format: PageFormat,
}

impl<R: Rasterizer> PdfExporter<R> {
    pub fn new(rasterizer: R) -> Self {
        Self {
            rasterizer,
            format: PageFormat::A4,
        }
    }

    pub fn with_format(mut self, format: PageFormat) -> Self {
        self.format = format;
        self
    }

    pub fn format(&self) -> &PageFormat {
        &self.format
    }

    /// Best-effort: any failure comes back as an [`ExportError`] whose
    /// [`advisory`](ExportError::advisory) points at the print export instead.
    pub async fn export(&self, document: &RenderedDocument) -> Result<ExportedFile, ExportError> {
        let result = self.build(document).await;
        if let Err(err) = &result {
            warn!(
                target: "wander::export",
                code = err.error_code(),
                error = %err,
                "pdf export failed"
            );
        }
        result
    }

    async fn build(&self, document: &RenderedDocument) -> Result<ExportedFile, ExportError> {
        let printable = document.tree.printable();
        let raster = self.rasterizer.rasterize(&printable).await?;
        debug!(
            target: "wander::export",
            width = raster.width,
            height = raster.height,
            "document rasterized"
        );

        let bytes = assemble_pdf(&document.title, &raster, &self.format)?;
        info!(target: "wander::export", bytes = bytes.len(), "pdf assembled");

        Ok(ExportedFile::new(
            export_file_name(&document.title, "pdf"),
            PDF_MIME,
            bytes,
        ))
    }
}

/// Place each page slice of `raster` top-aligned inside the margins, one slice per page.
pub fn assemble_pdf(
    title: &str,
    raster: &Raster,
    format: &PageFormat,
) -> Result<Vec<u8>, ExportError> {
    let slices = paginate(raster.width, raster.height, format)?;
    let px_per_mm = raster.width as f32 / format.content_width_mm();
    let dpi = px_per_mm * MM_PER_INCH;

    let (doc, first_page, first_layer) = PdfDocument::new(
        title,
        Mm(format.width_mm),
        Mm(format.height_mm),
        "page 1",
    );

    for (index, slice) in slices.iter().enumerate() {
        let (page, layer) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(
                Mm(format.width_mm),
                Mm(format.height_mm),
                format!("page {}", index + 1),
            )
        };

        let part = raster.crop_rows(slice.top, slice.rows)?;
        let buffer = RgbImage::from_raw(part.width, part.height, part.rgb).ok_or_else(|| {
            ExportError::Pdf(format!("slice {} does not match its dimensions", index + 1))
        })?;
        let image = Image::from_dynamic_image(&DynamicImage::ImageRgb8(buffer));

        let slice_height_mm = slice.rows as f32 / px_per_mm;
        image.add_to_layer(
            doc.get_page(page).get_layer(layer),
            ImageTransform {
                translate_x: Some(Mm(format.margin_mm)),
                translate_y: Some(Mm(format.height_mm - format.margin_mm - slice_height_mm)),
                dpi: Some(dpi),
                ..Default::default()
            },
        );
    }

    doc.save_to_bytes()
        .map_err(|err| ExportError::Pdf(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate_a4() {
        // 190px wide is 1px per mm, so a page holds 277 rows.
        let slices = paginate(190, 600, &PageFormat::A4).unwrap();
        assert_eq!(
            slices,
            vec![
                PageSlice { top: 0, rows: 277 },
                PageSlice { top: 277, rows: 277 },
                PageSlice { top: 554, rows: 46 },
            ]
        );
    }

    #[test]
    fn test_paginate_exact_fit_and_short() {
        assert_eq!(paginate(380, 554, &PageFormat::A4).unwrap().len(), 1);
        assert_eq!(paginate(380, 555, &PageFormat::A4).unwrap().len(), 2);
        assert_eq!(
            paginate(190, 10, &PageFormat::A4).unwrap(),
            vec![PageSlice { top: 0, rows: 10 }]
        );
    }

    #[test]
    fn test_paginate_rejects_empty() {
        assert!(matches!(
            paginate(0, 100, &PageFormat::A4),
            Err(ExportError::Pagination(_))
        ));
        assert!(matches!(
            paginate(100, 0, &PageFormat::A4),
            Err(ExportError::Pagination(_))
        ));
    }

    #[test]
    fn test_assemble_produces_pdf() {
        let raster = Raster::new(19, 60, vec![200; 19 * 60 * 3]).unwrap();
        let bytes = assemble_pdf("测试", &raster, &PageFormat::A4).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
