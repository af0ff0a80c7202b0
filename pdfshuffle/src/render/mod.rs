//! Page rendering for thumbnails.
//!
//! Ingestion needs three things from a renderer: open a byte buffer, report
//! page dimensions at scale 1.0, and rasterize a page at a fixed scale. The
//! [`PdfRenderer`] trait captures that seam; [`HayroRenderer`] is the
//! implementation used by default.
//!
//! Rendered frames are encoded to PNG once and kept as [`Thumbnail`]s for the
//! lifetime of the page descriptor.

mod hayro;

pub use self::hayro::HayroRenderer;

use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::sync::Arc;

/// Errors raised by a renderer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// The document is encrypted and needs a password.
    #[error("document requires a password")]
    PasswordRequired,
    /// The document could not be opened.
    #[error("invalid document: {0}")]
    Invalid(String),
    /// A page index past the end of the document was requested.
    #[error("page index {0} is out of range")]
    PageOutOfRange(usize),
    /// The rendered frame could not be encoded.
    #[error("failed to encode thumbnail: {0}")]
    Encode(String),
}

/// Raw RGBA pixels of a rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaFrame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8 pixels.
    pub pixels: Arc<[u8]>,
}

/// An opened document that can be rendered page by page.
pub trait RenderDocument {
    /// Number of pages.
    fn page_count(&self) -> usize;
    /// Width and height of a page at scale 1.0.
    fn page_dimensions(&self, page: usize) -> Result<(f32, f32), RenderError>;
    /// Rasterize a page.
    fn render_page(&self, page: usize, scale: f32) -> Result<RgbaFrame, RenderError>;
}

/// Opens PDF bytes for rendering.
pub trait PdfRenderer: Send + Sync {
    /// Open a document.
    ///
    /// Returns [`RenderError::PasswordRequired`] for encrypted input, distinct
    /// from [`RenderError::Invalid`].
    fn open(&self, bytes: Arc<Vec<u8>>) -> Result<Box<dyn RenderDocument>, RenderError>;
}

/// PNG-encoded page preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    width: u32,
    height: u32,
    png: Vec<u8>,
}

impl Thumbnail {
    /// Encode a rendered frame as PNG.
    pub fn encode(frame: &RgbaFrame) -> Result<Self, RenderError> {
        let image = RgbaImage::from_raw(frame.width, frame.height, frame.pixels.to_vec())
            .ok_or_else(|| RenderError::Encode("pixel buffer does not match frame size".into()))?;

        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| RenderError::Encode(e.to_string()))?;

        Ok(Self {
            width: frame.width,
            height: frame.height,
            png,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// PNG bytes.
    pub fn png(&self) -> &[u8] {
        &self.png
    }
}

/// One page produced by [`render_pages`].
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Width at scale 1.0.
    pub width: f32,
    /// Height at scale 1.0.
    pub height: f32,
    /// Preview rendered at the requested scale.
    pub thumbnail: Thumbnail,
}

/// Open a document and render every page.
///
/// Either all pages are returned or an error; a document that fails halfway
/// yields no pages at all.
pub fn render_pages(
    renderer: &dyn PdfRenderer,
    bytes: Arc<Vec<u8>>,
    scale: f32,
) -> Result<Vec<RenderedPage>, RenderError> {
    let document = renderer.open(bytes)?;
    let page_count = document.page_count();
    if page_count == 0 {
        return Err(RenderError::Invalid("PDF has no pages".into()));
    }

    let mut pages = Vec::with_capacity(page_count);
    for page in 0..page_count {
        let (width, height) = document.page_dimensions(page)?;
        let frame = document.render_page(page, scale)?;
        pages.push(RenderedPage {
            width,
            height,
            thumbnail: Thumbnail::encode(&frame)?,
        });
    }

    Ok(pages)
}
