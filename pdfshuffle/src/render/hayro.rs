use std::sync::Arc;

use ::hayro::hayro_interpret::InterpreterSettings;
use ::hayro::hayro_syntax::Pdf;
use ::hayro::vello_cpu::color::palette::css::WHITE;
use ::hayro::{RenderSettings, render};

use super::{PdfRenderer, RenderDocument, RenderError, RgbaFrame};
use crate::utils::{has_encrypt_entry, mentions_encryption};

/// Renderer backed by `hayro`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HayroRenderer;

impl HayroRenderer {
    /// Create a renderer.
    pub fn new() -> Self {
        Self
    }
}

impl PdfRenderer for HayroRenderer {
    fn open(&self, bytes: Arc<Vec<u8>>) -> Result<Box<dyn RenderDocument>, RenderError> {
        if !bytes.as_slice().starts_with(b"%PDF-") {
            return Err(RenderError::Invalid("input is not a valid PDF header".into()));
        }

        let encrypted = has_encrypt_entry(bytes.as_slice());
        let pdf = Pdf::new(bytes).map_err(|err| {
            let message = format!("{err:?}");
            if encrypted || mentions_encryption(&message) {
                RenderError::PasswordRequired
            } else {
                RenderError::Invalid(format!("failed to parse PDF: {message}"))
            }
        })?;

        Ok(Box::new(HayroDocument { pdf }))
    }
}

struct HayroDocument {
    pdf: Pdf,
}

impl RenderDocument for HayroDocument {
    fn page_count(&self) -> usize {
        self.pdf.pages().len()
    }

    fn page_dimensions(&self, page: usize) -> Result<(f32, f32), RenderError> {
        let page_ref = self
            .pdf
            .pages()
            .get(page)
            .ok_or(RenderError::PageOutOfRange(page))?;

        Ok(page_ref.render_dimensions())
    }

    fn render_page(&self, page: usize, scale: f32) -> Result<RgbaFrame, RenderError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(RenderError::Invalid(
                "scale must be a positive finite value".into(),
            ));
        }

        let page_ref = self
            .pdf
            .pages()
            .get(page)
            .ok_or(RenderError::PageOutOfRange(page))?;

        let render_settings = RenderSettings {
            x_scale: scale,
            y_scale: scale,
            bg_color: WHITE,
            ..Default::default()
        };
        let interpreter_settings = InterpreterSettings::default();
        let pixmap = render(page_ref, &interpreter_settings, &render_settings);

        Ok(RgbaFrame {
            width: pixmap.width() as u32,
            height: pixmap.height() as u32,
            pixels: pixmap.data_as_u8_slice().to_vec().into(),
        })
    }
}
