//! QR code rendering

use image::{ImageFormat, Luma};
use qrcode::QrCode;
use std::io::Cursor;

use crate::application::errors::RenderError;
use crate::domain::traits::Renderer;

/// Renders text as a black-on-white QR code PNG
pub struct QrRenderer {
    module_size: u32,
}

impl QrRenderer {
    pub fn new(module_size: u32) -> Self {
        Self { module_size }
    }
}

impl Default for QrRenderer {
    fn default() -> Self {
        Self::new(10)
    }
}

impl Renderer for QrRenderer {
    fn render(&self, text: &str) -> Result<Vec<u8>, RenderError> {
        let code = QrCode::new(text.as_bytes()).map_err(|e| RenderError::Encode(e.to_string()))?;

        let image = code
            .render::<Luma<u8>>()
            .module_dimensions(self.module_size, self.module_size)
            .quiet_zone(true)
            .build();

        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| RenderError::Image(e.to_string()))?;
        Ok(png)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn renders_png() {
        let png = QrRenderer::default().render("Hello World").unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn oversized_input_fails() {
        let err = QrRenderer::default().render(&"x".repeat(8000)).unwrap_err();
        assert!(matches!(err, RenderError::Encode(_)));
    }
}
