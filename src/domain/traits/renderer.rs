use crate::application::errors::RenderError;

/// Turns user-supplied text into image bytes
pub trait Renderer: Send + Sync {
    fn render(&self, text: &str) -> Result<Vec<u8>, RenderError>;
}
