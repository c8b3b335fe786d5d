mod canvas;
mod layout;
mod renderer;

pub(crate) use canvas::{Canvas, PixelRect};
pub use layout::Viewport;
pub use renderer::Renderer;
