mod bsp;
mod renderer;
mod segment;

pub use bsp::render_bsp;
pub use renderer::Renderer;
pub use segment::Segment;
