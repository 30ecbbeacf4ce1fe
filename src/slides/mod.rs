pub mod slide;
pub mod source;

pub use slide::{render_slides, Slide, SlideError, SlideRenderer};
pub use source::SourceDocument;
