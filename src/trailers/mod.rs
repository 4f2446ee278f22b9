//! Trailer resolution and source labelling.

mod resolver;
mod source;

pub use resolver::{has_trailer, resolve};
pub use source::{source_label, EXTERNAL_LABEL, LOCAL_FILE_LABEL};
