pub mod image;
pub mod metadata;

pub use image::*;
pub use metadata::*;
