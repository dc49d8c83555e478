//! Output type of the conversion pipeline.
//!
//! [`IndexedImage`] is the single artifact handed to a container writer:
//! one index byte per pixel, a 256-entry [`Palette`](crate::palette::Palette),
//! the dimensions and the gradient-decal mode flag.

mod indexed_image;

pub use indexed_image::IndexedImage;
