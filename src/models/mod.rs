pub mod common;
pub mod image;
pub mod presets;

pub use common::*;
pub use image::*;
pub use presets::*;
