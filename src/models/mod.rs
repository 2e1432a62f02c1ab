pub mod edit;
pub mod image;
pub mod wire;

pub use edit::*;
pub use image::*;
pub use wire::*;
