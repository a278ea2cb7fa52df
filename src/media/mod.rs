/// Local image files
///
/// This module handles:
/// - Reading the picked input image (loader.rs)
/// - Writing result images back to disk (export.rs)

pub mod export;
pub mod loader;

pub use export::{default_export_name, export_png};
pub use loader::{load_image, IMAGE_EXTENSIONS};
