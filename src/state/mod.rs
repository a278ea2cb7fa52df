/// State management module
///
/// This module handles the per-tool interaction state:
/// - Shared data structures (data.rs)
/// - The upload/process/display session and its request tokens (session.rs)

pub mod data;
pub mod session;

pub use data::{
    CircumferenceResult, EnhancementResult, Measurement, ProcessedOutput, ResultImage,
    SelectedImage,
};
pub use session::{Phase, RequestToken, Session};
