/// Remote image-processing service
///
/// - `transport.rs` - multipart upload over HTTP
/// - `client.rs` - per-tool endpoints and response interpretation
/// - `error.rs` - the failure taxonomy shown to the user

pub mod client;
pub mod error;
pub mod transport;

pub use client::ImageService;
pub use error::ProcessError;
pub use transport::ReqwestTransport;
