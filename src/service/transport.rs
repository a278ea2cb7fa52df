/// Outbound HTTP for the image-processing service
///
/// The `Transport` trait is the only place that touches the network.
/// `ReqwestTransport` posts the image as multipart form data; tests
/// swap in a fake that records what would have been sent.

use std::future::Future;
use std::time::Duration;

use reqwest::multipart::{Form, Part};

use super::ProcessError;
use crate::state::SelectedImage;

/// Multipart field the service reads the upload from
pub const IMAGE_FIELD: &str = "image";

/// Status and body of a response, before any interpretation
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait Transport: Clone + Send + Sync + 'static {
    /// POST `image` to `url`. Only transport-level failures are errors;
    /// any HTTP status comes back as a `RawResponse`.
    fn send(
        &self,
        url: String,
        image: SelectedImage,
    ) -> impl Future<Output = Result<RawResponse, ProcessError>> + Send;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// `timeout` of `None` waits for the network layer indefinitely
    pub fn new(timeout: Option<Duration>) -> Result<Self, ProcessError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("ultrasound-studio/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ProcessError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn send(
        &self,
        url: String,
        image: SelectedImage,
    ) -> impl Future<Output = Result<RawResponse, ProcessError>> + Send {
        let client = self.client.clone();
        async move {
            let part = Part::bytes(image.bytes.to_vec())
                .file_name(image.file_name.clone())
                .mime_str(&image.mime_type)
                .map_err(|e| ProcessError::Transport(e.to_string()))?;
            let form = Form::new().part(IMAGE_FIELD, part);

            log::info!("⬆️  POST {} ({}, {} bytes)", url, image.file_name, image.len());

            let response = client
                .post(&url)
                .multipart(form)
                .send()
                .await
                .map_err(|e| ProcessError::Transport(e.to_string()))?;

            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| ProcessError::Transport(e.to_string()))?;

            log::info!("⬇️  {} answered {} ({} bytes)", url, status, body.len());
            Ok(RawResponse { status, body })
        }
    }
}
