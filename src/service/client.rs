/// Image-processing service client
///
/// One method per tool. Each sends exactly one request and turns the
/// response into either a result or a `ProcessError`.

use chrono::Local;
use serde_json::Value;

use super::transport::{RawResponse, Transport};
use super::ProcessError;
use crate::config::Config;
use crate::state::{CircumferenceResult, EnhancementResult, Measurement, ResultImage, SelectedImage};

pub const CIRCUMFERENCE_PATH: &str = "/api/calculate-circumference";
pub const ENHANCEMENT_PATH: &str = "/api/enhance-image";

#[derive(Debug, Clone)]
pub struct ImageService<T> {
    transport: T,
    base_url: String,
    pixel_size_mm: f64,
}

impl<T: Transport> ImageService<T> {
    pub fn new(transport: T, config: &Config) -> Self {
        Self {
            transport,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            pixel_size_mm: config.pixel_size_mm,
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Upload to the circumference endpoint and convert the result to millimetres
    pub async fn calculate_circumference(
        &self,
        image: SelectedImage,
    ) -> Result<CircumferenceResult, ProcessError> {
        let raw = self
            .transport
            .send(self.endpoint(CIRCUMFERENCE_PATH), image)
            .await?;
        let body = successful_json(raw)?;
        parse_circumference(&body, self.pixel_size_mm)
    }

    pub async fn enhance_image(&self, image: SelectedImage) -> Result<EnhancementResult, ProcessError> {
        let raw = self
            .transport
            .send(self.endpoint(ENHANCEMENT_PATH), image)
            .await?;
        let body = successful_json(raw)?;
        parse_enhancement(&body)
    }
}

/// Reject non-2xx statuses with their body text, then parse JSON
fn successful_json(raw: RawResponse) -> Result<Value, ProcessError> {
    if !raw.is_success() {
        log::warn!("Service returned status {}", raw.status);
        return Err(ProcessError::Server(raw.body));
    }
    serde_json::from_str(&raw.body).map_err(|e| ProcessError::Parse(e.to_string()))
}

fn parse_circumference(body: &Value, pixel_size_mm: f64) -> Result<CircumferenceResult, ProcessError> {
    let pixels = body
        .get("circumference")
        .and_then(Value::as_f64)
        .ok_or_else(|| ProcessError::MissingData("No circumference data received".to_string()))?;

    let mask = body
        .get("maskImage")
        .and_then(Value::as_str)
        .ok_or_else(|| ProcessError::MissingData("No mask image received".to_string()))?;
    let mask = ResultImage::from_base64(mask)?;

    let measurement = Measurement::new(pixels, pixel_size_mm);
    log::info!("📏 Circumference: {:.2} px -> {}", pixels, measurement);

    Ok(CircumferenceResult {
        measurement,
        pixel_value: body.get("pixelValue").and_then(Value::as_f64),
        mask,
        received_at: Local::now(),
    })
}

fn parse_enhancement(body: &Value) -> Result<EnhancementResult, ProcessError> {
    let enhanced = body
        .get("enhancedImage")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ProcessError::MissingData("No enhanced image received".to_string()))?;
    let enhanced = ResultImage::from_base64(enhanced)?;

    log::info!("✨ Enhanced image: {}x{}", enhanced.width, enhanced.height);

    Ok(EnhancementResult {
        enhanced,
        received_at: Local::now(),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::state::data::tests::png_base64;
    use crate::state::Session;
    use serde_json::json;
    use std::future::Future;
    use std::sync::{Arc, Mutex};

    /// Records every request and answers with a canned response
    #[derive(Clone)]
    pub(crate) struct FakeTransport {
        pub(crate) answer: Result<RawResponse, ProcessError>,
        pub(crate) sent: Arc<Mutex<Vec<(String, SelectedImage)>>>,
    }

    impl FakeTransport {
        pub(crate) fn replying(status: u16, body: impl Into<String>) -> Self {
            Self {
                answer: Ok(RawResponse {
                    status,
                    body: body.into(),
                }),
                sent: Arc::default(),
            }
        }

        pub(crate) fn failing(message: &str) -> Self {
            Self {
                answer: Err(ProcessError::Transport(message.to_string())),
                sent: Arc::default(),
            }
        }
    }

    impl Transport for FakeTransport {
        fn send(
            &self,
            url: String,
            image: SelectedImage,
        ) -> impl Future<Output = Result<RawResponse, ProcessError>> + Send {
            self.sent.lock().unwrap().push((url, image));
            let answer = self.answer.clone();
            async move { answer }
        }
    }

    fn config() -> Config {
        Config {
            base_url: "http://scanner.local:5000/".to_string(),
            pixel_size_mm: 1.2,
            request_timeout_secs: None,
        }
    }

    fn image() -> SelectedImage {
        SelectedImage::new("head.png", "image/png", vec![1, 2, 3])
    }

    #[tokio::test]
    async fn test_circumference_success() {
        let body = json!({
            "circumference": 100,
            "maskImage": png_base64(8, 8),
            "pixelValue": 42,
        });
        let transport = FakeTransport::replying(200, body.to_string());
        let service = ImageService::new(transport.clone(), &config());

        let result = service.calculate_circumference(image()).await.unwrap();

        assert_eq!(result.measurement.to_string(), "120.00 mm");
        assert_eq!(result.pixel_value, Some(42.0));
        assert_eq!((result.mask.width, result.mask.height), (8, 8));

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "http://scanner.local:5000/api/calculate-circumference");
        assert_eq!(sent[0].1.file_name, "head.png");
    }

    #[tokio::test]
    async fn test_circumference_missing_field() {
        let service = ImageService::new(FakeTransport::replying(200, "{}"), &config());
        let err = service.calculate_circumference(image()).await.unwrap_err();
        assert_eq!(err, ProcessError::MissingData("No circumference data received".into()));
    }

    #[tokio::test]
    async fn test_non_numeric_circumference_is_missing() {
        for circumference in [json!("100"), Value::Null] {
            let body = json!({ "circumference": circumference, "maskImage": png_base64(1, 1) });
            let service = ImageService::new(FakeTransport::replying(200, body.to_string()), &config());
            let err = service.calculate_circumference(image()).await.unwrap_err();
            assert_eq!(err, ProcessError::MissingData("No circumference data received".into()));
        }
    }

    #[tokio::test]
    async fn test_non_numeric_pixel_value_is_dropped() {
        let body = json!({ "circumference": 5, "maskImage": png_base64(1, 1), "pixelValue": "x" });
        let service = ImageService::new(FakeTransport::replying(200, body.to_string()), &config());
        let result = service.calculate_circumference(image()).await.unwrap();
        assert_eq!(result.pixel_value, None);
        assert_eq!(result.measurement.to_string(), "6.00 mm");
    }

    #[tokio::test]
    async fn test_circumference_missing_mask() {
        let body = json!({ "circumference": 10.5 });
        let service = ImageService::new(FakeTransport::replying(200, body.to_string()), &config());
        let err = service.calculate_circumference(image()).await.unwrap_err();
        assert!(matches!(err, ProcessError::MissingData(_)));
    }

    #[tokio::test]
    async fn test_pixel_value_is_optional_passthrough() {
        let body = json!({ "circumference": 1, "maskImage": png_base64(1, 1) });
        let service = ImageService::new(FakeTransport::replying(200, body.to_string()), &config());
        let result = service.calculate_circumference(image()).await.unwrap();
        assert_eq!(result.pixel_value, None);
    }

    #[tokio::test]
    async fn test_server_error_carries_body() {
        let service = ImageService::new(FakeTransport::replying(500, "bad input"), &config());
        let err = service.enhance_image(image()).await.unwrap_err();
        assert_eq!(err, ProcessError::Server("bad input".into()));
        assert_eq!(err.to_string(), "Server error: bad input");
    }

    #[tokio::test]
    async fn test_invalid_json_is_parse_error() {
        let service = ImageService::new(FakeTransport::replying(200, "<html>oops</html>"), &config());
        let err = service.enhance_image(image()).await.unwrap_err();
        assert!(matches!(err, ProcessError::Parse(_)));
    }

    #[tokio::test]
    async fn test_enhancement_success_and_endpoint() {
        let body = json!({ "enhancedImage": png_base64(3, 2) });
        let transport = FakeTransport::replying(200, body.to_string());
        let service = ImageService::new(transport.clone(), &config());

        let result = service.enhance_image(image()).await.unwrap();
        assert_eq!((result.enhanced.width, result.enhanced.height), (3, 2));

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "http://scanner.local:5000/api/enhance-image");
    }

    #[tokio::test]
    async fn test_enhancement_empty_image_is_missing() {
        let body = json!({ "enhancedImage": "" });
        let service = ImageService::new(FakeTransport::replying(200, body.to_string()), &config());
        let err = service.enhance_image(image()).await.unwrap_err();
        assert_eq!(err, ProcessError::MissingData("No enhanced image received".into()));
    }

    #[tokio::test]
    async fn test_session_ends_not_processing_on_every_outcome() {
        let success = json!({ "circumference": 2, "maskImage": png_base64(1, 1) }).to_string();
        let transports = [
            FakeTransport::replying(200, success),
            FakeTransport::replying(503, "unavailable"),
            FakeTransport::failing("connection refused"),
        ];

        for transport in transports {
            let service = ImageService::new(transport.clone(), &config());
            let mut session = Session::new();
            session.select_image(image());

            let ticket = session.process().unwrap();
            assert!(session.is_processing());
            let outcome = service.calculate_circumference(ticket.image).await;
            assert!(session.complete(ticket.token, outcome));

            assert!(!session.is_processing());
            assert_eq!(transport.sent.lock().unwrap().len(), 1);
        }
    }

    #[tokio::test]
    async fn test_server_error_reaches_session_message() {
        let service = ImageService::new(FakeTransport::replying(400, "bad input"), &config());
        let mut session = Session::new();
        session.select_image(image());

        let ticket = session.process().unwrap();
        let outcome = service.calculate_circumference(ticket.image).await;
        session.complete(ticket.token, outcome);

        assert!(session.error().unwrap().contains("bad input"));
        assert!(session.result().is_none());
    }
}
