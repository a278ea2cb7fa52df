/// Upload/process/display session for a single tool
///
/// A session tracks the selected image and exactly one of:
/// nothing yet, a pending request, a result, or an error.
/// Every request gets a token; only the response carrying the
/// latest token is ever applied.

use super::data::SelectedImage;
use crate::service::ProcessError;

/// Prefix of every error shown to the user
const ERROR_PREFIX: &str = "An error occurred while processing the image";

/// Identifies one `process()` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

/// Everything the caller needs to send a request
#[derive(Debug, Clone)]
pub struct Ticket {
    pub token: RequestToken,
    pub image: SelectedImage,
}

/// Where the session currently is
#[derive(Debug, Clone)]
pub enum Phase<R> {
    /// No image selected
    Empty,
    /// Image selected, nothing sent yet
    Ready,
    /// Request in flight
    Pending(RequestToken),
    /// Last request succeeded
    Done(R),
    /// Last request failed, with the message shown to the user
    Failed(String),
}

#[derive(Debug)]
pub struct Session<R> {
    image: Option<SelectedImage>,
    phase: Phase<R>,
    last_token: u64,
}

impl<R> Default for Session<R> {
    fn default() -> Self {
        Self {
            image: None,
            phase: Phase::Empty,
            last_token: 0,
        }
    }
}

impl<R> Session<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selected image, dropping any result, error or pending request
    pub fn select_image(&mut self, image: SelectedImage) {
        if let Phase::Pending(token) = self.phase {
            log::info!("Selection changed, abandoning request {:?}", token);
        }
        self.image = Some(image);
        self.phase = Phase::Ready;
    }

    /// Start a request for the selected image.
    ///
    /// Returns `None` when there is no image or a request is already pending.
    pub fn process(&mut self) -> Option<Ticket> {
        if !self.can_process() {
            return None;
        }
        let image = self.image.clone()?;

        self.last_token += 1;
        let token = RequestToken(self.last_token);
        self.phase = Phase::Pending(token);

        Some(Ticket { token, image })
    }

    /// Apply the outcome of the request identified by `token`.
    ///
    /// Returns `false` if the outcome was stale and discarded.
    pub fn complete(&mut self, token: RequestToken, outcome: Result<R, ProcessError>) -> bool {
        match self.phase {
            Phase::Pending(current) if current == token => {}
            _ => {
                log::debug!("Discarding stale response for {:?}", token);
                return false;
            }
        }

        self.phase = match outcome {
            Ok(result) => Phase::Done(result),
            Err(err) => {
                log::error!("Request {:?} failed: {}", token, err);
                Phase::Failed(format!("{}: {}", ERROR_PREFIX, err))
            }
        };
        true
    }

    /// Clear everything. Any pending response will be discarded on arrival.
    pub fn reset(&mut self) {
        self.image = None;
        self.phase = Phase::Empty;
    }

    pub fn phase(&self) -> &Phase<R> {
        &self.phase
    }

    pub fn selected(&self) -> Option<&SelectedImage> {
        self.image.as_ref()
    }

    pub fn result(&self) -> Option<&R> {
        match &self.phase {
            Phase::Done(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_processing(&self) -> bool {
        matches!(self.phase, Phase::Pending(_))
    }

    /// Whether the trigger control should be enabled
    pub fn can_process(&self) -> bool {
        self.image.is_some() && !self.is_processing()
    }

    /// Whether the reset control should be enabled
    pub fn can_reset(&self) -> bool {
        self.image.is_some() || matches!(self.phase, Phase::Done(_) | Phase::Failed(_))
    }
}
