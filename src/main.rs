use iced::task;
use iced::widget::{button, column, container, row, scrollable, text};
use iced::{Element, Length, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;

mod config;
mod media;
mod service;
mod state;
mod ui;

use config::Config;
use service::{ImageService, ProcessError, ReqwestTransport};
use state::{
    CircumferenceResult, EnhancementResult, ProcessedOutput, RequestToken, SelectedImage, Session,
};

/// The two tools, one tab each
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Circumference,
    Enhancement,
}

impl ToolKind {
    const ALL: [ToolKind; 2] = [ToolKind::Circumference, ToolKind::Enhancement];

    fn title(self) -> &'static str {
        match self {
            ToolKind::Circumference => "Head Circumference",
            ToolKind::Enhancement => "Image Enhancement",
        }
    }

    /// File name prefix for exported results
    fn export_prefix(self) -> &'static str {
        match self {
            ToolKind::Circumference => "mask",
            ToolKind::Enhancement => "enhanced",
        }
    }
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User switched tabs
    TabSelected(ToolKind),
    /// User clicked "Upload Image"
    PickImage(ToolKind),
    /// Background file read finished
    ImageLoaded(ToolKind, Result<SelectedImage, ProcessError>),
    /// User clicked the trigger button
    Process(ToolKind),
    CircumferenceComplete(RequestToken, Result<CircumferenceResult, ProcessError>),
    EnhancementComplete(RequestToken, Result<EnhancementResult, ProcessError>),
    Reset(ToolKind),
    /// User asked to save the result image
    Export(ToolKind),
    ExportComplete(Result<PathBuf, ProcessError>),
    /// User asked for the result as a `data:` URI on the clipboard
    CopyDataUri(ToolKind),
}

/// Main application state
struct UltrasoundStudio {
    service: ImageService<ReqwestTransport>,
    active: ToolKind,
    circumference: Session<CircumferenceResult>,
    enhancement: Session<EnhancementResult>,
    /// Abort handles for in-flight requests, one per tool
    circumference_task: Option<task::Handle>,
    enhancement_task: Option<task::Handle>,
    /// Status line for file and export operations
    status: String,
}

impl UltrasoundStudio {
    fn new(service: ImageService<ReqwestTransport>) -> (Self, Task<Message>) {
        let status = format!("Ready. Service at {}", service.endpoint(""));
        (
            UltrasoundStudio {
                service,
                active: ToolKind::Circumference,
                circumference: Session::new(),
                enhancement: Session::new(),
                circumference_task: None,
                enhancement_task: None,
                status,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::TabSelected(kind) => {
                self.active = kind;
                Task::none()
            }
            Message::PickImage(kind) => {
                let file = FileDialog::new()
                    .set_title("Select Ultrasound Image")
                    .add_filter("Images", &media::IMAGE_EXTENSIONS)
                    .pick_file();

                match file {
                    Some(path) => {
                        self.status = format!("Loading {}...", path.display());
                        Task::perform(media::load_image(path), move |result| {
                            Message::ImageLoaded(kind, result)
                        })
                    }
                    None => Task::none(),
                }
            }
            Message::ImageLoaded(kind, Ok(image)) => {
                self.status = format!("Loaded {}", image.file_name);
                self.abort_in_flight(kind);
                match kind {
                    ToolKind::Circumference => self.circumference.select_image(image),
                    ToolKind::Enhancement => self.enhancement.select_image(image),
                }
                Task::none()
            }
            Message::ImageLoaded(_, Err(err)) => {
                log::warn!("Could not load image: {}", err);
                self.status = format!("⚠️  {}", err);
                Task::none()
            }
            Message::Process(kind) => self.start_processing(kind),
            Message::CircumferenceComplete(token, outcome) => {
                if self.circumference.complete(token, outcome) {
                    self.circumference_task = None;
                }
                Task::none()
            }
            Message::EnhancementComplete(token, outcome) => {
                if self.enhancement.complete(token, outcome) {
                    self.enhancement_task = None;
                }
                Task::none()
            }
            Message::Reset(kind) => {
                self.abort_in_flight(kind);
                match kind {
                    ToolKind::Circumference => self.circumference.reset(),
                    ToolKind::Enhancement => self.enhancement.reset(),
                }
                Task::none()
            }
            Message::Export(kind) => self.export_result(kind),
            Message::ExportComplete(Ok(path)) => {
                self.status = format!("✅ Saved {}", path.display());
                Task::none()
            }
            Message::ExportComplete(Err(err)) => {
                log::error!("Export failed: {}", err);
                self.status = format!("⚠️  Export failed: {}", err);
                Task::none()
            }
            Message::CopyDataUri(kind) => match self.result_data_uri(kind) {
                Some(uri) => {
                    log::info!("📋 Copied {} result ({} chars)", kind.title(), uri.len());
                    self.status = "📋 Result copied to clipboard".to_string();
                    iced::clipboard::write(uri)
                }
                None => Task::none(),
            },
        }
    }

    /// Issue the request for `kind`, keeping its abort handle
    fn start_processing(&mut self, kind: ToolKind) -> Task<Message> {
        let service = self.service.clone();
        match kind {
            ToolKind::Circumference => {
                let Some(ticket) = self.circumference.process() else {
                    return Task::none();
                };
                let token = ticket.token;
                let (task, handle) = Task::perform(
                    async move { service.calculate_circumference(ticket.image).await },
                    move |outcome| Message::CircumferenceComplete(token, outcome),
                )
                .abortable();
                self.circumference_task = Some(handle);
                task
            }
            ToolKind::Enhancement => {
                let Some(ticket) = self.enhancement.process() else {
                    return Task::none();
                };
                let token = ticket.token;
                let (task, handle) = Task::perform(
                    async move { service.enhance_image(ticket.image).await },
                    move |outcome| Message::EnhancementComplete(token, outcome),
                )
                .abortable();
                self.enhancement_task = Some(handle);
                task
            }
        }
    }

    /// Stop caring about the request in flight for `kind`, if any
    fn abort_in_flight(&mut self, kind: ToolKind) {
        let slot = match kind {
            ToolKind::Circumference => &mut self.circumference_task,
            ToolKind::Enhancement => &mut self.enhancement_task,
        };
        if let Some(handle) = slot.take() {
            log::info!("Aborting in-flight {} request", kind.title());
            handle.abort();
        }
    }

    fn result_data_uri(&self, kind: ToolKind) -> Option<String> {
        match kind {
            ToolKind::Circumference => self.circumference.result().map(|r| r.output_image().data_uri()),
            ToolKind::Enhancement => self.enhancement.result().map(|r| r.output_image().data_uri()),
        }
    }

    fn export_result(&mut self, kind: ToolKind) -> Task<Message> {
        let output = match kind {
            ToolKind::Circumference => self
                .circumference
                .result()
                .map(|r| (r.output_image().clone(), r.received_at())),
            ToolKind::Enhancement => self
                .enhancement
                .result()
                .map(|r| (r.output_image().clone(), r.received_at())),
        };
        let Some((image, received_at)) = output else {
            return Task::none();
        };

        let destination = FileDialog::new()
            .set_title("Export Result Image")
            .set_file_name(media::default_export_name(kind.export_prefix(), received_at))
            .add_filter("PNG image", &["png"])
            .save_file();

        match destination {
            Some(path) => Task::perform(media::export_png(image, path), Message::ExportComplete),
            None => Task::none(),
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let tabs = ToolKind::ALL.iter().fold(row![].spacing(10), |tabs, &kind| {
            let tab = button(text(kind.title())).padding(10);
            let tab = if kind == self.active {
                tab.style(button::primary)
            } else {
                tab.style(button::secondary)
                    .on_press(Message::TabSelected(kind))
            };
            tabs.push(tab)
        });

        let panel = match self.active {
            ToolKind::Circumference => ui::tool_view::circumference_panel(&self.circumference),
            ToolKind::Enhancement => ui::tool_view::enhancement_panel(&self.enhancement),
        };

        let content = column![
            text("Ultrasound Studio").size(32),
            tabs,
            scrollable(panel).height(Length::Fill),
            text(self.status.as_str()).size(14),
        ]
        .spacing(20)
        .padding(30);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load().unwrap_or_else(|err| {
        log::error!("{}; using default configuration", err);
        Config::default()
    });
    log::info!(
        "🩺 Ultrasound Studio starting (service {}, {} mm/px)",
        config.base_url,
        config.pixel_size_mm
    );

    let transport = ReqwestTransport::new(config.request_timeout())?;
    let service = ImageService::new(transport, &config);

    iced::application("Ultrasound Studio", UltrasoundStudio::update, UltrasoundStudio::view)
        .theme(UltrasoundStudio::theme)
        .centered()
        .run_with(move || UltrasoundStudio::new(service))?;

    Ok(())
}
