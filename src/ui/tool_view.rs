/// Panels for the two tools
///
/// Both tools share the same layout: original image on the left,
/// service output on the right, controls and measurement underneath.
use iced::alignment::Horizontal;
use iced::widget::{button, column, container, image, row, text, Column};
use iced::{Alignment, Color, ContentFit, Element, Length};

use crate::state::{
    CircumferenceResult, EnhancementResult, Phase, ProcessedOutput, SelectedImage, Session,
};
use crate::{Message, ToolKind};

const IMAGE_HEIGHT: f32 = 300.0;
const ERROR_COLOR: Color = Color { r: 0.9, g: 0.35, b: 0.35, a: 1.0 };
const MUTED_COLOR: Color = Color { r: 0.6, g: 0.6, b: 0.6, a: 1.0 };

pub fn circumference_panel(session: &Session<CircumferenceResult>) -> Element<'_, Message> {
    let kind = ToolKind::Circumference;

    let mask = session.result().map(|r| r.output_image().handle());
    let placeholder = if session.is_processing() {
        "Generating mask..."
    } else {
        "No mask generated yet"
    };

    let measurement: Element<'_, Message> = match session.phase() {
        Phase::Done(result) => {
            let mut lines = column![
                text(format!("Head Circumference: {}", result.measurement)).size(28),
                text(format!(
                    "{:.2} px × {} mm/px",
                    result.measurement.pixels, result.measurement.pixel_size_mm
                ))
                .color(MUTED_COLOR),
            ]
            .spacing(6)
            .align_x(Alignment::Center);
            if let Some(pixel_value) = result.pixel_value {
                lines = lines.push(text(format!("Pixel value: {}", pixel_value)).color(MUTED_COLOR));
            }
            lines
                .push(processed_at(result))
                .into()
        }
        Phase::Pending(_) => text("Calculating...").into(),
        _ => text("No circumference calculated yet").color(MUTED_COLOR).into(),
    };

    column![
        row![
            original_card(kind, session.selected()),
            output_card("Mask Image", mask, placeholder),
        ]
        .spacing(20),
        card(
            "Head Circumference",
            column![
                container(measurement).center_x(Length::Fill),
                controls(kind, session, "Calculate Circumference", "Calculating..."),
                error_line(session.error()),
            ]
            .spacing(16),
        ),
    ]
    .spacing(20)
    .into()
}

pub fn enhancement_panel(session: &Session<EnhancementResult>) -> Element<'_, Message> {
    let kind = ToolKind::Enhancement;

    let enhanced = session.result().map(|r| r.output_image().handle());
    let placeholder = if session.is_processing() {
        "Enhancing image..."
    } else {
        "No enhanced image yet"
    };

    let details: Element<'_, Message> = match session.phase() {
        Phase::Done(result) => column![
            text(format!(
                "Enhanced image: {} × {}",
                result.enhanced.width, result.enhanced.height
            )),
            processed_at(result),
        ]
        .spacing(6)
        .align_x(Alignment::Center)
        .into(),
        _ => text("").into(),
    };

    column![
        row![
            original_card(kind, session.selected()),
            output_card("Enhanced Image", enhanced, placeholder),
        ]
        .spacing(20),
        card(
            "Enhance Image Quality",
            column![
                container(details).center_x(Length::Fill),
                controls(kind, session, "Enhance Image", "Enhancing..."),
                error_line(session.error()),
            ]
            .spacing(16),
        ),
    ]
    .spacing(20)
    .into()
}

fn processed_at<'a, R: ProcessedOutput>(result: &R) -> Element<'a, Message> {
    text(format!("Processed at {}", result.received_at().format("%H:%M:%S")))
        .size(12)
        .color(MUTED_COLOR)
        .into()
}

fn original_card(kind: ToolKind, selected: Option<&SelectedImage>) -> Element<'_, Message> {
    let preview: Element<'_, Message> = match selected {
        Some(image) => column![
            image_box(image.preview.clone()),
            text(image.file_name.as_str()).size(12).color(MUTED_COLOR),
        ]
        .spacing(6)
        .align_x(Alignment::Center)
        .into(),
        None => placeholder_box("No image uploaded"),
    };

    card(
        "Original Image",
        column![
            preview,
            button(text("Upload Image").width(Length::Fill).align_x(Horizontal::Center))
                .on_press(Message::PickImage(kind))
                .width(Length::Fill)
                .padding(10),
        ]
        .spacing(16),
    )
}

fn output_card<'a>(
    title: &'a str,
    handle: Option<image::Handle>,
    placeholder: &'a str,
) -> Element<'a, Message> {
    let content = match handle {
        Some(handle) => image_box(handle),
        None => placeholder_box(placeholder),
    };
    card(title, column![content])
}

fn controls<'a, R>(
    kind: ToolKind,
    session: &Session<R>,
    label: &'a str,
    busy_label: &'a str,
) -> Element<'a, Message> {
    let trigger_label = if session.is_processing() { busy_label } else { label };

    let mut buttons = column![
        button(text(trigger_label).width(Length::Fill).align_x(Horizontal::Center))
            .on_press_maybe(session.can_process().then_some(Message::Process(kind)))
            .width(Length::Fill)
            .padding(10),
        button(text("Reset").width(Length::Fill).align_x(Horizontal::Center))
            .on_press_maybe(session.can_reset().then_some(Message::Reset(kind)))
            .style(button::secondary)
            .width(Length::Fill)
            .padding(10),
    ]
    .spacing(10);

    if session.result().is_some() {
        buttons = buttons.push(
            button(text("Export Result").width(Length::Fill).align_x(Horizontal::Center))
                .on_press(Message::Export(kind))
                .style(button::secondary)
                .width(Length::Fill)
                .padding(10),
        );
        buttons = buttons.push(
            button(text("Copy as Data URI").width(Length::Fill).align_x(Horizontal::Center))
                .on_press(Message::CopyDataUri(kind))
                .style(button::secondary)
                .width(Length::Fill)
                .padding(10),
        );
    }

    buttons.into()
}

fn error_line(error: Option<&str>) -> Element<'_, Message> {
    match error {
        Some(message) => container(text(message).color(ERROR_COLOR))
            .center_x(Length::Fill)
            .into(),
        None => column![].into(),
    }
}

fn image_box<'a>(handle: image::Handle) -> Element<'a, Message> {
    container(
        image(handle)
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fixed(IMAGE_HEIGHT)),
    )
    .width(Length::Fill)
    .into()
}

fn placeholder_box(label: &str) -> Element<'_, Message> {
    container(text(label).color(MUTED_COLOR))
        .width(Length::Fill)
        .height(Length::Fixed(IMAGE_HEIGHT))
        .center_x(Length::Fill)
        .center_y(Length::Fixed(IMAGE_HEIGHT))
        .style(container::bordered_box)
        .into()
}

fn card<'a>(title: &'a str, body: Column<'a, Message>) -> Element<'a, Message> {
    container(column![text(title).size(20), body].spacing(12))
        .padding(16)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
}
