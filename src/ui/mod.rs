/// UI building blocks
///
/// - `tool_view.rs` - the circumference and enhancement panels

pub mod tool_view;
