/// View helpers for the editor window
///
/// - `panel.rs` - settings panel (one labeled slider per filter) and actions
/// - `histogram.rs` - RGB histogram canvas under the preview

pub mod histogram;
pub mod panel;
