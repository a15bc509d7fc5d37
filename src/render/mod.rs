/// Filter rendering module
///
/// Architecture:
/// - `parse.rs` - composed filter string -> typed filter operations
/// - `pipeline.rs` - applies operations to an RGBA bitmap
///
/// The preview and the export both go through `pipeline::render`, so what
/// the user sees is what gets written.

pub mod parse;
pub mod pipeline;

pub use pipeline::render;
