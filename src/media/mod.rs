/// Image I/O module
///
/// This module handles:
/// - Decoding the picked file off the UI thread
/// - Building the display-sized working preview
/// - Rendering, encoding and writing the filtered export

pub mod export;
pub mod loader;
pub mod preview;
