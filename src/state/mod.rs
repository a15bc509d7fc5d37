/// State management module
/// 
/// This module handles all editor state, including:
/// - Filter definitions and the active filter state (filters.rs)
/// - Shared data structures for the loaded image (data.rs)
/// - The controller that ties them to the preview and export (editor.rs)

pub mod data;
pub mod editor;
pub mod filters;
