//! quill - document session core
//!
//! Modules:
//! - kernel: headless session (documents, actions, effects, store, services)
//! - models: data models (FileTree, TextBuffer)
//! - app: session runner (effects, reply bus, debounces)

pub mod app;
pub mod kernel;
pub mod models;
