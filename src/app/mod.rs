//! Application layer: runs the kernel against real collaborators.

pub mod session;

pub use session::Session;
