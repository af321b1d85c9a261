#![forbid(unsafe_code)]

pub mod error;
pub mod session_controller;

pub use error::RestoreError;
pub use session_controller::SessionController;
