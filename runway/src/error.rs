//! Viewport error types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewportError {
    #[error("viewport has not been started; call start() with a surface first")]
    NotStarted,

    #[error("viewport is already bound to a surface; reset() it before starting again")]
    AlreadyStarted,
}
