//! Media errors.

/// Errors from media device acquisition and frame access.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// Device/permission failure. Fatal to session start; requires the
    /// user to re-grant permission and re-invoke — never retried
    /// automatically.
    #[error("media acquisition failed: {0}")]
    Acquisition(String),

    /// Device disappeared or errored after acquisition.
    #[error("media device error: {0}")]
    Device(String),
}
