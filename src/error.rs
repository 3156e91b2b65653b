use thiserror::Error;

/// Fatal pre-scan failures. These are the only errors a caller ever sees:
/// per-port probe failures are folded into the result set as closed ports,
/// banner failures into an empty banner, and cancellation into a partial
/// result marked incomplete.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("could not resolve target '{target}': {reason}")]
    Resolution { target: String, reason: String },

    #[error("invalid port specification '{spec}': {reason}")]
    InvalidRange { spec: String, reason: String },
}
