use crate::encode::EncodeError;

/// Convenience result type used across rasterfit.
pub type RasterfitResult<T> = Result<T, RasterfitError>;

/// Coarse error classification.
///
/// Lets callers tell "bad numbers" ([`ErrorKind::Config`]) apart from "wrong call order"
/// ([`ErrorKind::Protocol`]) without matching every variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid dimensions, padding, or fit configuration.
    Config,
    /// Pipeline used in the wrong order (second resize, append after realize).
    Protocol,
    /// A surface could not be allocated or drawn at the requested size.
    Resource,
    /// Failure inside the encode boundary.
    Encode,
    /// Wrapped lower-level failure.
    Other,
}

/// Top-level error taxonomy used by rasterfit APIs.
#[derive(thiserror::Error, Debug)]
pub enum RasterfitError {
    /// Invalid user-provided configuration, detected before any geometry is computed.
    #[error("config error: {0}")]
    Config(String),

    /// A second resize was appended to a pipeline that already has one.
    #[error(
        "protocol error: multiple resize not allowed (attempt #{attempts}; a pipeline accepts one resize)"
    )]
    MultipleResizeNotAllowed {
        /// Total number of resize attempts on the pipeline, including the rejected one.
        attempts: usize,
    },

    /// The pipeline was already realized and cannot accept further calls.
    #[error("protocol error: pipeline already realized; build a new pipeline for a new composition")]
    AlreadyRealized,

    /// A surface of the requested size could not be obtained.
    #[error("resource error: cannot allocate {width}x{height} surface: {reason}")]
    Resource {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
        /// Why the allocation was refused.
        reason: String,
    },

    /// The single draw pass of a realize call failed.
    #[error("draw error: {width}x{height} draw with {ops} folded operation(s) failed: {source}")]
    Draw {
        /// Attempted output width.
        width: u32,
        /// Attempted output height.
        height: u32,
        /// Number of operations accumulated on the pipeline.
        ops: usize,
        /// Underlying failure.
        #[source]
        source: Box<RasterfitError>,
    },

    /// Failure inside the encode boundary.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RasterfitError {
    /// Build a [`RasterfitError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`RasterfitError::Resource`] value.
    pub fn resource(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::Resource {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Config,
            Self::MultipleResizeNotAllowed { .. } | Self::AlreadyRealized => ErrorKind::Protocol,
            Self::Resource { .. } | Self::Draw { .. } => ErrorKind::Resource,
            Self::Encode(_) => ErrorKind::Encode,
            Self::Other(_) => ErrorKind::Other,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
