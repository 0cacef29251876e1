//! Error types for frame buffer operations.

use thiserror::Error;

/// Main error type for layout, allocation and bridging failures.
///
/// Caller contract breaches (copying between mismatched frames, writing to a
/// shared frame, misaligned crops) are not represented here; they panic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    #[error("Allocation failure: {0}")]
    AllocationFailure(String),

    #[error("Alignment infeasible: need {needed} bytes of padding, only {available} spare")]
    AlignmentInfeasible { needed: usize, available: usize },

    #[error("Bridge format unsupported: {0}")]
    BridgeFormatUnsupported(String),
}

/// Result type alias for frame operations.
pub type Result<T> = std::result::Result<T, FrameError>;
