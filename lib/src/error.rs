use thiserror::Error;

/// The reason an input cloud was rejected before any triangle was emitted.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum InvalidInputKind {
    /// Fewer than three samples were supplied.
    #[error("need at least 3 samples, got {found}")]
    TooFewSamples {
        /// The number of samples actually supplied.
        found: usize,
    },
    /// The ball radius was zero or negative.
    #[error("ball radius must be positive, got {radius}")]
    NonPositiveRadius {
        /// The offending radius.
        radius: f32,
    },
    /// A sample's position or normal contained a NaN or infinity.
    #[error("sample {index} has a non-finite position or normal")]
    NonFiniteSample {
        /// The index of the offending sample.
        index: usize,
    },
    /// A sample's normal had (near) zero length.
    #[error("sample {index} has a zero-length normal")]
    ZeroLengthNormal {
        /// The index of the offending sample.
        index: usize,
    },
}

/// Fatal errors reported before reconstruction begins.
///
/// Per-candidate geometric failures (collinearity, ball-too-small,
/// non-empty ball, wrong orientation) are never reported this way: they are
/// recovered locally as skips, per the algorithm's failure semantics.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ReconstructionError {
    /// The input cloud or radius was malformed.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputKind),
}
