// This file is part of latgauss.
// Copyright (c) 2026 The latgauss authors. All rights reserved.
// Licensed under the MIT license or the Apache License, Version 2.0, at your
// option. See LICENSE-MIT and LICENSE-APACHE in the project root.

//! Error types shared by all three sampler tiers.

use thiserror::Error;

/// Failure modes for construction and sampling.
///
/// Most of these are recoverable: the sampler that returned the error
/// remains valid and can be retried with in-range parameters. The one
/// exception is a CSPRNG failure, which is never returned from a public
/// function: see [`crate::uniform::UniformSource`] for why.
#[derive(Debug, Error)]
pub enum DgsError {
    /// The CSPRNG refill failed. Continuing would silently bias the
    /// output, so this variant is only ever used to format a panic
    /// message; it is not returned from any public function.
    #[error("csprng refill failed: {0}")]
    CsprngFailure(String),

    /// `ConvolutionSampler::sample` was asked for a sigma outside
    /// `[sigBar, s[L]]`.
    #[error("sigma {sigma} is out of range [{sig_bar}, {s_max}]")]
    SigmaOutOfRange {
        sigma: f64,
        sig_bar: f64,
        s_max: f64,
    },

    /// `ConvolutionSampler::new` was asked to build a ladder whose base
    /// level `s0` does not clear the smoothing parameter `sqrt(2) * eta`.
    #[error("base level {s0} does not meet the smoothing parameter (sqrt(2) * {eta})")]
    SmoothingNotMet { s0: f64, eta: f64 },

    /// Diagnostic only: a `BaseCdtSampler`'s 6-sigma tail cut omitted more
    /// than `2^-64` of the total probability mass. Never returned as a
    /// hard error, constructed only to format the warning logged by
    /// `BaseCdtSampler::new`.
    #[error("tail cut for sigma={sigma} omits {tail_mass:e} of total mass")]
    PrecisionLoss { sigma: f64, tail_mass: f64 },
}
