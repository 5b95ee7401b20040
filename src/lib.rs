// This file is part of latgauss.
// Copyright (c) 2026 The latgauss authors. All rights reserved.
// Licensed under the MIT license or the Apache License, Version 2.0, at your
// option. See LICENSE-MIT and LICENSE-APACHE in the project root.

//! Discrete Gaussian samplers over the integers.
//!
//! Three sampler tiers, stacked:
//!
//! - [`BaseCdtSampler`]: fixed `(center, sigma)`, via a reverse
//!   cumulative-distribution table and one binary search per sample.
//! - [`VarCenterSampler`]: fixed sigma, arbitrary real center, built on a
//!   family of `2^B` `BaseCdtSampler`s.
//! - [`ConvolutionSampler`]: arbitrary sigma up to a construction-time
//!   maximum, built by convolving samples from a narrow base Gaussian.
//!
//! All three use the `exp(-pi * (x - c)^2 / sigma^2)` density convention,
//! so a sampler's realized standard deviation is `sigma / sqrt(2 * pi)`,
//! not `sigma`: see [`base`] for why.

pub mod base;
pub mod convolution;
pub mod error;
pub mod uniform;
pub mod var_center;

pub use self::base::BaseCdtSampler;
pub use self::convolution::ConvolutionSampler;
pub use self::error::DgsError;
pub use self::var_center::VarCenterSampler;
