//! # raster-math
//!
//! Colorimetry math for the rasterbuf crates.
//!
//! This crate is the numeric collaborator behind gamut conversion: it knows
//! nothing about pixel buffers, only about chromaticity coordinates and the
//! 3x3 linear algebra that maps one set of RGB primaries onto another through
//! CIE XYZ.
//!
//! - [`Vec3`], [`Mat3`] - fixed-size linear algebra
//! - [`Chromaticities`] - CIE xy primaries + white point of an RGB space
//! - [`rgb_to_xyz_matrix`] / [`xyz_to_rgb_matrix`] - matrix derivation
//! - [`bradford_adaptation`] - white point adaptation
//! - [`gamut_conversion_matrix`] - the one-call entry point used by
//!   raster-core when converting between spaces with different primaries
//!
//! # Usage
//!
//! ```rust
//! use raster_math::{gamut_conversion_matrix, Vec3, SRGB, ACES_AP1};
//!
//! let m = gamut_conversion_matrix(&SRGB, &ACES_AP1);
//! let acescg = m * Vec3::new(1.0, 0.0, 0.0);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod adapt;
pub mod chromaticity;
pub mod gamut;
pub mod mat3;
pub mod vec3;

pub use adapt::{bradford_adaptation, BRADFORD, BRADFORD_INV};
pub use chromaticity::{
    xy_to_xyz, Chromaticities, ACES_AP0, ACES_AP1, DCI_P3, D50_XY, D60_XY, D65_XY, DCI_XY,
    REC2020, SRGB,
};
pub use gamut::{gamut_conversion_matrix, rgb_to_xyz_matrix, xyz_to_rgb_matrix};
pub use mat3::Mat3;
pub use vec3::Vec3;
