//! Edge processing utilities used by the canonical-crop refiner.
//!
//! Borders are handled by clamping indices (replicate).

pub mod grad;

pub use grad::{sobel_gradients, Grad};
