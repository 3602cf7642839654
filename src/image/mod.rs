//! Minimal grayscale image containers plus resampling and I/O helpers.
//!
//! - [`ImageU8`]: borrowed 8-bit view with an explicit row stride.
//! - [`GrayImageU8`]: owned 8-bit buffer, e.g. a canonical crop.
//! - [`ImageF32`]: owned float buffer for gradient processing.
//! - [`warp`]: perspective resampling under a typed homography.
pub mod f32;
pub mod io;
pub mod traits;
pub mod u8;
pub mod warp;

pub use self::f32::ImageF32;
pub use self::io::GrayImageU8;
pub use self::traits::{ImageView, ImageViewMut};
pub use self::u8::ImageU8;
