//! Peripheral helpers for Tessera.
//!
//! - Image arrays: horizontal and vertical stacking on a white canvas
//! - Animation: drive a frame writer over sliding windows of an index
//! - Randomness: a process-global seeded generator

pub mod animation;
pub mod image;
pub mod random;

pub use animation::{AnimationConfig, FrameBuffer, FrameWriter, save_animation};
pub use image::{Image, hstack_image_arrays, vstack_image_arrays};
pub use random::{random_f64, set_seed, with_rng};

/// Result type for utility operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for utility operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Image error: {0}")]
    Image(String),

    #[error("Animation error: {0}")]
    Animation(String),

    #[error(transparent)]
    Core(#[from] tessera_core::Error),
}
