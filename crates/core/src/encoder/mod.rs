//! Encoder abstraction and the ffmpeg implementation.
//!
//! The [`Encoder`] trait is the seam between the conversion engine and the
//! actual transcoding process; [`FfmpegEncoder`] drives the real ffmpeg
//! binary, while tests substitute
//! [`MockEncoder`](crate::testing::MockEncoder).

mod config;
mod ffmpeg;
mod traits;
mod types;

pub use config::EncoderConfig;
pub use ffmpeg::FfmpegEncoder;
pub use traits::Encoder;
pub use types::{EncodeProgress, EncodeReport};
