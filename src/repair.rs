//! Repair pipeline for files the decoder cannot play directly.
//!
//! A repair transcodes the source into a temporary 16-bit PCM WAV, either
//! with an external `ffmpeg` or, when that is missing, by decoding the file
//! with the library's content sniffing and writing the samples back out.

mod pipeline;
mod render;
mod temp;
mod transcoder;

pub use pipeline::Repairer;
pub use temp::TempAudioFile;
