//! Audio engine adapter over `rodio`.
//!
//! Opens the output device, decodes files into a sink and exposes the
//! playback primitives behind the `AudioEngine` trait.

mod engine;
mod output;
mod probe;
mod sink;

pub use engine::{AudioEngine, RodioEngine};
pub use sink::{FileDecoder, sniff_decoder};

#[cfg(test)]
pub(crate) mod tests;
