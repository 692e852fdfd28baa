//! Directory scanning: the list of audio files the user can open.

mod model;
mod scan;

pub use model::AudioFile;
pub use scan::scan;

#[cfg(test)]
mod tests;
