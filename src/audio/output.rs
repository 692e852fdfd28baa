use rodio::cpal::{BufferSize, SampleFormat};
use rodio::{OutputStream, OutputStreamBuilder};

use crate::config::AudioSettings;
use crate::error::InitError;

/// Open the default output device, preferring the configured format.
///
/// Any failure with the preferred configuration falls back to the device
/// defaults; only when that fails too is the device considered unusable.
pub(super) fn open_output(settings: &AudioSettings) -> Result<OutputStream, InitError> {
    match open_preferred(settings) {
        Ok(stream) => {
            tracing::info!(
                "audio output opened at {} Hz, {} ch, buffer {}",
                settings.sample_rate,
                settings.channels,
                settings.buffer_size
            );
            return Ok(stream);
        }
        Err(e) => tracing::warn!("preferred audio config rejected ({e}), using device defaults"),
    }

    let stream = OutputStreamBuilder::open_default_stream()
        .map_err(|e| InitError::NoDevice(e.to_string()))?;
    tracing::info!("audio output opened with device defaults");
    Ok(stream)
}

fn open_preferred(settings: &AudioSettings) -> Result<OutputStream, String> {
    OutputStreamBuilder::from_default_device()
        .map_err(|e| e.to_string())?
        .with_sample_rate(settings.sample_rate)
        .with_channels(settings.channels)
        .with_sample_format(SampleFormat::I16)
        .with_buffer_size(BufferSize::Fixed(settings.buffer_size))
        .open_stream()
        .map_err(|e| e.to_string())
}
