use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};
use rodio::Source;

use crate::audio::FileDecoder;
use crate::error::RepairError;

/// Drain `source` into a 16-bit PCM WAV at `output`, keeping its rate and channel count.
pub(super) fn render_wav(source: FileDecoder, output: &Path) -> Result<(), RepairError> {
    let spec = WavSpec {
        channels: source.channels(),
        sample_rate: source.sample_rate(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let render_err = |e: hound::Error| RepairError::Render(e.to_string());

    let mut writer = WavWriter::create(output, spec).map_err(render_err)?;
    let mut written: u64 = 0;
    for sample in source {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer.write_sample(value).map_err(render_err)?;
        written += 1;
    }
    writer.finalize().map_err(render_err)?;

    if written == 0 {
        return Err(RepairError::Render("decoder produced no audio".to_string()));
    }
    tracing::debug!("rendered {written} samples to {}", output.display());
    Ok(())
}
