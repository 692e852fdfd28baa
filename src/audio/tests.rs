use std::path::{Path, PathBuf};
use std::time::Duration;

use hound::{WavSpec, WavWriter};
use rodio::Source;
use rodio::decoder::DecoderError;
use tempfile::tempdir;

use super::probe::duration_of;
use super::sink::{classify, open_decoder};
use super::*;
use crate::error::LoadError;

/// Write a short stereo 16-bit sine WAV; shared with other modules' tests.
pub(crate) fn write_test_wav(path: &Path, secs: f32, sample_rate: u32) {
    let spec = WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).unwrap();
    let frames = (sample_rate as f32 * secs) as usize;
    for i in 0..frames {
        let t = i as f32 / sample_rate as f32;
        let v = (t * 440.0 * 2.0 * std::f32::consts::PI).sin();
        let amplitude = (i16::MAX as f32 * 0.5 * v) as i16;
        writer.write_sample(amplitude).unwrap();
        writer.write_sample(amplitude).unwrap();
    }
    writer.finalize().unwrap();
}

#[test]
fn unrecognized_format_is_repairable() {
    let err = classify(Path::new("/tmp/x.mp3"), DecoderError::UnrecognizedFormat);
    assert!(matches!(err, LoadError::Corrupt { .. }));
    assert!(err.is_repairable());
}

#[test]
fn missing_file_is_an_open_error() {
    let dir = tempdir().unwrap();
    let err = open_decoder(&dir.path().join("nope.mp3")).err().unwrap();
    assert!(matches!(err, LoadError::Open { .. }));
    assert!(!err.is_repairable());
}

#[test]
fn garbage_bytes_are_classified_as_corrupt() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.mp3");
    std::fs::write(&path, vec![0x42u8; 4096]).unwrap();

    let err = open_decoder(&path).err().unwrap();
    assert!(err.is_repairable(), "{err}");
    assert!(sniff_decoder(&path).is_err());
}

#[test]
fn valid_wav_decodes_with_and_without_hint() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tone.wav");
    write_test_wav(&path, 0.5, 44_100);

    let hinted = open_decoder(&path).unwrap();
    assert_eq!(hinted.channels(), 2);
    assert_eq!(hinted.sample_rate(), 44_100);
    assert!(sniff_decoder(&path).is_ok());
}

#[test]
fn duration_probe_reports_wav_length() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tone.wav");
    write_test_wav(&path, 2.0, 8_000);

    let d = duration_of(&path);
    assert!(
        d > Duration::from_millis(1900) && d < Duration::from_millis(2100),
        "{d:?}"
    );
}

#[test]
fn duration_probe_is_zero_for_undecodable_files() {
    let dir = tempdir().unwrap();
    let path: PathBuf = dir.path().join("junk.ogg");
    std::fs::write(&path, b"definitely not audio").unwrap();
    assert_eq!(duration_of(&path), Duration::ZERO);
}
