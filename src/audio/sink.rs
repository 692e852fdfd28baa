//! Utilities for opening decoders and creating `rodio` sinks from files.
//!
//! The helpers here encapsulate opening/decoding a file and preparing a
//! paused `Sink`, and translate decoder failures into `LoadError`.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::decoder::DecoderError;
use rodio::{Decoder, OutputStream, Sink};

use crate::error::LoadError;

pub type FileDecoder = Decoder<BufReader<File>>;

/// Decode `path`, using its extension as a format hint.
pub fn open_decoder(path: &Path) -> Result<FileDecoder, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let byte_len = file.metadata().map(|m| m.len()).ok();

    let mut builder = Decoder::builder()
        .with_data(BufReader::new(file))
        .with_seekable(true);
    if let Some(len) = byte_len {
        builder = builder.with_byte_len(len);
    }
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        builder = builder.with_hint(&ext.to_ascii_lowercase());
    }

    builder.build().map_err(|e| classify(path, e))
}

/// Decode `path` by content sniffing alone, ignoring the extension.
pub fn sniff_decoder(path: &Path) -> Result<FileDecoder, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Decoder::new(BufReader::new(file)).map_err(|e| classify(path, e))
}

/// Map a decoder failure onto a stable error kind.
///
/// The file was opened, so whatever the decoder reports (unknown container,
/// bad frames, a stream that ends early) means the bytes could not be
/// understood. That is the case the repair pipeline handles.
pub fn classify(path: &Path, err: DecoderError) -> LoadError {
    LoadError::Corrupt {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

/// Create a paused `Sink` playing `path` from the start at `volume`.
pub(super) fn create_sink(
    stream: &OutputStream,
    path: &Path,
    volume: f32,
) -> Result<Sink, LoadError> {
    let source = open_decoder(path)?;
    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(volume);
    sink.append(source);
    sink.pause();
    Ok(sink)
}
