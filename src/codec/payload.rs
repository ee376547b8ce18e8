//! # Payload Compression
//!
//! The transport wrapper around packed tile bytes: zlib deflate followed by
//! standard base64, matching the `encoding="base64" compression="zlib"`
//! layer data of Tiled TMX maps.

use crate::{TilemazeError, TilemazeResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::{Read, Write};

/// Deflates `bytes` into a zlib stream and base64 encodes it.
pub fn compress(bytes: &[u8]) -> TilemazeResult<String> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    let deflated = encoder.finish()?;
    Ok(STANDARD.encode(deflated))
}

/// Reverses [`compress`].
///
/// # Errors
///
/// Invalid base64 or a corrupt zlib stream yields [`TilemazeError::Decode`].
pub fn decompress(payload: &str) -> TilemazeResult<Vec<u8>> {
    let deflated = STANDARD
        .decode(payload.trim())
        .map_err(|e| TilemazeError::Decode(format!("invalid base64: {}", e)))?;

    let mut decoder = ZlibDecoder::new(deflated.as_slice());
    let mut inflated = Vec::new();
    decoder
        .read_to_end(&mut inflated)
        .map_err(|e| TilemazeError::Decode(format!("invalid zlib stream: {}", e)))?;

    Ok(inflated)
}
