//! Blob codec: JSON serialization inside a Zstandard frame

use crate::error::{CacheError, CacheResult, CodecError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use zstd::stream::{Decoder, Encoder};

/// File extension of cache blobs
pub const CACHE_EXTENSION: &str = "json.zst";

/// Default Zstandard compression level
pub const DEFAULT_LEVEL: i32 = 3;

/// Serialize and compress an object
///
/// # Errors
/// Returns error if serialization or compression fails
pub fn encode<T: Serialize + ?Sized>(obj: &T, level: i32) -> Result<Vec<u8>, CodecError> {
    let mut encoder = Encoder::new(Vec::new(), level).map_err(CodecError::Compression)?;
    serde_json::to_writer(&mut encoder, obj)?;
    encoder.flush().map_err(CodecError::Compression)?;
    // `finish` writes the frame epilogue
    encoder.finish().map_err(CodecError::Compression)
}

/// Decompress and deserialize an object
///
/// # Errors
/// Returns error if the bytes are not a valid frame or do not decode into `T`
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    let decoder = Decoder::new(bytes).map_err(CodecError::Compression)?;
    serde_json::from_reader(decoder).map_err(|e| {
        if e.is_io() {
            CodecError::Compression(e.into())
        } else {
            CodecError::Serde(e)
        }
    })
}

/// Read a blob from disk, treating unreadable content as absent
///
/// Returns `Ok(None)` if the file does not exist or does not decode into
/// `T`.
///
/// # Errors
/// Returns error only if an existing file cannot be read
pub fn load_compressed<T: DeserializeOwned>(path: &Path) -> CacheResult<Option<T>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(CacheError::io_error(path, e)),
    };

    match decode(&bytes) {
        Ok(obj) => Ok(Some(obj)),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable cache blob");
            Ok(None)
        }
    }
}

/// Write a blob to disk atomically
///
/// The blob is written next to `path` and renamed into place, so readers
/// see either the old or the new content.
///
/// # Errors
/// Returns error if encoding or writing fails
pub fn store_compressed<T: Serialize + ?Sized>(path: &Path, obj: &T, level: i32) -> CacheResult<()> {
    let bytes = encode(obj, level).map_err(|source| CacheError::Encode {
        path: path.to_path_buf(),
        source,
    })?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(|e| CacheError::io_error(dir, e))?;
    file.write_all(&bytes)
        .map_err(|e| CacheError::io_error(file.path(), e))?;
    file.persist(path)
        .map_err(|e| CacheError::io_error(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn encode_then_decode() {
        let value = json!({"name": "groupmean", "contrasts": [1, -1]});
        let bytes = encode(&value, DEFAULT_LEVEL).unwrap();
        let back: Value = decode(&bytes).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn garbage_is_a_compression_error() {
        let err = decode::<Value>(b"definitely not zstd").unwrap_err();
        assert!(matches!(err, CodecError::Compression(_)));
    }

    #[test]
    fn wrong_shape_is_a_serde_error() {
        #[derive(Debug, serde::Deserialize)]
        struct Expected {
            #[allow(dead_code)]
            count: u32,
        }
        let bytes = encode(&json!({"other": true}), DEFAULT_LEVEL).unwrap();
        let err = decode::<Expected>(&bytes).unwrap_err();
        assert!(matches!(err, CodecError::Serde(_)));
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let out: Option<Value> = load_compressed(&dir.path().join("absent.json.zst")).unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn corrupt_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.json.zst");
        std::fs::write(&path, b"\x28\xb5\x2f\xfd garbage").unwrap();
        let out: Option<Value> = load_compressed(&path).unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn store_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("obj.json.zst");
        store_compressed(&path, &json!([1, 2, 3]), DEFAULT_LEVEL).unwrap();
        let out: Option<Value> = load_compressed(&path).unwrap();
        assert_eq!(out, Some(json!([1, 2, 3])));
    }
}
