// src/sketch/checksum.rs

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use crc32fast::Hasher;
use tracing::debug;

use crate::fs::FileSystem;

/// Compute the CRC-32 (IEEE, as used by gzip/zlib) of everything `reader`
/// yields.
///
/// The result does not depend on how the reader chunks its output.
pub fn checksum_reader<R: Read>(mut reader: R) -> std::io::Result<u32> {
    let mut hasher = Hasher::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize())
}

pub fn checksum_bytes(bytes: &[u8]) -> u32 {
    crc32fast::hash(bytes)
}

/// Checksum the current content of the file at `path`.
///
/// Fails if the file cannot be opened or read.
pub fn checksum_file(fs: &dyn FileSystem, path: &Path) -> Result<u32> {
    let reader = fs.open_read(path)?;
    let crc = checksum_reader(reader)
        .with_context(|| format!("reading file for checksum: {:?}", path))?;
    debug!(path = ?path, checksum = %format!("{crc:08x}"), "computed checksum");
    Ok(crc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn empty_input_is_zero() {
        assert_eq!(checksum_bytes(b""), 0x0000_0000);
        assert_eq!(checksum_reader(Cursor::new(Vec::new())).unwrap(), 0);
    }

    #[test]
    fn matches_reference_check_value() {
        assert_eq!(checksum_bytes(b"123456789"), 0xCBF4_3926);
        assert_eq!(
            checksum_reader(Cursor::new(b"123456789".to_vec())).unwrap(),
            0xCBF4_3926
        );
    }

    #[test]
    fn content_larger_than_buffer_streams_correctly() {
        let data: Vec<u8> = (0..50_000u32).map(|i| (i % 251) as u8).collect();
        assert_eq!(
            checksum_reader(Cursor::new(data.clone())).unwrap(),
            checksum_bytes(&data)
        );
    }
}
