//! Content fingerprinting for deduplication and artifact naming.

use blake3::Hasher as Blake3Hasher;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Length of the hex fingerprint embedded in artifact names.
///
/// 40 bits of BLAKE3 output. Collisions are accepted as negligible at
/// gallery scale; the fingerprint is a dedup and naming key, not an
/// integrity check.
pub const FINGERPRINT_LEN: usize = 10;

/// Compute the content fingerprint of an in-memory byte buffer.
///
/// Deterministic over bytes only: two files with identical content yield
/// the identical fingerprint regardless of name or location.
pub fn fingerprint(data: &[u8]) -> String {
    let mut hasher = Blake3Hasher::new();
    hasher.update(data);
    let mut hex = hasher.finalize().to_hex().to_string();
    hex.truncate(FINGERPRINT_LEN);
    hex
}

/// Compute the content fingerprint of a file by streaming its bytes.
///
/// Used by callers that have not already read the file into memory.
pub fn fingerprint_file(path: &Path) -> std::io::Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut hasher = Blake3Hasher::new();

    let mut buffer = [0u8; 65536];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    let mut hex = hasher.finalize().to_hex().to_string();
    hex.truncate(FINGERPRINT_LEN);
    Ok(hex)
}
