//! Source validation before decoding.

use std::path::Path;

use crate::config::LimitsConfig;
use crate::error::PipelineError;

/// Validates source bytes before the codec sees them.
pub struct Validator {
    limits: LimitsConfig,
}

impl Validator {
    /// Create a new validator with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Check a source's size against the configured limit.
    ///
    /// Runs against the discovered file size, before the file is read
    /// into memory.
    pub fn check_size(&self, path: &Path, size: u64) -> Result<(), PipelineError> {
        let max_bytes = self.limits.max_file_size_mb * 1024 * 1024;
        if size > max_bytes {
            return Err(PipelineError::FileTooLarge {
                path: path.to_path_buf(),
                size_mb: size / (1024 * 1024),
                max_mb: self.limits.max_file_size_mb,
            });
        }
        Ok(())
    }

    /// Perform quick validation on bytes already read from disk.
    ///
    /// Checks:
    /// - byte length is within the configured size limit
    /// - the buffer starts with a known image container signature
    pub fn validate(&self, path: &Path, bytes: &[u8]) -> Result<(), PipelineError> {
        self.check_size(path, bytes.len() as u64)?;

        if bytes.len() < 4 {
            return Err(PipelineError::InvalidImage {
                path: path.to_path_buf(),
                message: "file too small to be a valid image".to_string(),
            });
        }

        if !Self::has_image_signature(bytes) {
            return Err(PipelineError::InvalidImage {
                path: path.to_path_buf(),
                message: "unrecognized image container (invalid magic bytes)".to_string(),
            });
        }

        Ok(())
    }

    /// Check if the leading bytes match a supported image container.
    fn has_image_signature(bytes: &[u8]) -> bool {
        // JPEG: FF D8 FF
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return true;
        }

        // PNG: 89 'P' 'N' 'G'
        if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
            return true;
        }

        // WebP: RIFF....WEBP
        if bytes.starts_with(b"RIFF") {
            if bytes.len() >= 12 {
                return &bytes[8..12] == b"WEBP";
            }
            // Truncated header, let the decoder decide
            return true;
        }

        // TIFF: II*\0 (little-endian) or MM\0* (big-endian)
        if bytes.starts_with(&[b'I', b'I', 0x2A, 0x00])
            || bytes.starts_with(&[b'M', b'M', 0x00, 0x2A])
        {
            return true;
        }

        // AVIF/HEIF: ftyp box at offset 4
        if bytes.len() >= 12 && &bytes[4..8] == b"ftyp" {
            return true;
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> Validator {
        Validator::new(LimitsConfig::default())
    }

    #[test]
    fn test_jpeg_signature() {
        let bytes = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0, 0, 0, 0, 0];
        assert!(validator().validate(Path::new("a.jpg"), &bytes).is_ok());
    }

    #[test]
    fn test_png_signature() {
        let bytes = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        assert!(validator().validate(Path::new("a.png"), &bytes).is_ok());
    }

    #[test]
    fn test_webp_signature() {
        let bytes = [b'R', b'I', b'F', b'F', 0, 0, 0, 0, b'W', b'E', b'B', b'P'];
        assert!(validator().validate(Path::new("a.webp"), &bytes).is_ok());
    }

    #[test]
    fn test_tiff_signatures() {
        assert!(Validator::has_image_signature(&[b'I', b'I', 0x2A, 0x00]));
        assert!(Validator::has_image_signature(&[b'M', b'M', 0x00, 0x2A]));
        assert!(!Validator::has_image_signature(&[b'I', b'I', 0x00, 0x00]));
    }

    #[test]
    fn test_avif_ftyp_signature() {
        let mut bytes = vec![0x00, 0x00, 0x00, 0x1C];
        bytes.extend_from_slice(b"ftypavif");
        assert!(Validator::has_image_signature(&bytes));
    }

    #[test]
    fn test_garbage_rejected() {
        let bytes = [0u8; 16];
        let err = validator().validate(Path::new("a.png"), &bytes).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidImage { .. }));
    }

    #[test]
    fn test_tiny_file_rejected() {
        let err = validator().validate(Path::new("a.png"), &[0xFF]).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidImage { .. }));
    }

    #[test]
    fn test_oversized_rejected() {
        let v = Validator::new(LimitsConfig { max_file_size_mb: 1 });
        let bytes = vec![0xFF; 2 * 1024 * 1024];
        let err = v.validate(Path::new("a.jpg"), &bytes).unwrap_err();
        assert!(matches!(err, PipelineError::FileTooLarge { .. }));
    }

    #[test]
    fn test_check_size_without_reading() {
        let v = Validator::new(LimitsConfig { max_file_size_mb: 1 });
        assert!(v.check_size(Path::new("a.jpg"), 1024).is_ok());
        let err = v
            .check_size(Path::new("a.jpg"), 3 * 1024 * 1024)
            .unwrap_err();
        assert!(matches!(err, PipelineError::FileTooLarge { .. }));
    }
}
