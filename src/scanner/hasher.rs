//! File hasher with streaming support.
//!
//! # Overview
//!
//! This module provides the [`Hasher`] struct for computing content digests
//! of files with a bounded read buffer, and the [`Digest`] value type that
//! holds the result on the stack.
//!
//! # Example
//!
//! ```no_run
//! use fdup::scanner::{Algorithm, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::new(Algorithm::Sha512);
//! let digest = hasher.hash_file(Path::new("Cargo.toml")).unwrap();
//! println!("{}", digest.to_hex());
//! ```

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use super::algorithm::{Algorithm, MAX_DIGEST_LEN};
use super::HashError;

/// Default read buffer size (1 MiB).
pub const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

/// Fixed-capacity digest.
///
/// Holds up to [`MAX_DIGEST_LEN`] bytes inline, so computing a digest never
/// allocates. Two digests are equal only if they have the same length and
/// bytes, which matches comparing their hex renderings.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest {
    len: u8,
    bytes: [u8; MAX_DIGEST_LEN],
}

impl Digest {
    /// Copy raw digest bytes into a new `Digest`.
    ///
    /// # Errors
    ///
    /// Returns [`DigestParseError::TooLong`] if `bytes` exceeds
    /// [`MAX_DIGEST_LEN`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DigestParseError> {
        if bytes.len() > MAX_DIGEST_LEN {
            return Err(DigestParseError::TooLong(bytes.len()));
        }
        let mut digest = Self {
            len: bytes.len() as u8,
            bytes: [0u8; MAX_DIGEST_LEN],
        };
        digest.bytes[..bytes.len()].copy_from_slice(bytes);
        Ok(digest)
    }

    /// Parse an uppercase or lowercase hex rendering.
    ///
    /// # Errors
    ///
    /// Returns an error for odd length, non-hex characters, or a digest
    /// longer than [`MAX_DIGEST_LEN`] bytes.
    ///
    /// # Example
    ///
    /// ```
    /// use fdup::scanner::Digest;
    ///
    /// let digest = Digest::from_hex("00FF10").unwrap();
    /// assert_eq!(digest.as_bytes(), &[0x00, 0xFF, 0x10]);
    /// assert_eq!(digest.to_hex(), "00FF10");
    /// ```
    pub fn from_hex(s: &str) -> Result<Self, DigestParseError> {
        let raw = hex::decode(s)?;
        Self::from_bytes(&raw)
    }

    /// The raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..usize::from(self.len)]
    }

    /// Digest length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    /// Whether the digest has no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Uppercase hex, two characters per byte, no separators.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.as_bytes())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Errors from parsing a digest rendering.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum DigestParseError {
    /// The text was not valid hex.
    #[error("invalid hex digest: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// The digest is longer than any supported algorithm produces.
    #[error("digest of {0} bytes exceeds the 64-byte maximum")]
    TooLong(usize),
}

/// Streaming file hasher for a single algorithm.
///
/// Cheap to share across threads: it holds only the algorithm and the
/// buffer size, and every call opens its own reader.
#[derive(Debug, Clone, Copy)]
pub struct Hasher {
    algorithm: Algorithm,
    buffer_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new(Algorithm::default())
    }
}

impl Hasher {
    /// Create a hasher with the default 1 MiB read buffer.
    #[must_use]
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Override the read buffer size (minimum 4 KiB).
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(4096);
        self
    }

    /// The algorithm this hasher computes.
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// The read buffer size in bytes.
    #[must_use]
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Hash the full content of a file.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or read.
    pub fn hash_file(&self, path: &Path) -> Result<Digest, HashError> {
        let file = File::open(path).map_err(|e| map_io_error(path, e))?;
        let mut reader = BufReader::with_capacity(self.buffer_size, file);
        self.hash_reader(&mut reader)
            .map_err(|e| map_io_error(path, e))
    }

    /// Hash everything remaining in a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised while reading.
    pub fn hash_reader<R: io::BufRead + ?Sized>(&self, reader: &mut R) -> io::Result<Digest> {
        let mut out = [0u8; MAX_DIGEST_LEN];
        let len = self.algorithm.digest_len();
        self.algorithm.hash_reader(reader, &mut out[..len])?;
        Ok(Digest {
            len: len as u8,
            bytes: out,
        })
    }
}

fn map_io_error(path: &Path, e: io::Error) -> HashError {
    match e.kind() {
        io::ErrorKind::NotFound => HashError::NotFound(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => HashError::PermissionDenied(path.to_path_buf()),
        _ => HashError::Io {
            path: path.to_path_buf(),
            source: Arc::new(e),
        },
    }
}
