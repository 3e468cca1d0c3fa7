//! Hash algorithm selection and streaming digest computation.
//!
//! # Overview
//!
//! [`Algorithm`] is the closed set of digests the operator can choose from.
//! Each variant has a fixed output length ([`Algorithm::digest_len`]) and
//! computes its digest by reading a buffered stream to the end, so memory use
//! never depends on file size.
//!
//! SHA-512 is the default. MD5 and SHA-1 are kept for compatibility with
//! existing checksum lists and are flagged as legacy: their digest space is
//! small enough that collisions are a real, user-visible tradeoff.
//!
//! # Example
//!
//! ```
//! use fdup::scanner::Algorithm;
//! use std::io::BufReader;
//!
//! let algorithm = Algorithm::Sha256;
//! let mut reader = BufReader::new(&b"hello"[..]);
//! let mut digest = vec![0u8; algorithm.digest_len()];
//! algorithm.hash_reader(&mut reader, &mut digest).unwrap();
//! assert_eq!(digest.len(), 32);
//! ```

use std::fmt;
use std::io::{self, BufRead};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Largest digest produced by any supported algorithm (512 bits).
pub const MAX_DIGEST_LEN: usize = 64;

/// Content hash algorithm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// SHA-512 (default)
    #[default]
    Sha512,
    /// SHA-384
    Sha384,
    /// SHA-256
    Sha256,
    /// SHA3-512
    #[value(name = "sha3-512", alias = "sha3512")]
    #[serde(rename = "sha3-512", alias = "sha3512")]
    Sha3_512,
    /// SHA3-384
    #[value(name = "sha3-384", alias = "sha3384")]
    #[serde(rename = "sha3-384", alias = "sha3384")]
    Sha3_384,
    /// SHA3-256
    #[value(name = "sha3-256", alias = "sha3256")]
    #[serde(rename = "sha3-256", alias = "sha3256")]
    Sha3_256,
    /// SHA-1 (legacy)
    Sha1,
    /// MD5 (legacy)
    Md5,
    /// BLAKE3
    Blake3,
}

impl Algorithm {
    /// Every supported algorithm, in the order shown by `fdup alglist`.
    pub const ALL: [Algorithm; 9] = [
        Algorithm::Sha512,
        Algorithm::Sha384,
        Algorithm::Sha256,
        Algorithm::Sha3_512,
        Algorithm::Sha3_384,
        Algorithm::Sha3_256,
        Algorithm::Sha1,
        Algorithm::Md5,
        Algorithm::Blake3,
    ];

    /// Human-readable name (e.g. "SHA3-512").
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Sha512 => "SHA512",
            Self::Sha384 => "SHA384",
            Self::Sha256 => "SHA256",
            Self::Sha3_512 => "SHA3-512",
            Self::Sha3_384 => "SHA3-384",
            Self::Sha3_256 => "SHA3-256",
            Self::Sha1 => "SHA1",
            Self::Md5 => "MD5",
            Self::Blake3 => "BLAKE3",
        }
    }

    /// Value accepted by `--algorithm` (e.g. "sha3-512").
    #[must_use]
    pub fn cli_name(self) -> &'static str {
        match self {
            Self::Sha512 => "sha512",
            Self::Sha384 => "sha384",
            Self::Sha256 => "sha256",
            Self::Sha3_512 => "sha3-512",
            Self::Sha3_384 => "sha3-384",
            Self::Sha3_256 => "sha3-256",
            Self::Sha1 => "sha1",
            Self::Md5 => "md5",
            Self::Blake3 => "blake3",
        }
    }

    /// Digest length in bytes.
    #[must_use]
    pub fn digest_len(self) -> usize {
        match self {
            Self::Sha512 | Self::Sha3_512 => 64,
            Self::Sha384 | Self::Sha3_384 => 48,
            Self::Sha256 | Self::Sha3_256 | Self::Blake3 => 32,
            Self::Sha1 => 20,
            Self::Md5 => 16,
        }
    }

    /// Whether the algorithm has known practical collision attacks.
    #[must_use]
    pub fn is_legacy(self) -> bool {
        matches!(self, Self::Sha1 | Self::Md5)
    }

    /// Hash the remaining content of `reader` into `dest`.
    ///
    /// The reader is drained through its own buffer (`fill_buf`/`consume`),
    /// so the caller controls the read size by choosing the buffer capacity.
    ///
    /// Returns the number of digest bytes written, always `digest_len()`.
    ///
    /// # Panics
    ///
    /// Panics if `dest.len() != self.digest_len()`. Passing a buffer sized for
    /// another algorithm is a caller bug, not a runtime condition.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised while reading.
    pub fn hash_reader<R: BufRead + ?Sized>(
        self,
        reader: &mut R,
        dest: &mut [u8],
    ) -> io::Result<usize> {
        assert_eq!(
            dest.len(),
            self.digest_len(),
            "{} digest needs a {}-byte buffer, got {}",
            self.display_name(),
            self.digest_len(),
            dest.len()
        );

        match self {
            Self::Sha512 => stream::<sha2::Sha512, _>(reader, dest),
            Self::Sha384 => stream::<sha2::Sha384, _>(reader, dest),
            Self::Sha256 => stream::<sha2::Sha256, _>(reader, dest),
            Self::Sha3_512 => stream::<sha3::Sha3_512, _>(reader, dest),
            Self::Sha3_384 => stream::<sha3::Sha3_384, _>(reader, dest),
            Self::Sha3_256 => stream::<sha3::Sha3_256, _>(reader, dest),
            Self::Sha1 => stream::<sha1::Sha1, _>(reader, dest),
            Self::Md5 => stream::<md5::Md5, _>(reader, dest),
            Self::Blake3 => {
                let mut hasher = blake3::Hasher::new();
                drain(reader, |chunk| {
                    hasher.update(chunk);
                })?;
                dest.copy_from_slice(hasher.finalize().as_bytes());
                Ok(dest.len())
            }
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Feed a RustCrypto digest from the reader and write the output into `dest`.
fn stream<D: digest::Digest, R: BufRead + ?Sized>(
    reader: &mut R,
    dest: &mut [u8],
) -> io::Result<usize> {
    let mut hasher = D::new();
    drain(reader, |chunk| hasher.update(chunk))?;
    dest.copy_from_slice(&hasher.finalize());
    Ok(dest.len())
}

/// Pass every buffered chunk of `reader` to `sink` until EOF.
fn drain<R: BufRead + ?Sized>(reader: &mut R, mut sink: impl FnMut(&[u8])) -> io::Result<()> {
    loop {
        let chunk = match reader.fill_buf() {
            Ok(chunk) => chunk,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if chunk.is_empty() {
            return Ok(());
        }
        sink(chunk);
        let len = chunk.len();
        reader.consume(len);
    }
}
