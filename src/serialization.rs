//! Versioned persistence envelope for fitted models.
//!
//! Every artifact is laid out as:
//!
//! ```text
//! magic "NADV" | tag length (u8) | format tag (utf-8) | version (u16, LE) | bincode payload
//! ```
//!
//! The header lets a loader tell a foreign file ([`ArtifactError::UnknownFormat`]) from
//! an artifact written by another format version ([`ArtifactError::UnsupportedVersion`])
//! and from a damaged payload ([`ArtifactError::CorruptPayload`]).

use crate::error::ArtifactError;
use bincode::Options;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::Path;

pub const ARTIFACT_MAGIC: &[u8; 4] = b"NADV";

/// Fixed-width integers, as `bincode::serialize` writes them, but a payload must be
/// consumed completely.
fn bincode_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

/// Plain parameter data that can be turned into bytes and back.
///
/// Implemented for every serde type through bincode.
pub trait SerializableParams: Sized {
    fn to_bytes(&self) -> Result<Vec<u8>, ArtifactError>;
    fn from_bytes(bytes: &[u8]) -> Result<Self, ArtifactError>;
}

impl<T> SerializableParams for T
where
    T: Serialize + DeserializeOwned,
{
    fn to_bytes(&self) -> Result<Vec<u8>, ArtifactError> {
        bincode_options()
            .serialize(self)
            .map_err(|e| ArtifactError::CorruptPayload(e.to_string()))
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, ArtifactError> {
        bincode_options()
            .deserialize(bytes)
            .map_err(|e| ArtifactError::CorruptPayload(e.to_string()))
    }
}

/// Identifies what an artifact contains and which layout it uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArtifactHeader<'a> {
    pub format: &'a str,
    pub version: u16,
}

impl<'a> ArtifactHeader<'a> {
    pub const fn new(format: &'a str, version: u16) -> Self {
        Self { format, version }
    }

    /// Wraps `payload` into a complete artifact.
    pub fn encode<T: SerializableParams>(&self, payload: &T) -> Result<Vec<u8>, ArtifactError> {
        let tag = self.format.as_bytes();
        let tag_len = u8::try_from(tag.len()).map_err(|_| {
            ArtifactError::UnknownFormat(format!("format tag '{}' is too long", self.format))
        })?;

        let body = payload.to_bytes()?;
        let mut bytes = Vec::with_capacity(ARTIFACT_MAGIC.len() + 1 + tag.len() + 2 + body.len());
        bytes.extend_from_slice(ARTIFACT_MAGIC);
        bytes.push(tag_len);
        bytes.extend_from_slice(tag);
        bytes.extend_from_slice(&self.version.to_le_bytes());
        bytes.extend_from_slice(&body);
        Ok(bytes)
    }

    /// Checks the header of `bytes` against `self` and decodes the payload.
    pub fn decode<T: SerializableParams>(&self, bytes: &[u8]) -> Result<T, ArtifactError> {
        let rest = bytes
            .strip_prefix(ARTIFACT_MAGIC.as_slice())
            .ok_or_else(|| ArtifactError::UnknownFormat("missing artifact header".into()))?;

        let (&tag_len, rest) = rest
            .split_first()
            .ok_or_else(|| ArtifactError::CorruptPayload("truncated artifact header".into()))?;
        let tag_len = tag_len as usize;
        if rest.len() < tag_len + 2 {
            return Err(ArtifactError::CorruptPayload(
                "truncated artifact header".into(),
            ));
        }
        let (tag, rest) = rest.split_at(tag_len);
        let tag = std::str::from_utf8(tag)
            .map_err(|_| ArtifactError::UnknownFormat("format tag is not utf-8".into()))?;
        if tag != self.format {
            return Err(ArtifactError::UnknownFormat(format!(
                "expected '{}' artifact, found '{}'",
                self.format, tag
            )));
        }

        let (version, payload) = rest.split_at(2);
        let version = u16::from_le_bytes([version[0], version[1]]);
        if version != self.version {
            return Err(ArtifactError::UnsupportedVersion {
                found: version,
                supported: self.version,
            });
        }

        T::from_bytes(payload)
    }
}

pub fn write_artifact<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<(), ArtifactError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(())
}

pub fn read_artifact<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, ArtifactError> {
    Ok(fs::read(path)?)
}
