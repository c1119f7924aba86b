//! Record identifiers.
//!
//! Admin records are addressed by 12-byte ids rendered as 24 lowercase hex
//! characters: a 4-byte big-endian creation timestamp followed by 8 random
//! bytes. The timestamp prefix keeps ids roughly sortable by creation time.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::RECORD_ID_LENGTH;
use crate::error::{DomainError, DomainResult};

/// Identifier shared by role and membership records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Generate a fresh id.
    pub fn generate() -> Self {
        let seconds = Utc::now().timestamp().clamp(0, u32::MAX as i64) as u32;
        let random = Uuid::new_v4();

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..].copy_from_slice(&random.as_bytes()[..8]);

        Self(bytes.iter().map(|b| format!("{:02x}", b)).collect())
    }

    /// Parse an id received from a client.
    ///
    /// `entity` names the record in the error message ("admin" yields
    /// "Invalid admin ID format").
    pub fn parse(raw: &str, entity: &str) -> DomainResult<Self> {
        if raw.len() == RECORD_ID_LENGTH && raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            Ok(Self(raw.to_ascii_lowercase()))
        } else {
            Err(DomainError::InvalidId(entity.to_string()))
        }
    }

    /// Wrap an id loaded from storage without re-validating it.
    pub fn from_trusted(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_24_hex_chars() {
        let id = RecordId::generate();
        assert_eq!(id.as_str().len(), 24);
        assert!(RecordId::parse(id.as_str(), "admin").is_ok());
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = RecordId::generate();
        let b = RecordId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn parse_normalizes_case() {
        let id = RecordId::parse("65A1B2C3D4E5F60718293A4B", "admin").unwrap();
        assert_eq!(id.as_str(), "65a1b2c3d4e5f60718293a4b");
    }

    #[test]
    fn parse_rejects_malformed_ids() {
        for raw in ["", "123", "zzzzzzzzzzzzzzzzzzzzzzzz", "65a1b2c3d4e5f60718293a4b0"] {
            let err = RecordId::parse(raw, "admin").unwrap_err();
            assert_eq!(err.to_string(), "Invalid admin ID format");
        }
    }
}
