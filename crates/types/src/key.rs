use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Opaque identifier of an outstanding withdrawal request at a target.
///
/// The all-zero value is reserved: it means the request settled synchronously
/// and no obligation exists. Targets never issue it as a real key.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObligationKey([u8; 32]);

impl ObligationKey {
    pub const ZERO: ObligationKey = ObligationKey([0u8; 32]);

    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Key whose last eight bytes hold `n` big-endian
    pub fn from_u64(n: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&n.to_be_bytes());
        Self(bytes)
    }

    /// Derive a key by hashing the given parts in order
    pub fn derive(parts: &[&[u8]]) -> Self {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update((part.len() as u64).to_be_bytes());
            hasher.update(part);
        }
        Self(hasher.finalize().into())
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ObligationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl FromStr for ObligationKey {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(digits, &mut bytes)?;
        Ok(Self(bytes))
    }
}

// Hex strings so keys can index JSON maps in persisted state
impl Serialize for ObligationKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ObligationKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

impl fmt::Debug for ObligationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObligationKey({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sentinel() {
        assert!(ObligationKey::ZERO.is_zero());
        assert!(ObligationKey::default().is_zero());
        assert!(!ObligationKey::from_u64(1).is_zero());
    }

    #[test]
    fn test_derive_is_length_prefixed() {
        let a = ObligationKey::derive(&[b"ab", b"c"]);
        let b = ObligationKey::derive(&[b"a", b"bc"]);
        assert_ne!(a, b);
        assert_eq!(a, ObligationKey::derive(&[b"ab", b"c"]));
    }

    #[test]
    fn test_display_is_prefixed_hex() {
        let key = ObligationKey::from_u64(255);
        let shown = key.to_string();
        assert!(shown.starts_with("0x"));
        assert!(shown.ends_with("ff"));
        assert_eq!(shown.len(), 2 + 64);
    }

    #[test]
    fn test_serializes_as_hex_string() {
        let key = ObligationKey::from_u64(42);
        let json = serde_json::to_string(&key).unwrap();
        assert!(json.starts_with("\"0x"));
        let back: ObligationKey = serde_json::from_str(&json).unwrap();
        assert_eq!(key, back);
    }

    #[test]
    fn test_parse_rejects_wrong_width() {
        assert!("0xabcd".parse::<ObligationKey>().is_err());
        assert!("zz".repeat(32).parse::<ObligationKey>().is_err());
        let key: ObligationKey = "11".repeat(32).parse().unwrap();
        assert_eq!(key.as_bytes(), &[0x11u8; 32]);
    }
}
