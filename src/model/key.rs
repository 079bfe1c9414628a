//! Key roles, key summaries and generated key pairs

use std::fmt;

use super::blob::{ArmoredBlob, Classification};

/// Which half of a key pair an operation needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyRole {
    Public,
    Private,
}

impl KeyRole {
    /// The armor classification a key of this role must carry.
    pub fn expected_classification(self) -> Classification {
        match self {
            KeyRole::Public => Classification::PublicKey,
            KeyRole::Private => Classification::PrivateKey,
        }
    }
}

impl fmt::Display for KeyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyRole::Public => f.write_str("public"),
            KeyRole::Private => f.write_str("private"),
        }
    }
}

/// Identifying details of a parsed key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfo {
    /// Primary key fingerprint.
    pub fingerprint: String,
    /// Primary key id as lowercase hex.
    pub key_id: String,
    /// User ids bound to the key, in key order.
    pub user_ids: Vec<String>,
    /// Whether the parsed block carried secret key material.
    pub has_secret: bool,
}

/// Output of key generation. Both halves are produced together or not at all.
#[derive(Debug)]
pub struct GeneratedKeys {
    pub public: ArmoredBlob,
    pub private: ArmoredBlob,
}
