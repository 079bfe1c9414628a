//! Armored text blobs and their structural classification

use std::fmt;
use std::sync::OnceLock;

use crate::core::armor::ArmorClassifier;

/// What kind of OpenPGP block a piece of text holds, judged from its armor markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    PublicKey,
    PrivateKey,
    PgpMessage,
    ClearSignedMessage,
    Unrecognized,
}

impl Classification {
    /// True for either key block kind.
    pub fn is_key(self) -> bool {
        matches!(self, Classification::PublicKey | Classification::PrivateKey)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Classification::PublicKey => "a public key block",
            Classification::PrivateKey => "a private key block",
            Classification::PgpMessage => "a PGP message",
            Classification::ClearSignedMessage => "a clear-signed message",
            Classification::Unrecognized => "unrecognized text",
        };
        f.write_str(name)
    }
}

/// Immutable armored text read for a single operation.
///
/// The classification is computed on first request and cached, so a blob is
/// inspected at most once no matter how many gates consult it.
pub struct ArmoredBlob {
    text: String,
    classification: OnceLock<Classification>,
}

impl ArmoredBlob {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            classification: OnceLock::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn classification(&self) -> Classification {
        *self
            .classification
            .get_or_init(|| ArmorClassifier::classify(&self.text))
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

// Armored key text is never printed, only its size and kind.
impl fmt::Debug for ArmoredBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArmoredBlob")
            .field("len", &self.text.len())
            .field("classification", &self.classification.get())
            .finish()
    }
}
