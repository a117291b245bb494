//! Atoms: the normalized fact tokens the engine reasons over.
//!
//! An [`Atom`] is an opaque propositional token. Identity is the normalized
//! text: surrounding whitespace is trimmed and inner runs are collapsed to a
//! single space. Case is preserved, since rule sets routinely distinguish
//! `a` (a triangle side) from `A` (the opposite angle).

use serde::{Deserialize, Serialize};

/// A normalized propositional token.
///
/// Construct via [`Atom::new`], which rejects text that normalizes to
/// nothing. Equality, ordering and hashing all follow the normalized text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Atom(String);

impl Atom {
    /// Normalize `raw` and wrap it. Returns `None` if nothing remains after
    /// normalization.
    pub fn new(raw: &str) -> Option<Self> {
        let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if normalized.is_empty() {
            None
        } else {
            Some(Atom(normalized))
        }
    }

    /// The normalized text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Atom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Atom {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
