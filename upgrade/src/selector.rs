//! Derivation of 4-byte function selectors from facet interfaces.
use std::collections::HashSet;

use alloy_primitives::{keccak256, Selector};

/// Signature of the introspection function every facet exposes.
///
/// It is infrastructure rather than routable logic, so it never appears in a
/// facet cut.
pub const RESERVED_SIGNATURE: &str = "getName()";

/// Ordered list of canonical function signatures (`name(type,...)`) exposed
/// by a facet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FacetInterface {
    signatures: Vec<String>,
}

impl FacetInterface {
    /// Creates an interface from its function signatures.
    pub fn new<I, S>(signatures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { signatures: signatures.into_iter().map(Into::into).collect() }
    }

    /// Function signatures in declaration order.
    #[must_use]
    pub fn signatures(&self) -> &[String] {
        &self.signatures
    }

    /// Returns `true` if the interface declares no functions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for FacetInterface {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::new(iter)
    }
}

/// Computes the selector of a canonical function `signature`: the first four
/// bytes of its keccak-256 hash.
#[must_use]
pub fn selector(signature: &str) -> Selector {
    Selector::from_slice(&keccak256(signature.as_bytes())[..4])
}

/// Returns the routable selectors of `interface`.
///
/// [`RESERVED_SIGNATURE`] is excluded and repeated selectors keep only their
/// first occurrence. An empty interface yields an empty vector.
#[must_use]
pub fn selectors(interface: &FacetInterface) -> Vec<Selector> {
    let mut seen = HashSet::new();
    interface
        .signatures()
        .iter()
        .map(|signature| signature.trim())
        .filter(|signature| *signature != RESERVED_SIGNATURE)
        .map(selector)
        .filter(|selector| seen.insert(*selector))
        .collect()
}
