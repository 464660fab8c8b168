//! Facet cut records: instructions that mutate the proxy's selector routing
//! table.
use std::str::FromStr;

use alloy_primitives::{Address, Bytes, Selector};

use crate::{
    selector::{selectors, FacetInterface},
    Error,
};

/// Action a [`FacetCut`] applies to its selectors.
///
/// The discriminants are the on-chain `uint8` enumerants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Action {
    /// Route new selectors to the facet.
    Add = 0,
    /// Re-route already registered selectors to the facet.
    Replace = 1,
    /// Unregister the selectors.
    Remove = 2,
}

impl From<Action> for u8 {
    fn from(action: Action) -> Self {
        action as u8
    }
}

/// An instruction to mutate the proxy's function-routing table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FacetCut {
    /// Logic contract providing the selectors. Zero for [`Action::Remove`].
    pub facet: Address,
    /// Selectors affected by this cut, in order and without duplicates.
    pub selectors: Vec<Selector>,
    /// What to do with the selectors.
    pub action: Action,
    /// Whether the proxy's freeze switch disables these selectors.
    pub is_freezable: bool,
}

impl FacetCut {
    /// Builds a cut routing the selectors of `interface` through `facet`.
    #[must_use]
    pub fn new(
        facet: Address,
        interface: &FacetInterface,
        action: Action,
        is_freezable: bool,
    ) -> Self {
        Self { facet, selectors: selectors(interface), action, is_freezable }
    }

    /// Builds a cut removing `selectors` from the routing table.
    ///
    /// Freezability has no meaning for removals and is always `false`.
    #[must_use]
    pub fn remove(selectors: Vec<Selector>) -> Self {
        Self {
            facet: Address::ZERO,
            selectors,
            action: Action::Remove,
            is_freezable: false,
        }
    }
}

/// Builds a [`FacetCut`] from a textual facet `address`.
///
/// # Errors
///
/// * [`Error::InvalidAddress`] - If `address` is not a valid address.
pub fn facet_cut(
    address: &str,
    interface: &FacetInterface,
    action: Action,
    is_freezable: bool,
) -> Result<FacetCut, Error> {
    let facet = parse_address(address)?;
    Ok(FacetCut::new(facet, interface, action, is_freezable))
}

/// Parses a 20-byte address given as 40 hex digits, optionally `0x`-prefixed.
///
/// Mixed-case input must carry a valid EIP-55 checksum.
///
/// # Errors
///
/// * [`Error::InvalidAddress`] - If `address` is malformed or its checksum
///   does not match.
pub fn parse_address(address: &str) -> Result<Address, Error> {
    let invalid = || Error::InvalidAddress(address.to_owned());

    let digits = address.strip_prefix("0x").unwrap_or(address);
    if digits.len() != 40 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let mixed_case = digits.bytes().any(|b| b.is_ascii_lowercase())
        && digits.bytes().any(|b| b.is_ascii_uppercase());
    if mixed_case {
        let checksummed = format!("0x{digits}");
        return Address::parse_checksummed(checksummed, None)
            .map_err(|_| invalid());
    }

    Address::from_str(digits).map_err(|_| invalid())
}

/// The canonical diamond cut payload: facet cuts plus an optional
/// initialization delegate call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiamondCut {
    /// Cuts, applied in order.
    pub facet_cuts: Vec<FacetCut>,
    /// Contract delegate-called after the cuts, or zero.
    pub init_address: Address,
    /// Calldata of the initialization call.
    pub init_calldata: Bytes,
}

/// Bundles `facet_cuts` with the initialization call into a [`DiamondCut`].
#[must_use]
pub fn diamond_cut(
    facet_cuts: Vec<FacetCut>,
    init_address: Address,
    init_calldata: Bytes,
) -> DiamondCut {
    DiamondCut { facet_cuts, init_address, init_calldata }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::selector;

    const ADMIN: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

    #[test]
    fn builds_add_cut_from_interface() {
        let interface =
            FacetInterface::new(["getName()", "setPendingAdmin(address)"]);

        let cut = facet_cut(ADMIN, &interface, Action::Add, false)
            .expect("should build a facet cut");

        assert_eq!(cut.facet, parse_address(ADMIN).unwrap());
        assert_eq!(cut.selectors, vec![selector("setPendingAdmin(address)")]);
        assert_eq!(cut.action, Action::Add);
        assert!(!cut.is_freezable);
    }

    #[test]
    fn rejects_malformed_addresses() {
        let interface = FacetInterface::new(["getAdmin()"]);

        for address in [
            "",
            "0x",
            "0x1234",
            "0xZZbDB2315678afecb367f032d93F642f64180aa3",
            "0x5FbDB2315678afecb367f032d93F642f64180aa300",
        ] {
            let err = facet_cut(address, &interface, Action::Add, false)
                .expect_err("should reject address");
            assert!(matches!(err, Error::InvalidAddress(a) if a == address));
        }
    }

    #[test]
    fn rejects_bad_checksum() {
        let err = parse_address("0x5fbDB2315678afecb367f032d93F642f64180aa3")
            .expect_err("should reject bad checksum");
        assert!(matches!(err, Error::InvalidAddress(_)));
    }

    #[test]
    fn accepts_single_case_and_bare_addresses() {
        let expected = parse_address(ADMIN).unwrap();

        assert_eq!(parse_address(&ADMIN.to_lowercase()).unwrap(), expected);
        assert_eq!(
            parse_address("0x5FBDB2315678AFECB367F032D93F642F64180AA3")
                .unwrap(),
            expected
        );
        assert_eq!(parse_address(&ADMIN[2..]).unwrap(), expected);
    }

    #[test]
    fn remove_cut_targets_zero_address() {
        let cut = FacetCut::remove(vec![selector("getAdmin()")]);

        assert_eq!(cut.facet, Address::ZERO);
        assert_eq!(cut.action, Action::Remove);
        assert!(!cut.is_freezable);
    }

    #[test]
    fn action_enumerants_match_chain() {
        assert_eq!(u8::from(Action::Add), 0);
        assert_eq!(u8::from(Action::Replace), 1);
        assert_eq!(u8::from(Action::Remove), 2);
    }
}
