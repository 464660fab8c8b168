//! ABI encoding of the diamond cut payload.
//!
//! The layout mirrors the proxy's `Diamond.DiamondCutData` struct, so the
//! encoded bytes can be passed verbatim to upgrade transactions.
use alloy_sol_types::SolValue;
pub use sol::DiamondCutData;

use crate::facet::{self, DiamondCut, FacetCut};

/// Solidity-side types of the payload.
pub mod sol {
    use alloy_sol_types::sol;

    sol! {
        /// Diamond cut action as stored on-chain.
        #[derive(Debug, PartialEq, Eq)]
        #[allow(missing_docs)]
        enum Action {
            Add,
            Replace,
            Remove,
        }

        /// On-chain representation of a facet cut.
        #[derive(Debug, PartialEq, Eq)]
        #[allow(missing_docs)]
        struct FacetCut {
            address facet;
            Action action;
            bool isFreezable;
            bytes4[] selectors;
        }

        /// On-chain representation of a diamond cut.
        #[derive(Debug, PartialEq, Eq)]
        #[allow(missing_docs)]
        struct DiamondCutData {
            FacetCut[] facetCuts;
            address initAddress;
            bytes initCalldata;
        }
    }
}

impl From<facet::Action> for sol::Action {
    fn from(action: facet::Action) -> Self {
        match action {
            facet::Action::Add => Self::Add,
            facet::Action::Replace => Self::Replace,
            facet::Action::Remove => Self::Remove,
        }
    }
}

impl From<&FacetCut> for sol::FacetCut {
    fn from(cut: &FacetCut) -> Self {
        Self {
            facet: cut.facet,
            action: cut.action.into(),
            isFreezable: cut.is_freezable,
            selectors: cut.selectors.clone(),
        }
    }
}

impl From<&DiamondCut> for DiamondCutData {
    fn from(cut: &DiamondCut) -> Self {
        Self {
            facetCuts: cut.facet_cuts.iter().map(Into::into).collect(),
            initAddress: cut.init_address,
            initCalldata: cut.init_calldata.clone(),
        }
    }
}

impl DiamondCut {
    /// Returns `abi.encode(diamondCutData)` for this payload.
    #[must_use]
    pub fn abi_encode(&self) -> Vec<u8> {
        DiamondCutData::from(self).abi_encode()
    }
}
