/*!
# Diamond Upgrade

Computes the diamond cut needed to move a live diamond proxy from its
currently deployed facets to a desired facet set, and encodes protocol
versions for on-chain storage.

> Note that `diamond-upgrade` is still `0.*.*`, so breaking changes
> [may occur at any time](https://semver.org/#spec-item-4).

## Planning an upgrade

```ignore
use diamond_upgrade::{
    reader::DeployedFacetReader,
    reconcile::{DesiredFacets, ReconciliationEngine, ReplacementPolicy},
};

let reader = DeployedFacetReader::new(&lister, &namer);
let engine = ReconciliationEngine::new(reader);
let cuts = engine
    .reconcile(&desired, proxy, &ReplacementPolicy::FullReplace)
    .await?;
```

The returned cuts always list removals before additions, and additions follow
the canonical role order: admin, getters, mailbox, executor.

## Protocol versions

[`semver`] packs `0.minor.patch` into a single integer as
`minor * 2^32 + patch`.
*/

#![allow(clippy::module_name_repetitions)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod abi;
mod error;
pub mod facet;
pub mod reader;
pub mod reconcile;
pub mod selector;
pub mod semver;
#[cfg(test)]
pub(crate) mod test_utils;

pub use error::{BoxError, Error};
pub use facet::{diamond_cut, facet_cut, Action, DiamondCut, FacetCut};
pub use reconcile::{
    DesiredFacets, FacetAddresses, FacetDescriptor, FacetRole,
    ReconciliationEngine, ReplacementPolicy,
};
pub use selector::{selectors, FacetInterface};
pub use semver::ProtocolVersion;
