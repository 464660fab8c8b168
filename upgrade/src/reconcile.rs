//! Reconciliation of the desired facet set against the facets deployed on a
//! diamond proxy.
//!
//! Upgrades are done by full replacement: every facet scheduled for removal is
//! removed with all of its deployed selectors, and the new version is added
//! from scratch. No selector-level [`Action::Replace`] detection is attempted,
//! so a changed facet always costs two cuts.
use std::{collections::BTreeSet, fmt};

use alloy_primitives::Address;

use crate::{
    facet::{Action, FacetCut},
    reader::{
        ChainFacetLister, ContractInterfaceProvider, DeployedFacetReader,
        FacetNamer,
    },
    selector::FacetInterface,
    Error,
};

/// Built-in facet roles, declared in canonical cut order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FacetRole {
    /// Upgradability and administration. Owns the unfreeze capability.
    Admin,
    /// Read-only getters.
    Getters,
    /// Cross-domain messaging.
    Mailbox,
    /// State-transition execution.
    Executor,
}

impl FacetRole {
    /// All roles in canonical order.
    pub const ALL: [FacetRole; 4] =
        [Self::Admin, Self::Getters, Self::Mailbox, Self::Executor];

    /// Name the role's facet reports through `getName()`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Admin => "AdminFacet",
            Self::Getters => "GettersFacet",
            Self::Mailbox => "MailboxFacet",
            Self::Executor => "ExecutorFacet",
        }
    }

    /// Whether the role's selectors are disabled while the proxy is frozen.
    ///
    /// Admin and getters stay callable on a frozen proxy.
    #[must_use]
    pub const fn is_freezable(self) -> bool {
        match self {
            Self::Admin | Self::Getters => false,
            Self::Mailbox | Self::Executor => true,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FacetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A facet of the desired state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FacetDescriptor {
    /// Facet name, as reported by `getName()`.
    pub name: String,
    /// Address the new facet is deployed at.
    pub address: Address,
    /// Interface the selectors are derived from.
    pub interface: FacetInterface,
    /// Whether the freeze switch disables the facet.
    pub is_freezable: bool,
}

impl FacetDescriptor {
    /// Describes the facet filling `role`, with the role's fixed name and
    /// freezability.
    #[must_use]
    pub fn for_role(
        role: FacetRole,
        address: Address,
        interface: FacetInterface,
    ) -> Self {
        Self {
            name: role.name().to_owned(),
            address,
            interface,
            is_freezable: role.is_freezable(),
        }
    }
}

/// Addresses of newly deployed facets, per role. A `None` role is skipped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FacetAddresses {
    /// New admin facet.
    pub admin: Option<Address>,
    /// New getters facet.
    pub getters: Option<Address>,
    /// New mailbox facet.
    pub mailbox: Option<Address>,
    /// New executor facet.
    pub executor: Option<Address>,
}

impl FacetAddresses {
    /// Address supplied for `role`.
    #[must_use]
    pub fn get(&self, role: FacetRole) -> Option<Address> {
        match role {
            FacetRole::Admin => self.admin,
            FacetRole::Getters => self.getters,
            FacetRole::Mailbox => self.mailbox,
            FacetRole::Executor => self.executor,
        }
    }
}

/// The desired facet set, one optional facet per [`FacetRole`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DesiredFacets {
    facets: [Option<FacetDescriptor>; 4],
}

impl DesiredFacets {
    /// Creates an empty desired set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Populates `role` with the facet at `address` exposing `interface`.
    #[must_use]
    pub fn with(
        mut self,
        role: FacetRole,
        address: Address,
        interface: FacetInterface,
    ) -> Self {
        self.facets[role.index()] =
            Some(FacetDescriptor::for_role(role, address, interface));
        self
    }

    /// Builds the desired set for every role with an address in
    /// `addresses`, fetching interfaces from `provider`.
    ///
    /// # Errors
    ///
    /// * [`Error::InterfaceUnavailable`] - If `provider` fails for a
    ///   populated role.
    pub fn load<P: ContractInterfaceProvider>(
        addresses: &FacetAddresses,
        provider: &P,
    ) -> Result<Self, Error> {
        FacetRole::ALL.into_iter().try_fold(Self::new(), |desired, role| {
            let Some(address) = addresses.get(role) else {
                return Ok(desired);
            };
            let interface = provider.interface(role.name()).map_err(|e| {
                Error::InterfaceUnavailable {
                    facet: role.name().to_owned(),
                    source: Box::new(e),
                }
            })?;
            Ok(desired.with(role, address, interface))
        })
    }

    /// Facet filling `role`, if any.
    #[must_use]
    pub fn get(&self, role: FacetRole) -> Option<&FacetDescriptor> {
        self.facets[role.index()].as_ref()
    }

    /// Populated facets in canonical role order.
    pub fn descriptors(&self) -> impl Iterator<Item = &FacetDescriptor> {
        self.facets.iter().flatten()
    }

    /// Names of the populated facets.
    #[must_use]
    pub fn names(&self) -> BTreeSet<String> {
        self.descriptors().map(|facet| facet.name.clone()).collect()
    }
}

/// Which deployed facets are removed before the desired ones are added.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ReplacementPolicy {
    /// Remove every deployed facet whose name is in the desired set.
    #[default]
    FullReplace,
    /// Remove exactly the deployed facets with these names.
    Explicit(BTreeSet<String>),
}

impl ReplacementPolicy {
    /// Explicit policy removing the facets called `names`.
    pub fn explicit<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Explicit(names.into_iter().map(Into::into).collect())
    }

    /// Names of the facets to remove when upgrading to `desired`.
    #[must_use]
    pub fn removal_set(&self, desired: &DesiredFacets) -> BTreeSet<String> {
        match self {
            Self::FullReplace => desired.names(),
            Self::Explicit(names) => names.clone(),
        }
    }
}

/// Computes the facet cuts upgrading a proxy to a desired facet set.
#[derive(Clone, Debug)]
pub struct ReconciliationEngine<L, N> {
    reader: DeployedFacetReader<L, N>,
}

impl<L: ChainFacetLister, N: FacetNamer> ReconciliationEngine<L, N> {
    /// Creates an engine reading the deployed state through `reader`.
    pub fn new(reader: DeployedFacetReader<L, N>) -> Self {
        Self { reader }
    }

    /// Returns the ordered cuts moving `proxy` to `desired`: removals of the
    /// facets selected by `policy`, followed by additions of every populated
    /// role in canonical order.
    ///
    /// Removal targets that are not deployed are skipped with a warning.
    ///
    /// # Errors
    ///
    /// * [`Error::EmptySelectorSet`] - If a desired facet has no routable
    ///   selectors.
    /// * [`Error::ChainReadFailure`] - If reading the deployed facets fails.
    pub async fn reconcile(
        &self,
        desired: &DesiredFacets,
        proxy: Address,
        policy: &ReplacementPolicy,
    ) -> Result<Vec<FacetCut>, Error> {
        let additions = additions(desired)?;
        let removals =
            self.removals(proxy, &policy.removal_set(desired)).await?;

        tracing::debug!(
            %proxy,
            removals = removals.len(),
            additions = additions.len(),
            "computed facet cuts"
        );

        Ok(removals.into_iter().chain(additions).collect())
    }

    async fn removals(
        &self,
        proxy: Address,
        names: &BTreeSet<String>,
    ) -> Result<Vec<FacetCut>, Error> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let deployed = self.reader.list_facets(proxy).await?;

        for name in names {
            if !deployed.iter().any(|facet| &facet.name == name) {
                tracing::warn!(
                    %proxy,
                    facet = %name,
                    "facet scheduled for removal is not deployed, skipping"
                );
            }
        }

        Ok(deployed
            .into_iter()
            .filter(|facet| names.contains(&facet.name))
            .filter(|facet| {
                let routable = !facet.selectors.is_empty();
                if !routable {
                    tracing::debug!(
                        facet = %facet.name,
                        address = %facet.address,
                        "deployed facet has no selectors to remove"
                    );
                }
                routable
            })
            .map(|facet| FacetCut::remove(facet.selectors))
            .collect())
    }
}

fn additions(desired: &DesiredFacets) -> Result<Vec<FacetCut>, Error> {
    desired
        .descriptors()
        .map(|facet| {
            let cut = FacetCut::new(
                facet.address,
                &facet.interface,
                Action::Add,
                facet.is_freezable,
            );
            if cut.selectors.is_empty() {
                return Err(Error::EmptySelectorSet {
                    facet: facet.name.clone(),
                    address: facet.address,
                });
            }
            Ok(cut)
        })
        .collect()
}
