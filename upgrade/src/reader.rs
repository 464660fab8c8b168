//! Boundary traits towards the chain and compiled artifacts, and the reader
//! that materializes the deployed facet set.
use std::future::Future;

use alloy_primitives::{Address, Selector};
use futures::future::try_join_all;

use crate::{selector::FacetInterface, Error};

/// A facet as reported by the proxy's introspection surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListedFacet {
    /// Address of the facet.
    pub address: Address,
    /// Selectors currently routed to the facet.
    pub selectors: Vec<Selector>,
}

/// A facet currently installed on the proxy, with its resolved name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployedFacet {
    /// Address of the facet.
    pub address: Address,
    /// Selectors currently routed to the facet.
    pub selectors: Vec<Selector>,
    /// Name reported by the facet's `getName()`.
    pub name: String,
}

/// Enumerates the facets installed on a diamond proxy.
pub trait ChainFacetLister {
    /// Failure of the underlying read.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Lists the facets of `proxy` together with their selectors.
    fn list_facets(
        &self,
        proxy: Address,
    ) -> impl Future<Output = Result<Vec<ListedFacet>, Self::Error>> + Send;
}

/// Resolves the human-readable name of a facet.
pub trait FacetNamer {
    /// Failure of the underlying read.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the name `facet` reports about itself.
    fn get_name(
        &self,
        facet: Address,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;
}

/// Supplies the function signatures of a facet, usually from compiled
/// artifact metadata.
pub trait ContractInterfaceProvider {
    /// Failure to locate or parse the interface.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the interface of the facet called `facet_name`.
    ///
    /// # Errors
    ///
    /// If the interface cannot be obtained.
    fn interface(&self, facet_name: &str)
        -> Result<FacetInterface, Self::Error>;
}

impl<T: ChainFacetLister + Sync> ChainFacetLister for &T {
    type Error = T::Error;

    fn list_facets(
        &self,
        proxy: Address,
    ) -> impl Future<Output = Result<Vec<ListedFacet>, Self::Error>> + Send
    {
        (**self).list_facets(proxy)
    }
}

impl<T: FacetNamer + Sync> FacetNamer for &T {
    type Error = T::Error;

    fn get_name(
        &self,
        facet: Address,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send {
        (**self).get_name(facet)
    }
}

/// Reads the facets currently installed on a proxy and names them.
#[derive(Clone, Debug)]
pub struct DeployedFacetReader<L, N> {
    lister: L,
    namer: N,
}

impl<L: ChainFacetLister, N: FacetNamer> DeployedFacetReader<L, N> {
    /// Creates a reader on top of the chain collaborators.
    pub fn new(lister: L, namer: N) -> Self {
        Self { lister, namer }
    }

    /// Lists the facets of `proxy` in the order the proxy reports them.
    ///
    /// Issues one listing call and one name call per facet. Nothing is
    /// retried.
    ///
    /// # Errors
    ///
    /// * [`Error::ChainReadFailure`] - If any of the reads fails.
    pub async fn list_facets(
        &self,
        proxy: Address,
    ) -> Result<Vec<DeployedFacet>, Error> {
        let listed =
            self.lister.list_facets(proxy).await.map_err(chain_read)?;
        let names = try_join_all(
            listed.iter().map(|facet| self.namer.get_name(facet.address)),
        )
        .await
        .map_err(chain_read)?;

        tracing::debug!(%proxy, facets = listed.len(), "read deployed facets");

        Ok(listed
            .into_iter()
            .zip(names)
            .map(|(facet, name)| DeployedFacet {
                address: facet.address,
                selectors: facet.selectors,
                name,
            })
            .collect())
    }
}

fn chain_read<E: std::error::Error + Send + Sync + 'static>(error: E) -> Error {
    Error::ChainReadFailure(Box::new(error))
}
