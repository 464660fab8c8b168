use alloy::{
    primitives::Address,
    providers::{Provider, ProviderBuilder},
    sol,
    transports::http::reqwest::Url,
};
use diamond_upgrade::reader::{ChainFacetLister, FacetNamer, ListedFacet};

sol!(
    #[sol(rpc)]
    interface IGetters {
        struct Facet {
            address addr;
            bytes4[] selectors;
        }

        function facets() external view returns (Facet[] memory);
    }

    #[sol(rpc)]
    interface IZKChainBase {
        function getName() external view returns (string memory);
    }
);

/// Connects to the JSON-RPC endpoint at `url`.
pub fn connect(url: Url) -> impl Provider + Clone {
    ProviderBuilder::new().connect_http(url)
}

/// Reads facet data from a diamond proxy through an `alloy` provider.
#[derive(Clone, Debug)]
pub struct ChainReader<P> {
    provider: P,
}

impl<P: Provider> ChainReader<P> {
    /// Creates a reader issuing calls through `provider`.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

impl<P: Provider> ChainFacetLister for ChainReader<P> {
    type Error = alloy::contract::Error;

    async fn list_facets(
        &self,
        proxy: Address,
    ) -> Result<Vec<ListedFacet>, Self::Error> {
        let getters = IGetters::new(proxy, &self.provider);
        let facets = getters.facets().call().await?;

        tracing::debug!(%proxy, facets = facets.len(), "listed facets");

        Ok(facets
            .into_iter()
            .map(|facet| ListedFacet {
                address: facet.addr,
                selectors: facet.selectors,
            })
            .collect())
    }
}

impl<P: Provider> FacetNamer for ChainReader<P> {
    type Error = alloy::contract::Error;

    async fn get_name(&self, facet: Address) -> Result<String, Self::Error> {
        let base = IZKChainBase::new(facet, &self.provider);
        let name = base.getName().call().await?;

        tracing::debug!(%facet, %name, "resolved facet name");

        Ok(name)
    }
}
