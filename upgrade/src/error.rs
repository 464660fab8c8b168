use alloy_primitives::Address;

/// Boxed error produced by an external collaborator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An error produced while planning a diamond upgrade or handling protocol
/// versions.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A non-zero major version was supplied to the packer.
    #[error("major version must be 0, got {0}")]
    InvalidVersion(u64),
    /// A dotted version string is not exactly three unsigned integers.
    #[error("malformed version string `{0}`, expected `major.minor.patch`")]
    MalformedVersionString(String),
    /// The packed version does not fit into 64 bits.
    #[error("protocol version overflows 64 bits")]
    VersionOverflow,
    /// A facet address failed address-format validation.
    #[error("invalid facet address `{0}`")]
    InvalidAddress(String),
    /// A facet scheduled for addition has no routable selectors.
    #[error("facet `{facet}` at {address} has no routable selectors")]
    EmptySelectorSet {
        /// Name of the facet.
        facet: String,
        /// Address the facet was about to be added from.
        address: Address,
    },
    /// The interface of a facet could not be obtained.
    #[error("interface of facet `{facet}` is unavailable")]
    InterfaceUnavailable {
        /// Name of the facet.
        facet: String,
        /// Underlying failure.
        #[source]
        source: BoxError,
    },
    /// Reading the deployed facets failed. Never retried.
    #[error("failed to read deployed facets")]
    ChainReadFailure(#[source] BoxError),
}
