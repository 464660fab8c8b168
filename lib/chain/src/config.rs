//! Environment configuration of an upgrade plan.
use std::{path::PathBuf, str::FromStr, time::Duration};

use alloy::{
    hex,
    primitives::{Address, Bytes},
    transports::http::reqwest::Url,
};
use diamond_upgrade::{
    facet::parse_address, FacetAddresses, ProtocolVersion, ReplacementPolicy,
};
use eyre::{Context, ContextCompat};

/// JSON-RPC endpoint. Only the first entry of a comma-separated list is used.
pub const RPC_URL: &str = "RPC_URL";
/// The diamond proxy to upgrade.
pub const DIAMOND_PROXY_ADDR: &str = "DIAMOND_PROXY_ADDR";
/// New admin facet.
pub const ADMIN_FACET_ADDR: &str = "ADMIN_FACET_ADDR";
/// New getters facet.
pub const GETTERS_FACET_ADDR: &str = "GETTERS_FACET_ADDR";
/// New mailbox facet.
pub const MAILBOX_FACET_ADDR: &str = "MAILBOX_FACET_ADDR";
/// New executor facet.
pub const EXECUTOR_FACET_ADDR: &str = "EXECUTOR_FACET_ADDR";
/// Comma-separated names of the facets to remove.
pub const FACETS_TO_REMOVE: &str = "FACETS_TO_REMOVE";
/// Root of the compiled artifacts.
pub const ARTIFACTS_DIR: &str = "ARTIFACTS_DIR";
/// Contract delegate-called after the cut.
pub const DIAMOND_INIT_ADDR: &str = "DIAMOND_INIT_ADDR";
/// Hex calldata of the initialization call.
pub const DIAMOND_INIT_CALLDATA: &str = "DIAMOND_INIT_CALLDATA";
/// Bound on the chain reads, in seconds.
pub const READ_TIMEOUT_SECS: &str = "READ_TIMEOUT_SECS";
/// Current protocol version, `0.minor.patch`.
pub const PROTOCOL_VERSION: &str = "PROTOCOL_VERSION";
/// Minor increment of the protocol version.
pub const PROTOCOL_MINOR_BUMP: &str = "PROTOCOL_MINOR_BUMP";
/// Patch increment of the protocol version.
pub const PROTOCOL_PATCH_BUMP: &str = "PROTOCOL_PATCH_BUMP";

const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(60);

/// Protocol version bump requested alongside the cut.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VersionBump {
    /// Version currently stored on-chain.
    pub current: ProtocolVersion,
    /// Added to the minor part.
    pub minor: u64,
    /// Added to the patch part.
    pub patch: u64,
}

impl VersionBump {
    /// The bumped protocol version.
    ///
    /// # Errors
    ///
    /// If the bumped version overflows.
    pub fn next(&self) -> eyre::Result<ProtocolVersion> {
        self.current
            .increment(self.minor, self.patch)
            .wrap_err("failed to bump protocol version")
    }
}

/// Everything needed to plan a diamond upgrade.
#[derive(Clone, Debug)]
pub struct UpgradeConfig {
    /// JSON-RPC endpoint.
    pub rpc_url: Url,
    /// The diamond proxy to upgrade.
    pub proxy: Address,
    /// New facets per role.
    pub facets: FacetAddresses,
    /// Facets removed before the new ones are added.
    pub policy: ReplacementPolicy,
    /// Root of the compiled artifacts.
    pub artifacts_dir: PathBuf,
    /// Contract delegate-called after the cut, or zero.
    pub init_address: Address,
    /// Calldata of the initialization call.
    pub init_calldata: Bytes,
    /// Bound on the chain reads.
    pub read_timeout: Duration,
    /// Optional protocol version bump.
    pub version_bump: Option<VersionBump>,
}

impl UpgradeConfig {
    /// Loads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// If a required variable is missing or a value fails to parse.
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads the configuration from `lookup`. Empty values count as unset.
    ///
    /// # Errors
    ///
    /// If a required variable is missing or a value fails to parse.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> eyre::Result<Self> {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };
        let address = |name: &str| -> eyre::Result<Option<Address>> {
            var(name)
                .map(|value| {
                    parse_address(&value)
                        .wrap_err_with(|| format!("failed to parse {name}"))
                })
                .transpose()
        };

        let rpc_url = var(RPC_URL)
            .wrap_err_with(|| format!("failed to load {RPC_URL}"))?;
        let rpc_url = rpc_url.split(',').next().unwrap_or_default().trim();
        let rpc_url = Url::from_str(rpc_url)
            .wrap_err_with(|| format!("failed to parse {RPC_URL}"))?;

        let proxy = address(DIAMOND_PROXY_ADDR)?
            .wrap_err_with(|| format!("failed to load {DIAMOND_PROXY_ADDR}"))?;

        let facets = FacetAddresses {
            admin: address(ADMIN_FACET_ADDR)?,
            getters: address(GETTERS_FACET_ADDR)?,
            mailbox: address(MAILBOX_FACET_ADDR)?,
            executor: address(EXECUTOR_FACET_ADDR)?,
        };

        let policy = var(FACETS_TO_REMOVE).map_or(
            ReplacementPolicy::FullReplace,
            |names| {
                ReplacementPolicy::explicit(
                    names
                        .split(',')
                        .map(str::trim)
                        .filter(|name| !name.is_empty()),
                )
            },
        );

        let artifacts_dir = var(ARTIFACTS_DIR).map_or_else(
            || PathBuf::from(DEFAULT_ARTIFACTS_DIR),
            PathBuf::from,
        );

        let init_address = address(DIAMOND_INIT_ADDR)?.unwrap_or(Address::ZERO);
        let init_calldata = var(DIAMOND_INIT_CALLDATA)
            .map(|calldata| {
                hex::decode(&calldata).map(Bytes::from).wrap_err_with(|| {
                    format!("failed to decode {DIAMOND_INIT_CALLDATA}")
                })
            })
            .transpose()?
            .unwrap_or_default();

        let read_timeout = var(READ_TIMEOUT_SECS)
            .map(|secs| {
                secs.parse::<u64>()
                    .map(Duration::from_secs)
                    .wrap_err_with(|| {
                        format!("failed to parse {READ_TIMEOUT_SECS}")
                    })
            })
            .transpose()?
            .unwrap_or(DEFAULT_READ_TIMEOUT);

        let version_bump = var(PROTOCOL_VERSION)
            .map(|version| -> eyre::Result<VersionBump> {
                let bump = |name: &str| -> eyre::Result<u64> {
                    var(name).map_or(Ok(0), |value| {
                        value
                            .parse()
                            .wrap_err_with(|| format!("failed to parse {name}"))
                    })
                };
                Ok(VersionBump {
                    current: version.parse().wrap_err_with(|| {
                        format!("failed to parse {PROTOCOL_VERSION}")
                    })?,
                    minor: bump(PROTOCOL_MINOR_BUMP)?,
                    patch: bump(PROTOCOL_PATCH_BUMP)?,
                })
            })
            .transpose()?;

        Ok(Self {
            rpc_url,
            proxy,
            facets,
            policy,
            artifacts_dir,
            init_address,
            init_calldata,
            read_timeout,
            version_bump,
        })
    }
}
