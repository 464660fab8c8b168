//! Plans a diamond proxy upgrade from the environment and prints the
//! ABI-encoded `DiamondCutData` on stdout.
use alloy::hex;
use diamond_chain::{
    connect, ArtifactInterfaceProvider, ChainReader, UpgradeConfig,
};
use diamond_upgrade::{
    diamond_cut, reader::DeployedFacetReader, DesiredFacets,
    ReconciliationEngine,
};
use eyre::Context;
use tracing_subscriber::{
    layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = UpgradeConfig::from_env()?;

    let artifacts = ArtifactInterfaceProvider::new(&config.artifacts_dir);
    let desired = DesiredFacets::load(&config.facets, &artifacts)
        .wrap_err("failed to load desired facets")?;

    let chain = ChainReader::new(connect(config.rpc_url.clone()));
    let engine =
        ReconciliationEngine::new(DeployedFacetReader::new(&chain, &chain));

    let cuts = tokio::time::timeout(
        config.read_timeout,
        engine.reconcile(&desired, config.proxy, &config.policy),
    )
    .await
    .wrap_err_with(|| {
        format!("facet reads timed out after {:?}", config.read_timeout)
    })?
    .wrap_err("failed to compute facet cuts")?;

    for cut in &cuts {
        tracing::info!(
            facet = %cut.facet,
            action = ?cut.action,
            freezable = cut.is_freezable,
            selectors = cut.selectors.len(),
            "facet cut"
        );
    }

    let payload =
        diamond_cut(cuts, config.init_address, config.init_calldata.clone());
    println!("{}", hex::encode_prefixed(payload.abi_encode()));

    if let Some(bump) = config.version_bump {
        let next = bump.next()?;
        tracing::info!(
            current = %bump.current,
            next = %next,
            packed = next.packed(),
            "protocol version bump"
        );
        println!(
            "{} ({}) -> {} ({})",
            bump.current,
            bump.current.packed(),
            next,
            next.packed()
        );
    }

    Ok(())
}
