//! In-memory chain fixtures for reconciliation tests.
use std::{
    collections::HashMap,
    convert::Infallible,
    io,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use alloy_primitives::{address, Address};

use crate::{
    reader::{
        ChainFacetLister, ContractInterfaceProvider, FacetNamer, ListedFacet,
    },
    selector::{selector, FacetInterface},
};

#[derive(Debug, thiserror::Error)]
#[error("fixture read failed: {0}")]
pub(crate) struct FixtureError(pub(crate) &'static str);

/// A fake proxy whose facets are fixed up front.
#[derive(Debug, Default)]
pub(crate) struct FixtureChain {
    facets: Vec<(ListedFacet, String)>,
    fail_listing: bool,
    fail_names: bool,
    listing_calls: AtomicUsize,
    name_calls: AtomicUsize,
}

impl FixtureChain {
    pub(crate) const PROXY: Address =
        address!("0x32400084c286cf3e17e7b677ea9583e60a000324");

    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Installs a facet at `Address::repeat_byte(byte)`.
    pub(crate) fn with_facet(
        mut self,
        byte: u8,
        name: &str,
        signatures: &[&str],
    ) -> Self {
        let facet = ListedFacet {
            address: Address::repeat_byte(byte),
            selectors: signatures.iter().map(|s| selector(s)).collect(),
        };
        self.facets.push((facet, name.to_owned()));
        self
    }

    pub(crate) fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub(crate) fn failing_names(mut self) -> Self {
        self.fail_names = true;
        self
    }

    pub(crate) fn listing_calls(&self) -> usize {
        self.listing_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn name_calls(&self) -> usize {
        self.name_calls.load(Ordering::SeqCst)
    }
}

impl ChainFacetLister for FixtureChain {
    type Error = FixtureError;

    async fn list_facets(
        &self,
        proxy: Address,
    ) -> Result<Vec<ListedFacet>, Self::Error> {
        self.listing_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_listing {
            return Err(FixtureError("facets()"));
        }
        assert_eq!(proxy, Self::PROXY, "unexpected proxy");
        Ok(self.facets.iter().map(|(facet, _)| facet.clone()).collect())
    }
}

impl FacetNamer for FixtureChain {
    type Error = FixtureError;

    async fn get_name(&self, facet: Address) -> Result<String, Self::Error> {
        self.name_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_names {
            return Err(FixtureError("getName()"));
        }
        self.facets
            .iter()
            .find(|(listed, _)| listed.address == facet)
            .map(|(_, name)| name.clone())
            .ok_or(FixtureError("unknown facet"))
    }
}

/// Interfaces keyed by facet name.
#[derive(Debug, Default)]
pub(crate) struct FixtureArtifacts(HashMap<String, FacetInterface>);

impl FixtureArtifacts {
    pub(crate) fn with(mut self, name: &str, signatures: &[&str]) -> Self {
        self.0.insert(
            name.to_owned(),
            FacetInterface::new(signatures.iter().copied()),
        );
        self
    }
}

impl ContractInterfaceProvider for FixtureArtifacts {
    type Error = FixtureError;

    fn interface(
        &self,
        facet_name: &str,
    ) -> Result<FacetInterface, Self::Error> {
        self.0.get(facet_name).cloned().ok_or(FixtureError("missing artifact"))
    }
}

/// A provider that can never fail.
#[derive(Debug, Default)]
pub(crate) struct NoArtifacts;

impl ContractInterfaceProvider for NoArtifacts {
    type Error = Infallible;

    fn interface(&self, _: &str) -> Result<FacetInterface, Self::Error> {
        Ok(FacetInterface::default())
    }
}

/// Formatted log output of the current thread, captured while the guard
/// returned by [`LogCapture::install`] is alive.
#[derive(Clone, Debug, Default)]
pub(crate) struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub(crate) fn install(&self) -> tracing::subscriber::DefaultGuard {
        let make_writer = {
            let capture = self.clone();
            move || capture.clone()
        };
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_target(false)
            .with_max_level(tracing::Level::WARN)
            .with_writer(make_writer)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Captured lines, in emission order.
    pub(crate) fn lines(&self) -> Vec<String> {
        let buffer = self.0.lock().unwrap();
        String::from_utf8_lossy(&buffer).lines().map(str::to_owned).collect()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
