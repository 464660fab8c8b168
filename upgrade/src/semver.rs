//! Packing of protocol versions into a single integer.
//!
//! A protocol version `major.minor.patch` is stored on-chain as
//! `minor * 2^32 + patch`. The major version is pinned to `0`.
use core::{fmt, str::FromStr};

use alloy_primitives::U256;

use crate::Error;

/// Multiplier of the minor version in a packed protocol version.
pub const SEMVER_MINOR_VERSION_MULTIPLIER: u64 = 1 << 32;

/// Packs `major.minor.patch` into `minor * 2^32 + patch`.
///
/// `patch` is not range-checked: a patch of `2^32` or more spills into the
/// minor part of the packed value.
///
/// # Errors
///
/// * [`Error::InvalidVersion`] - If `major` is not `0`.
/// * [`Error::VersionOverflow`] - If the packed value exceeds [`u64::MAX`].
pub fn pack_semver(major: u64, minor: u64, patch: u64) -> Result<u64, Error> {
    if major != 0 {
        return Err(Error::InvalidVersion(major));
    }

    minor
        .checked_mul(SEMVER_MINOR_VERSION_MULTIPLIER)
        .and_then(|minor| minor.checked_add(patch))
        .ok_or(Error::VersionOverflow)
}

/// Splits a packed protocol version into `(0, minor, patch)`.
#[must_use]
pub const fn unpack_semver(packed: u64) -> (u64, u64, u64) {
    (
        0,
        packed / SEMVER_MINOR_VERSION_MULTIPLIER,
        packed % SEMVER_MINOR_VERSION_MULTIPLIER,
    )
}

/// Adds `minor` and `patch` to the respective parts of `packed`.
///
/// The parts are incremented independently, without carrying a patch
/// overflow into minor before packing.
///
/// # Errors
///
/// * [`Error::VersionOverflow`] - If the result exceeds [`u64::MAX`].
pub fn add_to_protocol_version(
    packed: u64,
    minor: u64,
    patch: u64,
) -> Result<u64, Error> {
    let (major, minor_version, patch_version) = unpack_semver(packed);
    let minor_version =
        minor_version.checked_add(minor).ok_or(Error::VersionOverflow)?;
    let patch_version =
        patch_version.checked_add(patch).ok_or(Error::VersionOverflow)?;
    pack_semver(major, minor_version, patch_version)
}

/// Parses a dotted `major.minor.patch` string.
///
/// # Errors
///
/// * [`Error::MalformedVersionString`] - If `semver` is not exactly three
///   dot-separated unsigned integers.
pub fn unpack_string_semver(semver: &str) -> Result<(u64, u64, u64), Error> {
    let malformed = || Error::MalformedVersionString(semver.to_owned());
    let parse = |part: &str| {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        part.parse::<u64>().map_err(|_| malformed())
    };

    let mut parts = semver.split('.');
    let (Some(major), Some(minor), Some(patch), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(malformed());
    };

    Ok((parse(major)?, parse(minor)?, parse(patch)?))
}

/// A packed protocol version.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProtocolVersion(u64);

impl ProtocolVersion {
    /// Packs `0.minor.patch`.
    ///
    /// # Errors
    ///
    /// * [`Error::VersionOverflow`] - If the packed value exceeds
    ///   [`u64::MAX`].
    pub fn new(minor: u64, patch: u64) -> Result<Self, Error> {
        pack_semver(0, minor, patch).map(Self)
    }

    /// Wraps an already packed value.
    #[must_use]
    pub const fn from_packed(packed: u64) -> Self {
        Self(packed)
    }

    /// The packed value.
    #[must_use]
    pub const fn packed(self) -> u64 {
        self.0
    }

    /// Minor part of the version.
    #[must_use]
    pub const fn minor(self) -> u64 {
        unpack_semver(self.0).1
    }

    /// Patch part of the version.
    #[must_use]
    pub const fn patch(self) -> u64 {
        unpack_semver(self.0).2
    }

    /// See [`add_to_protocol_version`].
    ///
    /// # Errors
    ///
    /// * [`Error::VersionOverflow`] - If the result exceeds [`u64::MAX`].
    pub fn increment(self, minor: u64, patch: u64) -> Result<Self, Error> {
        add_to_protocol_version(self.0, minor, patch).map(Self)
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (major, minor, patch) = unpack_semver(self.0);
        write!(f, "{major}.{minor}.{patch}")
    }
}

impl FromStr for ProtocolVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (major, minor, patch) = unpack_string_semver(s)?;
        pack_semver(major, minor, patch).map(Self)
    }
}

/// Call through `.into()`: the inherent `U256::from` shadows this impl.
impl From<ProtocolVersion> for U256 {
    fn from(version: ProtocolVersion) -> Self {
        U256::from(version.0)
    }
}

impl TryFrom<U256> for ProtocolVersion {
    type Error = Error;

    fn try_from(value: U256) -> Result<Self, Self::Error> {
        u64::try_from(value).map(Self).map_err(|_| Error::VersionOverflow)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const MAX_PART: u64 = SEMVER_MINOR_VERSION_MULTIPLIER - 1;

    #[test]
    fn packs_minor_above_patch() {
        assert_eq!(pack_semver(0, 0, 0).unwrap(), 0);
        assert_eq!(pack_semver(0, 0, 7).unwrap(), 7);
        assert_eq!(pack_semver(0, 24, 0).unwrap(), 103_079_215_104);
        assert_eq!(pack_semver(0, 24, 1).unwrap(), 103_079_215_105);
    }

    #[test]
    fn rejects_non_zero_major() {
        let err = pack_semver(1, 0, 0).unwrap_err();
        assert!(matches!(err, Error::InvalidVersion(1)));
    }

    #[test]
    fn rejects_overflowing_version() {
        assert!(matches!(
            pack_semver(0, 1 << 32, 0).unwrap_err(),
            Error::VersionOverflow
        ));
        assert!(matches!(
            add_to_protocol_version(u64::MAX, 0, 1).unwrap_err(),
            Error::VersionOverflow
        ));
    }

    #[test]
    fn patch_overflow_spills_into_minor() {
        let packed = pack_semver(0, 1, MAX_PART).unwrap();

        let bumped = add_to_protocol_version(packed, 0, 1).unwrap();

        assert_eq!(unpack_semver(bumped), (0, 2, 0));
    }

    #[test]
    fn parses_dotted_versions() {
        assert_eq!(unpack_string_semver("0.12.7").unwrap(), (0, 12, 7));
        assert_eq!(unpack_string_semver("1.0.0").unwrap(), (1, 0, 0));
    }

    #[test]
    fn rejects_malformed_dotted_versions() {
        for semver in [
            "1.2", "", "0.1.2.3", "0..1", "0.a.1", "0.1.-1", " 0.1.2", "0.1.+2",
        ] {
            let err = unpack_string_semver(semver).unwrap_err();
            assert!(
                matches!(
                    err,
                    Error::MalformedVersionString(ref s) if s == semver
                ),
                "{semver:?} should be rejected"
            );
        }
    }

    #[test]
    fn displays_and_parses_protocol_version() {
        let version: ProtocolVersion = "0.25.3".parse().unwrap();

        assert_eq!(version, ProtocolVersion::new(25, 3).unwrap());
        assert_eq!(version.minor(), 25);
        assert_eq!(version.patch(), 3);
        assert_eq!(version.to_string(), "0.25.3");
        assert!(matches!(
            "1.25.3".parse::<ProtocolVersion>().unwrap_err(),
            Error::InvalidVersion(1)
        ));
    }

    #[test]
    fn converts_to_and_from_u256() {
        let version = ProtocolVersion::new(26, 0).unwrap();

        let value: U256 = version.into();

        assert_eq!(value, U256::from(26u64 << 32));
        assert_eq!(ProtocolVersion::try_from(value).unwrap(), version);
        assert!(matches!(
            ProtocolVersion::try_from(U256::MAX).unwrap_err(),
            Error::VersionOverflow
        ));
    }

    #[test]
    fn versions_order_by_minor_then_patch() {
        let older = ProtocolVersion::new(24, 9).unwrap();
        let newer = older.increment(1, 0).unwrap();

        assert!(older < newer);
        assert_eq!(newer.to_string(), "0.25.9");
    }

    proptest! {
        #[test]
        fn pack_unpack_round_trip(
            minor in 0..=MAX_PART,
            patch in 0..=MAX_PART,
        ) {
            let packed = pack_semver(0, minor, patch).unwrap();
            prop_assert_eq!(unpack_semver(packed), (0, minor, patch));
        }

        #[test]
        fn increment_adds_parts_independently(
            minor in 0..=MAX_PART / 2,
            patch in 0..=MAX_PART / 2,
            minor_delta in 0..=MAX_PART / 2,
            patch_delta in 0..=MAX_PART / 2,
        ) {
            let packed = pack_semver(0, minor, patch).unwrap();

            let bumped =
                add_to_protocol_version(packed, minor_delta, patch_delta)
                    .unwrap();

            prop_assert_eq!(
                unpack_semver(bumped),
                (0, minor + minor_delta, patch + patch_delta)
            );
        }
    }
}
