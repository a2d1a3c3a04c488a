//! Sink router: fans one minimum severity out into one exact-level sink per level

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tierlog_core::{LevelEnabler, LevelEnablerFn, Result, Severity};

use crate::rotation::{log_dir, RotationConfig};

/// A minimum severity whose enabled set is split into single-level predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelAndAbove(Severity);

impl LevelAndAbove {
    pub fn new(threshold: Severity) -> Self {
        Self(threshold)
    }

    /// Fails with `InvalidThreshold` outside `Debug..=Fatal`
    pub fn from_raw(raw: i32) -> Result<Self> {
        Ok(Self(Severity::try_from(raw)?))
    }

    pub fn threshold(&self) -> Severity {
        self.0
    }

    /// The threshold and every level above it, ascending
    pub fn levels(&self) -> Vec<Severity> {
        self.0.and_above().collect()
    }

    /// One predicate per enabled level, each true for exactly its own level.
    ///
    /// A sink built from these writes a single level and nothing above it.
    pub fn enable_levels(&self) -> BTreeMap<Severity, Arc<dyn LevelEnabler>> {
        let mut enablers: BTreeMap<Severity, Arc<dyn LevelEnabler>> = BTreeMap::new();
        for level in self.levels() {
            // Each closure owns a copy of its own level.
            enablers.insert(level, Arc::new(LevelEnablerFn(move |lvl| lvl == level)));
        }
        enablers
    }
}

impl From<Severity> for LevelAndAbove {
    fn from(threshold: Severity) -> Self {
        Self::new(threshold)
    }
}

/// Levels enabled by a raw threshold value
pub fn enabled_levels(raw: i32) -> Result<Vec<Severity>> {
    Ok(LevelAndAbove::from_raw(raw)?.levels())
}

/// Where entries of one level end up on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub level: Severity,
    pub pattern: PathBuf,
}

/// File pattern for every level enabled by `threshold`, in ascending order
pub fn route(
    root: &Path,
    pod: &str,
    service: &str,
    threshold: Severity,
    rotation: &RotationConfig,
) -> Vec<Route> {
    let dir = log_dir(root, pod, service);
    LevelAndAbove::new(threshold)
        .levels()
        .into_iter()
        .map(|level| Route {
            level,
            pattern: rotation.pattern(&dir, level),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tierlog_core::Error;

    #[test]
    fn test_key_set_is_threshold_and_above() {
        for threshold in Severity::ALL {
            let enablers = LevelAndAbove::new(threshold).enable_levels();
            let keys: Vec<_> = enablers.keys().copied().collect();
            let expected: Vec<_> = Severity::ALL
                .into_iter()
                .filter(|s| *s >= threshold)
                .collect();
            assert_eq!(keys, expected, "threshold {}", threshold);
        }
    }

    #[test]
    fn test_each_predicate_matches_only_its_level() {
        for threshold in Severity::ALL {
            for (key, enabler) in LevelAndAbove::new(threshold).enable_levels() {
                for candidate in Severity::ALL {
                    assert_eq!(
                        enabler.enabled(candidate),
                        candidate == key,
                        "predicate for {} evaluated on {}",
                        key,
                        candidate
                    );
                }
            }
        }
    }

    #[test]
    fn test_out_of_range_threshold_fails() {
        assert!(matches!(LevelAndAbove::from_raw(7), Err(Error::InvalidThreshold(7))));
        assert!(matches!(LevelAndAbove::from_raw(-1), Err(Error::InvalidThreshold(-1))));
        assert!(matches!(enabled_levels(42), Err(Error::InvalidThreshold(42))));
    }

    #[test]
    fn test_enabled_levels_from_raw() {
        assert_eq!(
            enabled_levels(4).unwrap(),
            vec![Severity::DPanic, Severity::Panic, Severity::Fatal]
        );
        assert_eq!(enabled_levels(0).unwrap().len(), 7);
        assert_eq!(LevelAndAbove::from_raw(6).unwrap().levels(), vec![Severity::Fatal]);
    }

    #[test]
    fn test_route_patterns() {
        let routes = route(
            Path::new("/var/log"),
            "pod-7",
            "data",
            Severity::Panic,
            &RotationConfig::default(),
        );
        assert_eq!(
            routes,
            vec![
                Route {
                    level: Severity::Panic,
                    pattern: PathBuf::from("/var/log/pod-7/data/panic.%Y-%m-%d.log"),
                },
                Route {
                    level: Severity::Fatal,
                    pattern: PathBuf::from("/var/log/pod-7/data/fatal.%Y-%m-%d.log"),
                },
            ]
        );
    }
}
