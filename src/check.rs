//! Check Orchestration
//!
//! Runs one full check: fetch every managed zone, index what loaded, then
//! validate the CNAME references.

use tracing::{info, warn};

use crate::cname::{check_cnames, InvalidCnames};
use crate::config::Config;
use crate::index::RecordIndex;
use crate::rrdb::{ZoneError, ZoneSource};

/// A managed zone that could not be loaded
#[derive(Debug)]
pub struct ZoneFailure {
    pub fqdn: String,
    pub error: ZoneError,
}

impl std::fmt::Display for ZoneFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Managed zone {}: {}", self.fqdn, self.error)
    }
}

/// Outcome of a single check run
#[derive(Debug)]
pub struct CheckReport {
    /// Zones that failed to load, in managed-zone order
    pub zone_failures: Vec<ZoneFailure>,
    /// Result of the CNAME pass over the zones that did load
    pub cnames: Result<(), InvalidCnames>,
    /// Number of distinct names indexed
    pub records_indexed: usize,
    /// Names replaced by a different record from a later zone
    pub collisions: usize,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.zone_failures.is_empty() && self.cnames.is_ok()
    }
}

/// Fetch each managed zone once, then check CNAMEs across all of them
///
/// Zone failures are logged and collected; they never stop the CNAME pass.
pub fn run<S: ZoneSource + ?Sized>(config: &Config, source: &S) -> CheckReport {
    let mut zone_failures = Vec::new();
    let mut loaded = Vec::with_capacity(config.managed_zones.len());

    for mz in &config.managed_zones {
        match source.zone(&mz.fqdn, mz.ttl) {
            Ok(records) => {
                info!(zone = %mz.fqdn, records = records.len(), "Loaded managed zone");
                loaded.push((mz.fqdn.clone(), records));
            }
            Err(error) => {
                let failure = ZoneFailure {
                    fqdn: mz.fqdn.clone(),
                    error,
                };
                warn!("{}", failure);
                zone_failures.push(failure);
            }
        }
    }

    let index = RecordIndex::from_zones(loaded);
    for collision in index.collisions() {
        warn!(
            fqdn = %collision.fqdn,
            replaced_zone = %collision.replaced_zone,
            kept_zone = %collision.kept_zone,
            "Record name defined more than once, keeping the later one"
        );
    }

    let cnames = check_cnames(&index, &config.managed_zones, config.zone_match);
    if let Err(e) = &cnames {
        warn!("CNAME error: {}", e);
    }

    CheckReport {
        zone_failures,
        cnames,
        records_indexed: index.len(),
        collisions: index.collisions().len(),
    }
}
