//! Record Index
//!
//! Flattens the records of all managed zones into one name-keyed map.

use std::collections::HashMap;

use tracing::debug;

use crate::rrdb::ZoneSource;
use crate::types::{ManagedZone, Record};

/// A name that appeared more than once while building the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub fqdn: String,
    /// Zone the replaced record came from
    pub replaced_zone: String,
    /// Zone of the record that is kept
    pub kept_zone: String,
}

/// FQDN → record map covering every managed zone
///
/// When two records share a name the one inserted last is kept. Collisions
/// are remembered for diagnostics only.
#[derive(Debug, Default)]
pub struct RecordIndex {
    records: HashMap<String, (String, Record)>,
    collisions: Vec<Collision>,
}

impl RecordIndex {
    /// Fetch every managed zone from `source` and index the results
    ///
    /// Zones that fail to load are skipped; reporting them is up to the
    /// caller.
    pub fn build<S: ZoneSource + ?Sized>(source: &S, zones: &[ManagedZone]) -> Self {
        Self::from_zones(zones.iter().filter_map(|mz| {
            source
                .zone(&mz.fqdn, mz.ttl)
                .ok()
                .map(|records| (mz.fqdn.clone(), records))
        }))
    }

    /// Index already fetched `(zone, records)` pairs in the given order
    pub fn from_zones<I>(zones: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<Record>)>,
    {
        let mut index = Self::default();
        for (zone, records) in zones {
            for record in records {
                index.insert(&zone, record);
            }
        }
        debug!(
            records = index.len(),
            collisions = index.collisions.len(),
            "Built record index"
        );
        index
    }

    fn insert(&mut self, zone: &str, record: Record) {
        let fqdn = record.fqdn.clone();
        let entry = (zone.to_string(), record);
        let Some((replaced_zone, replaced)) = self.records.insert(fqdn.clone(), entry) else {
            return;
        };

        // Nested managed zones hand out the same stored record once per zone
        if let Some((_, kept)) = self.records.get(&fqdn) {
            if same_stored_record(&replaced, kept) {
                return;
            }
        }

        self.collisions.push(Collision {
            fqdn,
            replaced_zone,
            kept_zone: zone.to_string(),
        });
    }

    pub fn get(&self, fqdn: &str) -> Option<&Record> {
        self.records.get(fqdn).map(|(_, record)| record)
    }

    pub fn contains(&self, fqdn: &str) -> bool {
        self.records.contains_key(fqdn)
    }

    /// Iterate over indexed records in unspecified order
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values().map(|(_, record)| record)
    }

    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// TTL is left out since it is filled from the fetching zone's interval
fn same_stored_record(a: &Record, b: &Record) -> bool {
    a.fqdn == b.fqdn && a.rtype == b.rtype && a.rdatas == b.rdatas
}
