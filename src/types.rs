//! Zone Data Types
//!
//! Records as stored in the zone data directory and the zones an operator
//! declares as managed.

use serde::{Deserialize, Serialize};

/// Record type tag that the CNAME checker acts on
pub const CNAME: &str = "CNAME";

/// Default refresh interval for a managed zone, in seconds
pub const DEFAULT_ZONE_TTL: u32 = 3600;

/// A single resource record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Fully-qualified name of the record (kept exactly as written)
    pub fqdn: String,
    /// Record type tag (A, AAAA, CNAME, TXT, ...)
    pub rtype: String,
    /// Type-specific payload; for CNAME the first entry is the target
    #[serde(default)]
    pub rdatas: Vec<String>,
    /// TTL in seconds, filled from the zone interval when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
}

impl Record {
    /// Create a record without an explicit TTL
    pub fn new(fqdn: &str, rtype: &str, rdatas: &[&str]) -> Self {
        Self {
            fqdn: fqdn.to_string(),
            rtype: rtype.to_string(),
            rdatas: rdatas.iter().map(|d| d.to_string()).collect(),
            ttl: None,
        }
    }

    /// Create a CNAME record pointing at `target`
    pub fn cname(fqdn: &str, target: &str) -> Self {
        Self::new(fqdn, CNAME, &[target])
    }

    pub fn is_cname(&self) -> bool {
        self.rtype == CNAME
    }

    /// Alias target of a CNAME record, if it carries one
    pub fn cname_target(&self) -> Option<&str> {
        self.rdatas.first().map(String::as_str)
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.fqdn, self.rtype)?;
        for rdata in &self.rdatas {
            write!(f, " {}", rdata)?;
        }
        Ok(())
    }
}

/// A zone the operator is responsible for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedZone {
    /// Root domain name of the zone
    pub fqdn: String,
    /// Refresh interval in seconds, handed to the record database
    #[serde(default = "default_zone_ttl")]
    pub ttl: u32,
}

impl ManagedZone {
    pub fn new(fqdn: &str, ttl: u32) -> Self {
        Self {
            fqdn: fqdn.to_string(),
            ttl,
        }
    }

    /// Whether `fqdn` sits on or below this zone's apex on a label boundary
    pub fn owns(&self, fqdn: &str) -> bool {
        match fqdn.strip_suffix(self.fqdn.as_str()) {
            Some("") => true,
            Some(prefix) => prefix.ends_with('.'),
            None => false,
        }
    }
}

fn default_zone_ttl() -> u32 {
    DEFAULT_ZONE_TTL
}
