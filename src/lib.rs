//! Zone Data Checker Library
//!
//! Loads zone data from a directory and checks CNAME records across all
//! managed zones for dangling references.
//!
//! ```rust,ignore
//! use dbcheck::{check, Config, RecordDatabase};
//!
//! let config = Config::from_file("config.yml")?;
//! let db = RecordDatabase::from_directory(&config.zone_data_directory)?;
//! let report = check::run(&config, &db);
//! assert!(report.is_ok());
//! ```

pub mod check;
pub mod cname;
pub mod config;
pub mod index;
pub mod rrdb;
pub mod telemetry;
pub mod types;

pub use check::{CheckReport, ZoneFailure};
pub use cname::{check_cnames, find_invalid_cnames, CnameViolation, InvalidCnames, ZoneMatch};
pub use config::{Config, ConfigError};
pub use index::RecordIndex;
pub use rrdb::{RecordDatabase, ZoneError, ZoneSource};
pub use types::{ManagedZone, Record};
