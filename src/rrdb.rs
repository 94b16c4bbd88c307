//! Resource Record Database
//!
//! Loads zone data from a directory of YAML files and hands out the records
//! belonging to a zone. Each file holds a sequence of records:
//!
//! ```yaml
//! - fqdn: www.example.com
//!   rtype: CNAME
//!   rdatas: [web.example.com]
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::types::{ManagedZone, Record};

/// Errors raised while loading zone data or fetching a zone
#[derive(Debug, Error)]
pub enum ZoneError {
    /// Reading the zone data directory or a file failed
    #[error("read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A zone data file is not valid YAML
    #[error("parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A record is missing a required field
    #[error("{}: record #{index}: {message}", .path.display())]
    InvalidRecord {
        path: PathBuf,
        index: usize,
        message: String,
    },

    /// No record belongs to the requested zone
    #[error("no records found for zone '{0}'")]
    NotFound(String),

    /// The zone refresh interval is unusable
    #[error("invalid TTL {ttl} for zone '{fqdn}'")]
    InvalidTtl { fqdn: String, ttl: u32 },
}

/// Source of per-zone record sequences
pub trait ZoneSource {
    /// Return every record of the zone `fqdn`, in storage order
    fn zone(&self, fqdn: &str, ttl: u32) -> Result<Vec<Record>, ZoneError>;
}

/// Records loaded from a zone data directory
#[derive(Debug, Default, Clone)]
pub struct RecordDatabase {
    records: Vec<Record>,
}

impl RecordDatabase {
    /// Build a database from records already in memory
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Load every `*.yml` / `*.yaml` file below `dir`
    ///
    /// Files are read in sorted path order so record order is stable between
    /// runs.
    pub fn from_directory(dir: impl AsRef<Path>) -> Result<Self, ZoneError> {
        let dir = dir.as_ref();
        let mut files = Vec::new();
        collect_zone_files(dir, &mut files)?;
        files.sort();

        let mut records = Vec::new();
        for file in &files {
            let loaded = load_file(file)?;
            debug!(file = %file.display(), records = loaded.len(), "Loaded zone data file");
            records.extend(loaded);
        }

        info!(
            directory = %dir.display(),
            files = files.len(),
            records = records.len(),
            "Loaded zone data"
        );

        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ZoneSource for RecordDatabase {
    fn zone(&self, fqdn: &str, ttl: u32) -> Result<Vec<Record>, ZoneError> {
        if ttl == 0 {
            return Err(ZoneError::InvalidTtl {
                fqdn: fqdn.to_string(),
                ttl,
            });
        }

        let zone = ManagedZone::new(fqdn, ttl);
        let records: Vec<Record> = self
            .records
            .iter()
            .filter(|r| zone.owns(&r.fqdn))
            .map(|r| Record {
                ttl: r.ttl.or(Some(ttl)),
                ..r.clone()
            })
            .collect();

        if records.is_empty() {
            return Err(ZoneError::NotFound(fqdn.to_string()));
        }

        debug!(zone = %fqdn, records = records.len(), "Fetched zone");
        Ok(records)
    }
}

fn collect_zone_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), ZoneError> {
    let io_err = |source| ZoneError::Io {
        path: dir.to_path_buf(),
        source,
    };

    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let path = entry.path();
        // Symlinked directories are not followed
        if entry.file_type().map_err(io_err)?.is_dir() {
            collect_zone_files(&path, files)?;
        } else if matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yml") | Some("yaml")
        ) {
            files.push(path);
        }
    }

    Ok(())
}

fn load_file(path: &Path) -> Result<Vec<Record>, ZoneError> {
    let content = std::fs::read_to_string(path).map_err(|source| ZoneError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    // An empty file is an empty zone fragment, not a parse error
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let records: Vec<Record> = serde_yaml::from_str(&content).map_err(|source| ZoneError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    for (index, record) in records.iter().enumerate() {
        let message = if record.fqdn.is_empty() {
            "empty fqdn"
        } else if record.rtype.is_empty() {
            "empty rtype"
        } else {
            continue;
        };
        return Err(ZoneError::InvalidRecord {
            path: path.to_path_buf(),
            index,
            message: message.to_string(),
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_zone_filters_by_label_boundary() {
        let db = RecordDatabase::from_records(vec![
            Record::new("example.com", "A", &["192.0.2.1"]),
            Record::cname("www.example.com", "example.com"),
            Record::new("evilexample.com", "A", &["192.0.2.2"]),
            Record::new("example.org", "A", &["192.0.2.3"]),
        ]);

        let records = db.zone("example.com", 300).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.fqdn.as_str()).collect();
        assert_eq!(names, vec!["example.com", "www.example.com"]);
    }

    #[test]
    fn test_zone_fills_missing_ttl() {
        let mut pinned = Record::new("a.example.com", "A", &["192.0.2.1"]);
        pinned.ttl = Some(60);
        let db = RecordDatabase::from_records(vec![
            pinned,
            Record::new("b.example.com", "A", &["192.0.2.2"]),
        ]);

        let records = db.zone("example.com", 900).unwrap();
        assert_eq!(records[0].ttl, Some(60));
        assert_eq!(records[1].ttl, Some(900));
    }

    #[test]
    fn test_zone_not_found() {
        let db = RecordDatabase::from_records(vec![Record::new("a.example.com", "A", &[])]);
        let err = db.zone("example.net", 300).unwrap_err();
        assert!(matches!(err, ZoneError::NotFound(ref z) if z == "example.net"));
        assert_eq!(err.to_string(), "no records found for zone 'example.net'");
    }

    #[test]
    fn test_zone_rejects_zero_ttl() {
        let db = RecordDatabase::from_records(vec![Record::new("a.example.com", "A", &[])]);
        assert!(matches!(
            db.zone("example.com", 0),
            Err(ZoneError::InvalidTtl { ttl: 0, .. })
        ));
    }

    #[test]
    fn test_from_directory_reads_nested_yaml() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "example.com/records.yml",
            "- fqdn: www.example.com\n  rtype: CNAME\n  rdatas: [web.example.com]\n",
        );
        write(
            tmp.path(),
            "example.com/web.yaml",
            "- fqdn: web.example.com\n  rtype: A\n  rdatas: [192.0.2.10]\n  ttl: 120\n",
        );
        write(tmp.path(), "README.md", "not zone data");
        write(tmp.path(), "empty.yml", "\n");

        let db = RecordDatabase::from_directory(tmp.path()).unwrap();
        assert_eq!(db.len(), 2);

        let records = db.zone("example.com", 3600).unwrap();
        assert_eq!(records[0].fqdn, "www.example.com");
        assert_eq!(records[1].ttl, Some(120));
    }

    #[cfg(unix)]
    #[test]
    fn test_from_directory_ignores_symlinked_directories() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "example.com/records.yml",
            "- fqdn: www.example.com\n  rtype: A\n  rdatas: [192.0.2.1]\n",
        );
        std::os::unix::fs::symlink(tmp.path(), tmp.path().join("example.com/loop")).unwrap();

        let db = RecordDatabase::from_directory(tmp.path()).unwrap();
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn test_from_directory_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope");
        let err = RecordDatabase::from_directory(&missing).unwrap_err();
        assert!(matches!(err, ZoneError::Io { ref path, .. } if path == &missing));
    }

    #[test]
    fn test_from_directory_parse_error_names_file() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "broken.yml", "- fqdn: [unterminated\n");

        let err = RecordDatabase::from_directory(tmp.path()).unwrap_err();
        assert!(matches!(err, ZoneError::Parse { .. }));
        assert!(err.to_string().contains("broken.yml"));
    }

    #[test]
    fn test_from_directory_rejects_empty_rtype() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "zone.yml",
            "- fqdn: a.example.com\n  rtype: A\n- fqdn: b.example.com\n  rtype: \"\"\n",
        );

        let err = RecordDatabase::from_directory(tmp.path()).unwrap_err();
        assert!(matches!(err, ZoneError::InvalidRecord { index: 1, .. }));
    }
}
