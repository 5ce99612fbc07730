//! Seed entries for the local store and the offline snapshot.
//!
//! File shape:
//!
//! ```toml
//! [[entry]]
//! title = "Contact"
//! description = "You can reach us at ..."
//! category = "Contact"
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::core::error::AppError;
use crate::knowledge::KnowledgeEntry;

#[derive(Deserialize)]
struct SeedFile {
    #[serde(default, rename = "entry")]
    entries: Vec<KnowledgeEntry>,
}

/// Load entries from `path`. Entries with a blank title are skipped.
pub fn load(path: &Path) -> Result<Vec<KnowledgeEntry>, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Store(format!("cannot read seed file {}: {e}", path.display())))?;
    let parsed: SeedFile = toml::from_str(&raw)
        .map_err(|e| AppError::Store(format!("parse error in seed file {}: {e}", path.display())))?;

    let entries: Vec<KnowledgeEntry> = parsed
        .entries
        .into_iter()
        .filter(|e| !e.key().is_empty())
        .collect();

    info!(path = %path.display(), entries = entries.len(), "seed entries loaded");
    Ok(entries)
}

/// Load `path` if given; no path means no seed.
pub fn load_optional(path: Option<&Path>) -> Result<Vec<KnowledgeEntry>, AppError> {
    match path {
        Some(p) => load(p),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn parses_entries() {
        let f = write(
            r#"
[[entry]]
title = "Contact"
description = "Mail us."
category = "Contact"

[[entry]]
title = "Location"
description = "Hyderabad."
"#,
        );
        let entries = load(f.path()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].category, "Contact");
        assert_eq!(entries[1].category, "");
    }

    #[test]
    fn blank_titles_are_skipped() {
        let f = write("[[entry]]\ntitle = \"  \"\ndescription = \"x\"\n");
        assert!(load(f.path()).unwrap().is_empty());
    }

    #[test]
    fn empty_file_is_empty_seed() {
        let f = write("");
        assert!(load(f.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_file_errors() {
        let err = load(Path::new("/nonexistent/seed.toml")).unwrap_err();
        assert!(err.to_string().contains("cannot read seed file"));
    }

    #[test]
    fn no_path_means_no_seed() {
        assert!(load_optional(None).unwrap().is_empty());
    }
}
