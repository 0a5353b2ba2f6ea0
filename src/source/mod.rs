// src/source/mod.rs
//
// Legacy document acquisition. Two shapes are supported: a JSON dump of the
// CMS rows ({id, namespace, detail}) exported from the legacy database, or a
// directory of `<id>.html` files for ad-hoc runs. Row order follows the
// restriction list when one is given, so reruns of a hand-picked id list
// process in the order the operator wrote them.

use crate::utils::error::SourceError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// One legacy landing page: the database id, the site namespace it is served
/// under, and the raw HTML body.
#[derive(Debug, Clone, Deserialize)]
pub struct DocRow {
    pub id: u64,
    pub namespace: String,
    pub detail: String,
}

pub fn load_documents(
    path: &Path,
    restrict_to_ids: &[u64],
    ignore_ids: &[u64],
) -> Result<Vec<DocRow>, SourceError> {
    let mut rows = if path.is_dir() {
        load_from_directory(path)?
    } else if path.extension().and_then(|e| e.to_str()) == Some("json") {
        load_from_dump(path)?
    } else {
        return Err(SourceError::UnsupportedPath(path.display().to_string()));
    };

    if !restrict_to_ids.is_empty() {
        rows.retain(|row| restrict_to_ids.contains(&row.id));
        // Restriction order is processing order.
        rows.sort_by_key(|row| {
            restrict_to_ids.iter().position(|id| *id == row.id).unwrap_or(usize::MAX)
        });
    }
    rows.retain(|row| !ignore_ids.contains(&row.id));
    Ok(rows)
}

fn load_from_dump(path: &Path) -> Result<Vec<DocRow>, SourceError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn load_from_directory(dir: &Path) -> Result<Vec<DocRow>, SourceError> {
    let namespace = dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("local")
        .to_string();
    let mut rows = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("html") {
            continue;
        }
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        let Ok(id) = stem.parse::<u64>() else {
            tracing::warn!(file = %path.display(), "Skipping HTML file without a numeric id name");
            continue;
        };
        rows.push(DocRow { id, namespace: namespace.clone(), detail: fs::read_to_string(&path)? });
    }
    // Directory iteration order is platform-dependent.
    rows.sort_by_key(|row| row.id);
    Ok(rows)
}
