//! Deterministic file discovery and the folder-order map the fusion engine
//! annotates each virtual patent with.
//!
//! List immediate subdirectories, `rayon` parallel-walk each down to a flat
//! directory list, sort globally for determinism, then parallel-scan each
//! directory non-recursively for `.xml` files and per-directory statistics.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::warn;
use vpfusion_error::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct DirStats {
    pub file_count: usize,
    pub total_bytes: u64,
    pub min_bytes: u64,
    pub max_bytes: u64,
}

pub struct ScanResult {
    /// Every discovered `.xml` file path, sorted lexicographically.
    pub files: Vec<String>,
    /// Relative directory (from the scan root) to its lexicographic index.
    pub folder_order: HashMap<String, u64>,
    pub dir_stats: HashMap<String, DirStats>,
}

pub fn scan(root: &Path) -> Result<ScanResult> {
    let subdirs = list_immediate_subdirs(root)?;

    let mut all_dirs: Vec<PathBuf> = subdirs.into_par_iter().flat_map(|dir| walk_to_dirs(&dir)).collect();
    all_dirs.push(root.to_path_buf());
    all_dirs.sort();
    all_dirs.dedup();

    let scanned: Vec<(PathBuf, Vec<String>, DirStats)> = all_dirs
        .into_par_iter()
        .map(|dir| {
            let (files, stats) = scan_single_dir(&dir);
            (dir, files, stats)
        })
        .collect();

    let mut files = Vec::new();
    let mut folder_order = HashMap::new();
    let mut dir_stats = HashMap::new();
    for (index, (dir, dir_files, stats)) in scanned.into_iter().enumerate() {
        let relative = dir.strip_prefix(root).unwrap_or(&dir).to_string_lossy().into_owned();
        folder_order.insert(relative.clone(), index as u64);
        dir_stats.insert(relative, stats);
        files.extend(dir_files);
    }
    files.sort();

    Ok(ScanResult { files, folder_order, dir_stats })
}

fn list_immediate_subdirs(root: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(root).map_err(Error::from)?;
    Ok(entries
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                warn!("skipping unreadable entry under {}: {err}", root.display());
                None
            }
        })
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|e| e.path())
        .collect())
}

fn walk_to_dirs(dir: &Path) -> Vec<PathBuf> {
    let mut out = vec![dir.to_path_buf()];
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("permission error scanning {}: {err}", dir.display());
            return out;
        }
    };

    let children: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|e| e.path())
        .collect();

    out.extend(children.into_par_iter().flat_map(|child| walk_to_dirs(&child)).collect::<Vec<_>>());
    out
}

fn scan_single_dir(dir: &Path) -> (Vec<String>, DirStats) {
    let mut files = Vec::new();
    let mut stats = DirStats::default();

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("permission error scanning {}: {err}", dir.display());
            return (files, stats);
        }
    };

    for entry in entries.filter_map(|e| e.ok()) {
        let is_xml = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));
        if !is_xml || !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }

        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        stats.file_count += 1;
        stats.total_bytes += size;
        stats.min_bytes = if stats.file_count == 1 { size } else { stats.min_bytes.min(size) };
        stats.max_bytes = stats.max_bytes.max(size);
        files.push(entry.path().to_string_lossy().into_owned());
    }

    (files, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self as stdfs, File};
    use std::io::Write;

    #[test]
    fn finds_xml_files_in_nested_directories_sorted() {
        let dir = tempfile::tempdir().unwrap();
        stdfs::create_dir_all(dir.path().join("EP/2020")).unwrap();
        File::create(dir.path().join("EP/2020/EP-2-A1.xml")).unwrap().write_all(b"<a/>").unwrap();
        File::create(dir.path().join("EP/EP-1-A1.xml")).unwrap().write_all(b"<a/>").unwrap();

        let result = scan(dir.path()).unwrap();
        assert_eq!(result.files.len(), 2);
        assert!(result.files[0].ends_with("EP-1-A1.xml"));
        assert!(result.files[1].ends_with("EP-2-A1.xml"));
    }

    #[test]
    fn ignores_non_xml_files() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("readme.txt")).unwrap().write_all(b"hi").unwrap();
        let result = scan(dir.path()).unwrap();
        assert!(result.files.is_empty());
    }

    #[test]
    fn tracks_per_directory_statistics() {
        let dir = tempfile::tempdir().unwrap();
        stdfs::create_dir_all(dir.path().join("EP")).unwrap();
        File::create(dir.path().join("EP/EP-1-A1.xml")).unwrap().write_all(b"<abc/>").unwrap();
        let result = scan(dir.path()).unwrap();
        let stats = result.dir_stats.get("EP").unwrap();
        assert_eq!(stats.file_count, 1);
        assert_eq!(stats.total_bytes, 6);
    }
}
