//! Two-phase worker pipeline: Phase A fuses patent groups into temporary XML
//! files using a bounded `rayon` thread pool; Phase B reads each temp file
//! back one at a time, renders the configured output formats, and deletes
//! the temp file immediately, so no worker ever holds more than one patent's
//! tree in memory at once.
//!
//! Each phase gets its own `rayon::ThreadPool` rather than a shared pool, so
//! Phase B can't start stealing Phase A's work before every temp file for a
//! batch exists.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{error, info, warn};

use vpfusion_batch::build_batches;
use vpfusion_core::config::Config;
use vpfusion_core::constants::PRIMARY_LANGUAGE_PRIORITY;
use vpfusion_core::fusion::{merge_group, Variant};
use vpfusion_core::identifier::parse_patent_file_name;
use vpfusion_core::sink::{
    derive_output_dir, is_merged_patent, output_file_name, prepare_for_serialization, render, FolderMeta,
};
use vpfusion_core::xml::{self, XmlNode};
use vpfusion_core::{filter, language};
use vpfusion_error::{Error, Result};

use crate::progress::{ProgressReporter, ProgressTable};

pub struct RunSummary {
    pub files_scanned: usize,
    pub directories_scanned: usize,
    pub patents_produced: usize,
    pub merged_patents: usize,
    pub unparseable_file_count: usize,
    pub elapsed_seconds: f64,
}

pub fn run(config: &Config, cpu_count: usize, chunk_size: usize, cancelled: Arc<AtomicBool>) -> Result<RunSummary> {
    let start = std::time::Instant::now();

    let scan = vpfusion_batch::scan(&config.vertical_origin_path)?;
    info!("scanned {} file(s) across {} directories", scan.files.len(), scan.folder_order.len());

    let unparseable_file_count = scan.files.iter().filter(|f| parse_patent_file_name(f).is_none()).count();
    if unparseable_file_count > 0 {
        warn!("{unparseable_file_count} file(s) did not match the patent file naming convention");
    }

    let batches = build_batches(&scan.files, config.batch_size);
    info!("built {} batch(es) from {} file(s)", batches.len(), scan.files.len());

    let root = config.vertical_origin_path.clone();
    let folder_order = Arc::new(scan.folder_order);

    let phase_a_pool = build_pool(cpu_count, "phase-a")?;
    let temp_dir = temp_dir_for(&config.destination_path)?;
    let table_a = Arc::new(ProgressTable::new(cpu_count));
    let reporter_a = ProgressReporter::spawn("fusing", scan.files.len() as u64, table_a.clone());

    let temp_files: Vec<PathBuf> = phase_a_pool.install(|| {
        batches
            .par_iter()
            .with_min_len(chunk_size.min(batches.len().max(1)))
            .flat_map(|batch| fuse_batch(batch, config, &temp_dir, &table_a, &cancelled))
            .collect()
    });
    reporter_a.finish("fusion complete");

    if cancelled.load(Ordering::Relaxed) {
        warn!("cancellation requested after Phase A; Phase B will only drain what was already fused");
    }

    let phase_b_pool = build_pool(cpu_count, "phase-b")?;
    let table_b = Arc::new(ProgressTable::new(cpu_count));
    let reporter_b = ProgressReporter::spawn("serializing", temp_files.len() as u64, table_b.clone());
    let merged_counter = AtomicUsize::new(0);
    let cancelled_b = cancelled.clone();

    let patents_produced = phase_b_pool.install(|| {
        temp_files
            .par_iter()
            .with_min_len(chunk_size.min(temp_files.len().max(1)))
            .filter(|_| !cancelled_b.load(Ordering::Relaxed))
            .filter_map(|temp_path| {
                let result = serialize_temp_file(temp_path, config, &root, &folder_order, &merged_counter);
                table_b.record();
                match result {
                    Ok(()) => Some(()),
                    Err(err) => {
                        error!("serialization failed for {}: {err}", temp_path.display());
                        None
                    }
                }
            })
            .count()
    });
    reporter_b.finish("serialization complete");

    Ok(RunSummary {
        files_scanned: scan.files.len(),
        directories_scanned: folder_order.len(),
        patents_produced,
        merged_patents: merged_counter.load(Ordering::Relaxed),
        unparseable_file_count,
        elapsed_seconds: start.elapsed().as_secs_f64(),
    })
}

fn build_pool(cpu_count: usize, name: &str) -> Result<rayon::ThreadPool> {
    let name = name.to_owned();
    rayon::ThreadPoolBuilder::new()
        .num_threads(cpu_count)
        .thread_name(move |i| format!("vpfusion-{name}-{i}"))
        .build()
        .map_err(|err| Error::unexpected(err.to_string()).with_operation("pipeline::build_pool"))
}

fn temp_dir_for(destination: &Path) -> Result<PathBuf> {
    let dir = destination.join(".vpfusion-tmp");
    fs::create_dir_all(&dir).map_err(Error::from)?;
    Ok(dir)
}

/// Phase A worker body: group one batch's files by patent group, fuse each
/// group and write the resulting skeleton to a temp XML file.
fn fuse_batch(batch: &[String], config: &Config, temp_dir: &Path, table: &ProgressTable, cancelled: &AtomicBool) -> Vec<PathBuf> {
    if cancelled.load(Ordering::Relaxed) {
        return Vec::new();
    }

    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<String>> = HashMap::new();
    for file in batch {
        let key = parse_patent_file_name(file)
            .map(|id| id.group_key().as_string())
            .unwrap_or_else(|| format!("unparseable-{file}"));
        if !groups.contains_key(&key) {
            order.push(key.clone());
        }
        groups.entry(key).or_default().push(file.clone());
    }

    let mut written = Vec::with_capacity(order.len());
    for key in order {
        let files = groups.remove(&key).expect("every key in order was inserted into groups");
        table.record_n(files.len() as u64);
        match fuse_group(&key, &files, config) {
            Ok(tree) => match write_temp(&tree, temp_dir, &key) {
                Ok(path) => written.push(path),
                Err(err) => error!("failed to write temp file for group '{key}': {err}"),
            },
            Err(err) => error!("fusion failed for group '{key}': {err}"),
        }
    }
    written
}

fn fuse_group(group_key: &str, files: &[String], config: &Config) -> Result<XmlNode> {
    let mut variants = Vec::with_capacity(files.len());
    for path in files {
        let kind_code = parse_patent_file_name(path).map(|id| id.kind_code).unwrap_or_else(|| "UNKNOWN".to_string());
        let raw = fs::read_to_string(path).map_err(Error::from)?;
        let tree = xml::parse_str(&raw)?;
        variants.push(Variant { kind_code, source_path: path.clone(), tree });
    }

    let mut merged = merge_group(group_key, variants, &config.global_priority)?;
    filter::apply_filters(&mut merged, &config.parse_flags);
    let lang_filter = language::parse_lang_filter(&config.parse_lang)?;
    let language_priority: Vec<String> = PRIMARY_LANGUAGE_PRIORITY.iter().map(|s| s.to_string()).collect();
    language::apply_language_filter(&mut merged, &lang_filter, &language_priority);
    Ok(merged)
}

fn write_temp(tree: &XmlNode, temp_dir: &Path, group_key: &str) -> Result<PathBuf> {
    let safe_name = group_key.replace(['/', '\\'], "_");
    let path = temp_dir.join(format!("{safe_name}.xml"));
    fs::write(&path, xml::write_pretty(tree)).map_err(Error::from)?;
    Ok(path)
}

/// Phase B worker body: read one temp tree, render every configured output
/// format, delete the temp file. Never holds more than one tree at a time.
fn serialize_temp_file(
    temp_path: &Path,
    config: &Config,
    root: &Path,
    folder_order: &HashMap<String, u64>,
    merged_counter: &AtomicUsize,
) -> Result<()> {
    let raw = fs::read_to_string(temp_path).map_err(Error::from)?;
    let tree = xml::parse_str(&raw)?;
    let merged = is_merged_patent(&tree);
    if merged {
        merged_counter.fetch_add(1, Ordering::Relaxed);
    }

    let office = tree.get_attr("country").unwrap_or(config.patent_office.as_str()).to_string();
    let ucid = tree.get_attr("ucid").unwrap_or("").to_string();
    let prefix = ucid.strip_suffix("-VP").unwrap_or(&ucid);
    let doc_number = prefix.strip_prefix(&format!("{office}-")).unwrap_or(prefix).to_string();

    let source_path_attr = tree.get_attr("_source_file_path").unwrap_or("").to_string();
    let relative_dir = Path::new(&source_path_attr)
        .parent()
        .and_then(|p| p.strip_prefix(root).ok())
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();
    let folder_index = folder_order.get(&relative_dir).copied().unwrap_or(0);

    let meta = FolderMeta {
        xml_file_name: temp_path.file_name().unwrap_or_default().to_string_lossy().into_owned(),
        relative_dir,
        folder_index,
    };
    let (prepared, source_path) = prepare_for_serialization(&tree, &meta);
    let max_words = config.max_text_length_words();

    for format in &config.output_formats {
        let out_dir = derive_output_dir(&config.destination_path, &office, format, &source_path, config.original_directory_structure);
        fs::create_dir_all(&out_dir).map_err(Error::from)?;
        let file_name = output_file_name(&office, &doc_number, format);
        let rendered = render(&prepared, format, max_words)?;
        fs::write(out_dir.join(&file_name), &rendered).map_err(Error::from)?;

        if merged && config.enable_merged_inspection {
            let inspection_dir = config.destination_path.join("merged_patents_inspection").join(&office).join(format);
            fs::create_dir_all(&inspection_dir).map_err(Error::from)?;
            fs::write(inspection_dir.join(&file_name), &rendered).map_err(Error::from)?;
        }
    }

    fs::remove_file(temp_path).map_err(Error::from)?;
    Ok(())
}
