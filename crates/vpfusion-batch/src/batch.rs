//! Groups discovered files into work batches without ever splitting a
//! patent group's kind-code variants across two batches.

use std::collections::HashMap;

use tracing::warn;
use vpfusion_core::constants::MIN_BATCH_SIZE;
use vpfusion_core::identifier::{parse_patent_file_name, PatentGroupKey};

/// Accumulate patent groups (in first-seen order) into batches of roughly
/// `batch_size` files each. A group is never split; a batch may therefore
/// exceed `batch_size` by as much as the largest single group. Files whose
/// name doesn't match `<office>-<docnumber>-<kindcode>.xml` each become
/// their own single-file group rather than being silently dropped or pooled
/// together, and are counted in a single warning.
pub fn build_batches(files: &[String], batch_size: usize) -> Vec<Vec<String>> {
    let mut order: Vec<PatentGroupKey> = Vec::new();
    let mut groups: HashMap<PatentGroupKey, Vec<String>> = HashMap::new();
    let mut unparseable_count = 0usize;

    for file in files {
        let key = match parse_patent_file_name(file) {
            Some(id) => id.group_key(),
            None => {
                unparseable_count += 1;
                PatentGroupKey::unparseable(file)
            }
        };
        groups.entry(key.clone()).or_insert_with(|| {
            order.push(key.clone());
            Vec::new()
        });
        groups.get_mut(&key).unwrap().push(file.clone());
    }

    if unparseable_count > 0 {
        warn!(
            "{unparseable_count} file(s) did not match <office>-<docnumber>-<kindcode>.xml; \
             each was routed into its own single-file group"
        );
    }

    let mut batches: Vec<Vec<String>> = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for key in order {
        let group = groups.remove(&key).expect("every key in order was inserted into groups");
        current.extend(group);
        if current.len() >= batch_size {
            batches.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        match batches.last_mut() {
            Some(last) if current.len() < MIN_BATCH_SIZE => last.extend(current),
            _ => batches.push(current),
        }
    }

    batches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn keeps_a_patent_groups_variants_in_one_batch() {
        let input = files(&["EP-1-A1.xml", "EP-1-B1.xml", "EP-2-A1.xml"]);
        let batches = build_batches(&input, 2);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 3);
    }

    #[test]
    fn small_final_remainder_merges_into_previous_batch() {
        let input: Vec<String> = (0..22).map(|i| format!("EP-{i}-A1.xml")).collect();
        let batches = build_batches(&input, 10);
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].len() + batches[1].len(), 22);
        assert!(batches.iter().all(|b| b.len() >= MIN_BATCH_SIZE));
    }

    #[test]
    fn small_remainder_stands_alone_when_no_prior_batch_exists() {
        let input = files(&["EP-1-A1.xml", "EP-2-A1.xml"]);
        let batches = build_batches(&input, 50);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 2);
    }

    #[test]
    fn unparseable_files_each_become_their_own_group() {
        let input = files(&["readme.xml", "notes.xml"]);
        let batches = build_batches(&input, 50);
        assert_eq!(batches.iter().map(|b| b.len()).sum::<usize>(), 2);
    }
}
