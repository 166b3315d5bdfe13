//! Patent file identifiers and the group key they're batched and merged by.

use std::path::Path;

/// `(office, doc-number)` — files sharing this key belong to one patent
/// group and must land in the same batch.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PatentGroupKey {
    pub office: String,
    pub doc_number: String,
}

impl PatentGroupKey {
    pub fn unparseable(path: &str) -> Self {
        PatentGroupKey {
            office: "unparseable".to_string(),
            doc_number: path.to_string(),
        }
    }

    pub fn as_string(&self) -> String {
        format!("{}-{}", self.office, self.doc_number)
    }
}

/// One input file's identity: `<office>-<docnumber>-<kindcode>.xml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatentFileId {
    pub path: String,
    pub office: String,
    pub doc_number: String,
    pub kind_code: String,
}

impl PatentFileId {
    pub fn group_key(&self) -> PatentGroupKey {
        PatentGroupKey {
            office: self.office.clone(),
            doc_number: self.doc_number.clone(),
        }
    }
}

/// Parse `<office>-<docnumber>-<kindcode>.xml` from a file path.
///
/// Returns `None` when the file name doesn't match the pattern; the caller
/// (the batcher) is responsible for routing those into the synthetic
/// `unparseable` group rather than dropping them, counted in a warning.
pub fn parse_patent_file_name(path: &str) -> Option<PatentFileId> {
    let file_name = Path::new(path).file_stem()?.to_str()?;
    let mut parts = file_name.splitn(3, '-');
    let office = parts.next()?.to_string();
    let doc_number = parts.next()?.to_string();
    let kind_code = parts.next()?.to_string();

    if office.is_empty() || doc_number.is_empty() || kind_code.is_empty() {
        return None;
    }
    if !Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
    {
        return None;
    }

    Some(PatentFileId {
        path: path.to_string(),
        office,
        doc_number,
        kind_code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_name() {
        let id = parse_patent_file_name("/corpus/EP/EP-1234567-A1.xml").unwrap();
        assert_eq!(id.office, "EP");
        assert_eq!(id.doc_number, "1234567");
        assert_eq!(id.kind_code, "A1");
    }

    #[test]
    fn rejects_non_xml_extension() {
        assert!(parse_patent_file_name("/corpus/EP/EP-1234567-A1.txt").is_none());
    }

    #[test]
    fn rejects_missing_segments() {
        assert!(parse_patent_file_name("/corpus/EP/readme.xml").is_none());
        assert!(parse_patent_file_name("/corpus/EP/EP-1234567.xml").is_none());
    }

    #[test]
    fn group_key_ignores_kind_code() {
        let a = parse_patent_file_name("EP-1234567-A1.xml").unwrap();
        let b = parse_patent_file_name("EP-1234567-B1.xml").unwrap();
        assert_eq!(a.group_key(), b.group_key());
    }
}
