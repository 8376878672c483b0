//! Index construction
//!
//! Turns the generator's flat record list into an [`Index`]: records are
//! grouped under their normalized key in input order, exact duplicates are
//! collapsed and the surviving overloads get a disambiguator.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

use super::error::BuildError;
use super::normalize::{self, IndexKey};
use super::store::Index;
use super::symbol::{IndexEntry, SymbolKind, SymbolRecord};
use crate::config::IndexConfig;

lazy_static! {
    static ref LOCATOR: Regex = Regex::new(r"^\S+$").unwrap();
}

/// A record that was skipped during a non-strict build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildWarning {
    /// Position of the record in the input
    pub position: usize,
    pub raw_name: String,
    pub error: BuildError,
}

impl std::fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "record #{} skipped: {}", self.position, self.error)
    }
}

/// Result of a build: the index plus every record that didn't make it in
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub index: Index,
    pub warnings: Vec<BuildWarning>,
}

#[derive(Debug, Clone, Default)]
pub struct IndexBuilder {
    config: IndexConfig,
}

impl IndexBuilder {
    pub fn new(config: IndexConfig) -> Self {
        Self { config }
    }

    /// Build an index from records in generator order.
    ///
    /// Identical input always produces an identical index.
    pub fn build(&self, records: Vec<SymbolRecord>) -> Result<BuildOutput, BuildError> {
        if records.is_empty() && self.config.require_non_empty {
            return Err(BuildError::EmptyRecordList);
        }

        let total = records.len();
        let mut groups: BTreeMap<IndexKey, Vec<IndexEntry>> = BTreeMap::new();
        let mut warnings = Vec::new();

        for (position, record) in records.into_iter().enumerate() {
            match to_entry(&record) {
                Ok((key, entry)) => groups.entry(key).or_default().push(entry),
                Err(error) if self.config.strict => return Err(error),
                Err(error) => {
                    warn!(position, raw_name = %record.raw_name, "skipping symbol record: {}", error);
                    warnings.push(BuildWarning {
                        position,
                        raw_name: record.raw_name,
                        error,
                    });
                }
            }
        }

        let index = finalize(groups);
        debug!(
            records = total,
            keys = index.len(),
            entries = index.entry_count(),
            skipped = warnings.len(),
            "built symbol index"
        );

        Ok(BuildOutput { index, warnings })
    }
}

/// Merge indexes built from separate shards of one record list.
///
/// Shards are concatenated per key in the order given, then duplicates and
/// disambiguators are recomputed over the merged lists.
pub fn merge_shards(shards: Vec<Index>) -> Index {
    let shard_count = shards.len();
    let mut groups: BTreeMap<IndexKey, Vec<IndexEntry>> = BTreeMap::new();
    for shard in shards {
        for (key, entries) in shard.into_groups() {
            groups.entry(key).or_default().extend(entries);
        }
    }

    let index = finalize(groups);
    debug!(shards = shard_count, keys = index.len(), "merged index shards");
    index
}

fn to_entry(record: &SymbolRecord) -> Result<(IndexKey, IndexEntry), BuildError> {
    if !LOCATOR.is_match(&record.locator) {
        return Err(BuildError::InvalidLocator {
            raw_name: record.raw_name.clone(),
        });
    }

    let key = normalize::normalize(&record.raw_name).ok_or_else(|| {
        BuildError::NormalizationFailure {
            raw_name: record.raw_name.clone(),
        }
    })?;

    // Qualified names and inline parameter lists fill in what the record leaves out
    let scope_path = if record.scope_path.is_empty() {
        normalize::qualifier(&record.raw_name)
    } else {
        record.scope_path.clone()
    };
    let signature = record
        .signature
        .clone()
        .or_else(|| normalize::parameter_list(&record.raw_name));

    let entry = IndexEntry {
        display_name: normalize::display_name(&record.raw_name),
        scope_path,
        kind: record.kind,
        locator: record.locator.clone(),
        template_args: normalize::template_arguments(&record.raw_name),
        signature,
        disambiguator: None,
    };
    Ok((key, entry))
}

/// Collapse duplicates (first occurrence wins) and label overloads
fn finalize(mut groups: BTreeMap<IndexKey, Vec<IndexEntry>>) -> Index {
    for entries in groups.values_mut() {
        let mut seen: HashSet<(Vec<String>, SymbolKind, String)> = HashSet::new();
        entries.retain(|entry| {
            let (scope, kind, locator) = entry.identity();
            seen.insert((scope.to_vec(), kind, locator.to_string()))
        });

        let ambiguous = entries.len() > 1;
        for entry in entries.iter_mut() {
            entry.disambiguator = ambiguous.then(|| disambiguator(entry));
        }
    }
    Index::from_groups(groups)
}

fn disambiguator(entry: &IndexEntry) -> String {
    if entry.template_args.is_none() && entry.signature.is_none() {
        return entry.qualified_scope();
    }
    let mut label = String::new();
    if !entry.scope_path.is_empty() {
        label.push_str(&entry.qualified_scope());
        label.push_str("::");
    }
    label.push_str(&entry.display_name);
    label.push_str(entry.template_args.as_deref().unwrap_or(""));
    label.push_str(entry.signature.as_deref().unwrap_or(""));
    label
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, scope: &[&str], locator: &str) -> SymbolRecord {
        SymbolRecord::new(name, SymbolKind::Function, scope, locator)
    }

    fn build(records: Vec<SymbolRecord>) -> BuildOutput {
        IndexBuilder::default().build(records).unwrap()
    }

    #[test]
    fn test_overloads_in_different_scopes_are_kept() {
        let output = build(vec![
            record("push_back", &["json_pointer"], "json_pointer.html#a1"),
            record("push_back", &["basic_json"], "basic_json.html#a2"),
        ]);

        let entries = output.index.lookup("push_back").unwrap();
        assert_eq!(output.index.len(), 1);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].disambiguator.as_deref(), Some("json_pointer"));
        assert_eq!(entries[1].disambiguator.as_deref(), Some("basic_json"));
    }

    #[test]
    fn test_exact_duplicates_collapse_to_first() {
        let output = build(vec![
            record("patch", &["basic_json"], "basic_json.html#a81e"),
            record("patch", &["basic_json"], "basic_json.html#a81e").with_signature("(json)"),
        ]);

        let entries = output.index.lookup("patch").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].signature, None);
        assert_eq!(entries[0].disambiguator, None);
    }

    #[test]
    fn test_signature_overloads_are_labelled() {
        let output = build(vec![
            record("parse", &["nlohmann", "basic_json"], "basic_json.html#a265")
                .with_signature("(detail::input_adapter &&i)"),
            record("parse", &["nlohmann", "basic_json"], "basic_json.html#ab33")
                .with_signature("(IteratorType first, IteratorType last)"),
        ]);

        let entries = output.index.lookup("parse").unwrap();
        assert_eq!(
            entries[0].disambiguator.as_deref(),
            Some("nlohmann::basic_json::parse(detail::input_adapter &&i)")
        );
        assert_eq!(
            entries[1].disambiguator.as_deref(),
            Some("nlohmann::basic_json::parse(IteratorType first, IteratorType last)")
        );
    }

    #[test]
    fn test_qualified_raw_name_fills_scope_and_signature() {
        let output = build(vec![
            record("nlohmann::detail::parser::parse()", &[], "parser.html#a143"),
            record("parse", &[], "global.html#parse"),
        ]);

        let entries = output.index.lookup("parse").unwrap();
        assert_eq!(entries[0].scope_path, vec!["nlohmann", "detail", "parser"]);
        assert_eq!(entries[0].display_name, "parse");
        assert_eq!(
            entries[0].disambiguator.as_deref(),
            Some("nlohmann::detail::parser::parse()")
        );
        assert_eq!(entries[1].disambiguator.as_deref(), Some("(global)"));
    }

    #[test]
    fn test_template_specializations_are_told_apart() {
        let output = build(vec![
            SymbolRecord::new("std::hash<nlohmann::basic_json>", SymbolKind::Struct, &[], "a.html"),
            SymbolRecord::new("std::hash<nlohmann::json_pointer>", SymbolKind::Struct, &[], "b.html"),
        ]);

        let entries = output.index.lookup("hash").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].display_name, "hash");
        assert_eq!(entries[0].scope_path, vec!["std"]);
        assert_eq!(
            entries[0].disambiguator.as_deref(),
            Some("std::hash<nlohmann::basic_json>")
        );
        assert_eq!(
            entries[1].disambiguator.as_deref(),
            Some("std::hash<nlohmann::json_pointer>")
        );
        assert_ne!(entries[0].disambiguator, entries[1].disambiguator);
    }

    #[test]
    fn test_malformed_records_become_warnings() {
        let output = build(vec![
            record("pop_back", &["json_pointer"], ""),
            record("::", &[], "x.html"),
            record("patch", &["basic_json"], "has space.html"),
            record("parse", &["basic_json"], "basic_json.html#parse"),
        ]);

        assert_eq!(output.index.len(), 1);
        assert_eq!(output.warnings.len(), 3);
        assert_eq!(output.warnings[0].position, 0);
        assert!(matches!(output.warnings[0].error, BuildError::InvalidLocator { .. }));
        assert!(matches!(
            output.warnings[1].error,
            BuildError::NormalizationFailure { .. }
        ));
        assert!(matches!(output.warnings[2].error, BuildError::InvalidLocator { .. }));
    }

    #[test]
    fn test_strict_mode_aborts_on_first_bad_record() {
        let builder = IndexBuilder::new(IndexConfig {
            strict: true,
            ..Default::default()
        });
        let result = builder.build(vec![
            record("parse", &[], "a.html"),
            record("()", &[], "b.html"),
        ]);

        assert_eq!(
            result.unwrap_err(),
            BuildError::NormalizationFailure {
                raw_name: "()".to_string()
            }
        );
    }

    #[test]
    fn test_empty_input() {
        let output = build(vec![]);
        assert!(output.index.is_empty());
        assert!(output.warnings.is_empty());

        let strict = IndexBuilder::new(IndexConfig {
            require_non_empty: true,
            ..Default::default()
        });
        assert_eq!(strict.build(vec![]).unwrap_err(), BuildError::EmptyRecordList);
    }

    #[test]
    fn test_build_is_deterministic() {
        let records = vec![
            record("parse_error", &["nlohmann", "detail"], "parse_error.html"),
            record("parse", &["parser"], "parser.html#parse"),
            record("parse", &["basic_json"], "basic_json.html#parse"),
            record("parse", &["parser"], "parser.html#parse"),
        ];

        let first = build(records.clone()).index;
        let second = build(records).index;
        assert_eq!(first, second);
        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    }

    #[test]
    fn test_merge_shards_applies_dedup_after_merge() {
        let left = build(vec![record("pointer", &["iter_impl"], "iter_impl.html#ptr")]).index;
        let right = build(vec![
            record("pointer", &["iter_impl"], "iter_impl.html#ptr"),
            record("pointer", &["basic_json"], "basic_json.html#ptr"),
        ])
        .index;

        let merged = merge_shards(vec![left, right]);
        let entries = merged.lookup("pointer").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].scope_path, vec!["iter_impl"]);
        assert_eq!(entries[0].disambiguator.as_deref(), Some("iter_impl"));

        let sequential = build(vec![
            record("pointer", &["iter_impl"], "iter_impl.html#ptr"),
            record("pointer", &["iter_impl"], "iter_impl.html#ptr"),
            record("pointer", &["basic_json"], "basic_json.html#ptr"),
        ])
        .index;
        assert_eq!(merged, sequential);
    }
}
