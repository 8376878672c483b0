//! Symbol search
//!
//! Incremental substring queries against a built [`Index`]. Results are
//! grouped by key and ranked deterministically:
//!
//! 1. exact key match
//! 2. prefix match
//! 3. interior substring match
//!
//! then shorter keys first, then key order. Entries inside a group keep the
//! order the index stored them in.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::trace;

use super::error::QueryError;
use super::normalize::{normalize, IndexKey};
use super::store::Index;
use super::symbol::{IndexEntry, SymbolKind};
use super::trigram::TrigramIndex;
use crate::config::IndexConfig;

/// Structured search query
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    /// Text as typed; normalized before matching
    pub text: String,
    /// Maximum number of groups to return
    pub limit: Option<usize>,
    /// Only keep entries of these kinds
    pub kinds: Option<Vec<SymbolKind>>,
}

impl SearchQuery {
    pub fn text(query: &str) -> Self {
        Self {
            text: query.to_string(),
            ..Default::default()
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_kinds(mut self, kinds: Vec<SymbolKind>) -> Self {
        self.kinds = Some(kinds);
        self
    }
}

/// How a key matched the query
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Prefix,
    Substring,
}

/// All entries stored under one matching key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultGroup {
    pub key: IndexKey,
    pub match_kind: MatchKind,
    pub entries: Vec<IndexEntry>,
}

/// Convert a signed limit from an untyped caller
pub fn parse_limit(limit: i64) -> Result<usize, QueryError> {
    usize::try_from(limit).map_err(|_| QueryError::InvalidLimit(limit))
}

/// Read-only query front end over a shared index.
///
/// Holds no per-query state, so one engine can serve many threads.
pub struct QueryEngine {
    index: Arc<Index>,
    /// Keys in index order; position is the key id used by `trigrams`
    keys: Vec<IndexKey>,
    trigrams: TrigramIndex,
    default_limit: Option<usize>,
}

#[derive(Clone, Copy)]
struct Candidate<'a> {
    match_kind: MatchKind,
    key: &'a IndexKey,
}

impl Candidate<'_> {
    fn rank(&self, other: &Self) -> Ordering {
        self.match_kind
            .cmp(&other.match_kind)
            .then_with(|| self.key.len().cmp(&other.key.len()))
            .then_with(|| self.key.cmp(other.key))
    }
}

impl QueryEngine {
    pub fn new(index: Arc<Index>) -> Self {
        let keys: Vec<IndexKey> = index.keys().cloned().collect();
        let trigrams = TrigramIndex::build(keys.iter().map(IndexKey::as_str));
        trace!(keys = keys.len(), "query engine warmed up");
        Self {
            index,
            keys,
            trigrams,
            default_limit: None,
        }
    }

    pub fn with_config(index: Arc<Index>, config: &IndexConfig) -> Self {
        let mut engine = Self::new(index);
        engine.default_limit = config.default_limit;
        engine
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Ranked groups for `input`; `limit` caps the group count after ranking
    pub fn query(&self, input: &str, limit: Option<usize>) -> Vec<ResultGroup> {
        self.search(&SearchQuery {
            text: input.to_string(),
            limit,
            kinds: None,
        })
    }

    pub fn search(&self, query: &SearchQuery) -> Vec<ResultGroup> {
        let Some(needle) = normalize(&query.text) else {
            return Vec::new();
        };
        let limit = query.limit.or(self.default_limit);
        if limit == Some(0) {
            return Vec::new();
        }
        let kinds = query.kinds.as_deref();
        let needle = needle.as_str();

        let mut matches = Vec::new();

        // Keys starting with the needle sit in one contiguous sorted run
        let start = self.keys.partition_point(|k| k.as_str() < needle);
        for key in self.keys[start..]
            .iter()
            .take_while(|k| k.as_str().starts_with(needle))
        {
            if !self.has_kind(key, kinds) {
                continue;
            }
            let match_kind = if key.len() == needle.len() {
                MatchKind::Exact
            } else {
                MatchKind::Prefix
            };
            matches.push(Candidate { match_kind, key });
        }

        // Interior matches can't outrank a full set of prefix matches
        let prefix_complete = limit.is_some_and(|l| matches.len() >= l);
        if !prefix_complete {
            match self.trigrams.candidates(needle) {
                Some(ids) => {
                    for id in ids {
                        self.push_interior(&self.keys[id as usize], needle, kinds, &mut matches);
                    }
                }
                None => {
                    for key in &self.keys {
                        self.push_interior(key, needle, kinds, &mut matches);
                    }
                }
            }
        }

        if let Some(limit) = limit {
            if matches.len() > limit {
                matches.select_nth_unstable_by(limit, Candidate::rank);
                matches.truncate(limit);
            }
        }
        matches.sort_unstable_by(Candidate::rank);

        let groups: Vec<ResultGroup> = matches
            .into_iter()
            .map(|candidate| self.group(candidate, kinds))
            .collect();
        trace!(query = %query.text, groups = groups.len(), "symbol query");
        groups
    }

    fn push_interior<'a>(
        &self,
        key: &'a IndexKey,
        needle: &str,
        kinds: Option<&[SymbolKind]>,
        matches: &mut Vec<Candidate<'a>>,
    ) {
        let key_str = key.as_str();
        if key_str.starts_with(needle) || !key_str.contains(needle) {
            return;
        }
        if self.has_kind(key, kinds) {
            matches.push(Candidate {
                match_kind: MatchKind::Substring,
                key,
            });
        }
    }

    fn has_kind(&self, key: &IndexKey, kinds: Option<&[SymbolKind]>) -> bool {
        match kinds {
            Some(kinds) => self
                .index
                .get(key)
                .is_some_and(|entries| entries.iter().any(|e| kinds.contains(&e.kind))),
            None => true,
        }
    }

    fn group(&self, candidate: Candidate<'_>, kinds: Option<&[SymbolKind]>) -> ResultGroup {
        let entries = self
            .index
            .get(candidate.key)
            .unwrap_or_default()
            .iter()
            .filter(|e| kinds.map_or(true, |kinds| kinds.contains(&e.kind)))
            .cloned()
            .collect();
        ResultGroup {
            key: candidate.key.clone(),
            match_kind: candidate.match_kind,
            entries,
        }
    }
}
