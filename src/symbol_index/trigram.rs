//! Trigram postings over index keys
//!
//! Built once when a [`QueryEngine`](super::QueryEngine) is created. Every key
//! containing a needle also contains all of the needle's trigrams, so
//! intersecting postings narrows the keys that need a real substring check.

use std::collections::HashMap;

pub(crate) struct TrigramIndex {
    postings: HashMap<u32, Vec<u32>>,
}

impl TrigramIndex {
    /// `keys` must be yielded in id order
    pub fn build<'a>(keys: impl Iterator<Item = &'a str>) -> Self {
        let mut postings: HashMap<u32, Vec<u32>> = HashMap::new();
        for (id, key) in keys.enumerate() {
            let id = id as u32;
            for trigram in trigrams(key) {
                let list = postings.entry(trigram).or_default();
                if list.last() != Some(&id) {
                    list.push(id);
                }
            }
        }
        Self { postings }
    }

    /// Ids of keys that may contain `needle`, ascending.
    ///
    /// `None` means the needle is too short to filter on and every key is a
    /// candidate.
    pub fn candidates(&self, needle: &str) -> Option<Vec<u32>> {
        let mut wanted: Vec<u32> = trigrams(needle).collect();
        if wanted.is_empty() {
            return None;
        }
        wanted.sort_unstable();
        wanted.dedup();

        let mut lists = Vec::with_capacity(wanted.len());
        for trigram in &wanted {
            match self.postings.get(trigram) {
                Some(list) => lists.push(list),
                None => return Some(Vec::new()),
            }
        }
        lists.sort_by_key(|list| list.len());

        let mut iter = lists.into_iter();
        let mut base = iter.next().cloned().unwrap_or_default();
        for list in iter {
            if base.is_empty() {
                break;
            }
            base.retain(|id| list.binary_search(id).is_ok());
        }
        Some(base)
    }
}

fn trigrams(s: &str) -> impl Iterator<Item = u32> + '_ {
    s.as_bytes()
        .windows(3)
        .map(|w| ((w[0] as u32) << 16) | ((w[1] as u32) << 8) | w[2] as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_narrow_to_matching_keys() {
        let keys = ["parse", "parse_error", "pop_back", "push_back"];
        let index = TrigramIndex::build(keys.iter().copied());

        assert_eq!(index.candidates("back"), Some(vec![2, 3]));
        assert_eq!(index.candidates("pars"), Some(vec![0, 1]));
        assert_eq!(index.candidates("xyz"), Some(vec![]));
    }

    #[test]
    fn test_short_needles_are_not_filtered() {
        let index = TrigramIndex::build(["parse"].iter().copied());
        assert_eq!(index.candidates("pa"), None);
        assert_eq!(index.candidates(""), None);
    }

    #[test]
    fn test_repeated_trigrams_post_once() {
        let index = TrigramIndex::build(["aaaa", "aaa"].iter().copied());
        assert_eq!(index.candidates("aaa"), Some(vec![0, 1]));
    }
}
