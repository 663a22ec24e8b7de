//! In-memory suggestion index.
//!
//! The index maps whitespace tokens of `"{name} {description}"` to the
//! catalog positions containing them. It is rebuilt from the catalog on
//! every setup and holds no per-query state, so repeated queries always see
//! the same postings.
//!
//! Matching is prefix-based: an entry matches a query when every query token
//! is a prefix of at least one of the entry's tokens. That is what makes
//! `"ba"` find an entry described as `"bar baz"`.

pub mod tokenize;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::catalog::Catalog;

pub use tokenize::tokenize;

/// A catalog position matched by a query, with its hit count.
///
/// `hits` is the number of (query token, entry token) prefix pairs and is
/// used as the relevance signal when ranking suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexMatch {
    /// Position of the entry in the catalog.
    pub id: u32,
    /// Number of prefix hits across all query tokens.
    pub hits: u32,
}

/// Token postings over a catalog.
#[derive(Debug, Default)]
pub struct SuggestIndex {
    // Sorted so a prefix scan is a contiguous range.
    postings: BTreeMap<String, Vec<u32>>,
}

impl SuggestIndex {
    /// Build the index from a catalog.
    pub fn build(catalog: &Catalog) -> Self {
        let mut postings: BTreeMap<String, BTreeSet<u32>> = BTreeMap::new();

        for (id, entry) in catalog.entries().enumerate() {
            for token in tokenize(&entry.datum()) {
                postings.entry(token).or_default().insert(id as u32);
            }
        }

        Self {
            postings: postings
                .into_iter()
                .map(|(token, ids)| (token, ids.into_iter().collect()))
                .collect(),
        }
    }

    /// Number of distinct tokens in the index.
    pub fn token_count(&self) -> usize {
        self.postings.len()
    }

    /// Find entries matching every query token by prefix.
    ///
    /// Returns matches ordered by hits (highest first), ties broken by
    /// catalog position for determinism. An empty token list matches nothing.
    pub fn query(&self, tokens: &[String]) -> Vec<IndexMatch> {
        let mut combined: Option<HashMap<u32, u32>> = None;

        for token in tokens {
            let hits = self.ids_with_prefix(token);

            combined = Some(match combined {
                None => hits,
                Some(previous) => {
                    // Intersection: every query token must match somewhere.
                    previous
                        .into_iter()
                        .filter_map(|(id, count)| {
                            hits.get(&id).map(|extra| (id, count + extra))
                        })
                        .collect()
                }
            });

            if combined.as_ref().is_some_and(HashMap::is_empty) {
                break;
            }
        }

        let mut matches: Vec<IndexMatch> = combined
            .unwrap_or_default()
            .into_iter()
            .map(|(id, hits)| IndexMatch { id, hits })
            .collect();

        matches.sort_by(|a, b| b.hits.cmp(&a.hits).then(a.id.cmp(&b.id)));
        matches
    }

    /// Collect entry ids whose tokens start with `prefix`, with hit counts.
    fn ids_with_prefix(&self, prefix: &str) -> HashMap<u32, u32> {
        let mut out: HashMap<u32, u32> = HashMap::new();

        for (token, ids) in self.postings.range(prefix.to_string()..) {
            if !token.starts_with(prefix) {
                break;
            }
            for &id in ids {
                *out.entry(id).or_insert(0) += 1;
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;

    fn entry(name: &str, description: &str) -> CatalogEntry {
        CatalogEntry {
            name: name.to_string(),
            description: description.to_string(),
            img: None,
            filename: format!("/asset-doc/object/{}.html", name),
        }
    }

    fn catalog(entries: Vec<CatalogEntry>) -> Catalog {
        Catalog::from_entries(entries)
    }

    fn query_str(index: &SuggestIndex, query: &str) -> Vec<u32> {
        index.query(&tokenize(query)).iter().map(|m| m.id).collect()
    }

    #[test]
    fn test_prefix_match_on_description_token() {
        // Querying "ba" finds "Foo" through whitespace tokenization
        // of "bar baz".
        let cat = catalog(vec![entry("Foo", "bar baz")]);
        let index = SuggestIndex::build(&cat);

        assert_eq!(query_str(&index, "ba"), vec![0]);
    }

    #[test]
    fn test_prefix_match_on_name() {
        let cat = catalog(vec![entry("campfire", "keeps you warm")]);
        let index = SuggestIndex::build(&cat);

        assert_eq!(query_str(&index, "camp"), vec![0]);
    }

    #[test]
    fn test_no_substring_match_mid_token() {
        // "fire" is not a prefix of "campfire"; whitespace tokenization
        // does not do infix matching.
        let cat = catalog(vec![entry("campfire", "")]);
        let index = SuggestIndex::build(&cat);

        assert!(query_str(&index, "fire").is_empty());
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let cat = catalog(vec![entry("Campfire", "Warm Light")]);
        let index = SuggestIndex::build(&cat);

        assert_eq!(query_str(&index, "CAMP"), vec![0]);
        assert_eq!(query_str(&index, "warm"), vec![0]);
    }

    #[test]
    fn test_all_query_tokens_must_match() {
        let cat = catalog(vec![
            entry("campfire", "warm light"),
            entry("torch", "warm handheld"),
        ]);
        let index = SuggestIndex::build(&cat);

        // "warm" alone matches both
        assert_eq!(query_str(&index, "warm").len(), 2);
        // "warm hand" only matches the torch
        assert_eq!(query_str(&index, "warm hand"), vec![1]);
        // a token matching nothing kills the whole query
        assert!(query_str(&index, "warm xyzzy").is_empty());
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        let cat = catalog(vec![entry("campfire", "warm")]);
        let index = SuggestIndex::build(&cat);

        assert!(index.query(&[]).is_empty());
    }

    #[test]
    fn test_hits_rank_denser_matches_first() {
        // "to torch totem" hits the query "to" three times, "torch" once.
        let cat = catalog(vec![
            entry("torch", "a handheld light"),
            entry("totem", "to torch totem"),
        ]);
        let index = SuggestIndex::build(&cat);

        let matches = index.query(&tokenize("to"));
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].id, 1);
        assert!(matches[0].hits > matches[1].hits);
    }

    #[test]
    fn test_ties_broken_by_catalog_position() {
        let cat = catalog(vec![entry("beta", ""), entry("bed", ""), entry("bench", "")]);
        let index = SuggestIndex::build(&cat);

        assert_eq!(query_str(&index, "be"), vec![0, 1, 2]);
    }

    #[test]
    fn test_duplicate_tokens_counted_once_per_entry() {
        // The datum "fire fire fire" holds one distinct token; postings
        // must not inflate the entry's presence.
        let cat = catalog(vec![entry("brazier", "fire fire fire")]);
        let index = SuggestIndex::build(&cat);

        let matches = index.query(&tokenize("fire"));
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].hits, 1);
    }

    #[test]
    fn test_token_count() {
        let cat = catalog(vec![entry("foo", "bar baz"), entry("qux", "bar")]);
        let index = SuggestIndex::build(&cat);

        // foo, bar, baz, qux
        assert_eq!(index.token_count(), 4);
    }

    #[test]
    fn test_rebuild_fresh_reflects_catalog() {
        let first = SuggestIndex::build(&catalog(vec![entry("foo", "")]));
        let second = SuggestIndex::build(&catalog(vec![entry("bar", "")]));

        assert_eq!(query_str(&first, "fo"), vec![0]);
        assert!(query_str(&second, "fo").is_empty());
        assert_eq!(query_str(&second, "ba"), vec![0]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // Every entry is findable by the full first token of its name
            #[test]
            fn prop_entries_findable_by_name_token(name in "[a-z]{1,12}") {
                let cat = catalog(vec![entry(&name, "some description")]);
                let index = SuggestIndex::build(&cat);
                prop_assert_eq!(query_str(&index, &name), vec![0u32]);
            }

            // A query never returns more matches than catalog entries
            #[test]
            fn prop_matches_bounded_by_catalog(
                names in proptest::collection::btree_set("[a-z]{1,8}", 0..20),
                query in "[a-z]{1,4}",
            ) {
                let cat = catalog(names.iter().map(|n| entry(n, "")).collect());
                let index = SuggestIndex::build(&cat);
                prop_assert!(index.query(&tokenize(&query)).len() <= cat.len());
            }
        }
    }
}
