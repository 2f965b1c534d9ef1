//! Citation duplicate detection.
//!
//! Partitions a sequence of built [`Citation`] records into
//! duplicate-equivalence classes and designates a canonical representative
//! per class.  The motivating case is hand-maintained publication lists in
//! which the same paper appears twice with DOIs differing only in suffix.
//!
//! ## Matching criteria
//!
//! Two records belong to the same class iff all of the following hold:
//!
//! 1. their title comparison keys are equal (case-insensitive,
//!    whitespace- and punctuation-collapsed),
//! 2. their years are equal,
//! 3. the Jaccard similarity of their author-name sets is at or above the
//!    configured threshold (default 0.8).
//!
//! Author-set elements are family-name comparison keys, so initial-only
//! transcription variants ("J. -F. Mao" vs "J. Mao") collapse to the same
//! element; residual near-misses still intersect through a Jaro-Winkler
//! fuzzy match.  The partition is the transitive closure of the pairwise
//! relation, computed with a union-find, so A~B and B~C places A, B, and C
//! in one class even when A and C miss the pairwise threshold.
//!
//! ## Usage
//!
//! ```
//! use citeline::dedupe::{Deduplicator, DeduplicatorConfig};
//! use citeline::{CitationParser, FreeformParser};
//!
//! let parser = FreeformParser::new();
//! let mut citations = vec![
//!     parser.parse_line(r#"C. Li, "A Sensor," IEEE Sensors Journal, vol. 1, no. 1, pp. 1-4, 2021, doi: 10.1109/JSEN.2021.1111111."#).unwrap(),
//!     parser.parse_line(r#"C. Li, "A Sensor," IEEE Sensors Journal, vol. 1, no. 1, pp. 1-4, 2021, doi: 10.1109/JSEN.2021.2222222."#).unwrap(),
//! ];
//!
//! let groups = Deduplicator::new().find_duplicates(&mut citations);
//! assert_eq!(groups.len(), 1);
//! assert_eq!(citations[0].canonical_id, Some(0));
//! assert_eq!(citations[1].canonical_id, Some(0));
//! ```
//!
//! ## Performance
//!
//! - Time complexity: O(n²) comparisons without year grouping
//! - With year grouping (default): O(Σ n_y²) over per-year bucket sizes —
//!   lossless, since year equality is a required criterion
//! - The parallel path distributes bucket comparisons across rayon workers;
//!   union-find merges are commutative and associative, so any completion
//!   order yields the same partition

use crate::utils::comparison_key;
use crate::{Citation, DuplicateGroup};
use compact_str::CompactString;
use std::collections::BTreeMap;
use strsim::jaro_winkler;

/// Minimum Jaro-Winkler similarity for two author-name keys to count as the
/// same set element when they are not byte-equal.
const AUTHOR_FUZZY_MATCH_THRESHOLD: f64 = 0.9;

/// Configuration options for the deduplication process.
///
/// # Examples
///
/// ```
/// use citeline::dedupe::DeduplicatorConfig;
///
/// let config = DeduplicatorConfig {
///     group_by_year: true,
///     run_in_parallel: true,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct DeduplicatorConfig {
    /// Whether to bucket citations by year before pairwise comparison.
    /// Lossless (year equality is required for a match) and much faster on
    /// large inputs.
    pub group_by_year: bool,
    /// Whether to compare year buckets on rayon workers.  Ignored when
    /// `group_by_year` is false.
    pub run_in_parallel: bool,
    /// Minimum Jaccard similarity of two records' author-name sets.
    /// Clamped to [0.0, 1.0] by [`Deduplicator::with_config`].
    pub author_similarity_threshold: f64,
}

impl Default for DeduplicatorConfig {
    fn default() -> Self {
        Self {
            group_by_year: true,
            run_in_parallel: false,
            author_similarity_threshold: 0.8,
        }
    }
}

/// Duplicate detection engine.
///
/// See the [module documentation](self) for the matching criteria.
#[derive(Debug, Default, Clone)]
pub struct Deduplicator {
    config: DeduplicatorConfig,
}

/// Comparison keys computed once per citation before the pairwise pass.
#[derive(Debug)]
struct PreprocessedCitation {
    title_key: CompactString,
    year: i32,
    /// Sorted, deduplicated family-name comparison keys.
    author_keys: Vec<CompactString>,
}

impl Deduplicator {
    /// Creates a new Deduplicator with the default configuration
    /// (year grouping on, parallelism off, author threshold 0.8).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a Deduplicator with a custom configuration.
    ///
    /// `run_in_parallel` is ignored when `group_by_year` is false, and the
    /// author threshold is clamped to [0.0, 1.0].
    #[must_use]
    pub fn with_config(mut self, mut config: DeduplicatorConfig) -> Self {
        if !config.group_by_year {
            config.run_in_parallel = false;
        }
        config.author_similarity_threshold = config.author_similarity_threshold.clamp(0.0, 1.0);
        self.config = config;
        self
    }

    /// Partitions `citations` into duplicate-equivalence classes.
    ///
    /// Every record's `canonical_id` is set to the index of its class's
    /// canonical representative (its own index for singletons).  The
    /// canonical member of a class is the record with the lexicographically
    /// smallest DOI, ties broken by input order; the choice never depends on
    /// bucket iteration order or worker scheduling.
    ///
    /// Returns the classes with at least two members, ordered by canonical
    /// index, with each group's `duplicates` in input order.
    pub fn find_duplicates(&self, citations: &mut [Citation]) -> Vec<DuplicateGroup> {
        if citations.is_empty() {
            return Vec::new();
        }

        let preprocessed: Vec<PreprocessedCitation> =
            citations.iter().map(Self::preprocess).collect();

        let edges = if self.config.group_by_year {
            let buckets = Self::group_by_year(&preprocessed);
            if self.config.run_in_parallel {
                use rayon::prelude::*;

                buckets
                    .par_iter()
                    .map(|(_, indices)| self.bucket_edges(&preprocessed, indices))
                    .reduce(Vec::new, |mut acc, mut part| {
                        acc.append(&mut part);
                        acc
                    })
            } else {
                let mut edges = Vec::new();
                for indices in buckets.values() {
                    edges.extend(self.bucket_edges(&preprocessed, indices));
                }
                edges
            }
        } else {
            let all: Vec<usize> = (0..preprocessed.len()).collect();
            self.bucket_edges(&preprocessed, &all)
        };

        let mut uf = UnionFind::new(citations.len());
        for (a, b) in edges {
            uf.union(a, b);
        }

        // Classes in input order, keyed by the (stable) smallest-index root.
        let mut classes: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for idx in 0..citations.len() {
            classes.entry(uf.find(idx)).or_default().push(idx);
        }

        let mut groups = Vec::new();
        for members in classes.values() {
            let canonical = *members
                .iter()
                .min_by_key(|&&idx| (&citations[idx].doi, idx))
                .expect("class is non-empty");

            for &idx in members {
                citations[idx].canonical_id = Some(canonical);
            }

            if members.len() > 1 {
                groups.push(DuplicateGroup {
                    canonical,
                    duplicates: members.iter().copied().filter(|&i| i != canonical).collect(),
                });
            }
        }
        groups.sort_by_key(|g| g.canonical);
        groups
    }

    fn preprocess(citation: &Citation) -> PreprocessedCitation {
        let mut author_keys: Vec<CompactString> = citation
            .authors
            .iter()
            .map(|a| comparison_key(&a.name))
            .filter(|k| !k.is_empty())
            .collect();
        author_keys.sort_unstable();
        author_keys.dedup();

        PreprocessedCitation {
            title_key: comparison_key(&citation.title),
            year: citation.year,
            author_keys,
        }
    }

    fn group_by_year(preprocessed: &[PreprocessedCitation]) -> BTreeMap<i32, Vec<usize>> {
        let mut buckets: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
        for (idx, p) in preprocessed.iter().enumerate() {
            buckets.entry(p.year).or_default().push(idx);
        }
        buckets
    }

    /// Pairwise comparison within one candidate bucket, returning matching
    /// index pairs.
    fn bucket_edges(
        &self,
        preprocessed: &[PreprocessedCitation],
        indices: &[usize],
    ) -> Vec<(usize, usize)> {
        let mut edges = Vec::new();
        for (pos, &i) in indices.iter().enumerate() {
            for &j in &indices[pos + 1..] {
                if self.is_duplicate(&preprocessed[i], &preprocessed[j]) {
                    edges.push((i, j));
                }
            }
        }
        edges
    }

    fn is_duplicate(&self, a: &PreprocessedCitation, b: &PreprocessedCitation) -> bool {
        !a.title_key.is_empty()
            && a.title_key == b.title_key
            && a.year == b.year
            && author_set_jaccard(&a.author_keys, &b.author_keys)
                >= self.config.author_similarity_threshold
    }
}

/// Jaccard similarity of two sorted author-key sets.
///
/// Exact matches are counted first; leftovers then intersect through a
/// greedy Jaro-Winkler pass in sorted order, so the result is deterministic.
fn author_set_jaccard(a: &[CompactString], b: &[CompactString]) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }

    let mut exact = 0usize;
    let mut rest_a = Vec::new();
    let mut rest_b: Vec<&CompactString> = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Equal => {
                exact += 1;
                i += 1;
                j += 1;
            }
            std::cmp::Ordering::Less => {
                rest_a.push(&a[i]);
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                rest_b.push(&b[j]);
                j += 1;
            }
        }
    }
    rest_a.extend(a[i..].iter());
    rest_b.extend(b[j..].iter());

    let mut fuzzy = 0usize;
    let mut used = vec![false; rest_b.len()];
    for key_a in &rest_a {
        if let Some(pos) = rest_b.iter().enumerate().position(|(idx, key_b)| {
            !used[idx] && jaro_winkler(key_a.as_str(), key_b.as_str()) >= AUTHOR_FUZZY_MATCH_THRESHOLD
        }) {
            used[pos] = true;
            fuzzy += 1;
        }
    }

    let intersection = exact + fuzzy;
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

/// Index-keyed union-find with deterministic smallest-index roots.
///
/// `union` is commutative and associative: the final partition depends only
/// on the set of merged pairs, never on merge order, which is what lets the
/// parallel bucket path share this structure safely.
struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            // Path halving
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi] = lo;
        }
    }
}
