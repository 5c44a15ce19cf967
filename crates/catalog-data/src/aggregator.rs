//! Catalog aggregations: the counts and distributions behind every analysis.
//!
//! Each aggregation is a pure function of the record slice. Label-based
//! rankings are built by tallying in first-seen order and then stable-sorting
//! by count, so equal counts keep the order in which labels first appeared.

use std::collections::{BTreeMap, HashMap};

use catalog_core::date_parsing::extract_year;
use catalog_core::formatting::ratio;
use catalog_core::models::BookRecord;
use serde::Serialize;

/// Default number of authors returned by [`CatalogAggregator::top_authors`].
pub const DEFAULT_TOP_AUTHORS: usize = 5;

/// Books per publication year, ascending by year.
pub type YearCounts = BTreeMap<i32, usize>;

/// Books per language within each publication year.
pub type YearLanguageCounts = BTreeMap<i32, BTreeMap<String, usize>>;

// ── Result types ──────────────────────────────────────────────────────────────

/// One row of the top-authors ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorCount {
    pub author: String,
    pub count: usize,
}

/// One row of the language distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageShare {
    pub language: String,
    pub count: usize,
    /// Share of all records, in `0.0..=1.0`.
    pub percentage: f64,
}

/// One row of the publisher ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublisherCount {
    pub publisher: String,
    pub count: usize,
}

/// How many records lack an ISBN.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MissingIsbnSummary {
    pub missing: usize,
    pub total: usize,
    /// `missing / total`, or `0.0` for an empty catalog.
    pub percentage: f64,
}

impl MissingIsbnSummary {
    /// Records that do carry an ISBN.
    pub fn present(&self) -> usize {
        self.total - self.missing
    }
}

// ── LabelTally ────────────────────────────────────────────────────────────────

/// Occurrence counter that remembers the order labels were first seen.
#[derive(Debug, Default)]
struct LabelTally {
    positions: HashMap<String, usize>,
    counts: Vec<(String, usize)>,
}

impl LabelTally {
    fn add(&mut self, label: &str) {
        match self.positions.get(label) {
            Some(&position) => self.counts[position].1 += 1,
            None => {
                self.positions.insert(label.to_string(), self.counts.len());
                self.counts.push((label.to_string(), 1));
            }
        }
    }

    /// Labels by count descending; ties stay in first-seen order.
    fn most_common(self) -> Vec<(String, usize)> {
        let mut counts = self.counts;
        // `sort_by` is stable.
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }
}

fn tally<'a>(labels: impl Iterator<Item = &'a str>) -> LabelTally {
    let mut tally = LabelTally::default();
    for label in labels {
        tally.add(label);
    }
    tally
}

// ── CatalogAggregator ─────────────────────────────────────────────────────────

/// Stateless helper computing every catalog aggregation.
pub struct CatalogAggregator;

impl CatalogAggregator {
    /// Books published per year. Records without a year are skipped.
    pub fn publication_trends(records: &[BookRecord]) -> YearCounts {
        let mut counts = YearCounts::new();
        for year in records
            .iter()
            .filter_map(|r| extract_year(&r.publication_date))
        {
            *counts.entry(year).or_insert(0) += 1;
        }
        counts
    }

    /// The `limit` most prolific authors; blank authors count as `"Unknown"`.
    pub fn top_authors(records: &[BookRecord], limit: usize) -> Vec<AuthorCount> {
        tally(records.iter().map(BookRecord::author_label))
            .most_common()
            .into_iter()
            .take(limit)
            .map(|(author, count)| AuthorCount { author, count })
            .collect()
    }

    /// Books per language with each language's share of the whole catalog.
    pub fn language_distribution(records: &[BookRecord]) -> Vec<LanguageShare> {
        let total = records.len();
        tally(records.iter().map(BookRecord::language_label))
            .most_common()
            .into_iter()
            .map(|(language, count)| LanguageShare {
                language,
                count,
                percentage: ratio(count, total),
            })
            .collect()
    }

    /// Books per publisher, most prolific first.
    pub fn publisher_counts(records: &[BookRecord]) -> Vec<PublisherCount> {
        tally(records.iter().map(BookRecord::publisher_label))
            .most_common()
            .into_iter()
            .map(|(publisher, count)| PublisherCount { publisher, count })
            .collect()
    }

    /// Count records whose ISBN is absent or blank.
    pub fn missing_isbn(records: &[BookRecord]) -> MissingIsbnSummary {
        let total = records.len();
        let missing = records.iter().filter(|r| r.is_isbn_missing()).count();
        MissingIsbnSummary {
            missing,
            total,
            percentage: ratio(missing, total),
        }
    }

    /// Books per language for every publication year.
    pub fn year_language(records: &[BookRecord]) -> YearLanguageCounts {
        let mut counts = YearLanguageCounts::new();
        for record in records {
            let Some(year) = extract_year(&record.publication_date) else {
                continue;
            };
            *counts
                .entry(year)
                .or_default()
                .entry(record.language_label().to_string())
                .or_insert(0) += 1;
        }
        counts
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
