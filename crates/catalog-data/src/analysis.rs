//! Combined catalog report and presentation-ready views of the aggregations.

use std::collections::BTreeSet;

use catalog_core::error::Result;
use catalog_core::models::BookRecord;
use serde::Serialize;
use tracing::debug;

use crate::aggregator::{
    AuthorCount, CatalogAggregator, LanguageShare, MissingIsbnSummary, PublisherCount,
    YearCounts, YearLanguageCounts,
};

// ── CatalogReport ─────────────────────────────────────────────────────────────

/// Every aggregation computed over one catalog snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogReport {
    pub total_records: usize,
    pub publication_trends: YearCounts,
    /// Limit that was applied to [`CatalogReport::top_authors`].
    pub top_authors_limit: usize,
    pub top_authors: Vec<AuthorCount>,
    pub language_distribution: Vec<LanguageShare>,
    pub publisher_counts: Vec<PublisherCount>,
    pub missing_isbn: MissingIsbnSummary,
    pub year_language: YearLanguageCounts,
}

impl CatalogReport {
    /// Pretty-printed JSON rendering of the report.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Run all six aggregations over `records`.
pub fn analyze_catalog(records: &[BookRecord], top_authors_limit: usize) -> CatalogReport {
    let report = CatalogReport {
        total_records: records.len(),
        publication_trends: CatalogAggregator::publication_trends(records),
        top_authors_limit,
        top_authors: CatalogAggregator::top_authors(records, top_authors_limit),
        language_distribution: CatalogAggregator::language_distribution(records),
        publisher_counts: CatalogAggregator::publisher_counts(records),
        missing_isbn: CatalogAggregator::missing_isbn(records),
        year_language: CatalogAggregator::year_language(records),
    };

    debug!(
        "Analyzed {} records: {} years, {} languages, {} publishers, {} missing ISBNs",
        report.total_records,
        report.publication_trends.len(),
        report.language_distribution.len(),
        report.publisher_counts.len(),
        report.missing_isbn.missing,
    );

    report
}

// ── YearLanguageMatrix ────────────────────────────────────────────────────────

/// The year × language breakdown laid out as a dense grid.
///
/// `counts[i][j]` is the number of books in `years[i]` written in
/// `languages[j]`; combinations with no books are `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearLanguageMatrix {
    pub years: Vec<i32>,
    /// Every language seen in any year, sorted.
    pub languages: Vec<String>,
    pub counts: Vec<Vec<usize>>,
}

impl YearLanguageMatrix {
    pub fn from_counts(counts: &YearLanguageCounts) -> Self {
        let years: Vec<i32> = counts.keys().copied().collect();
        let languages: Vec<String> = counts
            .values()
            .flat_map(|per_year| per_year.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let counts: Vec<Vec<usize>> = counts
            .values()
            .map(|per_year| {
                languages
                    .iter()
                    .map(|language| per_year.get(language).copied().unwrap_or(0))
                    .collect()
            })
            .collect();

        Self {
            years,
            languages,
            counts,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Table header: `Year` followed by every language.
    pub fn headers(&self) -> Vec<String> {
        std::iter::once("Year".to_string())
            .chain(self.languages.iter().cloned())
            .collect()
    }

    /// Table rows: the year followed by its count for every language.
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.years
            .iter()
            .zip(&self.counts)
            .map(|(year, row)| {
                std::iter::once(year.to_string())
                    .chain(row.iter().map(usize::to_string))
                    .collect()
            })
            .collect()
    }

    /// Year labels for a chart's x axis.
    pub fn year_labels(&self) -> Vec<String> {
        self.years.iter().map(i32::to_string).collect()
    }

    /// One `(language, counts per year)` series per language.
    pub fn series(&self) -> Vec<(String, Vec<usize>)> {
        self.languages
            .iter()
            .enumerate()
            .map(|(j, language)| {
                let values: Vec<usize> = self.counts.iter().map(|row| row[j]).collect();
                (language.clone(), values)
            })
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
