//! Text rendering of each analysis, shared by the menu and the report view.

use catalog_core::formatting::{format_percentage, format_table};
use catalog_data::aggregator::{
    AuthorCount, LanguageShare, MissingIsbnSummary, PublisherCount, YearCounts,
};
use catalog_data::analysis::{CatalogReport, YearLanguageMatrix};

pub const PUBLICATION_TRENDS_TITLE: &str = "Publication Trends Over Time";
pub const LANGUAGE_DISTRIBUTION_TITLE: &str = "Language Distribution";
pub const PUBLISHER_COUNTS_TITLE: &str = "Books Published by Each Publisher";
pub const MISSING_ISBN_TITLE: &str = "Missing ISBN Analysis";
pub const YEAR_LANGUAGE_TITLE: &str = "Books per Year by Language";

pub const NO_YEARS_MESSAGE: &str = "No valid publication years found.";
pub const NO_YEARS_BY_LANGUAGE_MESSAGE: &str =
    "No valid publication years found for language breakdown.";

pub fn top_authors_title(limit: usize) -> String {
    format!("Top {limit} Most Prolific Authors")
}

pub fn publication_trends_table(trends: &YearCounts) -> String {
    let rows: Vec<Vec<String>> = trends
        .iter()
        .map(|(year, count)| vec![year.to_string(), count.to_string()])
        .collect();
    format_table(&["Year", "Count"], &rows)
}

pub fn top_authors_table(authors: &[AuthorCount]) -> String {
    let rows: Vec<Vec<String>> = authors
        .iter()
        .map(|a| vec![a.author.clone(), a.count.to_string()])
        .collect();
    format_table(&["Author", "Books"], &rows)
}

pub fn language_distribution_table(languages: &[LanguageShare]) -> String {
    let rows: Vec<Vec<String>> = languages
        .iter()
        .map(|l| {
            vec![
                l.language.clone(),
                l.count.to_string(),
                format_percentage(l.percentage),
            ]
        })
        .collect();
    format_table(&["Language", "Count", "Percentage"], &rows)
}

pub fn publisher_counts_table(publishers: &[PublisherCount]) -> String {
    let rows: Vec<Vec<String>> = publishers
        .iter()
        .map(|p| vec![p.publisher.clone(), p.count.to_string()])
        .collect();
    format_table(&["Publisher", "Books"], &rows)
}

pub fn missing_isbn_lines(summary: &MissingIsbnSummary) -> String {
    format!(
        "Missing ISBNs: {}\nTotal Records: {}\nPercentage Missing: {}",
        summary.missing,
        summary.total,
        format_percentage(summary.percentage)
    )
}

pub fn year_language_table(matrix: &YearLanguageMatrix) -> String {
    format_table(&matrix.headers(), &matrix.rows())
}

/// Every section of `report`, separated by blank lines.
pub fn text_report(report: &CatalogReport) -> String {
    let trends = if report.publication_trends.is_empty() {
        NO_YEARS_MESSAGE.to_string()
    } else {
        format!(
            "{PUBLICATION_TRENDS_TITLE}\n{}",
            publication_trends_table(&report.publication_trends)
        )
    };

    let matrix = YearLanguageMatrix::from_counts(&report.year_language);
    let year_language = if matrix.is_empty() {
        NO_YEARS_BY_LANGUAGE_MESSAGE.to_string()
    } else {
        format!("{YEAR_LANGUAGE_TITLE}\n{}", year_language_table(&matrix))
    };

    [
        format!("Total Records: {}", report.total_records),
        trends,
        format!(
            "{}\n{}",
            top_authors_title(report.top_authors_limit),
            top_authors_table(&report.top_authors)
        ),
        format!(
            "{LANGUAGE_DISTRIBUTION_TITLE}\n{}",
            language_distribution_table(&report.language_distribution)
        ),
        format!(
            "{PUBLISHER_COUNTS_TITLE}\n{}",
            publisher_counts_table(&report.publisher_counts)
        ),
        format!(
            "{MISSING_ISBN_TITLE}\n{}",
            missing_isbn_lines(&report.missing_isbn)
        ),
        year_language,
    ]
    .join("\n\n")
}
