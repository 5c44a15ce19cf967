//! Interactive text menu over a loaded catalog.
//!
//! The controller is generic over its input, output and chart backend so the
//! binary can drive it from the terminal while tests script it with in-memory
//! buffers and a recording [`ChartRenderer`].

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use catalog_charts::ChartRenderer;
use catalog_data::aggregator::CatalogAggregator;
use catalog_data::analysis::YearLanguageMatrix;
use catalog_data::reader::Catalog;
use tracing::{debug, info, warn};

use crate::sections::{
    language_distribution_table, missing_isbn_lines, publication_trends_table,
    publisher_counts_table, top_authors_table, top_authors_title, year_language_table,
    LANGUAGE_DISTRIBUTION_TITLE, MISSING_ISBN_TITLE, NO_YEARS_BY_LANGUAGE_MESSAGE,
    NO_YEARS_MESSAGE, PUBLICATION_TRENDS_TITLE, PUBLISHER_COUNTS_TITLE, YEAR_LANGUAGE_TITLE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
}

impl ChartKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Pie => "pie",
        }
    }
}

const ANY_CHART: &[ChartKind] = &[ChartKind::Bar, ChartKind::Line, ChartKind::Pie];
const BAR_OR_PIE: &[ChartKind] = &[ChartKind::Bar, ChartKind::Pie];
const BAR_OR_LINE: &[ChartKind] = &[ChartKind::Bar, ChartKind::Line];

pub struct MenuController<'a, R, W, C> {
    catalog: &'a Catalog,
    top_authors_limit: usize,
    input: R,
    output: W,
    charts: C,
}

impl<'a, R: BufRead, W: Write, C: ChartRenderer> MenuController<'a, R, W, C> {
    pub fn new(catalog: &'a Catalog, charts: C, input: R, output: W, top_authors_limit: usize) -> Self {
        Self {
            catalog,
            top_authors_limit,
            input,
            output,
            charts,
        }
    }

    /// Give back the output sink and chart backend.
    pub fn into_parts(self) -> (W, C) {
        (self.output, self.charts)
    }

    /// Show the menu until the user picks `0` or input runs out.
    pub fn run(&mut self) -> anyhow::Result<()> {
        writeln!(
            self.output,
            "Loaded {} records from {} at {}",
            self.catalog.len(),
            self.catalog.source().display(),
            self.catalog.loaded_at().format("%Y-%m-%d %H:%M:%S UTC")
        )?;

        loop {
            self.print_menu()?;

            let Some(choice) = self.prompt("Select an option: ")? else {
                writeln!(self.output)?;
                debug!("Input closed, leaving menu");
                break;
            };

            match choice.as_str() {
                "0" => {
                    writeln!(self.output, "Goodbye!")?;
                    break;
                }
                "1" => self.publication_trends()?,
                "2" => self.top_authors()?,
                "3" => self.language_distribution()?,
                "4" => self.publisher_counts()?,
                "5" => self.missing_isbn()?,
                "6" => self.year_language()?,
                _ => writeln!(self.output, "Invalid selection. Please choose a valid option.")?,
            }
        }

        Ok(())
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "\nDream Book Shop Data Analyzer")?;
        writeln!(self.output, "1) {PUBLICATION_TRENDS_TITLE}")?;
        writeln!(self.output, "2) {}", top_authors_title(self.top_authors_limit))?;
        writeln!(self.output, "3) {LANGUAGE_DISTRIBUTION_TITLE}")?;
        writeln!(self.output, "4) Number of books published by each publisher")?;
        writeln!(self.output, "5) {MISSING_ISBN_TITLE}")?;
        writeln!(self.output, "6) Number of books per year categorized by language")?;
        writeln!(self.output, "0) Exit")
    }

    /// Write `prompt` and read one trimmed line; `None` at end of input.
    fn prompt(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt_chart_generation(&mut self) -> io::Result<bool> {
        let response = self.prompt("Generate chart? (y/n): ")?;
        Ok(response.is_some_and(|r| r.eq_ignore_ascii_case("y")))
    }

    fn prompt_chart_type(&mut self, allowed: &[ChartKind]) -> io::Result<Option<ChartKind>> {
        let options: Vec<&str> = allowed.iter().map(|k| k.as_str()).collect();
        let response = self
            .prompt(&format!("Select chart type ({}): ", options.join("/")))?
            .unwrap_or_default()
            .to_lowercase();

        match allowed.iter().copied().find(|k| k.as_str() == response) {
            Some(kind) => Ok(Some(kind)),
            None => {
                writeln!(
                    self.output,
                    "Invalid chart type selected. Skipping chart generation."
                )?;
                Ok(None)
            }
        }
    }

    fn chart_choice(&mut self, allowed: &[ChartKind]) -> io::Result<Option<ChartKind>> {
        if !self.prompt_chart_generation()? {
            return Ok(None);
        }
        self.prompt_chart_type(allowed)
    }

    // ── Actions ───────────────────────────────────────────────────────────────

    fn publication_trends(&mut self) -> io::Result<()> {
        let trends = CatalogAggregator::publication_trends(self.catalog.records());
        if trends.is_empty() {
            return writeln!(self.output, "{NO_YEARS_MESSAGE}");
        }

        writeln!(
            self.output,
            "\n{PUBLICATION_TRENDS_TITLE}\n{}",
            publication_trends_table(&trends)
        )?;

        if let Some(kind) = self.chart_choice(ANY_CHART)? {
            let labels: Vec<String> = trends.keys().map(i32::to_string).collect();
            let values: Vec<usize> = trends.values().copied().collect();
            self.render_single_series(
                kind,
                PUBLICATION_TRENDS_TITLE,
                &labels,
                &values,
                "publication_trends.png",
                ("Year", "Books Published"),
            )?;
        }
        Ok(())
    }

    fn top_authors(&mut self) -> io::Result<()> {
        let authors = CatalogAggregator::top_authors(self.catalog.records(), self.top_authors_limit);
        let title = top_authors_title(self.top_authors_limit);

        writeln!(self.output, "\n{title}\n{}", top_authors_table(&authors))?;

        if let Some(kind) = self.chart_choice(ANY_CHART)? {
            let labels: Vec<String> = authors.iter().map(|a| a.author.clone()).collect();
            let values: Vec<usize> = authors.iter().map(|a| a.count).collect();
            self.render_single_series(
                kind,
                &title,
                &labels,
                &values,
                "top_authors.png",
                ("Author", "Books"),
            )?;
        }
        Ok(())
    }

    fn language_distribution(&mut self) -> io::Result<()> {
        let languages = CatalogAggregator::language_distribution(self.catalog.records());

        writeln!(
            self.output,
            "\n{LANGUAGE_DISTRIBUTION_TITLE}\n{}",
            language_distribution_table(&languages)
        )?;

        if let Some(kind) = self.chart_choice(ANY_CHART)? {
            let labels: Vec<String> = languages.iter().map(|l| l.language.clone()).collect();
            let values: Vec<usize> = languages.iter().map(|l| l.count).collect();
            self.render_single_series(
                kind,
                LANGUAGE_DISTRIBUTION_TITLE,
                &labels,
                &values,
                "language_distribution.png",
                ("Language", "Books"),
            )?;
        }
        Ok(())
    }

    fn publisher_counts(&mut self) -> io::Result<()> {
        let publishers = CatalogAggregator::publisher_counts(self.catalog.records());

        writeln!(
            self.output,
            "\n{PUBLISHER_COUNTS_TITLE}\n{}",
            publisher_counts_table(&publishers)
        )?;

        if let Some(kind) = self.chart_choice(ANY_CHART)? {
            let labels: Vec<String> = publishers.iter().map(|p| p.publisher.clone()).collect();
            let values: Vec<usize> = publishers.iter().map(|p| p.count).collect();
            self.render_single_series(
                kind,
                PUBLISHER_COUNTS_TITLE,
                &labels,
                &values,
                "publisher_counts.png",
                ("Publisher", "Books"),
            )?;
        }
        Ok(())
    }

    fn missing_isbn(&mut self) -> io::Result<()> {
        let summary = CatalogAggregator::missing_isbn(self.catalog.records());

        writeln!(
            self.output,
            "\n{MISSING_ISBN_TITLE}\n{}",
            missing_isbn_lines(&summary)
        )?;

        if let Some(kind) = self.chart_choice(BAR_OR_PIE)? {
            let labels = vec!["Missing ISBN".to_string(), "Has ISBN".to_string()];
            let values = vec![summary.missing, summary.present()];
            self.render_single_series(
                kind,
                MISSING_ISBN_TITLE,
                &labels,
                &values,
                "missing_isbn.png",
                ("Status", "Books"),
            )?;
        }
        Ok(())
    }

    fn year_language(&mut self) -> io::Result<()> {
        let counts = CatalogAggregator::year_language(self.catalog.records());
        let matrix = YearLanguageMatrix::from_counts(&counts);
        if matrix.is_empty() {
            return writeln!(self.output, "{NO_YEARS_BY_LANGUAGE_MESSAGE}");
        }

        writeln!(
            self.output,
            "\n{YEAR_LANGUAGE_TITLE}\n{}",
            year_language_table(&matrix)
        )?;

        if let Some(kind) = self.chart_choice(BAR_OR_LINE)? {
            let years = matrix.year_labels();
            let series = matrix.series();
            let result = if kind == ChartKind::Bar {
                self.charts.render_multi_series_bar(
                    YEAR_LANGUAGE_TITLE,
                    &years,
                    &series,
                    Path::new("year_language_bar.png"),
                    "Year",
                    "Books",
                )
            } else {
                self.charts.render_multi_series_line(
                    YEAR_LANGUAGE_TITLE,
                    &years,
                    &series,
                    Path::new("year_language_line.png"),
                    "Year",
                    "Books",
                )
            };
            self.report_chart(YEAR_LANGUAGE_TITLE, result)?;
        }
        Ok(())
    }

    // ── Chart helpers ─────────────────────────────────────────────────────────

    fn render_single_series(
        &mut self,
        kind: ChartKind,
        title: &str,
        labels: &[String],
        values: &[usize],
        file_name: &str,
        (x_label, y_label): (&str, &str),
    ) -> io::Result<()> {
        let file_name = Path::new(file_name);
        let result = match kind {
            ChartKind::Bar => {
                self.charts
                    .render_bar(title, labels, values, file_name, x_label, y_label)
            }
            ChartKind::Line => {
                self.charts
                    .render_line(title, labels, values, file_name, x_label, y_label)
            }
            ChartKind::Pie => self.charts.render_pie(title, labels, values, file_name),
        };
        self.report_chart(title, result)
    }

    /// Tell the user where the chart went, or why there is none.
    fn report_chart(
        &mut self,
        title: &str,
        result: catalog_charts::renderer::Result<PathBuf>,
    ) -> io::Result<()> {
        match result {
            Ok(path) => {
                info!("Saved chart '{}' to {}", title, path.display());
                writeln!(self.output, "Chart saved to {}", path.display())
            }
            Err(e) => {
                warn!("Failed to generate chart '{}': {}", title, e);
                writeln!(self.output, "Could not generate chart: {e}")
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_charts::{ChartError, Series};
    use catalog_core::models::BookRecord;
    use std::io::Cursor;

    #[derive(Debug, Clone, PartialEq)]
    struct RenderCall {
        kind: &'static str,
        title: String,
        labels: Vec<String>,
        values: Vec<usize>,
        series: Vec<Series>,
        file_name: PathBuf,
    }

    #[derive(Debug, Default)]
    struct RecordingRenderer {
        calls: Vec<RenderCall>,
        fail: bool,
    }

    impl RecordingRenderer {
        fn failing() -> Self {
            Self {
                calls: Vec::new(),
                fail: true,
            }
        }

        fn record(
            &mut self,
            kind: &'static str,
            title: &str,
            labels: &[String],
            values: &[usize],
            series: &[Series],
            file_name: &Path,
        ) -> catalog_charts::renderer::Result<PathBuf> {
            self.calls.push(RenderCall {
                kind,
                title: title.to_string(),
                labels: labels.to_vec(),
                values: values.to_vec(),
                series: series.to_vec(),
                file_name: file_name.to_path_buf(),
            });
            if self.fail {
                return Err(ChartError::Drawing("backend unavailable".to_string()));
            }
            Ok(Path::new("out").join(file_name))
        }
    }

    impl ChartRenderer for RecordingRenderer {
        fn render_bar(
            &mut self,
            title: &str,
            labels: &[String],
            values: &[usize],
            file_name: &Path,
            _x_label: &str,
            _y_label: &str,
        ) -> catalog_charts::renderer::Result<PathBuf> {
            self.record("bar", title, labels, values, &[], file_name)
        }

        fn render_line(
            &mut self,
            title: &str,
            labels: &[String],
            values: &[usize],
            file_name: &Path,
            _x_label: &str,
            _y_label: &str,
        ) -> catalog_charts::renderer::Result<PathBuf> {
            self.record("line", title, labels, values, &[], file_name)
        }

        fn render_pie(
            &mut self,
            title: &str,
            labels: &[String],
            values: &[usize],
            file_name: &Path,
        ) -> catalog_charts::renderer::Result<PathBuf> {
            self.record("pie", title, labels, values, &[], file_name)
        }

        fn render_multi_series_bar(
            &mut self,
            title: &str,
            x_labels: &[String],
            series: &[Series],
            file_name: &Path,
            _x_label: &str,
            _y_label: &str,
        ) -> catalog_charts::renderer::Result<PathBuf> {
            self.record("multi_bar", title, x_labels, &[], series, file_name)
        }

        fn render_multi_series_line(
            &mut self,
            title: &str,
            x_labels: &[String],
            series: &[Series],
            file_name: &Path,
            _x_label: &str,
            _y_label: &str,
        ) -> catalog_charts::renderer::Result<PathBuf> {
            self.record("multi_line", title, x_labels, &[], series, file_name)
        }
    }

    fn book(author: &str, language: &str, date: &str, isbn: Option<&str>) -> BookRecord {
        BookRecord {
            title: format!("{author} {date}"),
            author: author.to_string(),
            publication_date: date.to_string(),
            language: language.to_string(),
            publisher: "Penguin".to_string(),
            isbn: isbn.map(str::to_string),
            catalog_id: String::new(),
        }
    }

    fn sample_catalog() -> Catalog {
        Catalog::new(
            vec![
                book("A", "EN", "1999", Some("111")),
                book("A", "FR", "2001", None),
                book("B", "EN", "2001-05", Some("222")),
            ],
            "test.csv",
        )
    }

    fn run_menu_with(
        catalog: &Catalog,
        renderer: RecordingRenderer,
        script: &str,
    ) -> (String, RecordingRenderer) {
        let mut menu = MenuController::new(
            catalog,
            renderer,
            Cursor::new(script.as_bytes().to_vec()),
            Vec::new(),
            5,
        );
        menu.run().expect("menu run");
        let (output, renderer) = menu.into_parts();
        (String::from_utf8(output).expect("utf8 output"), renderer)
    }

    fn run_menu(script: &str) -> (String, RecordingRenderer) {
        run_menu_with(&sample_catalog(), RecordingRenderer::default(), script)
    }

    // ── Menu loop ─────────────────────────────────────────────────────────────

    #[test]
    fn test_exit_option_says_goodbye() {
        let (output, renderer) = run_menu("0\n");

        assert!(output.starts_with("Loaded 3 records from test.csv"));
        assert!(output.contains("Dream Book Shop Data Analyzer"));
        assert!(output.contains("2) Top 5 Most Prolific Authors"));
        assert!(output.contains("0) Exit"));
        assert!(output.trim_end().ends_with("Goodbye!"));
        assert!(renderer.calls.is_empty());
    }

    #[test]
    fn test_end_of_input_exits_quietly() {
        let (output, _) = run_menu("");
        assert!(output.contains("Select an option: "));
        assert!(!output.contains("Goodbye!"));
    }

    #[test]
    fn test_invalid_selection_reprompts() {
        let (output, _) = run_menu("9\n\n0\n");
        assert_eq!(
            output
                .matches("Invalid selection. Please choose a valid option.")
                .count(),
            2
        );
        assert_eq!(output.matches("Select an option: ").count(), 3);
    }

    // ── Analyses ──────────────────────────────────────────────────────────────

    #[test]
    fn test_publication_trends_prints_table_without_chart() {
        let (output, renderer) = run_menu("1\nn\n0\n");

        assert!(output.contains("Publication Trends Over Time\nYear | Count\n-----+------"));
        assert!(output.contains("1999 | 1    "));
        assert!(output.contains("2001 | 2    "));
        assert!(output.contains("Generate chart? (y/n): "));
        assert!(renderer.calls.is_empty());
    }

    #[test]
    fn test_top_authors_bar_chart() {
        let (output, renderer) = run_menu("2\ny\nbar\n0\n");

        assert_eq!(renderer.calls.len(), 1);
        let call = &renderer.calls[0];
        assert_eq!(call.kind, "bar");
        assert_eq!(call.title, "Top 5 Most Prolific Authors");
        assert_eq!(call.labels, vec!["A", "B"]);
        assert_eq!(call.values, vec![2, 1]);
        assert_eq!(call.file_name, PathBuf::from("top_authors.png"));
        assert!(output.contains("Select chart type (bar/line/pie): "));
        assert!(output.contains("Chart saved to out/top_authors.png"));
    }

    #[test]
    fn test_chart_answers_are_case_insensitive() {
        let (_, renderer) = run_menu("3\nY\n PIE \n0\n");

        assert_eq!(renderer.calls.len(), 1);
        assert_eq!(renderer.calls[0].kind, "pie");
        assert_eq!(
            renderer.calls[0].file_name,
            PathBuf::from("language_distribution.png")
        );
        assert_eq!(renderer.calls[0].labels, vec!["EN", "FR"]);
    }

    #[test]
    fn test_unknown_chart_type_is_skipped() {
        let (output, renderer) = run_menu("4\ny\nscatter\n0\n");

        assert!(output.contains("Books Published by Each Publisher"));
        assert!(output.contains("Penguin   | 3    "));
        assert!(output.contains("Invalid chart type selected. Skipping chart generation."));
        assert!(renderer.calls.is_empty());
    }

    #[test]
    fn test_missing_isbn_summary_and_bar_chart() {
        let (output, renderer) = run_menu("5\ny\nbar\n0\n");

        assert!(output.contains("Missing ISBNs: 1\nTotal Records: 3\nPercentage Missing: 33.33%"));
        assert!(output.contains("Select chart type (bar/pie): "));
        let call = &renderer.calls[0];
        assert_eq!(call.labels, vec!["Missing ISBN", "Has ISBN"]);
        assert_eq!(call.values, vec![1, 2]);
        assert_eq!(call.file_name, PathBuf::from("missing_isbn.png"));
    }

    #[test]
    fn test_missing_isbn_rejects_line_chart() {
        let (output, renderer) = run_menu("5\ny\nline\n0\n");
        assert!(output.contains("Invalid chart type selected. Skipping chart generation."));
        assert!(renderer.calls.is_empty());
    }

    #[test]
    fn test_year_language_table_and_line_chart() {
        let (output, renderer) = run_menu("6\ny\nline\n0\n");

        assert!(output.contains("Books per Year by Language\nYear | EN | FR"));
        assert!(output.contains("1999 | 1  | 0 "));
        assert!(output.contains("2001 | 1  | 1 "));
        assert!(output.contains("Select chart type (bar/line): "));

        let call = &renderer.calls[0];
        assert_eq!(call.kind, "multi_line");
        assert_eq!(call.labels, vec!["1999", "2001"]);
        assert_eq!(
            call.series,
            vec![
                ("EN".to_string(), vec![1, 1]),
                ("FR".to_string(), vec![0, 1]),
            ]
        );
        assert_eq!(call.file_name, PathBuf::from("year_language_line.png"));
    }

    #[test]
    fn test_year_language_bar_chart_file_name() {
        let (_, renderer) = run_menu("6\ny\nbar\n0\n");
        assert_eq!(renderer.calls[0].kind, "multi_bar");
        assert_eq!(
            renderer.calls[0].file_name,
            PathBuf::from("year_language_bar.png")
        );
    }

    #[test]
    fn test_undated_catalog_skips_year_analyses() {
        let catalog = Catalog::new(vec![book("A", "EN", "", None)], "undated.csv");
        let (output, renderer) = run_menu_with(&catalog, RecordingRenderer::default(), "1\n6\n0\n");

        assert!(output.contains("No valid publication years found.\n"));
        assert!(output.contains("No valid publication years found for language breakdown."));
        assert!(!output.contains("Generate chart?"));
        assert!(output.contains("Goodbye!"));
        assert!(renderer.calls.is_empty());
    }

    #[test]
    fn test_chart_failure_is_reported_and_menu_continues() {
        let (output, renderer) =
            run_menu_with(&sample_catalog(), RecordingRenderer::failing(), "2\ny\nline\n0\n");

        assert_eq!(renderer.calls.len(), 1);
        assert!(output.contains("Could not generate chart: Failed to draw chart elements: backend unavailable"));
        assert!(output.contains("Goodbye!"));
    }

    #[test]
    fn test_end_of_input_at_chart_prompt_skips_chart() {
        let (output, renderer) = run_menu("1\n");
        assert!(output.contains("Generate chart? (y/n): "));
        assert!(renderer.calls.is_empty());
    }
}
