//! ASCII table formatting for analysis results
//!
//! This module renders the two styled tables the projects report:
//! - Per-bin positive percentages for the screen-time survey
//! - Occupation rows with percent-female and weekly-pay columns for the
//!   wage-gap tables
//!
//! Formatting uses the [`tabled`] crate; captions are rendered as an
//! underlined title above the table.

use crate::common::data_structures::{DataTable, TableError};
use tabled::{Table, Tabled};

/// A single screen-time bin with its respondent count and positive percentage
#[derive(Debug, Clone, Tabled)]
pub struct BinSummary {
    /// Human-readable bin range (e.g., "1-2", "5+")
    #[tabled(rename = "Range")]
    pub range: String,
    /// Number of respondents in this bin
    #[tabled(rename = "Respondents")]
    pub respondents: usize,
    /// Percentage of respondents with a positive score
    #[tabled(rename = "Positive")]
    pub percentage: String,
}

/// Builds one summary row per bin from edges, counts, and percentages
///
/// Ranges are labelled `lower-upper` using consecutive edges; the final bin
/// is open-ended and labelled `lower+`. A NaN percentage (empty bin) renders
/// as `n/a`.
pub fn bin_summaries(edges: &[f64], counts: &[usize], percentages: &[f64]) -> Vec<BinSummary> {
    edges
        .iter()
        .enumerate()
        .map(|(bin, &edge)| {
            let range = match edges.get(bin + 1) {
                Some(&next) => format!("{}-{}", format_edge(edge), format_edge(next)),
                None => format!("{}+", format_edge(edge)),
            };
            let percentage = match percentages.get(bin) {
                Some(value) if value.is_finite() => format!("{:.2}%", value),
                _ => "n/a".to_string(),
            };
            BinSummary {
                range,
                respondents: counts.get(bin).copied().unwrap_or(0),
                percentage,
            }
        })
        .collect()
}

/// Formats bin summaries as an ASCII table with an optional title
pub fn format_bin_table(rows: &[BinSummary], title: Option<&str>) -> String {
    if rows.is_empty() {
        return "No data available for binning".to_string();
    }
    with_title(Table::new(rows).to_string(), title)
}

/// One occupation row of the wage-gap summary table
#[derive(Debug, Clone, Tabled)]
pub struct WageRow {
    /// Occupation name from the BLS table
    #[tabled(rename = "Occupation")]
    pub occupation: String,
    /// Share of workers who are female, as a percentage
    #[tabled(rename = "Percent Female")]
    pub percent_female: String,
    /// Median weekly pay in dollars
    #[tabled(rename = "Weekly Pay")]
    pub weekly_pay: String,
}

impl WageRow {
    /// Creates a row with formatted percentage and dollar columns
    pub fn new(occupation: impl Into<String>, percent_female: f64, weekly_pay: f64) -> Self {
        Self {
            occupation: occupation.into(),
            percent_female: format!("{:.2}%", percent_female),
            weekly_pay: format_dollars(weekly_pay),
        }
    }
}

/// Builds wage rows from a loaded BLS table
///
/// Expects the fixed columns `Occupation` (text), `Percent Female`, and
/// `Weekly Pay` (numeric), as produced by [`crate::parsing::read_bls`].
pub fn wage_rows(table: &DataTable) -> Result<Vec<WageRow>, TableError> {
    let occupations = table.text("Occupation")?;
    let percent_female = table.numeric("Percent Female")?;
    let weekly_pay = table.numeric("Weekly Pay")?;

    Ok(occupations
        .iter()
        .zip(percent_female)
        .zip(weekly_pay)
        .map(|((occupation, &female), &pay)| WageRow::new(occupation.clone(), female, pay))
        .collect())
}

/// Formats wage rows as an ASCII table with an optional caption
pub fn format_wage_table(rows: &[WageRow], title: Option<&str>) -> String {
    if rows.is_empty() {
        return "No data available for wage table".to_string();
    }
    with_title(Table::new(rows).to_string(), title)
}

/// Formats a dollar amount with thousands separators, e.g. `$1,234`
pub fn format_dollars(value: f64) -> String {
    let rounded = value.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

fn format_edge(edge: f64) -> String {
    if edge.fract() == 0.0 {
        format!("{:.0}", edge)
    } else {
        format!("{}", edge)
    }
}

fn with_title(table: String, title: Option<&str>) -> String {
    match title {
        Some(title) => format!("{}\n{}\n{}", title, "=".repeat(title.len()), table),
        None => table,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const EDGES: [f64; 3] = [1.0, 2.0, 3.0];
    const COUNTS: [usize; 3] = [2, 0, 3];

    #[test]
    fn test_bin_summaries_labels_and_counts() {
        let summaries = bin_summaries(&EDGES, &COUNTS, &[50.0, f64::NAN, 100.0 / 3.0]);

        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[0].range, "1-2");
        assert_eq!(summaries[0].respondents, 2);
        assert_eq!(summaries[0].percentage, "50.00%");
        assert_eq!(summaries[1].percentage, "n/a");
        assert_eq!(summaries[2].range, "3+");
        assert_eq!(summaries[2].percentage, "33.33%");
    }

    #[test]
    fn test_format_bin_table() {
        let summaries = bin_summaries(&EDGES, &COUNTS, &[50.0, f64::NAN, 25.0]);
        let table = format_bin_table(&summaries, Some("Depression by Screen Time"));

        assert!(table.contains("Depression by Screen Time"));
        assert!(table.contains("Range"));
        assert!(table.contains("Respondents"));
        assert!(table.contains("Positive"));
        assert!(table.contains("50.00%"));

        let table_no_title = format_bin_table(&summaries, None);
        assert!(!table_no_title.contains("Depression by Screen Time"));
        assert!(table_no_title.contains("Range"));
    }

    #[test]
    fn test_format_bin_table_empty() {
        assert_eq!(
            format_bin_table(&[], Some("anything")),
            "No data available for binning"
        );
    }

    #[test]
    fn test_wage_rows_from_table() {
        let mut table = DataTable::new();
        table
            .push_text_column(
                "Occupation",
                vec!["Chief executives".to_string(), "Registered nurses".to_string()],
            )
            .unwrap();
        table
            .push_numeric_column("Percent Female", vec![27.9, 88.6])
            .unwrap();
        table
            .push_numeric_column("Weekly Pay", vec![2291.0, 1223.0])
            .unwrap();

        let rows = wage_rows(&table).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].occupation, "Chief executives");
        assert_eq!(rows[0].percent_female, "27.90%");
        assert_eq!(rows[0].weekly_pay, "$2,291");

        let rendered = format_wage_table(&rows, Some("Median Weekly Pay by Occupation"));
        assert!(rendered.contains("Median Weekly Pay by Occupation"));
        assert!(rendered.contains("$1,223"));
    }

    #[rstest]
    #[case(0.0, "$0")]
    #[case(999.0, "$999")]
    #[case(1000.0, "$1,000")]
    #[case(2291.4, "$2,291")]
    #[case(2291.6, "$2,292")]
    #[case(1234567.0, "$1,234,567")]
    #[case(-1234.0, "-$1,234")]
    fn test_format_dollars(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format_dollars(value), expected);
    }
}
