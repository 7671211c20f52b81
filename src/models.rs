//! Data models for the demographic analyzer.
//!
//! This module contains the census record schema, the immutable dataset
//! wrapper, and the result structures produced by the aggregator.

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Column names of the census schema, in file order.
pub const COLUMNS: [&str; 15] = [
    "age",
    "workclass",
    "fnlwgt",
    "education",
    "education-num",
    "marital-status",
    "occupation",
    "relationship",
    "race",
    "sex",
    "capital-gain",
    "capital-loss",
    "hours-per-week",
    "native-country",
    "salary",
];

/// Education levels counted as advanced.
pub const ADVANCED_EDUCATION: [&str; 3] = ["Bachelors", "Masters", "Doctorate"];

/// Salary label of the high-income bracket.
pub const HIGH_INCOME: &str = ">50K";

/// Sex label used for the mean-age statistic.
pub const MALE: &str = "Male";

/// Country used for the top-occupation lookup.
pub const INDIA: &str = "India";

/// One row of the census dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub age: i64,
    pub workclass: String,
    pub fnlwgt: i64,
    pub education: String,
    #[serde(rename = "education-num")]
    pub education_num: i64,
    #[serde(rename = "marital-status")]
    pub marital_status: String,
    pub occupation: String,
    pub relationship: String,
    pub race: String,
    pub sex: String,
    #[serde(rename = "capital-gain")]
    pub capital_gain: i64,
    #[serde(rename = "capital-loss")]
    pub capital_loss: i64,
    #[serde(rename = "hours-per-week")]
    pub hours_per_week: i64,
    #[serde(rename = "native-country")]
    pub native_country: String,
    pub salary: String,
}

impl Record {
    /// Whether the record falls in the `>50K` income bracket.
    pub fn is_high_income(&self) -> bool {
        self.salary == HIGH_INCOME
    }

    pub fn is_male(&self) -> bool {
        self.sex == MALE
    }

    /// Whether the education level is Bachelors, Masters or Doctorate.
    pub fn has_advanced_education(&self) -> bool {
        ADVANCED_EDUCATION.contains(&self.education.as_str())
    }
}

/// An immutable, fully loaded dataset.
///
/// Records are only reachable through shared references, so every
/// statistic computed over a dataset is a read-only reduction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Returns the records in input order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records().iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Category counts ordered by descending count.
///
/// Categories with equal counts keep the order in which they were first
/// encountered, so the first entry is a deterministic argmax.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueCounts(Vec<(String, usize)>);

impl ValueCounts {
    /// Count occurrences of each distinct value.
    pub fn from_values<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut positions: HashMap<&'a str, usize> = HashMap::new();
        let mut counts: Vec<(&'a str, usize)> = Vec::new();

        for value in values {
            match positions.get(value) {
                Some(&idx) => counts[idx].1 += 1,
                None => {
                    positions.insert(value, counts.len());
                    counts.push((value, 1));
                }
            }
        }

        // Stable sort: ties stay in first-encountered order
        counts.sort_by_key(|(_, count)| std::cmp::Reverse(*count));

        Self(
            counts
                .into_iter()
                .map(|(value, count)| (value.to_string(), count))
                .collect(),
        )
    }

    /// The most frequent category, if any.
    pub fn top(&self) -> Option<(&str, usize)> {
        self.0.first().map(|(value, count)| (value.as_str(), *count))
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.0.iter().map(|(_, count)| count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(value, count)| (value.as_str(), *count))
    }
}

impl Serialize for ValueCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (value, count) in &self.0 {
            map.serialize_entry(value, count)?;
        }
        map.end()
    }
}

impl fmt::Display for ValueCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (value, count)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", value, count)?;
        }
        write!(f, "}}")
    }
}

/// The ten statistics of a demographic report.
///
/// Field order matches the fixed key order of the rendered report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemographicReport {
    /// Records per race, descending by count.
    pub race_count: ValueCounts,
    /// Mean age of male records.
    pub average_age_men: f64,
    /// Share of records with a Bachelors degree.
    pub percentage_bachelors: f64,
    /// Share of advanced-education records earning `>50K`.
    pub higher_education_rich: f64,
    /// Share of non-advanced-education records earning `>50K`.
    pub lower_education_rich: f64,
    /// Minimum weekly work hours.
    pub min_work_hours: i64,
    /// Share of minimum-hours records earning `>50K`.
    pub rich_percentage: f64,
    /// Country with the highest share of `>50K` earners.
    pub highest_earning_country: String,
    /// That country's share of `>50K` earners.
    pub highest_earning_country_percentage: f64,
    /// Most common occupation among `>50K` earners from India.
    #[serde(rename = "top_IN_occupation")]
    pub top_in_occupation: String,
}

impl DemographicReport {
    /// Key/value pairs in report order, values rendered for display.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("race_count", self.race_count.to_string()),
            ("average_age_men", format!("{:.1}", self.average_age_men)),
            (
                "percentage_bachelors",
                format!("{:.1}", self.percentage_bachelors),
            ),
            (
                "higher_education_rich",
                format!("{:.1}", self.higher_education_rich),
            ),
            (
                "lower_education_rich",
                format!("{:.1}", self.lower_education_rich),
            ),
            ("min_work_hours", self.min_work_hours.to_string()),
            ("rich_percentage", format!("{:.1}", self.rich_percentage)),
            (
                "highest_earning_country",
                self.highest_earning_country.clone(),
            ),
            (
                "highest_earning_country_percentage",
                format!("{:.1}", self.highest_earning_country_percentage),
            ),
            ("top_IN_occupation", self.top_in_occupation.clone()),
        ]
    }
}

impl fmt::Display for DemographicReport {
    /// One `key: value` line per statistic, in report order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self.entries() {
            writeln!(f, "{}: {}", key, value)?;
        }
        Ok(())
    }
}

/// Metadata about an analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Path of the analyzed dataset.
    pub source: String,
    /// Date and time of the analysis.
    pub analysis_date: DateTime<Utc>,
    /// Number of records in the dataset.
    pub records: usize,
    /// Duration of load and analysis in seconds.
    pub duration_seconds: f64,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds a record with the fields the statistics read; the rest are fixed.
    pub(crate) fn record(
        age: i64,
        sex: &str,
        education: &str,
        hours: i64,
        country: &str,
        salary: &str,
    ) -> Record {
        Record {
            age,
            workclass: "Private".to_string(),
            fnlwgt: 77516,
            education: education.to_string(),
            education_num: 13,
            marital_status: "Never-married".to_string(),
            occupation: "Adm-clerical".to_string(),
            relationship: "Not-in-family".to_string(),
            race: "White".to_string(),
            sex: sex.to_string(),
            capital_gain: 0,
            capital_loss: 0,
            hours_per_week: hours,
            native_country: country.to_string(),
            salary: salary.to_string(),
        }
    }

    #[test]
    fn test_record_predicates() {
        let rec = record(39, "Male", "Masters", 40, "United-States", ">50K");
        assert!(rec.is_male());
        assert!(rec.is_high_income());
        assert!(rec.has_advanced_education());

        let rec = record(39, "Female", "HS-grad", 40, "United-States", "<=50K");
        assert!(!rec.is_male());
        assert!(!rec.is_high_income());
        assert!(!rec.has_advanced_education());
    }

    #[test]
    fn test_value_counts_descending_with_stable_ties() {
        let counts = ValueCounts::from_values(["b", "a", "c", "a", "b", "d"]);
        let order: Vec<_> = counts.iter().collect();
        assert_eq!(order, vec![("b", 2), ("a", 2), ("c", 1), ("d", 1)]);
        assert_eq!(counts.top(), Some(("b", 2)));
        assert_eq!(counts.total(), 6);
    }

    #[test]
    fn test_value_counts_empty() {
        let counts = ValueCounts::from_values(Vec::<&str>::new());
        assert_eq!(counts.top(), None);
        assert_eq!(counts.total(), 0);
        assert_eq!(counts.to_string(), "{}");
    }

    #[test]
    fn test_value_counts_serializes_in_order() {
        let counts = ValueCounts::from_values(["White", "Black", "White", "Other"]);
        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"White":2,"Black":1,"Other":1}"#);
        assert_eq!(counts.to_string(), "{White: 2, Black: 1, Other: 1}");
    }

    #[test]
    fn test_report_display_lines() {
        let report = DemographicReport {
            race_count: ValueCounts::from_values(["Black", "White", "White"]),
            average_age_men: 30.0,
            percentage_bachelors: 12.5,
            higher_education_rich: 50.0,
            lower_education_rich: 0.0,
            min_work_hours: 20,
            rich_percentage: 100.0,
            highest_earning_country: "Cuba".to_string(),
            highest_earning_country_percentage: 33.3,
            top_in_occupation: "Sales".to_string(),
        };
        let text = report.to_string();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "race_count: {White: 2, Black: 1}");
        assert_eq!(lines[1], "average_age_men: 30.0");
        assert_eq!(lines[9], "top_IN_occupation: Sales");
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_dataset_from_iter() {
        let dataset: Dataset = (0..3)
            .map(|i| record(20 + i, "Male", "HS-grad", 40, "Cuba", "<=50K"))
            .collect();
        assert_eq!(dataset.len(), 3);
        assert!(!dataset.is_empty());
        assert_eq!(dataset.records()[2].age, 22);
    }
}
