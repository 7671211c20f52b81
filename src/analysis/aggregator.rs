//! Demographic aggregation and statistics.
//!
//! This module computes the descriptive statistics of a census dataset.
//! Every statistic is a pure reduction over an immutable [`Dataset`].

use crate::error::AnalyzerError;
use crate::models::{Dataset, DemographicReport, Record, ValueCounts, INDIA};
use std::io::{self, Write};
use tracing::debug;

type Result<T> = std::result::Result<T, AnalyzerError>;

/// Round to one decimal digit, ties to even on the exact binary value.
///
/// Rust's float formatter is correctly rounded, so formatting with one
/// decimal and parsing back never suffers the double rounding of
/// `(x * 10.0).round() / 10.0`.
pub fn round_one_decimal(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}

/// Percentage of `part` in `whole`, rounded to one decimal.
fn percentage(part: usize, whole: usize, group: &str) -> Result<f64> {
    if whole == 0 {
        return Err(AnalyzerError::empty_group(group));
    }
    Ok(round_one_decimal(part as f64 / whole as f64 * 100.0))
}

/// Percentage of `>50K` earners among the given records.
fn high_income_percentage<'a, I>(records: I, group: &str) -> Result<f64>
where
    I: IntoIterator<Item = &'a Record>,
{
    let (rich, total) = records.into_iter().fold((0, 0), |(rich, total), rec| {
        (rich + usize::from(rec.is_high_income()), total + 1)
    });
    percentage(rich, total, group)
}

/// Number of records per race, descending by count.
pub fn race_count(dataset: &Dataset) -> ValueCounts {
    ValueCounts::from_values(dataset.iter().map(|rec| rec.race.as_str()))
}

/// Mean age of male records.
pub fn average_age_of_men(dataset: &Dataset) -> Result<f64> {
    let (sum, count) = dataset
        .iter()
        .filter(|rec| rec.is_male())
        .fold((0i64, 0usize), |(sum, count), rec| (sum + rec.age, count + 1));

    if count == 0 {
        return Err(AnalyzerError::empty_group("male records"));
    }
    Ok(round_one_decimal(sum as f64 / count as f64))
}

/// Share of all records holding a Bachelors degree.
pub fn percentage_bachelors(dataset: &Dataset) -> Result<f64> {
    let bachelors = dataset
        .iter()
        .filter(|rec| rec.education == "Bachelors")
        .count();
    percentage(bachelors, dataset.len(), "all records")
}

/// Share of `>50K` earners among Bachelors, Masters and Doctorate holders.
pub fn percentage_advanced_education_more_50k(dataset: &Dataset) -> Result<f64> {
    high_income_percentage(
        dataset.iter().filter(|rec| rec.has_advanced_education()),
        "advanced-education records",
    )
}

/// Share of `>50K` earners among everyone else.
pub fn percentage_non_advanced_education_more_50k(dataset: &Dataset) -> Result<f64> {
    high_income_percentage(
        dataset.iter().filter(|rec| !rec.has_advanced_education()),
        "non-advanced-education records",
    )
}

/// Minimum weekly work hours.
pub fn min_work_hours(dataset: &Dataset) -> Result<i64> {
    dataset
        .iter()
        .map(|rec| rec.hours_per_week)
        .min()
        .ok_or_else(|| AnalyzerError::empty_group("all records"))
}

/// Share of `>50K` earners among records working exactly `min_hours`.
pub fn percentage_min_hours_more_50k(dataset: &Dataset, min_hours: i64) -> Result<f64> {
    high_income_percentage(
        dataset
            .iter()
            .filter(|rec| rec.hours_per_week == min_hours),
        "records at minimum work hours",
    )
}

/// Country with the highest share of `>50K` earners, and that share.
///
/// Countries with equal shares resolve to the one first seen in the input.
pub fn highest_earning_country_percentage(dataset: &Dataset) -> Result<(String, f64)> {
    // (country, rich, total) in first-encountered order
    let mut countries: Vec<(&str, usize, usize)> = Vec::new();
    let mut positions = std::collections::HashMap::new();

    for rec in dataset.iter() {
        let idx = *positions
            .entry(rec.native_country.as_str())
            .or_insert_with(|| {
                countries.push((rec.native_country.as_str(), 0, 0));
                countries.len() - 1
            });
        countries[idx].1 += usize::from(rec.is_high_income());
        countries[idx].2 += 1;
    }

    let mut best: Option<(&str, f64)> = None;
    for (country, rich, total) in countries {
        let share = rich as f64 / total as f64 * 100.0;
        match best {
            Some((_, top)) if share <= top => {}
            _ => best = Some((country, share)),
        }
    }

    best.map(|(country, share)| (country.to_string(), round_one_decimal(share)))
        .ok_or_else(|| AnalyzerError::empty_group("native-country groups"))
}

/// Most common occupation among `>50K` earners from India.
pub fn top_in_occupation(dataset: &Dataset) -> Result<String> {
    let occupations = ValueCounts::from_values(
        dataset
            .iter()
            .filter(|rec| rec.native_country == INDIA && rec.is_high_income())
            .map(|rec| rec.occupation.as_str()),
    );

    occupations
        .top()
        .map(|(occupation, _)| occupation.to_string())
        .ok_or_else(|| AnalyzerError::empty_group("high earners from India"))
}

/// Compute every statistic of the report.
pub fn compute_demographic_data(dataset: &Dataset) -> Result<DemographicReport> {
    debug!("Computing statistics over {} records", dataset.len());

    let race_count = race_count(dataset);
    debug!("race_count: {}", race_count);

    let average_age_men = average_age_of_men(dataset)?;
    debug!("average_age_men: {:.1}", average_age_men);

    let percentage_bachelors = percentage_bachelors(dataset)?;
    let higher_education_rich = percentage_advanced_education_more_50k(dataset)?;
    let lower_education_rich = percentage_non_advanced_education_more_50k(dataset)?;
    debug!(
        "education: bachelors={:.1} higher_rich={:.1} lower_rich={:.1}",
        percentage_bachelors, higher_education_rich, lower_education_rich
    );

    let min_work_hours = min_work_hours(dataset)?;
    let rich_percentage = percentage_min_hours_more_50k(dataset, min_work_hours)?;
    debug!(
        "min_work_hours: {} (rich: {:.1})",
        min_work_hours, rich_percentage
    );

    let (highest_earning_country, highest_earning_country_percentage) =
        highest_earning_country_percentage(dataset)?;
    debug!(
        "highest_earning_country: {} ({:.1})",
        highest_earning_country, highest_earning_country_percentage
    );

    let top_in_occupation = top_in_occupation(dataset)?;
    debug!("top_IN_occupation: {}", top_in_occupation);

    Ok(DemographicReport {
        race_count,
        average_age_men,
        percentage_bachelors,
        higher_education_rich,
        lower_education_rich,
        min_work_hours,
        rich_percentage,
        highest_earning_country,
        highest_earning_country_percentage,
        top_in_occupation,
    })
}

/// Compute the report, printing it to stdout when `print_data` is set.
pub fn calculate_demographic_data(
    dataset: &Dataset,
    print_data: bool,
) -> Result<DemographicReport> {
    let stdout = io::stdout();
    calculate_demographic_data_to(dataset, print_data, &mut stdout.lock())
}

/// Compute the report, writing `key: value` lines to `out` when `print_data` is set.
pub fn calculate_demographic_data_to<W: Write>(
    dataset: &Dataset,
    print_data: bool,
    out: &mut W,
) -> Result<DemographicReport> {
    let report = compute_demographic_data(dataset)?;

    if print_data {
        write!(out, "{}", report)
            .and_then(|_| out.flush())
            .map_err(AnalyzerError::Output)?;
    }

    Ok(report)
}
