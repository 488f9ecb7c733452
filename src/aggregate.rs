// src/aggregate.rs
use crate::error::ApiError;
use crate::models::{AssetCategory, HistoricalSeries};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

/// One point on the net-worth chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetWorthPoint {
    pub date: NaiveDate,
    pub value: f64,
    /// Contributing instrument names, comma separated.
    pub sources: String,
}

/// How recorded debt values enter the total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DebtTreatment {
    /// Added verbatim like any other holding.
    #[default]
    AsRecorded,
    /// Subtracted from the total.
    Subtract,
}

#[derive(Default)]
struct Accumulator {
    total: f64,
    names: Vec<String>,
}

pub fn aggregate(series: &HistoricalSeries) -> Result<Vec<NetWorthPoint>, ApiError> {
    aggregate_with(series, DebtTreatment::AsRecorded)
}

/// Sums every instrument's value per date. No interpolation or carry-forward:
/// a date only gets the values recorded on it.
pub fn aggregate_with(
    series: &HistoricalSeries,
    debt: DebtTreatment,
) -> Result<Vec<NetWorthPoint>, ApiError> {
    let mut by_date: HashMap<&str, Accumulator> = HashMap::new();

    for category in AssetCategory::ALL {
        let Some(instruments) = series.category(category) else {
            continue;
        };
        let sign = match (category, debt) {
            (AssetCategory::Debt, DebtTreatment::Subtract) => -1.0,
            _ => 1.0,
        };
        for (name, values) in instruments {
            for (date, value) in values {
                let acc = by_date.entry(date.as_str()).or_default();
                acc.total += sign * value;
                acc.names.push(name.clone());
            }
        }
    }

    let mut points = by_date
        .into_iter()
        .map(|(date, acc)| {
            let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map_err(|e| ApiError::Decode(format!("bad date {:?}: {}", date, e)))?;
            Ok(NetWorthPoint {
                date: parsed,
                value: acc.total,
                sources: acc.names.join(", "),
            })
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    // HashMap order is arbitrary; the chart needs ascending dates.
    points.sort_by_key(|p| p.date);
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InstrumentSeries;

    fn instruments(entries: &[(&str, &[(&str, f64)])]) -> InstrumentSeries {
        entries
            .iter()
            .map(|(name, values)| {
                (
                    name.to_string(),
                    values.iter().map(|(d, v)| (d.to_string(), *v)).collect(),
                )
            })
            .collect()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(aggregate(&HistoricalSeries::default()).unwrap().is_empty());
    }

    #[test]
    fn same_date_across_categories_is_summed() {
        let series = HistoricalSeries {
            stocks: Some(instruments(&[("AAPL", &[("2024-01-01", 100.0)])])),
            cash: Some(instruments(&[("Savings", &[("2024-01-01", 50.0)])])),
            ..Default::default()
        };
        assert_eq!(
            aggregate(&series).unwrap(),
            vec![NetWorthPoint {
                date: date("2024-01-01"),
                value: 150.0,
                sources: "AAPL, Savings".to_string(),
            }]
        );
    }

    #[test]
    fn disjoint_dates_stay_separate() {
        let series = HistoricalSeries {
            stocks: Some(instruments(&[("AAPL", &[("2024-01-01", 100.0)])])),
            cash: Some(instruments(&[("Savings", &[("2024-02-01", 50.0)])])),
            ..Default::default()
        };
        let points = aggregate(&series).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!((points[0].date, points[0].value), (date("2024-01-01"), 100.0));
        assert_eq!(points[0].sources, "AAPL");
        assert_eq!((points[1].date, points[1].value), (date("2024-02-01"), 50.0));
        assert_eq!(points[1].sources, "Savings");
    }

    #[test]
    fn output_is_chronological() {
        let series = HistoricalSeries {
            real_estate: Some(instruments(&[(
                "House",
                &[("2024-03-01", 3.0), ("2023-12-31", 1.0), ("2024-01-01", 2.0)],
            )])),
            ..Default::default()
        };
        let dates: Vec<_> = aggregate(&series).unwrap().into_iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![date("2023-12-31"), date("2024-01-01"), date("2024-03-01")]);
    }

    #[test]
    fn sorted_regardless_of_input_layout() {
        // Latest dates live in the first category visited, earliest in the last,
        // and each category spreads its dates over several instruments.
        let start = date("2023-01-01");
        let mut stocks = InstrumentSeries::new();
        let mut cash = InstrumentSeries::new();
        let mut debt = InstrumentSeries::new();
        for i in 0..240i64 {
            let day = (start + chrono::Duration::days(i)).format("%Y-%m-%d").to_string();
            let target = match i {
                160.. => &mut stocks,
                80.. => &mut cash,
                _ => &mut debt,
            };
            target
                .entry(format!("I{}", i % 7))
                .or_default()
                .insert(day, i as f64);
        }
        let series = HistoricalSeries {
            stocks: Some(stocks),
            cash: Some(cash),
            debt: Some(debt),
            ..Default::default()
        };

        let points = aggregate(&series).unwrap();
        assert_eq!(points.len(), 240);
        assert!(points.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(points[0].date, start);
        assert_eq!(points[239].value, 239.0);
    }

    #[test]
    fn instrument_without_dates_contributes_nothing() {
        let mut stocks = instruments(&[("MSFT", &[("2024-01-05", 10.0)])]);
        stocks.insert("IDLE".to_string(), Default::default());
        let series = HistoricalSeries {
            stocks: Some(stocks),
            ..Default::default()
        };
        let points = aggregate(&series).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].sources, "MSFT");
    }

    #[test]
    fn debt_is_added_verbatim_by_default() {
        let series = HistoricalSeries {
            cash: Some(instruments(&[("Checking", &[("2024-01-01", 1000.0)])])),
            debt: Some(instruments(&[("Car loan", &[("2024-01-01", 400.0)])])),
            ..Default::default()
        };
        assert_eq!(aggregate(&series).unwrap()[0].value, 1400.0);
        let subtracted = aggregate_with(&series, DebtTreatment::Subtract).unwrap();
        assert_eq!(subtracted[0].value, 600.0);
        assert_eq!(subtracted[0].sources, "Checking, Car loan");
    }

    #[test]
    fn point_count_and_totals_match_input() {
        let series = HistoricalSeries {
            stocks: Some(instruments(&[
                ("AAPL", &[("2024-01-01", 1.5), ("2024-01-02", 2.5)]),
                ("GOOG", &[("2024-01-02", 4.0), ("2024-01-03", 8.0)]),
            ])),
            cash: Some(instruments(&[("Savings", &[("2024-01-03", 16.0)])])),
            debt: Some(instruments(&[("Card", &[("2024-01-04", 32.0)])])),
            ..Default::default()
        };
        let points = aggregate(&series).unwrap();
        assert_eq!(points.len(), 4);
        let totals: Vec<f64> = points.iter().map(|p| p.value).collect();
        assert_eq!(totals, vec![1.5, 6.5, 24.0, 32.0]);
        let grand: f64 = totals.iter().sum();
        assert_eq!(grand, 64.0);
    }

    #[test]
    fn repeated_aggregation_is_identical() {
        let series = HistoricalSeries {
            stocks: Some(instruments(&[("A", &[("2024-05-01", 1.0)]), ("B", &[("2024-05-01", 2.0)])])),
            cash: Some(instruments(&[("C", &[("2024-04-01", 3.0)])])),
            ..Default::default()
        };
        assert_eq!(aggregate(&series).unwrap(), aggregate(&series).unwrap());
    }

    #[test]
    fn unparseable_date_is_rejected() {
        let series = HistoricalSeries {
            stocks: Some(instruments(&[("AAPL", &[("01/02/2024", 1.0)])])),
            ..Default::default()
        };
        assert!(matches!(aggregate(&series), Err(ApiError::Decode(_))));
    }
}
