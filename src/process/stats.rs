use crate::process::{convert, Table};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// count / mean / std / min / quartiles / max of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; NaN below two values.
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Summaries for every column whose cells are all numeric; text columns are skipped.
pub fn describe(table: &Table) -> Vec<ColumnSummary> {
    table
        .columns()
        .iter()
        .filter_map(|name| match convert::numeric_column(table, name) {
            Ok(values) if !values.is_empty() => Some(summarize(name, values)),
            Ok(_) => None,
            Err(e) => {
                debug!(column = %name, error = %e, "not numeric; left out of describe");
                None
            }
        })
        .collect()
}

fn summarize(name: &str, mut values: Vec<f64>) -> ColumnSummary {
    values.sort_by(f64::total_cmp);
    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let std = if n > 1 {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    } else {
        f64::NAN
    };
    ColumnSummary {
        column: name.to_string(),
        count: n,
        mean,
        std,
        min: values[0],
        q25: quantile(&values, 0.25),
        median: quantile(&values, 0.5),
        q75: quantile(&values, 0.75),
        max: values[n - 1],
    }
}

/// Linear-interpolated quantile of sorted, non-empty `values`.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Least-squares `(slope, intercept)`; `None` with fewer than two points or no x spread.
pub fn linear_fit(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mx = points.iter().map(|p| p.0).sum::<f64>() / n;
    let my = points.iter().map(|p| p.1).sum::<f64>() / n;
    let sxx: f64 = points.iter().map(|p| (p.0 - mx).powi(2)).sum();
    if sxx == 0.0 {
        return None;
    }
    let sxy: f64 = points.iter().map(|p| (p.0 - mx) * (p.1 - my)).sum();
    let slope = sxy / sxx;
    Some((slope, my - slope * mx))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
}

/// `bins` equal-width bins over `[min, max]`, last bin closed.
/// A zero-width range is widened to `[v - 0.5, v + 0.5]`.
pub fn histogram(values: &[f64], bins: usize) -> Vec<Bin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut out: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            lo: lo + width * i as f64,
            hi: lo + width * (i + 1) as f64,
            count: 0,
        })
        .collect();
    for v in values {
        let i = (((v - lo) / width) as usize).min(bins - 1);
        out[i].count += 1;
    }
    out
}

/// Mean of `values` per distinct key, ordered by key.
pub fn group_mean(keys: &[&str], values: &[f64]) -> Vec<(String, f64)> {
    let mut acc: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for (k, v) in keys.iter().zip(values) {
        let e = acc.entry(*k).or_insert((0.0, 0));
        e.0 += v;
        e.1 += 1;
    }
    acc.into_iter()
        .map(|(k, (sum, n))| (k.to_string(), sum / n as f64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_matches_pandas_conventions() {
        let t = Table::new(
            vec!["Country".into(), "v".into()],
            ["a", "b", "c", "d"]
                .iter()
                .zip(["1", "2", "3", "4"])
                .map(|(c, v)| vec![c.to_string(), v.to_string()])
                .collect(),
        )
        .unwrap();
        let d = describe(&t);
        assert_eq!(d.len(), 1);
        let s = &d[0];
        assert_eq!(s.column, "v");
        assert_eq!(s.count, 4);
        assert_eq!(s.mean, 2.5);
        assert!((s.std - 1.290_994).abs() < 1e-6);
        assert_eq!((s.min, s.q25, s.median, s.q75, s.max), (1.0, 1.75, 2.5, 3.25, 4.0));
    }

    #[test]
    fn single_value_has_nan_std() {
        let s = summarize("x", vec![7.0]);
        assert!(s.std.is_nan());
        assert_eq!(s.median, 7.0);
    }

    #[test]
    fn fit_recovers_exact_line() {
        let pts: Vec<(f64, f64)> = (0..5).map(|i| (i as f64, 3.0 * i as f64 + 1.0)).collect();
        let (m, b) = linear_fit(&pts).unwrap();
        assert!((m - 3.0).abs() < 1e-12);
        assert!((b - 1.0).abs() < 1e-12);
        assert_eq!(linear_fit(&[(1.0, 1.0), (1.0, 2.0)]), None);
        assert_eq!(linear_fit(&[(1.0, 1.0)]), None);
    }

    #[test]
    fn histogram_counts_every_value() {
        let values = [0.0, 1.0, 2.0, 9.0, 10.0];
        let h = histogram(&values, 10);
        assert_eq!(h.len(), 10);
        assert_eq!(h.iter().map(|b| b.count).sum::<usize>(), values.len());
        assert_eq!(h[0].count, 1);
        assert_eq!(h[9].count, 2);
        assert_eq!(h[9].hi, 10.0);
    }

    #[test]
    fn histogram_of_constant_column() {
        let h = histogram(&[5.0, 5.0], 2);
        assert_eq!(h[0].lo, 4.5);
        assert_eq!(h.iter().map(|b| b.count).sum::<usize>(), 2);
    }

    #[test]
    fn group_mean_sorts_by_key() {
        let g = group_mean(&["b", "a", "b"], &[1.0, 4.0, 3.0]);
        assert_eq!(g, vec![("a".to_string(), 4.0), ("b".to_string(), 2.0)]);
    }
}
