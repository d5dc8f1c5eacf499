//! # Sales Forecast
//!
//! Ordinary least squares over a monthly series, projected a few months out.
//!
//! ## Formula
//! ```text
//! positions x = 1..n, values y
//!
//!            nΣxy − ΣxΣy
//! slope  = ───────────────          intercept = (Σy − slope·Σx) / n
//!           nΣx² − (Σx)²
//!
//! projected = intercept + slope · (n + horizon)
//! percent   = (projected − y_n) / y_n × 100
//! ```
//!
//! The result only feeds a display overlay; nothing is persisted.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::lenient;

/// Spanish three-letter month abbreviations, as the backend reports them.
pub const MONTHS_ES: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];

/// One point of a monthly series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    pub mes: String,
    #[serde(deserialize_with = "lenient::float")]
    pub total: f64,
}

impl MonthlyPoint {
    pub fn new(mes: impl Into<String>, total: f64) -> Self {
        MonthlyPoint {
            mes: mes.into(),
            total,
        }
    }
}

/// The dashboard's built-in series (January to June).
pub const DEMO_MONTHLY_SALES: [(&str, f64); 6] = [
    ("Ene", 12000.0),
    ("Feb", 15000.0),
    ("Mar", 18000.0),
    ("Abr", 22000.0),
    ("May", 19500.0),
    ("Jun", 25000.0),
];

/// [`DEMO_MONTHLY_SALES`] as points.
pub fn demo_series() -> Vec<MonthlyPoint> {
    DEMO_MONTHLY_SALES
        .iter()
        .map(|&(mes, total)| MonthlyPoint::new(mes, total))
        .collect()
}

/// Direction of the projected change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

/// Result of [`forecast`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub projected_value: f64,
    pub percent_change: f64,
    pub direction: Trend,
    pub slope: f64,
    pub intercept: f64,
    /// How many months past the last point was projected.
    pub horizon: u32,
}

/// Projects `horizon` months past the end of `series`.
///
/// A `horizon` of 0 is treated as 1.
///
/// ## Errors
/// `InsufficientData` for fewer than two points, a zero denominator, or a
/// last value of zero.
///
/// ## Example
/// ```rust
/// use deli_core::forecast::{demo_series, forecast, Trend};
///
/// let f = forecast(&demo_series(), 1).unwrap();
/// assert_eq!(f.direction, Trend::Up);
/// assert!((f.projected_value - 26833.333).abs() < 0.01);
/// ```
pub fn forecast(series: &[MonthlyPoint], horizon: u32) -> CoreResult<Forecast> {
    let n = series.len();
    if n < 2 {
        return Err(insufficient(format!("need at least 2 points, got {n}")));
    }

    let nf = n as f64;
    let (sum_x, sum_y, sum_xy, sum_xx) = series.iter().enumerate().fold(
        (0.0, 0.0, 0.0, 0.0),
        |(sx, sy, sxy, sxx), (i, point)| {
            let x = (i + 1) as f64;
            let y = point.total;
            (sx + x, sy + y, sxy + x * y, sxx + x * x)
        },
    );

    let denominator = nf * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return Err(insufficient("series has no spread".to_string()));
    }

    let slope = (nf * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / nf;

    let horizon = horizon.max(1);
    let projected_value = intercept + slope * (nf + f64::from(horizon));

    let last = series[n - 1].total;
    if last == 0.0 {
        return Err(insufficient("last value is zero".to_string()));
    }
    let percent_change = (projected_value - last) / last * 100.0;

    Ok(Forecast {
        projected_value,
        percent_change,
        direction: if percent_change >= 0.0 {
            Trend::Up
        } else {
            Trend::Down
        },
        slope,
        intercept,
        horizon,
    })
}

fn insufficient(reason: String) -> CoreError {
    CoreError::InsufficientData { reason }
}

impl Forecast {
    /// The dashed segment drawn over the chart: last actual point, then the
    /// projection.
    ///
    /// The projected point is labelled with the Spanish month `horizon`
    /// months after the last label, or `+{horizon}` when the last label is
    /// not a month.
    pub fn overlay(&self, series: &[MonthlyPoint]) -> Vec<MonthlyPoint> {
        let Some(last) = series.last() else {
            return Vec::new();
        };
        vec![
            last.clone(),
            MonthlyPoint::new(next_label(&last.mes, self.horizon), self.projected_value),
        ]
    }
}

fn next_label(label: &str, horizon: u32) -> String {
    let prefix: String = label.trim().chars().take(3).collect::<String>().to_lowercase();
    MONTHS_ES
        .iter()
        .position(|m| m.to_lowercase() == prefix)
        .map(|i| MONTHS_ES[(i + horizon as usize) % 12].to_string())
        .unwrap_or_else(|| format!("+{horizon}"))
}

// =============================================================================
// Unit Tests
// =============================================================================
