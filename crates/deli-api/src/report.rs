//! # Report Endpoint
//!
//! `GET /reportes`: pre-aggregated totals for the reports page and the
//! dashboard forecast. Read-only.

use serde::{Deserialize, Serialize};
use tracing::debug;

use deli_core::types::lenient;
use deli_core::{Money, MonthlyPoint};

use crate::client::ApiClient;
use crate::error::ApiResult;

/// Resource path of the report.
pub const REPORT_RESOURCE: &str = "reportes";

/// Units sold per product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSales {
    pub producto: String,
    #[serde(deserialize_with = "lenient::int")]
    pub total_vendido: i64,
}

/// Body of `GET /reportes`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    #[serde(default)]
    pub ingresos: Money,
    #[serde(default)]
    pub egresos: Money,
    #[serde(default)]
    pub utilidad: Money,
    #[serde(rename = "ventasMensuales", default, deserialize_with = "lenient::null_as_default")]
    pub ventas_mensuales: Vec<MonthlyPoint>,
    #[serde(rename = "comprasMensuales", default, deserialize_with = "lenient::null_as_default")]
    pub compras_mensuales: Vec<MonthlyPoint>,
    /// Best sellers.
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub productos: Vec<ProductSales>,
    /// New customers per month.
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub clientes: Vec<MonthlyPoint>,
}

impl ReportSummary {
    /// Same report with every month label cut to three characters
    /// (`"Enero"` → `"Ene"`).
    pub fn with_short_months(mut self) -> Self {
        for series in [
            &mut self.ventas_mensuales,
            &mut self.compras_mensuales,
            &mut self.clientes,
        ] {
            for point in series.iter_mut() {
                point.mes = short_month(&point.mes);
            }
        }
        self
    }

    /// Monthly sales with short labels, ready for the forecast.
    pub fn forecast_series(&self) -> Vec<MonthlyPoint> {
        self.ventas_mensuales
            .iter()
            .map(|p| MonthlyPoint::new(short_month(&p.mes), p.total))
            .collect()
    }
}

fn short_month(label: &str) -> String {
    label.chars().take(3).collect()
}

impl ApiClient {
    /// Fetches the aggregated report.
    pub async fn report(&self) -> ApiResult<ReportSummary> {
        let endpoint = format!("GET /{REPORT_RESOURCE}");
        let report: ReportSummary = self
            .send_json(&endpoint, self.request(reqwest::Method::GET, REPORT_RESOURCE))
            .await?;

        debug!(
            months = report.ventas_mensuales.len(),
            products = report.productos.len(),
            "Report loaded"
        );
        Ok(report.with_short_months())
    }
}
