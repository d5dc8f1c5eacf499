//! # Dashboard
//!
//! Report totals plus the sales forecast drawn over the monthly chart.
//!
//! ```text
//!   total
//!     │                                   ╱ ◌  projected (dashed)
//!     │                        ●────────●
//!     │             ●────●────╱
//!     │   ●────●───╱
//!     └──────────────────────────────────────── mes
//!        Ene  Feb  Mar  Abr  May  Jun   Jul
//! ```
//!
//! When the series cannot support a forecast the dashboard still shows the
//! report; the forecast is left out and an info toast says why.

use serde::Serialize;
use tracing::{debug, info};

use deli_api::{ApiClient, ReportSummary};
use deli_core::forecast::demo_series;
use deli_core::{forecast, CoreError, Forecast, MonthlyPoint};

use crate::error::{ConsoleError, ConsoleResult};
use crate::notify::{Inbox, Notification};

/// Everything the dashboard renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub report: ReportSummary,
    /// `None` when the data cannot support a forecast.
    pub forecast: Option<Forecast>,
    /// Last actual point and the projection; empty without a forecast.
    pub overlay: Vec<MonthlyPoint>,
}

/// Dashboard controller.
pub struct Dashboard {
    client: ApiClient,
    horizon: u32,
    view: Option<DashboardView>,
    inbox: Inbox,
}

impl Dashboard {
    pub fn new(client: &ApiClient, horizon: u32) -> Self {
        Dashboard {
            client: client.clone(),
            horizon,
            view: None,
            inbox: Inbox::default(),
        }
    }

    pub fn view(&self) -> Option<&DashboardView> {
        self.view.as_ref()
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.inbox.drain()
    }

    /// Fetches the report and projects its monthly sales.
    ///
    /// A failed fetch keeps the previous view and queues an error toast.
    pub async fn load(&mut self) -> ConsoleResult<&DashboardView> {
        let report = match self.client.report().await {
            Ok(report) => report,
            Err(e) => {
                let err = ConsoleError::from(e);
                self.inbox.push(err.notification());
                return Err(err);
            }
        };

        let series = report.forecast_series();
        let (forecast, overlay) = self.project(&series);
        let view = self.view.insert(DashboardView {
            report,
            forecast,
            overlay,
        });
        Ok(&*view)
    }

    /// Forecast over the built-in demo series, for a dashboard with no
    /// backend.
    pub fn forecast_demo(&mut self) -> Option<(Forecast, Vec<MonthlyPoint>)> {
        let series = demo_series();
        let (forecast, overlay) = self.project(&series);
        forecast.map(|f| (f, overlay))
    }

    fn project(&mut self, series: &[MonthlyPoint]) -> (Option<Forecast>, Vec<MonthlyPoint>) {
        match forecast(series, self.horizon) {
            Ok(f) => {
                info!(
                    projected = f.projected_value,
                    percent_change = f.percent_change,
                    direction = ?f.direction,
                    "Forecast computed"
                );
                let overlay = f.overlay(series);
                (Some(f), overlay)
            }
            Err(e @ CoreError::InsufficientData { .. }) => {
                debug!(points = series.len(), error = %e, "Forecast suppressed");
                self.inbox.push(Notification::info(format!(
                    "Not enough sales data for a forecast ({})",
                    insufficient_reason(&e)
                )));
                (None, Vec::new())
            }
            Err(e) => {
                self.inbox.push(ConsoleError::from(e).notification());
                (None, Vec::new())
            }
        }
    }
}

fn insufficient_reason(err: &CoreError) -> &str {
    match err {
        CoreError::InsufficientData { reason } => reason,
        _ => "",
    }
}
