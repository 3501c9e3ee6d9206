use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tickets::repo::WorkTicket;

/// Reporting window for the statistics view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    All,
    Week,
    Month,
}

#[derive(Debug, Deserialize, Default)]
pub struct StatisticsQuery {
    #[serde(default)]
    pub period: Period,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_tickets: usize,
    pub today_revenue: f64,
    pub active_worker_count: usize,
    pub completed_count: usize,
    pub recent_activities: Vec<WorkTicket>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkerStats {
    pub name: String,
    pub count: usize,
    pub revenue: f64,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthRevenue {
    pub month: String,
    pub revenue: f64,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayStats {
    pub date: String,
    pub tickets: usize,
    pub revenue: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_tickets: usize,
    pub total_revenue: f64,
    pub average_price: f64,
    pub completed_count: usize,
    pub pending_count: usize,
    pub cancelled_count: usize,
    pub top_workers: Vec<WorkerStats>,
    pub monthly_revenue: Vec<MonthRevenue>,
    pub daily_stats: Vec<DayStats>,
}

#[derive(Debug, Serialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkerTally {
    pub count: usize,
    pub revenue: f64,
}

/// One calendar day of activity with a per-worker breakdown, for the
/// day-by-day drill-down view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateSummary {
    pub date: String,
    pub total_revenue: f64,
    pub ticket_count: usize,
    pub per_worker: BTreeMap<String, WorkerTally>,
}
