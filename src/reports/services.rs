//! Read-time aggregation over the full ticket list.
//!
//! Pure functions, recomputed on every request; nothing here is
//! materialized. O(n log n) over a single salon's records, which is fine at
//! this volume. A larger deployment would need a date-ranged query feeding
//! these incrementally, with the same contracts.
//!
//! All calendar bucketing uses UTC.

use std::collections::{BTreeMap, HashSet};

use time::{Date, Duration, Month, OffsetDateTime};

use crate::tickets::repo::{WorkStatus, WorkTicket};

use super::dto::{
    DashboardSummary, DateSummary, DayStats, MonthRevenue, Period, Statistics, WorkerStats,
    WorkerTally,
};

pub fn dashboard_summary(tickets: &[WorkTicket], as_of: OffsetDateTime) -> DashboardSummary {
    let today = as_of.date();

    let today_revenue = tickets
        .iter()
        .filter(|t| t.created_at.date() == today)
        .map(|t| t.price)
        .sum();

    let active_worker_count = tickets
        .iter()
        .map(|t| t.worker_name.as_str())
        .collect::<HashSet<_>>()
        .len();

    let completed_count = tickets
        .iter()
        .filter(|t| t.status == WorkStatus::Completed)
        .count();

    let mut recent: Vec<&WorkTicket> = tickets.iter().collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let recent_activities = recent.into_iter().take(5).cloned().collect();

    DashboardSummary {
        total_tickets: tickets.len(),
        today_revenue,
        active_worker_count,
        completed_count,
        recent_activities,
    }
}

pub fn statistics(tickets: &[WorkTicket], period: Period, now: OffsetDateTime) -> Statistics {
    let cutoff = match period {
        Period::All => None,
        Period::Week => Some(now - Duration::days(7)),
        Period::Month => Some(one_month_back(now)),
    };
    let filtered: Vec<&WorkTicket> = tickets
        .iter()
        .filter(|t| cutoff.map_or(true, |c| t.occurred_at >= c))
        .collect();

    let total_tickets = filtered.len();
    let total_revenue: f64 = filtered.iter().map(|t| t.price).sum();
    let average_price = if total_tickets > 0 {
        total_revenue / total_tickets as f64
    } else {
        0.0
    };

    let count_status =
        |status: WorkStatus| filtered.iter().filter(|t| t.status == status).count();

    // Grouped in first-encounter order; the stable sort keeps that order
    // for equal revenues.
    let mut workers: Vec<WorkerStats> = Vec::new();
    for ticket in &filtered {
        match workers.iter_mut().find(|w| w.name == ticket.worker_name) {
            Some(entry) => {
                entry.count += 1;
                entry.revenue += ticket.price;
            }
            None => workers.push(WorkerStats {
                name: ticket.worker_name.clone(),
                count: 1,
                revenue: ticket.price,
            }),
        }
    }
    workers.sort_by(|a, b| {
        b.revenue
            .partial_cmp(&a.revenue)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    workers.truncate(5);

    let mut monthly: BTreeMap<(i32, u8), f64> = BTreeMap::new();
    for ticket in &filtered {
        let date = ticket.created_at.date();
        *monthly.entry((date.year(), date.month() as u8)).or_default() += ticket.price;
    }
    let monthly_revenue = monthly
        .into_iter()
        .map(|((year, month), revenue)| MonthRevenue {
            month: format!("{year:04}-{month:02}"),
            revenue,
        })
        .collect();

    let mut daily: BTreeMap<Date, DayStats> = BTreeMap::new();
    for ticket in &filtered {
        let date = ticket.created_at.date();
        let entry = daily.entry(date).or_insert_with(|| DayStats {
            date: day_label(date),
            tickets: 0,
            revenue: 0.0,
        });
        entry.tickets += 1;
        entry.revenue += ticket.price;
    }
    // Ascending, most recent 7 day-buckets that have data.
    let skip = daily.len().saturating_sub(7);
    let daily_stats = daily.into_values().skip(skip).collect();

    Statistics {
        total_tickets,
        total_revenue,
        average_price,
        completed_count: count_status(WorkStatus::Completed),
        pending_count: count_status(WorkStatus::Pending),
        cancelled_count: count_status(WorkStatus::Cancelled),
        top_workers: workers,
        monthly_revenue,
        daily_stats,
    }
}

/// Per-calendar-day totals with a per-worker breakdown, newest day first.
pub fn date_summaries(tickets: &[WorkTicket]) -> Vec<DateSummary> {
    let mut days: BTreeMap<Date, (f64, usize, BTreeMap<String, WorkerTally>)> = BTreeMap::new();
    for ticket in tickets {
        let (revenue, count, per_worker) = days.entry(ticket.created_at.date()).or_default();
        *revenue += ticket.price;
        *count += 1;
        let tally = per_worker.entry(ticket.worker_name.clone()).or_default();
        tally.count += 1;
        tally.revenue += ticket.price;
    }

    days.into_iter()
        .rev()
        .map(|(date, (total_revenue, ticket_count, per_worker))| DateSummary {
            date: day_label(date),
            total_revenue,
            ticket_count,
            per_worker,
        })
        .collect()
}

/// One calendar month earlier, clamping the day at the target month's end
/// (May 31 → Apr 30, Mar 31 → Feb 28/29).
pub(crate) fn one_month_back(now: OffsetDateTime) -> OffsetDateTime {
    let date = now.date();
    let (year, month) = match date.month() {
        Month::January => (date.year() - 1, Month::December),
        other => (date.year(), other.previous()),
    };
    let clamped = Date::from_calendar_date(year, month, date.day())
        .or_else(|_| Date::from_calendar_date(year, month, 30))
        .or_else(|_| Date::from_calendar_date(year, month, 29))
        .or_else(|_| Date::from_calendar_date(year, month, 28))
        .expect("every month has at least 28 days");
    now.replace_date(clamped)
}

fn day_label(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        date.month() as u8,
        date.day()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use uuid::Uuid;

    fn ticket(
        worker: &str,
        price: f64,
        status: WorkStatus,
        created_at: OffsetDateTime,
    ) -> WorkTicket {
        WorkTicket {
            id: Uuid::new_v4(),
            price,
            worker_name: worker.into(),
            description: None,
            image_urls: vec![],
            status,
            occurred_at: created_at,
            created_at,
            updated_at: created_at,
        }
    }

    fn completed(worker: &str, price: f64, created_at: OffsetDateTime) -> WorkTicket {
        ticket(worker, price, WorkStatus::Completed, created_at)
    }

    const NOW: OffsetDateTime = datetime!(2024-05-15 12:00 UTC);

    #[test]
    fn dashboard_three_tickets_today() {
        let tickets = vec![
            completed("A", 100.0, datetime!(2024-05-15 09:00 UTC)),
            completed("A", 200.0, datetime!(2024-05-15 10:00 UTC)),
            completed("B", 300.0, datetime!(2024-05-15 11:00 UTC)),
        ];
        let summary = dashboard_summary(&tickets, NOW);
        assert_eq!(summary.total_tickets, 3);
        assert_eq!(summary.today_revenue, 600.0);
        assert_eq!(summary.active_worker_count, 2);
        assert_eq!(summary.completed_count, 3);
    }

    #[test]
    fn dashboard_today_excludes_other_days() {
        let tickets = vec![
            completed("A", 100.0, datetime!(2024-05-14 23:59 UTC)),
            completed("A", 250.0, datetime!(2024-05-15 00:00 UTC)),
            completed("B", 400.0, datetime!(2024-05-16 00:00 UTC)),
        ];
        let summary = dashboard_summary(&tickets, NOW);
        assert_eq!(summary.today_revenue, 250.0);
        // Workers are counted over the whole list, not just today.
        assert_eq!(summary.active_worker_count, 2);
        assert_eq!(summary.total_tickets, 3);
    }

    #[test]
    fn dashboard_recent_activities_newest_first_capped_at_five() {
        let tickets: Vec<WorkTicket> = (1..=7)
            .map(|day| {
                completed(
                    "A",
                    day as f64,
                    datetime!(2024-05-01 08:00 UTC) + Duration::days(day),
                )
            })
            .collect();
        let summary = dashboard_summary(&tickets, NOW);
        assert_eq!(summary.recent_activities.len(), 5);
        let prices: Vec<f64> = summary.recent_activities.iter().map(|t| t.price).collect();
        assert_eq!(prices, vec![7.0, 6.0, 5.0, 4.0, 3.0]);
    }

    #[test]
    fn dashboard_empty_list() {
        let summary = dashboard_summary(&[], NOW);
        assert_eq!(summary.total_tickets, 0);
        assert_eq!(summary.today_revenue, 0.0);
        assert_eq!(summary.active_worker_count, 0);
        assert!(summary.recent_activities.is_empty());
    }

    #[test]
    fn statistics_empty_has_zero_average() {
        let stats = statistics(&[], Period::All, NOW);
        assert_eq!(stats.total_tickets, 0);
        assert_eq!(stats.total_revenue, 0.0);
        assert_eq!(stats.average_price, 0.0);
        assert!(stats.top_workers.is_empty());
        assert!(stats.monthly_revenue.is_empty());
        assert!(stats.daily_stats.is_empty());
    }

    #[test]
    fn statistics_totals_and_average() {
        let tickets = vec![
            completed("A", 100.0, datetime!(2024-05-10 09:00 UTC)),
            completed("B", 200.0, datetime!(2024-05-11 09:00 UTC)),
            completed("A", 350.0, datetime!(2024-05-12 09:00 UTC)),
        ];
        let stats = statistics(&tickets, Period::All, NOW);
        assert_eq!(stats.total_tickets, 3);
        assert_eq!(stats.total_revenue, 650.0);
        assert!((stats.average_price - 650.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn statistics_counts_by_status() {
        let tickets = vec![
            ticket("A", 100.0, WorkStatus::Completed, NOW),
            ticket("A", 100.0, WorkStatus::Completed, NOW),
            ticket("B", 100.0, WorkStatus::Pending, NOW),
            ticket("B", 100.0, WorkStatus::Cancelled, NOW),
        ];
        let stats = statistics(&tickets, Period::All, NOW);
        assert_eq!(stats.completed_count, 2);
        assert_eq!(stats.pending_count, 1);
        assert_eq!(stats.cancelled_count, 1);
    }

    #[test]
    fn top_workers_sorted_by_revenue_desc() {
        let tickets = vec![
            completed("A", 100.0, NOW),
            completed("B", 500.0, NOW),
            completed("A", 150.0, NOW),
            completed("C", 300.0, NOW),
        ];
        let stats = statistics(&tickets, Period::All, NOW);
        let names: Vec<&str> = stats.top_workers.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["B", "C", "A"]);
        assert_eq!(stats.top_workers[2].count, 2);
        assert_eq!(stats.top_workers[2].revenue, 250.0);
    }

    #[test]
    fn top_workers_truncated_to_five() {
        let tickets: Vec<WorkTicket> = (0..8)
            .map(|i| completed(&format!("W{i}"), 100.0 + i as f64, NOW))
            .collect();
        let stats = statistics(&tickets, Period::All, NOW);
        assert_eq!(stats.top_workers.len(), 5);
        assert_eq!(stats.top_workers[0].name, "W7");
    }

    #[test]
    fn top_workers_revenue_tie_keeps_encounter_order() {
        let tickets = vec![
            completed("First", 200.0, NOW),
            completed("Second", 200.0, NOW),
            completed("Third", 200.0, NOW),
        ];
        let stats = statistics(&tickets, Period::All, NOW);
        let names: Vec<&str> = stats.top_workers.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn week_period_filters_on_occurred_at() {
        let mut old = completed("A", 100.0, datetime!(2024-05-14 09:00 UTC));
        old.occurred_at = datetime!(2024-05-01 09:00 UTC);
        let tickets = vec![
            old,
            completed("A", 200.0, datetime!(2024-05-12 09:00 UTC)),
            completed("B", 300.0, datetime!(2024-05-15 09:00 UTC)),
        ];
        let stats = statistics(&tickets, Period::Week, NOW);
        // The first ticket was created this week but occurred two weeks ago.
        assert_eq!(stats.total_tickets, 2);
        assert_eq!(stats.total_revenue, 500.0);
    }

    #[test]
    fn week_boundary_is_seven_days() {
        let tickets = vec![
            completed("A", 100.0, datetime!(2024-05-08 12:00 UTC)),
            completed("A", 200.0, datetime!(2024-05-08 11:59 UTC)),
        ];
        let stats = statistics(&tickets, Period::Week, NOW);
        assert_eq!(stats.total_tickets, 1);
        assert_eq!(stats.total_revenue, 100.0);
    }

    #[test]
    fn month_period_goes_back_one_calendar_month() {
        let tickets = vec![
            completed("A", 100.0, datetime!(2024-04-15 12:00 UTC)),
            completed("A", 200.0, datetime!(2024-04-20 09:00 UTC)),
            completed("A", 400.0, datetime!(2024-04-15 11:59 UTC)),
        ];
        let stats = statistics(&tickets, Period::Month, NOW);
        // Cutoff is 2024-04-15 12:00; the boundary instant itself is kept.
        assert_eq!(stats.total_tickets, 2);
        assert_eq!(stats.total_revenue, 300.0);
    }

    #[test]
    fn one_month_back_clamps_to_month_end() {
        assert_eq!(
            one_month_back(datetime!(2024-03-31 10:00 UTC)),
            datetime!(2024-02-29 10:00 UTC)
        );
        assert_eq!(
            one_month_back(datetime!(2023-03-31 10:00 UTC)),
            datetime!(2023-02-28 10:00 UTC)
        );
        assert_eq!(
            one_month_back(datetime!(2024-05-31 10:00 UTC)),
            datetime!(2024-04-30 10:00 UTC)
        );
    }

    #[test]
    fn one_month_back_crosses_year_boundary() {
        assert_eq!(
            one_month_back(datetime!(2024-01-15 10:00 UTC)),
            datetime!(2023-12-15 10:00 UTC)
        );
    }

    #[test]
    fn monthly_revenue_sorted_ascending() {
        let tickets = vec![
            completed("A", 300.0, datetime!(2024-05-01 09:00 UTC)),
            completed("A", 100.0, datetime!(2024-03-10 09:00 UTC)),
            completed("A", 200.0, datetime!(2024-03-20 09:00 UTC)),
            completed("A", 50.0, datetime!(2023-12-31 09:00 UTC)),
        ];
        let stats = statistics(&tickets, Period::All, NOW);
        assert_eq!(
            stats.monthly_revenue,
            vec![
                MonthRevenue {
                    month: "2023-12".into(),
                    revenue: 50.0
                },
                MonthRevenue {
                    month: "2024-03".into(),
                    revenue: 300.0
                },
                MonthRevenue {
                    month: "2024-05".into(),
                    revenue: 300.0
                },
            ]
        );
    }

    #[test]
    fn daily_stats_keeps_last_seven_buckets_ascending() {
        let tickets: Vec<WorkTicket> = (1..=9)
            .map(|day| {
                completed(
                    "A",
                    10.0 * day as f64,
                    datetime!(2024-05-01 08:00 UTC) + Duration::days(day - 1),
                )
            })
            .collect();
        let stats = statistics(&tickets, Period::All, NOW);
        assert_eq!(stats.daily_stats.len(), 7);
        assert_eq!(stats.daily_stats[0].date, "2024-05-03");
        assert_eq!(stats.daily_stats[6].date, "2024-05-09");
        assert_eq!(stats.daily_stats[6].revenue, 90.0);
        assert_eq!(stats.daily_stats[6].tickets, 1);
    }

    #[test]
    fn daily_stats_buckets_only_days_with_data() {
        let tickets = vec![
            completed("A", 100.0, datetime!(2024-05-01 09:00 UTC)),
            completed("A", 150.0, datetime!(2024-05-01 10:00 UTC)),
            completed("A", 200.0, datetime!(2024-05-09 09:00 UTC)),
        ];
        let stats = statistics(&tickets, Period::All, NOW);
        assert_eq!(
            stats.daily_stats,
            vec![
                DayStats {
                    date: "2024-05-01".into(),
                    tickets: 2,
                    revenue: 250.0
                },
                DayStats {
                    date: "2024-05-09".into(),
                    tickets: 1,
                    revenue: 200.0
                },
            ]
        );
    }

    #[test]
    fn date_summaries_group_and_sort_descending() {
        let tickets = vec![
            completed("A", 100.0, datetime!(2024-05-10 09:00 UTC)),
            completed("B", 200.0, datetime!(2024-05-10 10:00 UTC)),
            completed("A", 300.0, datetime!(2024-05-12 09:00 UTC)),
        ];
        let summaries = date_summaries(&tickets);
        assert_eq!(summaries.len(), 2);

        assert_eq!(summaries[0].date, "2024-05-12");
        assert_eq!(summaries[0].total_revenue, 300.0);
        assert_eq!(summaries[0].ticket_count, 1);

        assert_eq!(summaries[1].date, "2024-05-10");
        assert_eq!(summaries[1].total_revenue, 300.0);
        assert_eq!(summaries[1].ticket_count, 2);
        assert_eq!(
            summaries[1].per_worker.get("A"),
            Some(&WorkerTally {
                count: 1,
                revenue: 100.0
            })
        );
        assert_eq!(
            summaries[1].per_worker.get("B"),
            Some(&WorkerTally {
                count: 1,
                revenue: 200.0
            })
        );
    }

    #[test]
    fn date_summaries_empty() {
        assert!(date_summaries(&[]).is_empty());
    }
}
