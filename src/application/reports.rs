use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;

const TRANSACTION_HEADER: &str = "=== TRANSACTION LOG ===";
const REVENUE_LABEL: &str = "Revenue Generated: $";
const METHOD_LABEL: &str = "  Method: ";
const ACTION_LABEL: &str = "Action: ";
const START_DATE_LABEL: &str = "  Start Date: ";

#[derive(Debug, Default, PartialEq)]
pub struct RevenueReport {
    pub total: Decimal,
    pub by_method: BTreeMap<String, Decimal>,
}

#[derive(Debug, Default, PartialEq)]
pub struct BookingStats {
    /// Status-change actions (Approved/Rejected/Cancelled) by name.
    pub by_action: BTreeMap<String, u32>,
    /// Completed transactions by YYYY-MM of the booking start date.
    pub by_month: BTreeMap<String, u32>,
}

/// Sums `Revenue Generated` lines, attributing each block's revenue to the
/// payment method named inside that block. Lines that fail to parse are
/// skipped; the log is an unstructured side channel and the report is best
/// effort by design.
pub fn revenue_report(lines: &[String]) -> RevenueReport {
    let mut report = RevenueReport::default();
    let mut method: Option<String> = None;

    for line in lines {
        if line == TRANSACTION_HEADER {
            method = None;
        } else if let Some(name) = line.strip_prefix(METHOD_LABEL) {
            method = Some(name.trim().to_string());
        } else if let Some(raw) = line.strip_prefix(REVENUE_LABEL)
            && let Ok(amount) = Decimal::from_str(raw.trim())
        {
            report.total += amount;
            if let Some(name) = method.take() {
                *report.by_method.entry(name).or_default() += amount;
            }
        }
    }
    report
}

/// Counts booking status changes and the months rentals start in.
pub fn booking_stats(lines: &[String]) -> BookingStats {
    let mut stats = BookingStats::default();

    for line in lines {
        if let Some(action) = line.strip_prefix(ACTION_LABEL) {
            *stats.by_action.entry(action.trim().to_string()).or_default() += 1;
        } else if let Some(date) = line.strip_prefix(START_DATE_LABEL) {
            let month: String = date.trim().chars().take(7).collect();
            if month.len() == 7 {
                *stats.by_month.entry(month).or_default() += 1;
            }
        }
    }
    stats
}
