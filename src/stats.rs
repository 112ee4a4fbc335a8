use crate::period::Period;
use crate::schema::{Client, PaymentStatus, SummaryStats};
use crate::timeline::project_timeline;

/// Folds the roster into portfolio-level aggregates.
///
/// `total_paid` sums every persisted non-unpaid record, regardless of the
/// window; `open_months` counts only the unpaid periods visible in each
/// client's windowed timeline.
pub fn summarize(roster: &[Client], reference: Period, window_months: usize) -> SummaryStats {
    let total_paid = roster
        .iter()
        .flat_map(|c| &c.records)
        .filter(|r| r.status != PaymentStatus::Unpaid)
        .map(|r| r.amount)
        .sum();

    let open_months = roster
        .iter()
        .map(|c| {
            project_timeline(c, reference, window_months)
                .iter()
                .filter(|e| e.status == PaymentStatus::Unpaid)
                .count()
        })
        .sum();

    SummaryStats {
        total_clients: roster.len(),
        total_paid,
        open_months,
    }
}

/// Share of the client's windowed timeline that is settled, as a rounded
/// percentage. An empty timeline (contract starting after the reference)
/// reads as zero.
pub fn collection_progress(client: &Client, reference: Period, window_months: usize) -> u8 {
    let timeline = project_timeline(client, reference, window_months);
    if timeline.is_empty() {
        return 0;
    }

    let paid = timeline
        .iter()
        .filter(|e| e.status != PaymentStatus::Unpaid)
        .count();

    ((paid as f64 / timeline.len() as f64) * 100.0).round() as u8
}
