use crate::period::{month_label, Period};
use crate::schema::{Client, PaymentStatus};
use chrono::NaiveDate;

/// Number of periods the audit view spans by default, counting back from
/// the reference period.
pub const AUDIT_WINDOW_MONTHS: usize = 14;

/// One derived timeline cell. Not persisted; recomputed on every read from
/// the client's records.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    pub month: u32,
    pub year: i32,
    pub status: PaymentStatus,
    pub payment_dates: Vec<NaiveDate>,
    pub amount: f64,
}

impl TimelineEntry {
    pub fn period(&self) -> Period {
        Period {
            year: self.year,
            month: self.month,
        }
    }

    /// Display convenience; consumers with their own locale formatting use
    /// the numeric month/year instead.
    pub fn label(&self) -> &'static str {
        month_label(self.month)
    }
}

/// Projects a client's payment timeline over the audit window, most recent
/// period first.
///
/// Starting at `reference`, steps back one month at a time for at most
/// `window_months` periods and stops at the client's contract start:
/// periods the client could not owe are omitted entirely, not emitted as
/// placeholders. Periods without a persisted record come back `Unpaid` with
/// no payment dates and the client's expected amount.
pub fn project_timeline(
    client: &Client,
    reference: Period,
    window_months: usize,
) -> Vec<TimelineEntry> {
    let mut timeline = Vec::new();
    let mut current = reference;

    for _ in 0..window_months {
        if current < client.contract_start {
            break;
        }

        let entry = match client.record_for(current.month, current.year) {
            Some(record) => TimelineEntry {
                month: current.month,
                year: current.year,
                status: record.status,
                payment_dates: record.payment_dates.clone(),
                amount: record.amount,
            },
            None => TimelineEntry {
                month: current.month,
                year: current.year,
                status: PaymentStatus::Unpaid,
                payment_dates: Vec::new(),
                amount: client.expected_amount,
            },
        };

        timeline.push(entry);
        current = current.prev();
    }

    timeline
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{PeriodRecord, RecordSource};
    use uuid::Uuid;

    fn client_starting(year: i32, month: u32) -> Client {
        Client {
            id: Uuid::new_v4(),
            name: "Cliente Teste".to_string(),
            contract_start: Period { year, month },
            expected_amount: 450.0,
            records: Vec::new(),
        }
    }

    #[test]
    fn test_window_is_clipped_at_contract_start() {
        // Contract starts 2025-11, window anchored at 2026-02: exactly four
        // periods remain (Nov, Dec, Jan, Feb), not fourteen.
        let client = client_starting(2025, 11);
        let reference = Period {
            year: 2026,
            month: 2,
        };

        let timeline = project_timeline(&client, reference, AUDIT_WINDOW_MONTHS);

        assert_eq!(timeline.len(), 4);
        assert_eq!(timeline[0].period(), Period { year: 2026, month: 2 });
        assert_eq!(timeline[3].period(), Period { year: 2025, month: 11 });
    }

    #[test]
    fn test_full_window_for_old_contracts() {
        let client = client_starting(2020, 1);
        let reference = Period {
            year: 2026,
            month: 2,
        };

        let timeline = project_timeline(&client, reference, AUDIT_WINDOW_MONTHS);

        assert_eq!(timeline.len(), AUDIT_WINDOW_MONTHS);
        assert_eq!(timeline[0].period(), Period { year: 2026, month: 2 });
        assert_eq!(
            timeline[AUDIT_WINDOW_MONTHS - 1].period(),
            Period { year: 2025, month: 1 }
        );
    }

    #[test]
    fn test_reference_before_contract_start_is_empty() {
        let client = client_starting(2026, 6);
        let reference = Period {
            year: 2026,
            month: 2,
        };

        assert!(project_timeline(&client, reference, AUDIT_WINDOW_MONTHS).is_empty());
    }

    #[test]
    fn test_missing_record_falls_back_to_unpaid_and_expected_amount() {
        let client = client_starting(2026, 1);
        let reference = Period {
            year: 2026,
            month: 2,
        };

        let timeline = project_timeline(&client, reference, 2);

        assert_eq!(timeline.len(), 2);
        for entry in &timeline {
            assert_eq!(entry.status, PaymentStatus::Unpaid);
            assert!(entry.payment_dates.is_empty());
            assert_eq!(entry.amount, 450.0);
        }
    }

    #[test]
    fn test_persisted_record_is_reflected() {
        let mut client = client_starting(2026, 1);
        client.records.push(PeriodRecord {
            month: 1,
            year: 2026,
            status: PaymentStatus::Paid,
            payment_dates: vec![NaiveDate::from_ymd_opt(2026, 1, 9).unwrap()],
            amount: 470.0,
            source: RecordSource::Ai,
        });

        let reference = Period {
            year: 2026,
            month: 2,
        };
        let timeline = project_timeline(&client, reference, AUDIT_WINDOW_MONTHS);

        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[1].status, PaymentStatus::Paid);
        assert_eq!(timeline[1].amount, 470.0);
        assert_eq!(timeline[1].payment_dates.len(), 1);
        assert_eq!(timeline[0].status, PaymentStatus::Unpaid);
    }

    #[test]
    fn test_projection_does_not_mutate_client() {
        let client = client_starting(2025, 1);
        let before = client.clone();

        let reference = Period {
            year: 2026,
            month: 2,
        };
        let _ = project_timeline(&client, reference, AUDIT_WINDOW_MONTHS);

        assert_eq!(client, before);
    }

    #[test]
    fn test_labels_follow_month_numbers() {
        let client = client_starting(2025, 12);
        let reference = Period {
            year: 2026,
            month: 2,
        };

        let timeline = project_timeline(&client, reference, AUDIT_WINDOW_MONTHS);
        let labels: Vec<&str> = timeline.iter().map(|e| e.label()).collect();

        assert_eq!(labels, vec!["Fev", "Jan", "Dez"]);
    }
}
