use crate::error::{ReconcileError, Result};
use crate::period::Period;
use crate::schema::{Client, PaymentStatus, PeriodRecord, RecordSource};
use chrono::NaiveDate;
use log::info;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use uuid::Uuid;

/// Whole-collection persistence seam. Every mutation is a read-modify-write
/// of the full roster; callers must serialize writes (single active writer).
pub trait RosterStore {
    fn load(&self) -> Result<Vec<Client>>;
    fn save(&self, roster: &[Client]) -> Result<()>;
}

/// In-memory store for tests and demos.
#[derive(Default)]
pub struct MemoryStore {
    roster: Mutex<Vec<Client>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RosterStore for MemoryStore {
    fn load(&self) -> Result<Vec<Client>> {
        Ok(self.roster.lock().expect("roster store poisoned").clone())
    }

    fn save(&self, roster: &[Client]) -> Result<()> {
        *self.roster.lock().expect("roster store poisoned") = roster.to_vec();
        Ok(())
    }
}

/// Whole-file JSON persistence. A missing file loads as an empty roster;
/// saving replaces the file content atomically from the caller's point of
/// view (single writer assumed).
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RosterStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Client>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let data = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    fn save(&self, roster: &[Client]) -> Result<()> {
        let data = serde_json::to_string_pretty(roster)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

/// Adds a manually registered client to the roster and returns it.
pub fn add_client<'a>(
    roster: &'a mut Vec<Client>,
    name: &str,
    contract_start: Period,
    expected_amount: f64,
) -> Result<&'a Client> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ReconcileError::EmptyClientName);
    }

    roster.push(Client {
        id: Uuid::new_v4(),
        name: name.to_string(),
        contract_start,
        expected_amount,
        records: Vec::new(),
    });

    info!("Added client '{}' to roster", name);
    Ok(roster.last().expect("just pushed"))
}

/// Toggles the manual payment mark for one client/period pair.
///
/// An unpaid (or missing) period becomes `MANUAL_PAID` with `on` as its
/// payment date; a settled period becomes `UNPAID` with no dates. Either
/// way the record is tagged `source = manual`. A missing record is created
/// with the client's expected amount.
pub fn toggle_payment(
    roster: &mut [Client],
    client_id: Uuid,
    month: u32,
    year: i32,
    on: NaiveDate,
) -> Result<()> {
    let client = roster
        .iter_mut()
        .find(|c| c.id == client_id)
        .ok_or(ReconcileError::UnknownClient(client_id))?;

    let expected_amount = client.expected_amount;

    match client
        .records
        .iter_mut()
        .find(|r| r.month == month && r.year == year)
    {
        Some(record) => {
            if record.status == PaymentStatus::Unpaid {
                record.status = PaymentStatus::ManualPaid;
                record.payment_dates = vec![on];
            } else {
                record.status = PaymentStatus::Unpaid;
                record.payment_dates = Vec::new();
            }
            record.source = RecordSource::Manual;
        }
        None => client.records.push(PeriodRecord {
            month,
            year,
            status: PaymentStatus::ManualPaid,
            payment_dates: vec![on],
            amount: expected_amount,
            source: RecordSource::Manual,
        }),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_client() -> Client {
        Client {
            id: Uuid::new_v4(),
            name: "Maria Souza".to_string(),
            contract_start: Period {
                year: 2025,
                month: 1,
            },
            expected_amount: 300.0,
            records: Vec::new(),
        }
    }

    #[test]
    fn test_add_client_rejects_blank_names() {
        let mut roster = Vec::new();
        assert!(matches!(
            add_client(&mut roster, "   ", Period { year: 2025, month: 1 }, 450.0),
            Err(ReconcileError::EmptyClientName)
        ));
        assert!(roster.is_empty());
    }

    #[test]
    fn test_add_client_trims_and_assigns_id() {
        let mut roster = Vec::new();
        let id = {
            let added = add_client(
                &mut roster,
                "  Nova Cliente  ",
                Period { year: 2025, month: 6 },
                500.0,
            )
            .unwrap();
            assert_eq!(added.name, "Nova Cliente");
            added.id
        };

        let mut other = Vec::new();
        let second = add_client(&mut other, "Nova Cliente", Period { year: 2025, month: 6 }, 500.0)
            .unwrap();
        assert_ne!(second.id, id);
    }

    #[test]
    fn test_toggle_creates_manual_paid_record() {
        let mut roster = vec![sample_client()];
        let id = roster[0].id;
        let today = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();

        toggle_payment(&mut roster, id, 1, 2026, today).unwrap();

        let record = roster[0].record_for(1, 2026).unwrap();
        assert_eq!(record.status, PaymentStatus::ManualPaid);
        assert_eq!(record.source, RecordSource::Manual);
        assert_eq!(record.payment_dates, vec![today]);
        assert_eq!(record.amount, 300.0);
    }

    #[test]
    fn test_toggle_round_trip_clears_mark() {
        let mut roster = vec![sample_client()];
        let id = roster[0].id;
        let today = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();

        toggle_payment(&mut roster, id, 1, 2026, today).unwrap();
        toggle_payment(&mut roster, id, 1, 2026, today).unwrap();

        let record = roster[0].record_for(1, 2026).unwrap();
        assert_eq!(record.status, PaymentStatus::Unpaid);
        assert!(record.payment_dates.is_empty());
        assert_eq!(record.source, RecordSource::Manual);
    }

    #[test]
    fn test_toggle_clears_ai_detected_payment() {
        let mut client = sample_client();
        client.records.push(PeriodRecord {
            month: 12,
            year: 2025,
            status: PaymentStatus::Paid,
            payment_dates: vec![NaiveDate::from_ymd_opt(2025, 12, 5).unwrap()],
            amount: 300.0,
            source: RecordSource::Ai,
        });
        let id = client.id;
        let mut roster = vec![client];

        let today = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();
        toggle_payment(&mut roster, id, 12, 2025, today).unwrap();

        let record = roster[0].record_for(12, 2025).unwrap();
        assert_eq!(record.status, PaymentStatus::Unpaid);
        assert_eq!(record.source, RecordSource::Manual);
    }

    #[test]
    fn test_toggle_unknown_client() {
        let mut roster = vec![sample_client()];
        let missing = Uuid::new_v4();
        let today = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();

        assert!(matches!(
            toggle_payment(&mut roster, missing, 1, 2026, today),
            Err(ReconcileError::UnknownClient(id)) if id == missing
        ));
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.load().unwrap().is_empty());

        let roster = vec![sample_client()];
        store.save(&roster).unwrap();
        assert_eq!(store.load().unwrap(), roster);

        store.save(&[]).unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_json_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("roster.json"));

        // Missing file reads as an empty roster.
        assert!(store.load().unwrap().is_empty());

        let roster = vec![sample_client()];
        store.save(&roster).unwrap();
        assert_eq!(store.load().unwrap(), roster);
    }

    #[test]
    fn test_json_file_store_rejects_corrupt_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.json");
        fs::write(&path, "not json").unwrap();

        let store = JsonFileStore::new(path);
        assert!(matches!(
            store.load(),
            Err(ReconcileError::SerializationError(_))
        ));
    }
}
