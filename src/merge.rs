use crate::schema::{
    Client, MatchedPeriod, MergeDefaults, PaymentStatus, PeriodRecord, ReconciliationMatch,
    RecordSource,
};
use log::{debug, info};
use uuid::Uuid;

/// Merges AI-reported payment matches into the roster.
///
/// `extracted_names` is authoritative for which clients exist in the output:
/// every extracted name yields exactly one client, in extraction order,
/// whether or not the AI found a payment for it. Prior clients are matched
/// by case-insensitive name and keep their id, contract start, and expected
/// amount; first-seen names get a fresh id and the configured defaults.
///
/// Record merge precedence: a `MANUAL_PAID` record is never touched by an
/// AI-reported period. Any other record for the same (month, year) is
/// replaced by the AI data, tagged `source = ai`. A period the AI reports
/// without an amount falls back to the client's expected amount.
pub fn merge_matches(
    existing: &[Client],
    extracted_names: &[String],
    matches: &[ReconciliationMatch],
    defaults: &MergeDefaults,
) -> Vec<Client> {
    let reconciled: Vec<Client> = extracted_names
        .iter()
        .map(|name| {
            let prior = find_by_name(existing, name);
            let ai_match = matches
                .iter()
                .find(|m| names_equal(&m.name_in_billing, name));

            build_client(name, prior, ai_match, defaults)
        })
        .collect();

    info!(
        "Merged roster: {} clients ({} with AI matches)",
        reconciled.len(),
        matches.len()
    );

    reconciled
}

/// The degraded path: rebuilds the roster from the extracted names alone,
/// preserving prior records untouched. Used when the matching call fails,
/// times out, or returns unusable output.
pub fn sync_roster(
    existing: &[Client],
    extracted_names: &[String],
    defaults: &MergeDefaults,
) -> Vec<Client> {
    merge_matches(existing, extracted_names, &[], defaults)
}

fn build_client(
    name: &str,
    prior: Option<&Client>,
    ai_match: Option<&ReconciliationMatch>,
    defaults: &MergeDefaults,
) -> Client {
    let expected_amount = prior
        .map(|c| c.expected_amount)
        .unwrap_or(defaults.expected_amount);

    let mut records = prior.map(|c| c.records.clone()).unwrap_or_default();

    if let Some(m) = ai_match {
        for month in &m.months {
            apply_ai_period(&mut records, month, expected_amount);
        }
    }

    Client {
        id: prior.map(|c| c.id).unwrap_or_else(Uuid::new_v4),
        name: name.to_string(),
        contract_start: prior
            .map(|c| c.contract_start)
            .unwrap_or(defaults.contract_start),
        expected_amount,
        records,
    }
}

fn apply_ai_period(records: &mut Vec<PeriodRecord>, month: &MatchedPeriod, expected_amount: f64) {
    let incoming = PeriodRecord {
        month: month.month,
        year: month.year,
        status: month.status,
        payment_dates: month.payment_dates.clone(),
        amount: month.amount.unwrap_or(expected_amount),
        source: RecordSource::Ai,
    };

    match records
        .iter_mut()
        .find(|r| r.month == month.month && r.year == month.year)
    {
        Some(existing) => {
            // Only MANUAL_PAID blocks automated updates. A manually cleared
            // (unpaid) period can still be re-marked by a later run.
            if existing.status == PaymentStatus::ManualPaid {
                debug!(
                    "Keeping manual confirmation for {}-{:02}",
                    existing.year, existing.month
                );
            } else {
                *existing = incoming;
            }
        }
        None => records.push(incoming),
    }
}

fn find_by_name<'a>(clients: &'a [Client], name: &str) -> Option<&'a Client> {
    clients.iter().find(|c| names_equal(&c.name, name))
}

fn names_equal(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
