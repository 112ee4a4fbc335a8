use crate::period::Period;
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payment state of one billing period. The serialized discriminators are
/// load-bearing: merge precedence compares them exactly, so any store or
/// wire format must preserve `UNPAID`/`PAID`/`MANUAL_PAID` verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[schemars(description = "No payment found for this period")]
    Unpaid,

    #[schemars(description = "Payment detected in the bank statement")]
    Paid,

    #[schemars(description = "Payment confirmed by hand; never overwritten by automated matching")]
    ManualPaid,
}

/// Who last wrote a period record: the matching model or a human.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecordSource {
    Ai,
    Manual,
}

/// The persisted payment status for one client/period pair.
/// At most one record exists per (month, year) within a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    pub month: u32,
    pub year: i32,
    pub status: PaymentStatus,
    #[serde(default)]
    pub payment_dates: Vec<NaiveDate>,
    pub amount: f64,
    pub source: RecordSource,
}

impl PeriodRecord {
    pub fn period(&self) -> Period {
        Period {
            year: self.year,
            month: self.month,
        }
    }
}

/// One client in the roster. The id is assigned once at creation and kept
/// across reconciliation runs; the name is case-insensitively unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub contract_start: Period,
    pub expected_amount: f64,
    #[serde(default)]
    pub records: Vec<PeriodRecord>,
}

impl Client {
    /// Looks up the persisted record for one period, if any.
    pub fn record_for(&self, month: u32, year: i32) -> Option<&PeriodRecord> {
        self.records
            .iter()
            .find(|r| r.month == month && r.year == year)
    }
}

/// One matched period as reported by the AI auditor. `amount` may be
/// omitted by the model; the merge falls back to the client's expected
/// amount. Field names follow the model contract (camelCase).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchedPeriod {
    #[schemars(description = "Calendar month of the billing period, 1-12")]
    pub month: u32,

    #[schemars(description = "Calendar year of the billing period")]
    pub year: i32,

    #[schemars(description = "Payment status detected for this period, normally PAID")]
    pub status: PaymentStatus,

    #[serde(default)]
    #[schemars(description = "Deposit dates found in the statement, YYYY-MM-DD")]
    pub payment_dates: Vec<NaiveDate>,

    #[schemars(description = "Deposited amount; omit when it could not be read")]
    pub amount: Option<f64>,
}

/// One client the AI matched against the bank statement: the exact name as
/// it appears in the billing list, plus the periods it found deposits for.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationMatch {
    #[schemars(description = "Client name exactly as it appears in the billing list")]
    pub name_in_billing: String,

    #[serde(default)]
    #[schemars(description = "Billing periods with detected payments")]
    pub months: Vec<MatchedPeriod>,
}

impl ReconciliationMatch {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(ReconciliationMatch)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

/// Values assigned to clients seen for the first time during a merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeDefaults {
    pub contract_start: Period,
    pub expected_amount: f64,
}

impl Default for MergeDefaults {
    fn default() -> Self {
        Self {
            contract_start: Period {
                year: 2025,
                month: 1,
            },
            expected_amount: 450.0,
        }
    }
}

/// Portfolio-level aggregates derived from the roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_clients: usize,
    pub total_paid: f64,
    pub open_months: usize,
}
