use crate::error::{ReconcileError, Result};
use crate::llm::client::GeminiClient;
use crate::llm::prompts::{match_response_schema, SYSTEM_PROMPT_AUDITOR};
use crate::llm::types::Content;
use crate::schema::{Client, MergeDefaults, ReconciliationMatch};
use crate::{reconcile, ReconciliationOutcome};
use log::debug;
use std::time::Duration;
use tokio::time::timeout;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(60);

/// Asks Gemini to match bank deposits to billed clients.
///
/// The call either yields a complete match list or fails; there are no
/// partial results. [`PaymentMatcher::run`] wraps the call in a timeout and
/// always degrades to a roster-only sync on failure.
pub struct PaymentMatcher {
    client: GeminiClient,
    model: String,
    call_timeout: Duration,
}

impl PaymentMatcher {
    pub fn new(client: GeminiClient) -> Self {
        Self {
            client,
            model: DEFAULT_MODEL.to_string(),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// One matching call: billing list + bank statement in, match list out.
    /// Malformed model output is an error, never a partial list.
    pub async fn match_payments(
        &self,
        billing_text: &str,
        bank_text: &str,
    ) -> Result<Vec<ReconciliationMatch>> {
        let messages = vec![Content::user([
            format!("BILLING LIST:\n{}", billing_text),
            format!("BANK STATEMENT:\n{}", bank_text),
        ])];

        let raw = self
            .client
            .generate_content(
                &self.model,
                SYSTEM_PROMPT_AUDITOR,
                messages,
                Some(match_response_schema()),
            )
            .await?;

        debug!("Gemini returned {} bytes of match JSON", raw.len());
        parse_matches(&raw)
    }

    /// The full reconciliation workflow: extract names from the billing
    /// text, match payments (bounded by the call timeout), and merge. A
    /// timed-out or failed call falls back to the degraded roster sync; the
    /// outcome flags whether AI matches were applied.
    pub async fn run(
        &self,
        existing: &[Client],
        billing_text: &str,
        bank_text: &str,
        defaults: &MergeDefaults,
    ) -> ReconciliationOutcome {
        let ai_result = match timeout(
            self.call_timeout,
            self.match_payments(billing_text, bank_text),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(ReconcileError::MatchingFailed(format!(
                "Matching call timed out after {:?}",
                self.call_timeout
            ))),
        };

        reconcile(existing, billing_text, ai_result, defaults)
    }
}

/// Parses the model's raw JSON into the match list. An empty array is a
/// valid "no matches" answer.
pub fn parse_matches(raw: &str) -> Result<Vec<ReconciliationMatch>> {
    serde_json::from_str(raw.trim())
        .map_err(|e| ReconcileError::MatchingFailed(format!("Unparsable match list: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::PaymentStatus;

    #[test]
    fn test_parse_matches_accepts_empty_array() {
        assert!(parse_matches("[]").unwrap().is_empty());
        assert!(parse_matches("  [] \n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_matches_full_payload() {
        let raw = r#"[
            {
                "nameInBilling": "Maria Souza",
                "months": [
                    { "month": 2, "year": 2026, "status": "PAID",
                      "paymentDates": ["2026-02-05"], "amount": 300.0 }
                ]
            }
        ]"#;

        let matches = parse_matches(raw).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name_in_billing, "Maria Souza");
        assert_eq!(matches[0].months[0].status, PaymentStatus::Paid);
    }

    #[test]
    fn test_parse_matches_rejects_malformed_output() {
        assert!(matches!(
            parse_matches("the model apologizes"),
            Err(ReconcileError::MatchingFailed(_))
        ));
        assert!(matches!(
            parse_matches(r#"{ "nameInBilling": "not an array" }"#),
            Err(ReconcileError::MatchingFailed(_))
        ));
    }
}
