use serde_json::{json, Value};

/// System instruction for the payment-matching call. Semantic name matching
/// is entirely the model's job; the merge on our side compares names
/// exactly, so `nameInBilling` must be copied verbatim from the billing
/// list.
pub const SYSTEM_PROMPT_AUDITOR: &str = r#"
ACT AS AN AI FINANCIAL AUDITOR.

TASK:
Analyze the BANK STATEMENT and identify payments for the clients listed in
the BILLING LIST.

CRITICAL RULES:
1. When a name in the statement matches a billed client, return the payment
   details for every billing period you can attribute to that client.
2. Match names semantically (e.g. "J. Silva" in the statement is the same
   client as "João Silva" in the billing list). Abbreviations, word order
   and accents may differ.
3. "nameInBilling" MUST be the exact name as it appears in the billing
   list, character for character.
4. Return ONLY the matches you found. Do not invent payments and do not
   list clients without a credit in the statement.
5. Use status "PAID" for detected deposits. Dates are YYYY-MM-DD.

RETURN FORMAT (JSON):
[
  {
    "nameInBilling": "Exact name from the billing list",
    "months": [
      { "month": 2, "year": 2026, "status": "PAID",
        "paymentDates": ["2026-02-05"], "amount": 450.0 }
    ]
  }
]
"#;

/// Response schema handed to Gemini so the match list comes back as clean
/// JSON (uppercase type names per the generateContent API).
pub fn match_response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "nameInBilling": {
                    "type": "STRING",
                    "description": "Client name exactly as it appears in the billing list"
                },
                "months": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "month": { "type": "INTEGER" },
                            "year": { "type": "INTEGER" },
                            "status": {
                                "type": "STRING",
                                "enum": ["PAID", "UNPAID", "MANUAL_PAID"]
                            },
                            "paymentDates": {
                                "type": "ARRAY",
                                "items": { "type": "STRING" }
                            },
                            "amount": { "type": "NUMBER" }
                        },
                        "required": ["month", "year", "status"]
                    }
                }
            },
            "required": ["nameInBilling", "months"]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_mentions_wire_fields() {
        let schema = match_response_schema().to_string();
        assert!(schema.contains("nameInBilling"));
        assert!(schema.contains("paymentDates"));
        assert!(schema.contains("MANUAL_PAID"));
    }

    #[test]
    fn test_prompt_pins_exact_name_rule() {
        assert!(SYSTEM_PROMPT_AUDITOR.contains("exact name"));
        assert!(SYSTEM_PROMPT_AUDITOR.contains("nameInBilling"));
    }
}
