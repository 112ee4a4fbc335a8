//! # Billing Reconciler
//!
//! A library for reconciling an expected-billing list against a bank
//! statement extract. An external language model does the semantic name
//! matching; this crate owns everything with real invariants around it:
//!
//! - **Name extraction**: pulls a deduplicated, order-stable client roster
//!   out of noisy tabular text (headers, mixed delimiters, stray ids).
//! - **Match merging**: folds AI-reported payment matches into the prior
//!   roster. Manual confirmations (`MANUAL_PAID`) are never overwritten by
//!   automated updates, and a failed matching call degrades to a roster
//!   sync instead of losing clients.
//! - **Timeline projection**: derives a windowed, most-recent-first payment
//!   timeline per client, clipped at the contract start.
//! - **Aggregation**: portfolio totals (clients, collected amount, open
//!   periods) recomputed from the records on every read.
//!
//! The Gemini-backed matcher lives behind the `gemini` feature; the core is
//! pure and synchronous, and persistence is an injectable whole-collection
//! [`RosterStore`].
//!
//! ## Example
//!
//! ```rust
//! use billing_reconciler::{reconcile, MergeDefaults, ReconcileError};
//!
//! let billing = "João Silva;450\nnome;valor\nMaria Souza;300";
//!
//! // The matching call failed upstream: the roster still syncs.
//! let ai_result: Result<_, ReconcileError> =
//!     Err(ReconcileError::MatchingFailed("timeout".into()));
//! let outcome = reconcile(&[], billing, ai_result, &MergeDefaults::default());
//!
//! assert!(!outcome.ai_applied);
//! assert_eq!(outcome.clients.len(), 2);
//! ```

pub mod error;
pub mod extract;
pub mod merge;
pub mod period;
pub mod roster;
pub mod schema;
pub mod stats;
pub mod timeline;

#[cfg(feature = "gemini")]
pub mod llm;

pub use error::{ReconcileError, Result};
pub use extract::extract_client_names;
pub use merge::{merge_matches, sync_roster};
pub use period::{month_label, months_between, Period};
pub use roster::{add_client, toggle_payment, JsonFileStore, MemoryStore, RosterStore};
pub use schema::*;
pub use stats::{collection_progress, summarize};
pub use timeline::{project_timeline, TimelineEntry, AUDIT_WINDOW_MONTHS};

use log::{info, warn};

/// Result of one reconciliation run. `ai_applied` is false when the
/// matching call failed and the run fell back to a roster-only sync.
#[derive(Debug, Clone)]
pub struct ReconciliationOutcome {
    pub clients: Vec<Client>,
    pub ai_applied: bool,
}

/// Runs one reconciliation pass over a billing text.
///
/// Extracts the authoritative client names, then merges `ai_result` into
/// the prior roster. A failed matching call is recoverable: every extracted
/// name still appears in the output with its prior records intact, and the
/// degradation is reported through [`ReconciliationOutcome::ai_applied`]
/// rather than an error.
pub fn reconcile<E: std::fmt::Display>(
    existing: &[Client],
    billing_text: &str,
    ai_result: std::result::Result<Vec<ReconciliationMatch>, E>,
    defaults: &MergeDefaults,
) -> ReconciliationOutcome {
    let names = extract_client_names(billing_text);
    info!(
        "Reconciling {} extracted names against {} known clients",
        names.len(),
        existing.len()
    );

    match ai_result {
        Ok(matches) => ReconciliationOutcome {
            clients: merge_matches(existing, &names, &matches, defaults),
            ai_applied: true,
        },
        Err(e) => {
            warn!("Payment matching unavailable, syncing roster only: {}", e);
            ReconciliationOutcome {
                clients: sync_roster(existing, &names, defaults),
                ai_applied: false,
            }
        }
    }
}
