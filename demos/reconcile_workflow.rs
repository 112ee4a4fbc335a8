use billing_reconciler::llm::{GeminiClient, PaymentMatcher};
use billing_reconciler::{
    collection_progress, summarize, JsonFileStore, MergeDefaults, Period, RosterStore,
    AUDIT_WINDOW_MONTHS,
};
use dotenv::dotenv;

const MOCK_BILLING_LIST: &str = "\
nome;valor
Amós Silva De Oliveira;450
S.s Laboratorio De Protese Ltda;1200
Rafael Rodrigues Silva;350
Marcio Pereira Nishikawara;600
";

const MOCK_BANK_STATEMENT: &str = "\
03/01/2026 PIX RECEBIDO AMOS S OLIVEIRA R$ 450,00
05/01/2026 TED SS LABORATORIO PROTESE R$ 1.200,00
09/01/2026 PIX RECEBIDO R RODRIGUES SILVA R$ 350,00
02/02/2026 PIX RECEBIDO AMOS S OLIVEIRA R$ 450,00
";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let api_key = std::env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY must be set");
    let matcher = PaymentMatcher::new(GeminiClient::new(api_key));

    let store = JsonFileStore::new("roster.json");
    let existing = store.load()?;
    println!("Loaded {} known clients", existing.len());

    let outcome = matcher
        .run(
            &existing,
            MOCK_BILLING_LIST,
            MOCK_BANK_STATEMENT,
            &MergeDefaults::default(),
        )
        .await;

    if !outcome.ai_applied {
        println!("Matching unavailable, roster was synced without payment updates");
    }

    store.save(&outcome.clients)?;

    let reference = Period {
        year: 2026,
        month: 2,
    };
    let stats = summarize(&outcome.clients, reference, AUDIT_WINDOW_MONTHS);
    println!(
        "{} clients | R$ {:.2} collected | {} open periods",
        stats.total_clients, stats.total_paid, stats.open_months
    );

    for client in &outcome.clients {
        println!(
            "  {:40} {:3}% settled ({} records)",
            client.name,
            collection_progress(client, reference, AUDIT_WINDOW_MONTHS),
            client.records.len()
        );
    }

    Ok(())
}
