use log::info;
use std::collections::HashSet;

/// Header and noise tokens that must never be treated as client names.
/// Matched case-insensitively against the whole first field of a line.
const HEADER_BLACKLIST: [&str; 8] = [
    "nome",
    "cliente",
    "razão social",
    "billing",
    "faturamento",
    "total",
    "valor",
    "empresa",
];

const FIELD_DELIMITERS: [char; 4] = [';', ',', '|', '\t'];

/// Extracts the deduplicated client roster from a free-form billing list.
///
/// Each line contributes at most one candidate: the text before the first
/// delimiter. Candidates shorter than three characters, blacklisted header
/// tokens, and bare numeric ids are dropped. Duplicates are collapsed
/// case-insensitively keeping the first-seen casing, and the output
/// preserves first-seen order. Malformed lines are skipped silently.
pub fn extract_client_names(raw: &str) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut names = Vec::new();

    for line in raw.lines() {
        let candidate = match line.split(FIELD_DELIMITERS).next() {
            Some(field) => field.trim(),
            None => continue,
        };

        if !is_client_name(candidate) {
            continue;
        }

        if seen.insert(candidate.to_lowercase()) {
            names.push(candidate.to_string());
        }
    }

    info!("Extracted {} client names from billing text", names.len());
    names
}

fn is_client_name(candidate: &str) -> bool {
    if candidate.chars().count() <= 2 {
        return false;
    }

    let lowered = candidate.to_lowercase();
    if HEADER_BLACKLIST.contains(&lowered.as_str()) {
        return false;
    }

    // Bare numeric ids sometimes survive as the first column.
    !candidate.chars().all(|c| c.is_ascii_digit())
}
