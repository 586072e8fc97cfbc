//! Query classification into retrieval-intensity classes.
//!
//! Factual lookups need narrow, high-precision evidence; open-ended legal
//! analysis needs broad recall. The per-class target counts encode that
//! asymmetry and are contract constants.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryClass {
    Factual,
    Analysis,
    Process,
    General,
}

impl QueryClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryClass::Factual => "factual",
            QueryClass::Analysis => "analysis",
            QueryClass::Process => "process",
            QueryClass::General => "general",
        }
    }
}

/// Per-query retrieval plan. Derived, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrievalProfile {
    pub class: QueryClass,
    pub target_count: usize,
    pub description: &'static str,
}

const FACTUAL_PATTERNS: &[&str] = &[
    "what was",
    "when did",
    "amount",
    "date",
    "number",
    "premium",
    "policy number",
    "sum assured",
    "issue date",
    "lapse date",
    "payment history",
    "specific",
    "exactly",
];

const ANALYSIS_PATTERNS: &[&str] = &[
    "grounds for",
    "legal basis",
    "precedent",
    "arguments",
    "why",
    "dismiss",
    "reject",
    "defense",
    "liability",
    "breach",
    "key legal",
    "main reasons",
    "basis for",
];

const PROCESS_PATTERNS: &[&str] = &[
    "circumstances",
    "under what",
    "how can",
    "when can",
    "process",
    "procedure",
    "steps",
    "mechanism",
    "conditions",
    "requirements",
];

/// Classify a query into a retrieval profile.
///
/// Pure and deterministic: lower-case the query, test the pattern sets in
/// fixed priority order (factual, analysis, process), fall through to
/// general. The first match wins.
pub fn classify(query: &str) -> RetrievalProfile {
    let lowered = query.to_lowercase();
    let matches = |patterns: &[&str]| patterns.iter().any(|p| lowered.contains(p));

    if matches(FACTUAL_PATTERNS) {
        RetrievalProfile {
            class: QueryClass::Factual,
            target_count: 8,
            description: "Factual extraction - focused retrieval",
        }
    } else if matches(ANALYSIS_PATTERNS) {
        RetrievalProfile {
            class: QueryClass::Analysis,
            target_count: 22,
            description: "Legal analysis - comprehensive retrieval",
        }
    } else if matches(PROCESS_PATTERNS) {
        RetrievalProfile {
            class: QueryClass::Process,
            target_count: 15,
            description: "Process/mechanism - moderate retrieval",
        }
    } else {
        RetrievalProfile {
            class: QueryClass::General,
            target_count: 18,
            description: "General query - balanced retrieval",
        }
    }
}
