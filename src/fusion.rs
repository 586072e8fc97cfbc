//! Retriever fan-out/fan-in.
//!
//! Derives per-strategy budgets from the query's retrieval profile, runs
//! the three index searches concurrently, and fuses their ranked lists into
//! one deduplicated evidence ordering under weighted voting. Output order is
//! load-bearing: it drives citation order and any downstream truncation.

use std::collections::HashMap;
use std::time::Duration;

use crate::classify::RetrievalProfile;
use crate::errors::EngineError;
use crate::index::{DenseIndex, DiversityIndex, KeywordIndex};

/// Strategy weights when all three result lists are present.
const WEIGHTS_FULL: (f64, f64, f64) = (0.5, 0.3, 0.2);
/// Renormalized weights when the keyword index is unavailable.
const WEIGHTS_NO_KEYWORD: (f64, f64) = (0.6, 0.4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategyBudgets {
    pub similarity: usize,
    pub diversity: usize,
    pub keyword: usize,
}

/// Budgets from a target evidence count `k`: similarity gets the full k,
/// diversity and keyword get `max(round(0.8k), 5)`.
pub fn derive_budgets(target_count: usize) -> StrategyBudgets {
    let scaled = ((target_count as f64) * 0.8).round() as usize;
    StrategyBudgets {
        similarity: target_count,
        diversity: scaled.max(5),
        keyword: scaled.max(5),
    }
}

/// Fan out to the three indexes concurrently and fuse the results.
///
/// The searches are independent and read-only over the generation, so they
/// run unsynchronized; the await point is the joint fan-in barrier,
/// optionally bounded by `timeout`. A missing keyword index degrades to the
/// two semantic strategies instead of failing.
pub async fn retrieve(
    dense: &DenseIndex,
    diversity: &DiversityIndex,
    keyword: Option<&KeywordIndex>,
    query: &str,
    profile: &RetrievalProfile,
    timeout: Option<Duration>,
) -> Result<Vec<usize>, EngineError> {
    let budgets = derive_budgets(profile.target_count);
    tracing::info!(
        similarity_k = budgets.similarity,
        diversity_k = budgets.diversity,
        keyword_k = budgets.keyword,
        keyword_available = keyword.is_some(),
        "retrieval fan-out"
    );

    let fan_out = async {
        tokio::join!(
            dense.search(query, budgets.similarity),
            diversity.search(query, budgets.diversity),
            async { keyword.map(|index| index.search(query, budgets.keyword)) },
        )
    };

    let (sim, div, kw) = match timeout {
        Some(limit) => tokio::time::timeout(limit, fan_out)
            .await
            .map_err(|_| EngineError::RetrievalTimeout)?,
        None => fan_out.await,
    };
    let sim = sim?;
    let div = div?;

    let fused = fuse(&sim, &div, kw.as_deref());
    tracing::info!(fused_count = fused.len(), "retrieval fan-in complete");
    Ok(fused)
}

/// Weighted-voting fusion of up to three ranked lists.
///
/// A chunk at rank r in a list of length n contributes
/// `weight × (1 − r/n)`; the top result earns the full strategy weight.
/// Chunks are deduplicated by id, ordered by accumulated score, ties broken
/// by first-seen order scanning similarity, then diversity, then keyword.
pub fn fuse(
    similarity: &[(usize, f32)],
    diversity: &[(usize, f32)],
    keyword: Option<&[(usize, f32)]>,
) -> Vec<usize> {
    let mut scores: HashMap<usize, f64> = HashMap::new();
    let mut first_seen: HashMap<usize, usize> = HashMap::new();
    let mut seen_counter = 0usize;

    let mut accumulate = |list: &[(usize, f32)], weight: f64| {
        let len = list.len() as f64;
        for (rank, &(id, _)) in list.iter().enumerate() {
            let contribution = weight * (1.0 - rank as f64 / len);
            *scores.entry(id).or_insert(0.0) += contribution;
            first_seen.entry(id).or_insert_with(|| {
                let order = seen_counter;
                seen_counter += 1;
                order
            });
        }
    };

    match keyword {
        Some(kw) => {
            let (w_sim, w_div, w_kw) = WEIGHTS_FULL;
            accumulate(similarity, w_sim);
            accumulate(diversity, w_div);
            accumulate(kw, w_kw);
        }
        None => {
            let (w_sim, w_div) = WEIGHTS_NO_KEYWORD;
            accumulate(similarity, w_sim);
            accumulate(diversity, w_div);
        }
    }

    let mut fused: Vec<(usize, f64, usize)> = scores
        .into_iter()
        .map(|(id, score)| (id, score, first_seen[&id]))
        .collect();
    fused.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.2.cmp(&b.2))
    });
    fused.into_iter().map(|(id, _, _)| id).collect()
}
