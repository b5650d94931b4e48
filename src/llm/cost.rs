//! Token counting and price estimation.
//!
//! Token counts use the chars/4 heuristic — close enough for budgeting, and
//! it keeps cost preview fully offline. Prices are USD per 1M tokens for the
//! models the tool ships defaults for; unknown models estimate as unpriced
//! rather than failing.

use serde::Serialize;

use crate::utils::estimate_tokens;

#[derive(Debug, Clone, Copy)]
pub struct LlmPrices {
    pub input_per_1m: f64,
    pub output_per_1m: f64,
}

pub fn embedding_price_per_1m(model: &str) -> Option<f64> {
    match model {
        "text-embedding-3-small" => Some(0.02),
        "text-embedding-3-large" => Some(0.13),
        _ => None,
    }
}

pub fn llm_prices_per_1m(model: &str) -> Option<LlmPrices> {
    match model {
        "gpt-4.1" => Some(LlmPrices { input_per_1m: 5.00, output_per_1m: 15.00 }),
        "gpt-4.1-mini" => Some(LlmPrices { input_per_1m: 0.15, output_per_1m: 0.60 }),
        _ => None,
    }
}

pub fn count_tokens<S: AsRef<str>>(texts: &[S]) -> usize {
    texts.iter().map(|t| estimate_tokens(t.as_ref())).sum()
}

/// Estimated token count and, when the model is priced, dollar cost for an
/// embedding request.
pub fn estimate_embedding_cost<S: AsRef<str>>(texts: &[S], model: &str) -> (usize, Option<f64>) {
    let tokens = count_tokens(texts);
    let cost = embedding_price_per_1m(model).map(|price| tokens as f64 / 1_000_000.0 * price);
    (tokens, cost)
}

#[derive(Debug, Clone, Serialize)]
pub struct LlmCost {
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub total_tokens: usize,
    pub estimated_cost: Option<f64>,
}

pub fn estimate_llm_cost(prompt: &str, expected_output_tokens: usize, model: &str) -> LlmCost {
    let input_tokens = estimate_tokens(prompt);
    let estimated_cost = llm_prices_per_1m(model).map(|prices| {
        input_tokens as f64 / 1_000_000.0 * prices.input_per_1m
            + expected_output_tokens as f64 / 1_000_000.0 * prices.output_per_1m
    });

    LlmCost {
        input_tokens,
        output_tokens: expected_output_tokens,
        total_tokens: input_tokens + expected_output_tokens,
        estimated_cost,
    }
}
