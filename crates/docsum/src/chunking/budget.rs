//! Token budgets and chunk plans derived from model context windows

use serde::{Deserialize, Serialize};

use crate::config::{ChunkPolicy, ModelTable};
use crate::error::{Error, Result};

/// Fraction of a chunk carried over as overlap with its predecessor
const OVERLAP_RATIO: f64 = 0.1;

/// Usable token count for a context window under a policy
fn usable_tokens(context_window: u32, policy: &ChunkPolicy) -> i64 {
    let usable = (policy.usable_ratio * f64::from(context_window)).floor() as i64;
    usable - policy.prompt_reservation
}

/// Compute the token budget for a model selection.
///
/// `None` means no model has been selected yet and yields the policy's
/// default budget. A known model yields
/// `floor(usable_ratio * context_window) - prompt_reservation`. The result
/// may be negative for models whose window is small relative to the prompt
/// reservation; chunk planning rejects non-positive budgets.
pub fn token_budget(model: Option<&str>, table: &ModelTable, policy: &ChunkPolicy) -> Result<i64> {
    let Some(name) = model else {
        return Ok(policy.default_budget);
    };

    let context_window = table
        .context_window(name)
        .ok_or_else(|| Error::UnsupportedModel(name.to_string()))?;

    Ok(usable_tokens(context_window, policy))
}

/// Token budget for a known context window, bypassing the table lookup
pub fn budget_for_window(context_window: u32, policy: &ChunkPolicy) -> i64 {
    usable_tokens(context_window, policy)
}

/// Character-based chunk sizing derived from a token budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkPlan {
    /// Maximum chunk length in characters
    pub chunk_size: usize,
    /// Characters shared between consecutive chunks
    pub chunk_overlap: usize,
}

impl ChunkPlan {
    /// Derive a plan from a token budget.
    ///
    /// Fails when the budget converts to a non-positive chunk size.
    pub fn from_budget(budget: i64, policy: &ChunkPolicy) -> Result<Self> {
        let chunk_size = budget.saturating_mul(policy.chars_per_token as i64);
        if chunk_size <= 0 {
            return Err(Error::InvalidChunkPlan(chunk_size));
        }

        let chunk_size = chunk_size as usize;
        let chunk_overlap = (chunk_size as f64 * OVERLAP_RATIO).round() as usize;

        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    /// Derive a plan for a model selection in one step
    pub fn for_model(model: Option<&str>, table: &ModelTable, policy: &ChunkPolicy) -> Result<Self> {
        Self::from_budget(token_budget(model, table, policy)?, policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> (ModelTable, ChunkPolicy) {
        (ModelTable::default(), ChunkPolicy::default())
    }

    #[test]
    fn budget_matches_closed_form_for_all_shipped_models() {
        let (table, policy) = defaults();

        // floor(0.7 * window) - 2048
        assert_eq!(token_budget(Some("gpt-3.5-turbo"), &table, &policy).unwrap(), 819);
        assert_eq!(
            token_budget(Some("gpt-3.5-turbo-16k"), &table, &policy).unwrap(),
            9420
        );
        assert_eq!(token_budget(Some("gpt-4"), &table, &policy).unwrap(), 3686);
        assert_eq!(token_budget(Some("gpt-4-32k"), &table, &policy).unwrap(), 20889);
    }

    #[test]
    fn no_model_selected_yields_default_budget() {
        let (table, policy) = defaults();
        assert_eq!(token_budget(None, &table, &policy).unwrap(), 512);
    }

    #[test]
    fn unknown_model_is_rejected() {
        let (table, policy) = defaults();
        let err = token_budget(Some("gpt-99-1m"), &table, &policy).unwrap_err();
        match err {
            Error::UnsupportedModel(name) => assert_eq!(name, "gpt-99-1m"),
            other => panic!("expected UnsupportedModel, got {:?}", other),
        }
    }

    #[test]
    fn budget_may_be_negative_for_small_windows() {
        let (mut table, policy) = defaults();
        table.insert("tiny-1k", 1024);

        // floor(0.7 * 1024) - 2048 = 716 - 2048
        assert_eq!(token_budget(Some("tiny-1k"), &table, &policy).unwrap(), -1332);
    }

    #[test]
    fn plan_applies_char_multiplier_and_overlap_ratio() {
        let (table, policy) = defaults();

        let plan = ChunkPlan::for_model(Some("gpt-3.5-turbo"), &table, &policy).unwrap();
        assert_eq!(plan.chunk_size, 819 * 4);
        assert_eq!(plan.chunk_overlap, 328); // round(0.1 * 3276)

        let plan = ChunkPlan::for_model(Some("gpt-4"), &table, &policy).unwrap();
        assert_eq!(plan.chunk_size, 3686 * 4);
        assert_eq!(plan.chunk_overlap, 1474); // round(0.1 * 14744)
    }

    #[test]
    fn default_budget_plan() {
        let (table, policy) = defaults();
        let plan = ChunkPlan::for_model(None, &table, &policy).unwrap();
        assert_eq!(plan.chunk_size, 2048);
        assert_eq!(plan.chunk_overlap, 205);
    }

    #[test]
    fn non_positive_chunk_size_is_rejected() {
        let policy = ChunkPolicy::default();

        match ChunkPlan::from_budget(-1332, &policy).unwrap_err() {
            Error::InvalidChunkPlan(size) => assert_eq!(size, -5328),
            other => panic!("expected InvalidChunkPlan, got {:?}", other),
        }

        assert!(ChunkPlan::from_budget(0, &policy).is_err());
    }

    #[test]
    fn custom_policy_flows_through() {
        let table = ModelTable::default();
        let policy = ChunkPolicy {
            usable_ratio: 0.5,
            prompt_reservation: 1000,
            chars_per_token: 3,
            default_budget: 256,
        };

        // floor(0.5 * 4096) - 1000 = 1048
        assert_eq!(token_budget(Some("gpt-3.5-turbo"), &table, &policy).unwrap(), 1048);
        assert_eq!(token_budget(None, &table, &policy).unwrap(), 256);

        let plan = ChunkPlan::from_budget(1048, &policy).unwrap();
        assert_eq!(plan.chunk_size, 3144);
    }
}
