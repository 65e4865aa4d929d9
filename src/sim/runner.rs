//! Multi-attempt runner
//!
//! Attempts are independent given a knowledge snapshot, so they can run
//! sequentially (each attempt sees everything learned before it) or in
//! parallel batches (rayon; attempts in a batch share the snapshot taken
//! at batch start). Merging into the shared knowledge always happens on
//! the caller's thread, one outcome at a time.

use rayon::prelude::*;

use crate::core::config::config;
use crate::knowledge::memory::Knowledge;
use crate::sim::attempt::{Attempt, AttemptOutcome};

/// Fixed timestep used by the headless runner
pub const TICK_SECONDS: f32 = 0.1;

/// Drive one attempt to completion
pub fn run_attempt(seed: u64, knowledge: Knowledge) -> AttemptOutcome {
    let cfg = config();
    // Day cap plus generous slack; the loop exits via is_over long before
    let max_ticks =
        ((cfg.max_days as f32 * cfg.day_length_secs / TICK_SECONDS) * 1.5) as u64 + 1000;

    let mut attempt = Attempt::new(seed, knowledge);
    for _ in 0..max_ticks {
        attempt.tick(TICK_SECONDS);
        if attempt.is_over() {
            break;
        }
    }
    attempt.into_outcome()
}

/// Merge one finished attempt into the shared knowledge
pub fn absorb_outcome(knowledge: &mut Knowledge, outcome: &AttemptOutcome) {
    for (day, label, success) in &outcome.action_records {
        knowledge.record_action(*day, label, *success);
    }
    if let Some(ctx) = &outcome.death_context {
        knowledge.record_death(ctx.day, ctx.cause);
        knowledge.analyze_death(ctx);
    } else {
        knowledge.record_survival(outcome.days_survived);
    }

    tracing::info!(
        seed = outcome.seed,
        days = outcome.days_survived,
        cause = outcome.death_cause.map(|c| c.as_str()).unwrap_or("survived"),
        level = outcome.final_level,
        states = outcome.states_learned,
        "attempt finished"
    );
}

/// Run attempts one after another, each seeing all prior learning
pub fn run_attempts(count: u32, base_seed: u64, knowledge: &mut Knowledge) -> Vec<AttemptOutcome> {
    let mut outcomes = Vec::with_capacity(count as usize);
    for i in 0..count {
        let outcome = run_attempt(base_seed.wrapping_add(i as u64), knowledge.clone());
        absorb_outcome(knowledge, &outcome);
        outcomes.push(outcome);
    }
    outcomes
}

/// Run one batch of attempts in parallel
///
/// Every attempt in the batch starts from the same knowledge snapshot;
/// outcomes are merged afterwards in seed order under this single
/// writer, so the result is independent of scheduling.
pub fn run_attempts_parallel(
    count: u32,
    base_seed: u64,
    knowledge: &mut Knowledge,
) -> Vec<AttemptOutcome> {
    let snapshot = knowledge.clone();
    let mut outcomes: Vec<AttemptOutcome> = (0..count)
        .into_par_iter()
        .map(|i| run_attempt(base_seed.wrapping_add(i as u64), snapshot.clone()))
        .collect();

    outcomes.sort_by_key(|o| o.seed);
    for outcome in &outcomes {
        absorb_outcome(knowledge, outcome);
    }
    outcomes
}
