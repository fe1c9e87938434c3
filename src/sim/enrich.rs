//! Enrichment stage: assign strategy and outcome to raw case records.
//!
//! The contract is pass-through for records that already carry both fields
//! (CSV inputs usually do; API records never do). Randomness is injected:
//! every draw goes through the caller's `Rng`, so the pipeline can seed a
//! `StdRng` for reproducible runs and tests can assert exact draws.

use rand::Rng;

use crate::domain::{CaseRecord, RawCase, SimPolicy, Strategy, GENERIC_CATEGORY};

/// Enrich a whole batch, assigning sequential case ids.
///
/// The batch is expected to have passed the minimum-claim-value filter
/// already; enrichment on data that will be discarded is pointless.
pub fn enrich_batch<R: Rng>(raw: &[RawCase], policy: &SimPolicy, rng: &mut R) -> Vec<CaseRecord> {
    raw.iter()
        .enumerate()
        .map(|(i, case)| enrich_case(case, format!("P-{:03}", i + 1), policy, rng))
        .collect()
}

/// Enrich a single record.
pub fn enrich_case<R: Rng>(
    raw: &RawCase,
    id: String,
    policy: &SimPolicy,
    rng: &mut R,
) -> CaseRecord {
    let category = match raw.category.as_deref().map(str::trim) {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => GENERIC_CATEGORY.to_string(),
    };

    // Pass-through: keep pre-set fields, only draw what is missing.
    let strategy = match raw.strategy {
        Some(s) => s,
        None => classify_strategy(&category, policy, rng),
    };
    let outcome = match raw.outcome {
        Some(o) if o <= 1 => o,
        _ => draw_outcome(strategy, raw.claim_value, policy, rng),
    };

    let duration_days = match raw.duration_days {
        Some(d) if d >= 0 => d,
        _ => rng.gen_range(policy.duration_fill_min..policy.duration_fill_max),
    };

    let cost = raw.claim_value * policy.cost_rates.get(strategy);
    let impact = if outcome == 1 {
        raw.claim_value - cost
    } else {
        -cost
    };

    CaseRecord {
        id,
        category,
        claim_value: raw.claim_value,
        duration_days,
        strategy,
        outcome,
        cost,
        impact,
        court: raw.court.clone(),
        subject: raw.subject.clone(),
        filed_date: raw.filed_date,
    }
}

/// Pick a strategy for a category: first matching rule wins, otherwise a
/// weighted draw over all three strategies.
pub fn classify_strategy<R: Rng>(category: &str, policy: &SimPolicy, rng: &mut R) -> Strategy {
    let lowered = category.to_lowercase();
    for rule in &policy.category_rules {
        if lowered.contains(&rule.pattern) {
            return rule.strategy;
        }
    }
    weighted_strategy(policy, rng)
}

/// Draw the binary outcome for a strategy.
///
/// The optional appeal gate forces failure when the claim value does not
/// clear the configured threshold.
pub fn draw_outcome<R: Rng>(
    strategy: Strategy,
    claim_value: f64,
    policy: &SimPolicy,
    rng: &mut R,
) -> u8 {
    if strategy == Strategy::Appeal {
        if let Some(gate) = policy.appeal_value_gate {
            if claim_value <= gate {
                return 0;
            }
        }
    }

    let p = policy.success_probs.get(strategy).clamp(0.0, 1.0);
    u8::from(rng.gen_bool(p))
}

// Cumulative roll over the three weights; a degenerate table (zero or
// non-finite total) skips the roll and returns Negotiate, the default-config
// modal strategy.
fn weighted_strategy<R: Rng>(policy: &SimPolicy, rng: &mut R) -> Strategy {
    let w = &policy.fallback_weights;
    let total = w.appeal + w.negotiate + w.withdraw;
    if !(total.is_finite() && total > 0.0) {
        return Strategy::Negotiate;
    }

    let roll: f64 = rng.r#gen::<f64>() * total;
    if roll < w.appeal {
        Strategy::Appeal
    } else if roll < w.appeal + w.negotiate {
        Strategy::Negotiate
    } else {
        Strategy::Withdraw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn raw(category: &str, claim: f64) -> RawCase {
        RawCase {
            category: Some(category.to_string()),
            claim_value: claim,
            ..RawCase::default()
        }
    }

    #[test]
    fn rules_classify_known_categories() {
        let policy = SimPolicy::default();
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(
            classify_strategy("Recurso Especial", &policy, &mut rng),
            Strategy::Appeal
        );
        assert_eq!(
            classify_strategy("AGRAVO em Recurso Especial", &policy, &mut rng),
            Strategy::Appeal
        );
        assert_eq!(
            classify_strategy("Embargos de Divergência", &policy, &mut rng),
            Strategy::Negotiate
        );
        assert_eq!(
            classify_strategy("Conflito de Competência", &policy, &mut rng),
            Strategy::Negotiate
        );
    }

    #[test]
    fn rule_order_decides_overlapping_patterns() {
        // Two rules share the "recurso" pattern; the first one must win.
        let mut policy = SimPolicy::default();
        policy.category_rules.insert(
            0,
            crate::domain::CategoryRule {
                pattern: "recurso".into(),
                strategy: Strategy::Withdraw,
            },
        );
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            classify_strategy("Recurso Especial", &policy, &mut rng),
            Strategy::Withdraw
        );
    }

    #[test]
    fn unmatched_category_draws_from_fallback_set() {
        let policy = SimPolicy::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let s = classify_strategy("Ação Ordinária", &policy, &mut rng);
            assert!(Strategy::ALL.contains(&s));
        }
    }

    #[test]
    fn degenerate_weight_table_defaults_to_negotiate() {
        let mut policy = SimPolicy::default();
        policy.fallback_weights = crate::domain::StrategyRates {
            appeal: 0.0,
            negotiate: 0.0,
            withdraw: 0.0,
        };
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..10 {
            // No rule matches, and the weight table cannot be rolled.
            assert_eq!(
                classify_strategy("Ação Ordinária", &policy, &mut rng),
                Strategy::Negotiate
            );
        }
    }

    #[test]
    fn empty_category_maps_to_generic_label() {
        let policy = SimPolicy::default();
        let mut rng = StdRng::seed_from_u64(3);

        let case = enrich_case(&RawCase { claim_value: 5_000.0, ..RawCase::default() },
            "P-001".into(), &policy, &mut rng);
        assert_eq!(case.category, GENERIC_CATEGORY);

        let blank = enrich_case(&raw("   ", 5_000.0), "P-002".into(), &policy, &mut rng);
        assert_eq!(blank.category, GENERIC_CATEGORY);
    }

    #[test]
    fn enrichment_yields_valid_strategy_and_binary_outcome() {
        let policy = SimPolicy::default();
        let mut rng = StdRng::seed_from_u64(11);
        let batch: Vec<RawCase> = (0..100)
            .map(|i| raw(if i % 2 == 0 { "Recurso" } else { "Inventário" }, 10_000.0))
            .collect();

        for case in enrich_batch(&batch, &policy, &mut rng) {
            assert!(Strategy::ALL.contains(&case.strategy));
            assert!(case.outcome <= 1);
            assert!(case.cost >= 0.0);
            assert!(case.duration_days >= policy.duration_fill_min);
            assert!(case.duration_days < policy.duration_fill_max);
        }
    }

    #[test]
    fn impact_formula_is_exact() {
        let policy = SimPolicy::default();
        let mut rng = StdRng::seed_from_u64(5);

        // Pre-set (Appeal, success) at rate 0.05: 500000 - 25000 = 475000.
        let appeal = RawCase {
            strategy: Some(Strategy::Appeal),
            outcome: Some(1),
            duration_days: Some(1200),
            ..raw("Recurso Especial", 500_000.0)
        };
        let case = enrich_case(&appeal, "P-001".into(), &policy, &mut rng);
        assert_eq!(case.impact, 475_000.0);
        assert_eq!(case.cost, 25_000.0);

        // Pre-set (Negotiate, success) at rate 0.02: 80000 - 1600 = 78400.
        let negotiate = RawCase {
            strategy: Some(Strategy::Negotiate),
            outcome: Some(1),
            duration_days: Some(350),
            ..raw("Embargos de Divergência", 80_000.0)
        };
        let case = enrich_case(&negotiate, "P-002".into(), &policy, &mut rng);
        assert_eq!(case.impact, 78_400.0);

        // Failure loses exactly the cost.
        let failed = RawCase {
            strategy: Some(Strategy::Withdraw),
            outcome: Some(0),
            duration_days: Some(100),
            ..raw("Recurso", 10_000.0)
        };
        let case = enrich_case(&failed, "P-003".into(), &policy, &mut rng);
        assert_eq!(case.impact, -100.0);
    }

    #[test]
    fn preset_fields_pass_through_untouched() {
        let policy = SimPolicy::default();
        let mut rng = StdRng::seed_from_u64(9);

        // The category rule says Appeal, but the pre-set strategy wins.
        let preset = RawCase {
            strategy: Some(Strategy::Withdraw),
            outcome: Some(0),
            duration_days: Some(42),
            ..raw("Recurso Especial", 20_000.0)
        };
        let case = enrich_case(&preset, "P-001".into(), &policy, &mut rng);
        assert_eq!(case.strategy, Strategy::Withdraw);
        assert_eq!(case.outcome, 0);
        assert_eq!(case.duration_days, 42);
    }

    #[test]
    fn appeal_gate_forces_failure_below_threshold() {
        let mut policy = SimPolicy::default();
        policy.appeal_value_gate = Some(100_000.0);
        policy.success_probs.appeal = 1.0;
        let mut rng = StdRng::seed_from_u64(2);

        assert_eq!(draw_outcome(Strategy::Appeal, 50_000.0, &policy, &mut rng), 0);
        assert_eq!(draw_outcome(Strategy::Appeal, 100_000.0, &policy, &mut rng), 0);
        assert_eq!(draw_outcome(Strategy::Appeal, 150_000.0, &policy, &mut rng), 1);
        // The gate never applies to other strategies.
        policy.success_probs.negotiate = 1.0;
        assert_eq!(draw_outcome(Strategy::Negotiate, 50_000.0, &policy, &mut rng), 1);
    }

    #[test]
    fn same_seed_same_draws() {
        let policy = SimPolicy::default();
        let batch: Vec<RawCase> = (0..20).map(|_| raw("Inventário", 10_000.0)).collect();

        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);
        let a = enrich_batch(&batch, &policy, &mut rng_a);
        let b = enrich_batch(&batch, &policy, &mut rng_b);

        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.strategy, y.strategy);
            assert_eq!(x.outcome, y.outcome);
            assert_eq!(x.duration_days, y.duration_days);
        }
    }
}
