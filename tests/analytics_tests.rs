// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, TimeZone, Utc};
use keuangan::analytics::{
    self, HealthStatus, Issue, Severity, StatusLevel, Suggestion, month_label, monthly_history,
    resolve_targets, score, suggestions, summarize, tips, trend,
};
use keuangan::analytics::advice::{MAX_TIPS, TIP_LIFESTYLE_OVER_SAVING, TIP_REPLENISH_EMERGENCY};
use keuangan::models::{Allocation, BudgetConfig, Category, Percentages, Summary, Transaction, TxType};
use rust_decimal::Decimal;

fn tx(id: i64, kind: TxType, category: Category, amount: i64, date: &str) -> Transaction {
    Transaction {
        id,
        kind,
        category,
        amount,
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        description: None,
        created_at: Utc.timestamp_millis_opt(id).unwrap(),
    }
}

#[test]
fn default_budget_targets() {
    let targets = resolve_targets(&BudgetConfig::default());
    assert_eq!(
        targets,
        Allocation {
            living: 3_000_000,
            saving: 1_800_000,
            playing: 600_000,
            emergency: 600_000,
        }
    );
}

#[test]
fn missing_emergency_percentage_defaults_to_ten() {
    let budget = BudgetConfig {
        salary: 5_000_000,
        percentages: Percentages {
            living: 60,
            saving: 20,
            playing: 10,
            emergency: None,
        },
        amounts: None,
    };
    assert_eq!(resolve_targets(&budget).emergency, 500_000);
}

#[test]
fn pinned_amounts_win_over_percentages() {
    let budget = BudgetConfig {
        salary: 6_000_000,
        percentages: Percentages::default(),
        amounts: Some(Allocation {
            living: 2_500_000,
            saving: 2_000_000,
            playing: 750_000,
            emergency: 750_000,
        }),
    };
    let targets = resolve_targets(&budget);
    assert_eq!(targets.living, 2_500_000);
    assert_eq!(targets.playing, 750_000);
}

#[test]
fn percentage_targets_round_half_away_from_zero() {
    let budget = BudgetConfig {
        salary: 1_000_005,
        percentages: Percentages {
            living: 50,
            saving: 30,
            playing: 10,
            emergency: Some(10),
        },
        amounts: None,
    };
    // 500002.5 -> 500003
    assert_eq!(resolve_targets(&budget).living, 500_003);
}

#[test]
fn summary_buckets_and_saving_income() {
    let txs = vec![
        tx(1, TxType::Income, Category::Salary, 6_000_000, "2025-03-01"),
        tx(2, TxType::Income, Category::Saving, 1_000_000, "2025-03-02"),
        tx(3, TxType::Expense, Category::Living, 2_000_000, "2025-03-03"),
        tx(4, TxType::Expense, Category::Emergency, 100_000, "2025-03-04"),
        tx(5, TxType::Expense, Category::Playing, 50_000, "2025-02-28"),
    ];
    let s = summarize(&txs, "2025-03");
    assert_eq!(s.total_income, 7_000_000);
    assert_eq!(s.saving_income, 1_000_000);
    assert_eq!(s.total_expense, 2_100_000);
    assert_eq!(s.living_expense, 2_000_000);
    assert_eq!(s.emergency_expense, 100_000);
    assert_eq!(s.playing_expense, 0);
    assert_eq!(s.balance(), 4_900_000);
}

#[test]
fn summary_ignores_order_and_is_repeatable() {
    let mut txs = vec![
        tx(1, TxType::Income, Category::Salary, 6_000_000, "2025-03-01"),
        tx(2, TxType::Expense, Category::Living, 2_000_000, "2025-03-03"),
        tx(3, TxType::Expense, Category::Playing, 300_000, "2025-03-09"),
    ];
    let first = summarize(&txs, "2025-03");
    txs.reverse();
    assert_eq!(summarize(&txs, "2025-03"), first);
    assert_eq!(summarize(&txs, "2025-03"), first);
}

#[test]
fn living_overspend_without_saving_scores_good() {
    let txs = vec![
        tx(1, TxType::Income, Category::Salary, 6_000_000, "2025-03-01"),
        tx(2, TxType::Expense, Category::Living, 3_500_000, "2025-03-05"),
    ];
    let budget = BudgetConfig::default();
    let s = summarize(&txs, "2025-03");
    let h = score(&s, &budget, &resolve_targets(&budget));
    assert_eq!(h.issues, vec![Issue::LivingOver, Issue::NoSaving]);
    // expense stays under 80% of income, so the +5 bonus applies
    assert_eq!(h.score, 70);
    assert_eq!(h.status, HealthStatus::Good);
}

#[test]
fn empty_month_falls_back_to_salary() {
    let budget = BudgetConfig::default();
    let s = summarize(&[], "2025-03");
    assert_eq!(s, Summary::default());
    let h = score(&s, &budget, &resolve_targets(&budget));
    assert_eq!(h.score, 85);
    assert_eq!(h.status, HealthStatus::Excellent);
    assert_eq!(h.issues, vec![Issue::NoSaving]);
}

#[test]
fn score_is_clamped_at_one_hundred() {
    let txs = vec![tx(1, TxType::Income, Category::Saving, 2_000_000, "2025-03-01")];
    let budget = BudgetConfig::default();
    let s = summarize(&txs, "2025-03");
    let h = score(&s, &budget, &resolve_targets(&budget));
    assert!(h.issues.is_empty());
    assert_eq!(h.score, 100);
}

#[test]
fn deductions_stack() {
    let txs = vec![
        tx(1, TxType::Income, Category::Salary, 1_000_000, "2025-03-01"),
        tx(2, TxType::Expense, Category::Living, 4_000_000, "2025-03-02"),
        tx(3, TxType::Expense, Category::Playing, 1_000_000, "2025-03-03"),
        tx(4, TxType::Expense, Category::Emergency, 500_000, "2025-03-04"),
    ];
    let budget = BudgetConfig::default();
    let s = summarize(&txs, "2025-03");
    let h = score(&s, &budget, &resolve_targets(&budget));
    // 100 - 30 - 15 - 10 - 5 - 20
    assert_eq!(h.score, 20);
    assert_eq!(h.status, HealthStatus::NeedsImprovement);
    assert_eq!(h.issues.len(), 5);
}

#[test]
fn low_saving_is_deducted_below_half_target() {
    let txs = vec![
        tx(1, TxType::Income, Category::Salary, 6_000_000, "2025-03-01"),
        tx(2, TxType::Income, Category::Saving, 800_000, "2025-03-02"),
    ];
    let budget = BudgetConfig::default();
    let s = summarize(&txs, "2025-03");
    let h = score(&s, &budget, &resolve_targets(&budget));
    assert_eq!(h.issues, vec![Issue::LowSaving]);
    assert_eq!(h.score, 95);
}

#[test]
fn status_bands() {
    assert_eq!(HealthStatus::from_score(80), HealthStatus::Excellent);
    assert_eq!(HealthStatus::from_score(79), HealthStatus::Good);
    assert_eq!(HealthStatus::from_score(60), HealthStatus::Good);
    assert_eq!(HealthStatus::from_score(59), HealthStatus::NeedsAttention);
    assert_eq!(HealthStatus::from_score(40), HealthStatus::NeedsAttention);
    assert_eq!(HealthStatus::from_score(39), HealthStatus::NeedsImprovement);
}

#[test]
fn report_ratios_and_category_levels() {
    let txs = vec![
        tx(1, TxType::Income, Category::Salary, 6_000_000, "2025-03-01"),
        tx(2, TxType::Income, Category::Saving, 500_000, "2025-03-02"),
        tx(3, TxType::Expense, Category::Playing, 900_000, "2025-03-04"),
    ];
    let r = analytics::analyze(&txs, &BudgetConfig::default(), "2025-03");
    assert_eq!(r.ratios.budget_remaining, 5_600_000);
    assert_eq!(r.ratios.expense_ratio, Decimal::new(138, 1));
    let playing = r
        .categories
        .iter()
        .find(|c| c.category == Category::Playing)
        .unwrap();
    assert_eq!(playing.level, StatusLevel::Danger);
    assert_eq!(r.tips.len(), MAX_TIPS);
    assert_eq!(r.tips[0], TIP_LIFESTYLE_OVER_SAVING);
}

#[test]
fn tips_put_emergency_first_and_cap_length() {
    let s = Summary {
        playing_expense: 200_000,
        emergency_expense: 100_000,
        total_expense: 300_000,
        ..Summary::default()
    };
    let t = tips(&s);
    assert_eq!(t.len(), MAX_TIPS);
    assert_eq!(t[0], TIP_REPLENISH_EMERGENCY);
    assert_eq!(t[1], TIP_LIFESTYLE_OVER_SAVING);
}

#[test]
fn healthy_month_gets_single_positive_suggestion() {
    let txs = vec![
        tx(1, TxType::Income, Category::Salary, 6_000_000, "2025-03-01"),
        tx(2, TxType::Income, Category::Saving, 1_800_000, "2025-03-02"),
        tx(3, TxType::Expense, Category::Living, 2_000_000, "2025-03-03"),
    ];
    let r = analytics::analyze(&txs, &BudgetConfig::default(), "2025-03");
    let titles: Vec<&str> = r.suggestions.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Savings Target Reached!"]);
}

#[test]
fn trend_fills_empty_months() {
    let txs = vec![
        tx(1, TxType::Income, Category::Salary, 5_000_000, "2024-12-01"),
        tx(2, TxType::Expense, Category::Living, 2_000_000, "2024-12-10"),
        tx(3, TxType::Income, Category::Salary, 5_000_000, "2025-02-01"),
    ];
    let rows = trend(&txs, "2025-02", 3).unwrap();
    let months: Vec<&str> = rows.iter().map(|r| r.month.as_str()).collect();
    assert_eq!(months, vec!["2024-12", "2025-01", "2025-02"]);
    assert_eq!(rows[1].balance, 0);
    assert_eq!(rows[2].accumulated, 8_000_000);
}

#[test]
fn history_skips_empty_months() {
    let txs = vec![
        tx(1, TxType::Income, Category::Salary, 5_000_000, "2025-01-01"),
        tx(2, TxType::Expense, Category::Living, 6_000_000, "2025-03-10"),
    ];
    let rows = monthly_history(&txs);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].balance, -6_000_000);
    assert_eq!(rows[1].accumulated, -1_000_000);
}

#[test]
fn month_labels() {
    assert_eq!(month_label("2025-03"), "Mar 2025");
    assert_eq!(month_label("garbage"), "garbage");
}

fn advise(summary: &Summary, budget: &BudgetConfig) -> Vec<Suggestion> {
    suggestions(summary, budget, &resolve_targets(budget))
}

fn find<'a>(list: &'a [Suggestion], title: &str) -> &'a Suggestion {
    list.iter()
        .find(|s| s.title == title)
        .unwrap_or_else(|| panic!("missing suggestion '{}'", title))
}

#[test]
fn deficit_suggestion_comes_first_with_shortfall() {
    let s = Summary {
        total_income: 1_000_000,
        total_expense: 1_500_000,
        living_expense: 1_500_000,
        ..Summary::default()
    };
    let list = advise(&s, &BudgetConfig::default());
    assert_eq!(list[0].severity, Severity::Danger);
    assert_eq!(list[0].title, "Expenses Exceed Income!");
    assert!(list[0].message.contains("Rp 500.000"));
}

#[test]
fn living_over_reports_excess() {
    let s = Summary {
        total_income: 6_000_000,
        total_expense: 3_500_000,
        living_expense: 3_500_000,
        ..Summary::default()
    };
    let list = advise(&s, &BudgetConfig::default());
    let living = find(&list, "Living Budget Exceeded");
    assert_eq!(living.severity, Severity::Warning);
    assert!(living.message.contains("Rp 500.000"));
    assert!(list.iter().all(|x| x.title != "Saving on Living Expenses"));
}

#[test]
fn frugal_living_is_praised_only_when_something_was_spent() {
    let base = Summary {
        total_income: 7_800_000,
        saving_income: 1_800_000,
        ..Summary::default()
    };
    let titles: Vec<String> = advise(&base, &BudgetConfig::default())
        .into_iter()
        .map(|s| s.title)
        .collect();
    assert_eq!(titles, vec!["Savings Target Reached!".to_string()]);

    let frugal = Summary {
        total_expense: 1_000_000,
        living_expense: 1_000_000,
        ..base
    };
    let list = advise(&frugal, &BudgetConfig::default());
    let praise = find(&list, "Saving on Living Expenses");
    assert_eq!(praise.severity, Severity::Success);
    assert!(praise.message.contains("33%"));
}

#[test]
fn savings_below_target_reports_gap() {
    let s = Summary {
        total_income: 7_000_000,
        saving_income: 1_000_000,
        ..Summary::default()
    };
    let list = advise(&s, &BudgetConfig::default());
    let below = find(&list, "Savings Below Target");
    assert_eq!(below.severity, Severity::Warning);
    assert!(below.message.contains("Rp 1.000.000"));
    assert!(below.message.contains("Rp 800.000"));
}

#[test]
fn no_saving_names_the_target() {
    let list = advise(&Summary::default(), &BudgetConfig::default());
    let none = find(&list, "No Savings This Month");
    assert_eq!(none.severity, Severity::Danger);
    assert!(none.message.contains("Rp 1.800.000"));
}

#[test]
fn emergency_use_is_flagged() {
    let s = Summary {
        total_income: 7_800_000,
        saving_income: 1_800_000,
        total_expense: 250_000,
        emergency_expense: 250_000,
        ..Summary::default()
    };
    let list = advise(&s, &BudgetConfig::default());
    let emergency = find(&list, "Emergency Fund Used");
    assert_eq!(emergency.severity, Severity::Warning);
    assert!(emergency.message.contains("Rp 250.000"));
}

#[test]
fn healthy_fallback_when_nothing_applies() {
    // no income at all, but a pinned saving target that is not yet met
    let budget = BudgetConfig::pinned(
        0,
        Allocation {
            living: 0,
            saving: 1_000_000,
            playing: 0,
            emergency: 0,
        },
    );
    let list = advise(&Summary::default(), &budget);
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].severity, Severity::Success);
    assert_eq!(list[0].title, "Your Finances are Healthy!");
}

#[test]
fn huge_totals_do_not_overflow_scoring() {
    let txs = vec![
        tx(1, TxType::Expense, Category::Living, 2_000_000_000_000_000_000, "2025-03-01"),
        tx(2, TxType::Expense, Category::Living, 2_000_000_000_000_000_000, "2025-03-02"),
        tx(3, TxType::Expense, Category::Living, 2_000_000_000_000_000_000, "2025-03-03"),
        tx(4, TxType::Expense, Category::Living, 2_000_000_000_000_000_000, "2025-03-04"),
        tx(5, TxType::Expense, Category::Living, 2_000_000_000_000_000_000, "2025-03-05"),
    ];
    let s = summarize(&txs, "2025-03");
    assert_eq!(s.total_expense, i64::MAX);
    let r = analytics::analyze(&txs, &BudgetConfig::default(), "2025-03");
    assert!(r.health.score <= 100);
    assert!(r.health.issues.contains(&Issue::Deficit));
    assert!(!trend(&txs, "2025-03", 1).unwrap().is_empty());
}
