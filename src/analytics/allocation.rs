// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Allocation, BudgetConfig, share_of};

/// Target amount per bucket.
///
/// Pinned amounts are returned as stored; recomputing them from the
/// percentages would drift figures the user set by hand.
pub fn resolve_targets(budget: &BudgetConfig) -> Allocation {
    if let Some(amounts) = budget.amounts {
        return amounts;
    }
    let p = &budget.percentages;
    Allocation {
        living: share_of(budget.salary, p.living),
        saving: share_of(budget.salary, p.saving),
        playing: share_of(budget.salary, p.playing),
        emergency: share_of(budget.salary, p.emergency_or_default()),
    }
}
