
#![allow(dead_code)]

extern crate std;

use crate::types::{Sale, SaleStage};

/// INV-1: A stage never sells past its cap.
pub fn assert_stage_within_cap(stage: &SaleStage) {
    assert!(
        stage.sold >= 0 && stage.sold <= stage.cap,
        "INV-1 violated: stage sold {} outside [0, {}]",
        stage.sold,
        stage.cap
    );
}

/// INV-2: Sale totals never go negative.
pub fn assert_totals_non_negative(sale: &Sale) {
    assert!(
        sale.total_raised >= 0,
        "INV-2 violated: total_raised is negative ({})",
        sale.total_raised
    );
    assert!(
        sale.total_tokens_sold >= 0,
        "INV-2 violated: total_tokens_sold is negative ({})",
        sale.total_tokens_sold
    );
}

/// INV-3: The sale window is well-formed.
pub fn assert_window_well_formed(sale: &Sale) {
    assert!(
        sale.start_time < sale.end_time,
        "INV-3 violated: start_time {} >= end_time {}",
        sale.start_time,
        sale.end_time
    );
}

/// INV-4: The stage pointer stays within the stage ledger whenever stages
/// exist.
pub fn assert_stage_pointer_in_range(sale: &Sale) {
    if sale.stage_count > 0 {
        assert!(
            sale.current_stage < sale.stage_count,
            "INV-4 violated: current_stage {} >= stage_count {}",
            sale.current_stage,
            sale.stage_count
        );
    }
}

/// INV-5: Purchase conservation — after a purchase of `token_amount`, the
/// sale-wide total and the active stage's `sold` both grow by exactly that
/// amount.
pub fn assert_purchase_conservation(
    total_before: i128,
    total_after: i128,
    stage_sold_before: i128,
    stage_sold_after: i128,
    token_amount: i128,
) {
    assert_eq!(
        total_after,
        total_before + token_amount,
        "INV-5 violated: total_tokens_sold {} + {} != {}",
        total_before,
        token_amount,
        total_after
    );
    assert_eq!(
        stage_sold_after,
        stage_sold_before + token_amount,
        "INV-5 violated: stage sold {} + {} != {}",
        stage_sold_before,
        token_amount,
        stage_sold_after
    );
}

/// INV-6: Purchaser records are monotonically non-decreasing and bounded by
/// the per-address limit.
pub fn assert_purchaser_record(before: i128, after: i128, max_purchase: i128) {
    assert!(
        after >= before,
        "INV-6 violated: purchaser record decreased from {} to {}",
        before,
        after
    );
    assert!(
        after <= max_purchase,
        "INV-6 violated: purchaser record {} exceeds limit {}",
        after,
        max_purchase
    );
}

/// INV-7: The stage pointer never decreases across any operation sequence.
pub fn assert_stage_monotonic(before: u32, after: u32) {
    assert!(
        after >= before,
        "INV-7 violated: current_stage decreased from {} to {}",
        before,
        after
    );
}

/// INV-8: Finalization is terminal — once set it never reverts.
pub fn assert_finalized_terminal(before: bool, after: bool) {
    assert!(
        !(before && !after),
        "INV-8 violated: finalized flag reverted to false"
    );
}

/// Run all stateless sale invariants.
pub fn assert_all_sale_invariants(sale: &Sale) {
    assert_totals_non_negative(sale);
    assert_window_well_formed(sale);
    assert_stage_pointer_in_range(sale);
}
