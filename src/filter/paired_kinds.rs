//! Operation kinds the backend records as two physical rows for one
//! user-facing operation: a transfer writes an out-row at the source location
//! and an in-row at the target, and a complex recipe/production writes a
//! material row and a product row. An Equals filter on an operation-kind
//! field has to match both sides or half of the operation disappears from
//! the report.
//!
//! The pairing below is an explicit table, not a rule; extending it needs
//! product-owner confirmation.

pub const TRANSFER_IN: i64 = 7;
pub const TRANSFER_OUT: i64 = 8;
pub const RECIPE_MATERIAL: i64 = 24;
pub const RECIPE_PRODUCT: i64 = 25;
pub const PRODUCTION_MATERIAL: i64 = 26;
pub const PRODUCTION_PRODUCT: i64 = 27;

pub static PAIRED_KINDS: [(i64, i64); 3] = [
    (TRANSFER_IN, TRANSFER_OUT),
    (RECIPE_MATERIAL, RECIPE_PRODUCT),
    (PRODUCTION_MATERIAL, PRODUCTION_PRODUCT),
];

/// The other half of a paired operation kind, if the code has one.
pub fn paired_kind(kind: i64) -> Option<i64> {
    PAIRED_KINDS.iter().find_map(|&(left, right)| {
        if kind == left {
            Some(right)
        } else if kind == right {
            Some(left)
        } else {
            None
        }
    })
}
