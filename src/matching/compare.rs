//! Comparison operators (`eq, ne, gt, gte, lt, lte`).
//!
//! Numeric comparison is attempted first when both sides coerce to `f64`;
//! otherwise the comparison falls back to the values' canonical string
//! form. `null` compares equal only to `null` under `eq`.

use crate::model::{Op, PayloadValue};
use std::cmp::Ordering;

pub fn compare(op: Op, left: &PayloadValue, right: &PayloadValue) -> bool {
    if left.is_null() || right.is_null() {
        let both_null = left.is_null() && right.is_null();
        return match op {
            Op::Eq => both_null,
            Op::Ne => !both_null,
            // null has no ordering relative to anything, including itself.
            Op::Gt | Op::Gte | Op::Lt | Op::Lte => false,
        };
    }

    if let (Some(l), Some(r)) = (left.as_f64(), right.as_f64()) {
        return match op {
            Op::Eq => l == r,
            Op::Ne => l != r,
            Op::Gt => l > r,
            Op::Gte => l >= r,
            Op::Lt => l < r,
            Op::Lte => l <= r,
        };
    }

    let (l, r) = (left.to_string(), right.to_string());
    match op {
        Op::Eq => l == r,
        Op::Ne => l != r,
        Op::Gt => l.cmp(&r) == Ordering::Greater,
        Op::Gte => matches!(l.cmp(&r), Ordering::Greater | Ordering::Equal),
        Op::Lt => l.cmp(&r) == Ordering::Less,
        Op::Lte => matches!(l.cmp(&r), Ordering::Less | Ordering::Equal),
    }
}

/// Equality, specifically — the operator `where` clauses use.
pub fn equals(left: &PayloadValue, right: &PayloadValue) -> bool {
    compare(Op::Eq, left, right)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_and_float_are_numerically_equal() {
        assert!(equals(&PayloadValue::Number(42.0), &PayloadValue::Number(42.0)));
    }

    #[test]
    fn null_equals_only_null() {
        assert!(equals(&PayloadValue::Null, &PayloadValue::Null));
        assert!(!equals(&PayloadValue::Null, &PayloadValue::Number(0.0)));
        assert!(compare(Op::Ne, &PayloadValue::Null, &PayloadValue::Number(0.0)));
    }

    #[test]
    fn falls_back_to_string_comparison_for_mixed_types() {
        assert!(compare(
            Op::Eq,
            &PayloadValue::from_str("7"),
            &PayloadValue::from_str("7")
        ));
        assert!(!compare(
            Op::Eq,
            &PayloadValue::from_str("abc"),
            &PayloadValue::Number(1.0)
        ));
    }

    #[test]
    fn numeric_gt_gte_lt_lte() {
        let three = PayloadValue::Number(3.0);
        let two = PayloadValue::Number(2.0);
        assert!(compare(Op::Gt, &three, &two));
        assert!(compare(Op::Gte, &three, &three));
        assert!(compare(Op::Lt, &two, &three));
        assert!(compare(Op::Lte, &two, &two));
    }
}
