#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use pyxc_ir::{Expr, ExprKind, StringInterner};

use super::parse_str;
use crate::OperatorTable;

const OPERATORS: [&str; 12] = [
    "+", "-", "*", "/", "%", "<", "==", "and", "or", "|", "&", "^",
];

/// Walk a folded tree, checking that every binary node is left-associated
/// by precedence, and collect the leaves in order.
fn check_fold(expr: &Expr, table: &OperatorTable, interner: &StringInterner, leaves: &mut Vec<String>) {
    match &expr.kind {
        ExprKind::Binary { op, lhs, rhs, .. } => {
            let own = table.binary_precedence(*op).unwrap();
            if let ExprKind::Binary { op: left, .. } = &lhs.kind {
                assert!(table.binary_precedence(*left).unwrap() >= own);
            }
            if let ExprKind::Binary { op: right, .. } = &rhs.kind {
                assert!(table.binary_precedence(*right).unwrap() > own);
            }
            check_fold(lhs, table, interner, leaves);
            check_fold(rhs, table, interner, leaves);
        }
        ExprKind::Var(name) => leaves.push(interner.lookup(*name).to_string()),
        other => panic!("unexpected node {other:?}"),
    }
}

proptest! {
    #[test]
    fn folding_respects_precedence_and_keeps_operand_order(
        ops in prop::collection::vec(0..OPERATORS.len(), 1..16)
    ) {
        let mut source = String::from("v0");
        for (i, op) in ops.iter().enumerate() {
            source.push_str(&format!(" {} v{}", OPERATORS[*op], i + 1));
        }
        source.push('\n');

        let (output, interner) = parse_str(&source);
        prop_assert!(!output.has_errors());
        prop_assert_eq!(output.unit.top_level.len(), 1);

        let mut leaves = Vec::new();
        check_fold(
            &output.unit.top_level[0].expr,
            &OperatorTable::with_builtins(),
            &interner,
            &mut leaves,
        );
        let expected: Vec<String> = (0..=ops.len()).map(|i| format!("v{i}")).collect();
        prop_assert_eq!(leaves, expected);
    }
}
