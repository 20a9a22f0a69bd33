//! Stack versus `Vec` model.

use super::common::{assert_healthy, diagnostic_stack};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Push(i32),
    Pop,
    Clone,
    Take,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => any::<i32>().prop_map(Op::Push),
        3 => Just(Op::Pop),
        1 => Just(Op::Clone),
        1 => Just(Op::Take),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Every step leaves the stack healthy and equal to the model.
    #[test]
    fn prop_matches_vec_model(ops in prop::collection::vec(op_strategy(), 0..200)) {
        let mut stack = diagnostic_stack::<i32>();
        let mut model: Vec<i32> = Vec::new();

        for op in ops {
            match op {
                Op::Push(v) => {
                    stack.push(v);
                    model.push(v);
                }
                Op::Pop => {
                    if model.pop().is_some() {
                        stack.pop();
                    }
                }
                Op::Clone => {
                    stack = stack.clone();
                }
                Op::Take => {
                    stack = stack.take();
                }
            }
            assert_healthy(&stack);
            prop_assert_eq!(stack.len(), model.len());
            prop_assert!(stack.iter().eq(model.iter()));
        }
    }

    /// Capacity never shrinks on pop and is always a power of two.
    #[test]
    fn prop_capacity_monotone(pushes in 1usize..300, pops in 0usize..300) {
        let mut stack = diagnostic_stack::<usize>();
        for i in 0..pushes {
            stack.push(i);
        }
        let grown = stack.capacity();
        prop_assert!(grown.is_power_of_two());
        prop_assert!(grown >= pushes && grown < pushes * 2);

        for _ in 0..pops.min(pushes) {
            stack.pop();
        }
        prop_assert_eq!(stack.capacity(), grown);
    }

    /// `pop_value` returns elements in reverse push order.
    #[test]
    fn prop_lifo_order(values in prop::collection::vec(any::<u64>(), 1..64)) {
        let mut stack = diagnostic_stack::<u64>();
        for &v in &values {
            stack.push(v);
        }
        for &v in values.iter().rev() {
            prop_assert_eq!(stack.pop_value(), v);
        }
        prop_assert!(stack.is_empty());
    }
}
