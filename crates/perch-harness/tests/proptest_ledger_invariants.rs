//! Property-based invariant tests for the corner ledger.
//!
//! 1. Construct + animate with no completions: `active_count == N` and
//!    `occupied_extent == Σ payload`
//! 2. The extent never goes negative under any interleaving
//! 3. Once every notification is finished or dropped the corner is empty
//! 4. Slot 1 always slides vertically, every other slot horizontally
//! 5. The static axis stays at rest on every frame

use std::time::Duration;

use perch_core::{Axis, Corner, ScreenBounds};
use perch_harness::CornerStack;
use proptest::prelude::*;

const SCREEN: ScreenBounds = ScreenBounds::new(1920, 1080);

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Push(u32),
    AnimateAll,
    Tick(u64),
    Cancel(usize),
    Drop(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1u32..200).prop_map(Op::Push),
        Just(Op::AnimateAll),
        (1u64..1500).prop_map(Op::Tick),
        (0usize..16).prop_map(Op::Cancel),
        (0usize..16).prop_map(Op::Drop),
    ]
}

fn corner_strategy() -> impl Strategy<Value = Corner> {
    prop_oneof![
        Just(Corner::TopLeft),
        Just(Corner::TopRight),
        Just(Corner::BottomLeft),
        Just(Corner::BottomRight),
    ]
}

fn apply(stack: &mut CornerStack, op: &Op) {
    match *op {
        Op::Push(height) => {
            stack.push(120, height).unwrap();
        }
        Op::AnimateAll => stack.animate_all().unwrap(),
        Op::Tick(ms) => stack.tick_all(Duration::from_millis(ms)).unwrap(),
        Op::Cancel(i) if !stack.is_empty() => {
            let i = i % stack.len();
            stack.get_mut(i).cancel().unwrap();
        }
        Op::Drop(i) if !stack.is_empty() => {
            let i = i % stack.len();
            stack.remove(i);
        }
        Op::Cancel(_) | Op::Drop(_) => {}
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 1. Extent accrues every payload while nothing completes
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn extent_is_sum_of_payloads(
        corner in corner_strategy(),
        heights in prop::collection::vec(1u32..300, 1..12),
        margin_y in 0.0f64..60.0,
    ) {
        let mut stack = CornerStack::new(corner, SCREEN).margins(10.0, margin_y);
        let mut expected = 0.0;
        for &height in &heights {
            stack.push(100, height).unwrap();
            expected += f64::from(height) + margin_y;
        }
        stack.animate_all().unwrap();

        let entry = stack.ledger().entry(corner);
        prop_assert_eq!(entry.active_count as usize, heights.len());
        prop_assert!((entry.occupied_extent - expected).abs() < 1e-6);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 2 + 3. Arbitrary interleavings stay non-negative and drain to empty
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn interleavings_never_go_negative_and_drain(
        corner in corner_strategy(),
        ops in prop::collection::vec(op_strategy(), 1..60),
    ) {
        let mut stack = CornerStack::new(corner, SCREEN).duration(Duration::from_millis(300));
        for op in &ops {
            apply(&mut stack, op);
            let entry = stack.ledger().entry(corner);
            prop_assert!(entry.occupied_extent >= 0.0, "negative extent after {:?}", op);
        }

        while !stack.is_empty() {
            stack.remove(0);
        }
        prop_assert!(stack.ledger().entry(corner).is_empty());
    }

    #[test]
    fn natural_completion_drains(
        corner in corner_strategy(),
        heights in prop::collection::vec(1u32..200, 1..8),
        step_ms in 10u64..400,
    ) {
        let mut stack = CornerStack::new(corner, SCREEN).duration(Duration::from_millis(200));
        for &height in &heights {
            stack.push(150, height).unwrap();
        }
        stack.animate_all().unwrap();
        stack.run_all(Duration::from_millis(step_ms)).unwrap();

        for index in 0..stack.len() {
            prop_assert!(stack.get(index).is_finished());
            prop_assert_eq!(stack.log(index).disposals(), 1);
        }
        prop_assert!(stack.ledger().entry(corner).is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 4 + 5. Axis selection and the static axis
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn only_the_selected_axis_moves(
        corner in corner_strategy(),
        count in 1usize..6,
        step_ms in 20u64..300,
    ) {
        let mut stack = CornerStack::new(corner, SCREEN).duration(Duration::from_millis(500));
        for _ in 0..count {
            stack.push(200, 80).unwrap();
        }
        stack.animate_all().unwrap();
        stack.run_all(Duration::from_millis(step_ms)).unwrap();

        for index in 0..count {
            let n = stack.get(index);
            let rest = n.rest_position();
            let expected_axis = if n.slot_index() == Some(1) { Axis::Y } else { Axis::X };
            prop_assert_eq!(n.axis(), Some(expected_axis));

            for bounds in stack.log(index).bounds() {
                match expected_axis {
                    Axis::Y => prop_assert_eq!(bounds.x, rest.x as i32),
                    Axis::X => prop_assert_eq!(bounds.y, rest.y as i32),
                }
            }
        }
    }
}
