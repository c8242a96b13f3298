use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_push_pop() {
    let mut names: TypedStack<String> = TypedStack::new();
    names.push("value 1".to_string());
    names.push("value 2".to_string());
    assert_eq!(names.len(), 2);

    assert_eq!(names.pop(), "value 2");
    assert_eq!(names.len(), 1);
    assert_eq!(names.pop(), "value 1");
    assert_eq!(names.len(), 0);

    // Pop on empty returns the zero value and stays empty.
    assert_eq!(names.pop(), String::new());
    assert_eq!(names.len(), 0);
}

#[test]
fn test_pop_empty_is_idempotent() {
    let mut ints: TypedStack<i32> = TypedStack::new();
    assert_eq!(ints.pop(), 0);
    assert_eq!(ints.pop(), 0);
    assert!(ints.is_empty());

    let mut floats: TypedStack<f32> = TypedStack::new();
    assert_eq!(floats.pop(), 0.0);

    let mut bools: TypedStack<bool> = TypedStack::new();
    assert!(!bools.pop());
}

#[test]
fn test_push_all_reverse() {
    let mut source: TypedStack<String> = TypedStack::new();
    source.push("value 1".to_string());
    source.push("value 2".to_string());

    let mut target: TypedStack<String> = TypedStack::new();
    source.push_all_reverse(&mut target);

    assert_eq!(source.len(), 2);
    assert_eq!(target.len(), 2);
    assert_eq!(target.pop(), "value 1");
    assert_eq!(target.pop(), "value 2");
}

#[test]
fn test_peek_is_top_addressed() {
    let mut names: TypedStack<String> = TypedStack::new();
    names.push("value 1".to_string());
    names.push("value 2".to_string());

    assert_eq!(names.peek(0), "value 2");
    assert_eq!(names.peek(1), "value 1");
    assert_eq!(names.top(), "value 2");
    // Peeking never mutates.
    assert_eq!(names.len(), 2);
    // Out of range yields the zero value.
    assert_eq!(names.peek(2), String::new());
}

#[test]
fn test_equality_is_elementwise() {
    let mut a: TypedStack<String> = TypedStack::new();
    let mut b: TypedStack<String> = TypedStack::new();
    assert_eq!(a, b);

    a.push("value 1".to_string());
    assert_ne!(a, b);

    b.push("value 1".to_string());
    assert_eq!(a, b);
}

#[test]
fn test_dup() {
    let mut names: TypedStack<String> = TypedStack::new();

    names.dup();
    assert_eq!(names.len(), 0);

    names.push("value 1".to_string());
    names.push("value 2".to_string());
    names.dup();

    assert_eq!(names.len(), 3);
    assert_eq!(names.peek(0), "value 2");
    assert_eq!(names.peek(1), "value 2");
    assert_eq!(names.peek(2), "value 1");
}

#[test]
fn test_dup_pop_pop_round_trip() {
    let mut ints: TypedStack<i32> = TypedStack::new();
    ints.push(7);
    ints.dup();
    assert_eq!(ints.pop(), 7);
    assert_eq!(ints.pop(), 7);
    assert_eq!(ints.pop(), 0);
    assert!(ints.is_empty());
}

#[test]
fn test_swap() {
    let mut names: TypedStack<String> = TypedStack::new();

    names.push("value 1".to_string());
    names.swap();
    assert_eq!(names.len(), 1);
    assert_eq!(names.peek(0), "value 1");

    names.push("value 2".to_string());
    names.swap();
    assert_eq!(names.len(), 2);
    assert_eq!(names.peek(0), "value 1");
    assert_eq!(names.peek(1), "value 2");
}

#[test]
fn test_rot() {
    let mut names: TypedStack<String> = TypedStack::new();

    names.push("value 1".to_string());
    names.push("value 2".to_string());
    names.rot();
    // Below depth 3 rot is a no-op.
    assert_eq!(names.peek(0), "value 2");
    assert_eq!(names.peek(1), "value 1");

    names.push("value 3".to_string());
    names.push("value 4".to_string());
    names.rot();
    // [1 2 3 4] -> [1 3 4 2]
    assert_eq!(names.len(), 4);
    assert_eq!(names.peek(0), "value 2");
    assert_eq!(names.peek(1), "value 4");
    assert_eq!(names.peek(2), "value 3");
    assert_eq!(names.peek(3), "value 1");
}

#[test]
fn test_shove_value() {
    let mut names: TypedStack<String> = TypedStack::new();

    // Depth 0 is push.
    names.shove_value("value 1".to_string(), 0);
    assert_eq!(names.len(), 1);
    assert_eq!(names.peek(0), "value 1");

    names.shove_value("value 2".to_string(), 0);
    assert_eq!(names.peek(0), "value 2");
    assert_eq!(names.peek(1), "value 1");

    // Depth 1 lands under the top.
    names.shove_value("value 3".to_string(), 1);
    assert_eq!(names.len(), 3);
    assert_eq!(names.peek(0), "value 2");
    assert_eq!(names.peek(1), "value 3");
    assert_eq!(names.peek(2), "value 1");

    // Over-deep indices clamp to the bottom.
    names.shove_value("value 4".to_string(), 99);
    assert_eq!(names.peek(3), "value 4");
}

#[test]
fn test_shove() {
    let mut ints: TypedStack<i32> = TypedStack::new();
    ints.shove(1);
    assert!(ints.is_empty());

    ints.push(1);
    ints.push(2);
    ints.push(3);
    // Move the top down to depth 2: [1 2 3] -> [3 1 2]
    ints.shove(2);
    assert_eq!(ints.peek(0), 2);
    assert_eq!(ints.peek(1), 1);
    assert_eq!(ints.peek(2), 3);

    // Index 0 leaves the stack unchanged.
    let before = ints.clone();
    ints.shove(0);
    assert_eq!(ints, before);

    // Negative and oversized indices clamp.
    ints.shove(-5);
    assert_eq!(ints, before);
    ints.shove(100);
    assert_eq!(ints.peek(2), 2);
}

#[test]
fn test_yank() {
    let mut ints: TypedStack<i32> = TypedStack::new();
    ints.yank(0);
    assert!(ints.is_empty());

    ints.push(1);
    ints.push(2);
    ints.push(3);
    // Pull depth 2 to the top: [1 2 3] -> [2 3 1]
    ints.yank(2);
    assert_eq!(ints.peek(0), 1);
    assert_eq!(ints.peek(1), 3);
    assert_eq!(ints.peek(2), 2);
    assert_eq!(ints.len(), 3);
}

#[test]
fn test_yankdup() {
    let mut ints: TypedStack<i32> = TypedStack::new();
    ints.push(1);
    ints.push(2);
    ints.push(3);
    ints.yankdup(2);
    assert_eq!(ints.len(), 4);
    assert_eq!(ints.peek(0), 1);
    assert_eq!(ints.peek(1), 3);
    assert_eq!(ints.peek(2), 2);
    assert_eq!(ints.peek(3), 1);
}

#[test]
fn test_clear() {
    let mut ints: TypedStack<i32> = TypedStack::new();
    ints.push(1);
    ints.push(2);
    ints.clear();
    assert!(ints.is_empty());
    assert_eq!(ints.pop(), 0);
}

#[test]
fn test_display_prints_top_first() {
    let mut ints: TypedStack<i32> = TypedStack::new();
    ints.push(1);
    ints.push(0);
    assert_eq!(ints.to_string(), "[0 1]");
    assert_eq!(ints.pop(), 0);
    assert_eq!(ints.pop(), 1);

    let empty: TypedStack<i32> = TypedStack::new();
    assert_eq!(empty.to_string(), "[]");
}

#[test]
fn test_stack_ops_object() {
    let mut ints: TypedStack<i32> = TypedStack::new();
    ints.push(1);
    ints.push(2);

    let ops: &mut dyn StackOps = &mut ints;
    assert_eq!(ops.depth(), 2);
    ops.dup();
    assert_eq!(ops.depth(), 3);
    ops.popdiscard();
    ops.popdiscard();
    ops.popdiscard();
    ops.popdiscard();
    assert_eq!(ops.depth(), 0);
}
