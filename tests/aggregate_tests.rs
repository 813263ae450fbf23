mod common;

use common::Interpreter;
use exprgen::lix::Expression;
use exprgen::rex::AggregateFunction;
use exprgen::translate::{accumulator_implementor, AccumulatorImplementor};
use exprgen::types::{HostType, Value};

/// Drive an accumulator over `inputs` the way a container would: rows with a
/// null argument skip `add` unless the implementor asks for them.
fn accumulate(
    aggregation: AggregateFunction,
    return_type: HostType,
    argument_type: HostType,
    inputs: &[Value],
) -> Vec<Value> {
    let imp: &dyn AccumulatorImplementor = accumulator_implementor(aggregation).unwrap();
    let mut interpreter = Interpreter::new();

    let init = imp.implement_init(aggregation, &return_type, &[argument_type.clone()]);
    let accumulator = Expression::parameter("acc", init.ty().clone());
    let argument = Expression::parameter("arg", argument_type);
    let add = imp
        .implement_add(aggregation, &accumulator, &[argument])
        .unwrap();

    let mut progression = vec![interpreter.eval(&init).unwrap()];
    interpreter.bind("acc", progression[0].clone());
    for input in inputs {
        if input.is_null() && !imp.call_on_null() {
            continue;
        }
        interpreter.bind("arg", input.clone());
        let next = interpreter.eval(&add).unwrap();
        interpreter.bind("acc", next.clone());
        progression.push(next);
    }
    let result = imp.implement_result(aggregation, &accumulator);
    progression.push(interpreter.eval(&result).unwrap());
    progression
}

#[test]
fn test_min_progression() {
    let progression = accumulate(
        AggregateFunction::Min,
        HostType::INT,
        HostType::INT,
        &[Value::Int32(5), Value::Int32(3), Value::Int32(8)],
    );
    // init, after each row, result
    assert_eq!(
        progression,
        vec![
            Value::Null,
            Value::Int32(5),
            Value::Int32(3),
            Value::Int32(3),
            Value::Int32(3),
        ]
    );
}

#[test]
fn test_max_skips_null_rows() {
    let progression = accumulate(
        AggregateFunction::Max,
        HostType::INT,
        HostType::INT,
        &[Value::Int32(2), Value::Null, Value::Int32(9), Value::Int32(4)],
    );
    assert_eq!(progression.last(), Some(&Value::Int32(9)));
    assert_eq!(progression.len(), 5);
}

#[test]
fn test_count() {
    let progression = accumulate(
        AggregateFunction::Count,
        HostType::LONG,
        HostType::Object,
        &[
            Value::String("a".into()),
            Value::Null,
            Value::String("b".into()),
        ],
    );
    assert_eq!(progression.first(), Some(&Value::Int64(0)));
    assert_eq!(progression.last(), Some(&Value::Int64(2)));
}

#[test]
fn test_sum_widens_argument() {
    let progression = accumulate(
        AggregateFunction::Sum,
        HostType::LONG,
        HostType::INT,
        &[Value::Int32(i32::MAX), Value::Int32(i32::MAX), Value::Null],
    );
    assert_eq!(
        progression.last(),
        Some(&Value::Int64(2 * i64::from(i32::MAX)))
    );
}
