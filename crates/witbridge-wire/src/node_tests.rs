use witbridge_core::Error;

use crate::{Value, ValueNode, WireValue};

fn user() -> Value {
    Value::Record(vec![
        Value::String("ada".into()),
        Value::some(Value::F64(36.0)),
        Value::List(vec![Value::U8(1), Value::U8(2)]),
    ])
}

#[test]
fn root_is_node_zero_in_pre_order() {
    let wire = WireValue::from_value(&user()).unwrap();

    insta::assert_snapshot!(wire.dump(), @r#"
    0: record [1, 2, 4]
    1: string "ada"
    2: some -> 3
    3: f64 36
    4: list [5, 6]
    5: u8 1
    6: u8 2
    "#);
}

#[test]
fn children_always_follow_their_parent() {
    let value = Value::Tuple(vec![
        Value::variant(1, Some(Value::ok(Some(Value::Bool(true))))),
        Value::err(None),
        Value::Option(None),
    ]);
    let wire = WireValue::from_value(&value).unwrap();

    for (i, node) in wire.nodes.iter().enumerate() {
        let children: Vec<i32> = match node {
            ValueNode::TupleValue(c) | ValueNode::ListValue(c) | ValueNode::RecordValue(c) => {
                c.clone()
            }
            ValueNode::VariantValue { payload, .. } => payload.iter().copied().collect(),
            ValueNode::OptionValue(c) => c.iter().copied().collect(),
            ValueNode::ResultValue(Ok(c) | Err(c)) => c.iter().copied().collect(),
            _ => vec![],
        };
        assert!(children.iter().all(|&c| c as usize > i));
    }
    assert_eq!(wire.to_value().unwrap(), value);
}

#[test]
fn leaf_root() {
    let wire = WireValue::from_value(&Value::String("hi".into())).unwrap();
    assert_eq!(wire.nodes, vec![ValueNode::PrimString("hi".into())]);
    assert_eq!(wire.to_value().unwrap(), Value::String("hi".into()));
}

#[test]
fn unflatten_rebuilds_every_node_kind() {
    let value = Value::Record(vec![
        Value::Enum(2),
        Value::Flags(vec![true, false, true]),
        Value::Handle {
            uri: "urn:worker".into(),
            resource_id: 9,
        },
        Value::Char('λ'),
        Value::S64(-5),
        Value::U64(u64::MAX),
        Value::F32(1.5),
        Value::S8(-1),
        Value::U16(7),
        Value::S16(-7),
        Value::U32(70),
        Value::S32(-70),
        Value::variant(0, None),
        Value::List(vec![]),
    ]);
    let wire = WireValue::from_value(&value).unwrap();
    assert_eq!(wire.to_value().unwrap(), value);
}

#[test]
fn backward_reference_is_rejected() {
    let wire = WireValue {
        nodes: vec![
            ValueNode::ListValue(vec![1]),
            ValueNode::OptionValue(Some(0)),
        ],
    };
    let err = wire.to_value().unwrap_err();
    insta::assert_snapshot!(err, @"internal inconsistency: node 1 refers back to node 0");
}

#[test]
fn self_reference_is_rejected() {
    let wire = WireValue {
        nodes: vec![ValueNode::TupleValue(vec![0])],
    };
    assert!(matches!(
        wire.to_value(),
        Err(Error::InternalInconsistency(_))
    ));
}

#[test]
fn out_of_range_reference_is_rejected() {
    let wire = WireValue {
        nodes: vec![ValueNode::RecordValue(vec![1, 5]), ValueNode::PrimBool(true)],
    };
    let err = wire.to_value().unwrap_err();
    insta::assert_snapshot!(err, @"internal inconsistency: node index 5 out of range (len 2)");
}

#[test]
fn empty_array_is_rejected() {
    let wire = WireValue { nodes: vec![] };
    assert!(matches!(
        wire.to_value(),
        Err(Error::InternalInconsistency(_))
    ));
}

#[test]
fn binary_round_trip() {
    let wire = WireValue::from_value(&user()).unwrap();
    let bytes = wire.to_binary().unwrap();
    assert_eq!(WireValue::from_binary(&bytes).unwrap(), wire);
}

#[test]
fn truncated_binary_is_rejected() {
    let bytes = WireValue::from_value(&user()).unwrap().to_binary().unwrap();
    let err = WireValue::from_binary(&bytes[..bytes.len() / 2]).unwrap_err();
    assert!(matches!(err, Error::Binary(_)));
}

#[test]
fn shared_child_is_rejected() {
    let wire = WireValue {
        nodes: vec![ValueNode::ListValue(vec![1, 1]), ValueNode::PrimU8(1)],
    };
    let err = wire.to_value().unwrap_err();
    insta::assert_snapshot!(err, @"internal inconsistency: node 0 refers to node 1, expected node 2");
}

#[test]
fn shared_subtrees_do_not_expand() {
    let mut nodes: Vec<ValueNode> = (0..24)
        .map(|i| ValueNode::ListValue(vec![i + 1, i + 1]))
        .collect();
    nodes.push(ValueNode::PrimBool(true));
    let bytes = WireValue { nodes }.to_binary().unwrap();

    let err = WireValue::from_binary(&bytes).unwrap().to_value().unwrap_err();
    assert!(matches!(err, Error::InternalInconsistency(_)));
}

#[test]
fn unreferenced_node_is_rejected() {
    let wire = WireValue {
        nodes: vec![ValueNode::PrimU8(1), ValueNode::PrimString("junk".into())],
    };
    let err = wire.to_value().unwrap_err();
    insta::assert_snapshot!(err, @"internal inconsistency: node 1 is not reachable from the root");
}

#[test]
fn children_out_of_slot_order_are_rejected() {
    let wire = WireValue {
        nodes: vec![
            ValueNode::TupleValue(vec![2, 1]),
            ValueNode::PrimBool(true),
            ValueNode::PrimBool(false),
        ],
    };
    let err = wire.to_value().unwrap_err();
    insta::assert_snapshot!(err, @"internal inconsistency: node 0 refers to node 2, expected node 1");
}

#[test]
fn nesting_depth_is_bounded() {
    let depth = 1000;
    let mut nodes: Vec<ValueNode> = (1..depth)
        .map(|i| ValueNode::OptionValue(Some(i)))
        .collect();
    nodes.push(ValueNode::PrimBool(true));
    let err = WireValue { nodes }.to_value().unwrap_err();
    insta::assert_snapshot!(err, @"internal inconsistency: nesting deeper than 128 levels");

    let mut value = Value::Bool(true);
    for _ in 0..100 {
        value = Value::some(value);
    }
    let wire = WireValue::from_value(&value).unwrap();
    assert_eq!(wire.to_value().unwrap(), value);
}
