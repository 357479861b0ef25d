mod resolver_tests;

use noteconn::{Attrs, Value};

/// Attributes in the shape the notebook layer writes for a root node.
fn root_attrs(nodeid: &str) -> Attrs {
    let mut attrs = Attrs::new();
    attrs.insert("nodeid".into(), Value::from(nodeid));
    attrs.insert("version".into(), Value::Int(1));
    attrs.insert("parentids".into(), Value::List(Vec::new()));
    attrs.insert("childrenids".into(), Value::List(Vec::new()));
    attrs
}

/// Attributes for a child node with a single parent.
fn child_attrs(nodeid: &str, parentid: &str, title: &str) -> Attrs {
    let mut attrs = Attrs::new();
    attrs.insert("nodeid".into(), Value::from(nodeid));
    attrs.insert("version".into(), Value::Int(1));
    attrs.insert(
        "parentids".into(),
        Value::List(vec![Value::from(parentid)]),
    );
    attrs.insert("title".into(), Value::from(title));
    attrs
}
