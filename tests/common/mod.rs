//! Beans shared by the integration tests.
#![allow(dead_code)]

use proppath::bean;
use proppath::ds::class::ClassBuilder;
use proppath::ds::error::InvocationError;
use proppath::ds::value::{MapRef, ObjectRef, Value};

/// Print logs of failing tests. Safe to call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

#[derive(Default)]
pub struct ParentObject {
    pub name: Option<String>,
    pub value: Option<String>,
    pub date: Option<i64>,
    pub valid: bool,
    pub child: Option<ObjectRef>,
}

bean!(ParentObject, PARENT_OBJECT_CLASS => ClassBuilder::<ParentObject>::new("ParentObject")
    .getter("getName", |p| p.name.clone())
    .setter("setName", |p, v: Option<String>| p.name = v)
    .getter("getValue", |p| p.value.clone())
    .setter("setValue", |p, v: Option<String>| p.value = v)
    .getter("getDate", |p| p.date)
    .setter("setDate", |p, v: Option<i64>| p.date = v)
    .getter("isValid", |p| p.valid)
    .setter("setValid", |p, v: bool| p.valid = v)
    .getter("getChild", |p| p.child.clone())
    .setter("setChild", |p, v: Option<ObjectRef>| p.child = v)
    .method("getBroken", |_| Err(InvocationError::Failed("always broken".to_string())))
    .build());

impl ParentObject {
    pub fn new(name: &str, date: i64, valid: bool, child: ChildObject) -> Self {
        ParentObject {
            name: Some(name.to_string()),
            value: None,
            date: Some(date),
            valid,
            child: Some(ObjectRef::new(child)),
        }
    }
}

#[derive(Default)]
pub struct ChildObject {
    pub name: Option<String>,
    pub email: Option<String>,
}

bean!(ChildObject, CHILD_OBJECT_CLASS => ClassBuilder::<ChildObject>::new("ChildObject")
    .getter("getName", |c| c.name.clone())
    .setter("setName", |c, v: Option<String>| c.name = v)
    .getter("getEmail", |c| c.email.clone())
    .setter("setEmail", |c, v: Option<String>| c.email = v)
    .build());

impl ChildObject {
    pub fn new(name: &str, email: &str) -> Self {
        ChildObject {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
        }
    }
}

/// A final map field and an assignable self-typed field.
pub struct Demo {
    pub map: MapRef,
    pub demo: Option<ObjectRef>,
}

impl Demo {
    pub fn new() -> Self {
        Demo {
            map: MapRef::from_entries(vec![("foo", 42i64)]),
            demo: None,
        }
    }
}

bean!(Demo, DEMO_CLASS => ClassBuilder::<Demo>::new("Demo")
    .final_field("map", |d| d.map.clone())
    .field("demo", |d| d.demo.clone(), |d, v: Option<ObjectRef>| d.demo = v)
    .build());

/// Binary tree node whose children are both the same node.
pub struct Deep {
    pub left: Option<ObjectRef>,
    pub right: Option<ObjectRef>,
    pub child: ObjectRef,
}

impl Deep {
    pub fn new(x: Option<ObjectRef>) -> Self {
        Deep {
            left: x.clone(),
            right: x,
            child: ObjectRef::new(ChildObject::new("Vasya", "a@b.c")),
        }
    }

    /// `depth` nested nodes.
    pub fn chain(depth: usize) -> ObjectRef {
        let mut node = None;
        for _ in 0..depth {
            node = Some(ObjectRef::new(Deep::new(node)));
        }
        node.unwrap_or_else(|| ObjectRef::new(Deep::new(None)))
    }
}

bean!(Deep, DEEP_CLASS => ClassBuilder::<Deep>::new("Deep")
    .getter("getLeft", |d| d.left.clone())
    .setter("setLeft", |d, v: Option<ObjectRef>| d.left = v)
    .getter("getRight", |d| d.right.clone())
    .setter("setRight", |d, v: Option<ObjectRef>| d.right = v)
    .getter("getChild", |d| d.child.clone())
    .build());

/// Exposes its map only through a method named like the property.
#[derive(Default)]
pub struct MapHolder {
    pub rmap: MapRef,
}

bean!(MapHolder, MAP_HOLDER_CLASS => ClassBuilder::<MapHolder>::new("MapHolder")
    .getter("rmap", |h| h.rmap.clone())
    .build());

pub struct MapInRecordHolder {
    pub rec: ObjectRef,
}

impl MapInRecordHolder {
    pub fn new() -> Self {
        MapInRecordHolder {
            rec: ObjectRef::new(MapHolder { rmap: MapRef::new() }),
        }
    }
}

bean!(MapInRecordHolder, MAP_IN_RECORD_HOLDER_CLASS =>
    ClassBuilder::<MapInRecordHolder>::new("MapInRecordHolder")
        .final_field("rec", |h| h.rec.clone())
        .build());

/// Holds a counter reachable through an exact-name getter and setter.
#[derive(Default)]
pub struct Counter {
    pub count: i64,
}

bean!(Counter, COUNTER_CLASS => ClassBuilder::<Counter>::new("Counter")
    .getter("count", |c| c.count)
    .setter("count", |c, v: i64| c.count = v)
    .build());

/// Conventional accessors that always fail, backed by a working field.
#[derive(Default)]
pub struct Legacy {
    pub level: i64,
}

bean!(Legacy, LEGACY_CLASS => ClassBuilder::<Legacy>::new("Legacy")
    .method("getLevel", |_| Err(InvocationError::Failed("retired".to_string())))
    .method_mut("setLevel", |_, _| Err(InvocationError::Failed("retired".to_string())))
    .field("level", |l| l.level, |l, v: i64| l.level = v)
    .build());

pub fn object<T: proppath::ds::class::Bean>(bean: T) -> Value {
    Value::Object(ObjectRef::new(bean))
}
