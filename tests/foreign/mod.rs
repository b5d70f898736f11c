// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use dynpath::*;

use anyhow::Result;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};

#[cfg(not(feature = "arc"))]
use std::rc::Rc;
#[cfg(feature = "arc")]
use std::sync::Arc as Rc;

fn object(fields: Vec<(&str, Value)>) -> Value {
    Value::from_map(
        fields
            .into_iter()
            .map(|(k, v)| (Rc::from(k), v))
            .collect(),
    )
}

#[test]
fn nested_foreign_sequences() {
    let grid: Vec<Rc<Vec<i64>>> = vec![Rc::new(vec![1, 2, 3]), Rc::new(vec![4, 5, 6])];
    let root = object(vec![("list", Value::foreign(grid))]);

    assert_eq!(query(&root, "list[1][2]").as_i64(0), (6, true));
    assert_eq!(query(&root, "list[0][0]").as_i64(0), (1, true));
    assert!(!query(&root, "list[2][0]").exists());
    assert!(!query(&root, "list[0][3]").exists());
    assert!(!query(&root, "list.key").exists());
}

#[test]
fn foreign_root() {
    let root = Value::foreign(VecDeque::from(vec!["a", "b"]));
    assert_eq!(query(&root, "[1]").as_str("-"), ("b", true));
    assert_eq!(query(&root, "").value(), &root);
}

#[test]
fn string_keyed_hash_map() {
    let mut labels = HashMap::new();
    labels.insert("team".to_string(), "storage".to_string());
    labels.insert("tier".to_string(), "gold".to_string());
    let root = object(vec![("labels", Value::foreign(labels))]);

    assert_eq!(query(&root, "labels.team").as_str("-"), ("storage", true));
    assert!(!query(&root, "labels.owner").exists());
    assert!(!query(&root, "labels[0]").exists());

    let (map, ok) = query(&root, "labels").as_map(Mapping::default());
    assert!(ok);
    assert_eq!(map.len(), 2);
    assert_eq!(map.get("tier"), Some(&Value::from("gold")));
}

#[test]
fn integer_keyed_map_never_matches() {
    let mut ports: BTreeMap<u16, &'static str> = BTreeMap::new();
    ports.insert(80, "http");
    ports.insert(443, "https");
    let root = object(vec![("ports", Value::foreign(ports))]);

    // Path keys are strings; "80" does not name the integer key 80.
    assert!(!query(&root, "ports.80").exists());

    // The map still exists and converts, without its entries.
    let answer = query(&root, "ports");
    assert!(answer.exists());
    let (map, ok) = answer.as_map(Mapping::default());
    assert!(ok);
    assert!(map.is_empty());
}

#[test]
fn foreign_values_convert_like_native_ones() {
    let root = object(vec![
        ("floats", Value::foreign(vec![1.5f32, -2.5])),
        ("flags", Value::foreign(vec![Some(true), None])),
        ("counts", Value::foreign(vec![u64::MAX])),
    ]);

    assert_eq!(query(&root, "floats[1]").as_i64(0), (-2, true));
    assert_eq!(query(&root, "flags[0]").as_bool(false), (true, true));

    let none = query(&root, "flags[1]");
    assert_eq!(none.value(), &Value::Null);
    assert!(!none.exists());

    assert_eq!(query(&root, "counts[0]").as_u64(0), (u64::MAX, true));
    assert_eq!(query(&root, "counts[0]").as_i64(7), (7, false));
}

#[test]
fn foreign_sequence_is_copied() -> Result<()> {
    let root = object(vec![("ids", Value::foreign(vec![3u32, 1, 2]))]);
    let (items, ok) = query(&root, "ids").as_sequence(Sequence::default());
    assert!(ok);
    assert_eq!(Value::Array(items), Value::from_json_str("[3, 1, 2]")?);

    // A foreign value compares equal to its materialized form.
    assert_eq!(
        query(&root, "ids").value(),
        &Value::from_json_str("[3, 1, 2]")?
    );
    Ok(())
}

#[derive(Debug)]
struct Row {
    id: u64,
    name: String,
}

// A user type exposing two named fields.
impl Foreign for Row {
    fn shape(&self) -> Shape {
        Shape::Map
    }

    fn len(&self) -> usize {
        2
    }

    fn get_key(&self, key: &str) -> Option<Value> {
        match key {
            "id" => Some(Value::from(self.id)),
            "name" => Some(Value::from(self.name.as_str())),
            _ => None,
        }
    }

    fn entries(&self) -> Vec<(Rc<str>, Value)> {
        vec![
            (Rc::from("id"), Value::from(self.id)),
            (Rc::from("name"), Value::from(self.name.as_str())),
        ]
    }
}

#[test]
fn user_defined_foreign_type() -> Result<()> {
    let rows = Value::from(vec![
        Value::foreign(Row {
            id: 7,
            name: "ada".to_string(),
        }),
        Value::foreign(Row {
            id: 9,
            name: "grace".to_string(),
        }),
    ]);

    assert_eq!(query(&rows, "[1].name").as_str("-"), ("grace", true));
    assert_eq!(query(&rows, "[0].id").as_u64(0), (7, true));
    assert!(!query(&rows, "[0].email").exists());
    assert!(!query(&rows, "[0][0]").exists());

    assert_eq!(
        serde_json::to_string(&rows)?,
        r#"[{"id":7,"name":"ada"},{"id":9,"name":"grace"}]"#
    );
    Ok(())
}

#[test]
fn low_level_accessors() {
    let list = Value::foreign(vec![10i32, 20]);
    assert_eq!(list.shape(), Some(Shape::Sequence));
    assert_eq!(
        sequence_access(&list, 1).map(|v| v.into_owned()),
        Some(Value::from(20))
    );
    assert!(sequence_access(&list, 2).is_none());
    assert!(map_access(&list, "0").is_none());

    assert_eq!(Value::from(1).shape(), None);
    assert_eq!(Value::new_object().shape(), Some(Shape::Map));
}

static ELEMENT_CLONES: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug)]
struct Counted(u64);

impl Clone for Counted {
    fn clone(&self) -> Self {
        ELEMENT_CLONES.fetch_add(1, Ordering::SeqCst);
        Counted(self.0)
    }
}

impl ToValue for Counted {
    fn to_value(&self) -> Value {
        Value::from(self.0)
    }
}

#[test]
fn walking_nested_containers_copies_nothing() {
    // 10 x 100 x 100 cube; each leaf holds its own coordinates.
    let cube: Vec<Rc<Vec<Rc<Vec<Counted>>>>> = (0..10u64)
        .map(|i| {
            Rc::new(
                (0..100u64)
                    .map(|j| {
                        Rc::new(
                            (0..100u64)
                                .map(|k| Counted(i * 10_000 + j * 100 + k))
                                .collect(),
                        )
                    })
                    .collect(),
            )
        })
        .collect();
    let root = Value::foreign(cube);
    ELEMENT_CLONES.store(0, Ordering::SeqCst);

    assert_eq!(query(&root, "[3][4][5]").as_u64(0), (30_405, true));
    assert_eq!(ELEMENT_CLONES.load(Ordering::SeqCst), 0);

    // Extraction copies one level: the rows stay shared.
    let (rows, ok) = query(&root, "[3]").as_sequence(Sequence::default());
    assert!(ok);
    assert_eq!(rows.len(), 100);
    assert!(matches!(rows[99], Value::Foreign(_)));
    assert_eq!(ELEMENT_CLONES.load(Ordering::SeqCst), 0);
}

#[test]
fn nested_foreign_maps() {
    let mut limits = HashMap::new();
    limits.insert("cpu".to_string(), 4u32);
    let mut services: BTreeMap<String, Rc<HashMap<String, u32>>> = BTreeMap::new();
    services.insert("api".to_string(), Rc::new(limits));
    let root = object(vec![("services", Value::foreign(services))]);

    assert_eq!(query(&root, "services.api.cpu").as_u64(0), (4, true));
    assert!(!query(&root, "services.api.memory").exists());

    let (map, ok) = query(&root, "services").as_map(Mapping::default());
    assert!(ok);
    assert_eq!(map.get("api").and_then(Value::shape), Some(Shape::Map));
}

// Without `arc`, adapters need not be thread-safe.
#[cfg(not(feature = "arc"))]
#[test]
fn single_threaded_adapter() {
    use std::cell::Cell;

    #[derive(Debug)]
    struct Counter {
        reads: std::rc::Rc<Cell<usize>>,
    }

    impl Foreign for Counter {
        fn shape(&self) -> Shape {
            Shape::Sequence
        }

        fn len(&self) -> usize {
            1
        }

        fn get_index(&self, index: usize) -> Option<Value> {
            self.reads.set(self.reads.get() + 1);
            (index == 0).then(|| Value::from("only"))
        }
    }

    let reads = std::rc::Rc::new(Cell::new(0));
    let root = Value::foreign(Counter {
        reads: reads.clone(),
    });
    assert_eq!(query(&root, "[0]").as_str("-"), ("only", true));
    assert_eq!(reads.get(), 1);
}
