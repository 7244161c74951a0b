//! Behavioral tests for the diff engine.

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use pretty_assertions::assert_eq;
    use serde::ser::{Error as _, Serializer};
    use serde::Serialize;

    use crate::diff::{diff, Diff, DiffError};
    use crate::value::{from_json, Value};

    #[derive(Debug, Clone, Serialize)]
    struct Item {
        #[serde(rename = "Name")]
        name: String,
        #[serde(rename = "Tags")]
        tags: Vec<String>,
    }

    #[derive(Debug, Clone, Serialize)]
    struct Profile {
        id: u32,
        nickname: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        bio: Option<String>,
        #[serde(skip)]
        #[allow(dead_code)]
        cache: Vec<u8>,
    }

    #[derive(Debug, Clone, Serialize)]
    enum Status {
        Active,
        Suspended { reason: String },
    }

    #[derive(Debug, Clone, Serialize)]
    struct Ledger {
        total: u128,
        debt: i128,
        owner: String,
    }

    /// Fails to serialize, like a value behind a poisoned lock.
    #[derive(Debug, Clone)]
    struct Unreadable;

    impl Serialize for Unreadable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("value is unreadable"))
        }
    }

    #[derive(Debug, Clone, Serialize)]
    struct Snapshot {
        label: String,
        payload: Unreadable,
        history: Vec<i32>,
    }

    fn item(name: &str, tags: &[&str]) -> Item {
        Item {
            name: name.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn profile() -> Profile {
        Profile {
            id: 1,
            nickname: Some("ann".into()),
            bio: None,
            cache: vec![],
        }
    }

    fn changed(a: impl Into<Value>, b: impl Into<Value>) -> Diff {
        Diff::Changed(a.into(), b.into())
    }

    #[test]
    fn test_reflexivity() {
        let i = item("x", &["a", "b"]);
        assert_eq!(diff(&i, &i).unwrap(), Diff::Equal);
        assert_eq!(diff(&profile(), &profile()).unwrap(), Diff::Equal);
        assert_eq!(diff(&vec![1.5, f64::NAN], &vec![1.5, f64::NAN]).unwrap(), Diff::Equal);
        assert_eq!(diff("same", "same").unwrap(), Diff::Equal);

        let mut map = HashMap::new();
        map.insert("k", vec![1, 2]);
        assert_eq!(diff(&map, &map.clone()).unwrap(), Diff::Equal);
    }

    #[test]
    fn test_record_scenario() {
        let a = item("x", &["a", "b"]);
        let b = item("y", &["a", "c"]);

        let mut tags = BTreeMap::new();
        tags.insert(1, changed("b", "c"));
        let mut fields = BTreeMap::new();
        fields.insert("Name".to_string(), changed("x", "y"));
        fields.insert("Tags".to_string(), Diff::Sequence(tags));

        assert_eq!(diff(&a, &b).unwrap(), Diff::Record(fields));
        assert_eq!(
            diff(&a, &b).unwrap().to_json().unwrap(),
            r#"{"Name":["x","y"],"Tags":{"1":["b","c"]}}"#
        );
    }

    #[test]
    fn test_map_scenario() {
        let a: BTreeMap<&str, i32> = [("k1", 1), ("k2", 2)].into_iter().collect();
        let b: BTreeMap<&str, i32> = [("k1", 1), ("k3", 3)].into_iter().collect();

        let result = diff(&a, &b).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.key("k1"), None);
        assert_eq!(result.key("k2"), Some(&Diff::Removed(Value::Int(2))));
        assert_eq!(result.key("k3"), Some(&Diff::Added(Value::Int(3))));
        assert_eq!(
            result.to_json().unwrap(),
            r#"{"k2":[2,null],"k3":[null,3]}"#
        );
    }

    #[test]
    fn test_positional_sequences() {
        let result = diff(&vec![1, 2, 3], &vec![3, 2, 1]).unwrap();
        let mut expected = BTreeMap::new();
        expected.insert(0, changed(1, 3));
        expected.insert(2, changed(3, 1));
        assert_eq!(result, Diff::Sequence(expected));
    }

    #[test]
    fn test_length_mismatch_is_one_sided() {
        let result = diff(&vec![1, 2], &vec![1, 2, 3]).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.index(2), Some(&Diff::Added(Value::Int(3))));

        let result = diff(&vec![1, 2, 3], &vec![1]).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.index(1), Some(&Diff::Removed(Value::Int(2))));
        assert_eq!(result.index(2), Some(&Diff::Removed(Value::Int(3))));
    }

    #[test]
    fn test_symmetry_of_detection() {
        let pairs = vec![
            (item("x", &["a"]), item("x", &["a"])),
            (item("x", &["a"]), item("y", &["a"])),
            (item("x", &["a"]), item("x", &["a", "b"])),
            (item("x", &[]), item("x", &["a"])),
        ];
        for (a, b) in pairs {
            let forward = diff(&a, &b).unwrap();
            let backward = diff(&b, &a).unwrap();
            assert_eq!(forward.is_equal(), backward.is_equal(), "{:?} vs {:?}", a, b);
        }

        let forward = diff(&vec![1, 2], &vec![1]).unwrap();
        let backward = diff(&vec![1], &vec![1, 2]).unwrap();
        assert_eq!(forward.index(1), Some(&Diff::Removed(Value::Int(2))));
        assert_eq!(backward.index(1), Some(&Diff::Added(Value::Int(2))));
    }

    #[test]
    fn test_type_mismatch_precedence() {
        let err = diff(&1i32, &"1").unwrap_err();
        assert_eq!(err, DiffError::type_mismatch("i32", "&str"));
        assert_eq!(err.diff(), Some(Diff::type_mismatch("i32", "&str")));
        assert_eq!(err.to_string(), "types don't match -- i32/&str");

        // Content never matters, even when one side is absent.
        let err = diff(&None::<i32>, &None::<u32>).unwrap_err();
        assert!(err.diff().unwrap().is_type_mismatch());
        let err = diff(&item("x", &[]), &Some(item("x", &[]))).unwrap_err();
        assert!(matches!(err, DiffError::TypeMismatch { .. }));
    }

    #[test]
    fn test_dynamic_type_mismatch() {
        let a = from_json(r#"{"count": 1, "name": "a", "tags": ["x"]}"#).unwrap();
        let b = from_json(r#"{"count": "one", "name": "b", "tags": ["x"]}"#).unwrap();

        let result = diff(&a, &b).unwrap();
        assert_eq!(
            result.key("count"),
            Some(&Diff::type_mismatch("number", "str"))
        );
        // The mismatch does not hide the sibling difference.
        assert_eq!(result.key("name"), Some(&changed("a", "b")));
        assert_eq!(result.key("tags"), None);

        // At the root it is an error as well.
        let err = diff(&Value::Int(1), &Value::from("1")).unwrap_err();
        assert_eq!(err, DiffError::type_mismatch("number", "str"));
    }

    #[test]
    fn test_sparse_invariant() {
        let a = vec![item("x", &["a", "b"]), item("y", &["c"]), item("z", &[])];
        let b = vec![item("x", &["a", "b"]), item("y", &["d"]), item("z", &[])];

        let result = diff(&a, &b).unwrap();
        assert_eq!(result.len(), 1);
        let entry = result.index(1).unwrap();
        assert_eq!(entry.len(), 1);
        assert_eq!(entry.field("Name"), None);
        assert_eq!(entry.field("Tags").and_then(|t| t.index(0)), Some(&changed("c", "d")));
    }

    #[test]
    fn test_hidden_fields_are_invisible() {
        let a = profile();
        let mut b = profile();
        b.cache = vec![1, 2, 3];
        assert_eq!(diff(&a, &b).unwrap(), Diff::Equal);
    }

    #[test]
    fn test_optional_fields() {
        let a = profile();
        let mut b = profile();
        b.nickname = None;
        b.bio = Some("hi".into());

        let result = diff(&a, &b).unwrap();
        assert_eq!(result.field("nickname"), Some(&changed("ann", Value::Null)));
        // Skipped on one side only: reported as one-sided.
        assert_eq!(result.field("bio"), Some(&Diff::Added(Value::from("hi"))));
        assert_eq!(result.field("id"), None);
    }

    #[test]
    fn test_enum_variants() {
        let suspended = |reason: &str| Status::Suspended {
            reason: reason.to_string(),
        };

        assert_eq!(diff(&Status::Active, &Status::Active).unwrap(), Diff::Equal);

        let result = diff(&suspended("spam"), &suspended("abuse")).unwrap();
        assert_eq!(result.field("reason"), Some(&changed("spam", "abuse")));

        match diff(&Status::Active, &suspended("spam")).unwrap() {
            Diff::Changed(a, b) => {
                assert_eq!(a, Value::from("Active"));
                assert!(b.as_map().unwrap().has("Suspended"));
            }
            other => panic!("expected a value pair, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_maps_recurse() {
        let mut a: HashMap<String, BTreeMap<String, i32>> = HashMap::new();
        a.entry("outer".into()).or_default().insert("x".into(), 1);
        a.entry("outer".into()).or_default().insert("y".into(), 2);
        let mut b = a.clone();
        b.entry("outer".into()).or_default().insert("y".into(), 5);

        let result = diff(&a, &b).unwrap();
        assert_eq!(
            result.key("outer").and_then(|d| d.key("y")),
            Some(&changed(2, 5))
        );
        assert_eq!(result.key("outer").and_then(|d| d.key("x")), None);
    }

    #[test]
    fn test_references_and_boxes_are_transparent() {
        let a = Box::new(item("x", &[]));
        let b = Box::new(item("y", &[]));
        assert_eq!(diff(&a, &b).unwrap().field("Name"), Some(&changed("x", "y")));
        assert_eq!(diff(&&1, &&1).unwrap(), Diff::Equal);
    }

    #[test]
    fn test_wide_integers_compare_by_value() {
        let ledger = |owner: &str| Ledger {
            total: u128::MAX,
            debt: i128::MIN,
            owner: owner.to_string(),
        };
        assert_eq!(diff(&ledger("x"), &ledger("x")).unwrap(), Diff::Equal);

        let result = diff(&ledger("x"), &ledger("y")).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.field("owner"), Some(&changed("x", "y")));

        let mut b = ledger("x");
        b.total -= 1;
        assert_eq!(
            diff(&ledger("x"), &b).unwrap().field("total"),
            Some(&Diff::Changed(
                Value::Uint128(u128::MAX),
                Value::Uint128(u128::MAX - 1)
            ))
        );
    }

    #[test]
    fn test_failing_child_does_not_hide_siblings() {
        let a = Snapshot {
            label: "a".into(),
            payload: Unreadable,
            history: vec![1, 2],
        };
        let b = Snapshot {
            label: "b".into(),
            payload: Unreadable,
            history: vec![1, 3],
        };

        let result = diff(&a, &b).unwrap();
        assert_eq!(
            result.field("payload"),
            Some(&Diff::Error("value is unreadable".to_string()))
        );
        assert_eq!(result.field("label"), Some(&changed("a", "b")));
        assert_eq!(
            result.field("history").and_then(|h| h.index(1)),
            Some(&changed(2, 3))
        );

        let result = diff(&vec![a.clone(), a.clone()], &vec![a.clone()]).unwrap();
        assert!(result.index(0).unwrap().field("payload").unwrap().is_error());
        assert!(matches!(result.index(1), Some(Diff::Removed(_))));

        // A failing element is reported at its own position, one-sided or not.
        let result = diff(&vec![Unreadable, Unreadable], &vec![Unreadable]).unwrap();
        assert_eq!(result.len(), 2);
        assert!(result.index(0).unwrap().is_error());
        assert!(result.index(1).unwrap().is_error());

        // A failure at the root has no siblings and fails the call.
        assert!(matches!(
            diff(&Unreadable, &Unreadable),
            Err(DiffError::Inspect { .. })
        ));
    }

    #[test]
    fn test_signed_zero_is_equal() {
        assert_eq!(diff(&0.0f64, &-0.0f64).unwrap(), Diff::Equal);
        assert_eq!(diff(&vec![-0.0f32], &vec![0.0f32]).unwrap(), Diff::Equal);
        assert_eq!(
            diff(&0.0f64, &1.0f64).unwrap(),
            changed(0.0, 1.0)
        );
    }
}
