use proptest::prelude::*;
use value_path::{self as vp, ErrorKind, Mapping, Record, Value};

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        "[a-z ]{0,8}".prop_map(Value::from),
    ]
}

fn graph() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Seq),
            prop::collection::btree_map("[a-z]{1,4}", inner.clone(), 0..4).prop_map(Value::from),
            inner.prop_map(|v| Value::reference(v)),
        ]
    })
}

fn ident() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_]{0,6}"
}

proptest! {
    #[test]
    fn identity_law(v in graph(), dots in 0usize..4) {
        for expr in [".".repeat(dots), "\"\"".to_string()] {
            let l = vp::resolve(&v, &expr).unwrap();
            prop_assert!(l.found);
            prop_assert_eq!(&*l.value, &v);
        }
    }

    #[test]
    fn null_root_short_circuits(expr in "\\PC{0,12}") {
        let l = vp::resolve(&Value::Null, &expr).unwrap();
        prop_assert!(l.found);
        prop_assert!(l.value.is_null());
    }

    #[test]
    fn bare_and_bracketed_indices_agree(items in prop::collection::vec(any::<i64>(), 1..8), pick in any::<prop::sample::Index>()) {
        let i = pick.index(items.len());
        let seq = Value::from(items.clone());
        let bare = vp::resolve(&seq, &i.to_string()).unwrap();
        let bracketed = vp::resolve(&seq, &format!("[{i}]")).unwrap();
        let quoted = vp::resolve(&seq, &format!("[\"{i}\"]")).unwrap();
        prop_assert_eq!(&bare, &bracketed);
        prop_assert_eq!(&bare, &quoted);
        prop_assert_eq!(bare.into_value(), Value::Int(items[i]));
    }

    #[test]
    fn bare_and_quoted_map_keys_agree(key in ident(), v in leaf()) {
        let map = Value::from(Mapping::new().entry(key.clone(), v.clone()));
        let bare = vp::resolve(&map, &key).unwrap();
        let quoted = vp::resolve(&map, &format!("[\"{key}\"]")).unwrap();
        let bracketed = vp::resolve(&map, &format!("[{key}]")).unwrap();
        prop_assert_eq!(&bare, &quoted);
        prop_assert_eq!(&bare, &bracketed);
        prop_assert!(bare.found);
        prop_assert_eq!(bare.into_value(), v);
    }

    #[test]
    fn first_miss_is_silent_second_is_fatal(key in ident(), next in ident()) {
        let rec = Value::from(Record::new("empty"));
        let l = vp::resolve(&rec, &key).unwrap();
        prop_assert!(!l.found);
        prop_assert!(l.value.is_null());

        let e = vp::resolve(&rec, &format!("{key}.{next}")).unwrap_err();
        prop_assert_eq!(e.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn parse_never_panics(expr in "\\PC{0,24}") {
        let _ = vp::parse(&expr);
    }
}
