#[cfg(test)]
mod tests {
    use dictfier::*;
    use std::cell::Cell;
    use std::rc::Rc;

    // Host objects used as sources

    #[derive(Debug)]
    struct Address {
        city: String,
    }

    impl Object for Address {
        fn type_name(&self) -> &str {
            "Address"
        }

        fn get(&self, field: &str) -> Option<Value> {
            match field {
                "city" => Some(Value::from(self.city.as_str())),
                _ => None,
            }
        }
    }

    #[derive(Debug)]
    struct Person {
        name: String,
        age: i64,
        address: Option<Value>,
        children: Vec<Value>,
    }

    impl Object for Person {
        fn type_name(&self) -> &str {
            "Person"
        }

        fn get(&self, field: &str) -> Option<Value> {
            match field {
                "name" => Some(Value::from(self.name.as_str())),
                "age" => Some(Value::Integer(self.age)),
                "address" => self.address.clone(),
                "children" => Some(Value::Array(self.children.clone())),
                "greeting" => {
                    let name = self.name.clone();
                    Some(Value::method(move || Value::String(format!("Hi, {}", name))))
                }
                _ => None,
            }
        }
    }

    /// An iterable host object
    #[derive(Debug)]
    struct Family(Vec<Value>);

    impl Object for Family {
        fn get(&self, field: &str) -> Option<Value> {
            match field {
                "size" => Some(Value::Integer(self.0.len() as i64)),
                _ => None,
            }
        }

        fn elements(&self) -> Option<Vec<Value>> {
            Some(self.0.clone())
        }
    }

    fn person(name: &str, age: i64) -> Value {
        Value::object(Person {
            name: name.to_string(),
            age,
            address: None,
            children: vec![],
        })
    }

    fn al() -> Value {
        Value::object(Person {
            name: "Al".to_string(),
            age: 30,
            address: Some(Value::object(Address {
                city: "X".to_string(),
            })),
            children: vec![person("Bo", 5), person("Cy", 3)],
        })
    }

    fn entry(pairs: Vec<(&str, Value)>) -> Value {
        Value::map(pairs)
    }

    // ========================================================================
    // Flat fields
    // ========================================================================

    #[test]
    fn test_flat_fields() {
        let query = Query::new().fields(["name", "age"]);
        let result = dictfy(&al(), &query).unwrap();

        assert_eq!(
            result,
            entry(vec![("name", Value::from("Al")), ("age", Value::Integer(30))])
        );
    }

    #[test]
    fn test_flat_fields_keep_only_requested_keys() {
        let result = dictfy(&al(), &Query::new().field("age")).unwrap();
        let map = result.as_map().unwrap();

        assert_eq!(map.len(), 1);
        assert!(map.contains_key("age"));
    }

    #[test]
    fn test_flat_fields_on_map_source() {
        let source = entry(vec![("a", Value::Integer(1)), ("b", Value::Null)]);
        let result = dictfy(&source, &Query::new().fields(["a", "b"])).unwrap();

        assert_eq!(result, source);
    }

    #[test]
    fn test_flat_field_keeps_host_object_verbatim() {
        let source = al();
        let result = dictfy(&source, &Query::new().field("address")).unwrap();

        assert_eq!(result.get("address"), source.get("address"));
    }

    #[test]
    fn test_empty_query_yields_empty_map() {
        let result = dictfy(&al(), &Query::new()).unwrap();
        assert_eq!(result, entry(vec![]));
    }

    // ========================================================================
    // Nested fields
    // ========================================================================

    #[test]
    fn test_nested_flat_field() {
        let query = Query::new()
            .field("name")
            .nested("address", Query::new().field("city"));
        let result = dictfy(&al(), &query).unwrap();

        assert_eq!(
            result,
            entry(vec![
                ("name", Value::from("Al")),
                ("address", entry(vec![("city", Value::from("X"))])),
            ])
        );
    }

    #[test]
    fn test_empty_nested_field_skips_lookup() {
        // Person has no "metadata" attribute; no lookup happens
        let query = Query::new().empty("metadata");
        let result = dictfy(&al(), &query).unwrap();

        assert_eq!(result, entry(vec![("metadata", entry(vec![]))]));
    }

    #[test]
    fn test_nested_iterable_field() {
        let query = Query::new().iterable("children", Query::new().field("name"));
        let result = dictfy(&al(), &query).unwrap();

        assert_eq!(
            result,
            entry(vec![(
                "children",
                Value::Array(vec![
                    entry(vec![("name", Value::from("Bo"))]),
                    entry(vec![("name", Value::from("Cy"))]),
                ])
            )])
        );
    }

    #[test]
    fn test_nested_iterable_field_empty_collection() {
        let query = Query::new().iterable("children", Query::new().field("name"));
        let result = dictfy(&person("Dee", 1), &query).unwrap();

        assert_eq!(result, entry(vec![("children", Value::Array(vec![]))]));
    }

    #[test]
    fn test_deeply_nested_query() {
        let grandchild = person("Ed", 0);
        let child = Value::object(Person {
            name: "Bo".into(),
            age: 5,
            address: None,
            children: vec![grandchild],
        });
        let root = Value::object(Person {
            name: "Al".into(),
            age: 30,
            address: None,
            children: vec![child],
        });

        let query = Query::new().iterable(
            "children",
            Query::new()
                .field("name")
                .iterable("children", Query::new().field("name")),
        );
        let result = dictfy(&root, &query).unwrap();

        let children = result.get("children").unwrap();
        let bo = &children.as_array().unwrap()[0];
        assert_eq!(
            bo.get("children"),
            Some(Value::Array(vec![entry(vec![("name", Value::from("Ed"))])]))
        );
    }

    // ========================================================================
    // Iterable root
    // ========================================================================

    #[test]
    fn test_iterable_root_preserves_order() {
        let source = Value::Array(vec![person("A", 1), person("B", 2), person("C", 3)]);
        let query = Query::each(Query::new().fields(["name", "age"]));
        let result = dictfy(&source, &query).unwrap();
        let items = result.as_array().unwrap();

        assert_eq!(items.len(), 3);
        let names: Vec<_> = items.iter().map(|i| i.get("name").unwrap()).collect();
        assert_eq!(
            names,
            vec![Value::from("A"), Value::from("B"), Value::from("C")]
        );
    }

    #[test]
    fn test_iterable_root_on_iterable_object() {
        let source = Value::object(Family(vec![person("A", 1), person("B", 2)]));
        let result = dictfy(&source, &Query::each(Query::new().field("age"))).unwrap();

        assert_eq!(
            result,
            Value::Array(vec![
                entry(vec![("age", Value::Integer(1))]),
                entry(vec![("age", Value::Integer(2))]),
            ])
        );
    }

    #[test]
    fn test_iterable_root_rejects_scalar() {
        let err = dictfy(&Value::Integer(3), &Query::each(Query::new())).unwrap_err();
        assert!(matches!(err, Error::NotIterable { ref type_name } if type_name == "integer"));
    }

    // ========================================================================
    // Literal and computed fields
    // ========================================================================

    #[test]
    fn test_literal_field_ignores_source() {
        let query = Query::new().literal("name", NewField::new("override"));
        let result = dictfy(&al(), &query).unwrap();
        assert_eq!(result, entry(vec![("name", Value::from("override"))]));

        let query = Query::new().literal("nonexistent", NewField::new(true));
        let result = dictfy(&Value::Null, &query).unwrap();
        assert_eq!(result, entry(vec![("nonexistent", Value::Boolean(true))]));
    }

    #[test]
    fn test_computed_field_without_query() {
        let query = Query::new().computed(
            "child_count",
            UseObj::new(|parent| {
                let count = parent.get("children").and_then(|c| c.elements()).map_or(0, |c| c.len());
                Value::Integer(count as i64)
            }),
        );
        let result = dictfy(&al(), &query).unwrap();

        assert_eq!(result, entry(vec![("child_count", Value::Integer(2))]));
    }

    #[test]
    fn test_computed_field_with_query() {
        let eldest = UseObj::with_query(
            |parent| {
                parent
                    .get("children")
                    .and_then(|c| c.elements())
                    .and_then(|c| c.into_iter().next())
                    .unwrap_or(Value::Null)
            },
            Query::new().fields(["name", "age"]),
        );
        let query = Query::new().computed("eldest", eldest);
        let result = dictfy(&al(), &query).unwrap();

        assert_eq!(
            result,
            entry(vec![(
                "eldest",
                entry(vec![("name", Value::from("Bo")), ("age", Value::Integer(5))])
            )])
        );
    }

    #[test]
    fn test_computed_field_with_iterable_query() {
        let query = Query::new().computed(
            "kids",
            UseObj::with_query(
                |parent| parent.get("children").unwrap_or(Value::Null),
                Query::each(Query::new().field("name")),
            ),
        );
        let result = dictfy(&al(), &query).unwrap();
        let kids = result.get("kids").unwrap();

        assert_eq!(kids.as_array().map(|k| k.len()), Some(2));
    }

    #[test]
    fn test_computed_sub_query_is_validated() {
        let bad = Query::new()
            .field("name")
            .push(Node::Each(Query::new().field("x")));
        let query = Query::new().computed("me", UseObj::with_query(|p| p.clone(), bad));

        let err = dictfy(&al(), &query).unwrap_err();
        assert!(matches!(err, Error::Format { .. }));
    }

    // ========================================================================
    // Hooks
    // ========================================================================

    #[test]
    fn test_flat_hook_value_only() {
        let transformer = Transformer::new().with_flat_hook(Hook::value(|v| match v {
            Value::String(s) => Value::String(s.to_uppercase()),
            other => other,
        }));
        let result = transformer
            .transform(&al(), &Query::new().fields(["name", "age"]))
            .unwrap();

        assert_eq!(result.get("name"), Some(Value::from("AL")));
        assert_eq!(result.get("age"), Some(Value::Integer(30)));
    }

    #[test]
    fn test_flat_hook_with_parent() {
        let transformer = Transformer::new().with_flat_hook(Hook::with_parent(|v, parent| {
            match (v, parent.get("age")) {
                (Value::String(s), Some(Value::Integer(age))) => {
                    Value::String(format!("{} ({})", s, age))
                }
                (other, _) => other,
            }
        }));
        let result = transformer.transform(&al(), &Query::new().field("name")).unwrap();

        assert_eq!(result.get("name"), Some(Value::from("Al (30)")));
    }

    #[test]
    fn test_flat_hook_with_field_name() {
        let transformer = Transformer::new()
            .with_flat_hook(Hook::with_field(|_, _, field| Value::from(field)));
        let result = transformer
            .transform(&al(), &Query::new().fields(["name", "age"]))
            .unwrap();

        assert_eq!(
            result,
            entry(vec![("name", Value::from("name")), ("age", Value::from("age"))])
        );
    }

    #[test]
    fn test_flat_hook_not_applied_to_literals() {
        let transformer = Transformer::new().with_flat_hook(Hook::value(|_| Value::Null));
        let query = Query::new().literal("kind", NewField::new("person"));
        let result = transformer.transform(&al(), &query).unwrap();

        assert_eq!(result.get("kind"), Some(Value::from("person")));
    }

    #[test]
    fn test_nested_hook_replaces_object() {
        let transformer = Transformer::new().with_nested_hook(Hook::with_field(|v, _, field| {
            assert_eq!(field, "address");
            match v {
                Value::Object(_) => Value::map([("city", Value::from("Replaced"))]),
                other => other,
            }
        }));
        let query = Query::new().nested("address", Query::new().field("city"));
        let result = transformer.transform(&al(), &query).unwrap();

        assert_eq!(
            result.get("address"),
            Some(entry(vec![("city", Value::from("Replaced"))]))
        );
    }

    #[test]
    fn test_iterable_hook_filters_collection() {
        let transformer = Transformer::new().with_iterable_hook(Hook::value(|v| match v {
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .filter(|i| i.get("age") == Some(Value::Integer(5)))
                    .collect(),
            ),
            other => other,
        }));
        let query = Query::new().iterable("children", Query::new().field("name"));
        let result = transformer.transform(&al(), &query).unwrap();

        assert_eq!(
            result.get("children"),
            Some(Value::Array(vec![entry(vec![("name", Value::from("Bo"))])]))
        );
    }

    #[test]
    fn test_hooks_are_independent() {
        let flat_calls = Rc::new(Cell::new(0));
        let counter = flat_calls.clone();
        let transformer = Transformer::new().with_flat_hook(Hook::value(move |v| {
            counter.set(counter.get() + 1);
            v
        }));
        let query = Query::new()
            .field("name")
            .nested("address", Query::new().field("city"))
            .iterable("children", Query::new().field("name"));
        transformer.transform(&al(), &query).unwrap();

        // name, address.city, and the two children names
        assert_eq!(flat_calls.get(), 4);
    }

    #[test]
    fn test_hook_with_arity_dispatch() {
        let hook = Hook::with_arity("tag", 3, |args| {
            Value::String(format!(
                "{}:{}",
                args.field.unwrap_or("?"),
                args.parent.map(|p| p.type_name().to_string()).unwrap_or_default()
            ))
        })
        .unwrap();
        assert_eq!(hook.arity(), 3);

        let result = Transformer::new()
            .with_flat_hook(hook)
            .transform(&al(), &Query::new().field("age"))
            .unwrap();
        assert_eq!(result.get("age"), Some(Value::from("age:Person")));

        let hook = Hook::with_arity("plain", 1, |args| {
            assert!(args.parent.is_none() && args.field.is_none());
            args.value
        })
        .unwrap();
        assert_eq!(hook.arity(), 1);
    }

    #[test]
    fn test_hook_with_four_parameters_is_rejected() {
        let called = Rc::new(Cell::new(false));
        let flag = called.clone();
        let err = Hook::with_arity("too_many", 4, move |args| {
            flag.set(true);
            args.value
        })
        .unwrap_err();

        assert!(!called.get());
        assert!(matches!(err, Error::HookArity { ref hook, arity: 4 } if hook == "too_many"));
        assert_eq!(err.to_string(), "too_many() takes at most 3 arguments (4 given)");
    }

    #[test]
    fn test_hook_with_zero_parameters_is_rejected() {
        let err = Hook::with_arity("none", 0, |args| args.value).unwrap_err();
        assert!(matches!(err, Error::HookArity { arity: 0, .. }));
    }

    // ========================================================================
    // Lookup policies
    // ========================================================================

    #[test]
    fn test_missing_attribute_fails_by_default() {
        let err = dictfy(&al(), &Query::new().field("email")).unwrap_err();

        assert!(matches!(
            err,
            Error::AttributeNotFound { ref field, ref type_name } if field == "email" && type_name == "Person"
        ));
        assert_eq!(err.to_string(), "'Person' object has no attribute 'email'");
    }

    #[test]
    fn test_missing_nested_attribute_fails() {
        let query = Query::new().nested("employer", Query::new().field("name"));
        assert!(matches!(
            dictfy(&al(), &query),
            Err(Error::AttributeNotFound { .. })
        ));
    }

    #[test]
    fn test_missing_attribute_null_policy() {
        let transformer = Transformer::new().on_missing(Missing::Null);
        let query = Query::new()
            .field("email")
            .nested("employer", Query::new().field("name"))
            .iterable("pets", Query::new().field("name"));
        let result = transformer.transform(&al(), &query).unwrap();

        assert_eq!(
            result,
            entry(vec![
                ("email", Value::Null),
                ("employer", Value::Null),
                ("pets", Value::Null),
            ])
        );
    }

    #[test]
    fn test_missing_attribute_default_skips_hooks() {
        let transformer = Transformer::new()
            .on_missing(Missing::Default(Value::from("n/a")))
            .with_flat_hook(Hook::value(|_| Value::from("hooked")));
        let result = transformer
            .transform(&al(), &Query::new().fields(["name", "email"]))
            .unwrap();

        assert_eq!(result.get("name"), Some(Value::from("hooked")));
        assert_eq!(result.get("email"), Some(Value::from("n/a")));
    }

    #[test]
    fn test_methods_returned_as_is_by_default() {
        let result = dictfy(&al(), &Query::new().field("greeting")).unwrap();
        assert!(matches!(result.get("greeting"), Some(Value::Method(_))));
    }

    #[test]
    fn test_call_methods_invokes_callable_attributes() {
        let transformer = Transformer::new().call_methods(true);
        let result = transformer
            .transform(&al(), &Query::new().field("greeting"))
            .unwrap();

        assert_eq!(result.get("greeting"), Some(Value::from("Hi, Al")));
    }

    #[test]
    fn test_call_methods_for_nested_fields() {
        let source = Value::map([(
            "address",
            Value::method(|| Value::map([("city", Value::from("Y"))])),
        )]);
        let query = Query::new().nested("address", Query::new().field("city"));

        let result = Transformer::new()
            .call_methods(true)
            .transform(&source, &query)
            .unwrap();
        assert_eq!(
            result.get("address"),
            Some(entry(vec![("city", Value::from("Y"))]))
        );
    }

    // ========================================================================
    // Shape errors
    // ========================================================================

    #[test]
    fn test_mixed_query_is_rejected() {
        let query = Query::new()
            .field("a")
            .push(Node::Each(Query::new().field("b")));
        let err = dictfy(&al(), &query).unwrap_err();

        assert!(matches!(err, Error::Format { ref node } if node == r#"["b"]"#));
    }

    #[test]
    fn test_two_sequences_are_rejected() {
        let query = Query::from_nodes(vec![
            Node::Each(Query::new().field("a")),
            Node::Each(Query::new().field("b")),
        ]);
        let err = dictfy(&Value::Array(vec![]), &query).unwrap_err();

        assert!(matches!(err, Error::Format { ref node } if node == r#"["b"]"#));
    }

    #[test]
    fn test_nested_sub_query_is_validated_at_its_level() {
        let bad = Query::from_nodes(vec![
            Node::Each(Query::new().field("a")),
            Node::Field("b".into()),
        ]);
        let query = Query::new().field("name").nested("address", bad);
        let err = dictfy(&al(), &query).unwrap_err();

        assert!(matches!(err, Error::Format { ref node } if node == r#""b""#));
    }

    #[test]
    fn test_query_reuse_across_calls() {
        let query = Query::new()
            .field("name")
            .iterable("children", Query::new().field("age"));
        let transformer = Transformer::new();

        let first = transformer.transform(&al(), &query).unwrap();
        let second = transformer.transform(&al(), &query).unwrap();

        assert_eq!(first, second);
        assert_eq!(query.to_string(), r#"["name", {"children": [["age"]]}]"#);
    }

    // ========================================================================
    // Configuration and construction
    // ========================================================================

    #[test]
    fn test_with_hooks_and_accessors() {
        let transformer = Transformer::new()
            .with_hooks(Hooks {
                flat: Some(Hook::value(|_| Value::from("x"))),
                ..Default::default()
            })
            .on_missing(Missing::Null);

        assert_eq!(transformer.hooks().flat.as_ref().map(Hook::arity), Some(1));
        assert!(transformer.hooks().nested.is_none());
        assert!(transformer.hooks().iterable.is_none());
        assert!(!transformer.options().call_methods);
        assert_eq!(transformer.options().missing, Missing::Null);

        let result = transformer
            .transform(&al(), &Query::new().fields(["name", "email"]))
            .unwrap();
        assert_eq!(
            result,
            entry(vec![("name", Value::from("x")), ("email", Value::Null)])
        );
    }

    #[test]
    fn test_with_options_call_methods_on_map_source() {
        let source = Value::map([("count", Value::method(|| Value::Integer(7)))]);
        let query = Query::new().field("count");

        let called = Transformer::new()
            .with_options(Options {
                call_methods: true,
                ..Default::default()
            })
            .transform(&source, &query)
            .unwrap();
        assert_eq!(called.get("count"), Some(Value::Integer(7)));

        let raw = Transformer::new().transform(&source, &query).unwrap();
        assert_eq!(raw.get("count"), source.get("count"));
    }

    #[test]
    fn test_query_from_iterator_and_node_from_str() {
        let collected: Query = ["name", "age"].into_iter().collect();
        let pushed = Query::new().push(Node::from("name")).push(Node::from("age"));

        assert_eq!(collected.to_string(), r#"["name", "age"]"#);
        assert_eq!(collected.to_string(), pushed.to_string());
        assert_eq!(
            dictfy(&al(), &collected).unwrap(),
            dictfy(&al(), &pushed).unwrap()
        );
    }

    // ========================================================================
    // Borrowed lookups
    // ========================================================================

    #[test]
    fn test_attr_borrows_map_entries() {
        use std::borrow::Cow;

        let source = Value::map([("inner", Value::map([("city", Value::from("X"))]))]);
        let attr = source.attr("inner").unwrap();

        assert!(matches!(attr, Cow::Borrowed(_)));
        assert!(std::ptr::eq(attr.as_ref(), &source.as_map().unwrap()["inner"]));
        assert!(matches!(al().attr("name"), Some(Cow::Owned(_))));
        assert!(source.attr("missing").is_none());
    }

    #[test]
    fn test_iter_elements_borrows_arrays() {
        use std::borrow::Cow;

        let source = Value::Array(vec![person("A", 1), person("B", 2)]);
        let items = source.iter_elements().unwrap();

        assert!(matches!(items, Cow::Borrowed(_)));
        assert_eq!(items.len(), 2);

        let family = Value::object(Family(vec![person("C", 3)]));
        assert!(matches!(family.iter_elements(), Some(Cow::Owned(_))));
        assert!(Value::Integer(1).iter_elements().is_none());
    }
}
