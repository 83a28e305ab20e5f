//! Tests for the reshaping engine
//!
//! Covers template expansion, list resolution, the post-processing stages and
//! failure propagation through the top-level transform call.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use super::transform;
use crate::error::Error;
use crate::mapping::{MappingSpec, MappingSpecBuilder, MappingTemplate};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn full_name_spec() -> MappingSpecBuilder {
    MappingSpecBuilder::new()
        .list("users")
        .item(MappingTemplate::template([("fullName", MappingTemplate::path("name"))]))
        .default_value("fullName", json!("Unknown"))
}

fn append_marker(marker: &'static str) -> impl Fn(Option<&Value>, &Value) -> crate::Result<Value> {
    move |value, _| {
        let current = value.and_then(Value::as_str).unwrap_or_default();
        Ok(Value::String(format!("{}{}", current, marker)))
    }
}

#[test]
fn test_list_with_template_and_default() {
    let spec = full_name_spec().build();
    let input = json!({"users": [{"name": "Ann", "age": 30}]});
    assert_eq!(transform(&input, &spec, &Value::Null).unwrap(), json!([{"fullName": "Ann"}]));
}

#[test]
fn test_missing_field_uses_default() {
    let spec = full_name_spec().build();
    let input = json!({"users": [{"age": 30}]});
    assert_eq!(transform(&input, &spec, &Value::Null).unwrap(), json!([{"fullName": "Unknown"}]));
}

#[test]
fn test_remove_after_default() {
    let spec = full_name_spec().remove(["fullName"]).build();
    let input = json!({"users": [{"name": "Ann", "age": 30}]});
    assert_eq!(transform(&input, &spec, &Value::Null).unwrap(), json!([{}]));
}

#[test]
fn test_missing_field_without_default_is_omitted() {
    let spec = MappingSpecBuilder::new()
        .item(MappingTemplate::template([
            ("id", MappingTemplate::path("id")),
            ("email", MappingTemplate::path("contact.email")),
        ]))
        .build();
    let output = transform(&json!({"id": 7}), &spec, &Value::Null).unwrap();
    assert_eq!(output, json!({"id": 7}));
    assert!(output.get("email").is_none());
}

#[test]
fn test_stored_null_is_copied() {
    let spec = MappingSpecBuilder::new()
        .item(MappingTemplate::template([("nick", MappingTemplate::path("nickname"))]))
        .default_value("nick", json!("none"))
        .build();
    let output = transform(&json!({"nickname": null}), &spec, &Value::Null).unwrap();
    assert_eq!(output, json!({"nick": null}));
}

#[test]
fn test_empty_list_skips_every_stage() {
    let calls = Arc::new(AtomicUsize::new(0));
    let operate_calls = Arc::clone(&calls);
    let each_calls = Arc::clone(&calls);
    let spec = full_name_spec()
        .operate("fullName", move |v, _| {
            operate_calls.fetch_add(1, Ordering::SeqCst);
            Ok(v.cloned().unwrap_or(Value::Null))
        })
        .each(move |_| {
            each_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .remove(["fullName"])
        .build();

    for input in [json!({"users": []}), json!({"accounts": [1, 2]}), json!({"users": "x"})] {
        assert_eq!(transform(&input, &spec, &Value::Null).unwrap(), json!([]));
    }
    assert_eq!(transform(&json!([]), &MappingSpec::new(), &Value::Null).unwrap(), json!([]));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_single_record_input_returns_single_record() {
    let spec = MappingSpecBuilder::new()
        .item(MappingTemplate::template([("title", MappingTemplate::path("name"))]))
        .build();
    let output = transform(&json!({"name": "Widget"}), &spec, &Value::Null).unwrap();
    assert_eq!(output, json!({"title": "Widget"}));
}

#[test]
fn test_array_input_returns_list_of_same_length() {
    let spec = MappingSpecBuilder::new()
        .item(MappingTemplate::template([("title", MappingTemplate::path("name"))]))
        .build();
    let input = json!([{"name": "a"}, {"name": "b"}, {}]);
    let output = transform(&input, &spec, &Value::Null).unwrap();
    assert_eq!(output, json!([{"title": "a"}, {"title": "b"}, {}]));
}

#[test]
fn test_single_element_array_stays_a_list() {
    let output = transform(&json!([{"a": 1}]), &MappingSpec::new(), &Value::Null).unwrap();
    assert_eq!(output, json!([{"a": 1}]));
}

#[test]
fn test_without_item_records_pass_through() {
    let input = json!({"rows": [{"a": 1, "b": 2}, {"a": 3}]});
    let spec = MappingSpecBuilder::new().list("rows").build();
    assert_eq!(
        transform(&input, &spec, &Value::Null).unwrap(),
        json!([{"a": 1, "b": 2}, {"a": 3}])
    );
}

#[test]
fn test_nested_templates_and_groups() {
    let spec = MappingSpecBuilder::new()
        .item(MappingTemplate::template([
            ("id", MappingTemplate::path("uuid")),
            (
                "location",
                MappingTemplate::template([
                    ("city", MappingTemplate::path("address.city")),
                    ("zip", MappingTemplate::path("address.zip")),
                ]),
            ),
            (
                "names",
                MappingTemplate::group([
                    MappingTemplate::path("first"),
                    MappingTemplate::path("middle"),
                    MappingTemplate::path("last"),
                ]),
            ),
            ("empty", MappingTemplate::group(Vec::new())),
        ]))
        .build();
    let input = json!({
        "uuid": "u-1",
        "first": "Ada",
        "last": "Lovelace",
        "address": {"city": "London"}
    });
    assert_eq!(
        transform(&input, &spec, &Value::Null).unwrap(),
        json!({
            "id": "u-1",
            "location": {"city": "London"},
            "names": ["Ada", null, "Lovelace"],
            "empty": []
        })
    );
}

#[test]
fn test_group_of_templates() {
    let spec = MappingSpecBuilder::new()
        .item(MappingTemplate::template([(
            "parts",
            MappingTemplate::group([
                MappingTemplate::template([("v", MappingTemplate::path("a"))]),
                MappingTemplate::group([MappingTemplate::path("b")]),
            ]),
        )]))
        .build();
    let output = transform(&json!({"a": 1, "b": 2}), &spec, &Value::Null).unwrap();
    assert_eq!(output, json!({"parts": [{"v": 1}, [2]]}));
}

#[test]
fn test_top_level_path_item_copies_value() {
    let spec = MappingSpecBuilder::new()
        .list("users")
        .item(MappingTemplate::path("name"))
        .build();
    let input = json!({"users": [{"name": "Ann"}, {}]});
    assert_eq!(transform(&input, &spec, &Value::Null).unwrap(), json!(["Ann", null]));
}

#[test]
fn test_malformed_entries_become_empty_strings() {
    let spec = MappingSpecBuilder::new()
        .item(MappingTemplate::template([
            ("ok", MappingTemplate::path("a")),
            ("bad", MappingTemplate::Malformed),
        ]))
        .build();
    let output = transform(&json!({"a": 1}), &spec, &Value::Null).unwrap();
    assert_eq!(output, json!({"ok": 1, "bad": ""}));
}

#[test]
fn test_malformed_outside_record_field_becomes_empty_record() {
    let grouped = MappingSpecBuilder::new()
        .item(MappingTemplate::template([(
            "g",
            MappingTemplate::group([MappingTemplate::Malformed, MappingTemplate::path("a")]),
        )]))
        .build();
    let output = transform(&json!({"a": 1}), &grouped, &Value::Null).unwrap();
    assert_eq!(output, json!({"g": [{}, 1]}));

    let top_level = MappingSpecBuilder::new().item(MappingTemplate::Malformed).build();
    assert_eq!(transform(&json!({"a": 1}), &top_level, &Value::Null).unwrap(), json!({}));
}

#[test]
fn test_output_keeps_template_field_order() {
    let spec = MappingSpecBuilder::new()
        .item(MappingTemplate::template([
            ("zeta", MappingTemplate::path("a")),
            ("alpha", MappingTemplate::path("b")),
            ("mid", MappingTemplate::path("c")),
        ]))
        .build();
    let output = transform(&json!({"a": 1, "b": 2, "c": 3}), &spec, &Value::Null).unwrap();
    let keys: Vec<&str> = output.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_falsy_item_reads_from_input_root() {
    let spec = MappingSpecBuilder::new()
        .list("rows")
        .item(MappingTemplate::template([("source", MappingTemplate::path("meta.source"))]))
        .build();
    let input = json!({"rows": [null, 0], "meta": {"source": "api"}});
    assert_eq!(
        transform(&input, &spec, &Value::Null).unwrap(),
        json!([{"source": "api"}, {"source": "api"}])
    );
}

#[test]
fn test_falsy_intermediate_short_circuits_to_default() {
    // A falsy intermediate (here `0`) ends traversal exactly like a missing key.
    let spec = MappingSpecBuilder::new()
        .item(MappingTemplate::template([("city", MappingTemplate::path("address.city"))]))
        .default_value("city", json!("n/a"))
        .build();
    for address in [json!(0), json!(""), json!(false)] {
        let output = transform(&json!({ "address": address }), &spec, &Value::Null).unwrap();
        assert_eq!(output, json!({"city": "n/a"}));
    }
}

#[test]
fn test_operate_entries_apply_in_declaration_order() {
    let spec = MappingSpecBuilder::new()
        .operate("tag", append_marker("-first"))
        .operate("tag", append_marker("-second"))
        .build();
    let input = json!([{"tag": "a"}, {"tag": "b"}]);
    assert_eq!(
        transform(&input, &spec, &Value::Null).unwrap(),
        json!([{"tag": "a-first-second"}, {"tag": "b-first-second"}])
    );
}

#[test]
fn test_operate_is_column_major() {
    let calls: Arc<Mutex<Vec<(usize, String)>>> = Arc::new(Mutex::new(Vec::new()));
    let first = Arc::clone(&calls);
    let second = Arc::clone(&calls);
    let spec = MappingSpecBuilder::new()
        .operate("id", move |v, _| {
            first.lock().unwrap().push((1, v.unwrap().to_string()));
            Ok(v.cloned().unwrap_or(Value::Null))
        })
        .operate("id", move |v, _| {
            second.lock().unwrap().push((2, v.unwrap().to_string()));
            Ok(v.cloned().unwrap_or(Value::Null))
        })
        .build();

    transform(&json!([{"id": 1}, {"id": 2}]), &spec, &Value::Null).unwrap();

    let order: Vec<(usize, String)> = calls.lock().unwrap().clone();
    assert_eq!(
        order,
        vec![
            (1, "1".to_string()),
            (1, "2".to_string()),
            (2, "1".to_string()),
            (2, "2".to_string()),
        ]
    );
}

#[test]
fn test_operate_receives_context_and_writes_nested_paths() {
    let spec = MappingSpecBuilder::new()
        .operate("meta.tenant", |_, ctx| Ok(ctx["tenant"].clone()))
        .build();
    let context = json!({"tenant": "acme"});
    let output = transform(&json!({"id": 1}), &spec, &context).unwrap();
    assert_eq!(output, json!({"id": 1, "meta": {"tenant": "acme"}}));
}

#[test]
fn test_operate_sees_missing_value_without_defaults() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let spec = MappingSpecBuilder::new()
        .default_value("score", json!(10))
        .operate("score", move |v, _| {
            sink.lock().unwrap().push(v.cloned());
            Ok(json!(0))
        })
        .build();
    let output = transform(&json!({"id": 1}), &spec, &Value::Null).unwrap();
    assert_eq!(output, json!({"id": 1, "score": 0}));
    assert_eq!(*seen.lock().unwrap(), vec![None]);
}

#[test]
fn test_each_runs_after_operate_and_before_remove() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let spec = MappingSpecBuilder::new()
        .list("items")
        .operate("name", append_marker("!"))
        .each(move |item| {
            sink.lock().unwrap().push((item.index, item.list.len(), item.record().clone()));
            Ok(())
        })
        .remove(["secret"])
        .build();
    let input = json!({"items": [{"name": "a", "secret": 1}, {"name": "b", "secret": 2}]});

    let output = transform(&input, &spec, &Value::Null).unwrap();

    assert_eq!(output, json!([{"name": "a!"}, {"name": "b!"}]));
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            (0, 2, json!({"name": "a!", "secret": 1})),
            (1, 2, json!({"name": "b!", "secret": 2})),
        ]
    );
}

#[test]
fn test_each_can_update_records_and_read_inputs() {
    let spec = MappingSpecBuilder::new()
        .list("items")
        .each(|mut item| {
            let position = json!(item.index);
            let source = item.data["source"].clone();
            let run = item.context["run"].clone();
            let record = item.record_mut();
            record["position"] = position;
            record["source"] = source;
            record["run"] = run;
            Ok(())
        })
        .build();
    let input = json!({"source": "feed", "items": [{}, {}]});
    let output = transform(&input, &spec, &json!({"run": 3})).unwrap();
    assert_eq!(
        output,
        json!([
            {"position": 0, "source": "feed", "run": 3},
            {"position": 1, "source": "feed", "run": 3}
        ])
    );
}

#[test]
fn test_remove_leaves_other_fields_untouched() {
    let spec = MappingSpecBuilder::new().remove(["b", "missing"]).build();
    let input = json!([{"a": 1, "b": 2, "c": 3}, {"b": 4}, "scalar"]);
    assert_eq!(
        transform(&input, &spec, &Value::Null).unwrap(),
        json!([{"a": 1, "c": 3}, {}, "scalar"])
    );
}

#[test]
fn test_remove_is_by_top_level_name() {
    let spec = MappingSpecBuilder::new().remove(["a.b"]).build();
    let input = json!({"a": {"b": 1}, "a.b": 2});
    assert_eq!(transform(&input, &spec, &Value::Null).unwrap(), json!({"a": {"b": 1}}));
}

#[test]
fn test_transform_error_propagates_unchanged() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let spec = MappingSpecBuilder::new()
        .operate("n", move |v, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            match v.and_then(Value::as_i64) {
                Some(n) if n < 0 => Err(Error::callback(format!("negative value {}", n))),
                _ => Ok(json!(1)),
            }
        })
        .each(|_| panic!("each must not run after a failed operate"))
        .build();

    let err = transform(&json!([{"n": 1}, {"n": -5}, {"n": 2}]), &spec, &Value::Null).unwrap_err();

    match err {
        Error::Callback { message, source } => {
            assert_eq!(message, "negative value -5");
            assert!(source.is_none());
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_each_error_aborts_the_call() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let spec = MappingSpecBuilder::new()
        .each(move |item| {
            counter.fetch_add(1, Ordering::SeqCst);
            if item.index == 1 {
                return Err(Error::callback_with("audit failed", anyhow::anyhow!("disk full")));
            }
            Ok(())
        })
        .build();

    let err = transform(&json!([{}, {}, {}]), &spec, &Value::Null).unwrap_err();
    assert_eq!(err.to_string(), "Callback failed: audit failed");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_spec_is_reusable_across_calls() {
    let spec = full_name_spec().build();
    let first = transform(&json!({"users": [{"name": "Ann"}]}), &spec, &Value::Null).unwrap();
    let second = transform(&json!({"users": [{"name": "Bob"}, {}]}), &spec, &Value::Null).unwrap();
    assert_eq!(first, json!([{"fullName": "Ann"}]));
    assert_eq!(second, json!([{"fullName": "Bob"}, {"fullName": "Unknown"}]));
}

#[test]
fn test_apply_matches_transform() {
    let spec = full_name_spec().build();
    let input = json!({"users": [{"name": "Ann"}]});
    assert_eq!(
        spec.apply(&input, &Value::Null).unwrap(),
        transform(&input, &spec, &Value::Null).unwrap()
    );
}
