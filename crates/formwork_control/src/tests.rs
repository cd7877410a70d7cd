//! Scenario tests for the control tree
//!
//! These drive full prepare/load/validate passes over small trees, the way
//! the submission controller does: whitelisting, change sparsity,
//! immutability, cleaner reshaping, cross-branch option filtering, and
//! bottom-up validation gating.

use std::cell::Cell;
use std::rc::Rc;

use formwork_value::path::PathError;
use formwork_value::{ChangedMap, Mark, MarkMap, Value, ValueMap};
use formwork_walker::{LoadWalker, PrepareWalker};

use crate::{CompoundControl, Control, LeafControl};

fn raw(entries: &[(&str, Value)]) -> ValueMap {
    entries
        .iter()
        .map(|(key, value)| ((*key).to_string(), value.clone()))
        .collect()
}

/// Prepares and loads a transparent root over the given submission.
fn load(root: &mut CompoundControl, submitted: ValueMap) -> (ValueMap, ChangedMap) {
    root.prepare(&PrepareWalker::new());
    let mut walker = LoadWalker::new(submitted);
    root.load(&mut walker).expect("load should succeed");
    walker.into_parts()
}

fn leaf_mark(name: &str) -> MarkMap {
    let mut map = MarkMap::new();
    map.insert(name.to_string(), Mark::Leaf);
    map
}

#[test]
fn undeclared_raw_keys_never_enter_the_whitelist() {
    let mut root = CompoundControl::new("").child(LeafControl::new("declared"));

    let (values, _) = load(
        &mut root,
        raw(&[
            ("declared", Value::from("kept")),
            ("smuggled", Value::from("dropped")),
        ]),
    );

    assert_eq!(values.get("declared"), Some(&Value::from("kept")));
    assert_eq!(values.get("smuggled"), None);
}

#[test]
fn resubmitting_preset_values_changes_nothing() {
    let mut root = CompoundControl::new("").child(
        CompoundControl::new("address")
            .child(LeafControl::new("street").with_value("High Street"))
            .child(LeafControl::new("city").with_value("Delft")),
    );

    let (values, changed) = load(
        &mut root,
        raw(&[(
            "address",
            Value::Map(raw(&[
                ("street", Value::from("High Street")),
                ("city", Value::from("Delft")),
            ])),
        )]),
    );

    assert_eq!(changed, ChangedMap::new());
    let address = values
        .get("address")
        .and_then(Value::as_map)
        .expect("address branch should be whitelisted");
    assert_eq!(address.get("street"), Some(&Value::from("High Street")));
}

#[test]
fn changed_leaves_surface_through_their_branch() {
    let mut root = CompoundControl::new("").child(
        CompoundControl::new("address")
            .child(LeafControl::new("street").with_value("High Street"))
            .child(LeafControl::new("city").with_value("Delft")),
    );

    let (_, changed) = load(
        &mut root,
        raw(&[(
            "address",
            Value::Map(raw(&[
                ("street", Value::from("Low Street")),
                ("city", Value::from("Delft")),
            ])),
        )]),
    );

    let mut expected = ChangedMap::new();
    expected.insert("address".to_string(), Mark::Branch(leaf_mark("street")));
    assert_eq!(changed, expected);
}

#[test]
fn immutable_leaves_discard_submitted_values() {
    let mut root = CompoundControl::new("")
        .child(LeafControl::new("role").with_value("viewer").immutable());

    let (values, changed) = load(&mut root, raw(&[("role", Value::from("admin"))]));

    assert_eq!(values.get("role"), Some(&Value::from("viewer")));
    assert_eq!(changed, ChangedMap::new());
}

#[test]
fn missing_submission_nulls_a_mutable_leaf() {
    let mut root = CompoundControl::new("").child(LeafControl::new("note").with_value("draft"));

    let (values, changed) = load(&mut root, ValueMap::new());

    assert_eq!(values.get("note"), Some(&Value::Null));
    assert_eq!(changed, leaf_mark("note"));
}

#[test]
fn map_where_scalar_expected_is_discarded() {
    let mut root = CompoundControl::new("").child(LeafControl::new("note"));

    let (values, _) = load(
        &mut root,
        raw(&[("note", Value::Map(raw(&[("sneaky", Value::from("x"))])))]),
    );

    assert_eq!(values.get("note"), Some(&Value::Null));
}

#[test]
fn transparent_compounds_flatten_into_the_parent_scope() {
    let mut root = CompoundControl::new("").child(
        CompoundControl::new("")
            .child(LeafControl::new("street").with_value("High Street")),
    );

    let (values, changed) = load(&mut root, raw(&[("street", Value::from("Low Street"))]));

    assert_eq!(values.get("street"), Some(&Value::from("Low Street")));
    assert_eq!(changed, leaf_mark("street"));
}

#[test]
fn cleaners_split_composite_raw_keys_before_children_read() {
    let mut root = CompoundControl::new("")
        .cleaner(|input: ValueMap| {
            let mut out = ValueMap::new();
            if let Some(joined) = input.get("A/B").and_then(Value::as_str)
                && let Some((a, b)) = joined.split_once('/')
            {
                out.insert("A".to_string(), Value::from(a));
                out.insert("B".to_string(), Value::from(b));
            }
            out
        })
        .child(LeafControl::new("A").with_value("a"))
        .child(LeafControl::new("B").with_value("b"));

    let (values, changed) = load(&mut root, raw(&[("A/B", Value::from("a/c"))]));

    assert_eq!(values.get("A"), Some(&Value::from("a")));
    assert_eq!(values.get("B"), Some(&Value::from("c")));
    assert_eq!(values.get("A/B"), None);
    assert_eq!(changed, leaf_mark("B"));
}

fn country_options(raw: &Value, _walker: &LoadWalker) -> Result<Value, PathError> {
    Ok(match raw.as_str() {
        Some("USA" | "NED") => raw.clone(),
        _ => Value::Null,
    })
}

fn state_options(raw: &Value, walker: &LoadWalker) -> Result<Value, PathError> {
    let country = walker.whitelist_value_by_path("/country/abbreviation")?;
    let allowed: &[&str] = match country.as_str() {
        Some("NED") => &["ZH", "NH", "UT"],
        Some("USA") => &["CA", "NY", "TX"],
        _ => &[],
    };

    Ok(match raw.as_str() {
        Some(code) if allowed.contains(&code) => raw.clone(),
        _ => Value::Null,
    })
}

fn country_state_form() -> CompoundControl {
    CompoundControl::new("")
        .child(
            CompoundControl::new("country")
                .child(LeafControl::new("abbreviation").formatter(country_options)),
        )
        .child(
            CompoundControl::new("state")
                .child(LeafControl::new("abbreviation").formatter(state_options)),
        )
}

#[test]
fn dependent_options_accept_values_valid_for_the_loaded_sibling() {
    let mut root = country_state_form();

    let (values, _) = load(
        &mut root,
        raw(&[
            ("country", Value::Map(raw(&[("abbreviation", Value::from("NED"))]))),
            ("state", Value::Map(raw(&[("abbreviation", Value::from("ZH"))]))),
        ]),
    );

    let state = values
        .get("state")
        .and_then(Value::as_map)
        .expect("state branch should be whitelisted");
    assert_eq!(state.get("abbreviation"), Some(&Value::from("ZH")));
}

#[test]
fn dependent_options_filter_values_outside_the_sibling_option_set() {
    let mut root = country_state_form();

    let (values, _) = load(
        &mut root,
        raw(&[
            ("country", Value::Map(raw(&[("abbreviation", Value::from("USA"))]))),
            ("state", Value::Map(raw(&[("abbreviation", Value::from("ZH"))]))),
        ]),
    );

    let state = values
        .get("state")
        .and_then(Value::as_map)
        .expect("state branch should be whitelisted");
    assert_eq!(state.get("abbreviation"), Some(&Value::Null));
}

#[test]
fn formatter_referencing_a_missing_branch_aborts_the_load() {
    let mut root = CompoundControl::new("")
        .child(LeafControl::new("dependent").formatter(
            |_raw: &Value, walker: &LoadWalker| {
                walker.whitelist_value_by_path("/does-not-exist")
            },
        ));

    root.prepare(&PrepareWalker::new());
    let mut walker = LoadWalker::new(ValueMap::new());
    let error = root
        .load(&mut walker)
        .expect_err("a dangling branch reference should fail the load");
    assert_eq!(error.branch(), "does-not-exist");
}

fn required(value: &Value) -> Result<(), String> {
    if value.is_null() {
        Err("a value is required".to_string())
    } else {
        Ok(())
    }
}

#[test]
fn all_leaf_validators_run_and_all_messages_collect() {
    let mut root = CompoundControl::new("").child(
        LeafControl::new("age")
            .validator(required)
            .validator(|value: &Value| {
                if value.as_int().is_some() {
                    Ok(())
                } else {
                    Err("a number is required".to_string())
                }
            }),
    );

    load(&mut root, ValueMap::new());
    let (valid, mark) = root.validate();

    assert!(!valid);
    assert_eq!(mark, Some(Mark::Branch(leaf_mark("age"))));
    let age = root.get("age").expect("age control should exist");
    assert_eq!(
        age.error_messages(),
        ["a value is required", "a number is required"]
    );
}

#[test]
fn failing_descendants_suppress_compound_validators() {
    let ran = Rc::new(Cell::new(false));
    let observer = Rc::clone(&ran);

    let mut root = CompoundControl::new("").child(
        CompoundControl::new("range")
            .child(LeafControl::new("min").validator(required))
            .child(LeafControl::new("max"))
            .compound_validator(move |_values: &ValueMap| {
                observer.set(true);
                Ok::<(), String>(())
            }),
    );

    load(&mut root, ValueMap::new());
    let (valid, mark) = root.validate();

    assert!(!valid);
    assert!(!ran.get(), "compound validators should be skipped");
    let mut expected = MarkMap::new();
    expected.insert("range".to_string(), Mark::Branch(leaf_mark("min")));
    assert_eq!(mark, Some(Mark::Branch(expected)));
}

#[test]
fn passing_descendants_let_compound_validators_decide() {
    let mut root = CompoundControl::new("").child(
        CompoundControl::new("range")
            .child(LeafControl::new("min"))
            .child(LeafControl::new("max"))
            .compound_validator(|values: &ValueMap| {
                let min = values.get("min").and_then(Value::as_int);
                let max = values.get("max").and_then(Value::as_int);
                if min <= max {
                    Ok(())
                } else {
                    Err("the bounds are inverted".to_string())
                }
            }),
    );

    load(
        &mut root,
        raw(&[(
            "range",
            Value::Map(raw(&[("min", Value::Int(9)), ("max", Value::Int(3))])),
        )]),
    );
    let (valid, mark) = root.validate();

    assert!(!valid);
    // the branch failed in its own right; no descendant is marked
    let mut expected = MarkMap::new();
    expected.insert("range".to_string(), Mark::Branch(MarkMap::new()));
    assert_eq!(mark, Some(Mark::Branch(expected)));

    let range = root
        .get("range")
        .expect("range control should exist");
    assert_eq!(range.error_messages(), ["the bounds are inverted"]);
}

#[test]
fn revalidation_resets_collected_messages() {
    let mut root = CompoundControl::new("").child(LeafControl::new("note").validator(required));

    load(&mut root, ValueMap::new());
    let (valid, _) = root.validate();
    assert!(!valid);

    root.get_mut("note")
        .and_then(Control::as_leaf_mut)
        .expect("note control should exist")
        .set_value("filled in");
    let (valid, mark) = root.validate();

    assert!(valid);
    assert_eq!(mark, None);
    let note = root.get("note").expect("note control should exist");
    assert_eq!(note.error_messages(), [] as [&str; 0]);
}

#[test]
fn prepare_assigns_hierarchical_submit_keys() {
    let mut root = CompoundControl::new("").child(
        CompoundControl::new("address")
            .child(CompoundControl::new("").child(LeafControl::new("street"))),
    );

    root.prepare(&PrepareWalker::new());

    let street = root
        .get("address")
        .and_then(Control::as_compound)
        .and_then(|address| address.children().first())
        .and_then(Control::as_compound)
        .and_then(|transparent| transparent.get("street"))
        .expect("street control should exist");
    assert_eq!(street.submit_key(), "address.street");
}
