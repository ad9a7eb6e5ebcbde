// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Exclusion policy exercised through the engine: version bounds, modifier
//! masks, expose mode, and per-call strategies.

mod common;

use std::sync::Arc;

use jsonbind::{
    modifiers, Annotation, BindValue, ClassSpec, ExclusionStrategy, Instance, JsonBind, Property,
    PropertySpec,
};

fn versioned_class() -> ClassSpec {
    ClassSpec::new("Payload")
        .property(PropertySpec::new("stable").with_type("string"))
        .property(
            PropertySpec::new("windowed")
                .with_type("string")
                .annotate(Annotation::Since("2.0".to_string()))
                .annotate(Annotation::Until("3.0".to_string())),
        )
}

fn payload() -> BindValue {
    let mut instance = Instance::new("Payload");
    instance.set("stable", BindValue::from("s"));
    instance.set("windowed", BindValue::from("w"));
    BindValue::Object(instance)
}

fn engine_at(version: &str) -> JsonBind {
    JsonBind::builder()
        .version(version)
        .register_class(versioned_class())
        .build()
        .unwrap()
}

#[test]
fn test_version_window_both_directions() {
    let cases = [
        ("1.9", false),
        ("2.0", true),
        ("2.9", true),
        ("3.0", false),
        ("3.1", false),
    ];
    let json = r#"{"stable": "s", "windowed": "w"}"#;

    for (version, included) in cases {
        let engine = engine_at(version);

        let out = engine.to_json(&payload()).unwrap();
        assert_eq!(
            out.contains("windowed"),
            included,
            "serialization at version {version}"
        );

        let back = engine.from_json(json, "Payload").unwrap();
        let expected = if included {
            BindValue::from("w")
        } else {
            BindValue::Null
        };
        assert_eq!(
            back.as_object().unwrap().get("windowed"),
            Some(&expected),
            "deserialization at version {version}"
        );
    }
}

#[test]
fn test_no_version_includes_windowed_members() {
    let engine = JsonBind::builder()
        .register_class(versioned_class())
        .build()
        .unwrap();
    assert!(engine.to_json(&payload()).unwrap().contains("windowed"));
}

#[test]
fn test_modifier_mask_excludes_property() {
    let engine = JsonBind::builder()
        .register_class(
            ClassSpec::new("Payload")
                .property(PropertySpec::new("visible").with_type("string"))
                .property(
                    PropertySpec::new("internal")
                        .with_type("string")
                        .with_modifiers(modifiers::PRIVATE),
                ),
        )
        .excluded_modifiers(modifiers::STATIC | modifiers::PRIVATE)
        .build()
        .unwrap();

    let mut instance = Instance::new("Payload");
    instance.set("visible", BindValue::from("v"));
    instance.set("internal", BindValue::from("i"));

    let json = engine.to_json(&BindValue::Object(instance)).unwrap();
    assert_eq!(json, r#"{"visible":"v"}"#);
}

#[test]
fn test_modifier_mask_beats_expose_annotation() {
    let engine = JsonBind::builder()
        .register_class(
            ClassSpec::new("Payload").property(
                PropertySpec::new("pinned")
                    .with_type("string")
                    .with_modifiers(modifiers::STATIC)
                    .annotate(Annotation::expose()),
            ),
        )
        .require_expose(true)
        .build()
        .unwrap();

    let mut instance = Instance::new("Payload");
    instance.set("pinned", BindValue::from("x"));
    assert_eq!(engine.to_json(&BindValue::Object(instance)).unwrap(), "{}");
}

#[test]
fn test_require_expose_mode() {
    let spec = || {
        ClassSpec::new("Payload")
            .property(
                PropertySpec::new("open")
                    .with_type("string")
                    .annotate(Annotation::expose()),
            )
            .property(PropertySpec::new("bare").with_type("string"))
    };

    let mut instance = Instance::new("Payload");
    instance.set("open", BindValue::from("o"));
    instance.set("bare", BindValue::from("b"));
    let value = BindValue::Object(instance);

    let relaxed = JsonBind::builder()
        .register_class(spec())
        .build()
        .unwrap();
    assert_eq!(
        relaxed.to_json(&value).unwrap(),
        r#"{"open":"o","bare":"b"}"#
    );

    let strict = JsonBind::builder()
        .register_class(spec())
        .require_expose(true)
        .build()
        .unwrap();
    assert_eq!(strict.to_json(&value).unwrap(), r#"{"open":"o"}"#);
}

#[test]
fn test_exclude_annotation_is_directional() {
    let engine = JsonBind::builder()
        .register_class(
            ClassSpec::new("Payload")
                .property(PropertySpec::new("id").with_type("int"))
                .property(
                    PropertySpec::new("secret")
                        .with_type("string")
                        .annotate(Annotation::Exclude {
                            serialize: true,
                            deserialize: false,
                        }),
                ),
        )
        .build()
        .unwrap();

    let back = engine
        .from_json(r#"{"id": 1, "secret": "in"}"#, "Payload")
        .unwrap();
    assert_eq!(
        back.as_object().unwrap().get("secret"),
        Some(&BindValue::from("in"))
    );

    let json = engine.to_json(&back).unwrap();
    assert!(!json.contains("secret"));
}

#[test]
fn test_strategy_exclusion_is_per_direction() {
    struct SkipSecret;
    impl ExclusionStrategy for SkipSecret {
        fn should_skip_property(&self, property: &Property) -> bool {
            property.real_name() == "secret"
        }
    }

    let build = |serialization, deserialization| {
        JsonBind::builder()
            .register_class(
                ClassSpec::new("Payload")
                    .property(PropertySpec::new("id").with_type("int"))
                    .property(PropertySpec::new("secret").with_type("string")),
            )
            .add_exclusion_strategy(Arc::new(SkipSecret), serialization, deserialization)
            .build()
            .unwrap()
    };

    let mut instance = Instance::new("Payload");
    instance.set("id", BindValue::Integer(1));
    instance.set("secret", BindValue::from("s"));
    let value = BindValue::Object(instance);

    let serialize_only = build(true, false);
    assert_eq!(serialize_only.to_json(&value).unwrap(), r#"{"id":1}"#);
    let back = serialize_only
        .from_json(r#"{"id": 1, "secret": "s"}"#, "Payload")
        .unwrap();
    assert_eq!(
        back.as_object().unwrap().get("secret"),
        Some(&BindValue::from("s"))
    );

    let deserialize_only = build(false, true);
    assert!(deserialize_only.to_json(&value).unwrap().contains("secret"));
    let back = deserialize_only
        .from_json(r#"{"id": 1, "secret": "s"}"#, "Payload")
        .unwrap();
    assert_eq!(back.as_object().unwrap().get("secret"), Some(&BindValue::Null));
}

#[test]
fn test_strategy_excluded_property_keeps_null_slot_when_serializing_nulls() {
    struct SkipSecret;
    impl ExclusionStrategy for SkipSecret {
        fn should_skip_property(&self, property: &Property) -> bool {
            property.real_name() == "secret"
        }
    }

    let engine = JsonBind::builder()
        .register_class(
            ClassSpec::new("Payload")
                .property(PropertySpec::new("id").with_type("int"))
                .property(PropertySpec::new("secret").with_type("string")),
        )
        .add_exclusion_strategy(Arc::new(SkipSecret), true, false)
        .serialize_nulls(true)
        .build()
        .unwrap();

    let mut instance = Instance::new("Payload");
    instance.set("id", BindValue::Integer(1));
    instance.set("secret", BindValue::from("s"));

    assert_eq!(
        engine.to_json(&BindValue::Object(instance)).unwrap(),
        r#"{"id":1,"secret":null}"#
    );
}

#[test]
fn test_class_level_strategy_suppresses_whole_object_as_null() {
    struct SkipAddress;
    impl ExclusionStrategy for SkipAddress {
        fn should_skip_class(&self, class: &jsonbind::ClassMetadata) -> bool {
            class.name() == "Address"
        }
    }

    let engine = common::engine_builder()
        .add_exclusion_strategy(Arc::new(SkipAddress), true, true)
        .serialize_nulls(true)
        .build()
        .unwrap();

    let json = engine.to_json(&common::sample_user()).unwrap();
    assert!(json.contains(r#""address":null"#));

    // Deserialization skips the excluded class without failing.
    let back = engine.from_json(common::SAMPLE_USER_JSON, "User").unwrap();
    assert_eq!(back.as_object().unwrap().get("address"), Some(&BindValue::Null));
}

#[test]
fn test_class_level_exclude_annotation() {
    let engine = JsonBind::builder()
        .register_class(
            ClassSpec::new("Hidden")
                .annotate(Annotation::exclude())
                .property(PropertySpec::new("x").with_type("int")),
        )
        .build()
        .unwrap();

    let mut instance = Instance::new("Hidden");
    instance.set("x", BindValue::Integer(1));

    assert_eq!(engine.to_json(&BindValue::Object(instance)).unwrap(), "null");
    let back = engine.from_json(r#"{"x": 1}"#, "Hidden").unwrap();
    assert_eq!(back, BindValue::Null);
}
