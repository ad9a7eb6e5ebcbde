// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common fixtures for integration tests.

#![allow(dead_code)]

use jsonbind::{
    Annotation, BindValue, ClassSpec, Instance, JsonBind, JsonBindBuilder, PropertySpec,
};

/// A class spec exercising scalars, a typed list, and a nested class.
pub fn address_spec() -> ClassSpec {
    ClassSpec::new("Address")
        .property(PropertySpec::new("street").with_type("string"))
        .property(PropertySpec::new("zip").with_type("int"))
}

pub fn user_spec() -> ClassSpec {
    ClassSpec::new("User")
        .property(PropertySpec::new("id").with_type("int"))
        .property(PropertySpec::new("name").with_type("string"))
        .property(
            PropertySpec::new("email")
                .with_type("string")
                .annotate(Annotation::SerializedName("email_address".to_string())),
        )
        .property(PropertySpec::new("scores").with_type("array<int>"))
        .property(PropertySpec::new("address").with_type("Address"))
}

/// A builder preloaded with the user/address classes.
pub fn engine_builder() -> JsonBindBuilder {
    JsonBind::builder()
        .register_class(user_spec())
        .register_class(address_spec())
}

pub fn engine() -> JsonBind {
    engine_builder().build().expect("engine builds")
}

/// A fully-populated user instance.
pub fn sample_user() -> BindValue {
    let mut address = Instance::new("Address");
    address.set("street", BindValue::from("Main St 1"));
    address.set("zip", BindValue::Integer(12345));

    let mut user = Instance::new("User");
    user.set("id", BindValue::Integer(7));
    user.set("name", BindValue::from("ada"));
    user.set("email", BindValue::from("ada@example.com"));
    user.set(
        "scores",
        BindValue::Aggregate(jsonbind::Aggregate::from_list([
            BindValue::Integer(1),
            BindValue::Integer(2),
        ])),
    );
    user.set("address", BindValue::Object(address));
    BindValue::Object(user)
}

pub const SAMPLE_USER_JSON: &str = concat!(
    r#"{"id":7,"name":"ada","email_address":"ada@example.com","#,
    r#""scores":[1,2],"address":{"street":"Main St 1","zip":12345}}"#
);
