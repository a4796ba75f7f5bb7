//! Shared fixture types for model tests.

#![allow(dead_code)]

use basis_model::{
    ClassSchema, CollectionKind, Entity, EntityClass, Error, Raw, RawMut, Result, declare_fields,
};
use serde_json::{Map, Value, json};
use std::sync::LazyLock;

/// Installs a test-writer subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Unwraps a `json!({...})` literal into a map.
pub fn values(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

// ── Plain container fields ───────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    pub title: String,
    pub age: u32,
}

declare_fields!(Profile { title, age });

// ── User entity ──────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
}

declare_fields!(User {
    id,
    first_name,
    last_name,
    password_hash,
});

static USER_SCHEMA: LazyLock<ClassSchema<User>> = LazyLock::new(|| {
    ClassSchema::new()
        .readable("id")
        .read_write("first_name")
        .read_write("last_name")
        .readable_via("full_name", "full_name")
        .read_write("nickname")
        .writable_via("password", "set_password")
        .getter("full_name", full_name)
        .setter("set_password", set_password)
        .callable("greet")
        .callable_via("upper_first", "uppercase")
        .callable_via("upper_last", "uppercase")
        .callable("peek")
        .callable("forget")
        .method("greet", greet)
        .method("uppercase", uppercase)
        .method("peek", peek)
        .method("forget", forget)
});

impl EntityClass for User {
    const CLASS: &'static str = "User";

    fn schema() -> &'static ClassSchema<Self> {
        &USER_SCHEMA
    }
}

fn full_name(user: Raw<'_, User>) -> Result<Value> {
    let f = user.fields();
    Ok(json!(format!("{} {}", f.first_name, f.last_name).trim()))
}

fn set_password(mut user: RawMut<'_, User>, value: Value) -> Result<()> {
    let password = value
        .as_str()
        .ok_or_else(|| Error::InvalidInput("password must be a string".into()))?;
    user.fields_mut().password_hash = format!("hashed:{password}");
    Ok(())
}

fn greet(user: RawMut<'_, User>, _name: &str, args: Vec<Value>) -> Result<Value> {
    let greeting = args.first().and_then(Value::as_str).unwrap_or("Hello");
    Ok(json!(format!("{greeting}, {}", user.fields().first_name)))
}

fn uppercase(user: RawMut<'_, User>, name: &str, _args: Vec<Value>) -> Result<Value> {
    let field = if name == "upper_first" { "first_name" } else { "last_name" };
    let value = user.get(field)?;
    Ok(json!(value.as_str().unwrap_or_default().to_uppercase()))
}

fn arg_name(args: &[Value]) -> Result<&str> {
    args.first()
        .and_then(Value::as_str)
        .ok_or_else(|| Error::InvalidInput("expected a property name".into()))
}

/// Reads any slot from inside the type, tables notwithstanding.
fn peek(user: RawMut<'_, User>, _name: &str, args: Vec<Value>) -> Result<Value> {
    user.get(arg_name(&args)?)
}

/// Clears any slot from inside the type, tables notwithstanding.
fn forget(mut user: RawMut<'_, User>, _name: &str, args: Vec<Value>) -> Result<Value> {
    user.unset(arg_name(&args)?)?;
    Ok(Value::Null)
}

pub fn user(id: i64, first: &str, last: &str) -> Entity<User> {
    init_tracing();
    Entity::make(values(json!({"id": id, "first_name": first, "last_name": last})))
        .expect("fixture user")
}

pub fn id_of(user: &Entity<User>) -> i64 {
    user.get("id").expect("id is readable").as_i64().unwrap_or_default()
}

pub fn first_name_of(user: &Entity<User>) -> String {
    user.get("first_name")
        .expect("first_name is readable")
        .as_str()
        .unwrap_or_default()
        .to_owned()
}

// ── Misconfigured entity ─────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct Broken;

declare_fields!(Broken {});

static BROKEN_SCHEMA: LazyLock<ClassSchema<Broken>> = LazyLock::new(|| {
    ClassSchema::new()
        .readable_via("ghost", "missing_getter")
        .writable_via("ghost", "missing_setter")
        .callable("vanish")
        .read_write("note")
});

impl EntityClass for Broken {
    const CLASS: &'static str = "Broken";

    fn schema() -> &'static ClassSchema<Self> {
        &BROKEN_SCHEMA
    }
}

// ── Collections ──────────────────────────────────────────────────

/// Accepts users with a positive id.
pub struct Users;

impl CollectionKind for Users {
    type Item = Entity<User>;
    const NAME: &'static str = "Users";

    fn is_entity_valid(item: &Self::Item) -> bool {
        id_of(item) > 0
    }
}
