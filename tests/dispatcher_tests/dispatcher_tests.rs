//! Tests for Dispatcher
//!
//! These tests verify:
//! - Each command routes to the right store operation
//! - Success payload rendering
//! - Error kind → wire token mapping

use std::sync::Arc;

use jsontab::protocol::{Command, Response};
use jsontab::{Dispatcher, Store};
use serde_json::{json, Value};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_dispatcher() -> (TempDir, Dispatcher) {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(Store::open(temp_dir.path()).unwrap());
    (temp_dir, Dispatcher::new(store))
}

fn line(dispatcher: &Dispatcher, request: &str) -> String {
    dispatcher.handle(request).to_line().to_string()
}

fn json_line(dispatcher: &Dispatcher, request: &str) -> Value {
    serde_json::from_str(&line(dispatcher, request)).unwrap()
}

// =============================================================================
// Success Path Tests
// =============================================================================

#[test]
fn test_end_to_end_scenario() {
    let (_temp, d) = setup_dispatcher();

    assert_eq!(line(&d, "CREATE Users"), "OK!");
    assert_eq!(line(&d, r#"CREATE_KEY Users 1 {"email":"a@x.com"}"#), "OK!");
    assert_eq!(line(&d, "SELECT Users 1"), r#"{"1":{"email":"a@x.com"}}"#);
    assert_eq!(line(&d, "GET_LAST_INDEX Users"), "1");
    assert_eq!(line(&d, "DELETE_KEY Users 1"), "OK!");
    assert_eq!(line(&d, "SELECT Users 1"), "KEY_NOT_FOUND");
}

#[test]
fn test_table_token_normalized_across_commands() {
    let (_temp, d) = setup_dispatcher();

    assert_eq!(line(&d, "create users"), "OK!");
    assert_eq!(line(&d, "CREATE_KEY users 1 x"), "OK!");
    assert_eq!(line(&d, "SELECT Users 1"), r#"{"1":"x"}"#);
    assert!(d.store().contains_table("Users"));
}

#[test]
fn test_select_all() {
    let (_temp, d) = setup_dispatcher();
    line(&d, "CREATE T");
    line(&d, r#"CREATE_KEY T a {"n":1}"#);
    line(&d, r#"CREATE_KEY T b [1,2]"#);

    assert_eq!(json_line(&d, "SELECT T *"), json!({"a": {"n": 1}, "b": [1, 2]}));
}

#[test]
fn test_filtered_select() {
    let (_temp, d) = setup_dispatcher();
    line(&d, "CREATE People");
    line(&d, r#"CREATE_KEY People 1 {"age":"20"}"#);
    line(&d, r#"CREATE_KEY People 2 {"age":"30"}"#);

    assert_eq!(
        json_line(&d, "SELECT People * WHERE age gt 25"),
        json!({"2": {"age": "30"}})
    );
    assert_eq!(
        json_line(&d, "SELECT People * WHERE age eq 20"),
        json!({"1": {"age": "20"}})
    );
    assert_eq!(line(&d, "SELECT People * WHERE age eq 99"), "{}");
}

#[test]
fn test_modify_keeps_case_of_value() {
    let (_temp, d) = setup_dispatcher();
    line(&d, "CREATE Users");
    line(&d, r#"CREATE_KEY Users 1 {"email":"a@x.com"}"#);

    assert_eq!(line(&d, "MODIFY Users 1 email New@X.com"), "OK!");
    assert_eq!(json_line(&d, "SELECT Users 1"), json!({"1": {"email": "New@X.com"}}));
}

#[test]
fn test_delete_table() {
    let (temp, d) = setup_dispatcher();
    line(&d, "CREATE Users");

    assert_eq!(line(&d, "DELETE Users"), "OK!");
    assert_eq!(line(&d, "SELECT Users *"), "TABLE_NOT_FOUND");
    assert!(!temp.path().join("Users.json").exists());
}

#[test]
fn test_execute_returns_typed_response() {
    let (_temp, d) = setup_dispatcher();
    let response = d
        .execute(&Command::Create {
            table: "T".to_string(),
        })
        .unwrap();
    assert_eq!(response, Response::Ok);
}

// =============================================================================
// Error Token Tests
// =============================================================================

#[test]
fn test_table_not_found_tokens() {
    let (_temp, d) = setup_dispatcher();
    for request in [
        "SELECT Ghost 1",
        "CREATE_KEY Ghost 1 x",
        "MODIFY Ghost 1 f v",
        "DELETE Ghost",
        "DELETE_KEY Ghost 1",
        "GET_LAST_INDEX Ghost",
    ] {
        assert_eq!(line(&d, request), "TABLE_NOT_FOUND", "request: {}", request);
    }
}

#[test]
fn test_filtered_select_on_unknown_table_is_key_not_found() {
    let (_temp, d) = setup_dispatcher();
    assert_eq!(line(&d, "SELECT Ghost 1"), "TABLE_NOT_FOUND");
    assert_eq!(line(&d, "SELECT Ghost * WHERE a eq b"), "KEY_NOT_FOUND");
    assert_eq!(line(&d, "SELECT Ghost 7 WHERE a gt b"), "KEY_NOT_FOUND");
}

#[test]
fn test_already_exists_token() {
    let (_temp, d) = setup_dispatcher();
    line(&d, "CREATE Users");
    assert_eq!(line(&d, "CREATE users"), "ALREADY_EXISTS");
}

#[test]
fn test_empty_tokens() {
    let (_temp, d) = setup_dispatcher();
    line(&d, "CREATE T");

    assert_eq!(line(&d, "GET_LAST_INDEX T"), "EMPTY");
    assert_eq!(line(&d, "MODIFY T 1 f v"), "EMPTY");
    assert_eq!(line(&d, "DELETE_KEY T 1"), "EMPTY");
}

#[test]
fn test_key_not_found_on_empty_table() {
    let (_temp, d) = setup_dispatcher();
    line(&d, "CREATE T");
    assert_eq!(line(&d, "SELECT T nope"), "KEY_NOT_FOUND");
}

#[test]
fn test_protocol_errors_render_error() {
    let (_temp, d) = setup_dispatcher();
    assert_eq!(line(&d, "FROB T"), "ERROR");
    assert_eq!(line(&d, ""), "ERROR");
    assert_eq!(line(&d, "SELECT T"), "ERROR");
    assert_eq!(line(&d, "SELECT T * WHERE a s 1"), "ERROR");
}

#[test]
fn test_decode_error_renders_error() {
    let (_temp, d) = setup_dispatcher();
    line(&d, "CREATE T");
    assert_eq!(line(&d, "CREATE_KEY T 1 {broken"), "ERROR");
}
