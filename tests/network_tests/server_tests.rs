//! Tests for Server and Connection
//!
//! These tests run a real server on an ephemeral port and verify:
//! - One request/response per connection, then close
//! - Multi-line request framing
//! - Error tokens over the wire
//! - Concurrent clients
//! - Shutdown

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use jsontab::client::Client;
use jsontab::network::{Server, ShutdownHandle};
use jsontab::protocol::Response;
use jsontab::store::Operator;
use jsontab::{Config, Store};
use serde_json::{json, Value};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

struct TestServer {
    _temp: TempDir,
    addr: SocketAddr,
    shutdown: ShutdownHandle,
    thread: Option<JoinHandle<()>>,
}

impl TestServer {
    fn start() -> Self {
        let temp = TempDir::new().unwrap();
        let config = Config::builder()
            .data_dir(temp.path())
            .listen_addr("127.0.0.1:0")
            .build();
        let store = Arc::new(Store::open(&config.data_dir).unwrap());
        let server = Server::bind(config, store).unwrap();
        let addr = server.local_addr().unwrap();
        let shutdown = server.shutdown_handle().unwrap();

        let thread = thread::spawn(move || {
            server.run().unwrap();
        });

        Self {
            _temp: temp,
            addr,
            shutdown,
            thread: Some(thread),
        }
    }

    fn client(&self) -> Client {
        Client::new(self.addr.to_string())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.shutdown();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn raw_exchange(addr: SocketAddr, payload: &str) -> String {
    let mut stream = TcpStream::connect(addr).unwrap();
    stream.write_all(payload.as_bytes()).unwrap();
    stream.flush().unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();
    response
}

// =============================================================================
// Protocol Over TCP Tests
// =============================================================================

#[test]
fn test_end_to_end_scenario_over_tcp() {
    let server = TestServer::start();
    let client = server.client();

    assert_eq!(client.create("Users").unwrap(), Response::Ok);
    assert_eq!(
        client.create_key("Users", "1", r#"{"email":"a@x.com"}"#).unwrap(),
        Response::Ok
    );
    assert_eq!(
        client.select("Users", "1").unwrap(),
        Response::Value(r#"{"1":{"email":"a@x.com"}}"#.to_string())
    );
    assert_eq!(
        client.get_last_index("Users").unwrap(),
        Response::Value("1".to_string())
    );
    assert_eq!(client.delete_key("Users", "1").unwrap(), Response::Ok);
    assert_eq!(
        client.select("Users", "1").unwrap(),
        Response::Error("KEY_NOT_FOUND".to_string())
    );
}

#[test]
fn test_response_is_one_line_then_close() {
    let server = TestServer::start();

    let response = raw_exchange(server.addr, "CREATE Users\nEND\n");

    assert_eq!(response, "OK!\n");
}

#[test]
fn test_multi_line_request_over_tcp() {
    let server = TestServer::start();
    raw_exchange(server.addr, "CREATE T\nEND\n");

    let response = raw_exchange(server.addr, "CREATE_KEY T 1 {\"a\":\n\"b\"}\nEND\n");
    assert_eq!(response, "OK!\n");

    let response = raw_exchange(server.addr, "SELECT T 1\nEND\n");
    assert_eq!(response, "{\"1\":{\"a\":\"b\"}}\n");
}

#[test]
fn test_connection_closed_after_response() {
    let server = TestServer::start();

    let mut stream = TcpStream::connect(server.addr).unwrap();
    stream.write_all(b"CREATE A\nEND\n").unwrap();

    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    reader.read_line(&mut line).unwrap();
    assert_eq!(line, "OK!\n");

    // Server closed after the single response
    line.clear();
    assert_eq!(reader.read_line(&mut line).unwrap(), 0);
}

#[test]
fn test_unknown_command_over_tcp() {
    let server = TestServer::start();
    assert_eq!(raw_exchange(server.addr, "FROB X\nEND\n"), "ERROR\n");
}

#[test]
fn test_half_closed_request_gets_error() {
    let server = TestServer::start();

    let mut stream = TcpStream::connect(server.addr).unwrap();
    stream.write_all(b"CREATE T\n").unwrap();
    stream.shutdown(std::net::Shutdown::Write).unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();
    assert_eq!(response, "ERROR\n");
}

#[test]
fn test_failed_requests_do_not_stop_server() {
    let server = TestServer::start();

    for _ in 0..3 {
        let mut stream = TcpStream::connect(server.addr).unwrap();
        stream.write_all(b"CREATE T\n").unwrap();
        stream.shutdown(std::net::Shutdown::Write).unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).unwrap();
        assert_eq!(response, "ERROR\n");
    }

    assert_eq!(server.client().create("Still").unwrap(), Response::Ok);
}

#[test]
fn test_abandoned_connection_does_not_stop_server() {
    let server = TestServer::start();

    {
        let mut stream = TcpStream::connect(server.addr).unwrap();
        stream.write_all(b"CREATE Half\n").unwrap();
    }

    assert_eq!(server.client().create("Other").unwrap(), Response::Ok);
}

#[test]
fn test_filtered_select_over_tcp() {
    let server = TestServer::start();
    let client = server.client();
    client.create("People").unwrap();
    client.create_key("People", "1", r#"{"age":"20"}"#).unwrap();
    client.create_key("People", "2", r#"{"age":"30"}"#).unwrap();

    let response = client
        .select_where("People", "*", "age", Operator::Gt, "25")
        .unwrap();

    match response {
        Response::Value(payload) => {
            let parsed: Value = serde_json::from_str(&payload).unwrap();
            assert_eq!(parsed, json!({"2": {"age": "30"}}));
        }
        other => panic!("Expected payload, got {:?}", other),
    }
}

#[test]
fn test_modify_and_delete_over_tcp() {
    let server = TestServer::start();
    let client = server.client();
    client.create("Users").unwrap();
    client.create_key("Users", "1", r#"{"email":"a@x.com"}"#).unwrap();

    assert_eq!(client.modify("Users", "1", "email", "b@x.com").unwrap(), Response::Ok);
    assert_eq!(
        client.select("Users", "1").unwrap(),
        Response::Value(r#"{"1":{"email":"b@x.com"}}"#.to_string())
    );

    assert_eq!(client.delete("Users").unwrap(), Response::Ok);
    assert_eq!(
        client.select("Users", "*").unwrap(),
        Response::Error("TABLE_NOT_FOUND".to_string())
    );
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_clients_no_lost_updates() {
    let server = TestServer::start();
    server.client().create("T").unwrap();

    let mut handles = vec![];
    for t in 0..8 {
        let client = server.client();
        handles.push(thread::spawn(move || {
            for i in 0..10 {
                let key = format!("{}-{}", t, i);
                let value = format!(r#"{{"t":{},"i":{}}}"#, t, i);
                assert_eq!(client.create_key("T", &key, &value).unwrap(), Response::Ok);
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    match server.client().select("T", "*").unwrap() {
        Response::Value(payload) => {
            let all: Value = serde_json::from_str(&payload).unwrap();
            assert_eq!(all.as_object().unwrap().len(), 80);
        }
        other => panic!("Expected payload, got {:?}", other),
    }
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_bind_rejects_invalid_config() {
    let temp = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp.path())
        .listen_addr("127.0.0.1:0")
        .terminator("")
        .build();
    let store = Arc::new(Store::open(temp.path()).unwrap());

    assert!(Server::bind(config, store).is_err());
}

#[test]
fn test_custom_terminator() {
    let temp = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp.path())
        .listen_addr("127.0.0.1:0")
        .terminator("STOP")
        .build();
    let store = Arc::new(Store::open(temp.path()).unwrap());
    let server = Server::bind(config, store).unwrap();
    let addr = server.local_addr().unwrap();
    let shutdown = server.shutdown_handle().unwrap();
    let handle = thread::spawn(move || server.run().unwrap());

    let client = Client::new(addr.to_string()).with_terminator("STOP");
    assert_eq!(client.create("T").unwrap(), Response::Ok);

    shutdown.shutdown();
    handle.join().unwrap();
}

#[test]
fn test_shutdown_stops_accept_loop() {
    let server = TestServer::start();
    server.client().create("T").unwrap();
    drop(server);
}
