//! Client
//!
//! Blocking client for the line protocol. Each call opens a fresh connection,
//! sends one request, reads one response line and closes.

use std::io::{BufReader, BufWriter};
use std::net::TcpStream;

use crate::error::Result;
use crate::protocol::{
    read_response, write_request, Command, Filter, Response, DEFAULT_TERMINATOR,
};
use crate::store::Operator;

/// Client for a jsontab server
#[derive(Debug, Clone)]
pub struct Client {
    addr: String,
    terminator: String,
}

impl Client {
    /// Client for the server at `addr` (host:port)
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            terminator: DEFAULT_TERMINATOR.to_string(),
        }
    }

    /// Use a non-default request terminator
    pub fn with_terminator(mut self, terminator: impl Into<String>) -> Self {
        self.terminator = terminator.into();
        self
    }

    pub fn create(&self, table: &str) -> Result<Response> {
        self.send(&Command::Create {
            table: table.to_string(),
        })
    }

    /// `value` is sent as one token, so it must not contain whitespace
    pub fn create_key(&self, table: &str, key: &str, value: &str) -> Result<Response> {
        self.send(&Command::CreateKey {
            table: table.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    pub fn select(&self, table: &str, key: &str) -> Result<Response> {
        self.send(&Command::Select {
            table: table.to_string(),
            key: key.to_string(),
            filter: None,
        })
    }

    pub fn select_where(
        &self,
        table: &str,
        key: &str,
        field: &str,
        op: Operator,
        value: &str,
    ) -> Result<Response> {
        self.send(&Command::Select {
            table: table.to_string(),
            key: key.to_string(),
            filter: Some(Filter {
                field: field.to_string(),
                op,
                value: value.to_string(),
            }),
        })
    }

    pub fn modify(&self, table: &str, key: &str, field: &str, value: &str) -> Result<Response> {
        self.send(&Command::Modify {
            table: table.to_string(),
            key: key.to_string(),
            field: field.to_string(),
            value: value.to_string(),
        })
    }

    pub fn delete(&self, table: &str) -> Result<Response> {
        self.send(&Command::Delete {
            table: table.to_string(),
        })
    }

    pub fn delete_key(&self, table: &str, key: &str) -> Result<Response> {
        self.send(&Command::DeleteKey {
            table: table.to_string(),
            key: key.to_string(),
        })
    }

    pub fn get_last_index(&self, table: &str) -> Result<Response> {
        self.send(&Command::GetLastIndex {
            table: table.to_string(),
        })
    }

    /// Send a command and wait for its response
    pub fn send(&self, command: &Command) -> Result<Response> {
        self.send_raw(&command.to_line())
    }

    /// Send an arbitrary request body
    pub fn send_raw(&self, body: &str) -> Result<Response> {
        let stream = TcpStream::connect(&self.addr)?;
        stream.set_nodelay(true)?;

        let mut writer = BufWriter::new(stream.try_clone()?);
        let mut reader = BufReader::new(stream);

        write_request(&mut writer, body, &self.terminator)?;
        read_response(&mut reader)
    }
}
