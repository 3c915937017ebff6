//! Command definitions
//!
//! Parses a request body into a typed command.

use std::fmt;

use crate::error::{JsontabError, Result};
use crate::store::Operator;

/// Keyword separating a select from its filter clause
const WHERE: &str = "WHERE";

/// Command keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Create,
    CreateKey,
    Select,
    Modify,
    Delete,
    DeleteKey,
    GetLastIndex,
}

impl CommandType {
    /// Keyword as written on the wire
    pub fn keyword(self) -> &'static str {
        match self {
            CommandType::Create => "CREATE",
            CommandType::CreateKey => "CREATE_KEY",
            CommandType::Select => "SELECT",
            CommandType::Modify => "MODIFY",
            CommandType::Delete => "DELETE",
            CommandType::DeleteKey => "DELETE_KEY",
            CommandType::GetLastIndex => "GET_LAST_INDEX",
        }
    }

    /// Case-insensitive keyword lookup
    pub fn from_keyword(word: &str) -> Option<Self> {
        let kind = match word.to_ascii_uppercase().as_str() {
            "CREATE" => CommandType::Create,
            "CREATE_KEY" => CommandType::CreateKey,
            "SELECT" => CommandType::Select,
            "MODIFY" => CommandType::Modify,
            "DELETE" => CommandType::Delete,
            "DELETE_KEY" => CommandType::DeleteKey,
            "GET_LAST_INDEX" => CommandType::GetLastIndex,
            _ => return None,
        };
        Some(kind)
    }
}

/// Filter clause of a select
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: String,
    pub op: Operator,
    pub value: String,
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create an empty table
    Create { table: String },

    /// Insert or overwrite one key
    CreateKey {
        table: String,
        key: String,
        value: String,
    },

    /// Point select, optionally filtered
    Select {
        table: String,
        key: String,
        filter: Option<Filter>,
    },

    /// Overwrite one field of a document
    Modify {
        table: String,
        key: String,
        field: String,
        value: String,
    },

    /// Drop a table and its file
    Delete { table: String },

    /// Remove one key
    DeleteKey { table: String, key: String },

    /// Largest key in a table
    GetLastIndex { table: String },
}

impl Command {
    /// Parse a request body.
    ///
    /// The keyword is matched case-insensitively and the table token is normalized
    /// with [`normalize_table_name`]. Keys, fields and values are left exactly as sent.
    pub fn parse(line: &str) -> Result<Self> {
        let tokens: Vec<&str> = line.split_whitespace().collect();

        let keyword = tokens
            .first()
            .ok_or_else(|| JsontabError::Protocol("empty request".to_string()))?;
        let kind = CommandType::from_keyword(keyword)
            .ok_or_else(|| JsontabError::Protocol(format!("unknown command: {}", keyword)))?;

        let table = tokens
            .get(1)
            .map(|t| normalize_table_name(t))
            .ok_or_else(|| {
                JsontabError::Protocol(format!("{}: missing table name", kind.keyword()))
            })?;

        let command = match (kind, tokens.len()) {
            (CommandType::Create, 2) => Command::Create { table },
            (CommandType::CreateKey, 4) => Command::CreateKey {
                table,
                key: tokens[2].to_string(),
                value: tokens[3].to_string(),
            },
            (CommandType::Select, 3) => Command::Select {
                table,
                key: tokens[2].to_string(),
                filter: None,
            },
            (CommandType::Select, 7) => {
                if !tokens[3].eq_ignore_ascii_case(WHERE) {
                    return Err(JsontabError::Protocol(format!(
                        "SELECT: expected WHERE, got {}",
                        tokens[3]
                    )));
                }
                Command::Select {
                    table,
                    key: tokens[2].to_string(),
                    filter: Some(Filter {
                        field: tokens[4].to_string(),
                        op: tokens[5].parse()?,
                        value: tokens[6].to_string(),
                    }),
                }
            }
            (CommandType::Modify, 5) => Command::Modify {
                table,
                key: tokens[2].to_string(),
                field: tokens[3].to_string(),
                value: tokens[4].to_string(),
            },
            (CommandType::Delete, 2) => Command::Delete { table },
            (CommandType::DeleteKey, 3) => Command::DeleteKey {
                table,
                key: tokens[2].to_string(),
            },
            (CommandType::GetLastIndex, 2) => Command::GetLastIndex { table },
            (kind, n) => {
                return Err(JsontabError::Protocol(format!(
                    "{}: unexpected number of tokens ({})",
                    kind.keyword(),
                    n
                )))
            }
        };

        Ok(command)
    }

    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Create { .. } => CommandType::Create,
            Command::CreateKey { .. } => CommandType::CreateKey,
            Command::Select { .. } => CommandType::Select,
            Command::Modify { .. } => CommandType::Modify,
            Command::Delete { .. } => CommandType::Delete,
            Command::DeleteKey { .. } => CommandType::DeleteKey,
            Command::GetLastIndex { .. } => CommandType::GetLastIndex,
        }
    }

    /// Table the command addresses
    pub fn table(&self) -> &str {
        match self {
            Command::Create { table }
            | Command::CreateKey { table, .. }
            | Command::Select { table, .. }
            | Command::Modify { table, .. }
            | Command::Delete { table }
            | Command::DeleteKey { table, .. }
            | Command::GetLastIndex { table } => table,
        }
    }

    /// Render as request text
    pub fn to_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kw = self.command_type().keyword();
        match self {
            Command::Create { table }
            | Command::Delete { table }
            | Command::GetLastIndex { table } => write!(f, "{} {}", kw, table),
            Command::CreateKey { table, key, value } => {
                write!(f, "{} {} {} {}", kw, table, key, value)
            }
            Command::Select { table, key, filter } => {
                write!(f, "{} {} {}", kw, table, key)?;
                if let Some(filter) = filter {
                    write!(f, " {} {} {} {}", WHERE, filter.field, filter.op, filter.value)?;
                }
                Ok(())
            }
            Command::Modify {
                table,
                key,
                field,
                value,
            } => write!(f, "{} {} {} {} {}", kw, table, key, field, value),
            Command::DeleteKey { table, key } => write!(f, "{} {} {}", kw, table, key),
        }
    }
}

/// First character uppercased, the rest as given: "users" → "Users", "uSERS" → "USERS"
pub fn normalize_table_name(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
