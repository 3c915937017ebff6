//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Protocol Format (line-oriented text)
//!
//! One request per connection: one or more lines, then a line equal to `END`.
//! The server answers with one line and closes.
//!
//! ### Commands
//! - `CREATE TAB`
//! - `CREATE_KEY TAB KEY VALUE`
//! - `SELECT TAB KEY`
//! - `SELECT TAB KEY WHERE FIELD OP VALUE` (OP: eq, gt, lt, gte, lte)
//! - `MODIFY TAB KEY FIELD VALUE`
//! - `DELETE TAB`
//! - `DELETE_KEY TAB KEY`
//! - `GET_LAST_INDEX TAB`
//!
//! ### Responses
//! - `OK!`, a JSON object, or a bare key on success
//! - `TABLE_NOT_FOUND`, `EMPTY`, `KEY_NOT_FOUND`, `ALREADY_EXISTS`, `ERROR` on failure

mod command;
mod response;
mod codec;

pub use command::{normalize_table_name, Command, CommandType, Filter};
pub use response::{Response, OK};
pub use codec::{read_request, read_response, write_request, write_response, DEFAULT_TERMINATOR};
