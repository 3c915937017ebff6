//! Store Module
//!
//! Named tables of JSON documents, one file per table.
//!
//! ## Responsibilities
//! - Keep the registry of table name → backing file
//! - Serialize every operation through one process-wide RwLock
//! - Read-modify-write whole table files through the codec
//! - Evaluate filtered selects against document fields
//!
//! ## File Format
//! ```text
//! {data_dir}/Users.json
//! ┌────────────────────────────────────────────────┐
//! │ {"1":{"email":"a@x.com"},"2":{"email":"..."}}  │
//! └────────────────────────────────────────────────┘
//! ```
//! A zero-length file is a table with no documents yet.

pub mod codec;
mod filter;
mod table_store;

pub use codec::Documents;
pub use filter::Operator;
pub use table_store::Store;
