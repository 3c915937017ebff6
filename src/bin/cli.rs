//! jsontab CLI Client
//!
//! Command-line interface for interacting with a jsontab server.

use clap::{Parser, Subcommand};
use jsontab::client::Client;
use jsontab::protocol::Response;
use jsontab::store::Operator;

/// jsontab CLI
#[derive(Parser, Debug)]
#[command(name = "jsontab-cli")]
#[command(about = "CLI for the jsontab document store")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:3030")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a table
    Create {
        table: String,
    },

    /// Insert or overwrite a key (compact JSON, no spaces)
    Put {
        table: String,
        key: String,
        value: String,
    },

    /// Select a key, or `*` for all keys
    Select {
        table: String,
        key: String,

        /// Filter as FIELD OP VALUE, OP one of eq, gt, lt, gte, lte
        #[arg(long = "where", num_args = 3, value_names = ["FIELD", "OP", "VALUE"])]
        filter: Option<Vec<String>>,
    },

    /// Overwrite one field of a document
    Modify {
        table: String,
        key: String,
        field: String,
        value: String,
    },

    /// Delete a table
    Drop {
        table: String,
    },

    /// Delete a key
    Del {
        table: String,
        key: String,
    },

    /// Print the largest key of a table
    LastIndex {
        table: String,
    },
}

fn main() {
    let args = Args::parse();
    let client = Client::new(&args.server);

    let result = match args.command {
        Commands::Create { table } => client.create(&table),
        Commands::Put { table, key, value } => client.create_key(&table, &key, &value),
        Commands::Select { table, key, filter: None } => client.select(&table, &key),
        Commands::Select { table, key, filter: Some(filter) } => {
            match filter[1].parse::<Operator>() {
                Ok(op) => client.select_where(&table, &key, &filter[0], op, &filter[2]),
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(2);
                }
            }
        }
        Commands::Modify { table, key, field, value } => {
            client.modify(&table, &key, &field, &value)
        }
        Commands::Drop { table } => client.delete(&table),
        Commands::Del { table, key } => client.delete_key(&table, &key),
        Commands::LastIndex { table } => client.get_last_index(&table),
    };

    match result {
        Ok(response) => {
            println!("{}", response.to_line());
            if let Response::Error(_) = response {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Request failed: {}", e);
            std::process::exit(1);
        }
    }
}
