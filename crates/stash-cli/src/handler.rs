//! Command handlers.

use anyhow::{Context, Result};
use clap::Subcommand;
use serde_json::{json, Value};
use stash_client_storage::{Extra, StashAdapter};
use tracing::debug;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the namespaced lookup key for KEY
    BuildKey { key: String },

    /// Store a JSON value under KEY
    Set {
        key: String,
        /// Value as JSON (bare words are stored as strings)
        value: String,
        /// Extra metadata as a JSON object
        #[arg(long)]
        extra: Option<String>,
    },

    /// Print the item stored under KEY
    Get { key: String },

    /// Merge a JSON object into the item's extra
    AddExtra { key: String, extra: String },

    /// Replace the item's extra with a JSON object
    SetExtra { key: String, extra: String },

    /// Print the item's extra
    GetExtra { key: String },

    /// Print whether KEY exists
    Has { key: String },

    /// Remove KEY, printing whether it is gone
    Remove { key: String },

    /// Print the adapter's namespace
    Namespace,
}

/// Parse a command-line value, falling back to a plain string.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn parse_json(raw: &str) -> Result<Value> {
    serde_json::from_str(raw).with_context(|| format!("Invalid JSON: {}", raw))
}

fn parse_extra(raw: Option<&str>) -> Result<Extra> {
    match raw {
        None => Ok(Extra::new()),
        Some(raw) => match parse_json(raw)? {
            Value::Object(map) => Ok(map),
            _ => anyhow::bail!("`extra` must be an object."),
        },
    }
}

/// Run `command` against `adapter`, returning the JSON to print.
pub fn run(adapter: &impl StashAdapter, command: Command) -> Result<Value> {
    debug!("Running {:?}", command);

    let output = match command {
        Command::BuildKey { key } => json!(adapter.build_key(&key)),
        Command::Set { key, value, extra } => {
            let extra = parse_extra(extra.as_deref())?;
            let item = adapter.set_item(&key, parse_value(&value), extra)?;
            serde_json::to_value(item)?
        }
        Command::Get { key } => serde_json::to_value(adapter.get_item(&key)?)?,
        Command::AddExtra { key, extra } => json!(adapter.add_extra(&key, parse_json(&extra)?)?),
        Command::SetExtra { key, extra } => json!(adapter.set_extra(&key, parse_json(&extra)?)?),
        Command::GetExtra { key } => json!(adapter.get_extra(&key)?),
        Command::Has { key } => json!(adapter.has_item(&key)?),
        Command::Remove { key } => json!(adapter.remove_item(&key)?),
        Command::Namespace => json!(adapter.namespace()),
    };

    Ok(output)
}
