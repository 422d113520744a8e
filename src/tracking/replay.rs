//! Replay Log
//!
//! Rebuilds the recorded call history of an operation from the store and
//! renders it one call per line.

use std::fmt;
use std::io::{self, Write};

use serde::Serialize;

use crate::cache::SharedStore;
use crate::error::Result;
use crate::tracking::operation::{inputs_key, outputs_key};

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallRecord {
    /// Argument representation, e.g. `('hello',)`
    pub input: String,
    /// Output representation
    pub output: String,
}

/// The recorded history of one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Replay {
    pub operation: String,
    /// Number of recorded inputs
    pub total_calls: usize,
    /// Input/output pairs in call order
    pub calls: Vec<CallRecord>,
}

impl Replay {
    /// Reads both histories of `operation` in one consistent snapshot.
    ///
    /// An input without a matching output (a call still in flight, or one
    /// that failed) counts towards `total_calls` but is not paired.
    pub async fn load(store: &SharedStore, operation: &str) -> Result<Self> {
        let (inputs, outputs) = {
            let store = store.read().await;
            (
                store.lrange(&inputs_key(operation), 0, -1)?,
                store.lrange(&outputs_key(operation), 0, -1)?,
            )
        };

        let total_calls = inputs.len();
        let calls = inputs
            .into_iter()
            .zip(outputs)
            .map(|(input, output)| CallRecord { input, output })
            .collect();

        Ok(Self {
            operation: operation.to_string(),
            total_calls,
            calls,
        })
    }
}

impl fmt::Display for Replay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} was called {} times:", self.operation, self.total_calls)?;
        for call in &self.calls {
            write!(f, "\n{}(*{}) -> {}", self.operation, call.input, call.output)?;
        }
        Ok(())
    }
}

/// Writes the history of `operation` to `out`.
pub async fn replay_to<W: Write>(store: &SharedStore, operation: &str, out: &mut W) -> Result<Replay> {
    let replay = Replay::load(store, operation).await?;
    writeln!(out, "{}", replay)?;
    Ok(replay)
}

/// Prints the history of `operation` to standard output.
pub async fn replay(store: &SharedStore, operation: &str) -> Result<Replay> {
    let replay = Replay::load(store, operation).await?;
    writeln!(io::stdout().lock(), "{}", replay)?;
    Ok(replay)
}
