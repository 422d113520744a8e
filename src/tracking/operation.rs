//! Operation Decorators
//!
//! An `Operation` is a named async call. `CountCalls` and `CallHistory` wrap
//! any operation, record against the shared store, and expose the same call
//! contract so they can be stacked.

use std::fmt::Display;

use async_trait::async_trait;
use tracing::debug;

use crate::cache::{SharedStore, Value};
use crate::error::Result;

// == Operation ==
/// A named, instrumentable async operation.
#[async_trait]
pub trait Operation: Send + Sync {
    /// Call argument type
    type Input: Send + 'static;
    /// Return type
    type Output: Send + 'static;

    /// Identifier under which calls are counted and recorded.
    fn name(&self) -> &str;

    /// Runs the operation.
    async fn call(&self, input: Self::Input) -> Result<Self::Output>;
}

// == Argument Representation ==
/// Printable form of an operation's call arguments, as recorded in history.
pub trait CallArgs {
    fn args_repr(&self) -> String;
}

impl CallArgs for Value {
    /// A single positional argument: `('hello',)`.
    fn args_repr(&self) -> String {
        format!("({},)", self.repr())
    }
}

/// Key of the input history list for `name`.
pub fn inputs_key(name: &str) -> String {
    format!("{}:inputs", name)
}

/// Key of the output history list for `name`.
pub fn outputs_key(name: &str) -> String {
    format!("{}:outputs", name)
}

// == Count Calls ==
/// Increments the counter named after the wrapped operation on every call.
pub struct CountCalls<O> {
    inner: O,
    store: SharedStore,
}

impl<O> CountCalls<O> {
    pub fn new(inner: O, store: SharedStore) -> Self {
        Self { inner, store }
    }
}

#[async_trait]
impl<O> Operation for CountCalls<O>
where
    O: Operation,
{
    type Input = O::Input;
    type Output = O::Output;

    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn call(&self, input: Self::Input) -> Result<Self::Output> {
        let count = self.store.write().await.incr(self.inner.name())?;
        debug!(operation = self.inner.name(), count, "Counted call");
        self.inner.call(input).await
    }
}

// == Call History ==
/// Records the inputs and outputs of the wrapped operation.
///
/// The input is appended before the inner call runs and the output after it
/// returns, so both lists have equal length once every call has completed.
/// A failing inner call leaves its input without a matching output.
pub struct CallHistory<O> {
    inner: O,
    store: SharedStore,
}

impl<O> CallHistory<O> {
    pub fn new(inner: O, store: SharedStore) -> Self {
        Self { inner, store }
    }
}

#[async_trait]
impl<O> Operation for CallHistory<O>
where
    O: Operation,
    O::Input: CallArgs,
    O::Output: Display,
{
    type Input = O::Input;
    type Output = O::Output;

    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn call(&self, input: Self::Input) -> Result<Self::Output> {
        let name = self.inner.name();
        let args = input.args_repr();
        self.store.write().await.rpush(&inputs_key(name), args)?;

        let output = self.inner.call(input).await?;

        self.store
            .write()
            .await
            .rpush(&outputs_key(name), output.to_string())?;
        Ok(output)
    }
}

/// Reads the call counter of operation `name`, zero if it was never called.
pub async fn call_count(store: &SharedStore, name: &str) -> u64 {
    store.read().await.counter(name)
}
