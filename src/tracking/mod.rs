//! Tracking Module
//!
//! Call counting, call history and replay for instrumented operations.

mod operation;
mod replay;
mod storage;

pub use operation::{call_count, inputs_key, outputs_key, CallArgs, CallHistory, CountCalls, Operation};
pub use replay::{replay, replay_to, CallRecord, Replay};
pub use storage::{Cache, StoreData, STORE_OPERATION};
