//! Mock implementation of the forms backend for testing.
//!
//! The mock behaves like the real service closely enough to drive the page
//! controllers end to end: it keeps flat template records, hands out tokens
//! and checks them on protected calls.

mod call;
mod forms;

pub use call::{Operation, RecordedCall};
pub use forms::MockFormsProvider;
