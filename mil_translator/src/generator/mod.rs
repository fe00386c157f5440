//! Single-pass RPN code generation over a finished token stream.

pub mod priority;
pub mod rpn;
pub mod stack;

pub use priority::operation_priority;
pub use rpn::{GenerationError, RpnGenerator};
pub use stack::{Marker, StackEntry};
