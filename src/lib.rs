#![recursion_limit = "1024"]

pub mod error;
pub mod eval;
pub mod keypad;
pub mod parser;
pub mod state;

pub use error::CalcError;
pub use state::{CalculatorState, Command, Mode};
