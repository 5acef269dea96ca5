use thiserror::Error;

// Display text is what ends up in the calculator's error field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("{0}")]
    Parse(String),
    #[error("no such variable {0}")]
    UnknownVariable(String),
    #[error("Result is Infinite")]
    Infinite,
    #[error("Result is Not a Number")]
    NotANumber,
}

impl CalcError {
    // Division by zero and 0/0 evaluate fine but are not results.
    pub fn check_finite(value: f64) -> Result<f64, CalcError> {
        if value.is_nan() {
            Err(CalcError::NotANumber)
        } else if value.is_infinite() {
            Err(CalcError::Infinite)
        } else {
            Ok(value)
        }
    }
}
