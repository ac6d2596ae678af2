use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Unknown filter field: {0}")]
    UnknownField(String),

    #[error("Invalid value for filter '{field}': expected {expected}")]
    InvalidValue {
        field: String,
        expected: &'static str,
    },

    #[error("Invalid range bound for '{field}': expected number or string")]
    InvalidRangeBound { field: String },
}
