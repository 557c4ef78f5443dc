use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConvertError {
    #[error("invalid conversion options: {0}")]
    InvalidOptions(&'static str),
    #[error("unrecognized {field} value {value} in drawing header")]
    InvalidUnitEnumeration { field: &'static str, value: i16 },
}

pub type Result<T> = std::result::Result<T, ConvertError>;
