use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The operation exists for API parity but is not supported by this type.
    UnsupportedOperation(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UnsupportedOperation(operation) => {
                write!(f, "unsupported operation: {}", operation)
            }
        }
    }
}

impl std::error::Error for Error {}
