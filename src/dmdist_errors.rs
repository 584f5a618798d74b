use thiserror::Error;

#[derive(Error, Debug)]
pub enum DmDistError {
    #[error("Unable to read parameter file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parameter directory not found: {0}")]
    ParameterDirNotFound(String),

    #[error("Malformed parameter line: {0}")]
    ParameterParsing(String),

    #[error("Missing model parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid line-of-sight request: {0}")]
    InvalidRequest(String),
}

impl PartialEq for DmDistError {
    fn eq(&self, other: &Self) -> bool {
        use DmDistError::*;
        match (self, other) {
            // io errors carry no comparable payload: equal if same variant
            (IoError(_), IoError(_)) => true,

            (ParameterDirNotFound(a), ParameterDirNotFound(b)) => a == b,
            (ParameterParsing(a), ParameterParsing(b)) => a == b,
            (MissingParameter(a), MissingParameter(b)) => a == b,
            (InvalidRequest(a), InvalidRequest(b)) => a == b,

            _ => false,
        }
    }
}
