use core::fmt;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    InvalidSerial,
    InvalidId,
    InvalidName,
    CameraUnavailable,
    NoFaceDetected,
    NoTrainingData,
    ModelNotTrained,
    NoRecognizedFace,
    Store(String),
    Ledger(String),
    Vision(String),
    Io(String),
    Session(String),
}

impl Error {
    /// no-face and no-match outcomes end a session without anything being wrong
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::NoFaceDetected | Self::NoRecognizedFace)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSerial => write!(fmt, "enter a numeric serial"),
            Self::InvalidId => write!(fmt, "enter a numeric id"),
            Self::InvalidName => write!(fmt, "enter a name made of letters only"),
            Self::CameraUnavailable => write!(fmt, "failed to access the camera"),
            Self::NoFaceDetected => write!(fmt, "no face detected, try again"),
            Self::NoTrainingData => write!(fmt, "no face data found, register a student first"),
            Self::ModelNotTrained => write!(fmt, "no trained model found, register a student first"),
            Self::NoRecognizedFace => write!(fmt, "no known face recognized"),
            Self::Store(error) => write!(fmt, "record store failure, {}", error),
            Self::Ledger(error) => write!(fmt, "ledger failure, {}", error),
            Self::Vision(error) => write!(fmt, "vision failure, {}", error),
            Self::Io(error) => write!(fmt, "filesystem failure, {}", error),
            Self::Session(error) => write!(fmt, "session failure, {}", error),
        }
    }
}

impl std::error::Error for Error {}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        Self::Store(error.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::Ledger(error.to_string())
    }
}

impl From<opencv::Error> for Error {
    fn from(error: opencv::Error) -> Self {
        Self::Vision(error.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}
