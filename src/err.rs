use thiserror::Error;

#[derive(Debug, Error)]
pub enum SuggestErr {
    // frame level, `FrameIncomplete` only means "read more bytes"
    #[error("frame incomplete")]
    FrameIncomplete,
    #[error("ERR protocol error: malformed frame")]
    FrameMalformed,
    #[error("ERR protocol error: frame too large")]
    FrameTooLarge,
    #[error("ERR protocol error: expected an array of strings")]
    InvalidProtocol,
    #[error("ERR unknown command")]
    UnknownCommand,
    #[error("ERR wrong number of arguments")]
    WrongNumberOfArguments,
    #[error("ERR syntax error")]
    SyntaxError,
    #[error("ERR invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("connection aborted")]
    ConnectionAborted,
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<std::string::FromUtf8Error> for SuggestErr {
    fn from(_: std::string::FromUtf8Error) -> Self {
        SuggestErr::SyntaxError
    }
}

impl From<std::num::ParseIntError> for SuggestErr {
    fn from(_: std::num::ParseIntError) -> Self {
        SuggestErr::SyntaxError
    }
}
