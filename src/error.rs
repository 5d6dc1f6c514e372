use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunletError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid listen address: {0}")]
    ListenAddr(#[from] std::net::AddrParseError),
}

pub type Result<T> = std::result::Result<T, RunletError>;
