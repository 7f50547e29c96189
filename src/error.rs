use std::io;
use std::num::ParseIntError;
use std::result;

/// Errors raised while reading datasets or parsing shell commands. The tree itself never fails:
/// absent keys are reported through `Option` and `bool` results.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid key on line {line}: {source}")]
    ParseKey {
        line: usize,
        #[source]
        source: ParseIntError,
    },
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("command `{0}` expects a key")]
    MissingArgument(&'static str),
    #[error("invalid argument `{value}` for `{command}`")]
    InvalidArgument {
        command: &'static str,
        value: String,
    },
}

pub type Result<T> = result::Result<T, Error>;
