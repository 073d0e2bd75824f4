//! CLI Error Types

use derive_more::{Display, Error};
use std::path::PathBuf;

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("could not load configuration")]
    Config,
    #[display("could not read {}", _0.display())]
    Read(#[error(not(source))] PathBuf),
    #[display("could not load content records")]
    Records,
    #[display("could not open document store")]
    Store,
    #[display("could not set up document engine")]
    Engine,
    #[display("invalid argument: {_0}")]
    Argument(#[error(not(source))] String),
    #[display("could not write output")]
    Output,
}
