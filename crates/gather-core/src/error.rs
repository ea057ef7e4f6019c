use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// An `ExecConfig` field out of range or an unparsable `GATHER_*` variable.
    #[error("bad engine config: {0}")]
    Config(String),

    /// A step list or record could not be encoded for digesting.
    #[error("cannot encode value for digest: {0}")]
    Hash(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Hash(e.to_string())
    }
}
