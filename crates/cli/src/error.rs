#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("an option key is required, as `section.option`")]
    MissingKey,

    #[error("invalid option key `{0}`, expected `section.option`")]
    InvalidKey(String),

    #[error("unknown option `{0}`")]
    UnknownOption(String),
}
