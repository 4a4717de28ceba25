use thiserror::Error;

/// Errors that make a filtering run fall back to pass-through.
#[derive(Error, Debug)]
pub enum RfcError {
    #[error("Rule document too short: {len} characters, at least {min} needed")]
    RulesTooShort { len: usize, min: usize },

    #[error("Rule document is not a JSON object")]
    RulesNotAnObject,

    #[error("Rule document is not valid JSON: {0}")]
    RulesJson(#[from] serde_json::Error),

    #[error(transparent)]
    CoreError(#[from] icsfilter_core::error::CoreError),
}

pub type RfcResult<T> = std::result::Result<T, RfcError>;
