use crate::confirmation::DecodeError;
use crate::model::ModelError;
use crate::tools::ToolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("confirmation response {id}: {source}")]
    Confirmation {
        id: String,
        #[source]
        source: DecodeError,
    },

    #[error("plugin {name}: {source}")]
    Plugin {
        name: String,
        #[source]
        source: Box<Error>,
    },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error(transparent)]
    Session(#[from] session::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
