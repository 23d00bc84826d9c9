use std::path::PathBuf;

use category_graph_core::CategoryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Category(#[from] CategoryError),

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CliError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        CliError::Json {
            path: path.into(),
            source,
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::Category(e) => e.code(),
            Self::Io { .. } => "IO_ERROR",
            Self::Json { .. } => "DATA_FILE_INVALID",
            Self::Output(_) => "OUTPUT_ERROR",
        }
    }

    /// Process exit status: 3 for missing categories or similarities, 2 for
    /// rejected input, 1 for everything else.
    ///
    /// `similar add` turns a duplicate into a successful report before it
    /// gets here; a duplicate seen at this point comes from a bad data file.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Category(CategoryError::CategoryNotFound(_))
            | Self::Category(CategoryError::EdgeNotFound(..)) => 3,
            Self::Category(CategoryError::InvalidQueryType(_))
            | Self::Category(CategoryError::SelfSimilarity(_))
            | Self::Category(CategoryError::InvalidVertex(_))
            | Self::Category(CategoryError::EmptyGraph)
            | Self::Category(CategoryError::CycleDetected(_)) => 2,
            _ => 1,
        }
    }

    pub fn to_json_error(&self) -> serde_json::Value {
        let body = match self {
            Self::Category(e) => e.to_json_error(),
            _ => serde_json::json!({
                "code": self.code(),
                "message": self.to_string(),
            }),
        };
        serde_json::json!({ "error": body })
    }
}
