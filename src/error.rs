//! Error types for the Research Catalogue editor client

/// Result type alias for editor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to the editor
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed at the transport level
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The editor answered with a status other than 200
    #[error("{method} {path} failed with status code {status}")]
    Status {
        method: &'static str,
        path: String,
        status: u16,
    },

    /// A remote postcondition failed: a body that should have been empty was
    /// not, or an expected identifier could not be extracted from it
    #[error("{0}")]
    Remote(String),

    /// A caller-supplied value is outside one of the closed vocabularies
    /// (media type, license, media-set genre)
    #[error("{kind} \"{value}\" is not an accepted value")]
    InvalidVocabulary {
        kind: &'static str,
        value: String,
    },

    /// Upload file extension is not in the content-type table. Kept separate
    /// from [`Error::Remote`]: this is a local validation failure, no request
    /// was ever sent
    #[error("unknown file type: {0}")]
    UnknownFileType(String),

    /// Reading a file to upload failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failed (work children listing)
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// A caller-supplied filter pattern did not compile
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl Error {
    /// Create a remote-postcondition error from a string
    pub fn remote(msg: impl Into<String>) -> Self {
        Self::Remote(msg.into())
    }
}
