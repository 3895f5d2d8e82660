//! Errors reported to the host page.
//!
//! Scrolling itself never fails: out-of-range offsets are clamped and
//! missing optional nodes are skipped. Errors only come from setup and from
//! loading options.
use crate::NodeId;
use std::fmt;
use std::io;

/// Possible error returned by Overflow.
#[derive(Debug)]
pub enum Error {
    /// A content node given to the manager is not part of the document.
    ContentNotFound(NodeId),

    /// An error occurred when reading an options file.
    Io(io::Error),

    #[cfg(feature = "toml")]
    #[cfg_attr(feature = "doc-cfg", doc(cfg(feature = "toml")))]
    /// An error occurred when parsing the toml content.
    Parse(toml::de::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ContentNotFound(node) => {
                write!(f, "content node {node} is not part of the document")
            }
            Error::Io(err) => write!(f, "could not read options: {err}"),
            #[cfg(feature = "toml")]
            Error::Parse(err) => write!(f, "could not parse options: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ContentNotFound(_) => None,
            Error::Io(err) => Some(err),
            #[cfg(feature = "toml")]
            Error::Parse(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

#[cfg(feature = "toml")]
#[cfg_attr(feature = "doc-cfg", doc(cfg(feature = "toml")))]
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Parse(err)
    }
}
