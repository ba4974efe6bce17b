use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a catalog pass
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Cannot create output directory {}", path.display())]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot copy file from {} -> {}", from.display(), to.display())]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot list output directory {}", path.display())]
    ListOutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error writing to file {}", path.display())]
    WriteIndex {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
