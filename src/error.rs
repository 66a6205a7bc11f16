use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    /// The host never produced a preprocessed dump for this shader. The
    /// caller shows "no data available"; no partial model exists.
    #[error("no preprocessed dump at {path:?}")]
    MissingDumpFile { path: PathBuf },

    /// The dump exists but could not be read.
    #[error("failed to read preprocessed dump {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
