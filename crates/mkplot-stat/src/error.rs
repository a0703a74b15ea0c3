use std::{io, path::PathBuf};

/// Errors raised while loading, transforming, or persisting result tables.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum StatError {
    #[display("cannot access '{}'", path.display())]
    Io { path: PathBuf, source: io::Error },
    /// The file is not a `{preamble, stats}` result table.
    ///
    /// Loaders treat this as a hint to try another input format.
    #[display("unable to parse '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[display("failed to write '{}'", path.display())]
    Write {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[display("missing preamble key '{key}' in {origin}")]
    MissingPreambleKey { key: String, origin: String },
    /// Clustering needs a single benchmark name per table.
    #[display("preamble key 'benchmark' of {origin} is not a single name; was the collection clustered twice?")]
    NotClusterable { origin: String },
    #[display("no destination given for a table without origin")]
    NoDestination,
    #[display("wrong number of destinations: expected {expected}, got {actual}")]
    DestinationCount { expected: usize, actual: usize },
    #[display("the collection has no tables")]
    EmptyCollection,
}

/// A record in the `stats` object lacks the mandatory fields.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum RecordError {
    #[display("record has no boolean 'status' field")]
    MissingStatus,
    #[display("record has no numeric 'rtime' field")]
    MissingRuntime,
}
