//! Benchmark result tables and their aggregation.
//!
//! This crate provides the data model behind runtime comparison plots:
//!
//! - **Records** ([`record::Record`]): per-instance outcome of one tool, with a
//!   mandatory `status`/`rtime` pair and open-ended extra fields
//! - **Result tables** ([`table::ResultTable`]): all records of one tool run,
//!   loaded from a `{preamble, stats}` JSON file
//! - **Collections** ([`collection::ResultCollection`]): several tables indexed
//!   by the union of their instances, with clustering of partitioned runs and
//!   virtual best solver synthesis
//! - **Criteria** ([`criterion`]): predicates used for reporting and for
//!   invalidating results post hoc
//!
//! # Examples
//!
//! ```
//! use mkplot_stat::{Legend, ResultCollection, ResultTable, ToolSelection, VirtualBest};
//!
//! let a = r#"{"preamble": {"program": "a"},
//!             "stats": {"i1": {"status": true, "rtime": 1.0},
//!                       "i2": {"status": false, "rtime": 10.0}}}"#;
//! let b = r#"{"preamble": {"program": "b"},
//!             "stats": {"i1": {"status": true, "rtime": 2.0},
//!                       "i2": {"status": true, "rtime": 0.5}}}"#;
//! let tables = [a, b]
//!     .into_iter()
//!     .map(|text| ResultTable::from_reader(text.as_bytes()))
//!     .collect::<Result<Vec<_>, _>>()?;
//!
//! let mut collection = ResultCollection::new(tables);
//! let vbs = collection.synthesize_vbs(&VirtualBest::new(ToolSelection::All, 10.0), &Legend::default())?;
//! assert_eq!(vbs.get("i1").map(|r| r.rtime()), Some(1.0));
//! assert_eq!(vbs.get("i2").map(|r| r.rtime()), Some(0.5));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use self::{
    collection::{
        DEFAULT_VBS_LABEL, Disagreement, InstanceListing, ListKind, ResultCollection, TablesMut,
        VirtualBest,
    },
    criterion::{Comparison, Criterion, FailureSign, ParseCriterionError},
    error::{RecordError, StatError},
    preamble::{Legend, Preamble, PreambleValue, ToolSelection},
    record::{FieldValue, Record},
    table::{ResultTable, StatFile},
};

pub mod collection;
pub mod criterion;
pub mod error;
pub mod preamble;
pub mod record;
pub mod table;
