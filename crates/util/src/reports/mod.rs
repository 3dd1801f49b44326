//! Report tooling: column-type mapping, schema extraction/filtering,
//! and the two-input query merger.

pub mod mapping;
pub mod query;
pub mod schema;

pub use mapping::normalize_voluum_column_type;
pub use query::{QueryParseError, ReportQuery, merge_report_query_inputs, parse_query_pairs};
pub use schema::{SchemaFilter, extract_report_schema, filter_schema_columns};
