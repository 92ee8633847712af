/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (table or missing sentinel)
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ TabularDataset │  header + typed rows, canonical column names
///   └────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  subject filter, projection, pivot → SeriesPoint
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
