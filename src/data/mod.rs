/// Data layer: core types, loading, selection and column summaries.
///
/// Architecture:
/// ```text
///  .csv / .xlsx / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Vec<Column>
///   └──────────┘
///        │
///        ▼
///   ┌─────────────────┐
///   │ PressureDataset │  schema check (Time, P2), cached pressure series
///   └─────────────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ selection │  [start, end) row window → Selection
///   └───────────┘
/// ```

pub mod loader;
pub mod model;
pub mod selection;
pub mod summary;
