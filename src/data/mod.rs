/// Data layer: core types, loading, filtering, tallies, and export.
///
/// Architecture:
/// ```text
///  .csv / URL / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read source → OrderTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply per-column criteria → filtered OrderTable
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │ summary   │   │  export   │  filtered table → CSV bytes
///   └──────────┘   └──────────┘
///     status tallies
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod summary;
