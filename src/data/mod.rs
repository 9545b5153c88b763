/// Data layer: table model, loading, cleaning and analysis.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean    │  drop rows with missing cells, collapse duplicates
///   └──────────┘
///        │
///        ├──────────────► outlier    IQR fences on a numeric column
///        │
///        ▼
///   ┌──────────────┐
///   │  sentiment    │  text::normalize → PolarityScorer → `sentiment` column
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ aggregate │  group by key → ranked (key, metric) pairs
///   └──────────┘
/// ```

pub mod aggregate;
pub mod clean;
pub mod lexicon;
pub mod loader;
pub mod model;
pub mod outlier;
pub mod sentiment;
pub mod text;
