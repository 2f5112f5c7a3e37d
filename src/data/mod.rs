/// Data layer: core types, loading, sheet resolution, and insights.
///
/// Architecture:
/// ```text
///  .csv / .xlsx / .xls
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  bytes + filename → TableCollection
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ TableCollection│  sheet name → Table, workbook order
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  resolve  │  pick exactly one Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  insight  │  derive ordered statistical findings
///   └──────────┘
/// ```

pub mod cache;
pub mod insight;
pub mod loader;
pub mod model;
pub mod resolve;
