/// Data layer: core types plus the per-file pipeline stages.
///
/// Architecture:
/// ```text
///  .csv / .xlsx
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse bytes → Table (typed columns)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean    │  drop duplicate rows, fill numeric gaps with the mean
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  select   │  project to the chosen column subset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  serialize back to .csv / .xlsx in memory
///   └──────────┘
/// ```
///
/// Every stage is a pure function of its input table plus user-selected
/// parameters; no stage observes another file's state.

pub mod clean;
pub mod export;
pub mod loader;
pub mod model;
pub mod select;
