/// Data layer: wide CSV tables in, chart-ready records out.
///
/// Architecture:
/// ```text
///  Country,2000,2001,...
///        │
///        ▼
///   ┌──────────┐
///   │  parser   │  CSV text → WideTable (entity + year → Cell)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ reshape   │  melt each WideRow → LongRecord (entity, year, value)
///   └──────────┘
///        │
///        ├──────────────────┐
///        ▼                  ▼
///   ┌──────────┐      ┌──────────┐
///   │  join     │      │  filter   │  selection slots / year range / pivot
///   └──────────┘      └──────────┘
///        │                  │
///        ▼                  ▼
///   JoinedRecord       ┌──────────┐
///                      │  stack    │  cumulative [low, high] bands
///                      └──────────┘
/// ```
///
/// `loader` wraps the parser with file access and a background thread so
/// the UI loop never blocks on disk.

pub mod error;
pub mod extent;
pub mod filter;
pub mod join;
pub mod loader;
pub mod model;
pub mod parser;
pub mod reshape;
pub mod stack;
