//! Data layer: instrument files in, permittivity tables out.
//!
//! Architecture:
//! ```text
//!  tab-delimited export (.txt)
//!        │
//!        ▼
//!   ┌──────────┐   device: header row → instrument schema
//!   │  loader   │  parse file → Dataset
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────────┐
//!   │ DatasetStore  │  label → Dataset, label → ε(f) curve
//!   └──────────────┘
//!        │
//!        ▼
//!   ┌──────────────┐
//!   │ permittivity  │  C, tg δ + geometry → ε, ε′, ε″ columns
//!   └──────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ aggregate │  per-temperature tables → per-frequency series
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  export   │  any table → .txt
//!   └──────────┘
//! ```

pub mod aggregate;
pub mod columns;
pub mod device;
pub mod export;
pub mod loader;
pub mod model;
pub mod numeric;
pub mod permittivity;
pub mod store;
