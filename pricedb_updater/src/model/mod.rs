//! Data model types received from the chart service.
//!
//! - `chart` — fund chart payloads and their conversion into price records.
pub mod chart;
