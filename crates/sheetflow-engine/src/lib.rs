//! sheetflow_engine - formula language, dependency graph and recalculation order.

pub mod engine;
