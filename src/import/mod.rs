// src/import/mod.rs

pub mod logic;
mod sheet;

pub use logic::{ImportLogic, ImportOptions, ImportReport};
