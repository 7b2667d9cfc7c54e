// src/services/mod.rs

pub mod attempt;
pub mod quiz;
