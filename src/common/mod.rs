// src/common/mod.rs

pub mod error;
