// src/models/mod.rs

pub mod answer;
pub mod fields;
pub mod question;
pub mod result;
pub mod user;
