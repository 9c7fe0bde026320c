// src/core/mod.rs

pub mod email;
pub mod html;
pub mod net;
pub mod sanitize;
