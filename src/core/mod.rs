//! Core scanning primitives
//!
//! - `scanner`: memchr-backed byte cursor
//! - `tokenizer`: lenient markup tokenizer with byte spans
//! - `attributes`: tag attribute parsing
//! - `entities`: entity decoding and recovery escaping

pub mod attributes;
pub mod entities;
pub mod scanner;
pub mod tokenizer;
