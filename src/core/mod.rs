//! Core XML parsing primitives
//!
//! - Scanner: memchr-accelerated delimiter detection
//! - Tokenizer: pull tokenizer for tags, text and prolog constructs
//! - Entities: predefined and numeric reference decoding with Cow
//! - Attributes: attribute list parsing and namespace declarations
//! - Encoding: UTF-16 detection and conversion to UTF-8

pub mod attributes;
pub mod encoding;
pub mod entities;
pub mod scanner;
pub mod tokenizer;
