//
//  mod.rs
//  Refmap
//
//  Created by hak (tharun)
//

pub mod document;
pub mod extractor;
pub mod format;

pub use document::{decode_file, decode_str, DecodeError, Document};
pub use extractor::{classify, extract_references, is_template, Extraction};
pub use format::DocumentFormat;
