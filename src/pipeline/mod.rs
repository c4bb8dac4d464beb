//! Pipeline stages for document extraction.
//!
//! Each submodule implements exactly one transformation step. Keeping
//! stages separate makes each independently testable and lets the oracle
//! implementation change without touching the surrounding logic.
//!
//! ## Data Flow
//!
//! ```text
//! upload ──▶ payload ──▶ oracle ──▶ parse ──▶ dates ──▶ record
//! (bytes)   (blocks +   (invoke)  (JSON →    (year     (typed
//!            prompt)               fields)    width)    result)
//! ```
//!
//! 1. [`payload`] — classify the upload by extension, base64-encode, and
//!    attach the fixed instruction text
//! 2. [`crate::oracle`] — the only stage with network I/O
//! 3. [`parse`] — strip reply artefacts, parse the JSON contract, degrade
//!    to empty fields when the oracle misbehaves
//! 4. [`crate::dates`] — repair year width on the date fields
//! 5. [`extract`] — orchestrates 1–4 per document type

pub mod extract;
pub mod parse;
pub mod payload;
