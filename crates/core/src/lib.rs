//! Core library for aipdf
//!
//! This crate implements the **Functional Core** of the aipdf application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The aipdf project splits into three crates:
//!
//! - **`aipdf_core`** (this crate): Pure transformation functions with zero I/O
//! - **`pdf`**: Text-run extraction from PDF bytes
//! - **`aipdf`**: Model calls, credentials and orchestration (the Imperative Shell)
//!
//! ## Functional Core Principles
//!
//! All functions in this crate adhere to these principles:
//!
//! - **Pure functions**: Same input always produces the same output
//! - **No side effects**: No I/O operations, no network calls
//! - **Deterministic**: Ties and orderings are resolved the same way every run
//! - **Testable**: Can be tested with simple fixture data, no mocking required
//!
//! # Module Organization
//!
//! - [`fontmap`]: Font -> size -> text-run index built from extracted runs
//! - [`headings`]: Inference of the heading `(font, size)` style
//! - [`sections`]: Splitting the document text on heading strings
//! - [`reconcile`]: Fuzzy matching of model output back onto the candidates
//! - [`prompt`]: Prompt templates and completion request parameters
//! - [`models`]: Catalogue of supported models and their capabilities
//! - [`summary`]: Summary map seeding and the skipped-section policy
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use aipdf_core::fontmap::FontMap;
//! use aipdf_core::headings::{candidate_headings, infer_heading_style};
//! use aipdf_core::sections::split_text_into_sections;
//!
//! let fontmap = FontMap::from_runs(runs);
//! let style = infer_heading_style(&fontmap).expect("document has text");
//! let headings = candidate_headings(&fontmap, &style);
//! let sections = split_text_into_sections(&whole_text, &headings)?;
//! ```

pub mod fontmap;
pub mod headings;
pub mod models;
pub mod prompt;
pub mod reconcile;
pub mod sections;
pub mod summary;
