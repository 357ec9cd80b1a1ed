//! Analysis module
//!
//! This module contains the read-only passes over a parsed document:
//! - Link classification (internal, external, inaccessible)
//! - Login form detection
//! - HTML version, title and heading extraction
//! - The pass registry and the record the passes fill in

mod extractors;
mod fields;
mod links;
mod login;
mod record;

pub use extractors::{
    ExtractError, Extractor, ExtractorRegistry, HeadingsExtractor, HtmlVersionExtractor,
    LinksExtractor, LoginFormExtractor, PassOutput, TitleExtractor, run_pass,
};
pub use fields::{classify_doctype, heading_histogram, html_version, page_title, IMPLIED_HTML5};
pub use links::{count_links, LinkClass, LinkClassifier, LinkCounts, SpecialSchemePolicy};
pub use login::{has_login_form, inspect_form, is_login_form, LoginSignals};
pub use record::{format_duration, AnalysisRecord, PassFailure, RecordBuilder};
