//! Link classification
//!
//! Every `<a>` element lands in exactly one of three buckets, decided from the
//! href text alone. Links are never dereferenced and hosts are never resolved.

use crate::document::Document;
use crate::url::{is_protocol_relative, same_host, scheme_of};
use serde::{Deserialize, Serialize};
use url::Url;

/// Where an anchor points, relative to the page it was found on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkClass {
    /// Same host as the page, or a relative reference
    Internal,
    /// A different host, or a non-web scheme
    External,
    /// No usable target: missing, empty, `javascript:` or unparseable
    Inaccessible,
}

/// How `mailto:` and `tel:` links are counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecialSchemePolicy {
    Internal,
    /// They leave the site, so they count as external
    #[default]
    External,
}

impl From<SpecialSchemePolicy> for LinkClass {
    fn from(policy: SpecialSchemePolicy) -> Self {
        match policy {
            SpecialSchemePolicy::Internal => LinkClass::Internal,
            SpecialSchemePolicy::External => LinkClass::External,
        }
    }
}

/// Per-class anchor totals for one document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LinkCounts {
    pub internal: usize,
    pub external: usize,
    pub inaccessible: usize,
}

impl LinkCounts {
    /// Adds one anchor to the matching bucket
    pub fn record(&mut self, class: LinkClass) {
        match class {
            LinkClass::Internal => self.internal += 1,
            LinkClass::External => self.external += 1,
            LinkClass::Inaccessible => self.inaccessible += 1,
        }
    }

    /// Number of anchors scanned
    pub fn total(&self) -> usize {
        self.internal + self.external + self.inaccessible
    }
}

/// Classifies hrefs against the URL of the page they appear on
#[derive(Debug, Clone)]
pub struct LinkClassifier {
    page: Url,
    policy: SpecialSchemePolicy,
}

impl LinkClassifier {
    pub fn new(page: Url, policy: SpecialSchemePolicy) -> Self {
        Self { page, policy }
    }

    /// Classifies one href
    ///
    /// Rules are applied in order:
    ///
    /// | href | class |
    /// |------|-------|
    /// | missing or blank | Inaccessible |
    /// | `javascript:` (any case) | Inaccessible |
    /// | relative path, fragment, query | Internal |
    /// | `mailto:` / `tel:` | per `SpecialSchemePolicy` |
    /// | `ftp:` | External |
    /// | `//host/...` | page scheme borrowed, then host compare |
    /// | other absolute | host compare; unparseable → Inaccessible |
    ///
    /// # Examples
    ///
    /// ```
    /// use url::Url;
    /// use webpage_analyzer::analysis::{LinkClass, LinkClassifier, SpecialSchemePolicy};
    ///
    /// let page = Url::parse("https://example.com/").unwrap();
    /// let classifier = LinkClassifier::new(page, SpecialSchemePolicy::External);
    ///
    /// assert_eq!(classifier.classify(Some("/about")), LinkClass::Internal);
    /// assert_eq!(classifier.classify(Some("https://other.com")), LinkClass::External);
    /// assert_eq!(classifier.classify(None), LinkClass::Inaccessible);
    /// ```
    pub fn classify(&self, href: Option<&str>) -> LinkClass {
        let href = match href.map(str::trim) {
            Some(h) if !h.is_empty() => h,
            _ => return LinkClass::Inaccessible,
        };

        match scheme_of(href).as_deref() {
            Some("javascript") => LinkClass::Inaccessible,
            None if is_protocol_relative(href) => {
                self.compare_host(&format!("{}:{}", self.page.scheme(), href))
            }
            None => LinkClass::Internal,
            Some("mailto") | Some("tel") => self.policy.into(),
            Some("ftp") => LinkClass::External,
            Some(_) => self.compare_host(href),
        }
    }

    fn compare_host(&self, absolute: &str) -> LinkClass {
        match Url::parse(absolute) {
            Ok(target) if same_host(&target, &self.page) => LinkClass::Internal,
            Ok(_) => LinkClass::External,
            Err(e) => {
                tracing::trace!("Unparseable href {:?}: {}", absolute, e);
                LinkClass::Inaccessible
            }
        }
    }
}

/// Classifies every anchor in the document
///
/// The totals always add up to the number of `<a>` elements, each counted once.
pub fn count_links(doc: &Document, classifier: &LinkClassifier) -> LinkCounts {
    let mut counts = LinkCounts::default();
    for anchor in doc.root().descendants().filter(|n| n.is_element("a")) {
        counts.record(classifier.classify(anchor.attr("href")));
    }
    counts
}
