//! Login form detection
//!
//! A form counts as a login form when it has a password input and at least
//! one corroborating signal. The password field alone is not enough, and no
//! amount of corroboration helps a form without one.
//!
//! All matching is case-insensitive substring matching.

use crate::document::{Document, NodeRef};

/// Substrings in a form's action/id/name/class that suggest authentication
const LOGIN_PATTERNS: &[&str] = &[
    "login", "log-in", "log_in", "signin", "sign_in", "sign-in", "authenticate", "auth",
    "authentication", "logon", "signon", "sign_on", "sign-on",
];

/// Form attributes whose mere presence counts as an authentication hint
const AUTH_ATTRIBUTES: &[&str] = &["autocomplete", "data-auth", "data-login"];

/// `autocomplete` values browsers use for credential fields
const CREDENTIAL_AUTOCOMPLETE: &[&str] = &["username", "current-password", "new-password"];

/// Phrases that put a form in a sign-in context
const LOGIN_PHRASES: &[&str] = &[
    "sign in to", "log in to", "login to", "welcome back", "welcome to", "enter your",
    "provide your", "access your account", "access account", "your credentials",
    "your password", "authentication required", "login required",
];

/// Field labels typical of credential forms
const FIELD_LABELS: &[&str] = &[
    "username", "user id", "userid", "user-id", "email address", "email addr", "e-mail",
    "password", "passwd", "pass word", "pass-word",
];

/// Submit-control wording that means "log me in"
const SUBMIT_VOCABULARY: &[&str] = &[
    "login", "sign in", "signin", "log in", "authenticate", "continue", "submit", "enter",
    "access", "proceed",
];

/// Input name/id fragments typical of credential fields
const FIELD_KEYWORDS: &[&str] = &[
    "username", "userid", "user_id", "user-name", "password", "passwd", "pass_word", "pass-word",
    "login", "email",
];

/// The individual signals found on one form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoginSignals {
    /// An `<input type="password">` is present
    pub password_field: bool,
    /// Form action/id/name/class contains a login pattern
    pub attribute_pattern: bool,
    /// Credential `autocomplete` value, or an auth attribute on the form
    pub autocomplete: bool,
    /// Form text contains a login phrase or credential label
    pub contextual_text: bool,
    /// A submit control is worded like a login action
    pub submit_text: bool,
    /// An input's name/id contains a credential keyword
    pub field_keyword: bool,
}

impl LoginSignals {
    /// Number of corroborating signals, not counting the password field
    pub fn corroborating(&self) -> usize {
        [
            self.attribute_pattern,
            self.autocomplete,
            self.contextual_text,
            self.submit_text,
            self.field_keyword,
        ]
        .iter()
        .filter(|&&signal| signal)
        .count()
    }

    pub fn is_login(&self) -> bool {
        self.password_field && self.corroborating() > 0
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    let haystack = haystack.to_lowercase();
    needles.iter().any(|needle| haystack.contains(needle))
}

fn is_password_input(node: &NodeRef<'_>) -> bool {
    node.is_element("input")
        && node
            .attr("type")
            .is_some_and(|t| t.trim().eq_ignore_ascii_case("password"))
}

/// Visible label of a submit control, or None if the node is not one
///
/// `<button>` defaults to submit when it has no type.
fn submit_label(node: &NodeRef<'_>) -> Option<String> {
    let kind = node.attr("type").map(|t| t.trim().to_ascii_lowercase());
    if node.is_element("button") {
        match kind.as_deref() {
            None | Some("") | Some("submit") => Some(node.text_content()),
            _ => None,
        }
    } else if node.is_element("input") && kind.as_deref() == Some("submit") {
        Some(node.attr("value").unwrap_or_default().to_string())
    } else {
        None
    }
}

/// Collects every login signal for one `<form>` subtree
pub fn inspect_form(form: NodeRef<'_>) -> LoginSignals {
    let mut signals = LoginSignals::default();

    for (key, value) in form.attrs() {
        if matches!(key, "action" | "id" | "name" | "class") && contains_any(value, LOGIN_PATTERNS) {
            signals.attribute_pattern = true;
        }
        if contains_any(key, AUTH_ATTRIBUTES) {
            signals.autocomplete = true;
        }
    }

    for node in form.descendants() {
        if node.element_name().is_none() {
            continue;
        }

        if node
            .attr("autocomplete")
            .is_some_and(|v| contains_any(v, CREDENTIAL_AUTOCOMPLETE))
        {
            signals.autocomplete = true;
        }

        if node.is_element("input") {
            if is_password_input(&node) {
                signals.password_field = true;
            }
            let named_like_credential = ["name", "id"]
                .iter()
                .filter_map(|attr| node.attr(attr))
                .any(|v| contains_any(v, FIELD_KEYWORDS));
            if named_like_credential {
                signals.field_keyword = true;
            }
        }

        if let Some(label) = submit_label(&node) {
            if contains_any(&label, SUBMIT_VOCABULARY) {
                signals.submit_text = true;
            }
        }
    }

    let text = form.text_content();
    signals.contextual_text = contains_any(&text, LOGIN_PHRASES) || contains_any(&text, FIELD_LABELS);

    signals
}

/// Returns true if the `<form>` subtree looks like a login form
pub fn is_login_form(form: NodeRef<'_>) -> bool {
    inspect_form(form).is_login()
}

/// Returns true if any form in the document looks like a login form
pub fn has_login_form(doc: &Document) -> bool {
    doc.root()
        .descendants()
        .filter(|n| n.is_element("form"))
        .any(is_login_form)
}
