//! Email address validator.
//!
//! The domain part is converted to ASCII (IDNA) before matching, so
//! `user@bücher.de` is checked as `user@xn--bcher-kva.de`.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::foundation::ValidationError;

const ATOM: &str = "[a-z0-9!#$%&'*+/=?^_`{|}~-]";
const IP_DOMAIN: &str = r"\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\]";

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| compile(false));
static EMAIL_WITH_SUFFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| compile(true));

fn compile(require_suffix: bool) -> Regex {
    let labels = if require_suffix { '+' } else { '*' };
    Regex::new(&format!(
        r"(?i)^{ATOM}+(\.{ATOM}+)*@({ATOM}+(\.{ATOM}+){labels}|{IP_DOMAIN})$"
    ))
    .expect("email pattern is a valid regex")
}

/// Converts the domain part to its ASCII form. Literals like `[1.2.3.4]`,
/// numeric hosts and domains the IDNA mapping rejects are matched as written.
fn ascii_domain(domain: &str) -> Cow<'_, str> {
    if domain.starts_with('[') {
        return Cow::Borrowed(domain);
    }
    // `Host::parse` would rewrite `123` or `0x7f` into a dotted quad
    match url::Host::parse(domain) {
        Ok(url::Host::Domain(ascii)) => Cow::Owned(ascii),
        Ok(_) | Err(_) => Cow::Borrowed(domain),
    }
}

fn matches_email(input: &str, require_suffix: bool) -> bool {
    if input.is_empty() {
        return true;
    }
    let Some((local, domain)) = input.rsplit_once('@') else {
        return false;
    };
    let candidate = format!("{local}@{}", ascii_domain(domain));
    if require_suffix {
        EMAIL_WITH_SUFFIX_REGEX.is_match(&candidate)
    } else {
        EMAIL_REGEX.is_match(&candidate)
    }
}

// ============================================================================
// EMAIL VALIDATOR
// ============================================================================

crate::validator! {
    /// Validates email format.
    ///
    /// Empty text passes; presence is the job of a required constraint. By
    /// default the domain must have a dotted suffix (`example.com`, not
    /// `localhost`); see [`Email::suffix_optional`].
    #[derive(Copy, PartialEq, Eq)]
    pub Email { require_suffix: bool } for str;
    rule(self, input) { matches_email(input, self.require_suffix) }
    error(self, input) {
        ValidationError::invalid_format("", "email")
            .with_param("require_suffix", self.require_suffix.to_string())
    }
    new() { Self { require_suffix: true } }
    fn email();
}

impl Email {
    /// Accepts single-label domains such as `user@intranet`.
    #[must_use = "builder methods must be chained or built"]
    pub fn suffix_optional(mut self) -> Self {
        self.require_suffix = false;
        self
    }
}

impl Default for Email {
    fn default() -> Self {
        Self::new()
    }
}
