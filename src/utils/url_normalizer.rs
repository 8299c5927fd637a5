//! URL normalization and validation for link targets.
//!
//! Turns raw user input into a canonical absolute `http`/`https` URL or rejects
//! it with a [`UrlError`]. The same hostname predicate backs both the blocking
//! validation path ([`normalize_and_validate`]) and the advisory path
//! ([`advise`]), so the two can never disagree about a hostname.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Any explicit `<scheme>://` prefix.
static SCHEME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").unwrap());

/// Dotted-quad shape; octet ranges are checked separately.
static IPV4_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{1,3}(\.[0-9]{1,3}){3}$").unwrap());

/// One or more labels followed by an alphabetic TLD of at least two characters.
static HOSTNAME_TLD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$").unwrap()
});

const DEFAULT_SCHEME_PREFIX: &str = "https://";

/// Title shown alongside an advisory hostname warning.
pub const WARNING_TITLE: &str = "Suspicious URL format";

/// Reasons a target URL is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UrlError {
    #[error("Original URL cannot be empty")]
    Empty,

    #[error("URL must not contain control characters")]
    ControlCharacter,

    #[error("URL must start with http:// or https://")]
    Scheme,

    #[error("Invalid URL: missing hostname")]
    NoHost,

    #[error("Invalid IPv4 address in URL")]
    BadIpv4,

    #[error("Invalid hostname. Please include a valid domain (e.g. example.com)")]
    BadHostname,
}

impl UrlError {
    /// Stable machine-readable reason code.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::ControlCharacter => "control-character",
            Self::Scheme => "scheme",
            Self::NoHost => "no-host",
            Self::BadIpv4 => "bad-ipv4",
            Self::BadHostname => "bad-hostname",
        }
    }
}

/// Advisory warning shown before a suspicious URL is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlWarning {
    pub title: &'static str,
    pub message: String,
}

/// Result of the non-blocking URL check used for interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlAdvice {
    /// Input after trimming and scheme prefixing.
    pub normalized: String,
    /// Present when the hostname looks malformed.
    pub warning: Option<UrlWarning>,
}

/// The pieces of an absolute URL needed for validation.
///
/// Borrowed views into the input; nothing is re-encoded or rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct UrlParts<'a> {
    scheme: &'a str,
    authority: &'a str,
}

impl<'a> UrlParts<'a> {
    fn split(url: &'a str) -> Option<Self> {
        let (scheme, rest) = url.split_once("://")?;
        let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());

        Some(Self {
            scheme,
            authority: &rest[..end],
        })
    }

    /// Hostname without userinfo or port, lower-cased.
    fn hostname(&self) -> String {
        let host_port = match self.authority.rfind('@') {
            Some(at) => &self.authority[at + 1..],
            None => self.authority,
        };

        let host = if let Some(bracketed) = host_port.strip_prefix('[') {
            // IPv6 literal
            bracketed.split(']').next().unwrap_or_default()
        } else {
            host_port.split(':').next().unwrap_or_default()
        };

        host.to_ascii_lowercase()
    }
}

/// Trims input and prepends `https://` when no scheme is present.
///
/// Strings that already carry a scheme are returned trimmed but otherwise
/// untouched, whatever that scheme is.
fn apply_default_scheme(raw: &str) -> String {
    let trimmed = raw.trim();

    if trimmed.is_empty() || SCHEME_REGEX.is_match(trimmed) {
        trimmed.to_string()
    } else {
        format!("{DEFAULT_SCHEME_PREFIX}{trimmed}")
    }
}

/// Hostname acceptance predicate shared by validation and advice.
///
/// Precedence: `localhost`, then dotted-quad IPv4 (octets must be 0-255),
/// then the domain grammar.
pub fn classify_host(hostname: &str) -> Result<(), UrlError> {
    if hostname == "localhost" {
        return Ok(());
    }

    if IPV4_REGEX.is_match(hostname) {
        let in_range = hostname
            .split('.')
            .all(|octet| octet.parse::<u16>().is_ok_and(|value| value <= 255));

        return if in_range {
            Ok(())
        } else {
            Err(UrlError::BadIpv4)
        };
    }

    if HOSTNAME_TLD_REGEX.is_match(hostname) {
        Ok(())
    } else {
        Err(UrlError::BadHostname)
    }
}

/// Normalizes raw input into an absolute URL and validates it.
///
/// # Rules
///
/// 1. Surrounding whitespace is trimmed; empty input is rejected, as is
///    input containing ASCII control characters
/// 2. Input without a scheme gets `https://` prepended
/// 3. Scheme must be `http` or `https` (any case)
/// 4. Hostname must be present and accepted by [`classify_host`]
///
/// Path, query, fragment, port and userinfo are returned exactly as given,
/// so the output is safe to use verbatim as a `Location` header. The function
/// is idempotent: feeding its output back in yields the same string.
///
/// # Errors
///
/// Returns the first [`UrlError`] encountered, in the order above.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_and_validate("example.com").unwrap(), "https://example.com");
/// assert_eq!(normalize_and_validate("ftp://example.com"), Err(UrlError::Scheme));
/// ```
pub fn normalize_and_validate(raw: &str) -> Result<String, UrlError> {
    let normalized = apply_default_scheme(raw);
    if normalized.is_empty() {
        return Err(UrlError::Empty);
    }
    if normalized.chars().any(|c| c.is_ascii_control()) {
        return Err(UrlError::ControlCharacter);
    }

    let parts = UrlParts::split(&normalized).ok_or(UrlError::Scheme)?;

    if !parts.scheme.eq_ignore_ascii_case("http") && !parts.scheme.eq_ignore_ascii_case("https")
    {
        return Err(UrlError::Scheme);
    }

    let hostname = parts.hostname();
    if hostname.is_empty() {
        return Err(UrlError::NoHost);
    }

    classify_host(&hostname)?;

    Ok(normalized)
}

/// Non-blocking check for interactive input.
///
/// Applies the same trimming and scheme prefixing as
/// [`normalize_and_validate`] and warns when the hostname fails
/// [`classify_host`]. Never fails; scheme problems and missing hosts are left
/// to the blocking path.
pub fn advise(raw: &str) -> UrlAdvice {
    let normalized = apply_default_scheme(raw);

    let warning = UrlParts::split(&normalized)
        .map(|parts| parts.hostname())
        .filter(|hostname| !hostname.is_empty())
        .filter(|hostname| classify_host(hostname).is_err())
        .map(|hostname| UrlWarning {
            title: WARNING_TITLE,
            message: format!(
                "The hostname \"{hostname}\" does not look like a valid domain. \
                 Please include a full domain (e.g. example.com) or a valid IP."
            ),
        });

    UrlAdvice {
        normalized,
        warning,
    }
}
