//! Pure functions over raw text: homograph detection, terminal-injection
//! detection, trusted-domain matching, and URL risk scoring.
//!
//! None of these touch the token stream — they operate on `&str` slices
//! pulled out of a command (a URL argument, the whole raw command line) and
//! never allocate more than the output they return.

use crate::patterns::RE_URL_HOST;

/// The Unicode script buckets [`has_homograph`] classifies non-ASCII
/// hostname characters into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Script {
    Latin,
    Cyrillic,
    Greek,
    Other,
}

fn classify(c: char) -> Script {
    match c as u32 {
        0x0041..=0x005A | 0x0061..=0x007A => Script::Latin,
        0x0400..=0x04FF => Script::Cyrillic,
        0x0370..=0x03FF => Script::Greek,
        _ => Script::Other,
    }
}

/// Extracts the hostname portion of an `http(s)://` URL: strips scheme,
/// userinfo, path, query, fragment, and port.
fn extract_host(url: &str) -> Option<&str> {
    let caps = RE_URL_HOST.captures(url)?;
    let host = caps.get(1)?.as_str();
    Some(host.split(':').next().unwrap_or(host))
}

/// `true` iff `text` contains a hostname whose character scripts are mixed
/// in a way that suggests a homograph/IDN spoof: it has at least
/// one non-ASCII letter, and either mixes Latin with a non-Latin script, or
/// uses two or more distinct non-Latin scripts. A hostname written entirely
/// in one non-Latin script is IDN-safe and not flagged.
///
/// Checks both URL-like candidates (`https://host/...`) and bare dotted-host
/// candidates with no scheme at all — `ssh user@host.tld`,
/// `git clone user@host.tld:x/y`, `scp file.txt host.tld:/tmp` — since a
/// homograph host is just as spoofable without a protocol prefix.
pub fn has_homograph(text: &str) -> bool {
    for url in crate::patterns::RE_URL_FIND.find_iter(text) {
        if let Some(host) = extract_host(url.as_str()) {
            if host_is_homograph(host) {
                return true;
            }
        }
    }
    for caps in crate::patterns::RE_DOTTED_HOST_FIND.captures_iter(text) {
        if let Some(host) = caps.get(1) {
            if host_is_homograph(host.as_str()) {
                return true;
            }
        }
    }
    false
}

fn host_is_homograph(host: &str) -> bool {
    let mut saw_latin = false;
    let mut non_latin_scripts = std::collections::HashSet::new();
    let mut saw_non_ascii_letter = false;

    for c in host.chars() {
        if !c.is_alphabetic() {
            continue;
        }
        if !c.is_ascii() {
            saw_non_ascii_letter = true;
        }
        match classify(c) {
            Script::Latin => saw_latin = true,
            other => {
                non_latin_scripts.insert(other);
            }
        }
    }

    saw_non_ascii_letter && (saw_latin && !non_latin_scripts.is_empty() || non_latin_scripts.len() >= 2)
}

/// Terminal-injection finding kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalThreat {
    EscapeSequence,
    HiddenCharacters,
}

/// Scans `text` for raw ANSI CSI escape sequences (`ESC [`) or zero-width /
/// BOM characters (U+200B–U+200D, U+FEFF) that could hide or spoof terminal
/// output. Returns the first kind found, `EscapeSequence` taking precedence
/// since it is the more actively dangerous of the two.
pub fn check_terminal_injection(text: &str) -> Option<TerminalThreat> {
    let bytes: Vec<char> = text.chars().collect();
    for window in bytes.windows(2) {
        if window[0] == '\u{1b}' && window[1] == '[' {
            return Some(TerminalThreat::EscapeSequence);
        }
    }
    if text
        .chars()
        .any(|c| matches!(c, '\u{200B}'..='\u{200D}' | '\u{FEFF}'))
    {
        return Some(TerminalThreat::HiddenCharacters);
    }
    None
}

/// `true` iff `host` (as extracted from a URL) equals, or is a subdomain of,
/// some entry in `trusted`. Subdomain matching uses a dot-anchored suffix
/// check so that `evil-github.com` cannot spoof `github.com`.
pub fn is_trusted_domain(host: &str, trusted: &[String]) -> bool {
    let host = host.to_ascii_lowercase();
    trusted.iter().any(|entry| {
        let entry = entry.to_ascii_lowercase();
        host == entry || host.strip_suffix(&format!(".{entry}")).is_some()
    })
}

/// `true` iff `url`'s host is trusted per [`is_trusted_domain`]; returns
/// `false` (untrusted) if the host cannot be extracted at all.
pub fn url_is_trusted(url: &str, trusted: &[String]) -> bool {
    extract_host(url)
        .map(|host| is_trusted_domain(host, trusted))
        .unwrap_or(false)
}

/// Scores a URL's risk 0–100, clamped: non-HTTPS scheme (+30),
/// userinfo present (+30), punycode host (`xn--`) (+15), IP-literal host
/// (+20), homograph-mixed-scripts host (+25), untrusted host (+10), URL
/// longer than 100 characters (+10).
pub fn score_url_risk(url: &str, trusted: &[String]) -> u32 {
    let mut score: u32 = 0;

    if !url.to_ascii_lowercase().starts_with("https://") {
        score += 30;
    }
    if url.contains('@') && RE_URL_HOST.is_match(url) {
        score += 30;
    }
    if let Some(host) = extract_host(url) {
        if host.to_ascii_lowercase().contains("xn--") {
            score += 15;
        }
        if host.parse::<std::net::IpAddr>().is_ok() {
            score += 20;
        }
        if host_is_homograph(host) {
            score += 25;
        }
        if !is_trusted_domain(host, trusted) {
            score += 10;
        }
    }
    if url.chars().count() > 100 {
        score += 10;
    }

    score.min(100)
}
