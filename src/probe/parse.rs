// Parsers for `curl -I` and `ping` text output.

use super::{HeadProbe, HeadResponse};

/// Headers that indicate the response came over a hardened TLS front end.
const SECURITY_HEADERS: [&str; 3] = [
    "x-served-by",
    "strict-transport-security",
    "x-content-type-options",
];

/// Parse the header dump of a HEAD request. With redirects followed there may be several
/// responses; the first status line wins.
pub fn parse_head_output(output: &str) -> HeadProbe {
    if output.trim().is_empty() {
        return HeadProbe::NoResponse;
    }

    let mut status_code = None;
    let mut saw_http = false;
    let mut security_header = false;
    for line in output.lines() {
        let line = line.trim();
        if line.get(..5).is_some_and(|p| p.eq_ignore_ascii_case("HTTP/")) {
            saw_http = true;
            if status_code.is_none() {
                status_code = parse_status_line(line);
            }
            continue;
        }
        if let Some((name, _)) = line.split_once(':') {
            let name = name.trim();
            if SECURITY_HEADERS
                .iter()
                .any(|h| name.eq_ignore_ascii_case(h))
            {
                security_header = true;
            }
        }
    }

    HeadProbe::Response(HeadResponse {
        status_code,
        security_headers: saw_http && security_header,
    })
}

/// `HTTP/<major>[.<minor>] <code> ...` → code.
fn parse_status_line(line: &str) -> Option<u16> {
    let rest = line.get(5..)?;
    let mut parts = rest.split_whitespace();
    let version = parts.next()?;
    if !is_http_version(version) {
        return None;
    }
    let code = parts.next()?;
    let digits: String = code.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

fn is_http_version(v: &str) -> bool {
    let mut chars = v.chars();
    match (chars.next(), chars.next(), chars.next(), chars.next()) {
        (Some(major), None, _, _) => major.is_ascii_digit(),
        (Some(major), Some('.'), Some(minor), None) => {
            major.is_ascii_digit() && minor.is_ascii_digit()
        }
        _ => false,
    }
}

/// A reply line from `ping` carries a TTL (`ttl=` on Unix, `TTL=` on Windows).
pub fn parse_ping_output(output: &str) -> bool {
    output.to_ascii_lowercase().contains("ttl=")
}
