//! Parse HTTP response header lines collected by curl.

/// Headers of the final response that the fetcher cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ResponseHeaders {
    pub content_length: Option<u64>,
    pub content_type: Option<String>,
}

/// Parse collected header lines. curl reports the headers of every response in
/// a redirect chain; each status line starts a fresh set so only the final
/// response counts.
pub(crate) fn parse_headers(lines: &[String]) -> ResponseHeaders {
    let mut out = ResponseHeaders::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            out = ResponseHeaders::default();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                out.content_length = value.parse::<u64>().ok();
            } else if name.eq_ignore_ascii_case("content-type") {
                out.content_type = Some(value.to_string());
            }
        }
    }

    out
}
