//! Authenticated HTTP GET that buffers the whole body in memory.

use super::response::{parse_headers, ResponseHeaders};
use super::FetchOptions;
use crate::error::{FetchError, Result};
use crate::request::AuthToken;
use std::str;

/// Final response of a completed GET.
#[derive(Debug)]
pub(crate) struct Response {
    pub status: u32,
    pub headers: ResponseHeaders,
    pub body: Vec<u8>,
}

/// Performs one GET with `Authorization: Bearer <token>` and returns the buffered
/// response. The curl handle is dropped before this returns, on every path.
/// Non-success statuses are returned as-is; the caller decides what to do.
pub(crate) fn get(url: &str, token: &AuthToken, opts: &FetchOptions) -> Result<Response> {
    let curl_err = |e: curl::Error| FetchError::Transfer {
        url: url.to_string(),
        source: e,
    };

    let mut body: Vec<u8> = Vec::new();
    let mut header_lines: Vec<String> = Vec::new();
    let mut over_limit = false;

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(curl_err)?;
    easy.get(true).map_err(curl_err)?;
    easy.follow_location(true).map_err(curl_err)?;
    easy.max_redirections(10).map_err(curl_err)?;
    easy.connect_timeout(opts.connect_timeout).map_err(curl_err)?;
    if let Some(timeout) = opts.timeout {
        easy.timeout(timeout).map_err(curl_err)?;
    }
    if let Some(stall) = opts.stall_timeout {
        easy.low_speed_limit(opts.stall_min_bytes_per_sec)
            .map_err(curl_err)?;
        easy.low_speed_time(stall).map_err(curl_err)?;
    }
    easy.useragent(&opts.user_agent).map_err(curl_err)?;

    // curl drops this header on redirects to a different host.
    let mut list = curl::easy::List::new();
    list.append(&format!("Authorization: {}", token.header_value()))
        .map_err(curl_err)?;
    easy.http_headers(list).map_err(curl_err)?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    header_lines.push(s.trim_end().to_string());
                }
                true
            })
            .map_err(curl_err)?;
        transfer
            .write_function(|data| {
                if let Some(limit) = opts.max_body_bytes {
                    if body.len() as u64 + data.len() as u64 > limit {
                        over_limit = true;
                        return Ok(0); // abort transfer
                    }
                }
                body.extend_from_slice(data);
                Ok(data.len())
            })
            .map_err(curl_err)?;
        transfer.perform()
    };

    if over_limit {
        return Err(FetchError::BodyTooLarge {
            url: url.to_string(),
            limit: opts.max_body_bytes.unwrap_or_default(),
        });
    }
    let headers = parse_headers(&header_lines);
    if let Err(e) = performed {
        // Connection closed before the advertised Content-Length arrived.
        if e.is_partial_file() {
            if let Some(expected) = headers.content_length {
                return Err(FetchError::PartialTransfer {
                    url: url.to_string(),
                    expected,
                    received: body.len() as u64,
                });
            }
        }
        return Err(curl_err(e));
    }

    let status = easy.response_code().map_err(curl_err)?;
    Ok(Response {
        status,
        headers,
        body,
    })
}
