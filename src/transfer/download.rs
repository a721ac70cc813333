use reqwest::blocking as http;
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::redirect::Policy as RedirectPolicy;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::utils::is_plain_file_name;

/// Blocking client with connect/overall timeouts and a bounded redirect chain.
pub fn http_client() -> Result<http::Client> {
    let client = http::Client::builder()
        .connect_timeout(Duration::from_secs(15))
        // Generous overall timeout for large checkpoints
        .timeout(Duration::from_secs(60 * 60))
        // Follow redirects from model hubs -> CDN endpoints
        .redirect(RedirectPolicy::limited(10))
        .user_agent(format!("presetdesk/{}", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Filename announced by a `Content-Disposition` header, if any.
///
/// Takes the value after the last `filename=`. A quoted value runs to its closing quote and
/// may contain `;`; an unquoted one stops at the next `;`.
pub fn filename_from_content_disposition(header: &str) -> Option<String> {
    let (_, rest) = header.rsplit_once("filename=")?;
    let rest = rest.trim_start();
    let value = match rest.strip_prefix('"') {
        Some(quoted) => quoted.split('"').next().unwrap_or(""),
        None => rest.split(';').next().unwrap_or(""),
    };
    base_name(value.trim())
}

/// Last segment of the URL path, percent-decoded.
pub fn filename_from_url(url: &reqwest::Url) -> Option<String> {
    let last = url.path_segments()?.rev().find(|s| !s.is_empty())?;
    let decoded = urlencoding::decode(last).ok()?;
    base_name(&decoded)
}

// Final path component only; derived names never leave the target folder.
fn base_name(value: &str) -> Option<String> {
    let name = value.rsplit(['/', '\\']).next().unwrap_or("").trim();
    if is_plain_file_name(name) {
        Some(name.to_string())
    } else {
        None
    }
}

/// GET `url` into `target_dir`, naming the file from the response.
///
/// Progress is reported as `(written, total)`; `total` is 0 when the server sends no length.
/// An existing file with the derived name is left in place and its path returned.
pub fn download_into<F>(url: &str, target_dir: &Path, mut on_progress: F) -> Result<PathBuf>
where
    F: FnMut(u64, u64),
{
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| Error::Validation(format!("invalid URL: {e}")))?;

    let client = http_client()?;
    tracing::info!("[Download] Requesting: {}", url);
    let resp = client.get(parsed.clone()).send()?;
    tracing::info!("[Download] Response: {:?} {}", resp.version(), resp.status());
    if !resp.status().is_success() {
        return Err(Error::Network(format!("download failed: {}", resp.status())));
    }

    let from_header = resp
        .headers()
        .get(CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .filter(|v| v.contains("filename="))
        .and_then(filename_from_content_disposition);
    let filename = from_header
        .or_else(|| filename_from_url(&parsed))
        .ok_or_else(|| Error::Validation(format!("cannot derive a file name from {url}")))?;

    std::fs::create_dir_all(target_dir).map_err(|e| Error::fs(target_dir, e))?;
    let dest = target_dir.join(&filename);
    if dest.exists() {
        tracing::info!("[Download] {} already exists, skipping", dest.display());
        return Ok(dest);
    }

    let total = resp.content_length().unwrap_or(0);
    let mut reader = resp;
    let mut downloaded: u64 = 0;

    // Unique temp file next to the destination; removed on drop unless persisted
    let mut tmp = tempfile::Builder::new()
        .prefix(&format!(".{filename}."))
        .suffix(".download")
        .tempfile_in(target_dir)
        .map_err(|e| Error::fs(target_dir, e))?;
    let tmp_path = tmp.path().to_path_buf();

    let mut buf = [0u8; 1024 * 64];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => return Err(Error::Network(format!("read error: {e}"))),
        };
        tmp.write_all(&buf[..n])
            .map_err(|e| Error::fs(&tmp_path, e))?;
        downloaded = downloaded.saturating_add(n as u64);
        on_progress(downloaded, total);
    }
    tmp.flush().map_err(|e| Error::fs(&tmp_path, e))?;

    // atomically move into place
    tmp.persist(&dest).map_err(|e| Error::fs(&dest, e.error))?;
    tracing::info!("[Download] Wrote {} bytes to {}", downloaded, dest.display());
    Ok(dest)
}
