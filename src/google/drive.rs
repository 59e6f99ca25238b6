use log::debug;
use reqwest::header::{CONTENT_RANGE, RANGE};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use super::service::{check_status, read_json, ServiceHandle};
use crate::error::{CatalogError, Result};

const LIST_FIELDS: &str = "nextPageToken, files(id, name, mimeType)";

/// File metadata returned by a folder listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
    next_page_token: Option<String>,
}

/// Drive v3 `files` endpoints
#[derive(Debug, Clone)]
pub(crate) struct DriveService {
    handle: ServiceHandle,
    page_size: u32,
    chunk_size: u64,
}

impl DriveService {
    pub(crate) fn new(handle: ServiceHandle, page_size: u32, chunk_size: u64) -> Self {
        DriveService {
            handle,
            page_size,
            chunk_size: chunk_size.max(1),
        }
    }

    /// List the non-trashed children of a folder, following page tokens.
    pub(crate) fn list_folder(&self, folder_id: &str) -> Result<Vec<DriveFile>> {
        let q = format!("'{}' in parents and trashed = false", folder_id);
        let page_size = self.page_size.to_string();
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;
        let mut seen_tokens: HashSet<String> = HashSet::new();

        loop {
            let url = self.handle.endpoint(&["drive", "v3", "files"]);
            let mut query = vec![
                ("q", q.as_str()),
                ("pageSize", page_size.as_str()),
                ("fields", LIST_FIELDS),
            ];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }

            let response = self.handle.request(Method::GET, url).query(&query).send()?;
            let page: FileList = read_json(response)?;
            debug!(
                "Listed {} files in {} (more: {})",
                page.files.len(),
                folder_id,
                page.next_page_token.is_some()
            );
            items.extend(page.files);

            match page.next_page_token {
                Some(next) if !seen_tokens.insert(next.clone()) => {
                    return Err(CatalogError::Pagination(format!(
                        "page token {} returned twice while listing {}",
                        next, folder_id
                    )));
                }
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        Ok(items)
    }

    /// Download file content in ranged chunks and write it to `dest` once
    /// complete.
    ///
    /// The content is assembled in memory, then written to a temporary file
    /// next to `dest` which is renamed over it. A failed download leaves
    /// `dest` untouched.
    pub(crate) fn download(&self, file_id: &str, dest: &Path) -> Result<()> {
        let mut buffer: Vec<u8> = Vec::new();
        let mut total: Option<u64> = None;

        loop {
            let start = buffer.len() as u64;
            let end = start + self.chunk_size - 1;
            let url = self.handle.endpoint(&["drive", "v3", "files", file_id]);
            let response = self
                .handle
                .request(Method::GET, url)
                .query(&[("alt", "media")])
                .header(RANGE, format!("bytes={}-{}", start, end))
                .send()?;

            match response.status() {
                StatusCode::PARTIAL_CONTENT => {
                    if let Some(content_range) = response.headers().get(CONTENT_RANGE) {
                        total = content_range
                            .to_str()
                            .ok()
                            .and_then(parse_content_range_total)
                            .or(total);
                    }
                    let chunk = response.bytes()?;
                    let received = chunk.len() as u64;
                    buffer.extend_from_slice(&chunk);

                    let done = match total {
                        Some(total) => buffer.len() as u64 >= total,
                        None => received < self.chunk_size,
                    };
                    if let Some(total) = total.filter(|t| *t > 0) {
                        debug!("Download {}%.", buffer.len() as u64 * 100 / total);
                    }
                    if done || received == 0 {
                        break;
                    }
                }
                // server ignored the range header and sent everything
                StatusCode::OK => {
                    buffer.extend_from_slice(&response.bytes()?);
                    break;
                }
                // empty file, or the previous chunk ended exactly on the
                // last byte of a file of unknown size
                StatusCode::RANGE_NOT_SATISFIABLE
                    if start == 0 || total.map_or(true, |total| start >= total) =>
                {
                    break
                }
                _ => {
                    let response = check_status(response)?;
                    return Err(CatalogError::Api {
                        status: response.status().as_u16(),
                        message: format!("unexpected response while downloading {}", file_id),
                    });
                }
            }
        }

        debug!("Downloaded {} bytes of {}", buffer.len(), file_id);
        write_atomically(dest, &buffer)
    }
}

/// Total size from a `Content-Range: bytes 0-99/1234` header. `*` totals
/// are unknown.
fn parse_content_range_total(value: &str) -> Option<u64> {
    value.rsplit_once('/').and_then(|(_, total)| total.trim().parse().ok())
}

fn write_atomically(dest: &Path, content: &[u8]) -> Result<()> {
    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(dest).map_err(|e| CatalogError::Io(e.error))?;
    Ok(())
}
