//! Blocking HTTP session wrapper
//!
//! Two primitives, POST and GET, against the editor's origin. The underlying
//! `reqwest::blocking::Client` carries the session cookies set at login; one
//! `Transport` maps to one logical actor and all calls take `&mut self`, so a
//! session is never shared between threads.
//!
//! The editor signals transport-level failure only through the HTTP status:
//! anything other than 200 is an error carrying the method, path and code.
//! Body conventions (empty-means-success and friends) are the façade's
//! concern, not this layer's.

use crate::error::{Error, Result};
use crate::form::FormData;
use reqwest::blocking::{multipart, Client};
use tracing::{debug, warn};

/// One file part of a multipart POST, always sent under the `media` field
#[derive(Debug, Clone)]
pub struct FilePart {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl FilePart {
    pub fn new(
        file_name: impl Into<String>,
        bytes: Vec<u8>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            content_type: content_type.into(),
        }
    }

    /// The empty placeholder the media-creation form expects; real bytes are
    /// attached by a later upload call
    pub fn placeholder() -> Self {
        Self::new("", Vec::new(), "application/octet-stream")
    }
}

/// Status and decoded body of the most recent exchange
#[derive(Debug, Clone)]
pub struct LastResponse {
    pub status: u16,
    pub body: String,
}

/// Authenticated HTTP session bound to one editor origin
#[derive(Debug)]
pub struct Transport {
    http: Client,
    base_url: String,
    last: Option<LastResponse>,
}

impl Transport {
    pub(crate) fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            last: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The raw response of the most recent call, for diagnostic inspection
    pub fn last_response(&self) -> Option<&LastResponse> {
        self.last.as_ref()
    }

    /// Form-encoded POST; returns the decoded body on status 200
    pub fn post(&mut self, path: &str, form: &FormData) -> Result<String> {
        debug!("POST {} with {} fields", path, form.pairs().len());
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.post(&url).form(form.pairs()).send()?;
        self.finish("POST", path, response)
    }

    /// Multipart POST with one file part named `media`
    pub fn post_multipart(&mut self, path: &str, form: &FormData, file: FilePart) -> Result<String> {
        debug!(
            "POST {} (multipart, {} bytes) with {} fields",
            path,
            file.bytes.len(),
            form.pairs().len()
        );
        let mut parts = multipart::Form::new();
        for (name, value) in form.pairs() {
            parts = parts.text(name.clone(), value.clone());
        }
        let part = multipart::Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.content_type)?;
        parts = parts.part("media", part);

        let url = format!("{}{}", self.base_url, path);
        let response = self.http.post(&url).multipart(parts).send()?;
        self.finish("POST", path, response)
    }

    /// Query-string GET; returns the decoded body on status 200
    pub fn get(&mut self, path: &str, query: &[(&str, String)]) -> Result<String> {
        debug!("GET {} with {} params", path, query.len());
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.get(&url).query(query).send()?;
        self.finish("GET", path, response)
    }

    fn finish(
        &mut self,
        method: &'static str,
        path: &str,
        response: reqwest::blocking::Response,
    ) -> Result<String> {
        let status = response.status().as_u16();
        let body = response.text()?;
        debug!("{} {} -> {}", method, path, status);

        self.last = Some(LastResponse {
            status,
            body: body.clone(),
        });

        // The editor uses exactly 200 for success, nothing else
        if status != 200 {
            warn!("{} {} failed with status {}", method, path, status);
            return Err(Error::Status {
                method,
                path: path.to_string(),
                status,
            });
        }
        Ok(body)
    }
}
