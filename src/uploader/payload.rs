use reqwest::multipart;
use std::collections::BTreeMap;
use std::path::Path;

use crate::assets::FileEntry;
use crate::config::FieldValue;
use crate::errors::AppResult;
use crate::text::strip_query;

pub const FILE_FIELD: &str = "file";
pub const DESTINATION_FIELD: &str = "to";

/// Everything needed to build the multipart body for one attempt
#[derive(Debug, Clone)]
pub struct UploadPayload {
    pub filename: String,
    pub destination: String,
    data: Vec<u8>,
    text_fields: BTreeMap<String, String>,
}

impl UploadPayload {
    pub fn new(entry: &FileEntry, base: &str) -> Self {
        Self {
            filename: entry.filename.clone(),
            destination: entry.destination(base),
            data: entry.content.clone(),
            text_fields: BTreeMap::new(),
        }
    }

    pub fn with_fields(mut self, fields: &BTreeMap<String, FieldValue>) -> Self {
        for (key, value) in fields {
            self.text_fields.insert(key.clone(), value.to_string());
        }
        self
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn text_fields(&self) -> &BTreeMap<String, String> {
        &self.text_fields
    }

    pub fn mime_type(&self) -> &'static str {
        guess_mime_type(strip_query(&self.filename))
    }

    pub fn build_form(&self) -> AppResult<multipart::Form> {
        let part = multipart::Part::bytes(self.data.clone())
            .file_name(file_part_name(&self.filename))
            .mime_str(self.mime_type())?;

        let mut form = multipart::Form::new()
            .part(FILE_FIELD, part)
            .text(DESTINATION_FIELD, self.destination.clone());

        for (key, value) in &self.text_fields {
            form = form.text(key.clone(), value.clone());
        }

        Ok(form)
    }
}

/// Base name sent as the `file` part's file name; the full path travels in `to`.
fn file_part_name(filename: &str) -> String {
    let name = strip_query(filename);
    name.rsplit(['/', '\\']).next().unwrap_or(name).to_string()
}

fn guess_mime_type(filename: &str) -> &'static str {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("js") | Some("mjs") | Some("cjs") => "application/javascript",
        Some("css") => "text/css",
        Some("html") | Some("htm") => "text/html",
        Some("json") | Some("map") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("txt") => "text/plain",
        Some("wasm") => "application/wasm",
        _ => "application/octet-stream",
    }
}
