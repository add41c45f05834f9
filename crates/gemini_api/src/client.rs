use std::path::Path;

use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Client;

use crate::config::GeminiApiConfig;
use crate::error::{parse_error_message, GeminiApiError};
use crate::headers::{build_headers, ACCEPT_EVENT_STREAM, ACCEPT_JSON, HEADER_UPLOAD_PROTOCOL};
use crate::payload::GenerateContentRequest;
use crate::response::{FileHandle, GenerateContentResponse, UploadFileResponse};
use crate::sse::SseStreamParser;
use crate::url::{stream_generate_content_url, upload_file_url};

#[derive(Debug)]
pub struct GeminiApiClient {
    http: Client,
    config: GeminiApiConfig,
}

impl GeminiApiClient {
    pub fn new(config: GeminiApiConfig) -> Result<Self, GeminiApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(GeminiApiError::from)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &GeminiApiConfig {
        &self.config
    }

    fn request_headers(&self, accept: &str) -> Result<HeaderMap, GeminiApiError> {
        let headers = build_headers(&self.config, accept)?;
        let mut out = HeaderMap::new();
        for (key, value) in headers {
            out.insert(
                HeaderName::from_bytes(key.as_bytes()).map_err(|_| {
                    GeminiApiError::InvalidHeader(format!("invalid header key: {key}"))
                })?,
                HeaderValue::from_str(&value).map_err(|_| {
                    GeminiApiError::InvalidHeader(format!("invalid header value for {key}"))
                })?,
            );
        }
        Ok(out)
    }

    /// Stream one generation call, handing each parsed response frame to
    /// `on_response` in arrival order.
    pub async fn stream_generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
        on_response: &mut dyn FnMut(GenerateContentResponse),
    ) -> Result<(), GeminiApiError> {
        validate_request_contents(request)?;

        let headers = self.request_headers(ACCEPT_EVENT_STREAM)?;
        let response = self
            .http
            .post(stream_generate_content_url(&self.config.base_url, model))
            .headers(headers)
            .json(request)
            .send()
            .await
            .map_err(GeminiApiError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiApiError::Status(
                status,
                parse_error_message(status, &body),
            ));
        }

        let mut bytes = response.bytes_stream();
        let mut parser = SseStreamParser::default();

        while let Some(chunk) = bytes.next().await {
            let chunk = chunk.map_err(GeminiApiError::from)?;
            for frame in parser.feed(&chunk) {
                if let Some(reason) = frame.block_reason() {
                    return Err(GeminiApiError::PromptBlocked {
                        reason: reason.to_string(),
                    });
                }
                on_response(frame);
            }
        }

        Ok(())
    }

    /// Stream one generation call, forwarding text fragments to
    /// `on_fragment` and returning the concatenated response text.
    pub async fn stream_text(
        &self,
        model: &str,
        request: &GenerateContentRequest,
        on_fragment: &mut dyn FnMut(&str),
    ) -> Result<String, GeminiApiError> {
        let mut accumulated = String::new();
        self.stream_generate_content(model, request, &mut |frame| {
            append_frame_text(&frame, &mut accumulated, &mut *on_fragment);
        })
        .await?;

        Ok(accumulated)
    }

    /// Upload one local file to the Files service using the raw protocol
    /// and return its handle.
    pub async fn upload_file(&self, path: &Path) -> Result<FileHandle, GeminiApiError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|error| GeminiApiError::FileRead {
                path: path.to_path_buf(),
                message: error.to_string(),
            })?;

        let headers = self.request_headers(ACCEPT_JSON)?;
        let response = self
            .http
            .post(upload_file_url(&self.config.base_url))
            .headers(headers)
            .header(HEADER_UPLOAD_PROTOCOL, "raw")
            .header(CONTENT_TYPE, mime_type_for_path(path))
            .body(bytes)
            .send()
            .await
            .map_err(GeminiApiError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiApiError::Status(
                status,
                parse_error_message(status, &body),
            ));
        }

        let uploaded: UploadFileResponse = response.json().await.map_err(GeminiApiError::from)?;
        Ok(uploaded.file)
    }
}

/// MIME type for a reference document, derived from its extension.
pub fn mime_type_for_path(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("csv") => "text/csv",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

fn validate_request_contents(request: &GenerateContentRequest) -> Result<(), GeminiApiError> {
    if request.contents.is_empty() {
        return Err(GeminiApiError::InvalidRequestPayload(
            "'contents' must hold at least one turn".to_string(),
        ));
    }

    Ok(())
}

fn append_frame_text(
    frame: &GenerateContentResponse,
    accumulated: &mut String,
    on_fragment: &mut dyn FnMut(&str),
) {
    if let Some(fragment) = frame.text() {
        if !fragment.is_empty() {
            on_fragment(&fragment);
            accumulated.push_str(&fragment);
        }
    }
}
