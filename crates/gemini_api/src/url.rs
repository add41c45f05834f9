/// Default base URL for Gemini transport requests.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Normalize a configured base URL.
///
/// Normalization rules:
/// 1) an empty or whitespace-only value falls back to the default base URL
/// 2) trailing slashes are removed so endpoint builders can append paths
pub fn normalize_base_url(input: &str) -> String {
    let base = if input.trim().is_empty() {
        DEFAULT_GEMINI_BASE_URL
    } else {
        input.trim()
    };

    base.trim_end_matches('/').to_string()
}

/// Streamed generation endpoint for one model, SSE framing requested.
pub fn stream_generate_content_url(base_url: &str, model: &str) -> String {
    format!(
        "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
        normalize_base_url(base_url),
        model.trim()
    )
}

/// Raw-protocol media upload endpoint for the Files service.
pub fn upload_file_url(base_url: &str) -> String {
    format!("{}/upload/v1beta/files", normalize_base_url(base_url))
}
