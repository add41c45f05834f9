//! Gemini API-backed implementation of the shared `chat_provider` contract.
//!
//! This adapter translates provider-neutral message history into Gemini
//! wire contents, fixes the generation parameters per call, and maps
//! transport failures onto the contract's upload/generation error classes.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chat_provider::{
    ChatProvider, GenerateError, Message, MessagePart, ProviderProfile, UploadError, UploadedFile,
};
use gemini_api::{
    Content, FileHandle, GeminiApiClient, GeminiApiConfig, GeminiApiError, GenerateContentRequest,
    Part,
};

/// Stable provider identifier used for explicit startup selection.
pub const GEMINI_API_PROVIDER_ID: &str = "gemini-api";

/// Model used when the caller does not override one.
pub const DEFAULT_MODEL_ID: &str = "gemini-2.0-flash";

/// Runtime configuration for the Gemini API provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiProviderConfig {
    pub api_key: String,
    pub model_id: String,
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
}

impl GeminiProviderConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            base_url: None,
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn into_gemini_api_config(self) -> GeminiApiConfig {
        let mut config = GeminiApiConfig::new(self.api_key);

        if let Some(base_url) = self.base_url {
            config = config.with_base_url(base_url);
        }

        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }

        config
    }
}

trait TransportClient: Send + Sync {
    fn stream_text(
        &self,
        model: &str,
        request: &GenerateContentRequest,
        on_fragment: &mut dyn FnMut(&str),
    ) -> Result<String, GeminiApiError>;

    fn upload_file(&self, path: &Path) -> Result<FileHandle, GeminiApiError>;
}

#[derive(Debug)]
struct DefaultTransportClient {
    client: GeminiApiClient,
}

impl DefaultTransportClient {
    fn block_on<F: std::future::Future>(&self, future: F) -> Result<F::Output, GeminiApiError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|error| {
                GeminiApiError::Unknown(format!("failed to initialize tokio runtime: {error}"))
            })?;

        Ok(runtime.block_on(future))
    }
}

impl TransportClient for DefaultTransportClient {
    fn stream_text(
        &self,
        model: &str,
        request: &GenerateContentRequest,
        on_fragment: &mut dyn FnMut(&str),
    ) -> Result<String, GeminiApiError> {
        self.block_on(self.client.stream_text(model, request, on_fragment))?
    }

    fn upload_file(&self, path: &Path) -> Result<FileHandle, GeminiApiError> {
        self.block_on(self.client.upload_file(path))?
    }
}

/// `ChatProvider` adapter backed by `gemini_api` transport primitives.
pub struct GeminiProvider {
    model_id: String,
    transport: Arc<dyn TransportClient>,
}

impl GeminiProvider {
    /// Creates a provider using real Gemini API transport.
    pub fn new(config: GeminiProviderConfig) -> Result<Self, GeminiApiError> {
        let model_id = sanitize_model_id(config.model_id.clone());
        let transport = Arc::new(DefaultTransportClient {
            client: GeminiApiClient::new(config.into_gemini_api_config())?,
        });

        Ok(Self {
            model_id,
            transport,
        })
    }

    #[cfg(test)]
    fn with_transport_for_tests(
        model_id: impl Into<String>,
        transport: Arc<dyn TransportClient>,
    ) -> Self {
        Self {
            model_id: sanitize_model_id(model_id.into()),
            transport,
        }
    }
}

impl ChatProvider for GeminiProvider {
    fn profile(&self) -> ProviderProfile {
        ProviderProfile {
            provider_id: GEMINI_API_PROVIDER_ID.to_string(),
            model_id: self.model_id.clone(),
        }
    }

    fn upload_file(&self, path: &Path) -> Result<UploadedFile, UploadError> {
        let handle = self
            .transport
            .upload_file(path)
            .map_err(|error| UploadError::new(path, error.to_string()))?;

        Ok(uploaded_file_from_handle(handle, path))
    }

    fn generate(
        &self,
        history: &[Message],
        on_fragment: &mut dyn FnMut(&str),
    ) -> Result<String, GenerateError> {
        let request = GenerateContentRequest::new(contents_from_history(history));

        self.transport
            .stream_text(&self.model_id, &request, on_fragment)
            .map_err(map_generate_error)
    }
}

/// Convert provider-neutral history into Gemini wire contents, preserving
/// turn order and per-turn part order.
fn contents_from_history(history: &[Message]) -> Vec<Content> {
    history
        .iter()
        .map(|message| Content {
            role: message.role.as_str().to_string(),
            parts: message
                .parts
                .iter()
                .map(|part| match part {
                    MessagePart::Text { text } => Part::text(text.clone()),
                    MessagePart::FileRef { uri, mime_type } => {
                        Part::file_data(uri.clone(), mime_type.clone())
                    }
                })
                .collect(),
        })
        .collect()
}

fn uploaded_file_from_handle(handle: FileHandle, path: &Path) -> UploadedFile {
    let local_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| handle.name.clone());

    UploadedFile {
        name: handle.name,
        display_name: handle.display_name.unwrap_or(local_name),
        uri: handle.uri,
        mime_type: handle.mime_type,
    }
}

fn map_generate_error(error: GeminiApiError) -> GenerateError {
    if error.is_client_error() {
        GenerateError::client(error.to_string())
    } else {
        GenerateError::stream(error.to_string())
    }
}

fn sanitize_model_id(model_id: String) -> String {
    let trimmed = model_id.trim();
    if trimmed.is_empty() {
        DEFAULT_MODEL_ID.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use gemini_api::StatusCode;

    use super::*;

    enum FakeStreamOutcome {
        Success(Vec<String>),
        Error(GeminiApiError),
    }

    struct FakeTransportClient {
        observed_request: Mutex<Option<(String, GenerateContentRequest)>>,
        stream_outcome: Mutex<Option<FakeStreamOutcome>>,
        upload_outcome: Mutex<Option<Result<FileHandle, GeminiApiError>>>,
    }

    impl FakeTransportClient {
        fn streaming(fragments: Vec<&str>) -> Arc<Self> {
            Arc::new(Self {
                observed_request: Mutex::new(None),
                stream_outcome: Mutex::new(Some(FakeStreamOutcome::Success(
                    fragments.into_iter().map(str::to_string).collect(),
                ))),
                upload_outcome: Mutex::new(None),
            })
        }

        fn failing(error: GeminiApiError) -> Arc<Self> {
            Arc::new(Self {
                observed_request: Mutex::new(None),
                stream_outcome: Mutex::new(Some(FakeStreamOutcome::Error(error))),
                upload_outcome: Mutex::new(None),
            })
        }

        fn uploading(outcome: Result<FileHandle, GeminiApiError>) -> Arc<Self> {
            Arc::new(Self {
                observed_request: Mutex::new(None),
                stream_outcome: Mutex::new(None),
                upload_outcome: Mutex::new(Some(outcome)),
            })
        }

        fn observed_request(&self) -> Option<(String, GenerateContentRequest)> {
            lock_unpoisoned(&self.observed_request).clone()
        }
    }

    impl TransportClient for FakeTransportClient {
        fn stream_text(
            &self,
            model: &str,
            request: &GenerateContentRequest,
            on_fragment: &mut dyn FnMut(&str),
        ) -> Result<String, GeminiApiError> {
            *lock_unpoisoned(&self.observed_request) =
                Some((model.to_string(), request.clone()));

            match lock_unpoisoned(&self.stream_outcome).take() {
                Some(FakeStreamOutcome::Success(fragments)) => {
                    let mut accumulated = String::new();
                    for fragment in &fragments {
                        on_fragment(fragment);
                        accumulated.push_str(fragment);
                    }
                    Ok(accumulated)
                }
                Some(FakeStreamOutcome::Error(error)) => Err(error),
                None => panic!("fake stream outcome should be consumed exactly once"),
            }
        }

        fn upload_file(&self, _path: &Path) -> Result<FileHandle, GeminiApiError> {
            match lock_unpoisoned(&self.upload_outcome).take() {
                Some(outcome) => outcome,
                None => panic!("fake upload outcome should be consumed exactly once"),
            }
        }
    }

    fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
        match mutex.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn sample_history() -> Vec<Message> {
        vec![
            Message::user_text("You are a helpful assistant."),
            Message::model_text("Okay, I understand..."),
            Message::user_file(&UploadedFile {
                name: "files/abc123".to_string(),
                display_name: "notes.txt".to_string(),
                uri: "https://example.com/files/abc123".to_string(),
                mime_type: "text/plain".to_string(),
            }),
            Message::user_text("What is in notes.txt?"),
        ]
    }

    #[test]
    fn profile_reports_gemini_provider_id_and_model() {
        let provider = GeminiProvider::with_transport_for_tests(
            "gemini-2.0-flash",
            FakeTransportClient::streaming(Vec::new()),
        );

        let profile = provider.profile();
        assert_eq!(profile.provider_id, GEMINI_API_PROVIDER_ID);
        assert_eq!(profile.model_id, "gemini-2.0-flash");
    }

    #[test]
    fn empty_model_id_defaults_to_safe_gemini_model() {
        let provider = GeminiProvider::with_transport_for_tests(
            "   ",
            FakeTransportClient::streaming(Vec::new()),
        );

        assert_eq!(provider.profile().model_id, DEFAULT_MODEL_ID);
    }

    #[test]
    fn generate_sends_full_history_as_wire_contents() {
        let transport = FakeTransportClient::streaming(vec!["ok"]);
        let provider = GeminiProvider::with_transport_for_tests(
            "gemini-2.0-flash",
            Arc::clone(&transport) as Arc<dyn TransportClient>,
        );

        provider
            .generate(&sample_history(), &mut |_| {})
            .expect("generation should succeed");

        let (model, request) = transport
            .observed_request()
            .expect("transport should observe the request");
        assert_eq!(model, "gemini-2.0-flash");
        assert_eq!(request.contents.len(), 4);
        assert_eq!(request.contents[0].role, "user");
        assert_eq!(request.contents[1].role, "model");
        assert!(request.contents[2].parts[0].file_data.is_some());
        assert_eq!(request.safety_settings.len(), 5);
        assert!(request.generation_config.is_some());
    }

    #[test]
    fn generate_forwards_fragments_and_returns_their_concatenation() {
        let transport = FakeTransportClient::streaming(vec!["The ", "file ", "says X."]);
        let provider =
            GeminiProvider::with_transport_for_tests("gemini-2.0-flash", transport);

        let mut fragments = Vec::new();
        let text = provider
            .generate(&sample_history(), &mut |fragment| {
                fragments.push(fragment.to_string());
            })
            .expect("generation should succeed");

        assert_eq!(text, "The file says X.");
        assert_eq!(fragments, vec!["The ", "file ", "says X."]);
    }

    #[test]
    fn client_class_transport_errors_map_to_client_generate_errors() {
        let transport = FakeTransportClient::failing(GeminiApiError::Status(
            StatusCode::TOO_MANY_REQUESTS,
            "RESOURCE_EXHAUSTED: quota exceeded".to_string(),
        ));
        let provider =
            GeminiProvider::with_transport_for_tests("gemini-2.0-flash", transport);

        let error = provider
            .generate(&sample_history(), &mut |_| {})
            .expect_err("generation should fail");

        assert!(error.is_client());
        assert!(error.to_string().contains("quota exceeded"));
    }

    #[test]
    fn other_transport_errors_map_to_stream_generate_errors() {
        let transport = FakeTransportClient::failing(GeminiApiError::StreamFailed {
            message: "connection reset".to_string(),
        });
        let provider =
            GeminiProvider::with_transport_for_tests("gemini-2.0-flash", transport);

        let error = provider
            .generate(&sample_history(), &mut |_| {})
            .expect_err("generation should fail");

        assert!(!error.is_client());
    }

    #[test]
    fn upload_maps_handles_onto_the_contract_shape() {
        let transport = FakeTransportClient::uploading(Ok(FileHandle {
            name: "files/abc123".to_string(),
            display_name: None,
            uri: "https://example.com/files/abc123".to_string(),
            mime_type: "text/plain".to_string(),
        }));
        let provider =
            GeminiProvider::with_transport_for_tests("gemini-2.0-flash", transport);

        let uploaded = provider
            .upload_file(Path::new("/data/notes.txt"))
            .expect("upload should succeed");

        assert_eq!(uploaded.name, "files/abc123");
        assert_eq!(uploaded.display_name, "notes.txt");
        assert_eq!(uploaded.mime_type, "text/plain");
    }

    #[test]
    fn upload_failures_carry_the_local_path() {
        let transport = FakeTransportClient::uploading(Err(GeminiApiError::Status(
            StatusCode::FORBIDDEN,
            "PERMISSION_DENIED: key rejected".to_string(),
        )));
        let provider =
            GeminiProvider::with_transport_for_tests("gemini-2.0-flash", transport);

        let error = provider
            .upload_file(Path::new("/data/notes.txt"))
            .expect_err("upload should fail");

        assert_eq!(error.path, Path::new("/data/notes.txt"));
        assert!(error.message.contains("key rejected"));
    }
}
