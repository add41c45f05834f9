use std::sync::Arc;

use chat_provider::ChatProvider;
use chat_provider_gemini_api::{GeminiProvider, GeminiProviderConfig, GEMINI_API_PROVIDER_ID};
use chat_provider_mock::{MockProvider, MOCK_PROVIDER_ID};

pub const DEFAULT_PROVIDER_ID: &str = GEMINI_API_PROVIDER_ID;
pub const PROVIDER_ENV_VAR: &str = "DOCBOT_PROVIDER";
pub const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";
pub const MODEL_ENV_VAR: &str = "DOCBOT_MODEL";

pub fn provider_from_env() -> Result<Arc<dyn ChatProvider>, String> {
    let provider_id = std::env::var(PROVIDER_ENV_VAR)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    provider_for_id(provider_id.as_deref().unwrap_or(DEFAULT_PROVIDER_ID))
}

pub fn provider_for_id(provider_id: &str) -> Result<Arc<dyn ChatProvider>, String> {
    match provider_id {
        MOCK_PROVIDER_ID => Ok(Arc::new(MockProvider::default())),
        GEMINI_API_PROVIDER_ID => gemini_provider_from_env(),
        unknown => Err(format!(
            "Unsupported provider '{unknown}'. Available providers: {GEMINI_API_PROVIDER_ID}, {MOCK_PROVIDER_ID}"
        )),
    }
}

fn gemini_provider_from_env() -> Result<Arc<dyn ChatProvider>, String> {
    let api_key = std::env::var(API_KEY_ENV_VAR)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| format!("The {API_KEY_ENV_VAR} environment variable is not set."))?;

    let mut config = GeminiProviderConfig::new(api_key);
    if let Some(model_id) = std::env::var(MODEL_ENV_VAR)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
    {
        config = config.with_model_id(model_id);
    }

    let provider = GeminiProvider::new(config)
        .map_err(|error| format!("Failed to initialize gemini-api provider: {error}"))?;

    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, MutexGuard, OnceLock};

    use super::*;

    fn env_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        match mutex.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    struct EnvVarGuard {
        key: &'static str,
        previous: Option<String>,
    }

    impl EnvVarGuard {
        fn set(key: &'static str, value: Option<&str>) -> Self {
            let previous = std::env::var(key).ok();
            match value {
                Some(value) => std::env::set_var(key, value),
                None => std::env::remove_var(key),
            }
            Self { key, previous }
        }
    }

    impl Drop for EnvVarGuard {
        fn drop(&mut self) {
            match self.previous.take() {
                Some(value) => std::env::set_var(self.key, value),
                None => std::env::remove_var(self.key),
            }
        }
    }

    #[test]
    fn provider_for_id_supports_mock() {
        let provider = provider_for_id("mock").expect("mock provider should resolve");
        assert_eq!(provider.profile().provider_id, "mock");
    }

    #[test]
    fn provider_for_id_rejects_unknown_provider() {
        let error = match provider_for_id("custom") {
            Ok(_) => panic!("unknown providers should fail"),
            Err(error) => error,
        };

        assert!(error.contains("Unsupported provider 'custom'"));
    }

    #[test]
    fn gemini_provider_requires_the_api_key() {
        let _env_serialization = lock_unpoisoned(env_lock());
        let _guard = EnvVarGuard::set(API_KEY_ENV_VAR, None);

        let error = match provider_for_id(GEMINI_API_PROVIDER_ID) {
            Ok(_) => panic!("gemini provider should require a key"),
            Err(error) => error,
        };

        assert!(error.contains("GEMINI_API_KEY"));
    }

    #[test]
    fn gemini_provider_resolves_with_key_and_model_override() {
        let _env_serialization = lock_unpoisoned(env_lock());
        let _key = EnvVarGuard::set(API_KEY_ENV_VAR, Some("test-key"));
        let _model = EnvVarGuard::set(MODEL_ENV_VAR, Some("gemini-exp"));

        let provider =
            provider_for_id(GEMINI_API_PROVIDER_ID).expect("gemini provider should resolve");
        let profile = provider.profile();

        assert_eq!(profile.provider_id, GEMINI_API_PROVIDER_ID);
        assert_eq!(profile.model_id, "gemini-exp");
    }

    #[test]
    fn provider_from_env_honors_explicit_mock_selection() {
        let _env_serialization = lock_unpoisoned(env_lock());
        let _guard = EnvVarGuard::set(PROVIDER_ENV_VAR, Some(" mock "));

        let provider = provider_from_env().expect("mock provider should resolve");
        assert_eq!(provider.profile().provider_id, "mock");
    }
}
