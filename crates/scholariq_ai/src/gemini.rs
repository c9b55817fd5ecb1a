use std::fmt;

use scholariq_core::domain::ModelTier;
use scholariq_core::error::{AppError, CONFIG_INVALID};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_PRO_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_FLASH_MODEL: &str = "gemini-2.5-flash";

/// Connection settings for the Gemini `generateContent` API.
#[derive(Clone)]
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    pro_model: String,
    flash_model: String,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("pro_model", &self.pro_model)
            .field("flash_model", &self.flash_model)
            .finish()
    }
}

fn invalid(message: &str, details: String) -> AppError {
    AppError::new(CONFIG_INVALID, message).with_details(details)
}

/// Accepts `https://host[:port]` and plain-http loopback (`http://127.0.0.1:port`) for local
/// stubs. Paths, userinfo and empty ports are rejected.
fn check_base_url(base_url: &str) -> Result<(), AppError> {
    let (scheme, rest) = base_url
        .split_once("://")
        .ok_or_else(|| invalid("Gemini base URL must include a scheme", format!("base_url={base_url}")))?;

    if rest.is_empty() || rest.contains(['/', '@', '?', '#']) || rest.chars().any(char::is_whitespace) {
        return Err(invalid(
            "Gemini base URL must be scheme://host[:port]",
            format!("base_url={base_url}"),
        ));
    }

    let (host, port) = match rest.rsplit_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (rest, None),
    };
    if host.is_empty() {
        return Err(invalid("Gemini base URL has no host", format!("base_url={base_url}")));
    }
    if let Some(port) = port {
        if !matches!(port.parse::<u16>(), Ok(p) if p > 0) {
            return Err(invalid("Gemini base URL has an invalid port", format!("base_url={base_url}")));
        }
    }

    match scheme {
        "https" => Ok(()),
        "http" if host == "127.0.0.1" => Ok(()),
        _ => Err(invalid(
            "Gemini base URL must use https (plain http only on 127.0.0.1)",
            format!("base_url={base_url}"),
        )),
    }
}

fn check_model_name(field: &str, name: &str) -> Result<(), AppError> {
    let ok = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_'));
    if ok {
        Ok(())
    } else {
        Err(invalid("Invalid Gemini model name", format!("{field}={name:?}")))
    }
}

impl GeminiClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, AppError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        check_base_url(&base_url)?;

        let api_key = api_key.trim().to_string();
        if api_key.is_empty() {
            return Err(AppError::new(CONFIG_INVALID, "Gemini API key is not configured")
                .with_details("set SCHOLARIQ_GEMINI__API_KEY or gemini.api_key"));
        }

        Ok(Self {
            base_url,
            api_key,
            pro_model: DEFAULT_PRO_MODEL.to_string(),
            flash_model: DEFAULT_FLASH_MODEL.to_string(),
        })
    }

    pub fn with_models(mut self, pro_model: &str, flash_model: &str) -> Result<Self, AppError> {
        check_model_name("pro_model", pro_model.trim())?;
        check_model_name("flash_model", flash_model.trim())?;
        self.pro_model = pro_model.trim().to_string();
        self.flash_model = flash_model.trim().to_string();
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn model_name(&self, model: ModelTier) -> &str {
        match model {
            ModelTier::Pro => &self.pro_model,
            ModelTier::Flash => &self.flash_model,
        }
    }

    /// `generateContent` URL for a tier. The key travels in a header, never in the URL.
    pub fn generate_url(&self, model: ModelTier) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url,
            self.model_name(model)
        )
    }
}
