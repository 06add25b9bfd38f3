use std::env;

/// Runtime configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub auth_token: Option<String>,
    pub event_id: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_base_url: env::var("AGORA_API_URL")
                .unwrap_or_else(|_| "http://localhost:5000/api".to_string()),
            auth_token: env::var("AGORA_AUTH_TOKEN").ok(),
            event_id: env::var("AGORA_EVENT_ID").ok(),
        }
    }

    pub fn request_context(&self) -> RequestContext {
        RequestContext::new(self.auth_token.clone())
    }
}

/// Per-call authentication context. Injected into every API call instead of
/// living in ambient shared state, so the core stays testable without a
/// process-wide fixture.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    token: Option<String>,
}

impl RequestContext {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    pub fn anonymous() -> Self {
        Self { token: None }
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}
