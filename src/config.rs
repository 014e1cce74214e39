use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// Outbound LLM endpoint used by the chat assistant. When `url` is empty the
/// assistant always answers from the static fallback table.
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    pub url: String,
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub assistant: AssistantConfig,
    /// When true, global food items (no owning user) may only be edited or
    /// deleted by admins. False keeps the permissive legacy behavior.
    pub global_food_admin_only: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "fittrack".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "fittrack-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
            refresh_ttl_minutes: std::env::var("JWT_REFRESH_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 14),
        };
        let assistant = AssistantConfig {
            url: std::env::var("ASSISTANT_URL").unwrap_or_default(),
            api_key: std::env::var("ASSISTANT_API_KEY").unwrap_or_default(),
            model: std::env::var("ASSISTANT_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into()),
        };
        let global_food_admin_only = std::env::var("GLOBAL_FOOD_ADMIN_ONLY")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        Ok(Self {
            database_url,
            jwt,
            assistant,
            global_food_admin_only,
        })
    }
}
