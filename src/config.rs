use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PushConfig {
    /// Batch dispatch endpoint (Expo-compatible: accepts a JSON array of messages).
    pub endpoint: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VisionConfig {
    /// Plate-analysis edge function.
    pub endpoint: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub push: PushConfig,
    pub vision: VisionConfig,
    /// Fixed offset used to resolve "today" server-side. Default +180 (Israel).
    pub local_utc_offset_minutes: i32,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "nutricoach".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "nutricoach-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
            refresh_ttl_minutes: std::env::var("JWT_REFRESH_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 14),
        };
        let push = PushConfig {
            endpoint: std::env::var("PUSH_ENDPOINT")
                .unwrap_or_else(|_| "https://exp.host/--/api/v2/push/send".into()),
        };
        let vision = VisionConfig {
            endpoint: std::env::var("VISION_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:9000/analyze-plate".into()),
            api_key: std::env::var("VISION_API_KEY").unwrap_or_default(),
        };
        let local_utc_offset_minutes = std::env::var("LOCAL_UTC_OFFSET_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i32>().ok())
            .unwrap_or(180);
        Ok(Self {
            database_url,
            jwt,
            push,
            vision,
            local_utc_offset_minutes,
        })
    }
}
