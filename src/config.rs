use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub storage: Option<StorageConfig>,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub bucket: String,
    pub endpoint: Option<String>,
    pub public_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let storage = env::var("S3_BUCKET").ok().map(|bucket| {
            let public_base_url = env::var("S3_PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("https://{}.s3.amazonaws.com", bucket));
            StorageConfig {
                bucket,
                endpoint: env::var("S3_ENDPOINT").ok(),
                public_base_url,
            }
        });
        Ok(Self {
            port,
            database_url,
            host,
            storage,
        })
    }
}
