use aws_config::meta::region::RegionProviderChain;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::primitives::ByteStream;

use crate::config::StorageConfig;
use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct Storage {
    client: S3Client,
    bucket: String,
    public_base_url: String,
}

impl Storage {
    pub async fn connect(config: StorageConfig) -> Self {
        let region_provider = RegionProviderChain::default_provider().or_else("us-east-1");
        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(region_provider)
            .load()
            .await;
        let mut builder = aws_sdk_s3::config::Builder::from(&aws_config);

        // Custom S3-compatible endpoints (MinIO and friends) need path-style keys.
        if let Some(endpoint) = config.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self {
            client: S3Client::from_conf(builder.build()),
            bucket: config.bucket,
            public_base_url: config.public_base_url,
        }
    }

    pub async fn put_object(
        &self,
        key: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> AppResult<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|err| AppError::Storage(err.to_string()))?;
        Ok(())
    }

    pub fn public_url(&self, key: &str) -> String {
        build_public_url(&self.public_base_url, &self.bucket, key)
    }
}

/// `{bucket}` and `{key}` templates in the base are honored; otherwise the
/// bucket segment is appended only when the base does not already carry it.
pub fn build_public_url(base: &str, bucket: &str, key: &str) -> String {
    let trimmed = base.trim_end_matches('/');

    if trimmed.contains("{bucket}") || trimmed.contains("{key}") {
        return trimmed.replace("{bucket}", bucket).replace("{key}", key);
    }

    if trimmed.contains(bucket) {
        format!("{}/{}", trimmed, key)
    } else {
        format!("{}/{}/{}", trimmed, bucket, key)
    }
}

pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | '?' | '#' | '%' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_url_appends_bucket_when_missing() {
        let url = build_public_url("https://cdn.example.com", "shop", "products/a.png");
        assert_eq!(url, "https://cdn.example.com/shop/products/a.png");
    }

    #[test]
    fn public_url_skips_bucket_already_in_base() {
        let url = build_public_url("https://shop.s3.amazonaws.com/", "shop", "products/a.png");
        assert_eq!(url, "https://shop.s3.amazonaws.com/products/a.png");
    }

    #[test]
    fn public_url_honors_templates() {
        let url = build_public_url("https://host/{bucket}/{key}", "shop", "k.png");
        assert_eq!(url, "https://host/shop/k.png");
    }

    #[test]
    fn filenames_lose_path_separators() {
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_filename(""), "file");
        assert_eq!(sanitize_filename("shirt front.png"), "shirt front.png");
    }
}
