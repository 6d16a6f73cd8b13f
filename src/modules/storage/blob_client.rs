//! MinIO/S3-compatible blob storage client
//!
//! Uploads validated image bytes under caller-supplied names and builds
//! deterministic public URLs for them. Connectivity and bucket existence
//! are verified once at process startup; a missing bucket is fatal.
//!
//! Uses rust-s3 crate for lightweight S3 operations.

use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::{Client, Url};
use s3::creds::Credentials;
use s3::{Bucket, Region};
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::core::config::StorageConfig;
use crate::core::error::{AppError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Content type for uploaded photos. The orchestrator always generates
/// names with a matching `.jpg` extension.
const IMAGE_CONTENT_TYPE: &str = "image/jpeg";

pub struct BlobClient {
    bucket: Box<Bucket>,
    endpoint: String,
    public_endpoint: String,
    access_key: String,
    secret_key: String,
    region_name: String,
    /// HTTP client for bucket policy operations
    http_client: Client,
}

impl BlobClient {
    /// Create a new blob client from configuration.
    ///
    /// Construction is purely local; call [`verify_connectivity`] before
    /// serving traffic.
    ///
    /// [`verify_connectivity`]: BlobClient::verify_connectivity
    pub fn new(config: StorageConfig) -> Result<Self> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::StorageUnavailable(format!("invalid credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region, credentials)
            .map_err(|e| AppError::StorageUnavailable(format!("failed to create bucket handle: {}", e)))?;

        // Use path-style URLs for MinIO (http://endpoint/bucket instead of http://bucket.endpoint)
        bucket.set_path_style();

        let http_client = Client::builder()
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            bucket,
            endpoint: config.endpoint,
            public_endpoint: config.public_endpoint,
            access_key: config.access_key,
            secret_key: config.secret_key,
            region_name: config.region,
            http_client,
        })
    }

    /// Verify the store is reachable and the target bucket exists.
    ///
    /// Called once at startup. Failure here must prevent the service from
    /// serving any traffic; the bucket is not created automatically.
    pub async fn verify_connectivity(&self) -> Result<()> {
        let exists = self.bucket.exists().await.map_err(|e| {
            AppError::StorageUnavailable(format!(
                "cannot reach object store at {}: {}",
                self.endpoint, e
            ))
        })?;

        if !exists {
            return Err(AppError::StorageUnavailable(format!(
                "bucket '{}' not found",
                self.bucket.name()
            )));
        }

        info!(
            "Object store reachable at {}, bucket '{}' exists",
            self.endpoint,
            self.bucket.name()
        );
        Ok(())
    }

    /// Set a bucket-wide public read policy so photo URLs dereference
    /// without authentication. Best effort: a failure is logged and the
    /// policy can be applied manually.
    pub async fn set_public_read_policy(&self) -> Result<()> {
        let bucket_name = self.bucket.name();

        let policy = json!({
            "Version": "2012-10-17",
            "Statement": [
                {
                    "Effect": "Allow",
                    "Principal": {"AWS": "*"},
                    "Action": ["s3:GetObject"],
                    "Resource": [format!("arn:aws:s3:::{bucket_name}/*")]
                }
            ]
        })
        .to_string();

        match self.put_bucket_policy_with_sigv4(&bucket_name, &policy).await {
            Ok(_) => {
                info!("Set public read policy for bucket '{}'", bucket_name);
            }
            Err(e) => {
                warn!(
                    "Failed to set bucket policy for '{}': {}. \
                    You may need to set it manually using: \
                    mc anonymous set download minio/{}",
                    bucket_name, e, bucket_name
                );
            }
        }
        Ok(())
    }

    /// Upload image bytes under the given name, overwriting any existing
    /// object. Returns the durable public URL for the object.
    pub async fn upload_image(&self, name: &str, data: Vec<u8>) -> Result<String> {
        self.bucket
            .put_object_with_content_type(name, &data, IMAGE_CONTENT_TYPE)
            .await
            .map_err(|e| AppError::UploadFailed(format!("'{}': {}", name, e)))?;

        debug!(
            "Uploaded '{}' ({} bytes) to bucket '{}'",
            name,
            data.len(),
            self.bucket.name()
        );

        Ok(self.public_url(name))
    }

    /// Deterministic public URL for an object name:
    /// `{public_endpoint}/{bucket}/{name}`.
    pub fn public_url(&self, name: &str) -> String {
        format!("{}/{}/{}", self.public_endpoint, self.bucket.name(), name)
    }

    /// Get the bucket name
    pub fn bucket_name(&self) -> String {
        self.bucket.name()
    }

    /// Put bucket policy using AWS Signature v4
    async fn put_bucket_policy_with_sigv4(&self, bucket_name: &str, policy: &str) -> Result<()> {
        let now = Utc::now();
        let date_stamp = now.format("%Y%m%d").to_string();
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();

        let endpoint_url = Url::parse(&self.endpoint)
            .map_err(|e| AppError::Internal(format!("Invalid endpoint URL: {}", e)))?;
        let host = endpoint_url
            .host_str()
            .ok_or_else(|| AppError::Internal("Endpoint URL has no host".to_string()))?;
        let host_header = match endpoint_url.port() {
            Some(p) => format!("{}:{}", host, p),
            None => host.to_string(),
        };

        let url = format!("{}/{}?policy", self.endpoint, bucket_name);
        let payload_hash = hex::encode(Sha256::digest(policy.as_bytes()));

        let canonical_headers = format!(
            "host:{}\nx-amz-content-sha256:{}\nx-amz-date:{}\n",
            host_header, payload_hash, amz_date
        );
        let signed_headers = "host;x-amz-content-sha256;x-amz-date";
        let canonical_request = format!(
            "PUT\n/{}\npolicy=\n{}\n{}\n{}",
            bucket_name, canonical_headers, signed_headers, payload_hash
        );

        let algorithm = "AWS4-HMAC-SHA256";
        let credential_scope = format!("{}/{}/s3/aws4_request", date_stamp, self.region_name);
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            algorithm,
            amz_date,
            credential_scope,
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let signature = self.calculate_signature(&date_stamp, &string_to_sign)?;
        let authorization_header = format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            algorithm, self.access_key, credential_scope, signed_headers, signature
        );

        let response = self
            .http_client
            .put(&url)
            .header("Host", &host_header)
            .header("x-amz-date", &amz_date)
            .header("x-amz-content-sha256", &payload_hash)
            .header("Authorization", &authorization_header)
            .header("Content-Type", "application/json")
            .body(policy.to_string())
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to send policy request: {}", e)))?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(AppError::Internal(format!(
                "Failed to set bucket policy: {} - {}",
                status, body
            )))
        }
    }

    /// Calculate AWS Signature v4 signature
    fn calculate_signature(&self, date_stamp: &str, string_to_sign: &str) -> Result<String> {
        let k_date = Self::hmac_sha256(
            format!("AWS4{}", self.secret_key).as_bytes(),
            date_stamp.as_bytes(),
        )?;
        let k_region = Self::hmac_sha256(&k_date, self.region_name.as_bytes())?;
        let k_service = Self::hmac_sha256(&k_region, b"s3")?;
        let k_signing = Self::hmac_sha256(&k_service, b"aws4_request")?;

        let signature = Self::hmac_sha256(&k_signing, string_to_sign.as_bytes())?;
        Ok(hex::encode(signature))
    }

    /// HMAC-SHA256 helper
    fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
        let mut mac = HmacSha256::new_from_slice(key)
            .map_err(|e| AppError::Internal(format!("HMAC key error: {}", e)))?;
        mac.update(data);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> BlobClient {
        BlobClient::new(StorageConfig {
            endpoint: "http://localhost:9000".to_string(),
            public_endpoint: "https://cdn.urbanfy.example".to_string(),
            access_key: "minioadmin".to_string(),
            secret_key: "minioadmin".to_string(),
            bucket: "urbanfy-imagens".to_string(),
            region: "us-east-1".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn public_url_is_deterministic() {
        let client = test_client();
        let name = "4dbbd2c6-6f2e-4f82-b0e1-111111111111.jpg";

        let url = client.public_url(name);
        assert_eq!(
            url,
            format!("https://cdn.urbanfy.example/urbanfy-imagens/{}", name)
        );
        // Same inputs, same URL
        assert_eq!(url, client.public_url(name));
    }

    #[test]
    fn public_url_uses_public_endpoint_not_internal() {
        let client = test_client();
        assert!(!client.public_url("a.jpg").contains("localhost:9000"));
    }
}
