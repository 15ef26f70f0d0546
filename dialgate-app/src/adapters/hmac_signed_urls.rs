//! HMAC-signed download URLs.
//!
//! Mints `{base}/{path}?expires={ts}&signature={hex}` links for archived
//! recordings. The signature covers the storage path and the expiry
//! timestamp, so a link cannot be replayed for another object or extended
//! past its window. Whatever serves the files verifies with the same secret.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use dialgate_core::error::{CoreError, CoreResult};
use dialgate_core::traits::{ObjectStore, SignedUrl};

type HmacSha256 = Hmac<Sha256>;

/// Signed-URL builder backed by a shared HMAC-SHA256 secret.
pub struct HmacSignedUrls {
    base_url: String,
    secret: Vec<u8>,
}

impl HmacSignedUrls {
    /// # Arguments
    /// * `base_url` - public file endpoint, trailing slash optional
    /// * `secret` - signing secret shared with the file server
    #[must_use]
    pub fn new(base_url: impl Into<String>, secret: impl Into<Vec<u8>>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            secret: secret.into(),
        }
    }

    fn sign(&self, path: &str, expires: i64) -> CoreResult<String> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| CoreError::StorageError(format!("invalid signing secret: {e}")))?;
        mac.update(path.as_bytes());
        mac.update(b":");
        mac.update(expires.to_string().as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

#[async_trait]
impl ObjectStore for HmacSignedUrls {
    async fn create_signed_url(&self, path: &str, ttl_secs: u64) -> CoreResult<SignedUrl> {
        let ttl = i64::try_from(ttl_secs).unwrap_or(i64::MAX);
        let expires = Utc::now().timestamp().saturating_add(ttl);
        let signature = self.sign(path, expires)?;

        let path = path.trim_start_matches('/');
        let expires_at: DateTime<Utc> = Utc
            .timestamp_opt(expires, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Ok(SignedUrl {
            url: format!(
                "{}/{}?expires={}&signature={}",
                self.base_url, path, expires, signature
            ),
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn url_carries_expiry_and_signature() {
        let store = HmacSignedUrls::new("https://files.example.com/", "s3cret");
        let signed = store
            .create_signed_url("recordings/RE123.mp3", 3600)
            .await
            .unwrap();

        assert!(
            signed
                .url
                .starts_with("https://files.example.com/recordings/RE123.mp3?expires=")
        );
        assert!(signed.url.contains("&signature="));

        let delta = signed.expires_at - (Utc::now() + Duration::seconds(3600));
        assert!(delta.num_seconds().abs() < 5);
    }

    #[tokio::test]
    async fn signature_binds_path_and_expiry() {
        let store = HmacSignedUrls::new("https://files.example.com", "s3cret");
        let a = store.sign("recordings/RE1.mp3", 1_700_000_000).unwrap();
        let b = store.sign("recordings/RE2.mp3", 1_700_000_000).unwrap();
        let c = store.sign("recordings/RE1.mp3", 1_700_000_060).unwrap();
        assert_ne!(a, b);
        assert_ne!(a, c);

        // deterministic for the verifier
        assert_eq!(a, store.sign("recordings/RE1.mp3", 1_700_000_000).unwrap());
    }
}
