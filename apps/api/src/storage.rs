//! Object storage for uploaded resumes.
//!
//! Originals are kept verbatim in S3 (MinIO locally) under
//! `resumes/{user_id}/{resume_id}.pdf` so the exact file the candidate
//! uploaded can always be re-downloaded.

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

/// Where an uploaded resume landed in the bucket.
#[derive(Debug, Clone)]
pub struct StoredResume {
    pub resume_id: Uuid,
    pub key: String,
    pub public_url: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Uploads the original PDF bytes to the resume bucket.
pub async fn store_resume(
    s3: &S3Client,
    bucket: &str,
    public_base_url: &str,
    user_id: Uuid,
    pdf_bytes: Bytes,
) -> Result<StoredResume, AppError> {
    let resume_id = Uuid::new_v4();
    let key = resume_key(user_id, resume_id);

    s3.put_object()
        .bucket(bucket)
        .key(&key)
        .body(ByteStream::from(pdf_bytes))
        .content_type("application/pdf")
        .send()
        .await
        .map_err(|e| AppError::S3(format!("Failed to store resume {key}: {e}")))?;

    let stored = StoredResume {
        resume_id,
        public_url: public_url(public_base_url, bucket, &key),
        key,
        uploaded_at: Utc::now(),
    };

    info!("Uploaded resume to s3://{}/{}", bucket, stored.key);

    Ok(stored)
}

/// Builds the bucket key for a resume upload.
fn resume_key(user_id: Uuid, resume_id: Uuid) -> String {
    format!("resumes/{user_id}/{resume_id}.pdf")
}

/// Builds the browser-facing URL for a stored object.
fn public_url(base: &str, bucket: &str, key: &str) -> String {
    format!("{}/{}/{}", base.trim_end_matches('/'), bucket, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_key_is_user_scoped() {
        let user_id = Uuid::new_v4();
        let resume_id = Uuid::new_v4();

        let key = resume_key(user_id, resume_id);
        assert_eq!(key, format!("resumes/{user_id}/{resume_id}.pdf"));
    }

    #[test]
    fn test_public_url_joins_segments() {
        let url = public_url("http://localhost:9000", "resumes", "resumes/a/b.pdf");
        assert_eq!(url, "http://localhost:9000/resumes/resumes/a/b.pdf");
    }

    #[test]
    fn test_public_url_trims_trailing_slash() {
        let url = public_url("http://localhost:9000/", "resumes", "k.pdf");
        assert_eq!(url, "http://localhost:9000/resumes/k.pdf");
    }
}
