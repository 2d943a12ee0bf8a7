//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from upsync-core.
//! SDK failures are classified into the narrow error kinds callers rely on:
//! an absent object, a rejected authorization, and a transport failure are
//! never collapsed into one another.

use async_trait::async_trait;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_smithy_types::error::display::DisplayErrorContext;

use upsync_core::{Credentials, Error, ObjectInfo, ObjectStore, Result};

/// S3 client wrapper
pub struct S3Client {
    inner: aws_sdk_s3::Client,
}

impl S3Client {
    /// Create a new S3 client from loaded credentials
    ///
    /// Credentials are passed in explicitly; nothing is read from the
    /// process environment or from shared state. When the credential file
    /// names a custom endpoint, path-style addressing is forced for
    /// S3-compatible stores.
    pub async fn new(credentials: &Credentials) -> Result<Self> {
        let static_credentials = aws_credential_types::Credentials::new(
            credentials.access_key.clone(),
            credentials.secret_access_key.clone(),
            None, // session token
            None, // expiry
            "upsync-static-credentials",
        );

        let region = credentials.region().to_string();
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(static_credentials)
            .region(aws_config::Region::new(region));

        if let Some(endpoint) = &credentials.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(credentials.endpoint.is_some())
            .build();

        tracing::debug!(
            region = credentials.region(),
            endpoint = credentials.endpoint.as_deref().unwrap_or("default"),
            "S3 client ready"
        );

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
        })
    }
}

/// Error kind implied by a service error code, when the code alone decides it
fn classify_code(code: &str, target: &str, detail: &str) -> Option<Error> {
    match code {
        "NoSuchKey" | "NoSuchBucket" | "NotFound" => Some(Error::NotFound(target.to_string())),
        "AccessDenied" | "InvalidAccessKeyId" | "SignatureDoesNotMatch" | "ExpiredToken" => {
            Some(Error::PermissionDenied(format!("{target}: {detail}")))
        }
        _ => None,
    }
}

/// Classify an SDK failure into a narrow error kind.
///
/// Service error codes are checked first; service errors without a usable
/// code (HEAD responses have no body) fall back to the HTTP status. Dispatch,
/// timeout, and response failures are transport errors.
fn classify_sdk_error<E>(err: SdkError<E>, target: &str) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    let detail = DisplayErrorContext(&err).to_string();

    if let Some(code) = err.code() {
        if let Some(classified) = classify_code(code, target, &detail) {
            return classified;
        }
    }

    match &err {
        SdkError::ServiceError(context) => match context.raw().status().as_u16() {
            404 => Error::NotFound(target.to_string()),
            401 | 403 => Error::PermissionDenied(format!("{target}: {detail}")),
            _ => Error::Network(detail),
        },
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) | SdkError::ResponseError(_) => {
            Error::Network(detail)
        }
        _ => Error::General(detail),
    }
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectInfo> {
        let response = match self
            .inner
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
        {
            Ok(r) => r,
            Err(err) => {
                let target = format!("s3://{bucket}/{key}");
                return Err(match &err {
                    SdkError::ServiceError(context) if context.err().is_not_found() => {
                        Error::NotFound(target)
                    }
                    _ => classify_sdk_error(err, &target),
                });
            }
        };

        let size = response.content_length().unwrap_or(0);
        let mut info = ObjectInfo::object(key, size);

        if let Some(modified) = response.last_modified() {
            info.last_modified = jiff::Timestamp::from_second(modified.secs()).ok();
        }

        if let Some(etag) = response.e_tag() {
            info.etag = Some(etag.trim_matches('"').to_string());
        }

        Ok(info)
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<ObjectInfo> {
        let size = data.len() as i64;
        let body = aws_sdk_s3::primitives::ByteStream::from(data);

        let mut request = self.inner.put_object().bucket(bucket).key(key).body(body);

        if let Some(ct) = content_type {
            request = request.content_type(ct);
        }

        let response = request
            .send()
            .await
            .map_err(|err| classify_sdk_error(err, &format!("s3://{bucket}/{key}")))?;

        let mut info = ObjectInfo::object(key, size);
        if let Some(etag) = response.e_tag() {
            info.etag = Some(etag.trim_matches('"').to_string());
        }
        info.last_modified = Some(jiff::Timestamp::now());

        Ok(info)
    }
}
