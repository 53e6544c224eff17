//! Object store locations (S3, R2, local)

use crate::config::Credentials;
use crate::error::{Error, Result};
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::fmt;
use std::sync::Arc;

/// A store plus the key prefix a source or sink works under
///
/// Credentials are always passed in; nothing here reads the process
/// environment.
#[derive(Clone)]
pub struct StoreLocation {
    store: Arc<dyn ObjectStore>,
    /// Bucket or directory URL, without the prefix
    root: String,
    prefix: String,
}

impl fmt::Debug for StoreLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreLocation")
            .field("root", &self.root)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl StoreLocation {
    /// Parse a location URL
    ///
    /// Supported formats:
    /// - `s3://bucket/path/` - AWS S3
    /// - `r2://bucket/path/` - Cloudflare R2 (S3-compatible, endpoint required)
    /// - `file:///path/` or a plain path - local filesystem, must exist
    pub fn parse(url: &str, credentials: Option<&Credentials>) -> Result<Self> {
        if let Some(rest) = url.strip_prefix("s3://") {
            Self::parse_s3(rest, "s3", credentials)
        } else if let Some(rest) = url.strip_prefix("r2://") {
            Self::parse_s3(rest, "r2", credentials)
        } else if url.contains("://") && !url.starts_with("file://") {
            Err(Error::config(format!("Unsupported location URL: {url}")))
        } else {
            Self::parse_local(url)
        }
    }

    /// Parse a location that will be written to, creating a local directory if needed
    pub fn parse_output(url: &str, credentials: Option<&Credentials>) -> Result<Self> {
        if !url.contains("://") || url.starts_with("file://") {
            let path = local_path(url);
            std::fs::create_dir_all(path)
                .map_err(|e| Error::config(format!("Failed to create directory {path}: {e}")))?;
        }
        Self::parse(url, credentials)
    }

    /// Wrap an existing store
    ///
    /// `root` is only used to render object URLs (e.g. `memory://`).
    pub fn from_store(
        store: Arc<dyn ObjectStore>,
        root: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        let root = root.into();
        let root = if root.ends_with("://") {
            root
        } else {
            root.trim_end_matches('/').to_string()
        };
        Self {
            store,
            root,
            prefix: prefix.into().trim_matches('/').to_string(),
        }
    }

    fn parse_s3(rest: &str, scheme: &str, credentials: Option<&Credentials>) -> Result<Self> {
        let (bucket, prefix) = rest.split_once('/').unwrap_or((rest, ""));
        if bucket.is_empty() {
            return Err(Error::config(format!("Missing bucket in {scheme}://{rest}")));
        }

        let mut builder = AmazonS3Builder::new().with_bucket_name(bucket);

        if let Some(creds) = credentials {
            if let Some(key) = &creds.access_key_id {
                builder = builder.with_access_key_id(key);
            }
            if let Some(secret) = &creds.secret_access_key {
                builder = builder.with_secret_access_key(secret);
            }
            if let Some(token) = &creds.session_token {
                builder = builder.with_token(token);
            }
            if let Some(region) = &creds.region {
                builder = builder.with_region(region);
            }
            if let Some(endpoint) = &creds.endpoint {
                builder = builder.with_endpoint(endpoint);
            }
            builder = builder.with_allow_http(creds.allow_http);
        }

        // R2 is only reachable through an account endpoint
        if scheme == "r2" && credentials.and_then(|c| c.endpoint.as_ref()).is_none() {
            return Err(Error::missing_field("credentials.endpoint"));
        }

        let store = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to create {scheme} client: {e}")))?;

        Ok(Self::from_store(
            Arc::new(store),
            format!("{scheme}://{bucket}"),
            prefix,
        ))
    }

    fn parse_local(url: &str) -> Result<Self> {
        let path = local_path(url);
        let store = LocalFileSystem::new_with_prefix(path)
            .map_err(|e| Error::config(format!("Failed to open local store at {path}: {e}")))?;

        Ok(Self::from_store(Arc::new(store), format!("file://{path}"), ""))
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// Key prefix inside the store
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The scheme (s3, r2, file, ...)
    pub fn scheme(&self) -> &str {
        self.root.split_once("://").map_or("", |(scheme, _)| scheme)
    }

    /// Whether the location is a remote bucket
    pub fn is_remote(&self) -> bool {
        !matches!(self.scheme(), "file" | "memory")
    }

    /// Object path of a key relative to this location
    pub fn path(&self, relative: &str) -> Result<ObjectPath> {
        let relative = relative.trim_matches('/');
        let full = match (self.prefix.is_empty(), relative.is_empty()) {
            (true, _) => relative.to_string(),
            (false, true) => self.prefix.clone(),
            (false, false) => format!("{}/{relative}", self.prefix),
        };
        ObjectPath::parse(&full)
            .map_err(|e| Error::config(format!("Invalid object path '{full}': {e}")))
    }

    /// Key of `path` relative to `base`, if it lies under it
    pub fn relative<'a>(base: &ObjectPath, path: &'a ObjectPath) -> Option<&'a str> {
        let base = base.as_ref();
        let path = path.as_ref();
        if base.is_empty() {
            return Some(path);
        }
        path.strip_prefix(base)?.strip_prefix('/')
    }

    /// Human-readable URL of an object, for logs and reports
    pub fn display(&self, path: &ObjectPath) -> String {
        if self.root.ends_with("://") {
            format!("{}{path}", self.root)
        } else {
            format!("{}/{path}", self.root)
        }
    }
}

fn local_path(url: &str) -> &str {
    url.strip_prefix("file://").unwrap_or(url)
}
