//! Configuration module

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Default upload cap, large enough for full-resolution phone photos.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Serialized ONNX model
    pub model_path: PathBuf,

    /// JSON array of class names, index-aligned with the model output
    pub classes_path: PathBuf,

    /// Edge length (pixels) of the square model input
    pub img_size: u32,

    /// Number of ranked labels returned by /predict
    pub top_k: usize,

    /// Bind address
    pub host: IpAddr,

    /// Server port
    pub port: u16,

    /// Multipart body limit
    pub max_upload_bytes: usize,

    /// ONNX Runtime intra-op threads (runtime default when unset)
    pub intra_threads: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("artifacts/best_model_fine_tuned.onnx"),
            classes_path: PathBuf::from("artifacts/classes.json"),
            img_size: 300,
            top_k: 5,
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            intra_threads: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Missing or unparseable values fall back to [`Config::default`];
    /// numeric settings must also be positive.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            model_path: lookup("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),

            classes_path: lookup("CLASSES_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.classes_path),

            img_size: positive(lookup("IMG_SIZE")).unwrap_or(defaults.img_size),

            top_k: positive(lookup("TOP_K")).unwrap_or(defaults.top_k),

            host: lookup("HOST")
                .and_then(|h| h.parse().ok())
                .unwrap_or(defaults.host),

            port: positive(lookup("PORT")).unwrap_or(defaults.port),

            max_upload_bytes: positive(lookup("MAX_UPLOAD_BYTES"))
                .unwrap_or(defaults.max_upload_bytes),

            intra_threads: positive(lookup("ORT_INTRA_THREADS")),
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn positive<T>(raw: Option<String>) -> Option<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    raw.and_then(|v| v.trim().parse::<T>().ok())
        .filter(|v| *v > T::default())
}
