//! Background image loading.
//!
//! Every panel fetches and decodes its image on a dedicated worker thread and
//! receives the result through a one-slot channel. Dropping the receiver
//! abandons the load: the worker's send fails and the decoded image is
//! discarded.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver};
use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use reqwest::blocking::Client;

/// Where a panel's image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Remote(String),
    File(PathBuf),
}

impl ImageSource {
    /// Interprets `http(s)://` as remote, strips `file://`, and treats anything
    /// else as a filesystem path.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            ImageSource::Remote(trimmed.to_string())
        } else if let Some(path) = trimmed.strip_prefix("file://") {
            ImageSource::File(PathBuf::from(path))
        } else {
            ImageSource::File(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Remote(url) => f.write_str(url),
            ImageSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub max_bytes: u64,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(20),
            max_bytes: 32 * 1024 * 1024,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TextureLoadError {
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} exceeds the {limit} byte limit")]
    TooLarge { url: String, limit: u64 },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("image has no pixels")]
    Empty,
    #[error("texture loader exited without a result")]
    Disconnected,
}

/// Fetches and decodes `source` into RGBA8 with a top-left origin, shrinking
/// it so neither side exceeds `max_dimension`.
pub fn load_image(
    source: &ImageSource,
    options: &FetchOptions,
    max_dimension: u32,
) -> Result<RgbaImage, TextureLoadError> {
    let bytes = match source {
        ImageSource::Remote(url) => fetch_remote(url, options)?,
        ImageSource::File(path) => read_file(path)?,
    };
    decode(&bytes, max_dimension)
}

pub fn decode(bytes: &[u8], max_dimension: u32) -> Result<RgbaImage, TextureLoadError> {
    let image = image::load_from_memory(bytes)?;
    if image.width() == 0 || image.height() == 0 {
        return Err(TextureLoadError::Empty);
    }
    Ok(fit_within(image, max_dimension).to_rgba8())
}

fn fit_within(image: DynamicImage, max_dimension: u32) -> DynamicImage {
    let max_dimension = max_dimension.max(1);
    if image.width() <= max_dimension && image.height() <= max_dimension {
        return image;
    }
    tracing::debug!(
        width = image.width(),
        height = image.height(),
        max_dimension,
        "downscaling image to fit GPU texture limits"
    );
    image.resize(max_dimension, max_dimension, FilterType::Triangle)
}

fn read_file(path: &Path) -> Result<Vec<u8>, TextureLoadError> {
    std::fs::read(path).map_err(|source| TextureLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn fetch_remote(url: &str, options: &FetchOptions) -> Result<Vec<u8>, TextureLoadError> {
    let fetch_err = |source| TextureLoadError::Fetch {
        url: url.to_string(),
        source,
    };
    let client = Client::builder()
        .timeout(options.timeout)
        .build()
        .map_err(fetch_err)?;
    let response = client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .map_err(fetch_err)?;

    if response
        .content_length()
        .is_some_and(|length| length > options.max_bytes)
    {
        return Err(TextureLoadError::TooLarge {
            url: url.to_string(),
            limit: options.max_bytes,
        });
    }

    let mut bytes = Vec::new();
    response
        .take(options.max_bytes + 1)
        .read_to_end(&mut bytes)
        .map_err(|source| TextureLoadError::Io {
            path: PathBuf::from(url),
            source,
        })?;
    if bytes.len() as u64 > options.max_bytes {
        return Err(TextureLoadError::TooLarge {
            url: url.to_string(),
            limit: options.max_bytes,
        });
    }
    tracing::debug!(url, bytes = bytes.len(), "fetched remote image");
    Ok(bytes)
}

/// Pending result of a background load.
pub type TextureReceiver = Receiver<Result<RgbaImage, TextureLoadError>>;

/// Starts loading `source` on its own thread.
pub fn spawn_load(
    source: ImageSource,
    options: FetchOptions,
    max_dimension: u32,
) -> std::io::Result<TextureReceiver> {
    let (tx, rx) = bounded(1);
    thread::Builder::new()
        .name("warpfx-texture".into())
        .spawn(move || {
            let result = load_image(&source, &options, max_dimension);
            if tx.send(result).is_err() {
                tracing::debug!(%source, "texture load finished after its panel unmounted");
            }
        })?;
    Ok(rx)
}
