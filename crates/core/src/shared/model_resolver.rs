use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::constants::{
    EMBEDDING_MODEL_NAME, EMBEDDING_MODEL_URL, TOKENIZER_NAME, TOKENIZER_URL,
};

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("download failed for {url}: HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
}

/// A downloadable file the engine needs at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelAsset {
    pub name: &'static str,
    pub url: &'static str,
}

pub const EMBEDDING_MODEL: ModelAsset = ModelAsset {
    name: EMBEDDING_MODEL_NAME,
    url: EMBEDDING_MODEL_URL,
};

pub const EMBEDDING_TOKENIZER: ModelAsset = ModelAsset {
    name: TOKENIZER_NAME,
    url: TOKENIZER_URL,
};

/// Progress callback: `(asset_name, bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Box<dyn Fn(&str, u64, u64) + Send>;

/// Resolved locations of the sentence-embedding model and its tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddingAssets {
    pub model: PathBuf,
    pub tokenizer: PathBuf,
}

pub fn resolve_embedding_assets(
    bundled_dir: Option<&Path>,
    progress: Option<&ProgressFn>,
) -> Result<EmbeddingAssets, ModelResolveError> {
    let cache_dir = model_cache_dir()?;
    Ok(EmbeddingAssets {
        model: resolve_in(&cache_dir, EMBEDDING_MODEL, bundled_dir, progress)?,
        tokenizer: resolve_in(&cache_dir, EMBEDDING_TOKENIZER, bundled_dir, progress)?,
    })
}

/// Resolve an asset, checking cache locations before downloading.
///
/// Resolution order:
/// 1. User cache directory (platform-specific)
/// 2. Bundled path (for development / pre-packaged installs)
/// 3. Download from URL to cache
fn resolve_in(
    cache_dir: &Path,
    asset: ModelAsset,
    bundled_dir: Option<&Path>,
    progress: Option<&ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    let cached_path = cache_dir.join(asset.name);
    if cached_path.exists() {
        return Ok(cached_path);
    }

    if let Some(dir) = bundled_dir {
        let bundled_path = dir.join(asset.name);
        if bundled_path.exists() {
            return Ok(bundled_path);
        }
    }

    log::info!("Downloading {} from {}", asset.name, asset.url);
    fs::create_dir_all(cache_dir).map_err(ModelResolveError::CacheDir)?;
    download(asset, &cached_path, progress)?;
    Ok(cached_path)
}

/// Platform-specific model cache directory.
///
/// - macOS: `~/Library/Application Support/IntroScore/models/`
/// - Linux: `$XDG_CACHE_HOME/IntroScore/models/` or `~/.cache/IntroScore/models/`
/// - Windows: `%LOCALAPPDATA%/IntroScore/models/`
pub fn model_cache_dir() -> Result<PathBuf, ModelResolveError> {
    #[cfg(target_os = "macos")]
    {
        dirs::data_dir()
            .map(|d| d.join("IntroScore").join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::cache_dir()
            .map(|d| d.join("IntroScore").join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
}

fn download(
    asset: ModelAsset,
    dest: &Path,
    progress: Option<&ProgressFn>,
) -> Result<(), ModelResolveError> {
    let download_err = |source| ModelResolveError::Download {
        url: asset.url.to_string(),
        source,
    };

    let response = reqwest::blocking::get(asset.url).map_err(download_err)?;
    if !response.status().is_success() {
        return Err(ModelResolveError::Status {
            url: asset.url.to_string(),
            status: response.status().as_u16(),
        });
    }

    let total = response.content_length().unwrap_or(0);
    let bytes = response.bytes().map_err(download_err)?;

    // Write next to the destination, then rename, so a failed download
    // never leaves a truncated asset in the cache.
    let temp_path = dest.with_extension("part");
    let write_err = |source| ModelResolveError::Write {
        path: temp_path.clone(),
        source,
    };
    let mut file = fs::File::create(&temp_path).map_err(write_err)?;

    let chunk_size = 1024 * 1024;
    let mut downloaded: u64 = 0;
    for chunk in bytes.chunks(chunk_size) {
        file.write_all(chunk).map_err(write_err)?;
        downloaded += chunk.len() as u64;
        if let Some(cb) = progress {
            cb(asset.name, downloaded, total);
        }
    }
    file.flush().map_err(write_err)?;
    drop(file);

    fs::rename(&temp_path, dest).map_err(|e| ModelResolveError::Write {
        path: dest.to_path_buf(),
        source: e,
    })
}
