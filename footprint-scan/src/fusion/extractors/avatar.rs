// Avatar Signal
//
// Fetch avatar → decode → 256x256 canvas → 64-bit DCT perceptual hash.
// Similarity: 1 - hamming(h1, h2) / 64
//
// Any fetch or decode failure yields "no hash". Successful hashes are memoized
// in a bounded, TTL-limited cache shared across requests.

use crate::fusion::Confidence;
use image::imageops::FilterType;
use image::DynamicImage;
use moka::sync::Cache;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// 64-bit perceptual hash
pub type AvatarHash = u64;

/// Number of bits in an [`AvatarHash`]
pub const HASH_BITS: u32 = 64;

/// Side of the canvas every avatar is resized to before hashing
const CANVAS_SIZE: u32 = 256;

/// Side of the grayscale image fed to the DCT
const DCT_SIZE: usize = 32;

/// Side of the low-frequency block kept from the DCT
const LOW_FREQ_SIZE: usize = 8;

/// Avatar fetch/decode failure (never surfaced beyond this module)
#[derive(Debug, Error)]
pub enum AvatarError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Avatar request returned status {0}")]
    Status(u16),

    #[error("Image decode error: {0}")]
    Decode(String),
}

// ============================================================================
// Cache
// ============================================================================

/// Process-wide avatar hash cache keyed by URL
///
/// Bounded by entry count and time-to-live. Values are idempotent per URL, so
/// concurrent writers for the same key are harmless.
pub struct AvatarCache {
    cache: Cache<String, AvatarHash>,
}

impl AvatarCache {
    /// Create a cache with the given capacity and entry lifetime
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();

        Self { cache }
    }

    pub fn get(&self, url: &str) -> Option<AvatarHash> {
        self.cache.get(url)
    }

    pub fn insert(&self, url: impl Into<String>, hash: AvatarHash) {
        self.cache.insert(url.into(), hash);
    }

    /// Approximate number of cached hashes
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Fetch + hash
// ============================================================================

/// Fetches avatars and computes their perceptual hashes
pub struct AvatarHasher {
    client: reqwest::Client,
    cache: Arc<AvatarCache>,
}

impl AvatarHasher {
    /// Create a hasher whose fetches are each bounded by `timeout`
    pub fn new(cache: Arc<AvatarCache>, timeout: Duration) -> Result<Self, AvatarError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AvatarError::Network(e.to_string()))?;

        Ok(Self { client, cache })
    }

    pub fn cache(&self) -> &AvatarCache {
        &self.cache
    }

    /// Perceptual hash of the avatar at `url`
    ///
    /// Returns `None` for a missing URL or on any failure. Failures are not
    /// cached and are never retried within the call.
    pub async fn avatar_hash(&self, url: Option<&str>) -> Option<AvatarHash> {
        let url = url.map(str::trim).filter(|u| !u.is_empty())?;

        if let Some(hash) = self.cache.get(url) {
            return Some(hash);
        }

        match self.fetch_and_hash(url).await {
            Ok(hash) => {
                self.cache.insert(url, hash);
                Some(hash)
            }
            Err(e) => {
                debug!("Avatar hash unavailable for {}: {}", url, e);
                None
            }
        }
    }

    async fn fetch_and_hash(&self, url: &str) -> Result<AvatarHash, AvatarError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AvatarError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AvatarError::Status(response.status().as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AvatarError::Network(e.to_string()))?;

        // Decoding and DCT are CPU-bound
        tokio::task::spawn_blocking(move || perceptual_hash(&bytes))
            .await
            .map_err(|e| AvatarError::Decode(e.to_string()))?
    }
}

/// Decode image bytes and compute their perceptual hash
pub fn perceptual_hash(bytes: &[u8]) -> Result<AvatarHash, AvatarError> {
    let image = image::load_from_memory(bytes).map_err(|e| AvatarError::Decode(e.to_string()))?;
    Ok(hash_image(&image))
}

/// Perceptual hash of a decoded image
///
/// Grayscale 32x32 downsample of the 256x256 canvas, 2-D DCT-II, then one bit
/// per coefficient of the top-left 8x8 block: set when above the block median.
/// Bits are packed row-major, first coefficient in the most significant bit.
pub fn hash_image(image: &DynamicImage) -> AvatarHash {
    let canvas = image.resize_exact(CANVAS_SIZE, CANVAS_SIZE, FilterType::Lanczos3);
    let small = canvas
        .grayscale()
        .resize_exact(DCT_SIZE as u32, DCT_SIZE as u32, FilterType::Lanczos3)
        .to_luma8();

    let mut pixels = vec![vec![0.0f64; DCT_SIZE]; DCT_SIZE];
    for (x, y, pixel) in small.enumerate_pixels() {
        pixels[y as usize][x as usize] = pixel.0[0] as f64;
    }

    // Columns, then rows
    let mut columns = vec![vec![0.0f64; DCT_SIZE]; DCT_SIZE];
    for x in 0..DCT_SIZE {
        let column: Vec<f64> = (0..DCT_SIZE).map(|y| pixels[y][x]).collect();
        for (y, value) in dct_ii(&column).into_iter().enumerate() {
            columns[y][x] = value;
        }
    }
    let coefficients: Vec<Vec<f64>> = columns.iter().map(|row| dct_ii(row)).collect();

    let low: Vec<f64> = coefficients
        .iter()
        .take(LOW_FREQ_SIZE)
        .flat_map(|row| row.iter().take(LOW_FREQ_SIZE).copied())
        .collect();
    let threshold = median(&low);

    low.iter()
        .fold(0u64, |hash, &value| (hash << 1) | u64::from(value > threshold))
}

/// Unnormalized DCT-II: `y[k] = 2 * Σ x[n] cos(π k (2n + 1) / 2N)`
fn dct_ii(input: &[f64]) -> Vec<f64> {
    let n = input.len() as f64;
    (0..input.len())
        .map(|k| {
            let sum: f64 = input
                .iter()
                .enumerate()
                .map(|(i, x)| {
                    x * (std::f64::consts::PI * k as f64 * (2.0 * i as f64 + 1.0) / (2.0 * n))
                        .cos()
                })
                .sum();
            2.0 * sum
        })
        .collect()
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.is_empty() {
        0.0
    } else if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Compare two avatar hashes (0.0-1.0)
pub fn avatar_similarity(hash1: Option<AvatarHash>, hash2: Option<AvatarHash>) -> Confidence {
    let (Some(h1), Some(h2)) = (hash1, hash2) else {
        return 0.0;
    };

    if h1 == h2 {
        return 1.0;
    }

    let distance = (h1 ^ h2).count_ones() as f64;
    (1.0 - distance / HASH_BITS as f64).clamp(0.0, 1.0)
}
