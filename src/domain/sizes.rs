//! Output sizes and the storage keys derived from them.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Configured value that stands for "upload the original image as-is".
pub const FULL_SIZE_SENTINEL: u32 = 0;

/// Sizes produced when nothing else is configured.
pub const DEFAULT_SIZES: &[u32] = &[0, 50, 100];

/// One rendition of a photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantSize {
    /// The original decoded image, neither cropped nor resized.
    Full,
    /// The square crop scaled to `n × n` pixels.
    Square(u32),
}

impl VariantSize {
    pub fn from_pixels(pixels: u32) -> Self {
        if pixels == FULL_SIZE_SENTINEL {
            VariantSize::Full
        } else {
            VariantSize::Square(pixels)
        }
    }
}

/// Label used in storage keys: `full` or the decimal dimension.
impl fmt::Display for VariantSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantSize::Full => write!(f, "full"),
            VariantSize::Square(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SizeSpecError {
    #[error("size list is empty")]
    Empty,
    #[error("invalid size {0:?}")]
    Invalid(String),
    #[error("size {0} is listed more than once")]
    Duplicate(String),
}

/// Ordered, duplicate-free list of output sizes. Read-only after startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeSpec(Vec<VariantSize>);

impl SizeSpec {
    pub fn new(pixels: &[u32]) -> Result<Self, SizeSpecError> {
        if pixels.is_empty() {
            return Err(SizeSpecError::Empty);
        }
        let mut sizes = Vec::with_capacity(pixels.len());
        for &p in pixels {
            let size = VariantSize::from_pixels(p);
            if sizes.contains(&size) {
                return Err(SizeSpecError::Duplicate(size.to_string()));
            }
            sizes.push(size);
        }
        Ok(Self(sizes))
    }

    /// Parse a comma separated list such as `0,50,100,300`.
    pub fn parse(list: &str) -> Result<Self, SizeSpecError> {
        let pixels = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<u32>().map_err(|_| SizeSpecError::Invalid(s.to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(&pixels)
    }

    pub fn iter(&self) -> impl Iterator<Item = VariantSize> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for SizeSpec {
    fn default() -> Self {
        Self(DEFAULT_SIZES.iter().copied().map(VariantSize::from_pixels).collect())
    }
}

/// How a filename and a size label are joined into an object key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyScheme {
    /// `<filename>/<label>`
    #[default]
    Nested,
    /// `<filename>_<label>`
    Flat,
}

impl KeyScheme {
    pub fn key(&self, filename: &str, size: VariantSize) -> String {
        match self {
            KeyScheme::Nested => format!("{}/{}", filename, size),
            KeyScheme::Flat => format!("{}_{}", filename, size),
        }
    }

    /// Every key one photo will be written under, in configured order.
    pub fn keys(&self, filename: &str, sizes: &SizeSpec) -> Vec<String> {
        sizes.iter().map(|size| self.key(filename, size)).collect()
    }
}

impl FromStr for KeyScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nested" => Ok(KeyScheme::Nested),
            "flat" => Ok(KeyScheme::Flat),
            other => Err(format!("unknown key scheme {:?}", other)),
        }
    }
}
