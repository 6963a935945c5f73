use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported channel depth: {0} bits (expected 2, 4, 6 or 8)")]
    UnsupportedDepth(u8),

    #[error("Profile optimization cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, Error>;
