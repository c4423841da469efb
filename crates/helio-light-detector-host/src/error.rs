use thiserror::Error;

use helio_light_detector_core::Error as DetectorError;

#[derive(Error, Debug)]
pub enum HostError {
    #[error("Lightmap image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid lightmap: {0}")]
    InvalidLightmap(String),

    #[error("Lightmap index out of range: {0}")]
    LightmapIndex(usize),
}

pub type Result<T> = std::result::Result<T, HostError>;

impl From<HostError> for DetectorError {
    fn from(err: HostError) -> Self {
        DetectorError::BakedLighting(err.to_string())
    }
}
