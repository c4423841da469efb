//! CPU-readable lightmaps and the atlas that owns them.
//!
//! File-backed lightmaps are decoded on first use and kept until
//! [`LightmapAtlas::release`] or drop.

use glam::{Vec2, Vec3};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{HostError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Nearest texel
    Point,
    #[default]
    Bilinear,
}

/// Linear RGB texels, row-major, row 0 at v = 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Lightmap {
    width: u32,
    height: u32,
    texels: Vec<Vec3>,
}

/// Texel count for a `width` x `height` map, rejecting empty and overflowing sizes.
fn texel_count(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(HostError::InvalidLightmap(format!("empty size {}x{}", width, height)));
    }
    (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| HostError::InvalidLightmap(format!("size {}x{} overflows", width, height)))
}

impl Lightmap {
    pub fn new(width: u32, height: u32, texels: Vec<Vec3>) -> Result<Self> {
        if texels.len() != texel_count(width, height)? {
            return Err(HostError::InvalidLightmap(format!(
                "{} texels for {}x{}",
                texels.len(),
                width,
                height
            )));
        }
        Ok(Self { width, height, texels })
    }

    pub fn solid(width: u32, height: u32, color: Vec3) -> Result<Self> {
        Self::new(width, height, vec![color; texel_count(width, height)?])
    }

    /// Build from 8-bit RGBA data; alpha is ignored.
    pub fn from_rgba8(width: u32, height: u32, data: &[u8]) -> Result<Self> {
        let texels = data
            .chunks_exact(4)
            .map(|px| Vec3::new(px[0] as f32, px[1] as f32, px[2] as f32) / 255.0)
            .collect();
        Self::new(width, height, texels)
    }

    /// Decode an image file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let image = image::open(path.as_ref())?.to_rgba8();
        let (width, height) = image.dimensions();
        Self::from_rgba8(width, height, image.as_raw())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn texel(&self, x: i64, y: i64) -> Vec3 {
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        self.texels[y * self.width as usize + x]
    }

    /// Texel at `uv` with clamp-to-edge addressing.
    pub fn sample(&self, uv: Vec2, filter: FilterMode) -> Vec3 {
        match filter {
            FilterMode::Point => self.sample_point(uv),
            FilterMode::Bilinear => self.sample_bilinear(uv),
        }
    }

    pub fn sample_point(&self, uv: Vec2) -> Vec3 {
        let x = (uv.x * self.width as f32).floor() as i64;
        let y = (uv.y * self.height as f32).floor() as i64;
        self.texel(x, y)
    }

    pub fn sample_bilinear(&self, uv: Vec2) -> Vec3 {
        let x = uv.x * self.width as f32 - 0.5;
        let y = uv.y * self.height as f32 - 0.5;
        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);

        let top = self.texel(x0, y0).lerp(self.texel(x0 + 1, y0), fx);
        let bottom = self.texel(x0, y0 + 1).lerp(self.texel(x0 + 1, y0 + 1), fx);
        top.lerp(bottom, fy)
    }
}

enum LightmapSource {
    Memory(Arc<Lightmap>),
    File {
        path: PathBuf,
        loaded: Mutex<Option<Arc<Lightmap>>>,
    },
}

/// Indexed set of lightmaps bound to the scene.
pub struct LightmapAtlas {
    slots: Vec<LightmapSource>,
    filter: FilterMode,
}

impl LightmapAtlas {
    pub fn new(filter: FilterMode) -> Self {
        Self {
            slots: Vec::new(),
            filter,
        }
    }

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    /// Bind an in-memory lightmap, returning its index.
    pub fn push(&mut self, lightmap: Lightmap) -> usize {
        self.slots.push(LightmapSource::Memory(Arc::new(lightmap)));
        self.slots.len() - 1
    }

    /// Bind a lightmap decoded from `path` on first use, returning its index.
    pub fn push_file(&mut self, path: impl Into<PathBuf>) -> usize {
        self.slots.push(LightmapSource::File {
            path: path.into(),
            loaded: Mutex::new(None),
        });
        self.slots.len() - 1
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether the lightmap at `index` is resident.
    pub fn is_loaded(&self, index: usize) -> bool {
        match self.slots.get(index) {
            Some(LightmapSource::Memory(_)) => true,
            Some(LightmapSource::File { loaded, .. }) => loaded.lock().is_some(),
            None => false,
        }
    }

    pub fn get(&self, index: usize) -> Result<Arc<Lightmap>> {
        match self.slots.get(index) {
            Some(LightmapSource::Memory(lightmap)) => Ok(lightmap.clone()),
            Some(LightmapSource::File { path, loaded }) => {
                let mut loaded = loaded.lock();
                if let Some(lightmap) = loaded.as_ref() {
                    return Ok(lightmap.clone());
                }
                let lightmap = Lightmap::load(path).map(Arc::new).map_err(|err| {
                    log::warn!("Failed to load lightmap {}: {}", path.display(), err);
                    err
                })?;
                log::debug!(
                    "Loaded lightmap {} ({}x{})",
                    path.display(),
                    lightmap.width(),
                    lightmap.height()
                );
                *loaded = Some(lightmap.clone());
                Ok(lightmap)
            }
            None => Err(HostError::LightmapIndex(index)),
        }
    }

    pub fn sample(&self, index: usize, uv: Vec2) -> Result<Vec3> {
        Ok(self.get(index)?.sample(uv, self.filter))
    }

    /// Drop every decoded file-backed lightmap. They reload on next use.
    pub fn release(&self) {
        let mut released = 0;
        for slot in &self.slots {
            if let LightmapSource::File { loaded, .. } = slot {
                if loaded.lock().take().is_some() {
                    released += 1;
                }
            }
        }
        if released > 0 {
            log::info!("Released {} lightmaps", released);
        }
    }
}

impl Default for LightmapAtlas {
    fn default() -> Self {
        Self::new(FilterMode::Bilinear)
    }
}

impl Drop for LightmapAtlas {
    fn drop(&mut self) {
        self.release();
    }
}
