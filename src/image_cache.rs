//! Image dimension lookup for images whose size the project does not record.
//!
//! Only headers are read (via `imagesize`), and each file is read at most
//! once per cache.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::LabelkitError;
use crate::model::ImageData;

/// Extensions tried, in order, when the image name alone does not exist.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "png", "jpeg", "bmp", "webp"];

/// Sizes of images under one directory, keyed by image name.
#[derive(Clone, Debug)]
pub struct ImageDimensionCache {
    images_dir: PathBuf,
    sizes: HashMap<String, Option<(u32, u32)>>,
}

impl ImageDimensionCache {
    pub fn new(images_dir: impl Into<PathBuf>) -> Self {
        Self {
            images_dir: images_dir.into(),
            sizes: HashMap::new(),
        }
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Width and height of the image called `name`, or `None` if no such
    /// file exists under the directory.
    ///
    /// Misses are cached too.
    ///
    /// # Errors
    /// Returns an error if a matching file exists but its header cannot be
    /// read.
    pub fn dimensions(&mut self, name: &str) -> Result<Option<(u32, u32)>, LabelkitError> {
        if let Some(cached) = self.sizes.get(name) {
            return Ok(*cached);
        }

        let size = match self.locate(name) {
            Some(path) => Some(read_image_dimensions(&path)?),
            None => None,
        };
        self.sizes.insert(name.to_string(), size);
        Ok(size)
    }

    /// Fills in `width`/`height` for images that lack either one.
    ///
    /// Returns how many images were updated. Images with no file on disk
    /// are left alone and logged.
    pub fn fill_missing(&mut self, images: &mut [ImageData]) -> Result<usize, LabelkitError> {
        let mut filled = 0;
        for image in images.iter_mut() {
            if image.width.is_some() && image.height.is_some() {
                continue;
            }
            match self.dimensions(&image.name)? {
                Some((width, height)) => {
                    debug!(image = %image.id, width, height, "filled image size");
                    image.width = Some(width);
                    image.height = Some(height);
                    filled += 1;
                }
                None => {
                    warn!(image = %image.id, name = %image.name, "no image file found; size defaults to 1x1");
                }
            }
        }
        Ok(filled)
    }

    fn locate(&self, name: &str) -> Option<PathBuf> {
        let direct = self.images_dir.join(name);
        if direct.is_file() {
            return Some(direct);
        }

        let stem = Path::new(name).file_stem()?.to_str()?;
        IMAGE_EXTENSIONS
            .iter()
            .map(|ext| self.images_dir.join(format!("{stem}.{ext}")))
            .find(|candidate| candidate.is_file())
    }
}

fn read_image_dimensions(path: &Path) -> Result<(u32, u32), LabelkitError> {
    let size = imagesize::size(path).map_err(|source| LabelkitError::ImageDimensionRead {
        path: path.to_path_buf(),
        source,
    })?;

    match (u32::try_from(size.width), u32::try_from(size.height)) {
        (Ok(width), Ok(height)) => Ok((width, height)),
        _ => Err(LabelkitError::ImageTooLarge {
            path: path.to_path_buf(),
            width: size.width,
            height: size.height,
        }),
    }
}
