//! The packing pipeline.
//!
//! Inputs that fail to load and sidecars that fail to write are skipped with
//! a warning. An empty texture set or a failed package write aborts the run.

use std::path::{Path, PathBuf};

use crate::thumbnail::{select_thumbnail, THUMBNAIL_MAX_DIM};
use crate::{Error, PackageWriter, Result, SidecarWriter, Texture, TextureSet};

/// Options of a packing run.
#[derive(Debug, Clone)]
pub struct PackConfig {
    /// Destination package file.
    pub package_path: PathBuf,
    /// Directory for sidecars. When unset each sidecar replaces its source file.
    pub sidecar_dir: Option<PathBuf>,
    /// Largest width or height of an embedded thumbnail.
    pub thumbnail_max_dim: u32,
}

impl PackConfig {
    pub fn new(package_path: impl Into<PathBuf>) -> Self {
        Self {
            package_path: package_path.into(),
            sidecar_dir: None,
            thumbnail_max_dim: THUMBNAIL_MAX_DIM,
        }
    }

    pub fn with_sidecar_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.sidecar_dir = Some(dir.into());
        self
    }

    pub fn with_thumbnail_max_dim(mut self, max_dim: u32) -> Self {
        self.thumbnail_max_dim = max_dim;
        self
    }

    /// Package stem, embedded in every sidecar.
    pub fn package_name(&self) -> Result<String> {
        self.package_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| Error::InvalidName(self.package_path.clone()))
    }

    /// Where the sidecar of `texture` is written.
    pub fn sidecar_path(&self, texture: &Texture) -> PathBuf {
        let source = texture.source_path();
        match (&self.sidecar_dir, source.file_name()) {
            (Some(dir), Some(file_name)) => dir.join(file_name),
            _ => source.to_path_buf(),
        }
    }
}

/// An input or output that was skipped.
#[derive(Debug, Clone)]
pub struct Skipped {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of a packing run.
#[derive(Debug, Clone, Default)]
pub struct PackReport {
    pub entry_count: usize,
    pub blob_count: usize,
    pub package_size: u64,
    /// Inputs that could not be loaded.
    pub skipped_inputs: Vec<Skipped>,
    pub sidecars_written: Vec<PathBuf>,
    /// Sidecars that could not be written.
    pub sidecar_failures: Vec<Skipped>,
}

/// Load every input, skipping the ones that fail.
///
/// `on_item` is called once per input after it has been loaded or skipped.
pub fn load_textures<P, F>(paths: &[P], mut on_item: F) -> (Vec<Texture>, Vec<Skipped>)
where
    P: AsRef<Path>,
    F: FnMut(&Path),
{
    let mut textures = Vec::with_capacity(paths.len());
    let mut skipped = Vec::new();

    for path in paths {
        let path = path.as_ref();
        match Texture::load(path) {
            Ok(texture) => {
                tracing::debug!(
                    "Loaded {} as '{}' ({} images)",
                    path.display(),
                    texture.name(),
                    texture.mip_count()
                );
                textures.push(texture);
            }
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", path.display(), e);
                skipped.push(Skipped {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        }
        on_item(path);
    }

    (textures, skipped)
}

/// Load `paths` and pack them.
pub fn pack<P: AsRef<Path>>(paths: &[P], config: &PackConfig) -> Result<PackReport> {
    let (textures, skipped_inputs) = load_textures(paths, |_| {});
    let mut report = pack_textures(textures, config)?;
    report.skipped_inputs = skipped_inputs;
    Ok(report)
}

/// Write the package and one sidecar per texture.
pub fn pack_textures(textures: Vec<Texture>, config: &PackConfig) -> Result<PackReport> {
    let package_name = config.package_name()?;
    let textures = TextureSet::new(textures)?;

    let package = PackageWriter::new(&textures)?;
    let package_size = package.write_file(&config.package_path)?;

    let mut report = PackReport {
        entry_count: textures.len(),
        blob_count: package.layout().blobs.len(),
        package_size,
        ..PackReport::default()
    };

    let sidecars = SidecarWriter::new(package_name);
    for texture in textures.iter() {
        let path = config.sidecar_path(texture);
        let result = select_thumbnail(texture, config.thumbnail_max_dim)
            .and_then(|thumbnail| sidecars.write_file(&path, texture, &thumbnail));

        match result {
            Ok(size) => {
                tracing::debug!("Wrote sidecar {} ({} bytes)", path.display(), size);
                report.sidecars_written.push(path);
            }
            Err(e) => {
                tracing::warn!("Failed to write sidecar for '{}': {}", texture.name(), e);
                report.sidecar_failures.push(Skipped {
                    path,
                    reason: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        "Packed {} textures, {} sidecars written, {} failed",
        report.entry_count,
        report.sidecars_written.len(),
        report.sidecar_failures.len()
    );

    Ok(report)
}
