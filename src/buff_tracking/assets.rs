//! Template and overlay icon storage
//!
//! Everything is decoded once at startup. A missing or undecodable file is
//! fatal; recognition never runs with a partial template set.

use super::error::AssetLoadError;
use super::types::{BuffCategory, TemplateVariant};
use crate::config::Configuration;
use crate::template_matching::Template;
use image::{DynamicImage, RgbaImage};
use std::collections::HashMap;
use std::path::Path;

/// A template together with the stack count it stands for
#[derive(Debug, Clone)]
pub struct CountTemplate {
    pub count: u8,
    pub variant: TemplateVariant,
    pub template: Template,
}

#[derive(Debug, Default)]
pub struct AssetStore {
    templates: HashMap<BuffCategory, Vec<CountTemplate>>,
    icons: HashMap<(BuffCategory, u8), RgbaImage>,
    icon_size: Option<(u32, u32)>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the template set selected by the configuration's asset profile
    pub fn load(config: &Configuration) -> Result<Self, AssetLoadError> {
        Self::load_from(&config.template_dir(), &config.icon_dir())
    }

    pub fn load_from(template_dir: &Path, icon_dir: &Path) -> Result<Self, AssetLoadError> {
        let mut store = Self::new();

        for category in BuffCategory::ALL {
            for &count in category.valid_counts() {
                let path = icon_dir.join(category.icon_file_name(count));
                let icon = load_image(&path)?.to_rgba8();
                store.insert_icon(category, count, icon)?;
            }

            for &count in category.template_counts() {
                for &variant in category.variants() {
                    let file_name = category.template_file_name(count, variant);
                    let image = load_image(&template_dir.join(&file_name))?;
                    let label = file_name.trim_end_matches(".png");
                    store.insert_template(
                        category,
                        count,
                        variant,
                        Template::from_image(label, &image),
                    )?;
                }
            }
        }

        store.validate()?;
        log::info!(
            "📦 Loaded {} templates from {:?} and {} icons from {:?}",
            store.template_count(),
            template_dir,
            store.icons.len(),
            icon_dir
        );
        Ok(store)
    }

    /// Register a recognition template. Templates stay ordered by count, then
    /// by variant, which is the tie-break order used during recognition.
    pub fn insert_template(
        &mut self,
        category: BuffCategory,
        count: u8,
        variant: TemplateVariant,
        template: Template,
    ) -> Result<(), AssetLoadError> {
        if !category.template_counts().contains(&count) {
            return Err(AssetLoadError::InvalidCount { category, count });
        }

        let entries = self.templates.entry(category).or_default();
        entries.push(CountTemplate {
            count,
            variant,
            template,
        });
        entries.sort_by_key(|t| enumeration_key(category, t.count, t.variant));
        Ok(())
    }

    /// Register an overlay icon. All icons must share one size.
    pub fn insert_icon(
        &mut self,
        category: BuffCategory,
        count: u8,
        icon: RgbaImage,
    ) -> Result<(), AssetLoadError> {
        if !category.is_valid_count(count) {
            return Err(AssetLoadError::InvalidCount { category, count });
        }

        let found = icon.dimensions();
        match self.icon_size {
            Some(expected) if expected != found => {
                return Err(AssetLoadError::IconSizeMismatch {
                    category,
                    count,
                    expected,
                    found,
                });
            }
            Some(_) => {}
            None => self.icon_size = Some(found),
        }

        self.icons.insert((category, count), icon);
        Ok(())
    }

    /// Check every count has at least one template and exactly one icon
    pub fn validate(&self) -> Result<(), AssetLoadError> {
        if self.icons.is_empty() {
            return Err(AssetLoadError::NoIcons);
        }
        for category in BuffCategory::ALL {
            for &count in category.template_counts() {
                if !self.templates(category).iter().any(|t| t.count == count) {
                    return Err(AssetLoadError::MissingTemplate { category, count });
                }
            }
            for &count in category.valid_counts() {
                if !self.icons.contains_key(&(category, count)) {
                    return Err(AssetLoadError::MissingIcon { category, count });
                }
            }
        }
        Ok(())
    }

    pub fn templates(&self, category: BuffCategory) -> &[CountTemplate] {
        self.templates
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn icon(&self, category: BuffCategory, count: u8) -> Option<&RgbaImage> {
        self.icons.get(&(category, count))
    }

    /// Shared size of every overlay icon
    pub fn icon_size(&self) -> Option<(u32, u32)> {
        self.icon_size
    }

    pub fn template_count(&self) -> usize {
        self.templates.values().map(Vec::len).sum()
    }
}

fn enumeration_key(category: BuffCategory, count: u8, variant: TemplateVariant) -> (usize, usize) {
    let count_pos = category
        .valid_counts()
        .iter()
        .position(|&c| c == count)
        .unwrap_or(usize::MAX);
    let variant_pos = category
        .variants()
        .iter()
        .position(|&v| v == variant)
        .unwrap_or(usize::MAX);
    (count_pos, variant_pos)
}

fn load_image(path: &Path) -> Result<DynamicImage, AssetLoadError> {
    if !path.is_file() {
        return Err(AssetLoadError::Missing {
            path: path.to_path_buf(),
        });
    }
    image::open(path).map_err(|source| AssetLoadError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolution profiles (`reso_*` directories) shipped under the asset root
pub fn list_resolutions(asset_root: &Path) -> Result<Vec<String>, AssetLoadError> {
    list_subdirs(asset_root, |name| name.starts_with("reso_"))
}

/// Windows display-scaling options available for a resolution
pub fn list_scaling_options(
    asset_root: &Path,
    resolution: &str,
) -> Result<Vec<String>, AssetLoadError> {
    list_subdirs(&asset_root.join(resolution), |_| true)
}

/// Buff bar sizes available for a resolution and scaling
pub fn list_buffbar_sizes(
    asset_root: &Path,
    resolution: &str,
    windows_scaling: &str,
) -> Result<Vec<String>, AssetLoadError> {
    list_subdirs(&asset_root.join(resolution).join(windows_scaling), |_| true)
}

fn list_subdirs(dir: &Path, keep: impl Fn(&str) -> bool) -> Result<Vec<String>, AssetLoadError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(dir).map_err(|source| AssetLoadError::Directory {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .filter(|name| keep(name))
        .collect();
    names.sort();
    Ok(names)
}
