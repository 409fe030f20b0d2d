use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use binpack_codec::Value;
use bytes::Bytes;

use crate::config::LayoutConfig;
use crate::error::{LayoutError, Result};
use crate::layout::{Layout, LayoutDef, Record};

const LAYOUT_SUFFIX: &str = ".layout.json";

/// Name-keyed registry of validated layouts.
pub struct LayoutRegistry {
    layouts: HashMap<String, Layout>,
    config: LayoutConfig,
}

impl LayoutRegistry {
    /// Create an empty registry with default config.
    pub fn new() -> Self {
        Self::with_config(LayoutConfig::default())
    }

    /// Create an empty registry with explicit config.
    pub fn with_config(config: LayoutConfig) -> Self {
        Self {
            layouts: HashMap::new(),
            config,
        }
    }

    /// Register a layout from a JSON string.
    pub fn register(&mut self, layout_json: &str) -> Result<()> {
        let def: LayoutDef = serde_json::from_str(layout_json)?;
        self.register_definition(def)
    }

    /// Register a layout definition.
    pub fn register_definition(&mut self, def: LayoutDef) -> Result<()> {
        let layout = Layout::with_config(def, &self.config)?;
        self.register_layout(layout)
    }

    /// Register an already validated layout.
    pub fn register_layout(&mut self, layout: Layout) -> Result<()> {
        if self.layouts.contains_key(layout.name()) {
            return Err(LayoutError::DuplicateLayout(layout.name().to_string()));
        }
        tracing::debug!(
            layout = layout.name(),
            fields = layout.fields().len(),
            size = layout.size(),
            "registered layout"
        );
        self.layouts.insert(layout.name().to_string(), layout);
        Ok(())
    }

    /// Load layouts from a directory.
    pub fn from_directory(path: &Path) -> Result<Self> {
        Self::from_directory_with_config(path, LayoutConfig::default())
    }

    /// Load layouts from a directory with explicit config.
    ///
    /// Every regular `*.layout.json` file is loaded; other files are skipped.
    /// Symlinked layout files are refused.
    pub fn from_directory_with_config(path: &Path, config: LayoutConfig) -> Result<Self> {
        let mut registry = Self::with_config(config);
        let mut loaded_layout_count = 0usize;

        let entries = std::fs::read_dir(path)
            .map_err(|err| LayoutError::LoadFailed(format!("{}: {err}", path.display())))?;

        for entry in entries {
            let entry = entry.map_err(|err| LayoutError::LoadFailed(err.to_string()))?;
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();
            let stem = match layout_stem(&file_name) {
                Some(stem) => stem.to_string(),
                None => continue,
            };
            let entry_path = entry.path();
            let path_metadata = std::fs::symlink_metadata(&entry_path)
                .map_err(|err| LayoutError::LoadFailed(err.to_string()))?;
            let file_type = path_metadata.file_type();

            if file_type.is_symlink() {
                return Err(LayoutError::LoadFailed(format!(
                    "refusing to load layout symlink: {file_name}"
                )));
            }
            if !file_type.is_file() {
                continue;
            }

            loaded_layout_count = loaded_layout_count.saturating_add(1);
            if loaded_layout_count > registry.config.max_layouts_from_directory {
                return Err(LayoutError::LoadFailed(format!(
                    "layout count exceeds configured max ({}): {}",
                    registry.config.max_layouts_from_directory, loaded_layout_count
                )));
            }

            let content = read_limited(&entry_path, registry.config.max_layout_file_size)?;
            let mut def: LayoutDef = serde_json::from_str(&content)?;
            if def.name.is_empty() {
                def.name = stem;
            } else if def.name != stem {
                return Err(LayoutError::LoadFailed(format!(
                    "layout name '{}' does not match file name {file_name}",
                    def.name
                )));
            }

            tracing::trace!(path = %entry_path.display(), "loading layout file");
            registry.register_definition(def)?;
        }

        tracing::debug!(
            dir = %path.display(),
            layouts = registry.layouts.len(),
            "loaded layout directory"
        );
        Ok(registry)
    }

    /// Load from embedded layout documents.
    pub fn from_embedded(layouts: &[&str]) -> Result<Self> {
        let mut registry = Self::new();
        for layout in layouts {
            registry.register(layout)?;
        }
        Ok(registry)
    }

    /// Look up a layout by name.
    pub fn get(&self, name: &str) -> Result<&Layout> {
        self.layouts
            .get(name)
            .ok_or_else(|| LayoutError::UnknownLayout(name.to_string()))
    }

    /// Check if a layout is registered under `name`.
    pub fn has_layout(&self, name: &str) -> bool {
        self.layouts.contains_key(name)
    }

    /// Registered layout names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.layouts.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Encoded size of the named layout.
    pub fn size_of(&self, name: &str) -> Result<usize> {
        Ok(self.get(name)?.size())
    }

    /// Pack named values with the named layout.
    pub fn pack_record<K: AsRef<str>>(&self, name: &str, values: &[(K, Value)]) -> Result<Bytes> {
        self.get(name)?.pack_named(values)
    }

    /// Unpack a record with the named layout.
    pub fn unpack_record(&self, name: &str, buf: &[u8]) -> Result<Record> {
        self.get(name)?.unpack(buf)
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Get registry configuration.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }
}

impl Default for LayoutRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn layout_stem(file_name: &str) -> Option<&str> {
    let lower = file_name.to_ascii_lowercase();
    if !lower.ends_with(LAYOUT_SUFFIX) || file_name.len() == LAYOUT_SUFFIX.len() {
        return None;
    }
    Some(&file_name[..file_name.len() - LAYOUT_SUFFIX.len()])
}

fn read_limited(path: &Path, max_bytes: usize) -> Result<String> {
    let file = std::fs::File::open(path).map_err(|err| {
        LayoutError::LoadFailed(format!("failed opening layout {}: {err}", path.display()))
    })?;
    let metadata = file
        .metadata()
        .map_err(|err| LayoutError::LoadFailed(err.to_string()))?;
    if metadata.len() > max_bytes as u64 {
        return Err(LayoutError::LoadFailed(format!(
            "layout file too large ({} bytes): {}",
            metadata.len(),
            path.display()
        )));
    }

    let read_limit = u64::try_from(max_bytes.saturating_add(1)).unwrap_or(u64::MAX);
    let mut content = String::new();
    file.take(read_limit)
        .read_to_string(&mut content)
        .map_err(|err| {
            LayoutError::LoadFailed(format!("failed reading layout {}: {err}", path.display()))
        })?;
    if content.len() > max_bytes {
        return Err(LayoutError::LoadFailed(format!(
            "layout file too large while reading: {}",
            path.display()
        )));
    }
    Ok(content)
}
