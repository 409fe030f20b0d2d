/// Controls layout loading and validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    /// When true, field names must be identifiers (`[A-Za-z_][A-Za-z0-9_]*`)
    /// and every layout must declare at least one field. Empty and duplicate
    /// field names are rejected regardless.
    pub strict_field_names: bool,
    /// Maximum number of layouts loaded from a directory.
    pub max_layouts_from_directory: usize,
    /// Maximum bytes allowed per layout file loaded from a directory.
    pub max_layout_file_size: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            strict_field_names: false,
            max_layouts_from_directory: 256,
            max_layout_file_size: 256 * 1024,
        }
    }
}
