use binpack_codec::PackError;

/// Errors that can occur while loading or using layouts.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    /// A layout file could not be loaded.
    #[error("failed to load layout: {0}")]
    LoadFailed(String),

    /// The layout document is not valid JSON or does not match the layout shape.
    #[error("layout is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The layout is structurally invalid (names, field list).
    #[error("invalid layout '{layout}': {message}")]
    InvalidLayout { layout: String, message: String },

    /// A layout with the same name is already registered.
    #[error("duplicate layout name '{0}'")]
    DuplicateLayout(String),

    /// No layout registered under the given name.
    #[error("no layout named '{0}'")]
    UnknownLayout(String),

    /// A named record did not supply a value for a layout field.
    #[error("layout '{layout}' has no value for field '{field}'")]
    MissingField { layout: String, field: String },

    /// A named record supplied a value for a field the layout does not have.
    #[error("layout '{layout}' has no field named '{field}'")]
    UnknownField { layout: String, field: String },

    /// A named record supplied more than one value for the same field.
    #[error("layout '{layout}' was given field '{field}' more than once")]
    DuplicateField { layout: String, field: String },

    /// A field token is malformed, or packing or unpacking the record failed.
    #[error(transparent)]
    Codec(#[from] PackError),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
