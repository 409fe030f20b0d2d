use std::collections::HashSet;

use binpack_codec::Format;

use crate::config::LayoutConfig;
use crate::error::{LayoutError, Result};
use crate::layout::LayoutDef;

/// Check a layout definition and parse its tokens into a [`Format`].
pub(crate) fn validate_definition(def: &LayoutDef, config: &LayoutConfig) -> Result<Format> {
    if !is_layout_name(&def.name) {
        return Err(invalid(
            def,
            "layout names must be non-empty and use only letters, digits, '.', '-' or '_'",
        ));
    }
    if config.strict_field_names && def.fields.is_empty() {
        return Err(invalid(def, "layout declares no fields"));
    }

    let mut seen = HashSet::with_capacity(def.fields.len());
    for field in &def.fields {
        if field.name.is_empty() {
            return Err(invalid(def, "field names must not be empty"));
        }
        if config.strict_field_names && !is_identifier(&field.name) {
            return Err(invalid(
                def,
                format!("field name '{}' is not an identifier", field.name),
            ));
        }
        if !seen.insert(field.name.as_str()) {
            return Err(invalid(def, format!("duplicate field name '{}'", field.name)));
        }
    }

    let tokens: Vec<&str> = def.fields.iter().map(|f| f.token.as_str()).collect();
    Format::parse(&tokens).map_err(|err| {
        tracing::debug!(layout = %def.name, error = %err, "layout token rejected");
        LayoutError::Codec(err)
    })
}

fn invalid(def: &LayoutDef, message: impl Into<String>) -> LayoutError {
    LayoutError::InvalidLayout {
        layout: def.name.clone(),
        message: message.into(),
    }
}

fn is_layout_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'_'))
}

fn is_identifier(name: &str) -> bool {
    let mut bytes = name.bytes();
    match bytes.next() {
        Some(first) if first.is_ascii_alphabetic() || first == b'_' => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FieldDef;
    use binpack_codec::PackError;

    fn def(name: &str, fields: &[(&str, &str)]) -> LayoutDef {
        LayoutDef {
            name: name.to_string(),
            description: None,
            fields: fields
                .iter()
                .map(|(name, token)| FieldDef {
                    name: name.to_string(),
                    token: token.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn accepts_valid_layout() {
        let format = validate_definition(
            &def("udp-header", &[("src_port", ">H"), ("dst_port", "H")]),
            &LayoutConfig::default(),
        )
        .unwrap();
        assert_eq!(format.size(), 4);
    }

    #[test]
    fn rejects_bad_layout_names() {
        for name in ["", "has space", "slash/name"] {
            let err = validate_definition(&def(name, &[("a", "B")]), &LayoutConfig::default())
                .unwrap_err();
            assert!(matches!(err, LayoutError::InvalidLayout { .. }), "{name:?}");
        }
    }

    #[test]
    fn rejects_duplicate_fields() {
        let err = validate_definition(
            &def("dup", &[("a", "B"), ("a", "H")]),
            &LayoutConfig::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate field name 'a'"));

        let err = validate_definition(&def("blank", &[("", "B")]), &LayoutConfig::default())
            .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidLayout { .. }));
    }

    #[test]
    fn reports_token_errors_as_codec_errors() {
        let err = validate_definition(&def("bad", &[("a", "B"), ("b", "Z")]), &LayoutConfig::default())
            .unwrap_err();
        match err {
            LayoutError::Codec(source) => {
                assert_eq!(
                    source,
                    PackError::UnknownToken {
                        index: 1,
                        token: "Z".to_string()
                    }
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn strict_mode_requires_identifiers_and_fields() {
        let strict = LayoutConfig {
            strict_field_names: true,
            ..LayoutConfig::default()
        };

        assert!(validate_definition(&def("ok", &[("field-1", "B")]), &LayoutConfig::default()).is_ok());
        assert!(validate_definition(&def("ok", &[("field-1", "B")]), &strict).is_err());
        assert!(validate_definition(&def("ok", &[("_field1", "B")]), &strict).is_ok());
        assert!(validate_definition(&def("empty", &[]), &strict).is_err());
        assert!(validate_definition(&def("empty", &[]), &LayoutConfig::default()).is_ok());
    }
}
