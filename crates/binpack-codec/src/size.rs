use crate::error::{PackError, Result};
use crate::token::{add_width, parse_token};

/// Total encoded size of `format` in bytes.
///
/// Byte-order markers do not contribute to the size.
///
/// ```
/// use binpack_codec::calc_size;
///
/// assert_eq!(calc_size(&["B", "H", "I", "Q", "f", "d", "4s"]).unwrap(), 31);
/// ```
pub fn calc_size<S: AsRef<str>>(format: &[S]) -> Result<usize> {
    format
        .iter()
        .enumerate()
        .try_fold(0usize, |size, (index, text)| {
            let text = text.as_ref();
            let token = parse_token(index, text)?;
            add_width(size, token.width()).ok_or_else(|| PackError::unknown_token(index, text))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_code() {
        assert_eq!(calc_size(&["B", "H", "I", "Q", "f", "d", "4s"]).unwrap(), 31);
        assert_eq!(calc_size(&["?", "h", "i", "l", "L", "q"]).unwrap(), 1 + 2 + 4 + 4 + 4 + 8);
    }

    #[test]
    fn test_markers_do_not_change_size() {
        assert_eq!(calc_size(&["<I", ">d", "<10s"]).unwrap(), 22);
    }

    #[test]
    fn test_empty_format() {
        assert_eq!(calc_size::<&str>(&[]).unwrap(), 0);
    }

    #[test]
    fn test_size_beyond_buffer_limit() {
        let huge = format!("{}s", isize::MAX as u64 + 1);
        let err = calc_size(&[huge.as_str()]).unwrap_err();
        assert_eq!(err, PackError::unknown_token(0, &huge));

        let max = format!("{}s", isize::MAX);
        let err = calc_size(&["B", max.as_str()]).unwrap_err();
        assert_eq!(err, PackError::unknown_token(1, &max));
    }

    #[test]
    fn test_unknown_token() {
        let err = calc_size(&["B", "<x"]).unwrap_err();
        assert_eq!(err, PackError::unknown_token(1, "<x"));
    }
}
