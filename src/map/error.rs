use thiserror::Error;

/// Configuration errors surfaced synchronously to the caller.
/// Every failing call leaves prior state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("invalid zoom value {value}: linear zoom must be positive")]
    InvalidZoom { value: i32 },

    #[error("invalid viewport dimensions {width}x{height}: sizes must be non-negative")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("unknown layer {name:?}")]
    UnknownLayer { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MapError::InvalidZoom { value: -3 };
        assert!(format!("{}", err).contains("-3"));

        let err = MapError::UnknownLayer {
            name: "volcanoes".to_string(),
        };
        assert!(format!("{}", err).contains("volcanoes"));
    }
}
