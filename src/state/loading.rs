// Loading state for async data.
// Tracks the catalogue fetch from idle through loaded or failed.

/// Loading state for async data.
#[derive(Debug, Clone, Default)]
pub enum LoadingState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Error(String),
}

impl<T> LoadingState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadingState::Loaded(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadingState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadingState::Error(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let loaded = LoadingState::Loaded(3);
        assert!(loaded.is_loaded());
        assert_eq!(loaded.data(), Some(&3));
        assert_eq!(loaded.error(), None);

        let failed: LoadingState<i32> = LoadingState::Error("boom".to_string());
        assert_eq!(failed.error(), Some("boom"));
        assert!(failed.data().is_none());
        assert!(LoadingState::<i32>::Loading.is_loading());
    }
}
