//! Ordered fallback chains: try each source until one produces a value.

/// Outcome of a single source in a chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Attempt<T> {
    Hit(T),
    /// Nothing usable here; the reason is kept for logging.
    Next(String),
}

impl<T> Attempt<T> {
    pub fn from_option(value: Option<T>, reason: impl Into<String>) -> Self {
        match value {
            Some(v) => Attempt::Hit(v),
            None => Attempt::Next(reason.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_option_maps_both_arms() {
        assert_eq!(Attempt::from_option(Some(3), "unused"), Attempt::Hit(3));
        assert_eq!(
            Attempt::<i32>::from_option(None, "empty"),
            Attempt::Next("empty".to_string())
        );
    }
}
