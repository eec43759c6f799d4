use std::env;

/// `EnvironmentSnapshot` is a copy of the process environment taken at one
/// point in time. Entries keep the order the process environment yields them
/// in, which does not change between captures unless something mutates the
/// environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentSnapshot(Vec<(String, String)>);

impl EnvironmentSnapshot {
    /// Captures every variable visible to the process. Names or values that
    /// are not valid unicode are converted lossily instead of being skipped.
    #[must_use]
    pub fn capture() -> Self {
        env::vars_os()
            .map(|(name, value)| {
                (
                    name.to_string_lossy().into_owned(),
                    value.to_string_lossy().into_owned(),
                )
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<N, V> FromIterator<(N, V)> for EnvironmentSnapshot
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_sees_every_variable() {
        let snapshot = EnvironmentSnapshot::capture();
        assert_eq!(snapshot.len(), env::vars_os().count());
    }

    #[test]
    fn capture_order_is_stable() {
        let first = EnvironmentSnapshot::capture();
        let second = EnvironmentSnapshot::capture();
        assert_eq!(first, second);
    }

    #[test]
    fn capture_includes_known_variable() {
        let Some((name, value)) = env::vars_os().next() else {
            return;
        };
        let (name, value) = (name.to_string_lossy(), value.to_string_lossy());

        let snapshot = EnvironmentSnapshot::capture();
        assert!(snapshot
            .iter()
            .any(|(key, val)| key == name && val == value));
    }

    #[test]
    fn builds_from_pairs_in_order() {
        let snapshot: EnvironmentSnapshot = [("FOO", "bar"), ("EMPTY", "")].into_iter().collect();

        assert_eq!(
            snapshot.iter().collect::<Vec<_>>(),
            vec![("FOO", "bar"), ("EMPTY", "")]
        );
        assert!(EnvironmentSnapshot::default().is_empty());
    }
}
