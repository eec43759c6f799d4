use http::HeaderMap;

/// `HeaderSet` is the ordered list of `(name, value)` pairs a request arrived
/// with. Repeated names stay as separate entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet(Vec<(String, String)>);

impl HeaderSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
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

impl<N, V> FromIterator<(N, V)> for HeaderSet
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

/// hyper hands header names over lower-cased; they are rendered in the
/// Title-Case form hyper writes them with when `title_case_headers` is set.
/// Values are kept byte for byte, invalid UTF-8 is replaced rather than
/// rejected.
impl From<&HeaderMap> for HeaderSet {
    fn from(headers: &HeaderMap) -> Self {
        headers
            .iter()
            .map(|(name, value)| {
                (
                    title_case(name.as_str()),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect()
    }
}

#[must_use]
pub fn title_case(name: &str) -> String {
    let mut titled = String::with_capacity(name.len());
    let mut upper_next = true;

    for c in name.chars() {
        if upper_next {
            titled.push(c.to_ascii_uppercase());
        } else {
            titled.push(c);
        }
        upper_next = c == '-';
    }

    titled
}
