use http::{HeaderMap, HeaderName, HeaderValue};

pub(crate) const HEADER_CONTENT_TYPE: &str = "content-type";

/// HTTP default charset when the Content-Type header names none.
pub const DEFAULT_CONTENT_CHARSET: &str = "ISO-8859-1";

/// One response header as the transport produced it.
///
/// Header sequences are ordered and may contain duplicate names; when a
/// sequence is reduced to a lookup map, later entries override earlier ones.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    name: String,
    value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Looks up a header value by name, case-insensitively.
///
/// Later entries take precedence over earlier ones, matching the override
/// order of [`to_header_map`].
pub fn header_value<'a>(headers: &'a [Header], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .rev()
        .find(|header| header.name.eq_ignore_ascii_case(name))
        .map(|header| header.value.as_str())
}

/// Reduces an ordered header sequence to a name-keyed map.
///
/// `HeaderName` normalizes to lowercase, which gives the case-insensitive
/// keying; `insert` makes later entries win. Entries whose name or value is
/// not representable as an HTTP header are skipped.
pub fn to_header_map(headers: &[Header]) -> HeaderMap {
    let mut map = HeaderMap::with_capacity(headers.len());
    for header in headers {
        let Ok(name) = HeaderName::from_bytes(header.name.as_bytes()) else {
            continue;
        };
        let Ok(value) = HeaderValue::from_str(&header.value) else {
            continue;
        };
        map.insert(name, value);
    }
    map
}

/// Expands a header map back into an ordered header list.
pub fn to_header_list(map: &HeaderMap) -> Vec<Header> {
    map.iter()
        .map(|(name, value)| {
            Header::new(
                name.as_str(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

/// Extracts the charset named by the Content-Type header, or `default` if
/// none is declared.
pub fn parse_charset(headers: &[Header], default: &str) -> String {
    let Some(content_type) = header_value(headers, HEADER_CONTENT_TYPE) else {
        return default.to_owned();
    };
    for parameter in content_type.split(';').skip(1) {
        let mut pair = parameter.trim().splitn(2, '=');
        let key = pair.next().unwrap_or_default();
        if let Some(value) = pair.next() {
            if key == "charset" {
                return value.to_owned();
            }
        }
    }
    default.to_owned()
}
