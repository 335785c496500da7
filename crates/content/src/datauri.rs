use crate::error::{Error, ErrorKind, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use exn::ResultExt;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use tracing::instrument;

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64";
// RFC 2397: a data URI without a media type is `text/plain;charset=US-ASCII`.
const DEFAULT_MIME: &str = "text/plain";

/// File content held in memory as a `data:` URI.
///
/// Produced by [`DataUri::encode`] when content is uploaded, consumed
/// directly by previews, and turned back into bytes with
/// [`DataUri::decode`] for downloads.
///
/// # Examples
///
/// ```
/// use filebox_content::DataUri;
///
/// let uri = DataUri::encode("text/plain", b"hello");
/// assert_eq!(uri.as_str(), "data:text/plain;base64,aGVsbG8=");
/// assert_eq!(uri.mime_type(), "text/plain");
/// assert_eq!(uri.decode().unwrap(), b"hello");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataUri(String);

impl DataUri {
    /// Encode raw bytes as a base64 data URI.
    #[must_use]
    pub fn encode(mime_type: impl AsRef<str>, data: &[u8]) -> Self {
        Self(format!("{SCHEME}{}{BASE64_MARKER},{}", mime_type.as_ref(), STANDARD.encode(data)))
    }

    /// Validate an existing data URI string.
    ///
    /// Only the scheme and the header/payload separator are checked; the
    /// payload itself is not decoded until [`decode`](Self::decode).
    pub fn parse(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let valid = value.get(..SCHEME.len()).is_some_and(|scheme| scheme.eq_ignore_ascii_case(SCHEME))
            && value.contains(',');
        if !valid {
            exn::bail!(ErrorKind::InvalidDataUri(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn header(&self) -> &str {
        let rest = &self.0[SCHEME.len()..];
        rest.split_once(',').map_or(rest, |(header, _)| header)
    }

    fn payload(&self) -> &str {
        self.0.split_once(',').map_or("", |(_, payload)| payload)
    }

    /// Media type declared in the URI header, without parameters.
    pub fn mime_type(&self) -> &str {
        match self.header().split(';').next() {
            Some(mime) if !mime.is_empty() => mime,
            _ => DEFAULT_MIME,
        }
    }

    /// Whether the payload is base64 encoded (as opposed to percent encoded).
    pub fn is_base64(&self) -> bool {
        self.header().to_ascii_lowercase().ends_with(BASE64_MARKER)
    }

    /// Decode the payload back into raw bytes.
    #[instrument(skip(self), fields(mime_type = self.mime_type(), base64 = self.is_base64()))]
    pub fn decode(&self) -> Result<Vec<u8>> {
        match self.is_base64() {
            true => STANDARD.decode(self.payload()).or_raise(|| ErrorKind::InvalidBase64),
            false => Ok(urlencoding::decode_binary(self.payload().as_bytes()).into_owned()),
        }
    }
}

impl Display for DataUri {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DataUri {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for DataUri {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}
