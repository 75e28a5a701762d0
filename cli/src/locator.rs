use thiserror::Error;
use url::{ParseError, Url};

pub const SCHEME: &str = "gemini";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocatorError {
    #[error("only the `gemini:` scheme is supported, not `{0}:`{hint}", hint = port_hint(.0))]
    InvalidScheme(String),

    #[error("malformed locator `{input}`: {source}")]
    Malformed {
        input: String,
        #[source]
        source: ParseError,
    },
}

// `example.org:1965/` parses with `example.org` as its scheme.
fn port_hint(scheme: &str) -> &'static str {
    if scheme.contains('.') {
        " (a host with a port needs `gemini://` in front)"
    } else {
        ""
    }
}

/// Turn user input into an absolute `gemini://` URL.
///
/// Input without a scheme gets `gemini://` prepended, an empty path becomes
/// `/`, and any other explicit scheme is rejected.
pub fn sanitize(raw: &str) -> Result<Url, LocatorError> {
    let input = raw.trim();
    let malformed = |source| LocatorError::Malformed {
        input: input.to_string(),
        source,
    };
    if input.is_empty() {
        return Err(malformed(ParseError::EmptyHost));
    }

    let mut url = match Url::parse(input) {
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) => {
            Url::parse(&format!("{}://{}", SCHEME, input)).map_err(malformed)?
        }
        Err(source) => return Err(malformed(source)),
    };

    if url.scheme() != SCHEME {
        return Err(LocatorError::InvalidScheme(url.scheme().to_string()));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(malformed(ParseError::EmptyHost));
    }
    if url.path().is_empty() {
        url.set_path("/");
    }
    Ok(url)
}
