/// Failures turning a response body into records
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Malformed XML: {0}")]
    MalformedXml(String),

    #[error("Missing <{0}> element in response")]
    MissingElement(&'static str),

    #[error("Invalid <{element}> value: {value:?}")]
    InvalidTotal {
        element: &'static str,
        value: String,
    },
}
