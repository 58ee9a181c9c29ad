use aws_sdk_dynamodb::error::BuildError;
use aws_sdk_dynamodb::operation::create_table::CreateTableError;
use aws_smithy_runtime_api::client::result::SdkError;
use aws_smithy_runtime_api::http::Response;
use std::convert::Infallible;
use std::error::Error as StdError;
use std::fmt;

type SerdeJsonError = serde_json::Error;
type DynamoCreateTableError = SdkError<CreateTableError, Response>;

/// Key schema generation and provisioning error
#[derive(Debug)]
pub enum Error {
    /// A generator or configuration input was out of range or unrecognized
    InvalidArgument(String),
    /// JSON serialization/deserialization error
    SerdeJson(SerdeJsonError),
    /// DynamoDB request builder error
    BuildError(BuildError),
    /// DynamoDB CreateTable operation error
    DynamoCreateTableError(DynamoCreateTableError),
}

impl Error {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    /// Check if the error was raised by input validation
    ///
    /// Invalid arguments are detected before any output is produced, so callers
    /// are expected to fail configuration building on them.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }

    /// Check if the error is a DynamoDB-related error
    pub fn is_dynamodb_error(&self) -> bool {
        matches!(
            self,
            Error::BuildError(_) | Error::DynamoCreateTableError(_)
        )
    }
}

macro_rules! impl_from_error {
    ($name:ident, $variant:ident) => {
        impl From<$name> for Error {
            fn from(e: $name) -> Self {
                Error::$variant(e)
            }
        }
    };
    ($name:ident) => {
        impl From<$name> for Error {
            fn from(e: $name) -> Self {
                Error::$name(e)
            }
        }
    };
}

impl_from_error!(SerdeJsonError, SerdeJson);
impl_from_error!(BuildError);
impl_from_error!(DynamoCreateTableError);

// Lets infallible conversions (e.g. `u32 -> GsiCount`) share the generic bounds.
impl From<Infallible> for Error {
    fn from(e: Infallible) -> Self {
        match e {}
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Error::SerdeJson(e) => write!(f, "JSON serialization error: {}", e),
            Error::BuildError(e) => write!(f, "DynamoDB request builder error: {}", e),
            Error::DynamoCreateTableError(e) => {
                write!(f, "DynamoDB CreateTable operation failed: {}", e)
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::InvalidArgument(_) => None,
            Error::SerdeJson(e) => Some(e),
            Error::BuildError(e) => Some(e),
            Error::DynamoCreateTableError(e) => Some(e),
        }
    }
}
