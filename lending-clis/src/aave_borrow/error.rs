use lending_transactions::prelude::*;
use std::fmt;
use std::io;

/// Represents an aave-borrow error.
#[derive(Debug)]
pub enum Error {
    IOError(io::Error),

    /// The `--network-config` file is not a valid list of network definitions.
    InvalidNetworkConfig(serde_json::Error),

    /// No network definition exists for the node's chain id.
    NetworkError(ParseNetworkError),

    /// The network given with `--network` is not the one the node serves.
    ChainIdMismatch {
        network: String,
        expected: u64,
        actual: u64,
    },

    InvalidPrivateKey(ParsePrivateKeyError),

    /// The node manages no accounts and no private key was supplied.
    NoAccountAvailable,

    /// The node could not be reached or answered with an error.
    ProviderError(ProviderError),

    /// Contract execution was rejected, either when submitting or once mined.
    TransactionReverted {
        hash: Option<Hash>,
        reason: String,
    },

    /// The transaction was not confirmed within the configured wait.
    ConfirmationTimeout(Hash),

    AbiDecodeError(AbiDecodeError),

    TransactionConstructionError(MissingFieldError),

    /// The price feed answered with a zero or negative price.
    InvalidPrice(I256),

    ArithmeticOverflow,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for Error {}

impl From<ProviderError> for Error {
    fn from(error: ProviderError) -> Self {
        if error.is_revert() {
            let reason = match &error {
                ProviderError::Rpc { message, .. } => message.clone(),
                other => other.to_string(),
            };
            Error::TransactionReverted { hash: None, reason }
        } else {
            Error::ProviderError(error)
        }
    }
}

impl From<AbiDecodeError> for Error {
    fn from(error: AbiDecodeError) -> Self {
        Error::AbiDecodeError(error)
    }
}

impl From<ParseNetworkError> for Error {
    fn from(error: ParseNetworkError) -> Self {
        Error::NetworkError(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revert_errors_are_classified() {
        let error: Error = ProviderError::Rpc {
            code: EXECUTION_REVERTED_CODE,
            message: "execution reverted: 11".to_owned(),
            data: None,
        }
        .into();
        assert!(matches!(
            error,
            Error::TransactionReverted { hash: None, ref reason } if reason == "execution reverted: 11"
        ));

        let error: Error = ProviderError::Transport("connection refused".to_owned()).into();
        assert!(matches!(error, Error::ProviderError(ProviderError::Transport(_))));
    }
}
