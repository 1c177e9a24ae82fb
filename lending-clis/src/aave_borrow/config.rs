use lending_transactions::prelude::*;
use std::env;
use std::fs;
use std::path::Path;

use crate::aave_borrow::*;

pub const ENV_RPC_URL: &str = "RPC_URL";
pub const ENV_PRIVATE_KEY: &str = "PRIVATE_KEY";
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// Returns the node url: the flag if given, else `RPC_URL`, else the local default.
pub fn get_rpc_url(flag: Option<&str>) -> String {
    match flag {
        Some(url) => url.to_owned(),
        None => env::var(ENV_RPC_URL).unwrap_or_else(|_| DEFAULT_RPC_URL.to_owned()),
    }
}

/// Returns the signing key from `PRIVATE_KEY`, or `None` to use a node-managed account.
pub fn get_private_key() -> Result<Option<PrivateKey>, Error> {
    parse_private_key(env::var(ENV_PRIVATE_KEY).ok())
}

fn parse_private_key(value: Option<String>) -> Result<Option<PrivateKey>, Error> {
    match value {
        Some(value) if !value.trim().is_empty() => PrivateKey::from_hex(&value)
            .map(Some)
            .map_err(Error::InvalidPrivateKey),
        _ => Ok(None),
    }
}

/// Returns the built-in network definitions, extended or overridden by the given JSON file.
pub fn get_network_definitions(path: Option<&Path>) -> Result<NetworkDefinitions, Error> {
    let mut definitions = NetworkDefinitions::builtin();
    if let Some(path) = path {
        let content = fs::read_to_string(path).map_err(Error::IOError)?;
        let overrides: Vec<NetworkDefinition> =
            serde_json::from_str(&content).map_err(Error::InvalidNetworkConfig)?;
        definitions.extend(overrides);
    }
    Ok(definitions)
}

/// Picks the network the node serves. A network requested by name is looked up in the table
/// first, so a config file entry with that name replaces the built-in one.
pub fn select_network(
    definitions: &NetworkDefinitions,
    requested: Option<&NetworkDefinition>,
    chain_id: u64,
) -> Result<NetworkDefinition, Error> {
    let network = match requested {
        Some(requested) => definitions
            .iter()
            .find(|d| d.logical_name == requested.logical_name)
            .unwrap_or(requested),
        None => definitions.for_chain_id(chain_id)?,
    };
    if network.chain_id != chain_id {
        return Err(Error::ChainIdMismatch {
            network: network.logical_name.clone(),
            expected: network.chain_id,
            actual: chain_id,
        });
    }
    Ok(network.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_private_key_is_optional() {
        assert!(parse_private_key(None).unwrap().is_none());
        assert!(parse_private_key(Some("  ".to_owned())).unwrap().is_none());

        let key = parse_private_key(Some(
            "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80\n".to_owned(),
        ))
        .unwrap()
        .unwrap();
        assert_eq!(
            key.address().to_string(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );

        assert!(matches!(
            parse_private_key(Some("0x1234".to_owned())),
            Err(Error::InvalidPrivateKey(ParsePrivateKeyError::InvalidLength(2)))
        ));
    }

    #[test]
    fn test_rpc_url_flag_wins() {
        assert_eq!(get_rpc_url(Some("http://node:8545")), "http://node:8545");
    }

    #[test]
    fn test_network_config_file_overrides_builtin() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{
                "chainId": 31337,
                "logicalName": "fork",
                "wethToken": "0x0000000000000000000000000000000000000001",
                "lendingPoolAddressesProvider": "0x0000000000000000000000000000000000000002",
                "daiEthPriceFeed": "0x0000000000000000000000000000000000000003",
                "daiToken": "0x0000000000000000000000000000000000000004"
            }}]"#
        )
        .unwrap();

        let definitions = get_network_definitions(Some(file.path())).unwrap();

        let fork = definitions.for_chain_id(31337).unwrap();
        assert_eq!(fork.logical_name, "fork");
        assert_eq!(fork.dai_token, Address::from_hex_literal("0000000000000000000000000000000000000004"));
        assert_eq!(fork.base_currency_decimals, NATIVE_DECIMALS);
        assert_eq!(definitions.for_chain_id(1).unwrap(), &NetworkDefinition::mainnet());
    }

    #[test]
    fn test_select_network() {
        let definitions = NetworkDefinitions::builtin();

        assert_eq!(
            select_network(&definitions, None, 31337).unwrap(),
            NetworkDefinition::localhost()
        );
        assert_eq!(
            select_network(&definitions, Some(&NetworkDefinition::mainnet()), 1).unwrap(),
            NetworkDefinition::mainnet()
        );
        assert!(matches!(
            select_network(&definitions, Some(&NetworkDefinition::mainnet()), 31337),
            Err(Error::ChainIdMismatch { expected: 1, actual: 31337, .. })
        ));
        assert!(matches!(
            select_network(&definitions, None, 5),
            Err(Error::NetworkError(ParseNetworkError::UnknownChainId(5)))
        ));
    }

    #[test]
    fn test_invalid_network_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"chainId": 5}}"#).unwrap();

        assert!(matches!(
            get_network_definitions(Some(file.path())),
            Err(Error::InvalidNetworkConfig(_))
        ));
        assert!(matches!(
            get_network_definitions(Some(Path::new("/nonexistent/networks.json"))),
            Err(Error::IOError(_))
        ));
    }
}
