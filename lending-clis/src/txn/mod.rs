use lending_transactions::prelude::*;
use std::thread;
use std::time::{Duration, Instant};

use crate::aave_borrow::Error;

/// Blocks a state-changing transaction must be included in before the next step runs.
pub const DEFAULT_CONFIRMATIONS: u64 = 1;
pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(300);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// The account transactions are sent from.
pub enum Account {
    /// An account unlocked on the node, which signs with `eth_sendTransaction`.
    NodeManaged(Address),
    /// A key held by this process; transactions are signed locally and sent raw.
    Local(PrivateKey),
}

impl Account {
    /// Uses the private key if one is given, otherwise the first account the node manages.
    pub fn resolve<P: Provider>(
        provider: &mut P,
        private_key: Option<PrivateKey>,
    ) -> Result<Account, Error> {
        match private_key {
            Some(key) => Ok(Account::Local(key)),
            None => provider
                .accounts()?
                .first()
                .copied()
                .map(Account::NodeManaged)
                .ok_or(Error::NoAccountAvailable),
        }
    }

    pub fn address(&self) -> Address {
        match self {
            Account::NodeManaged(address) => *address,
            Account::Local(key) => key.address(),
        }
    }
}

/// Sends contract calls and transactions on behalf of one account and waits for them to be mined.
pub struct TransactionSubmitter<P: Provider> {
    provider: P,
    account: Account,
    chain_id: u64,
    confirmations: u64,
    confirmation_timeout: Duration,
    poll_interval: Duration,
}

impl<P: Provider> TransactionSubmitter<P> {
    pub fn new(provider: P, account: Account, chain_id: u64) -> Self {
        Self {
            provider,
            account,
            chain_id,
            confirmations: DEFAULT_CONFIRMATIONS,
            confirmation_timeout: DEFAULT_CONFIRMATION_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_wait(mut self, confirmation_timeout: Duration, poll_interval: Duration) -> Self {
        self.confirmation_timeout = confirmation_timeout;
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_confirmations(mut self, confirmations: u64) -> Self {
        self.confirmations = confirmations;
        self
    }

    pub fn address(&self) -> Address {
        self.account.address()
    }

    /// Executes a read-only call from this account against the latest block.
    pub fn call(&mut self, to: Address, data: &[u8]) -> Result<Vec<u8>, Error> {
        let from = self.address();
        Ok(self.provider.call(from, to, data)?)
    }

    /// Submits a transaction and returns its hash without waiting for it to be mined.
    pub fn submit(&mut self, to: Address, data: Vec<u8>, value: U256) -> Result<Hash, Error> {
        let request = TransactionRequest::new(self.address(), to, data).with_value(value);
        match &self.account {
            Account::NodeManaged(_) => Ok(self.provider.send_transaction(&request)?),
            Account::Local(key) => {
                let mut request = request;
                request.nonce = Some(self.provider.transaction_count(request.from)?);
                request.gas_price = Some(self.provider.gas_price()?);
                request.gas = Some(self.provider.estimate_gas(&request)?);

                let transaction = request
                    .to_legacy()
                    .map_err(Error::TransactionConstructionError)?;
                let (raw, _) = key.sign_transaction(&transaction, self.chain_id);
                Ok(self.provider.send_raw_transaction(&raw)?)
            }
        }
    }

    /// Polls until the transaction has the given number of confirmations.
    ///
    /// A mined transaction whose status is failure is reported as reverted.
    pub fn wait(&mut self, hash: Hash, confirmations: u64) -> Result<TransactionReceipt, Error> {
        let started = Instant::now();
        loop {
            if let Some(receipt) = self.provider.transaction_receipt(hash)? {
                if !receipt.status {
                    return Err(Error::TransactionReverted {
                        hash: Some(hash),
                        reason: format!("reverted in block {}", receipt.block_number),
                    });
                }
                let head = self.provider.block_number()?;
                if head.saturating_sub(receipt.block_number) + 1 >= confirmations {
                    return Ok(receipt);
                }
            }
            if started.elapsed() >= self.confirmation_timeout {
                return Err(Error::ConfirmationTimeout(hash));
            }
            thread::sleep(self.poll_interval);
        }
    }

    /// Submits a transaction and waits for the configured number of confirmations.
    pub fn send(
        &mut self,
        to: Address,
        data: Vec<u8>,
        value: U256,
    ) -> Result<TransactionReceipt, Error> {
        let hash = self.submit(to, data, value)?;
        self.wait(hash, self.confirmations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mines every transaction into the next block and reports whatever status it is told to.
    #[derive(Default)]
    struct FakeNode {
        accounts: Vec<Address>,
        head: u64,
        receipt_status: bool,
        mined_in: Option<u64>,
        sent: Vec<TransactionRequest>,
        raw: Vec<Vec<u8>>,
        last_hash: Option<Hash>,
    }

    impl FakeNode {
        fn mine(&mut self, hash: Hash) -> Hash {
            self.head += 1;
            self.mined_in = Some(self.head);
            self.last_hash = Some(hash);
            hash
        }
    }

    impl Provider for FakeNode {
        fn chain_id(&mut self) -> Result<u64, ProviderError> {
            Ok(31337)
        }

        fn accounts(&mut self) -> Result<Vec<Address>, ProviderError> {
            Ok(self.accounts.clone())
        }

        fn block_number(&mut self) -> Result<u64, ProviderError> {
            Ok(self.head)
        }

        fn call(&mut self, _: Address, _: Address, data: &[u8]) -> Result<Vec<u8>, ProviderError> {
            Ok(data.to_vec())
        }

        fn send_transaction(&mut self, request: &TransactionRequest) -> Result<Hash, ProviderError> {
            self.sent.push(request.clone());
            Ok(self.mine(keccak256(&request.data)))
        }

        fn send_raw_transaction(&mut self, raw: &[u8]) -> Result<Hash, ProviderError> {
            self.raw.push(raw.to_vec());
            Ok(self.mine(keccak256(raw)))
        }

        fn transaction_count(&mut self, _: Address) -> Result<u64, ProviderError> {
            Ok(4)
        }

        fn gas_price(&mut self) -> Result<U256, ProviderError> {
            Ok(U256::new(1_000_000_000))
        }

        fn estimate_gas(&mut self, _: &TransactionRequest) -> Result<U256, ProviderError> {
            Ok(U256::new(60_000))
        }

        fn transaction_receipt(
            &mut self,
            hash: Hash,
        ) -> Result<Option<TransactionReceipt>, ProviderError> {
            if self.last_hash != Some(hash) {
                return Ok(None);
            }
            Ok(self.mined_in.map(|block_number| TransactionReceipt {
                transaction_hash: hash,
                block_number,
                status: self.receipt_status,
                gas_used: U256::new(21000),
            }))
        }
    }

    fn hardhat_key() -> PrivateKey {
        PrivateKey::from_hex("0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80")
            .unwrap()
    }

    #[test]
    fn test_resolve_account() {
        let mut node = FakeNode {
            accounts: vec![Address([7; 20]), Address([8; 20])],
            ..Default::default()
        };
        let account = Account::resolve(&mut node, None).unwrap();
        assert_eq!(account.address(), Address([7; 20]));

        let account = Account::resolve(&mut node, Some(hardhat_key())).unwrap();
        assert!(matches!(account, Account::Local(_)));

        let mut empty = FakeNode::default();
        assert!(matches!(
            Account::resolve(&mut empty, None),
            Err(Error::NoAccountAvailable)
        ));
    }

    #[test]
    fn test_node_managed_send() {
        let mut node = FakeNode {
            receipt_status: true,
            ..Default::default()
        };
        let mut submitter =
            TransactionSubmitter::new(&mut node, Account::NodeManaged(Address([7; 20])), 31337);

        let receipt = submitter
            .send(Address([2; 20]), vec![0xd0], U256::new(5))
            .unwrap();
        drop(submitter);

        assert_eq!(receipt.block_number, 1);
        assert_eq!(node.sent.len(), 1);
        assert_eq!(node.sent[0].from, Address([7; 20]));
        assert_eq!(node.sent[0].value, U256::new(5));
        assert_eq!(node.sent[0].nonce, None);
    }

    #[test]
    fn test_local_key_signs_and_sends_raw() {
        let mut node = FakeNode {
            receipt_status: true,
            ..Default::default()
        };
        let key = hardhat_key();
        let expected = TransactionRequest {
            from: key.address(),
            to: Address([2; 20]),
            value: U256::ZERO,
            data: vec![0x09, 0x5e],
            nonce: Some(4),
            gas: Some(U256::new(60_000)),
            gas_price: Some(U256::new(1_000_000_000)),
        }
        .to_legacy()
        .unwrap();
        let (expected_raw, expected_hash) = key.sign_transaction(&expected, 31337);

        let mut submitter = TransactionSubmitter::new(&mut node, Account::Local(key), 31337);
        let hash = submitter
            .submit(Address([2; 20]), vec![0x09, 0x5e], U256::ZERO)
            .unwrap();
        drop(submitter);

        assert_eq!(hash, expected_hash);
        assert!(node.sent.is_empty());
        assert_eq!(node.raw, vec![expected_raw]);
    }

    #[test]
    fn test_failed_receipt_is_reverted() {
        let mut node = FakeNode::default();
        let mut submitter =
            TransactionSubmitter::new(&mut node, Account::NodeManaged(Address([7; 20])), 31337);

        let result = submitter.send(Address([2; 20]), vec![0xa4], U256::ZERO);

        assert!(matches!(
            result,
            Err(Error::TransactionReverted { hash: Some(_), .. })
        ));
    }

    #[test]
    fn test_wait_times_out() {
        let mut node = FakeNode::default();
        let mut submitter =
            TransactionSubmitter::new(&mut node, Account::NodeManaged(Address([7; 20])), 31337)
                .with_wait(Duration::from_millis(30), Duration::from_millis(10));

        let hash = Hash([9; 32]);
        assert!(matches!(
            submitter.wait(hash, 1),
            Err(Error::ConfirmationTimeout(h)) if h == hash
        ));
    }
}
