use lending_transactions::prelude::*;
use std::collections::HashMap;

use crate::simulated::*;

/// Something a client did against the ledger, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    /// A transaction was accepted and mined.
    Submitted {
        hash: Hash,
        to: Address,
        selector: Option<Selector>,
    },
    /// A transaction was rejected because execution reverted.
    Rejected {
        to: Address,
        selector: Option<Selector>,
        reason: String,
    },
    /// A client fetched the receipt of a mined transaction.
    ReceiptObserved { hash: Hash },
}

pub const DEFAULT_ACCOUNT: Address =
    Address::from_hex_literal("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");
pub const GAS_PRICE: u128 = 1_000_000_000;
pub const GAS_LIMIT: u128 = 300_000;

pub struct TestLedgerBuilder {
    network: NetworkDefinition,
    accounts: Vec<Address>,
    ltv_bps: u16,
    price: I256,
    receipt_delay: u32,
    mine_reverted: bool,
}

impl TestLedgerBuilder {
    /// Replaces the node-managed accounts; an empty list leaves the node with none.
    pub fn with_accounts(mut self, accounts: Vec<Address>) -> Self {
        self.accounts = accounts;
        self
    }

    pub fn with_ltv_bps(mut self, ltv_bps: u16) -> Self {
        self.ltv_bps = ltv_bps;
        self
    }

    pub fn with_price(mut self, price: I256) -> Self {
        self.price = price;
        self
    }

    /// Reports every transaction as pending for the given number of receipt queries.
    pub fn with_receipt_delay(mut self, polls: u32) -> Self {
        self.receipt_delay = polls;
        self
    }

    /// Mines reverting transactions with a failed receipt instead of rejecting them on submission.
    pub fn with_reverted_transactions_mined(mut self) -> Self {
        self.mine_reverted = true;
        self
    }

    pub fn build(self) -> TestLedger {
        let mut contracts = SimulatedContracts::new(self.network, DEFAULT_LENDING_POOL);
        contracts.ltv_bps = self.ltv_bps;
        contracts.price = self.price;
        for account in &self.accounts {
            // 10,000 ETH
            contracts.set_native_balance(*account, U256::new(10_000_000_000_000_000_000_000));
        }
        // Liquidity for borrowers: 1,000,000 DAI
        contracts
            .dai_mut()
            .mint(DEFAULT_LENDING_POOL, U256::new(1_000_000_000_000_000_000_000_000))
            .expect("Initial liquidity fits");

        TestLedger {
            contracts,
            accounts: self.accounts,
            nonces: HashMap::new(),
            head: 0,
            receipts: HashMap::new(),
            pending_polls: HashMap::new(),
            receipt_delay: self.receipt_delay,
            mine_reverted: self.mine_reverted,
            events: vec![],
        }
    }
}

/// An in-memory node with automining, serving the simulated lending contracts.
///
/// Every accepted transaction is mined into its own block. Raw transactions are not supported,
/// so clients must use the node-managed accounts.
pub struct TestLedger {
    contracts: SimulatedContracts,
    accounts: Vec<Address>,
    nonces: HashMap<Address, u64>,
    head: u64,
    receipts: HashMap<Hash, TransactionReceipt>,
    pending_polls: HashMap<Hash, u32>,
    receipt_delay: u32,
    mine_reverted: bool,
    events: Vec<LedgerEvent>,
}

impl TestLedger {
    pub fn builder() -> TestLedgerBuilder {
        TestLedgerBuilder {
            network: NetworkDefinition::localhost(),
            accounts: vec![DEFAULT_ACCOUNT],
            ltv_bps: 8000,
            price: I256::new(500_000_000_000_000),
            receipt_delay: 0,
            mine_reverted: false,
        }
    }

    pub fn network(&self) -> &NetworkDefinition {
        &self.contracts.network
    }

    pub fn contracts(&self) -> &SimulatedContracts {
        &self.contracts
    }

    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// The selectors of all mined transactions, in order.
    pub fn submitted_selectors(&self) -> Vec<Selector> {
        self.events
            .iter()
            .filter_map(|event| match event {
                LedgerEvent::Submitted {
                    selector: Some(selector),
                    ..
                } => Some(*selector),
                _ => None,
            })
            .collect()
    }

    fn next_transaction_hash(&mut self, from: Address) -> Hash {
        let nonce = self.nonces.entry(from).or_insert(0);
        let mut preimage = from.to_vec();
        preimage.extend_from_slice(&nonce.to_be_bytes());
        *nonce += 1;
        keccak256(preimage)
    }

    fn mine(&mut self, hash: Hash, status: bool) {
        self.head += 1;
        self.receipts.insert(
            hash,
            TransactionReceipt {
                transaction_hash: hash,
                block_number: self.head,
                status,
                gas_used: U256::new(21_000),
            },
        );
        self.pending_polls.insert(hash, self.receipt_delay);
    }
}

fn call_selector(data: &[u8]) -> Option<Selector> {
    WordDecoder::for_call(data).ok().map(|(selector, _)| selector)
}

fn reverted(reason: &str) -> ProviderError {
    ProviderError::Rpc {
        code: EXECUTION_REVERTED_CODE,
        message: format!("execution reverted: {}", reason),
        data: None,
    }
}

impl Provider for TestLedger {
    fn chain_id(&mut self) -> Result<u64, ProviderError> {
        Ok(self.contracts.network.chain_id)
    }

    fn accounts(&mut self) -> Result<Vec<Address>, ProviderError> {
        Ok(self.accounts.clone())
    }

    fn block_number(&mut self) -> Result<u64, ProviderError> {
        Ok(self.head)
    }

    fn call(&mut self, from: Address, to: Address, data: &[u8]) -> Result<Vec<u8>, ProviderError> {
        let mut scratch = self.contracts.clone();
        scratch
            .execute(from, to, U256::ZERO, data)
            .map_err(|Revert(reason)| reverted(&reason))
    }

    fn send_transaction(&mut self, request: &TransactionRequest) -> Result<Hash, ProviderError> {
        if !self.accounts.contains(&request.from) {
            return Err(ProviderError::Rpc {
                code: -32000,
                message: format!("unknown account {}", request.from),
                data: None,
            });
        }
        let selector = call_selector(&request.data);
        let status = match self.contracts.execute(
            request.from,
            request.to,
            request.value,
            &request.data,
        ) {
            Ok(_) => true,
            Err(Revert(reason)) => {
                self.events.push(LedgerEvent::Rejected {
                    to: request.to,
                    selector,
                    reason: reason.clone(),
                });
                if !self.mine_reverted {
                    return Err(reverted(&reason));
                }
                false
            }
        };

        let hash = self.next_transaction_hash(request.from);
        self.mine(hash, status);
        self.events.push(LedgerEvent::Submitted {
            hash,
            to: request.to,
            selector,
        });
        Ok(hash)
    }

    fn send_raw_transaction(&mut self, _raw: &[u8]) -> Result<Hash, ProviderError> {
        Err(ProviderError::Rpc {
            code: -32601,
            message: "raw transactions are not supported by the test ledger".to_owned(),
            data: None,
        })
    }

    fn transaction_count(&mut self, address: Address) -> Result<u64, ProviderError> {
        Ok(self.nonces.get(&address).copied().unwrap_or(0))
    }

    fn gas_price(&mut self) -> Result<U256, ProviderError> {
        Ok(U256::new(GAS_PRICE))
    }

    fn estimate_gas(&mut self, request: &TransactionRequest) -> Result<U256, ProviderError> {
        let mut scratch = self.contracts.clone();
        scratch
            .execute(request.from, request.to, request.value, &request.data)
            .map(|_| U256::new(GAS_LIMIT))
            .map_err(|Revert(reason)| reverted(&reason))
    }

    fn transaction_receipt(
        &mut self,
        hash: Hash,
    ) -> Result<Option<TransactionReceipt>, ProviderError> {
        if let Some(polls) = self.pending_polls.get_mut(&hash) {
            if *polls > 0 {
                *polls -= 1;
                return Ok(None);
            }
        }
        let receipt = self.receipts.get(&hash).cloned();
        if receipt.is_some() {
            self.events.push(LedgerEvent::ReceiptObserved { hash });
        }
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approve(spender: Address, amount: U256) -> Vec<u8> {
        CallEncoder::new("approve(address,uint256)")
            .address(spender)
            .uint(amount)
            .build()
    }

    #[test]
    fn test_transactions_are_automined() {
        let mut ledger = TestLedger::builder().build();
        let weth = ledger.network().weth_token;
        let request = TransactionRequest::new(
            DEFAULT_ACCOUNT,
            weth,
            CallEncoder::new("deposit()").build(),
        )
        .with_value(U256::new(1_000));

        let hash = ledger.send_transaction(&request).unwrap();
        let receipt = ledger.transaction_receipt(hash).unwrap().unwrap();

        assert_eq!(receipt.block_number, 1);
        assert!(receipt.status);
        assert_eq!(ledger.block_number().unwrap(), 1);
        assert_eq!(ledger.transaction_count(DEFAULT_ACCOUNT).unwrap(), 1);
        assert_eq!(
            ledger.contracts().weth().balance_of(DEFAULT_ACCOUNT),
            U256::new(1_000)
        );
        assert_eq!(
            ledger.events(),
            &[
                LedgerEvent::Submitted {
                    hash,
                    to: weth,
                    selector: Some(selector("deposit()")),
                },
                LedgerEvent::ReceiptObserved { hash },
            ]
        );
    }

    #[test]
    fn test_receipt_delay() {
        let mut ledger = TestLedger::builder().with_receipt_delay(2).build();
        let weth = ledger.network().weth_token;
        let request = TransactionRequest::new(
            DEFAULT_ACCOUNT,
            weth,
            approve(DEFAULT_LENDING_POOL, U256::ONE),
        );

        let hash = ledger.send_transaction(&request).unwrap();

        assert_eq!(ledger.transaction_receipt(hash).unwrap(), None);
        assert_eq!(ledger.transaction_receipt(hash).unwrap(), None);
        assert!(ledger.transaction_receipt(hash).unwrap().is_some());
    }

    #[test]
    fn test_reverts_are_rejected_or_mined() {
        let pool_deposit = CallEncoder::new("deposit(address,uint256,address,uint16)")
            .address(NetworkDefinition::localhost().weth_token)
            .uint(U256::ZERO)
            .address(DEFAULT_ACCOUNT)
            .uint16(0)
            .build();
        let request = TransactionRequest::new(DEFAULT_ACCOUNT, DEFAULT_LENDING_POOL, pool_deposit);

        let mut ledger = TestLedger::builder().build();
        let error = ledger.send_transaction(&request).unwrap_err();
        assert!(error.is_revert());
        assert_eq!(ledger.block_number().unwrap(), 0);

        let mut ledger = TestLedger::builder()
            .with_reverted_transactions_mined()
            .build();
        let hash = ledger.send_transaction(&request).unwrap();
        assert!(!ledger.transaction_receipt(hash).unwrap().unwrap().status);
    }

    #[test]
    fn test_calls_do_not_change_state() {
        let mut ledger = TestLedger::builder().build();
        let weth = ledger.network().weth_token;

        ledger
            .call(DEFAULT_ACCOUNT, weth, &approve(DEFAULT_LENDING_POOL, U256::ONE))
            .unwrap();

        assert_eq!(
            ledger
                .contracts()
                .weth()
                .allowance(DEFAULT_ACCOUNT, DEFAULT_LENDING_POOL),
            U256::ZERO
        );
        assert!(ledger.events().is_empty());
    }
}
