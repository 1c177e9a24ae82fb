use lending_transactions::prelude::*;
use std::collections::HashMap;

const APPROVE: &str = "approve(address,uint256)";
const BALANCE_OF: &str = "balanceOf(address)";
const ALLOWANCE: &str = "allowance(address,address)";
const DECIMALS: &str = "decimals()";
const WETH_DEPOSIT: &str = "deposit()";
const GET_LENDING_POOL: &str = "getLendingPool()";
const POOL_DEPOSIT: &str = "deposit(address,uint256,address,uint16)";
const POOL_BORROW: &str = "borrow(address,uint256,uint256,uint16,address)";
const POOL_REPAY: &str = "repay(address,uint256,uint256,address)";
const GET_USER_ACCOUNT_DATA: &str = "getUserAccountData(address)";
const LATEST_ROUND_DATA: &str = "latestRoundData()";

// Lending pool error codes.
pub const REVERT_INVALID_AMOUNT: &str = "1";
pub const REVERT_NO_ACTIVE_RESERVE: &str = "2";
pub const REVERT_INVALID_INTEREST_RATE_MODE: &str = "8";
pub const REVERT_COLLATERAL_BALANCE_IS_0: &str = "9";
pub const REVERT_COLLATERAL_CANNOT_COVER_NEW_BORROW: &str = "11";
pub const REVERT_NO_DEBT_OF_SELECTED_TYPE: &str = "15";

const VARIABLE_RATE_MODE: u8 = 2;
const BPS: u128 = 10_000;

pub const DEFAULT_LENDING_POOL: Address =
    Address::from_hex_literal("7d2768de32b0b80b7a3454c06bdac94a69ddc7a9");

/// A contract execution that reverted, with its reason string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revert(pub String);

impl Revert {
    fn new(reason: &str) -> Self {
        Self(reason.to_owned())
    }
}

impl From<AbiDecodeError> for Revert {
    fn from(_: AbiDecodeError) -> Self {
        Revert::new("invalid call data")
    }
}

fn overflow() -> Revert {
    Revert::new("arithmetic overflow")
}

fn word(value: U256) -> [u8; WORD_LENGTH] {
    value.to_be_bytes()
}

#[derive(Debug, Clone)]
pub struct SimulatedToken {
    pub decimals: u8,
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
}

impl SimulatedToken {
    pub fn new(decimals: u8) -> Self {
        Self {
            decimals,
            balances: HashMap::new(),
            allowances: HashMap::new(),
        }
    }

    pub fn balance_of(&self, owner: Address) -> U256 {
        self.balances.get(&owner).copied().unwrap_or_default()
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default()
    }

    pub fn mint(&mut self, to: Address, amount: U256) -> Result<(), Revert> {
        let balance = self.balance_of(to).checked_add(amount).ok_or_else(overflow)?;
        self.balances.insert(to, balance);
        Ok(())
    }

    fn approve(&mut self, owner: Address, spender: Address, amount: U256) {
        self.allowances.insert((owner, spender), amount);
    }

    fn transfer(&mut self, from: Address, to: Address, amount: U256) -> Result<(), Revert> {
        let balance = self.balance_of(from);
        if balance < amount {
            return Err(Revert::new("ERC20: transfer amount exceeds balance"));
        }
        self.balances.insert(from, balance - amount);
        self.mint(to, amount)
    }

    fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), Revert> {
        let allowance = self.allowance(from, spender);
        if allowance < amount {
            return Err(Revert::new("ERC20: transfer amount exceeds allowance"));
        }
        self.transfer(from, to, amount)?;
        self.approve(from, spender, allowance - amount);
        Ok(())
    }

    fn execute(&mut self, from: Address, data: &[u8]) -> Result<Vec<u8>, Revert> {
        let (selected, mut args) = WordDecoder::for_call(data)?;
        if selected == selector(APPROVE) {
            let spender = args.address()?;
            let amount = args.uint()?;
            self.approve(from, spender, amount);
            Ok(word(U256::ONE).to_vec())
        } else if selected == selector(BALANCE_OF) {
            Ok(word(self.balance_of(args.address()?)).to_vec())
        } else if selected == selector(ALLOWANCE) {
            let owner = args.address()?;
            let spender = args.address()?;
            Ok(word(self.allowance(owner, spender)).to_vec())
        } else if selected == selector(DECIMALS) {
            Ok(word(U256::from(self.decimals)).to_vec())
        } else {
            Err(Revert::new("function selector was not recognized"))
        }
    }
}

/// The position of one account in the simulated pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    /// Deposited wrapped-token units.
    pub collateral: U256,
    /// Borrowed stablecoin units.
    pub debt: U256,
}

/// The wrapped native token, a stablecoin, the addresses provider, an Aave v2 style lending pool
/// and a price feed quoting the stablecoin in native currency.
///
/// The pool's base currency is the native currency, so a wrapped-token unit is worth one base
/// unit. Feed answers are taken to carry the base currency's decimals. Percentages are applied
/// with half-up rounding.
#[derive(Debug, Clone)]
pub struct SimulatedContracts {
    pub network: NetworkDefinition,
    pub lending_pool: Address,
    pub ltv_bps: u16,
    pub liquidation_threshold_bps: u16,
    pub price: I256,
    pub price_decimals: u8,
    native_balances: HashMap<Address, U256>,
    weth: SimulatedToken,
    dai: SimulatedToken,
    positions: HashMap<Address, Position>,
}

impl SimulatedContracts {
    pub fn new(network: NetworkDefinition, lending_pool: Address) -> Self {
        Self {
            network,
            lending_pool,
            ltv_bps: 8000,
            liquidation_threshold_bps: 8250,
            price: I256::new(500_000_000_000_000),
            price_decimals: NATIVE_DECIMALS,
            native_balances: HashMap::new(),
            weth: SimulatedToken::new(NATIVE_DECIMALS),
            dai: SimulatedToken::new(18),
            positions: HashMap::new(),
        }
    }

    pub fn native_balance(&self, owner: Address) -> U256 {
        self.native_balances.get(&owner).copied().unwrap_or_default()
    }

    pub fn set_native_balance(&mut self, owner: Address, balance: U256) {
        self.native_balances.insert(owner, balance);
    }

    pub fn weth(&self) -> &SimulatedToken {
        &self.weth
    }

    pub fn dai(&self) -> &SimulatedToken {
        &self.dai
    }

    pub fn dai_mut(&mut self) -> &mut SimulatedToken {
        &mut self.dai
    }

    pub fn position(&self, user: Address) -> Position {
        self.positions.get(&user).copied().unwrap_or_default()
    }

    /// Executes a call or transaction, mutating state only if it succeeds.
    pub fn execute(
        &mut self,
        from: Address,
        to: Address,
        value: U256,
        data: &[u8],
    ) -> Result<Vec<u8>, Revert> {
        let mut next = self.clone();
        let output = next.apply(from, to, value, data)?;
        *self = next;
        Ok(output)
    }

    fn apply(
        &mut self,
        from: Address,
        to: Address,
        value: U256,
        data: &[u8],
    ) -> Result<Vec<u8>, Revert> {
        if value != U256::ZERO {
            if to != self.network.weth_token {
                return Err(Revert::new("non-payable function was called with value"));
            }
            let balance = self.native_balance(from);
            if balance < value {
                return Err(Revert::new("insufficient funds for transfer"));
            }
            self.native_balances.insert(from, balance - value);
        }

        if to == self.network.weth_token {
            if data == &selector(WETH_DEPOSIT)[..] {
                self.weth.mint(from, value)?;
                return Ok(vec![]);
            }
            self.weth.execute(from, data)
        } else if to == self.network.dai_token {
            self.dai.execute(from, data)
        } else if to == self.network.lending_pool_addresses_provider {
            let (selected, _) = WordDecoder::for_call(data)?;
            if selected != selector(GET_LENDING_POOL) {
                return Err(Revert::new("function selector was not recognized"));
            }
            Ok(encode_address(self.lending_pool).to_vec())
        } else if to == self.lending_pool {
            self.apply_pool(from, data)
        } else if to == self.network.dai_eth_price_feed {
            self.apply_price_feed(data)
        } else {
            Err(Revert::new("call to non-contract account"))
        }
    }

    fn apply_price_feed(&self, data: &[u8]) -> Result<Vec<u8>, Revert> {
        let (selected, _) = WordDecoder::for_call(data)?;
        if selected == selector(LATEST_ROUND_DATA) {
            Ok(encode_words(&[
                word(U256::ONE),
                self.price.to_be_bytes(),
                word(U256::ZERO),
                word(U256::ZERO),
                word(U256::ONE),
            ]))
        } else if selected == selector(DECIMALS) {
            Ok(word(U256::from(self.price_decimals)).to_vec())
        } else {
            Err(Revert::new("function selector was not recognized"))
        }
    }

    fn apply_pool(&mut self, from: Address, data: &[u8]) -> Result<Vec<u8>, Revert> {
        let (selected, mut args) = WordDecoder::for_call(data)?;
        if selected == selector(POOL_DEPOSIT) {
            let asset = args.address()?;
            let amount = args.uint()?;
            let on_behalf_of = args.address()?;
            self.deposit(from, asset, amount, on_behalf_of)?;
            Ok(vec![])
        } else if selected == selector(POOL_BORROW) {
            let asset = args.address()?;
            let amount = args.uint()?;
            let mode = args.uint()?;
            args.skip()?;
            let on_behalf_of = args.address()?;
            self.borrow(from, asset, amount, mode, on_behalf_of)?;
            Ok(vec![])
        } else if selected == selector(POOL_REPAY) {
            let asset = args.address()?;
            let amount = args.uint()?;
            let mode = args.uint()?;
            let on_behalf_of = args.address()?;
            let paid = self.repay(from, asset, amount, mode, on_behalf_of)?;
            Ok(word(paid).to_vec())
        } else if selected == selector(GET_USER_ACCOUNT_DATA) {
            let user = args.address()?;
            self.user_account_data(user).map(|words| encode_words(&words))
        } else {
            Err(Revert::new("function selector was not recognized"))
        }
    }

    fn deposit(
        &mut self,
        from: Address,
        asset: Address,
        amount: U256,
        on_behalf_of: Address,
    ) -> Result<(), Revert> {
        if asset != self.network.weth_token {
            return Err(Revert::new(REVERT_NO_ACTIVE_RESERVE));
        }
        if amount == U256::ZERO {
            return Err(Revert::new(REVERT_INVALID_AMOUNT));
        }
        let pool = self.lending_pool;
        self.weth.transfer_from(pool, from, pool, amount)?;

        let position = self.positions.entry(on_behalf_of).or_default();
        position.collateral = position.collateral.checked_add(amount).ok_or_else(overflow)?;
        Ok(())
    }

    fn borrow(
        &mut self,
        from: Address,
        asset: Address,
        amount: U256,
        mode: U256,
        on_behalf_of: Address,
    ) -> Result<(), Revert> {
        if asset != self.network.dai_token {
            return Err(Revert::new(REVERT_NO_ACTIVE_RESERVE));
        }
        if amount == U256::ZERO {
            return Err(Revert::new(REVERT_INVALID_AMOUNT));
        }
        if mode != U256::from(VARIABLE_RATE_MODE) {
            return Err(Revert::new(REVERT_INVALID_INTEREST_RATE_MODE));
        }
        let position = self.position(on_behalf_of);
        if position.collateral == U256::ZERO {
            return Err(Revert::new(REVERT_COLLATERAL_BALANCE_IS_0));
        }
        if self.to_base(amount)? > self.available_borrows(position)? {
            return Err(Revert::new(REVERT_COLLATERAL_CANNOT_COVER_NEW_BORROW));
        }

        let pool = self.lending_pool;
        self.dai.transfer(pool, from, amount)?;
        let position = self.positions.entry(on_behalf_of).or_default();
        position.debt = position.debt.checked_add(amount).ok_or_else(overflow)?;
        Ok(())
    }

    fn repay(
        &mut self,
        from: Address,
        asset: Address,
        amount: U256,
        mode: U256,
        on_behalf_of: Address,
    ) -> Result<U256, Revert> {
        if asset != self.network.dai_token {
            return Err(Revert::new(REVERT_NO_ACTIVE_RESERVE));
        }
        if amount == U256::ZERO {
            return Err(Revert::new(REVERT_INVALID_AMOUNT));
        }
        if mode != U256::from(VARIABLE_RATE_MODE) {
            return Err(Revert::new(REVERT_INVALID_INTEREST_RATE_MODE));
        }
        let debt = self.position(on_behalf_of).debt;
        if debt == U256::ZERO {
            return Err(Revert::new(REVERT_NO_DEBT_OF_SELECTED_TYPE));
        }

        let paid = amount.min(debt);
        let pool = self.lending_pool;
        self.dai.transfer_from(pool, from, pool, paid)?;
        let position = self.positions.entry(on_behalf_of).or_default();
        position.debt = debt - paid;
        Ok(paid)
    }

    fn price(&self) -> Result<U256, Revert> {
        if self.price <= I256::ZERO {
            return Err(Revert::new("invalid oracle price"));
        }
        Ok(U256::from_be_bytes(self.price.to_be_bytes()))
    }

    /// Values stablecoin units in base currency.
    fn to_base(&self, units: U256) -> Result<U256, Revert> {
        let one_token = ten_pow(self.dai.decimals as u32).ok_or_else(overflow)?;
        mul_div(units, self.price()?, one_token, RoundingMode::ToZero).ok_or_else(overflow)
    }

    /// The debt of a position in base currency. The oracle is only consulted for a non-zero debt.
    fn debt_in_base(&self, position: Position) -> Result<U256, Revert> {
        if position.debt == U256::ZERO {
            Ok(U256::ZERO)
        } else {
            self.to_base(position.debt)
        }
    }

    fn available_borrows(&self, position: Position) -> Result<U256, Revert> {
        let limit = mul_div(
            position.collateral,
            U256::from(self.ltv_bps),
            U256::new(BPS),
            RoundingMode::MidpointAwayFromZero,
        )
        .ok_or_else(overflow)?;
        Ok(limit.saturating_sub(self.debt_in_base(position)?))
    }

    fn user_account_data(&self, user: Address) -> Result<[[u8; WORD_LENGTH]; 6], Revert> {
        let position = self.position(user);
        let total_debt = self.debt_in_base(position)?;
        let (liquidation_threshold, ltv) = if position.collateral == U256::ZERO {
            (U256::ZERO, U256::ZERO)
        } else {
            (
                U256::from(self.liquidation_threshold_bps),
                U256::from(self.ltv_bps),
            )
        };
        let health_factor = if total_debt == U256::ZERO {
            U256::MAX
        } else {
            let threshold_value = mul_div(
                position.collateral,
                liquidation_threshold,
                U256::new(BPS),
                RoundingMode::MidpointAwayFromZero,
            )
            .ok_or_else(overflow)?;
            let one = ten_pow(NATIVE_DECIMALS as u32).ok_or_else(overflow)?;
            mul_div(threshold_value, one, total_debt, RoundingMode::ToZero).ok_or_else(overflow)?
        };

        Ok([
            word(position.collateral),
            word(total_debt),
            word(self.available_borrows(position)?),
            word(liquidation_threshold),
            word(ltv),
            word(health_factor),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER: Address = Address([0x11; 20]);

    fn contracts() -> SimulatedContracts {
        let mut contracts =
            SimulatedContracts::new(NetworkDefinition::localhost(), DEFAULT_LENDING_POOL);
        contracts.set_native_balance(USER, U256::new(1_000_000_000_000_000_000));
        contracts
    }

    fn call(name: &str) -> CallEncoder {
        CallEncoder::new(name)
    }

    #[test]
    fn test_wrap_and_deposit_collateral() {
        let mut contracts = contracts();
        let weth = contracts.network.weth_token;
        let amount = U256::new(20_000_000_000_000_000);

        contracts
            .execute(USER, weth, amount, &call(WETH_DEPOSIT).build())
            .unwrap();
        contracts
            .execute(
                USER,
                weth,
                U256::ZERO,
                &call(APPROVE).address(DEFAULT_LENDING_POOL).uint(amount).build(),
            )
            .unwrap();
        contracts
            .execute(
                USER,
                DEFAULT_LENDING_POOL,
                U256::ZERO,
                &call(POOL_DEPOSIT)
                    .address(weth)
                    .uint(amount)
                    .address(USER)
                    .uint16(0)
                    .build(),
            )
            .unwrap();

        assert_eq!(contracts.position(USER).collateral, amount);
        assert_eq!(contracts.weth().balance_of(USER), U256::ZERO);
        assert_eq!(contracts.weth().allowance(USER, DEFAULT_LENDING_POOL), U256::ZERO);
        assert_eq!(
            contracts.native_balance(USER),
            U256::new(980_000_000_000_000_000)
        );
    }

    #[test]
    fn test_deposit_without_approval_reverts_and_keeps_state() {
        let mut contracts = contracts();
        let weth = contracts.network.weth_token;
        let amount = U256::new(1_000);
        contracts
            .execute(USER, weth, amount, &call(WETH_DEPOSIT).build())
            .unwrap();

        let result = contracts.execute(
            USER,
            DEFAULT_LENDING_POOL,
            U256::ZERO,
            &call(POOL_DEPOSIT)
                .address(weth)
                .uint(amount)
                .address(USER)
                .uint16(0)
                .build(),
        );

        assert_eq!(
            result,
            Err(Revert::new("ERC20: transfer amount exceeds allowance"))
        );
        assert_eq!(contracts.position(USER), Position::default());
        assert_eq!(contracts.weth().balance_of(USER), amount);
    }

    #[test]
    fn test_borrow_without_collateral_reverts() {
        let mut contracts = contracts();
        let dai = contracts.network.dai_token;

        let result = contracts.execute(
            USER,
            DEFAULT_LENDING_POOL,
            U256::ZERO,
            &call(POOL_BORROW)
                .address(dai)
                .uint(U256::ONE)
                .uint(U256::new(2))
                .uint16(0)
                .address(USER)
                .build(),
        );

        assert_eq!(result, Err(Revert::new(REVERT_COLLATERAL_BALANCE_IS_0)));
    }

    #[test]
    fn test_account_data_without_debt_ignores_the_oracle() {
        let mut contracts = contracts();
        contracts.price = I256::ZERO;
        let weth = contracts.network.weth_token;
        let amount = U256::new(20_000_000_000_000_000);
        contracts
            .execute(USER, weth, amount, &call(WETH_DEPOSIT).build())
            .unwrap();
        contracts
            .execute(
                USER,
                weth,
                U256::ZERO,
                &call(APPROVE).address(DEFAULT_LENDING_POOL).uint(amount).build(),
            )
            .unwrap();
        contracts
            .execute(
                USER,
                DEFAULT_LENDING_POOL,
                U256::ZERO,
                &call(POOL_DEPOSIT)
                    .address(weth)
                    .uint(amount)
                    .address(USER)
                    .uint16(0)
                    .build(),
            )
            .unwrap();

        let output = contracts
            .execute(
                USER,
                DEFAULT_LENDING_POOL,
                U256::ZERO,
                &call(GET_USER_ACCOUNT_DATA).address(USER).build(),
            )
            .unwrap();
        let mut decoder = WordDecoder::new(&output);

        assert_eq!(decoder.uint().unwrap(), amount);
        assert_eq!(decoder.uint().unwrap(), U256::ZERO);
        assert_eq!(decoder.uint().unwrap(), U256::new(16_000_000_000_000_000));
    }

    #[test]
    fn test_price_feed_round_data() {
        let mut contracts = contracts();
        let feed = contracts.network.dai_eth_price_feed;

        let output = contracts
            .execute(USER, feed, U256::ZERO, &call(LATEST_ROUND_DATA).build())
            .unwrap();
        let mut decoder = WordDecoder::new(&output);
        decoder.skip().unwrap();

        assert_eq!(decoder.int().unwrap(), I256::new(500_000_000_000_000));
        assert_eq!(decoder.remaining(), 3 * WORD_LENGTH);
    }
}
