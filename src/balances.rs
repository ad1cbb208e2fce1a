// src/balances.rs
use crate::{error::CallError, models::TokenRecord, rpc::Ledger};
use alloy::{dyn_abi::DynSolValue, primitives::Address};
use tracing::{debug, info};

/// Read symbol, decimals and the wallet balance of every token, in order.
///
/// The first failing call aborts the whole read.
pub async fn read_balances<L: Ledger>(
    ledger: &L,
    wallet: Address,
    tokens: &[Address],
) -> Result<Vec<TokenRecord>, CallError> {
    info!("Reading token balances for {} tokens...", tokens.len());

    let mut records = Vec::with_capacity(tokens.len());
    for &token in tokens {
        let record = read_token(ledger, wallet, token).await?;
        println!(
            "The balance of {} at address {} is {}.",
            record.symbol,
            wallet,
            record.human_balance()
        );
        records.push(record);
    }

    Ok(records)
}

async fn read_token<L: Ledger>(
    ledger: &L,
    wallet: Address,
    token: Address,
) -> Result<TokenRecord, CallError> {
    let value = call_one(ledger, token, "symbol", &[]).await?;
    let symbol = value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| unexpected(token, "symbol", "a string", &value))?;

    let value = call_one(ledger, token, "decimals", &[]).await?;
    let decimals = value
        .as_uint()
        .and_then(|(v, _)| u8::try_from(v).ok())
        .ok_or_else(|| unexpected(token, "decimals", "an integer in 0..=255", &value))?;

    let value = call_one(ledger, token, "balanceOf", &[DynSolValue::Address(wallet)]).await?;
    let (balance, _) = value
        .as_uint()
        .ok_or_else(|| unexpected(token, "balanceOf", "an unsigned integer", &value))?;

    debug!("{} ({}): decimals={} balance={}", symbol, token, decimals, balance);

    Ok(TokenRecord {
        address: token,
        symbol,
        decimals,
        balance,
    })
}

async fn call_one<L: Ledger>(
    ledger: &L,
    token: Address,
    method: &'static str,
    args: &[DynSolValue],
) -> Result<DynSolValue, CallError> {
    let mut output = ledger
        .call(token, method, args)
        .await
        .map_err(|source| CallError::Failed {
            token,
            method,
            source,
        })?;

    if output.len() != 1 {
        return Err(CallError::UnexpectedOutput {
            token,
            method,
            expected: "a single return value",
            found: format!("{} values", output.len()),
        });
    }
    Ok(output.remove(0))
}

fn unexpected(token: Address, method: &'static str, expected: &'static str, found: &DynSolValue) -> CallError {
    CallError::UnexpectedOutput {
        token,
        method,
        expected,
        found: format!("{found:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::mock::MockLedger;
    use alloy::primitives::{address, U256};
    use pretty_assertions::assert_eq;

    const WALLET: Address = address!("008062acA356B5F93F2F14b71Fd73db91A606d0C");
    const PEAR: Address = address!("c8bcb58caEf1bE972C0B638B1dD8B0748Fdc8A44");
    const KOGE: Address = address!("13748d548D95D78a3c83fe3F32604B4796CFfa23");

    #[tokio::test]
    async fn reads_symbol_decimals_and_balance() {
        let ledger = MockLedger::default().erc20(PEAR, "PEAR", 18, 2_500_000_000_000_000_000);

        let records = read_balances(&ledger, WALLET, &[PEAR]).await.unwrap();

        assert_eq!(
            records,
            vec![TokenRecord {
                address: PEAR,
                symbol: "PEAR".into(),
                decimals: 18,
                balance: U256::from(2_500_000_000_000_000_000u128),
            }]
        );
        assert_eq!(records[0].human_balance(), "2.500000000000000000");

        let calls = ledger.calls();
        let methods: Vec<&str> = calls.iter().map(|(_, m, _)| m.as_str()).collect();
        assert_eq!(methods, vec!["symbol", "decimals", "balanceOf"]);
        assert_eq!(calls[2].2, vec![DynSolValue::Address(WALLET)]);
    }

    #[tokio::test]
    async fn keeps_configured_order() {
        let ledger = MockLedger::default()
            .erc20(PEAR, "PEAR", 18, 1)
            .erc20(KOGE, "KOGE", 9, 0);

        let records = read_balances(&ledger, WALLET, &[KOGE, PEAR]).await.unwrap();

        let symbols: Vec<&str> = records.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["KOGE", "PEAR"]);
        assert_eq!(records[0].human_balance(), "0.000000000");
    }

    #[tokio::test]
    async fn call_failure_aborts_the_run() {
        // KOGE has no canned responses, so its first call fails
        let ledger = MockLedger::default().erc20(PEAR, "PEAR", 18, 1);

        let err = read_balances(&ledger, WALLET, &[KOGE, PEAR]).await.unwrap_err();

        assert!(matches!(
            err,
            CallError::Failed { token, method: "symbol", .. } if token == KOGE
        ));
        // nothing was asked of PEAR
        assert_eq!(ledger.calls().len(), 1);
    }

    #[tokio::test]
    async fn schema_mismatch_is_reported() {
        let ledger = MockLedger::default()
            .erc20(PEAR, "PEAR", 18, 1)
            .with(PEAR, "decimals", DynSolValue::String("eighteen".into()));

        let err = read_balances(&ledger, WALLET, &[PEAR]).await.unwrap_err();

        assert!(matches!(err, CallError::UnexpectedOutput { method: "decimals", .. }));
    }

    #[tokio::test]
    async fn oversized_decimals_are_rejected() {
        let ledger = MockLedger::default()
            .erc20(PEAR, "PEAR", 18, 1)
            .with(PEAR, "decimals", DynSolValue::Uint(U256::from(300u64), 256));

        let err = read_balances(&ledger, WALLET, &[PEAR]).await.unwrap_err();

        assert!(matches!(err, CallError::UnexpectedOutput { method: "decimals", .. }));
    }
}
