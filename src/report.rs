use crate::{
    balances,
    config::Config,
    models::{Quote, TokenRecord},
    quote::{self, QuoteClient},
    rpc::Ledger,
    units::format_units,
};
use alloy::primitives::U256;
use eyre::{Result, WrapErr};
use tracing::{info, warn};

#[derive(Debug)]
pub struct Report {
    pub records: Vec<TokenRecord>,
    pub quotes: Vec<Quote>,
}

impl Report {
    /// Sum of all quotes, when they all landed in the same destination token.
    pub fn total(&self) -> Option<(U256, String, u8)> {
        let first = self.quotes.first()?.to_token.as_ref()?;
        let mut total = U256::ZERO;
        for quote in &self.quotes {
            match &quote.to_token {
                Some(to) if to == first => total = total.checked_add(quote.amount)?,
                _ => return None,
            }
        }
        Some((total, first.symbol.clone(), first.decimals))
    }
}

/// Read every balance, then quote every balance. Any failure ends the run.
pub async fn run<L: Ledger>(cfg: &Config, ledger: &L, quote_client: &QuoteClient) -> Result<Report> {
    let records = balances::read_balances(ledger, cfg.wallet, &cfg.tokens)
        .await
        .wrap_err("failed to read token balances")?;

    let quotes = quote::fetch_quotes(quote_client, &records, cfg.quote_token)
        .await
        .wrap_err("failed to fetch quotes")?;

    let report = Report { records, quotes };
    match report.total() {
        Some((total, symbol, decimals)) => println!(
            "Total estimated value: {} {}.",
            format_units(&total.to_string(), decimals as usize),
            symbol
        ),
        None if !report.quotes.is_empty() => {
            warn!("Quotes do not share a destination token, skipping total")
        }
        None => {}
    }

    info!("Done: {} balances, {} quotes", report.records.len(), report.quotes.len());
    Ok(report)
}
