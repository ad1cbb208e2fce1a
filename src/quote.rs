// src/quote.rs
use crate::{
    config::Config,
    error::QuoteError,
    models::{Quote, QuoteToken, TokenRecord},
};
use alloy::primitives::{Address, U256};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteResponse {
    to_token_amount: Option<String>,
    to_token: Option<ToToken>,
}

#[derive(Debug, Deserialize)]
struct ToToken {
    symbol: String,
    decimals: u8,
}

/// Error body returned with non-2xx statuses
#[derive(Debug, Deserialize)]
struct ApiError {
    error: Option<String>,
    description: Option<String>,
}

/// Client for the aggregator's `/quote` endpoint.
#[derive(Debug, Clone)]
pub struct QuoteClient {
    http: Client,
    base_url: String,
    chain_id: u64,
    api_key: Option<String>,
}

impl QuoteClient {
    pub fn new(cfg: &Config) -> Result<Self, QuoteError> {
        let http = Client::builder()
            .timeout(cfg.http_timeout)
            .build()
            .map_err(QuoteError::Client)?;

        Ok(Self {
            http,
            base_url: cfg.quote_api_url.trim_end_matches('/').to_string(),
            chain_id: cfg.chain_id,
            api_key: cfg.quote_api_key.clone(),
        })
    }

    fn quote_url(&self) -> String {
        format!("{}/v4.0/{}/quote", self.base_url, self.chain_id)
    }

    /// Quote swapping `amount` (smallest units of `from`) into `to`.
    pub async fn quote(
        &self,
        from: Address,
        to: Address,
        amount: &str,
    ) -> Result<(String, U256, Option<QuoteToken>), QuoteError> {
        let url = self.quote_url();
        info!("📡 Requesting quote {} → {} (amount {})", from, to, amount);

        let mut request = self.http.get(&url).query(&[
            ("fromTokenAddress", from.to_string()),
            ("toTokenAddress", to.to_string()),
            ("amount", amount.to_string()),
        ]);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let http_err = |source| QuoteError::Http { token: from, source };
        let resp = request.send().await.map_err(http_err)?;
        let status = resp.status();
        let text = resp.text().await.map_err(http_err)?;
        debug!("📩 Raw quote response ({}): {}", status, text);

        if !status.is_success() {
            return Err(QuoteError::Status {
                token: from,
                status,
                message: error_message(&text),
            });
        }

        let parsed: QuoteResponse =
            serde_json::from_str(&text).map_err(|source| QuoteError::Decode { token: from, source })?;

        let raw = parsed.to_token_amount.ok_or(QuoteError::MissingField {
            token: from,
            field: "toTokenAmount",
        })?;
        let amount = parse_amount(&raw).ok_or_else(|| QuoteError::InvalidAmount {
            token: from,
            value: raw.clone(),
        })?;

        let to_token = parsed.to_token.map(|t| QuoteToken {
            symbol: t.symbol,
            decimals: t.decimals,
        });
        Ok((raw, amount, to_token))
    }
}

/// Plain decimal digits only; no sign, separators or prefix.
fn parse_amount(raw: &str) -> Option<U256> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    U256::from_str_radix(raw, 10).ok()
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiError>(body) {
        Ok(ApiError {
            description: Some(description),
            ..
        }) => description,
        Ok(ApiError { error: Some(error), .. }) => error,
        _ => body.chars().take(200).collect(),
    }
}

/// Quote every record into `quote_token`, stopping at the first failure.
pub async fn fetch_quotes(
    client: &QuoteClient,
    records: &[TokenRecord],
    quote_token: Address,
) -> Result<Vec<Quote>, QuoteError> {
    info!("Getting quotes for {} tokens...", records.len());

    let mut quotes = Vec::with_capacity(records.len());
    for record in records {
        let (raw_amount, amount, to_token) = client
            .quote(record.address, quote_token, &record.quote_amount())
            .await?;

        let quote = Quote {
            token: record.address,
            symbol: record.symbol.clone(),
            amount,
            raw_amount,
            to_token,
        };
        debug!("{} ({}) quoted at {} smallest units", quote.symbol, quote.token, quote.amount);

        println!("{}", quote.report_line());
        quotes.push(quote);
    }

    Ok(quotes)
}
