// src/models.rs
use crate::units::{format_units, pad_to_width};
use alloy::primitives::{Address, U256};

/// On-chain state of one token for the tracked wallet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
    pub balance: U256, // smallest units
}

impl TokenRecord {
    pub fn human_balance(&self) -> String {
        format_units(&self.balance.to_string(), self.decimals as usize)
    }

    /// Amount string sent to the quote API.
    pub fn quote_amount(&self) -> String {
        pad_to_width(&self.balance.to_string(), self.decimals as usize)
    }
}

/// Destination token as described by the quote API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteToken {
    pub symbol: String,
    pub decimals: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub token: Address,
    pub symbol: String,
    pub amount: U256,               // destination smallest units
    pub raw_amount: String,         // `toTokenAmount` exactly as the API sent it
    pub to_token: Option<QuoteToken>,
}

impl Quote {
    /// `The USDT value of PEAR is 1500000 (1.500000 USDT).`
    pub fn report_line(&self) -> String {
        match &self.to_token {
            Some(to) => format!(
                "The {} value of {} is {} ({} {}).",
                to.symbol,
                self.symbol,
                self.raw_amount,
                self.display_amount(),
                to.symbol
            ),
            None => format!("The quote token value of {} is {}.", self.symbol, self.raw_amount),
        }
    }

    pub fn display_amount(&self) -> String {
        match &self.to_token {
            Some(to) => format_units(&self.amount.to_string(), to.decimals as usize),
            None => self.amount.to_string(),
        }
    }
}
