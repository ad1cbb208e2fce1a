// src/rpc.rs
use crate::error::{ConnectionError, LedgerError};
use alloy::{
    contract::{ContractInstance, Interface},
    dyn_abi::DynSolValue,
    json_abi::JsonAbi,
    primitives::Address,
    providers::{DynProvider, Provider, ProviderBuilder},
};
use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, info};

/// Read-only view of the chain the balances live on.
#[async_trait]
pub trait Ledger {
    async fn chain_id(&self) -> Result<u64, LedgerError>;

    async fn block_number(&self) -> Result<u64, LedgerError>;

    /// `eth_call` a method declared in the contract schema.
    async fn call(
        &self,
        contract: Address,
        method: &str,
        args: &[DynSolValue],
    ) -> Result<Vec<DynSolValue>, LedgerError>;
}

/// Ledger backed by an alloy HTTP provider.
pub struct AlloyLedger {
    provider: DynProvider,
    interface: Interface,
}

impl AlloyLedger {
    /// Connect to `endpoint` and make sure the node answers and serves `expected_chain_id`.
    pub async fn connect(
        endpoint: &str,
        schema: JsonAbi,
        expected_chain_id: u64,
    ) -> Result<Self, ConnectionError> {
        let url = endpoint
            .parse::<Url>()
            .map_err(|e| ConnectionError::InvalidEndpoint(e.to_string()))?;

        let provider = ProviderBuilder::new().connect_http(url).erased();
        let ledger = Self {
            provider,
            interface: Interface::new(schema),
        };

        let block = ledger.block_number().await.map_err(ConnectionError::Unreachable)?;
        info!("RPC connected, latest block number is {}", block);

        let chain_id = ledger.chain_id().await.map_err(ConnectionError::Unreachable)?;
        if chain_id != expected_chain_id {
            return Err(ConnectionError::WrongChain {
                expected: expected_chain_id,
                actual: chain_id,
            });
        }

        Ok(ledger)
    }
}

#[async_trait]
impl Ledger for AlloyLedger {
    async fn chain_id(&self) -> Result<u64, LedgerError> {
        Ok(self.provider.get_chain_id().await?)
    }

    async fn block_number(&self) -> Result<u64, LedgerError> {
        Ok(self.provider.get_block_number().await?)
    }

    async fn call(
        &self,
        contract: Address,
        method: &str,
        args: &[DynSolValue],
    ) -> Result<Vec<DynSolValue>, LedgerError> {
        debug!("eth_call {}.{}()", contract, method);

        let instance = ContractInstance::new(contract, self.provider.clone(), self.interface.clone());
        let output = instance.function(method, args)?.call().await?;
        Ok(output)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::ERC20_ABI;
    use alloy::primitives::{address, U256};
    use serde_json::{json, Value};
    use wiremock::{matchers::method, Mock, MockServer, Request, ResponseTemplate};

    const PEAR: Address = address!("c8bcb58caEf1bE972C0B638B1dD8B0748Fdc8A44");
    const WALLET: Address = address!("008062acA356B5F93F2F14b71Fd73db91A606d0C");

    /// Minimal JSON-RPC node: fixed block, given chain id, every eth_call returns 2.5e18.
    fn node(chain_id: u64) -> impl Fn(&Request) -> ResponseTemplate + Send + Sync + 'static {
        move |req: &Request| {
            let body: Value = serde_json::from_slice(&req.body).unwrap();
            let id = body["id"].clone();
            let result = match body["method"].as_str() {
                Some("eth_blockNumber") => json!("0x3039"),
                Some("eth_chainId") => json!(format!("0x{chain_id:x}")),
                Some("eth_call") => json!(format!("0x{:064x}", 2_500_000_000_000_000_000u128)),
                _ => {
                    return ResponseTemplate::new(200).set_body_json(json!({
                        "jsonrpc": "2.0",
                        "id": id,
                        "error": {"code": -32601, "message": "method not found"}
                    }))
                }
            };
            ResponseTemplate::new(200).set_body_json(json!({"jsonrpc": "2.0", "id": id, "result": result}))
        }
    }

    async fn ledger_for(server: &MockServer, chain_id: u64) -> Result<AlloyLedger, ConnectionError> {
        Mock::given(method("POST"))
            .respond_with(node(chain_id))
            .mount(server)
            .await;
        let schema: JsonAbi = serde_json::from_str(ERC20_ABI).unwrap();
        AlloyLedger::connect(&server.uri(), schema, 137).await
    }

    #[tokio::test]
    async fn connects_and_decodes_calls_through_the_schema() {
        let server = MockServer::start().await;
        let ledger = ledger_for(&server, 137).await.unwrap();

        assert_eq!(ledger.block_number().await.unwrap(), 12345);

        let output = ledger
            .call(PEAR, "balanceOf", &[DynSolValue::Address(WALLET)])
            .await
            .unwrap();
        assert_eq!(
            output,
            vec![DynSolValue::Uint(U256::from(2_500_000_000_000_000_000u128), 256)]
        );
    }

    #[tokio::test]
    async fn method_missing_from_schema_is_a_call_error() {
        let server = MockServer::start().await;
        let ledger = ledger_for(&server, 137).await.unwrap();

        let err = ledger.call(PEAR, "transfer", &[]).await.unwrap_err();
        assert!(matches!(err, LedgerError::Contract(_)));
    }

    #[tokio::test]
    async fn wrong_chain_is_rejected() {
        let server = MockServer::start().await;
        let err = ledger_for(&server, 1).await.err().unwrap();

        assert!(matches!(err, ConnectionError::WrongChain { expected: 137, actual: 1 }));
    }

    #[tokio::test]
    async fn unreachable_node_is_a_connection_error() {
        let schema: JsonAbi = serde_json::from_str(ERC20_ABI).unwrap();

        let err = AlloyLedger::connect("http://127.0.0.1:1", schema.clone(), 137)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ConnectionError::Unreachable(_)));

        let err = AlloyLedger::connect("not a url", schema, 137).await.err().unwrap();
        match err {
            ConnectionError::InvalidEndpoint(reason) => {
                assert!(reason.contains("relative URL without a base"), "{reason}")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
