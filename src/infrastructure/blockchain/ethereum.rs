//! # Ethereum Gateway
//!
//! [`RpcGateway`] implementation backed by an ethers-rs HTTP provider.

use super::client::{
    BlockTag, BlockchainError, BlockchainResult, CallRequest, ReceiptLog, RpcGateway, TxHash,
    TxReceipt,
};
use async_trait::async_trait;
use ethers::providers::{Http, Middleware, Provider, ProviderError, RpcError};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, Bytes, TransactionReceipt, TransactionRequest, U256};
use std::sync::Arc;
use std::time::Duration;

/// HTTP provider type alias.
pub type HttpProvider = Provider<Http>;

/// JSON-RPC gateway talking to a node over HTTP.
#[derive(Debug, Clone)]
pub struct EthereumGateway {
    /// The ethers provider.
    provider: Arc<HttpProvider>,
    /// RPC URL for reference.
    rpc_url: String,
}

impl EthereumGateway {
    /// Creates a new gateway for the given node URL.
    ///
    /// # Errors
    ///
    /// Returns `BlockchainError::Connection` if the URL cannot be parsed.
    pub fn new(rpc_url: impl Into<String>) -> BlockchainResult<Self> {
        let rpc_url = rpc_url.into();
        let provider = Provider::<Http>::try_from(rpc_url.as_str())
            .map_err(|e| BlockchainError::connection(format!("Failed to create provider: {e}")))?
            .interval(Duration::from_millis(100));

        Ok(Self {
            provider: Arc::new(provider),
            rpc_url,
        })
    }

    /// Returns the RPC URL.
    #[inline]
    #[must_use]
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Returns the underlying provider.
    #[inline]
    #[must_use]
    pub fn provider(&self) -> Arc<HttpProvider> {
        Arc::clone(&self.provider)
    }
}

/// Maps a provider error, keeping the node's reason for JSON-RPC errors.
fn map_provider_error(error: ProviderError) -> BlockchainError {
    if let Some(response) = error.as_error_response() {
        return BlockchainError::rpc(response.code, response.message.clone());
    }
    match error {
        ProviderError::SerdeJson(e) => BlockchainError::invalid_response(e.to_string()),
        other => BlockchainError::connection(other.to_string()),
    }
}

fn map_receipt(receipt: TransactionReceipt) -> TxReceipt {
    TxReceipt {
        tx_hash: TxHash::from(receipt.transaction_hash),
        block_number: receipt.block_number.map(|n| n.as_u64()),
        gas_used: receipt.gas_used,
        success: receipt.status.map(|s| s.as_u64() == 1).unwrap_or(false),
        logs: receipt
            .logs
            .into_iter()
            .map(|log| ReceiptLog {
                address: log.address,
                topics: log.topics,
                data: log.data,
            })
            .collect(),
    }
}

#[async_trait]
impl RpcGateway for EthereumGateway {
    async fn balance_of(&self, address: Address, block: BlockTag) -> BlockchainResult<U256> {
        self.provider
            .get_balance(address, Some(block.into()))
            .await
            .map_err(map_provider_error)
    }

    async fn transaction_count(&self, address: Address, block: BlockTag) -> BlockchainResult<u64> {
        let count = self
            .provider
            .get_transaction_count(address, Some(block.into()))
            .await
            .map_err(map_provider_error)?;

        if count > U256::from(u64::MAX) {
            return Err(BlockchainError::invalid_response(format!(
                "transaction count out of range: {count}"
            )));
        }
        Ok(count.as_u64())
    }

    async fn call(&self, request: &CallRequest, block: BlockTag) -> BlockchainResult<Bytes> {
        let tx: TypedTransaction = TransactionRequest::new()
            .from(request.from)
            .to(request.to)
            .data(request.data.clone())
            .into();

        self.provider
            .call(&tx, Some(block.into()))
            .await
            .map_err(map_provider_error)
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> BlockchainResult<TxHash> {
        let pending = self
            .provider
            .send_raw_transaction(raw)
            .await
            .map_err(map_provider_error)?;

        Ok(TxHash::from(pending.tx_hash()))
    }

    async fn transaction_receipt(&self, hash: &TxHash) -> BlockchainResult<Option<TxReceipt>> {
        let hash = hash.to_h256()?;

        self.provider
            .get_transaction_receipt(hash)
            .await
            .map(|receipt| receipt.map(map_receipt))
            .map_err(map_provider_error)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ethers::types::H256;
    use serde_json::{Value, json};
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

    /// Answers a JSON-RPC request, echoing its id.
    struct JsonRpc(Value);

    impl Respond for JsonRpc {
        fn respond(&self, request: &Request) -> ResponseTemplate {
            let id = serde_json::from_slice::<Value>(&request.body)
                .ok()
                .and_then(|body| body.get("id").cloned())
                .unwrap_or(json!(1));
            let mut body = json!({ "jsonrpc": "2.0", "id": id });
            if let (Some(map), Some(payload)) = (body.as_object_mut(), self.0.as_object()) {
                map.extend(payload.clone());
            }
            ResponseTemplate::new(200).set_body_json(body)
        }
    }

    async fn mount(server: &MockServer, rpc_method: &str, payload: Value) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "method": rpc_method })))
            .respond_with(JsonRpc(payload))
            .mount(server)
            .await;
    }

    #[test]
    fn new_gateway_keeps_url() {
        let gateway = EthereumGateway::new("http://localhost:8545").unwrap();
        assert_eq!(gateway.rpc_url(), "http://localhost:8545");
    }

    #[test]
    fn new_gateway_rejects_bad_url() {
        let result = EthereumGateway::new("not a url");
        assert!(matches!(result, Err(BlockchainError::Connection(_))));
    }

    #[tokio::test]
    async fn balance_of_decodes_quantity() {
        let server = MockServer::start().await;
        mount(&server, "eth_getBalance", json!({ "result": "0x64" })).await;

        let gateway = EthereumGateway::new(server.uri()).unwrap();
        let balance = gateway
            .balance_of(Address::zero(), BlockTag::Latest)
            .await
            .unwrap();
        assert_eq!(balance, U256::from(100));
    }

    #[tokio::test]
    async fn transaction_count_decodes_quantity() {
        let server = MockServer::start().await;
        mount(&server, "eth_getTransactionCount", json!({ "result": "0x7" })).await;

        let gateway = EthereumGateway::new(server.uri()).unwrap();
        let nonce = gateway
            .transaction_count(Address::zero(), BlockTag::Pending)
            .await
            .unwrap();
        assert_eq!(nonce, 7);
    }

    #[tokio::test]
    async fn call_returns_raw_bytes() {
        let server = MockServer::start().await;
        let to: Address = "0x00000000000000000000000000000000000000aa".parse().unwrap();
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "method": "eth_call",
                "params": [
                    {
                        "from": "0x0000000000000000000000000000000000000000",
                        "to": "0x00000000000000000000000000000000000000aa",
                        "data": "0x18"
                    },
                    "0xa"
                ]
            })))
            .respond_with(JsonRpc(json!({ "result": "0x00ff" })))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = EthereumGateway::new(server.uri()).unwrap();
        let request = CallRequest::from_zero_address(to, Bytes::from(vec![0x18]));
        let data = gateway.call(&request, BlockTag::Number(10)).await.unwrap();
        assert_eq!(data.to_vec(), vec![0x00, 0xff]);
    }

    #[tokio::test]
    async fn send_raw_transaction_keeps_node_reason() {
        let server = MockServer::start().await;
        mount(
            &server,
            "eth_sendRawTransaction",
            json!({ "error": { "code": -32000, "message": "nonce too low" } }),
        )
        .await;

        let gateway = EthereumGateway::new(server.uri()).unwrap();
        let err = gateway
            .send_raw_transaction(Bytes::from(vec![0xf8]))
            .await
            .unwrap_err();

        assert_eq!(err.node_reason(), Some("nonce too low"));
    }

    #[tokio::test]
    async fn send_raw_transaction_returns_hash() {
        let server = MockServer::start().await;
        let hash = format!("{:#x}", H256::repeat_byte(0x11));
        mount(&server, "eth_sendRawTransaction", json!({ "result": hash })).await;

        let gateway = EthereumGateway::new(server.uri()).unwrap();
        let tx_hash = gateway
            .send_raw_transaction(Bytes::from(vec![0xf8]))
            .await
            .unwrap();
        assert_eq!(tx_hash.as_str(), hash);
    }

    #[tokio::test]
    async fn missing_receipt_is_none() {
        let server = MockServer::start().await;
        mount(&server, "eth_getTransactionReceipt", json!({ "result": null })).await;

        let gateway = EthereumGateway::new(server.uri()).unwrap();
        let receipt = gateway
            .transaction_receipt(&TxHash::from(H256::zero()))
            .await
            .unwrap();
        assert!(receipt.is_none());
    }

    #[tokio::test]
    async fn unreachable_node_is_connection_error() {
        let gateway = EthereumGateway::new("http://127.0.0.1:1").unwrap();
        let err = gateway
            .balance_of(Address::zero(), BlockTag::Latest)
            .await
            .unwrap_err();
        assert!(matches!(err, BlockchainError::Connection(_)));
    }
}
