use crate::error::{CryptoflipError, Result};
use crate::types::TxRecord;
use async_trait::async_trait;

/// Read-only source of recent inbound transactions for the deposit address.
///
/// Injected into the top-up watcher so tests can feed it canned data.
#[async_trait]
pub trait TransactionFeed: Send + Sync {
    async fn recent_transactions(&self, limit: usize) -> Result<Vec<TxRecord>>;
}

/// HTTP client for a hosted explorer's `getTransactions` endpoint.
pub struct ExplorerClient {
    http: reqwest::Client,
    base_url: String,
    address: String,
}

impl ExplorerClient {
    pub fn new(base_url: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            address: address.into(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    fn decode(envelope: TxEnvelope) -> Result<Vec<TxRecord>> {
        if !envelope.ok {
            return Err(CryptoflipError::explorer("Explorer returned ok=false"));
        }

        let mut records = Vec::with_capacity(envelope.result.len());
        for raw in envelope.result {
            // Transactions without an inbound message carry no memo to match.
            let Some(in_msg) = raw.in_msg else {
                continue;
            };

            let lt = raw.transaction_id.lt.parse::<u64>().map_err(|e| {
                CryptoflipError::explorer(format!("Bad transaction sequence: {}", e))
            })?;
            let value = in_msg.value.parse::<u64>().map_err(|e| {
                CryptoflipError::explorer(format!("Bad transaction value: {}", e))
            })?;

            records.push(TxRecord {
                lt,
                value,
                message: in_msg.message,
            });
        }

        Ok(records)
    }
}

#[async_trait]
impl TransactionFeed for ExplorerClient {
    async fn recent_transactions(&self, limit: usize) -> Result<Vec<TxRecord>> {
        let url = format!("{}/getTransactions", self.base_url);
        let limit = limit.to_string();

        let envelope: TxEnvelope = self
            .http
            .get(&url)
            .query(&[
                ("address", self.address.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Self::decode(envelope)
    }
}

#[derive(Debug, serde::Deserialize)]
struct TxEnvelope {
    ok: bool,
    #[serde(default)]
    result: Vec<RawTx>,
}

#[derive(Debug, serde::Deserialize)]
struct RawTx {
    transaction_id: RawTxId,
    in_msg: Option<RawMessage>,
}

#[derive(Debug, serde::Deserialize)]
struct RawTxId {
    lt: String,
}

#[derive(Debug, serde::Deserialize)]
struct RawMessage {
    #[serde(default)]
    value: String,
    #[serde(default)]
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_explorer_envelope() {
        let raw = r#"{
            "ok": true,
            "result": [
                {
                    "transaction_id": { "lt": "47597573000001", "hash": "aGFzaA==" },
                    "in_msg": { "value": "1500000000", "message": "flip-42" }
                },
                {
                    "transaction_id": { "lt": "47597572000001" },
                    "in_msg": { "value": "0", "message": "" }
                },
                {
                    "transaction_id": { "lt": "47597571000001" }
                }
            ]
        }"#;

        let envelope: TxEnvelope = serde_json::from_str(raw).unwrap();
        let records = ExplorerClient::decode(envelope).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].lt, 47_597_573_000_001);
        assert_eq!(records[0].value, 1_500_000_000);
        assert_eq!(records[0].message, "flip-42");
        assert_eq!(records[1].message, "");
    }

    #[test]
    fn rejects_error_envelope() {
        let envelope: TxEnvelope = serde_json::from_str(r#"{ "ok": false }"#).unwrap();
        assert!(ExplorerClient::decode(envelope).is_err());
    }

    #[test]
    fn rejects_corrupt_sequence() {
        let raw = r#"{
            "ok": true,
            "result": [
                {
                    "transaction_id": { "lt": "not-a-number" },
                    "in_msg": { "value": "1", "message": "x" }
                }
            ]
        }"#;

        let envelope: TxEnvelope = serde_json::from_str(raw).unwrap();
        assert!(ExplorerClient::decode(envelope).is_err());
    }
}
