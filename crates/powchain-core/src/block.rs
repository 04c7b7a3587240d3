use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

/// Ordered list of opaque text items carried by a block (the "transactions").
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Vec<String>);

impl Payload {
    pub fn new(items: Vec<String>) -> Self {
        Self(items)
    }

    pub fn items(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Canonical bytes fed into the block hash: a compact JSON array of strings.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        serde_json::Value::from(self.0.as_slice())
            .to_string()
            .into_bytes()
    }
}

impl From<&str> for Payload {
    fn from(item: &str) -> Self {
        Self(vec![item.to_string()])
    }
}

impl From<String> for Payload {
    fn from(item: String) -> Self {
        Self(vec![item])
    }
}

impl From<Vec<String>> for Payload {
    fn from(items: Vec<String>) -> Self {
        Self(items)
    }
}

impl From<Vec<&str>> for Payload {
    fn from(items: Vec<&str>) -> Self {
        items.into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for Payload {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Hashed fields of a block other than the payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockHeader {
    pub index: u64,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub previous_hash: String,
    pub nonce: u64,
}

impl BlockHeader {
    pub fn new(index: u64, previous_hash: String) -> Self {
        Self::with_timestamp(index, previous_hash, now_millis())
    }

    pub fn with_timestamp(index: u64, previous_hash: String, timestamp: u64) -> Self {
        Self {
            index,
            timestamp,
            previous_hash,
            nonce: 0,
        }
    }

    /// Hash preimage. Variable-length parts carry a u64 length prefix so no two
    /// distinct field sets share a preimage.
    pub fn hash_bytes(&self, payload: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(8 * 5 + payload.len() + self.previous_hash.len());
        bytes.extend_from_slice(&self.index.to_le_bytes());
        bytes.extend_from_slice(&self.timestamp.to_le_bytes());
        bytes.extend_from_slice(&(payload.len() as u64).to_le_bytes());
        bytes.extend_from_slice(payload);
        bytes.extend_from_slice(&(self.previous_hash.len() as u64).to_le_bytes());
        bytes.extend_from_slice(self.previous_hash.as_bytes());
        bytes.extend_from_slice(&self.nonce.to_le_bytes());
        bytes
    }
}

/// Lowercase hex SHA-256 of the header and canonical payload bytes.
pub fn block_hash(header: &BlockHeader, payload_bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(header.hash_bytes(payload_bytes)))
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or_default()
}

/// A block still being mined. Only the nonce (and with it the hash) changes.
#[derive(Clone, Debug)]
pub struct Candidate {
    header: BlockHeader,
    payload: Payload,
    payload_bytes: Vec<u8>,
    hash: String,
}

impl Candidate {
    pub fn new(index: u64, payload: Payload, previous_hash: String) -> Self {
        Self::from_header(BlockHeader::new(index, previous_hash), payload)
    }

    pub fn with_timestamp(
        index: u64,
        payload: Payload,
        previous_hash: String,
        timestamp: u64,
    ) -> Self {
        Self::from_header(
            BlockHeader::with_timestamp(index, previous_hash, timestamp),
            payload,
        )
    }

    fn from_header(header: BlockHeader, payload: Payload) -> Self {
        let payload_bytes = payload.canonical_bytes();
        let hash = block_hash(&header, &payload_bytes);
        Self {
            header,
            payload,
            payload_bytes,
            hash,
        }
    }

    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn compute_hash(&self) -> String {
        block_hash(&self.header, &self.payload_bytes)
    }

    #[cfg(test)]
    pub(crate) fn with_nonce(mut self, nonce: u64) -> Self {
        self.header.nonce = nonce;
        self.hash = self.compute_hash();
        self
    }

    /// Step to the next nonce and rehash. `None` once the nonce space is used up.
    pub(crate) fn advance_nonce(&mut self) -> Option<()> {
        self.header.nonce = self.header.nonce.checked_add(1)?;
        self.hash = self.compute_hash();
        Some(())
    }

    pub(crate) fn seal(self) -> Block {
        Block {
            header: self.header,
            payload: self.payload,
            hash: self.hash,
            tampered: false,
        }
    }
}

/// A sealed link of the chain. Read-only outside this crate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Block {
    #[serde(flatten)]
    header: BlockHeader,
    #[serde(rename = "transactions")]
    payload: Payload,
    hash: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    tampered: bool,
}

impl Block {
    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    pub fn index(&self) -> u64 {
        self.header.index
    }

    pub fn timestamp(&self) -> u64 {
        self.header.timestamp
    }

    pub fn previous_hash(&self) -> &str {
        &self.header.previous_hash
    }

    pub fn nonce(&self) -> u64 {
        self.header.nonce
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Hash stored at seal time. Stale after tampering.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn is_tampered(&self) -> bool {
        self.tampered
    }

    pub fn compute_hash(&self) -> String {
        block_hash(&self.header, &self.payload.canonical_bytes())
    }

    pub fn is_intact(&self) -> bool {
        self.hash == self.compute_hash()
    }

    /// Copy of this block carrying `payload` and the old hash, flagged as tampered.
    pub(crate) fn tampered(&self, payload: Payload) -> Block {
        Block {
            header: self.header.clone(),
            payload,
            hash: self.hash.clone(),
            tampered: true,
        }
    }
}
