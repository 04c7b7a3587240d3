use powchain_core::{
    constants::GENESIS_PREVIOUS_HASH, pow::leading_zero_digits, Chain, ChainConfig, ChainError,
    Payload, ValidationError,
};
use rand::Rng;

fn chain_with_difficulty(difficulty: u32) -> Chain {
    Chain::new(&ChainConfig::default().with_difficulty(difficulty)).expect("valid config")
}

#[test]
fn test_menu_scenario() -> anyhow::Result<()> {
    let mut chain = chain_with_difficulty(2);
    assert_eq!(chain.len(), 1);

    chain.add_block(vec!["a->b:10"])?;
    assert_eq!(chain.len(), 2);
    assert!(chain.is_chain_valid());

    chain.add_block(vec!["c->d:5"])?;
    assert_eq!(chain.len(), 3);
    assert!(chain.is_chain_valid());

    chain.tamper_block(1, "x->y:999")?;
    assert!(!chain.is_chain_valid());
    Ok(())
}

#[test]
fn test_random_payloads_keep_chain_valid() -> anyhow::Result<()> {
    let mut rng = rand::thread_rng();
    let difficulty = 2;
    let mut chain = chain_with_difficulty(difficulty);

    for _ in 0..10 {
        let items = rng.gen_range(0..5);
        let payload: Payload = (0..items)
            .map(|i| format!("user{i}->user{}:{}", i + 1, rng.gen_range(1..1000)))
            .collect();
        chain.add_block(payload)?;
    }

    assert_eq!(chain.len(), 11);
    assert!(chain.is_chain_valid());

    let blocks = chain.blocks();
    assert_eq!(blocks[0].previous_hash(), GENESIS_PREVIOUS_HASH);
    for (i, pair) in blocks.windows(2).enumerate() {
        assert_eq!(pair[1].index(), i as u64 + 1);
        assert_eq!(pair[1].previous_hash(), pair[0].hash());
        assert!(leading_zero_digits(pair[1].hash()) >= difficulty);
        assert!(pair[1].timestamp() >= pair[0].timestamp());
    }
    Ok(())
}

#[test]
fn test_every_tampered_index_is_reported() -> anyhow::Result<()> {
    let mut chain = chain_with_difficulty(1);
    for i in 0..5 {
        chain.add_block(format!("tx-{i}"))?;
    }

    for index in 1..chain.len() {
        let mut copy = chain.clone();
        copy.tamper_block(index, "forged")?;
        let err = copy.validate().expect_err("tampered chain must be invalid");
        assert_eq!(err.index(), index as u64);
        assert_eq!(
            err,
            ValidationError::Tampered {
                index: index as u64
            }
        );
    }
    assert!(chain.is_chain_valid());
    Ok(())
}

#[test]
fn test_tamper_guard_leaves_chain_unchanged() -> anyhow::Result<()> {
    let mut chain = chain_with_difficulty(1);
    chain.add_block("a")?;
    chain.add_block("b")?;
    let before = chain.display_blockchain();
    let len = chain.len();

    for index in [0, len, len + 10, usize::MAX] {
        assert_eq!(
            chain.tamper_block(index, "X"),
            Err(ChainError::InvalidBlockIndex { index, len })
        );
    }
    assert_eq!(chain.display_blockchain(), before);
    assert!(chain.is_chain_valid());
    Ok(())
}

#[test]
fn test_snapshot_json_shape() -> anyhow::Result<()> {
    let mut chain = chain_with_difficulty(1);
    chain.add_block(vec!["a->b:10", "c->d:5"])?;
    chain.tamper_block(1, "x->y:999")?;

    let json = serde_json::to_value(chain.display_blockchain())?;
    let blocks = json.as_array().expect("array of blocks");
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0]["transactions"], serde_json::json!(["Genesis Block"]));
    assert_eq!(blocks[0]["previousHash"], "0");
    assert!(blocks[0].get("tampered").is_none());
    assert_eq!(blocks[1]["transactions"], serde_json::json!(["x->y:999"]));
    assert_eq!(blocks[1]["tampered"], true);
    for key in ["index", "timestamp", "previousHash", "nonce", "hash"] {
        assert!(blocks[1].get(key).is_some(), "missing {key}");
    }
    Ok(())
}
