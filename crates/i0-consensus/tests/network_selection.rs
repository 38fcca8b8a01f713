use i0_consensus::{select, selected, ConfigError, Network, Settings};

// Selection is process-wide, so everything lives in one test.
#[test]
fn network_is_selected_exactly_once() {
    assert!(selected().is_none());

    let bad = Settings {
        network: "mainnet".into(),
        checkpoints: true,
    };
    assert_eq!(
        select(&bad).unwrap_err(),
        ConfigError::UnknownNetwork("mainnet".into())
    );
    assert!(selected().is_none());

    let settings = Settings {
        network: "test".into(),
        checkpoints: false,
    };
    let ctx = select(&settings).expect("first selection");
    assert_eq!(ctx.network(), Network::Test);
    assert!(!ctx.checkpoints().is_enabled());

    let again = Settings::default();
    assert_eq!(
        select(&again).unwrap_err(),
        ConfigError::AlreadySelected(Network::Test)
    );
    assert_eq!(selected().map(|c| c.network()), Some(Network::Test));
}
