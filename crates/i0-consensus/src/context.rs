//! Network selection.
//!
//! A `Context` bundles everything a validation call needs for one network.
//! It is built once at startup and only ever handed out by shared reference;
//! `select` installs it process-wide exactly once.

use std::sync::OnceLock;

use log::info;
use serde::{Deserialize, Serialize};

use crate::chain::{record_of, BlockId, ChainView};
use crate::checkpoints::Checkpoints;
use crate::error::{ConfigError, ConsensusError, ValidationError};
use crate::hash::Hash256;
use crate::params::{ChainParams, Network};
use crate::pow::check_proof_of_work;
use crate::retarget::next_work_required;
use crate::uint256::U256;

pub const ENV_NETWORK: &str = "I0_NETWORK";
pub const ENV_CHECKPOINTS: &str = "I0_CHECKPOINTS";

/// Startup configuration, typically a JSON object:
/// `{"network": "test", "checkpoints": false}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub network: String,
    /// Enforce checkpoints (and use them for estimates).
    pub checkpoints: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            network: Network::Main.as_str().to_string(),
            checkpoints: true,
        }
    }
}

fn env_flag(v: &str) -> bool {
    v == "1" || v.eq_ignore_ascii_case("true")
}

impl Settings {
    /// Defaults overridden by `I0_NETWORK` and `I0_CHECKPOINTS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Settings::default();
        if let Some(network) = lookup(ENV_NETWORK) {
            settings.network = network.trim().to_string();
        }
        if let Some(flag) = lookup(ENV_CHECKPOINTS) {
            settings.checkpoints = env_flag(flag.trim());
        }
        settings
    }
}

#[derive(Clone, Debug)]
pub struct Context {
    network: Network,
    params: &'static ChainParams,
    checkpoints: Checkpoints,
}

impl Context {
    pub fn new(network: Network, enforce_checkpoints: bool) -> Self {
        Self {
            network,
            params: network.params(),
            checkpoints: Checkpoints::for_network(network, enforce_checkpoints),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let network: Network = settings.network.parse()?;
        Ok(Self::new(network, settings.checkpoints))
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn params(&self) -> &'static ChainParams {
        self.params
    }

    pub fn checkpoints(&self) -> &Checkpoints {
        &self.checkpoints
    }

    /// Full header acceptance for a block following `last`: the bits must
    /// be exactly what retargeting requires, the hash must meet them, and a
    /// pinned height must carry the pinned hash. The height is derived from
    /// `last`. Without a parent the block is the genesis block, which is
    /// fixed by the network parameters and never looked up in the
    /// checkpoint table.
    pub fn check_next_block<V: ChainView + ?Sized>(
        &self,
        chain: &V,
        last: Option<BlockId>,
        hash: &Hash256,
        time: u32,
        bits: u32,
    ) -> Result<(), ConsensusError> {
        let required = next_work_required(chain, last, time, self.params)?;
        if bits != required {
            return Err(ValidationError::UnexpectedBits {
                expected: required,
                got: bits,
            }
            .into());
        }
        check_proof_of_work(&hash.to_u256(), bits, self.params)?;
        if let Some(last) = last {
            let height = record_of(chain, last)?.height.saturating_add(1);
            self.checkpoints.verify_block(height, hash)?;
        }
        Ok(())
    }

    pub fn pow_limit(&self) -> U256 {
        self.params.pow_limit
    }
}

static SELECTED: OnceLock<Context> = OnceLock::new();

/// Installs the process-wide context. Succeeds once; later calls fail with
/// `ConfigError::AlreadySelected` and leave the first selection in place.
pub fn select(settings: &Settings) -> Result<&'static Context, ConfigError> {
    let ctx = Context::from_settings(settings)?;
    let mut installed = false;
    let selected = SELECTED.get_or_init(|| {
        installed = true;
        ctx
    });
    if !installed {
        return Err(ConfigError::AlreadySelected(selected.network()));
    }
    info!(
        "selected network {} (checkpoints {})",
        selected.network(),
        if selected.checkpoints().is_enabled() { "on" } else { "off" }
    );
    Ok(selected)
}

pub fn selected() -> Option<&'static Context> {
    SELECTED.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn settings_from_json() {
        let s: Settings = serde_json::from_str(r#"{"network":"test","checkpoints":false}"#)
            .expect("json");
        assert_eq!(
            s,
            Settings {
                network: "test".into(),
                checkpoints: false
            }
        );
        let d: Settings = serde_json::from_str("{}").expect("defaults");
        assert_eq!(d, Settings::default());
        assert!(serde_json::from_str::<Settings>(r#"{"chain":"main"}"#).is_err());
    }

    #[test]
    fn settings_from_env_lookup() {
        let env: HashMap<&str, &str> = [(ENV_NETWORK, " regtest "), (ENV_CHECKPOINTS, "0")].into();
        let s = Settings::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(s.network, "regtest");
        assert!(!s.checkpoints);
        let s = Settings::from_lookup(|_| None);
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn unknown_network_is_a_config_error() {
        let s = Settings {
            network: "signet".into(),
            checkpoints: true,
        };
        assert_eq!(
            Context::from_settings(&s).unwrap_err(),
            ConfigError::UnknownNetwork("signet".into())
        );
    }

    #[test]
    fn context_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Context>();
    }

    #[test]
    fn context_wires_network_tables() {
        let ctx = Context::new(Network::Test, false);
        assert_eq!(ctx.network(), Network::Test);
        assert!(ctx.params().allow_min_difficulty_blocks);
        assert!(!ctx.checkpoints().is_enabled());
    }
}
