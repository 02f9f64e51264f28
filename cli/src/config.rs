//! The TOML settings file

use anyhow::{Context, Result};
use batch_core::{Address, CfmmStorage, ContractRole};
use cfmm_model::{FeeSchedule, SlippageBps};
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings file used when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "~/.config/cfmm/config.toml";

/// Settings resolved for one CLI invocation
pub struct Config {
    pub settings: Settings,
    pub settings_path: PathBuf,
}

impl Config {
    /// Load `config_path`, or the default path when none is given
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let settings_path = match config_path {
            Some(path) => path,
            None => PathBuf::from(shellexpand::tilde(DEFAULT_CONFIG_PATH).as_ref()),
        };
        let settings = Settings::load(&settings_path)?;

        Ok(Self {
            settings,
            settings_path,
        })
    }
}

/// Contents of the settings file. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub contracts: ContractSettings,
    pub trade: TradeSettings,
}

impl Settings {
    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("no settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        Self::parse(&data).with_context(|| format!("Invalid settings file: {}", path.display()))
    }

    pub fn parse(data: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(data)?;
        settings.trade.fee()?;
        settings.trade.slippage()?;
        Ok(settings)
    }
}

/// `[contracts]`: addresses that override what the CFMM storage reports
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContractSettings {
    pub cfmm: Option<String>,
    pub cash: Option<String>,
    pub token: Option<String>,
    pub lqt: Option<String>,
    /// FA2 token id traded by the pool
    pub token_id: u64,
}

impl ContractSettings {
    /// Configured address for `role`, validated
    pub fn address(&self, role: ContractRole) -> Result<Option<Address>> {
        let raw = match role {
            ContractRole::Cfmm => &self.cfmm,
            ContractRole::Cash => &self.cash,
            ContractRole::Token => &self.token,
            ContractRole::Lqt => &self.lqt,
        };
        raw.as_deref()
            .map(|s| Address::parse(s).with_context(|| format!("[contracts] {} address", role)))
            .transpose()
    }

    /// Storage with configured addresses laid over the ones it reports
    pub fn overlay(&self, storage: &CfmmStorage) -> Result<CfmmStorage> {
        let pick = |role: ContractRole, reported: &Option<Address>| -> Result<Option<Address>> {
            Ok(self.address(role)?.or_else(|| reported.clone()))
        };
        Ok(CfmmStorage {
            cash_address: pick(ContractRole::Cash, &storage.cash_address)?,
            token_address: pick(ContractRole::Token, &storage.token_address)?,
            lqt_address: pick(ContractRole::Lqt, &storage.lqt_address)?,
            ..storage.clone()
        })
    }
}

/// `[trade]`: defaults for quotes and batches
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TradeSettings {
    pub slippage_bps: u32,
    pub deadline_minutes: i64,
    pub fee_numerator: u64,
    pub fee_denominator: u64,
}

impl Default for TradeSettings {
    fn default() -> Self {
        Self {
            slippage_bps: SlippageBps::DEFAULT.get(),
            deadline_minutes: 20,
            fee_numerator: FeeSchedule::HISTORICAL.numerator(),
            fee_denominator: FeeSchedule::HISTORICAL.denominator(),
        }
    }
}

impl TradeSettings {
    pub fn fee(&self) -> Result<FeeSchedule> {
        FeeSchedule::new(self.fee_numerator, self.fee_denominator).context("[trade] fee")
    }

    pub fn slippage(&self) -> Result<SlippageBps> {
        SlippageBps::new(self.slippage_bps).context("[trade] slippage_bps")
    }
}
