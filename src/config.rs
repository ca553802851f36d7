//! Server configuration
//!
//! Layered with figment: built-in defaults, then a TOML file, then
//! `COMBATD_*` environment variables. The binary merges command line
//! flags on top of that.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::combat::{DiceMode, DiceSource, RngDice};
use crate::encounters::Rules;

/// Config file read when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "combatd.toml";

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// SQLite file; `None` keeps everything in memory
    pub db_path: Option<String>,
    /// Reject malformed dice expressions instead of rolling 0
    pub strict_dice: bool,
    /// Reject reorders that do not list every combatant
    pub strict_reorder: bool,
    /// Fixed RNG seed for reproducible rolls
    pub dice_seed: Option<u64>,
    pub log_json: bool,
    /// Load the most recently saved encounter on startup
    pub autoload_latest: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 8080)),
            db_path: None,
            strict_dice: false,
            strict_reorder: false,
            dice_seed: None,
            log_json: false,
            autoload_latest: false,
        }
    }
}

impl Config {
    /// The layered provider chain, before any command line overrides
    pub fn figment(path: Option<&Path>) -> Figment {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed("COMBATD_"))
    }

    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        Self::figment(path).extract()
    }

    pub fn rules(&self) -> Rules {
        Rules {
            dice_mode: DiceMode::from_strict(self.strict_dice),
            strict_reorder: self.strict_reorder,
        }
    }

    /// Dice for the live encounter, seeded if configured
    pub fn dice(&self) -> Box<dyn DiceSource> {
        match self.dice_seed {
            Some(seed) => Box::new(RngDice::seeded(seed)),
            None => Box::new(RngDice::from_os_rng()),
        }
    }
}
