use anyhow::{Context, Result, bail};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tally_core::AuditConfig;
use tally_finance::{BatchOptions, FailurePolicy, RemoteConfig};
use tally_ingest::{BelowThreshold, DirectionConfig, ParseOptions};

use crate::state::ensure_tally_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub parser: ParserSection,
    pub audit: AuditSection,
    pub classifier: ClassifierSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSection {
    /// Characters scanned for metadata
    pub header_window: usize,
    pub amount_column_threshold: usize,
    pub below_threshold: BelowThreshold,
    pub year_min: i32,
    pub year_max: i32,
}

impl Default for ParserSection {
    fn default() -> Self {
        let parse = ParseOptions::default();
        Self {
            header_window: parse.header_window,
            amount_column_threshold: parse.direction.column_threshold,
            below_threshold: parse.direction.below_threshold,
            year_min: parse.year_min,
            year_max: parse.year_max,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditSection {
    /// Also compare recomputed totals against the declared ones
    pub strict: bool,
    pub tolerance: Decimal,
}

impl Default for AuditSection {
    fn default() -> Self {
        Self {
            strict: false,
            tolerance: AuditConfig::default().tolerance,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Provider {
    #[default]
    Keyword,
    Openai,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierSection {
    pub provider: Provider,
    pub model: String,
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub timeout_secs: u64,
    pub concurrency: usize,
    pub on_failure: FailurePolicy,
}

impl Default for ClassifierSection {
    fn default() -> Self {
        let remote = RemoteConfig::default();
        let batch = BatchOptions::default();
        Self {
            provider: Provider::Keyword,
            model: remote.model,
            base_url: remote.base_url,
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: batch.timeout.as_secs(),
            concurrency: batch.concurrency,
            on_failure: batch.on_failure,
        }
    }
}

impl Config {
    pub fn parse_options(&self, year_hint: Option<i32>) -> ParseOptions {
        let p = &self.parser;
        ParseOptions {
            year_hint,
            header_window: p.header_window,
            year_min: p.year_min,
            year_max: p.year_max,
            direction: DirectionConfig {
                column_threshold: p.amount_column_threshold,
                below_threshold: p.below_threshold,
            },
        }
    }

    /// `force_strict` comes from `--strict`
    pub fn audit_config(&self, force_strict: bool) -> AuditConfig {
        if force_strict || self.audit.strict {
            AuditConfig::strict(self.audit.tolerance)
        } else {
            AuditConfig {
                tolerance: self.audit.tolerance,
                ..AuditConfig::default()
            }
        }
    }

    pub fn batch_options(&self) -> BatchOptions {
        let c = &self.classifier;
        BatchOptions {
            concurrency: c.concurrency.max(1),
            timeout: Duration::from_secs(c.timeout_secs.max(1)),
            on_failure: c.on_failure,
        }
    }

    /// Remote settings, with the API key read from the environment
    pub fn remote_config(&self) -> Result<RemoteConfig> {
        let c = &self.classifier;
        let api_key = std::env::var(&c.api_key_env)
            .with_context(|| format!("{} is not set (needed by the remote classifier)", c.api_key_env))?;
        if api_key.trim().is_empty() {
            bail!("{} is empty", c.api_key_env);
        }
        Ok(RemoteConfig {
            base_url: c.base_url.clone(),
            model: c.model.clone(),
            api_key,
            ..RemoteConfig::default()
        })
    }
}

pub fn config_path(override_path: Option<&Path>) -> Result<PathBuf> {
    match override_path {
        Some(p) => Ok(p.to_path_buf()),
        None => Ok(ensure_tally_home()?.join("config.toml")),
    }
}

pub fn load_config(override_path: Option<&Path>) -> Result<Config> {
    let p = config_path(override_path)?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config, override_path: Option<&Path>) -> Result<PathBuf> {
    let p = config_path(override_path)?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(p)
}

pub fn init_config(override_path: Option<&Path>) -> Result<()> {
    let p = config_path(override_path)?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let written = save_config(&Config::default(), override_path)?;
    println!("Wrote {}", written.display());
    Ok(())
}

pub fn render_config(cfg: &Config) -> Result<String> {
    toml::to_string_pretty(cfg).context("serialize config")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::AuditMode;

    #[test]
    fn test_missing_sections_default() {
        let cfg: Config = toml::from_str("[audit]\nstrict = true\n").unwrap();
        assert!(cfg.audit.strict);
        assert_eq!(cfg.parser, ParserSection::default());
        assert_eq!(cfg.classifier.provider, Provider::Keyword);
        assert_eq!(cfg.classifier.concurrency, 4);
        assert_eq!(cfg.classifier.timeout_secs, 20);
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let cfg = Config::default();
        let s = render_config(&cfg).unwrap();
        let back: Config = toml::from_str(&s).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn test_sections_map_onto_library_options() {
        let cfg: Config = toml::from_str(
            r#"
            [parser]
            amount_column_threshold = 72
            below_threshold = "needs-review"

            [classifier]
            provider = "openai"
            concurrency = 0
            on_failure = "keyword-fallback"
            "#,
        )
        .unwrap();

        let parse = cfg.parse_options(Some(2024));
        assert_eq!(parse.year_hint, Some(2024));
        assert_eq!(parse.direction.column_threshold, 72);
        assert_eq!(parse.direction.below_threshold, BelowThreshold::NeedsReview);

        let batch = cfg.batch_options();
        assert_eq!(batch.concurrency, 1);
        assert_eq!(batch.on_failure, FailurePolicy::KeywordFallback);
        assert_eq!(cfg.classifier.provider, Provider::Openai);
    }

    #[test]
    fn test_strict_flag_overrides_config() {
        let cfg = Config::default();
        assert_eq!(cfg.audit_config(false).mode, AuditMode::RecordCount);
        assert_eq!(cfg.audit_config(true).mode, AuditMode::Strict);
    }
}
