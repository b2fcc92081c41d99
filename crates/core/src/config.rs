use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_bool(profile: &str, key: &str, default: bool) -> bool {
    match profiled_env_opt(profile, key) {
        Some(v) => matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        None => default,
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Active profile name (empty = default).
    pub profile: String,
    pub rules: RulesConfig,
    pub logging: LoggingConfig,
    pub alerts: AlertTemplateConfig,
}

impl EngineConfig {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `BUCKETWATCH_PROFILE`. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("BUCKETWATCH_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            rules: RulesConfig::from_env_profiled(p),
            logging: LoggingConfig::from_env_profiled(p),
            alerts: AlertTemplateConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  rules:    dir={}, watch={}", self.rules.dir.display(), self.rules.watch);
        tracing::info!("  logging:  json={}", self.logging.json);
        tracing::info!(
            "  alerts:   subject_template={}, body_template={}",
            if self.alerts.subject_template.is_some() { "custom" } else { "default" },
            if self.alerts.body_template.is_some() { "custom" } else { "default" },
        );
    }
}

// ── Rules ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Directory scanned for `JobRules` / `ValueList` YAML documents.
    pub dir: PathBuf,
    /// Hot-reload documents when files in `dir` change.
    pub watch: bool,
}

impl RulesConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            dir: PathBuf::from(profiled_env_or(p, "RULES_DIR", "data/rules")),
            watch: profiled_env_bool(p, "RULES_WATCH", false),
        }
    }
}

// ── Logging ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub json: bool,
}

impl LoggingConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            json: profiled_env_bool(p, "LOG_JSON", false),
        }
    }
}

// ── Alert templates ───────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertTemplateConfig {
    pub subject_template: Option<String>,
    pub body_template: Option<String>,
}

impl AlertTemplateConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            subject_template: profiled_env_opt(p, "ALERT_SUBJECT_TEMPLATE"),
            body_template: profiled_env_opt(p, "ALERT_BODY_TEMPLATE"),
        }
    }
}
