use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use kalinga_core::models::session::{Role, Session, WorkerId};
use kalinga_gateway::config::GatewayConfig;
use kalinga_outreach::reconcile::LookupPolicy;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 2;

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    /// Record store root, e.g. `http://10.0.0.5:8080`.
    pub base_url: String,
    pub worker_id: u64,
    pub role: Role,
    /// Added in v1.
    pub timeout_secs: u64,
    /// Added in v2.
    pub lookup_policy: PolicySetting,
}

/// On-disk spelling of [`LookupPolicy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicySetting {
    #[default]
    AssumeEmpty,
    RequireRetry,
}

impl From<PolicySetting> for LookupPolicy {
    fn from(p: PolicySetting) -> Self {
        match p {
            PolicySetting::AssumeEmpty => LookupPolicy::AssumeEmpty,
            PolicySetting::RequireRetry => LookupPolicy::RequireRetry,
        }
    }
}

impl FieldConfig {
    pub fn new(base_url: impl Into<String>, worker_id: u64, role: Role) -> Self {
        Self {
            config_version: CURRENT_VERSION,
            base_url: base_url.into(),
            worker_id,
            role,
            timeout_secs: 30,
            lookup_policy: PolicySetting::default(),
        }
    }

    pub fn session(&self) -> Session {
        Session {
            worker_id: WorkerId(self.worker_id),
            role: self.role,
        }
    }

    pub fn gateway(&self) -> GatewayConfig {
        GatewayConfig::new(self.base_url.clone()).with_timeout(Duration::from_secs(self.timeout_secs))
    }

    pub fn lookup_policy(&self) -> LookupPolicy {
        self.lookup_policy.into()
    }
}

/// `<platform config dir>/kalinga-field`.
pub fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("kalinga-field"))
}

pub fn has_config(dir: &Path) -> bool {
    dir.join(CONFIG_FILE).exists()
}

pub fn load_config(dir: &Path) -> eyre::Result<FieldConfig> {
    let path = dir.join(CONFIG_FILE);
    let contents = std::fs::read_to_string(&path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .map_or(0, |v| u32::try_from(v).unwrap_or(u32::MAX));

    let migrated = migrate(json, on_disk_version)?;
    let config: FieldConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update kalinga-field."
        ));
    }

    let obj = json
        .as_object_mut()
        .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;

    // v0 -> v1: request timeout
    if from_version < 1 {
        obj.entry("timeout_secs").or_insert(serde_json::json!(30));
        tracing::info!("migrated config v0 -> v1 (added timeout_secs)");
    }

    // v1 -> v2: lookup policy
    if from_version < 2 {
        obj.entry("lookup_policy")
            .or_insert(serde_json::json!("assume_empty"));
        tracing::info!("migrated config v1 -> v2 (added lookup_policy)");
    }

    obj.insert("config_version".to_string(), serde_json::json!(CURRENT_VERSION));
    Ok(json)
}

pub fn save_config(dir: &Path, config: &FieldConfig) -> eyre::Result<()> {
    std::fs::create_dir_all(dir)?;

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let path = dir.join(CONFIG_FILE);
    let json = serde_json::to_string_pretty(&stamped)?;

    let tmp_path = dir.join("config.json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, &path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}

pub fn delete_config(dir: &Path) -> eyre::Result<()> {
    let path = dir.join(CONFIG_FILE);
    if path.exists() {
        std::fs::remove_file(&path)?;
        tracing::info!(path = %path.display(), "config deleted");
    }
    Ok(())
}
