#[cfg(test)]
#[path = "credential_store_test.rs"]
mod tests;

use std::path;

use anyhow::Result;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::SessionConfiguration;

/// Persists the session configuration as a single JSON file.
pub struct CredentialStore {
    file_path: path::PathBuf,
}

impl Default for CredentialStore {
    fn default() -> CredentialStore {
        return CredentialStore::new(path::PathBuf::from(Config::get(ConfigKey::StoreFile)));
    }
}

impl CredentialStore {
    pub fn new(file_path: path::PathBuf) -> CredentialStore {
        return CredentialStore { file_path };
    }

    pub fn path(&self) -> &path::Path {
        return &self.file_path;
    }

    /// Any failure to read or parse the record is treated as no record.
    pub async fn load(&self) -> Option<SessionConfiguration> {
        if !self.file_path.exists() {
            return None;
        }

        let payload = match fs::read_to_string(&self.file_path).await {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(error = ?err, path = ?self.file_path, "Failed to read stored configuration");
                return None;
            }
        };

        match serde_json::from_str::<SessionConfiguration>(&payload) {
            Ok(config) => return Some(config),
            Err(err) => {
                tracing::warn!(error = ?err, path = ?self.file_path, "Stored configuration is not valid JSON, ignoring it");
                return None;
            }
        }
    }

    pub async fn save(&self, config: &SessionConfiguration) -> Result<()> {
        let payload = serde_json::to_string_pretty(config)?;

        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await?;
            }
        }

        // Write next to the target then rename, so a crash never leaves a
        // truncated record behind.
        let tmp_path = self.file_path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp_path).await?;
        file.write_all(payload.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(&tmp_path, &self.file_path).await?;

        tracing::debug!(
            path = ?self.file_path,
            persona = config.selected_persona.to_string(),
            "Saved configuration"
        );

        return Ok(());
    }

    pub async fn clear(&self) -> Result<()> {
        if !self.file_path.exists() {
            return Ok(());
        }

        fs::remove_file(&self.file_path).await?;
        return Ok(());
    }
}
