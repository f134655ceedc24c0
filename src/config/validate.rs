// src/config/validate.rs

use std::path::Path;

use crate::client::BackendClientConfig;
use crate::config::model::{BackendSection, ConfigFile, RawConfigFile};
use crate::errors::{Result, SupervisorError};
use crate::locate::candidates::{expand_layout, RESOURCES_PLACEHOLDER};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = SupervisorError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.shell, raw.backend, raw.client))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_executable(&cfg.backend)?;
    validate_layouts(&cfg.backend)?;
    validate_client(&cfg.client)?;
    Ok(())
}

fn validate_executable(backend: &BackendSection) -> Result<()> {
    if backend.executable.trim().is_empty() {
        return Err(SupervisorError::ConfigError(
            "[backend].executable must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_layouts(backend: &BackendSection) -> Result<()> {
    if backend.layouts.is_empty() {
        return Err(SupervisorError::ConfigError(
            "[backend].layouts must contain at least one layout".to_string(),
        ));
    }

    for layout in &backend.layouts {
        let rooted = layout.starts_with(RESOURCES_PLACEHOLDER) || Path::new(layout).is_absolute();
        if !rooted {
            return Err(SupervisorError::ConfigError(format!(
                "layout '{layout}' must start with {RESOURCES_PLACEHOLDER} or be an absolute path"
            )));
        }

        // Expanding against a dummy root surfaces unknown placeholders early.
        expand_layout(layout, Path::new("/"), &backend.executable)?;
    }

    Ok(())
}

fn validate_client(client: &BackendClientConfig) -> Result<()> {
    let url = client.base_url.as_str();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(SupervisorError::ConfigError(format!(
            "[client].base_url must be an http(s) URL (got '{url}')"
        )));
    }

    if client.timeout.is_zero() {
        return Err(SupervisorError::ConfigError(
            "[client].timeout must be greater than zero".to_string(),
        ));
    }

    Ok(())
}
