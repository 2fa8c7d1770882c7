//! Configuration for iac-contract.
//!
//! Loads config from:
//! 1. Global: ~/.config/iac-contract/config.toml
//! 2. Per-project: .iac-contract/config.toml (overrides global)
//! 3. Environment variables (override both)
//!
//! Example config.toml:
//! ```toml
//! terraform_dir = "terraform"
//! bicep_dir = "bicep"
//! deployment_name = "bicep-deployment-test"
//! resource_group = "rg-edge-dev"
//! location = "westus3"
//! resource_prefix = "edge"
//!
//! [retry]
//! attempts = 3
//! delay_secs = 5
//!
//! [pretty]
//! colors = "auto"
//! ```

use iac_contract_core::Framework;
use iac_contract_output::PrettyConfig;
use iac_contract_tools::{OutputQuery, RetryPolicy, get_tool};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Deployment name used when none is configured.
pub const DEFAULT_DEPLOYMENT_NAME: &str = "bicep-deployment-test";

/// Environment variables read by [`ContractConfig::apply_env`].
pub const ENV_SUBSCRIPTION_ID: &str = "ARM_SUBSCRIPTION_ID";
pub const ENV_RESOURCE_GROUP: &str = "TEST_RESOURCE_GROUP_NAME";
pub const ENV_LOCATION: &str = "TEST_LOCATION";
pub const ENV_RESOURCE_PREFIX: &str = "TEST_RESOURCE_PREFIX";
pub const ENV_DEPLOYMENT_NAME: &str = "BICEP_DEPLOYMENT_NAME";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Retry settings for deployment output queries.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq, schemars::JsonSchema)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts, including the first (default: 3)
    pub attempts: Option<u32>,
    /// Seconds to wait between attempts (default: 5)
    pub delay_secs: Option<u64>,
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        let default = RetryPolicy::default();
        RetryPolicy {
            attempts: self.attempts.unwrap_or(default.attempts),
            delay: self
                .delay_secs
                .map(Duration::from_secs)
                .unwrap_or(default.delay),
        }
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq, schemars::JsonSchema)]
#[serde(default)]
pub struct ContractConfig {
    /// Terraform configuration directory, relative to the project root
    pub terraform_dir: Option<PathBuf>,
    /// Bicep configuration directory, relative to the project root
    pub bicep_dir: Option<PathBuf>,
    /// Azure deployment holding the Bicep outputs
    pub deployment_name: Option<String>,
    pub subscription_id: Option<String>,
    /// Expected resource group of the deployment
    pub resource_group: Option<String>,
    /// Expected Azure region of the deployment
    pub location: Option<String>,
    /// Prefix every named resource is expected to carry
    pub resource_prefix: Option<String>,
    pub retry: RetryConfig,
    pub pretty: PrettyConfig,
}

impl ContractConfig {
    /// Load configuration for a project.
    ///
    /// A missing file is not an error; an unreadable or malformed one is.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        Self::load_layers(Self::global_config_path().as_deref(), root)
    }

    fn load_layers(global: Option<&Path>, root: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(global_path) = global
            && let Some(global) = Self::load_file(global_path)?
        {
            config = config.merge(global);
        }

        let project_path = root.join(".iac-contract").join("config.toml");
        if let Some(project) = Self::load_file(&project_path)? {
            config = config.merge(project);
        }

        Ok(config)
    }

    /// Get the global config path.
    fn global_config_path() -> Option<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;
        Some(config_home.join("iac-contract").join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.is_file() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(Some(config))
    }

    /// Values set in `other` win.
    fn merge(self, other: Self) -> Self {
        Self {
            terraform_dir: other.terraform_dir.or(self.terraform_dir),
            bicep_dir: other.bicep_dir.or(self.bicep_dir),
            deployment_name: other.deployment_name.or(self.deployment_name),
            subscription_id: other.subscription_id.or(self.subscription_id),
            resource_group: other.resource_group.or(self.resource_group),
            location: other.location.or(self.location),
            resource_prefix: other.resource_prefix.or(self.resource_prefix),
            retry: RetryConfig {
                attempts: other.retry.attempts.or(self.retry.attempts),
                delay_secs: other.retry.delay_secs.or(self.retry.delay_secs),
            },
            pretty: PrettyConfig {
                enabled: other.pretty.enabled.or(self.pretty.enabled),
                colors: other.pretty.colors.or(self.pretty.colors),
            },
        }
    }

    /// Overlay values from the environment. Empty variables are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = get(ENV_SUBSCRIPTION_ID) {
            self.subscription_id = Some(value);
        }
        if let Some(value) = get(ENV_RESOURCE_GROUP) {
            self.resource_group = Some(value);
        }
        if let Some(value) = get(ENV_LOCATION) {
            self.location = Some(value);
        }
        if let Some(value) = get(ENV_RESOURCE_PREFIX) {
            self.resource_prefix = Some(value);
        }
        if let Some(value) = get(ENV_DEPLOYMENT_NAME) {
            self.deployment_name = Some(value);
        }
    }

    /// Configuration directory for `framework`, resolved against `root`.
    pub fn framework_dir(&self, root: &Path, framework: Framework) -> PathBuf {
        let configured = match framework {
            Framework::Terraform => self.terraform_dir.as_deref(),
            Framework::Bicep => self.bicep_dir.as_deref(),
        };
        match configured {
            Some(dir) => root.join(dir),
            None => {
                let default_dir = get_tool(framework)
                    .map(|tool| tool.info().default_dir)
                    .unwrap_or(framework.label());
                root.join(default_dir)
            }
        }
    }

    pub fn deployment_name(&self) -> &str {
        self.deployment_name
            .as_deref()
            .unwrap_or(DEFAULT_DEPLOYMENT_NAME)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.policy()
    }

    /// Query for the live outputs of `framework`'s deployment.
    pub fn output_query(&self, root: &Path, framework: Framework) -> OutputQuery {
        let mut query = OutputQuery::new(self.framework_dir(root, framework));
        query.retry = self.retry_policy();
        query.subscription_id = self.subscription_id.clone();
        if framework == Framework::Bicep {
            query.deployment_name = Some(self.deployment_name().to_string());
        }
        query
    }
}
