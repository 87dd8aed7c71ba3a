//! The declarative service list: `services.json`.
//!
//! Grounded on the teacher's `config.rs` (load/parse/validate a JSON/YAML
//! service list) but cut down to the handful of fields this spec actually
//! needs -- no limits, capabilities, hooks, or dependency graph.

use std::fs;

use serde::{Deserialize, Serialize};

use crate::error::{AdaError, ConfigError};
use crate::paths::{write_atomic, Paths};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    pub cmd: String,
    pub dir: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_file: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

pub struct ConfigStore<'p> {
    paths: &'p Paths,
}

impl<'p> ConfigStore<'p> {
    pub fn new(paths: &'p Paths) -> Self {
        Self { paths }
    }

    /// Loads the full service list. A missing file is an empty list; a
    /// present-but-invalid file is a parse error.
    pub fn load(&self) -> Result<Vec<Service>, AdaError> {
        let path = self.paths.config_file();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(ConfigError::Read { path, source }.into()),
        };
        let services: Vec<Service> = serde_json::from_str(&raw)
            .map_err(|source| ConfigError::Parse { path, source })?;
        Ok(services)
    }

    pub fn list(&self) -> Result<Vec<Service>, AdaError> {
        self.load()
    }

    pub fn lookup(&self, name: &str) -> Result<Option<Service>, AdaError> {
        Ok(self.load()?.into_iter().find(|s| s.name == name))
    }

    fn save(&self, services: &[Service]) -> Result<(), AdaError> {
        let path = self.paths.config_file();
        let body = serde_json::to_vec_pretty(services)
            .map_err(|source| ConfigError::Parse { path: path.clone(), source })?;
        write_atomic(&path, &body).map_err(|source| ConfigError::Write { path, source })?;
        Ok(())
    }

    /// Adds a new service. Fails if the name is malformed or already exists.
    pub fn add(&self, service: Service) -> Result<(), AdaError> {
        validate_name(&service.name)?;
        let mut services = self.load()?;
        if services.iter().any(|s| s.name == service.name) {
            return Err(ConfigError::AlreadyExists(service.name).into());
        }
        services.push(service);
        self.save(&services)
    }

    /// Updates an existing service in place, or inserts it if absent.
    pub fn upsert(&self, service: Service) -> Result<(), AdaError> {
        validate_name(&service.name)?;
        let mut services = self.load()?;
        match services.iter_mut().find(|s| s.name == service.name) {
            Some(existing) => *existing = service,
            None => services.push(service),
        }
        self.save(&services)
    }

    pub fn remove(&self, name: &str) -> Result<(), AdaError> {
        let mut services = self.load()?;
        let before = services.len();
        services.retain(|s| s.name != name);
        if services.len() == before {
            return Err(ConfigError::NotFound(name.to_string()).into());
        }
        self.save(&services)
    }

    pub fn set_enabled(&self, name: &str, enabled: bool) -> Result<(), AdaError> {
        let mut services = self.load()?;
        let service = services
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| ConfigError::NotFound(name.to_string()))?;
        service.enabled = enabled;
        self.save(&services)
    }
}

fn validate_name(name: &str) -> Result<(), AdaError> {
    use std::sync::OnceLock;

    use regex::Regex;

    use crate::constants::SERVICE_NAME_PATTERN;

    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(SERVICE_NAME_PATTERN).unwrap());

    if re.is_match(name) {
        Ok(())
    } else {
        Err(ConfigError::InvalidName(name.to_string()).into())
    }
}
