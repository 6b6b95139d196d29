//! Loading editor configuration (form defaults) from TOML.
//!
//! See `AdminConfig` and `FormDefaults` for the expected schema.

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::Language;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AdminConfig {
  #[serde(default)]
  pub defaults: FormDefaults,
}

/// Content substituted while seeding a draft whose detail response omits a
/// field. The shipped defaults are all empty strings — the scaffold shape
/// (three languages, one placeholder case) is what matters — but an
/// installation can override them in TOML to pre-fill boilerplate.
#[derive(Clone, Debug, Deserialize)]
pub struct FormDefaults {
  #[serde(default)]
  pub placeholder_input: String,
  #[serde(default)]
  pub placeholder_output: String,
  #[serde(default)]
  pub placeholder_explanation: String,
  #[serde(default)]
  pub cpp_boilerplate: String,
  #[serde(default)]
  pub java_boilerplate: String,
  #[serde(default)]
  pub javascript_boilerplate: String,
}

impl Default for FormDefaults {
  fn default() -> Self {
    Self {
      placeholder_input: String::new(),
      placeholder_output: String::new(),
      placeholder_explanation: String::new(),
      cpp_boilerplate: String::new(),
      java_boilerplate: String::new(),
      javascript_boilerplate: String::new(),
    }
  }
}

impl FormDefaults {
  /// Boilerplate used when a scaffold entry for `language` is missing.
  pub fn boilerplate(&self, language: Language) -> String {
    match language {
      Language::Cpp => self.cpp_boilerplate.clone(),
      Language::Java => self.java_boilerplate.clone(),
      Language::JavaScript => self.javascript_boilerplate.clone(),
    }
  }
}

/// Attempt to load `AdminConfig` from ADMIN_CONFIG_PATH. On any parsing/IO
/// error, returns None and the built-in defaults apply.
pub fn load_admin_config_from_env() -> Option<AdminConfig> {
  let path = std::env::var("ADMIN_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<AdminConfig>(&s) {
      Ok(cfg) => {
        info!(target: "admin_backend", %path, "Loaded admin config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "admin_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "admin_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn toml_overrides_only_named_fields() {
    let cfg: AdminConfig = toml::from_str(
      "[defaults]\njava_boilerplate = \"class Solution {}\"\n",
    )
    .unwrap();
    assert_eq!(cfg.defaults.boilerplate(Language::Java), "class Solution {}");
    assert_eq!(cfg.defaults.boilerplate(Language::Cpp), "");
    assert_eq!(cfg.defaults.placeholder_input, "");
  }
}
