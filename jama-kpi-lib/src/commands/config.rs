use crate::Result;
use crate::upstream::MAX_PAGE_SIZE;
use camino::{Utf8Path, Utf8PathBuf};
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use url::Url;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// Name of the configuration file looked up when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "kpi.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Base URL of the Jama Connect instance
    #[serde(default = "default_host_domain")]
    pub host_domain: String,

    /// Saved filter returning the test runs
    #[serde(default = "default_testrun_filter_id")]
    pub testrun_filter_id: u32,

    /// Saved filter returning the defects
    #[serde(default = "default_defect_filter_id")]
    pub defect_filter_id: u32,

    /// Document-key prefix of items left out of the KPIs
    #[serde(default = "default_excluded_prefix")]
    pub excluded_prefix: String,

    /// Defect field holding the build a defect was found in
    #[serde(default = "default_defect_build_field")]
    pub defect_build_field: String,

    /// Defect field holding the date a defect was found on
    #[serde(default = "default_defect_found_date_field")]
    pub defect_found_date_field: String,

    /// Items requested per page from filter results
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_host_domain() -> String {
    "https://example.jamacloud.com".to_string()
}

const fn default_testrun_filter_id() -> u32 {
    7273
}

const fn default_defect_filter_id() -> u32 {
    7274
}

fn default_excluded_prefix() -> String {
    "LCE".to_string()
}

fn default_defect_build_field() -> String {
    "BUG_foundInBuild$154".to_string()
}

fn default_defect_found_date_field() -> String {
    "BUG_foundOnDate$154".to_string()
}

const fn default_page_size() -> u32 {
    MAX_PAGE_SIZE
}

impl Config {
    /// Load configuration from a file or use defaults.
    ///
    /// With no explicit path, `kpi.toml` in `base_dir` is used if present. Returns the
    /// configuration together with the file it was read from, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8Path>) -> Result<(Self, Option<Utf8PathBuf>)> {
        let (config, source) = Self::load_unvalidated(base_dir, config_path)?;
        config.validate()?;
        Ok((config, source))
    }

    /// Like [`Config::load`], but leaves validation to the caller so overrides can be applied first.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load_unvalidated(base_dir: &Utf8Path, config_path: Option<&Utf8Path>) -> Result<(Self, Option<Utf8PathBuf>)> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading configuration file '{path}'"))?;
            (path.to_path_buf(), text)
        } else {
            let path = base_dir.join(DEFAULT_CONFIG_FILE);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    return Ok((Self::default(), None));
                }
                Err(e) => return Err(e).into_app_err_with(|| format!("reading configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        Ok((config, Some(final_path)))
    }

    /// Save the default configuration to a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    /// The host as a parsed URL.
    ///
    /// # Errors
    ///
    /// Returns an error unless the host is an absolute `http` or `https` URL
    pub fn host_url(&self) -> Result<Url> {
        let url = Url::parse(&self.host_domain).into_app_err_with(|| format!("host_domain '{}' is not a valid URL", self.host_domain))?;

        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(app_err!("host_domain '{}' must be an http or https URL", self.host_domain));
        }

        Ok(url)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if any value is out of range
    pub fn validate(&self) -> Result<()> {
        let _ = self.host_url()?;

        if self.testrun_filter_id == 0 {
            return Err(app_err!("testrun_filter_id must be greater than 0"));
        }

        if self.defect_filter_id == 0 {
            return Err(app_err!("defect_filter_id must be greater than 0"));
        }

        if self.excluded_prefix.is_empty() {
            return Err(app_err!("excluded_prefix must not be empty"));
        }

        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(app_err!("page_size must be between 1 and {MAX_PAGE_SIZE}, got {}", self.page_size));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host_domain: default_host_domain(),
            testrun_filter_id: default_testrun_filter_id(),
            defect_filter_id: default_defect_filter_id(),
            excluded_prefix: default_excluded_prefix(),
            defect_build_field: default_defect_build_field(),
            defect_found_date_field: default_defect_found_date_field(),
            page_size: default_page_size(),
        }
    }
}
