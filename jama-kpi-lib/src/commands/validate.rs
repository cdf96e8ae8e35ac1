use super::Host;
use super::config::Config;
use crate::Result;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file (default is `kpi.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,
}

pub fn validate_config<H: Host>(host: &mut H, args: &ValidateArgs) -> Result<()> {
    match Config::load(Utf8Path::new("."), args.config.as_deref()) {
        Ok((config, source)) => {
            let _ = writeln!(host.output(), "Configuration file is valid");
            if let Some(path) = source {
                let _ = writeln!(host.output(), "Config file: {path}");
            } else {
                let _ = writeln!(host.output(), "Using default configuration (no config file found)");
            }
            let _ = writeln!(
                host.output(),
                "Host: {}, test run filter: {}, defect filter: {}, excluded prefix: '{}'",
                config.host_domain,
                config.testrun_filter_id,
                config.defect_filter_id,
                config.excluded_prefix
            );
            Ok(())
        }
        Err(e) => {
            let _ = writeln!(host.error(), "❌ Configuration validation failed: {e}");
            host.exit(1);
            Err(e)
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::commands::host::TestHost;
    use crate::commands::init::{InitArgs, init_config};

    fn write_config(dir: &tempfile::TempDir, name: &str, contents: &str) -> Utf8PathBuf {
        let path = Utf8PathBuf::try_from(dir.path().join(name)).unwrap();
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_generated_config_is_valid() {
        let tmp = tempfile::tempdir().unwrap();
        let config_path = Utf8PathBuf::try_from(tmp.path().join("kpi.toml")).unwrap();

        let mut init_host = TestHost::new();
        init_config(&mut init_host, &InitArgs { output: Some(config_path.clone()) }).unwrap();

        let mut host = TestHost::new();
        let result = validate_config(&mut host, &ValidateArgs { config: Some(config_path) });

        assert!(result.is_ok(), "Default configuration should validate successfully: {result:?}");
        assert!(host.output_text().contains("Configuration file is valid"));
        assert_eq!(host.exit_code, None);
    }

    #[test]
    fn test_invalid_toml_syntax() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_config(&tmp, "invalid.toml", "host_domain = \"https://x.jamacloud.com\n");

        let mut host = TestHost::new();
        let result = validate_config(&mut host, &ValidateArgs { config: Some(path) });

        assert!(result.is_err());
        assert_eq!(host.exit_code, Some(1));
        assert!(host.error_text().contains("Configuration validation failed"));
    }

    #[test]
    fn test_unknown_field() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_config(&tmp, "unknown.toml", "unknown_field = \"value\"\n");

        let mut host = TestHost::new();
        assert!(validate_config(&mut host, &ValidateArgs { config: Some(path) }).is_err());
    }

    #[test]
    fn test_credentials_are_not_accepted_in_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_config(&tmp, "secret.toml", "client_secret = \"hunter2\"\n");

        let mut host = TestHost::new();
        assert!(validate_config(&mut host, &ValidateArgs { config: Some(path) }).is_err());
    }

    #[test]
    fn test_out_of_range_values() {
        let tmp = tempfile::tempdir().unwrap();
        for (name, contents) in [
            ("zero_filter.toml", "testrun_filter_id = 0\n"),
            ("empty_prefix.toml", "excluded_prefix = \"\"\n"),
            ("bad_host.toml", "host_domain = \"jama\"\n"),
            ("page.toml", "page_size = 0\n"),
        ] {
            let path = write_config(&tmp, name, contents);
            let mut host = TestHost::new();
            assert!(validate_config(&mut host, &ValidateArgs { config: Some(path) }).is_err(), "{name} should fail");
        }
    }

    #[test]
    fn test_empty_config_is_valid() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_config(&tmp, "empty.toml", "# Empty config file\n");

        let mut host = TestHost::new();
        let result = validate_config(&mut host, &ValidateArgs { config: Some(path) });

        assert!(result.is_ok(), "Empty config should be valid (uses defaults)");
    }
}
