//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["forum.toml", ".forum.toml"];
const ENV_PREFIX: &str = "PHILOSOPHER_FORUM_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment: `PHILOSOPHER_FORUM_FORUM__MODE=debate` etc.
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./forum.toml` or `./.forum.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/philosopher-forum/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(
            Self::global_config_path().as_deref(),
            Self::project_config_path().as_deref(),
            config_path.map(PathBuf::as_path),
        )
        .extract()
        .map_err(Box::new)
    }

    fn figment(global: Option<&Path>, project: Option<&Path>, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(path) = global
            && path.exists()
        {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = project {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/philosopher-forum/config.toml if set,
    /// otherwise falls back to ~/.config/philosopher-forum/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("philosopher-forum").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");

        println!("  [ ENV ] Variables prefixed {}", ENV_PREFIX);

        if let Some(path) = config_path {
            let marker = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{:<5}] Explicit: {}", marker, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./forum.toml or ./.forum.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorProvider;
    use figment::Jail;
    use forum_domain::ForumMode;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.forum.hard_round_ceiling, 20);
        assert_eq!(config.generator.provider, GeneratorProvider::Template);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("philosopher-forum"));
    }

    #[test]
    fn test_layers_merge_in_priority_order() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "global.toml",
                r#"
[forum]
mode = "consensus"
hard_round_ceiling = 30
"#,
            )?;
            jail.create_file(
                "forum.toml",
                r#"
[forum]
hard_round_ceiling = 8
"#,
            )?;
            jail.create_file(
                "explicit.toml",
                r#"
[forum]
max_speakers_per_round = 1
"#,
            )?;

            let config: FileConfig = ConfigLoader::figment(
                Some(Path::new("global.toml")),
                Some(Path::new("forum.toml")),
                Some(Path::new("explicit.toml")),
            )
            .extract()?;

            assert_eq!(config.forum.mode, ForumMode::Consensus);
            assert_eq!(config.forum.hard_round_ceiling, 8);
            assert_eq!(config.forum.max_speakers_per_round, 1);
            assert_eq!(config.forum.cooldown_rounds, 1);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_files() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "forum.toml",
                r#"
[forum]
mode = "consensus"
"#,
            )?;
            jail.set_env("PHILOSOPHER_FORUM_FORUM__MODE", "debate");
            jail.set_env("PHILOSOPHER_FORUM_GENERATOR__TIMEOUT_SECONDS", "15");

            let config: FileConfig =
                ConfigLoader::figment(None, Some(Path::new("forum.toml")), None).extract()?;

            assert_eq!(config.forum.mode, ForumMode::Debate);
            assert_eq!(config.generator.timeout_seconds, 15);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_value_is_an_error() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "forum.toml",
                r#"
[forum]
mode = "shouting"
"#,
            )?;
            let result: Result<FileConfig, _> =
                ConfigLoader::figment(None, Some(Path::new("forum.toml")), None).extract();
            assert!(result.is_err());
            Ok(())
        });
    }
}
