//! Run configuration: built-in defaults, optional TOML file, CLI flags.
//!
//! Later layers win. Running with no file and no flags reproduces the
//! default migration of the standalone install into the Steam library.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use dsomig_io_fs::{EnumCopySymlinkStrategy, SpecCopyOptions};
use serde::Deserialize;

use crate::error::{MigrateError, Result};
use crate::migrator::MigrationOptions;
use crate::paths::{DEFAULT_DESTINATION, DEFAULT_SOURCE};

pub const DEFAULT_LOG_FILTER: &str = "debug";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SymlinkMode {
    /// Copy what the link points to.
    #[default]
    Dereference,
    /// Recreate the link itself.
    Copy,
    /// Leave links out.
    Skip,
}

impl From<SymlinkMode> for EnumCopySymlinkStrategy {
    fn from(mode: SymlinkMode) -> Self {
        match mode {
            SymlinkMode::Dereference => EnumCopySymlinkStrategy::Dereference,
            SymlinkMode::Copy => EnumCopySymlinkStrategy::CopySymlinks,
            SymlinkMode::Skip => EnumCopySymlinkStrategy::SkipSymlinks,
        }
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "dsomig", version)]
#[command(about = "Move a Drakensang Online installation into the Steam library")]
pub struct CliArgs {
    /// TOML file with run settings
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Existing installation to move
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Where the installation should end up
    #[arg(long)]
    pub destination: Option<PathBuf>,

    /// Start-Menu entry to remove
    #[arg(long, conflicts_with = "no_shortcut")]
    pub shortcut: Option<PathBuf>,

    /// Leave the Start-Menu entry alone
    #[arg(long)]
    pub no_shortcut: bool,

    /// Keep the old installation if any file failed to copy
    #[arg(long)]
    pub require_complete_copy: bool,

    /// Walk and log without touching the filesystem
    #[arg(long)]
    pub dry_run: bool,

    /// Glob patterns (file or directory names) to leave out of the copy
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    #[arg(long, value_enum)]
    pub symlinks: Option<SymlinkMode>,

    /// Skip the key-press prompt
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long)]
    pub log_filter: Option<String>,
}

/// Contents of the optional TOML file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub source: Option<PathBuf>,
    pub destination: Option<PathBuf>,
    pub shortcut: Option<PathBuf>,
    pub skip_shortcut: Option<bool>,
    pub require_complete_copy: Option<bool>,
    pub dry_run: Option<bool>,
    pub exclude: Option<Vec<String>>,
    pub symlinks: Option<SymlinkMode>,
    pub log_filter: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| MigrateError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|source| MigrateError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrateConfig {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub shortcut: Option<PathBuf>,
    pub require_complete_copy: bool,
    pub dry_run: bool,
    pub exclude: Vec<String>,
    pub symlinks: SymlinkMode,
}

impl MigrateConfig {
    /// Merge defaults, file and CLI. `default_shortcut` is only called when
    /// neither layer names a shortcut and none of them disables it.
    pub fn resolve(
        cli_args: &CliArgs,
        file_config: &FileConfig,
        default_shortcut: impl FnOnce() -> Option<PathBuf>,
    ) -> Self {
        let if_skip_shortcut = cli_args.no_shortcut || file_config.skip_shortcut.unwrap_or(false);
        let shortcut = if if_skip_shortcut {
            None
        } else {
            cli_args
                .shortcut
                .clone()
                .or_else(|| file_config.shortcut.clone())
                .or_else(default_shortcut)
        };

        let exclude = if cli_args.exclude.is_empty() {
            file_config.exclude.clone().unwrap_or_default()
        } else {
            cli_args.exclude.clone()
        };

        Self {
            source: cli_args
                .source
                .clone()
                .or_else(|| file_config.source.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE)),
            destination: cli_args
                .destination
                .clone()
                .or_else(|| file_config.destination.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DESTINATION)),
            shortcut,
            require_complete_copy: cli_args.require_complete_copy
                || file_config.require_complete_copy.unwrap_or(false),
            dry_run: cli_args.dry_run || file_config.dry_run.unwrap_or(false),
            exclude,
            symlinks: cli_args
                .symlinks
                .or(file_config.symlinks)
                .unwrap_or_default(),
        }
    }

    pub fn migration_options(&self) -> MigrationOptions {
        MigrationOptions {
            spec_cp_options: SpecCopyOptions {
                patterns_exclude: (!self.exclude.is_empty()).then(|| self.exclude.clone()),
                rule_symlink: self.symlinks.into(),
                if_dry_run: self.dry_run,
            },
            require_complete_copy: self.require_complete_copy,
        }
    }
}

/// Log filter for this run: CLI, then file, then [`DEFAULT_LOG_FILTER`].
pub fn resolve_log_filter(cli_args: &CliArgs, file_config: &FileConfig) -> String {
    cli_args
        .log_filter
        .clone()
        .or_else(|| file_config.log_filter.clone())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use clap::Parser;
    use dsomig_io_fs::EnumCopySymlinkStrategy;

    use super::{CliArgs, FileConfig, MigrateConfig, SymlinkMode, resolve_log_filter};
    use crate::paths::{DEFAULT_DESTINATION, DEFAULT_SOURCE};

    fn parse_cli(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("dsomig").chain(args.iter().copied()))
            .expect("parse cli")
    }

    #[test]
    fn no_flags_and_no_file_gives_hard_coded_defaults() {
        let config = MigrateConfig::resolve(&parse_cli(&[]), &FileConfig::default(), || {
            Some(PathBuf::from("/home/nexus/menu"))
        });

        assert_eq!(config.source, PathBuf::from(DEFAULT_SOURCE));
        assert_eq!(config.destination, PathBuf::from(DEFAULT_DESTINATION));
        assert_eq!(config.shortcut, Some(PathBuf::from("/home/nexus/menu")));
        assert!(!config.require_complete_copy);
        assert!(!config.dry_run);
        assert_eq!(config.symlinks, SymlinkMode::Dereference);
        assert_eq!(resolve_log_filter(&parse_cli(&[]), &FileConfig::default()), "debug");
    }

    #[test]
    fn file_values_apply_and_cli_overrides_them() {
        let file_config = FileConfig::parse(
            r#"
                source = "D:/Games/DSO"
                destination = "E:/Steam/common/DSO"
                exclude = ["*.log"]
                symlinks = "skip"
                log_filter = "info"
            "#,
            Path::new("dsomig.toml"),
        )
        .expect("parse file");

        let cli_args = parse_cli(&["--destination", "F:/DSO", "--exclude", "cache,*.tmp"]);
        let config = MigrateConfig::resolve(&cli_args, &file_config, || None);

        assert_eq!(config.source, PathBuf::from("D:/Games/DSO"));
        assert_eq!(config.destination, PathBuf::from("F:/DSO"));
        assert_eq!(config.exclude, vec!["cache".to_string(), "*.tmp".to_string()]);
        assert_eq!(config.symlinks, SymlinkMode::Skip);
        assert_eq!(resolve_log_filter(&cli_args, &file_config), "info");

        let options = config.migration_options();
        assert_eq!(
            options.spec_cp_options.rule_symlink,
            EnumCopySymlinkStrategy::SkipSymlinks
        );
        assert_eq!(options.spec_cp_options.patterns_exclude.map(|v| v.len()), Some(2));
    }

    #[test]
    fn skipping_shortcut_never_resolves_the_default() {
        let file_config = FileConfig {
            skip_shortcut: Some(true),
            ..FileConfig::default()
        };
        let config = MigrateConfig::resolve(&parse_cli(&[]), &file_config, || {
            panic!("default shortcut must not be resolved")
        });
        assert_eq!(config.shortcut, None);

        let cli_args = parse_cli(&["--no-shortcut"]);
        let config = MigrateConfig::resolve(&cli_args, &FileConfig::default(), || {
            panic!("default shortcut must not be resolved")
        });
        assert_eq!(config.shortcut, None);
    }

    #[test]
    fn shortcut_and_no_shortcut_conflict() {
        let res = CliArgs::try_parse_from(["dsomig", "--shortcut", "/x", "--no-shortcut"]);
        assert!(res.is_err());
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let err = FileConfig::parse("sourse = \"typo\"", Path::new("dsomig.toml"))
            .expect_err("unknown key must fail");
        assert!(err.to_string().contains("dsomig.toml"));
    }

    #[test]
    fn flags_enable_guard_and_dry_run() {
        let config = MigrateConfig::resolve(
            &parse_cli(&["--require-complete-copy", "--dry-run", "-y"]),
            &FileConfig::default(),
            || None,
        );
        assert!(config.require_complete_copy);
        assert!(config.dry_run);
        assert!(config.migration_options().require_complete_copy);
        assert!(config.migration_options().spec_cp_options.if_dry_run);
    }
}
