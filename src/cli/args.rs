//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `extract`: Extract text into the source locale, optionally rewriting sources
//! - `translate` (`t`): Machine-translate the source locale into target locales
//! - `clean` (`c`): Drop keys missing from the source locale in target locales
//! - `init`: Write a default configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }
}

/// Flags accepted by every command.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Directory to start the config search from (default: current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Locale overrides shared by the locale commands.
#[derive(Debug, Clone, Default, Args)]
pub struct LocaleArgs {
    /// Source language (overrides config file)
    #[arg(long)]
    pub from_lang: Option<String>,

    /// Target languages, comma separated (overrides config file)
    #[arg(long, value_delimiter = ',')]
    pub to: Vec<String>,

    /// Locale output directory (overrides config file)
    #[arg(long)]
    pub output_path: Option<String>,
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    #[command(flatten)]
    pub locale: LocaleArgs,

    /// Rewrite source files in place (overrides config file)
    #[arg(long)]
    pub rewrite: bool,

    /// Skip machine translation after extraction
    #[arg(long)]
    pub no_translate: bool,

    /// Skip pruning target locales after extraction
    #[arg(long)]
    pub no_clean: bool,
}

#[derive(Debug, Args)]
pub struct TranslateCommand {
    #[command(flatten)]
    pub locale: LocaleArgs,
}

#[derive(Debug, Args)]
pub struct CleanCommand {
    #[command(flatten)]
    pub locale: LocaleArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract translatable text into the source locale file
    Extract(ExtractCommand),
    /// Translate missing entries of every target locale
    #[command(alias = "t")]
    Translate(TranslateCommand),
    /// Remove keys that are no longer in the source locale from target locales
    #[command(alias = "c")]
    Clean(CleanCommand),
    /// Initialize a new .i18nrc.json configuration file
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_extract_flags() {
        let args = Arguments::try_parse_from([
            "i18n-extract",
            "extract",
            "--rewrite",
            "--to",
            "en,ja",
            "--no-clean",
            "-v",
        ])
        .unwrap();
        assert!(args.global.verbose);
        let Some(Command::Extract(cmd)) = args.command else {
            panic!("expected extract");
        };
        assert!(cmd.rewrite);
        assert!(cmd.no_clean);
        assert!(!cmd.no_translate);
        assert_eq!(cmd.locale.to, vec!["en", "ja"]);
    }

    #[test]
    fn aliases() {
        let args = Arguments::try_parse_from(["i18n-extract", "t"]).unwrap();
        assert!(matches!(args.command, Some(Command::Translate(_))));
        let args = Arguments::try_parse_from(["i18n-extract", "c", "--from-lang", "en"]).unwrap();
        let Some(Command::Clean(cmd)) = args.command else {
            panic!("expected clean");
        };
        assert_eq!(cmd.locale.from_lang.as_deref(), Some("en"));
    }

    #[test]
    fn verbose_conflicts_with_quiet() {
        assert!(Arguments::try_parse_from(["i18n-extract", "extract", "-v", "-q"]).is_err());
    }

    #[test]
    fn verify_cli() {
        Arguments::command().debug_assert();
    }
}
