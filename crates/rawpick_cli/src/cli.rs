use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use rawpick_fs::{C_EXTENSION_DEFAULT, EnumPickConflictStrategy, SpecPickOptions};
use rawpick_log::{C_LOG_FILE_DEFAULT, SpecLogOptions};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Copy the listed RAW images from a source folder to a destination folder"
)]
pub struct Cli {
    /// Folder holding the images (not searched recursively).
    #[arg(long, short = 's')]
    pub source: PathBuf,

    /// Folder receiving the copies. Must already exist.
    #[arg(long, short = 'd')]
    pub destination: PathBuf,

    /// Filenames, with or without extension.
    pub names: Vec<String>,

    /// Read filenames from this file, one per line (`-` for stdin).
    /// Stdin is read when no names are given at all.
    #[arg(long, short = 'f', value_name = "FILE")]
    pub from_file: Option<PathBuf>,

    /// Extension of eligible files, matched case-insensitively.
    #[arg(long, short = 'e', default_value = C_EXTENSION_DEFAULT)]
    pub extension: String,

    /// What to do when the destination file already exists.
    #[arg(long, value_enum, default_value_t = ConflictArg::Overwrite)]
    pub on_conflict: ConflictArg,

    /// Match and report without copying anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Append log lines to this file.
    #[arg(long, default_value = C_LOG_FILE_DEFAULT)]
    pub log_file: PathBuf,

    /// Do not write a log file.
    #[arg(long, conflicts_with = "log_file")]
    pub no_log_file: bool,

    /// Mirror log lines to stderr at debug level.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConflictArg {
    Overwrite,
    Skip,
    Error,
}

impl From<ConflictArg> for EnumPickConflictStrategy {
    fn from(value: ConflictArg) -> Self {
        match value {
            ConflictArg::Overwrite => Self::Overwrite,
            ConflictArg::Skip => Self::Skip,
            ConflictArg::Error => Self::Error,
        }
    }
}

impl Cli {
    pub fn pick_options(&self) -> SpecPickOptions {
        SpecPickOptions {
            extension: self.extension.clone(),
            rule_conflict: self.on_conflict.into(),
            if_dry_run: self.dry_run,
        }
    }

    pub fn log_options(&self) -> SpecLogOptions {
        SpecLogOptions {
            path_file_log: (!self.no_log_file).then(|| self.log_file.clone()),
            level: if self.verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Info
            },
            if_mirror_stderr: self.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;
    use rawpick_fs::EnumPickConflictStrategy;

    use super::Cli;

    #[test]
    fn defaults_match_library_defaults() {
        let cli = Cli::try_parse_from(["rawpick", "-s", "in", "-d", "out", "IMG_1"]).unwrap();
        let spec_pick_options = cli.pick_options();
        assert_eq!(spec_pick_options.extension, "cr2");
        assert_eq!(
            spec_pick_options.rule_conflict,
            EnumPickConflictStrategy::Overwrite
        );
        assert!(!spec_pick_options.if_dry_run);
        assert_eq!(cli.names, vec!["IMG_1"]);

        let spec_log_options = cli.log_options();
        assert_eq!(
            spec_log_options.path_file_log,
            Some(PathBuf::from("file_copy.log"))
        );
        assert!(!spec_log_options.if_mirror_stderr);
    }

    #[test]
    fn flags_map_to_options() {
        let cli = Cli::try_parse_from([
            "rawpick",
            "--source",
            "in",
            "--destination",
            "out",
            "--extension",
            ".NEF",
            "--on-conflict",
            "skip",
            "--dry-run",
            "--no-log-file",
            "-v",
            "-f",
            "-",
        ])
        .unwrap();
        let spec_pick_options = cli.pick_options();
        assert_eq!(spec_pick_options.extension, ".NEF");
        assert_eq!(spec_pick_options.rule_conflict, EnumPickConflictStrategy::Skip);
        assert!(spec_pick_options.if_dry_run);
        assert_eq!(cli.from_file, Some(PathBuf::from("-")));
        assert_eq!(cli.log_options().path_file_log, None);
    }

    #[test]
    fn unknown_conflict_policy_is_rejected() {
        let res = Cli::try_parse_from([
            "rawpick",
            "-s",
            "in",
            "-d",
            "out",
            "--on-conflict",
            "rename",
        ]);
        assert!(res.is_err());
    }
}
