//! Command-line flags and the run configuration they override.

use clap::Parser;
use euler::output::Operator;
use euler::reconcile::{SymbolNormalizer, TieBreak};
use euler::{PipelineConfig, Region};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "euler")]
#[command(about = "Euler: security master reconciliation and upload builder", long_about = None)]
#[command(version)]
pub(crate) struct Cli {
    /// Directory holding the input files
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Directory the upload files are written to
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Operator first name, used in upload file names
    #[arg(long)]
    pub first_name: Option<String>,

    /// Operator last name, used in upload file names
    #[arg(long)]
    pub last_name: Option<String>,

    /// Region whose exchanges are eligible (north-america, united-states, canada)
    #[arg(long)]
    pub region: Option<Region>,

    /// Exchange domicile to include; repeatable, replaces --region
    #[arg(long = "country")]
    pub countries: Vec<String>,

    /// Strip this character from symbols instead of lowercase letters
    #[arg(long)]
    pub strip_char: Option<char>,

    /// Use the first row when an attribute or exchange key is duplicated
    #[arg(long)]
    pub first_match: bool,

    /// Also write a JSON run report
    #[arg(long)]
    pub report_json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Settings for one invocation.
#[derive(Debug, Clone)]
pub(crate) struct RunConfig {
    /// Directory holding the input files.
    pub data_dir: PathBuf,
    /// Directory the upload files are written to.
    pub output_dir: PathBuf,
    /// Operator named in the upload files.
    pub operator: Operator,
    /// Library settings.
    pub pipeline: PipelineConfig,
    /// Whether to write the JSON run report.
    pub report_json: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("."),
            operator: Operator::new("firstname", "lastname"),
            pipeline: PipelineConfig::default(),
            report_json: false,
        }
    }
}

impl From<Cli> for RunConfig {
    fn from(cli: Cli) -> Self {
        let mut config = Self::default();

        if let Some(dir) = cli.data_dir {
            config.data_dir = dir;
        }
        if let Some(dir) = cli.output_dir {
            config.output_dir = dir;
        }
        if let Some(first_name) = cli.first_name {
            config.operator.first_name = first_name;
        }
        if let Some(last_name) = cli.last_name {
            config.operator.last_name = last_name;
        }

        if !cli.countries.is_empty() {
            config.pipeline.countries = cli.countries;
        } else if let Some(region) = cli.region {
            config.pipeline.countries = PipelineConfig::for_region(region).countries;
        }
        if let Some(noise) = cli.strip_char {
            config.pipeline.normalizer = SymbolNormalizer::StripChar(noise);
        }
        if cli.first_match {
            config.pipeline.tie_break = TieBreak::FirstMatch;
        }
        config.report_json = cli.report_json;

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> RunConfig {
        let cli =
            Cli::try_parse_from(std::iter::once("euler").chain(args.iter().copied())).unwrap();
        RunConfig::from(cli)
    }

    #[test]
    fn test_defaults_without_arguments() {
        let config = parse(&[]);

        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.operator, Operator::new("firstname", "lastname"));
        assert_eq!(config.pipeline, PipelineConfig::default());
        assert!(!config.report_json);
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = parse(&[
            "--data-dir",
            "inputs",
            "--output-dir",
            "out",
            "--first-name",
            "Ada",
            "--last-name",
            "Lovelace",
            "--strip-char",
            "p",
            "--first-match",
            "--report-json",
        ]);

        assert_eq!(config.data_dir, PathBuf::from("inputs"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.operator, Operator::new("Ada", "Lovelace"));
        assert_eq!(config.pipeline.normalizer, SymbolNormalizer::StripChar('p'));
        assert_eq!(config.pipeline.tie_break, TieBreak::FirstMatch);
        assert!(config.report_json);
    }

    #[rstest]
    #[case(&["--region", "canada"], &["Canada"])]
    #[case(&["--region", "united-states"], &["United States"])]
    #[case(&["--country", "Mexico", "--country", "Canada"], &["Mexico", "Canada"])]
    #[case(&["--region", "canada", "--country", "Mexico"], &["Mexico"])]
    fn test_geography_flags(#[case] args: &[&str], #[case] expected: &[&str]) {
        assert_eq!(parse(args).pipeline.countries, expected);
    }

    #[test]
    fn test_unknown_region_is_rejected() {
        assert!(Cli::try_parse_from(["euler", "--region", "europe"]).is_err());
    }
}
