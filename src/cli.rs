use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Plain,
    Jsonl,
    Csv,
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct CliOptions {
    /// File to tail
    #[arg(short, long, required_unless_present = "list")]
    pub input: Option<PathBuf>,

    /// Number of lines to return (zero or negative for all)
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    pub lines: Option<i64>,

    /// Only return lines containing one of these substrings (comma-separated list)
    #[arg(short, long = "match", value_delimiter = ',')]
    pub matches: Vec<String>,

    /// Match substrings case-insensitively
    #[arg(long)]
    pub ignore_case: bool,

    /// Also return lines matching this regular expression (repeatable)
    #[arg(long)]
    pub regex: Vec<String>,

    /// Bytes read per chunk (overrides config when set)
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Optional path to config file (YAML)
    #[arg(long)]
    pub config_path: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    pub format: OutputFormat,

    /// Host name recorded in jsonl/csv output
    #[arg(long)]
    pub host: Option<String>,

    /// Read the whole file forward and print lines in file order
    #[arg(long)]
    pub forward: bool,

    /// List files under the configured path prefixes and exit
    #[arg(long)]
    pub list: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

pub fn parse() -> CliOptions {
    CliOptions::parse()
}

#[cfg(test)]
mod tests {
    use super::CliOptions;
    use clap::Parser;

    #[test]
    fn parses_match_list() {
        let opts = CliOptions::try_parse_from([
            "revtail",
            "--input",
            "app.log",
            "--match",
            "cache,thing",
            "--ignore-case",
        ])
        .expect("parse");
        assert_eq!(opts.matches, vec!["cache", "thing"]);
        assert!(opts.ignore_case);
    }

    #[test]
    fn parses_negative_lines() {
        let opts = CliOptions::try_parse_from(["revtail", "-i", "app.log", "-n", "-1"])
            .expect("parse");
        assert_eq!(opts.lines, Some(-1));
    }

    #[test]
    fn input_required_unless_listing() {
        assert!(CliOptions::try_parse_from(["revtail"]).is_err());
        let opts = CliOptions::try_parse_from(["revtail", "--list"]).expect("parse");
        assert!(opts.list);
        assert!(opts.input.is_none());
    }
}
