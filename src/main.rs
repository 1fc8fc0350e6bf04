use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, warn};

use revtail::{
    cli,
    config,
    filter::{FilterSet, MatchAnySubstring, MatchRegex},
    forward,
    listing,
    logging,
    output::{self, OutputKind},
    source::RawFileSource,
    tail,
};

fn main() -> Result<()> {
    let cli_opts = cli::parse();
    logging::init_logging(cli_opts.log_json);

    let loaded = config::load_config(cli_opts.config_path.as_deref())?;
    let mut cfg = loaded.config;
    if let Some(chunk_size) = cli_opts.chunk_size {
        anyhow::ensure!(chunk_size > 0, "--chunk-size must be positive");
        cfg.chunk_size = Some(chunk_size);
    }

    if cli_opts.list {
        if cfg.path_prefixes.is_empty() {
            warn!("no path prefixes configured; nothing to list");
        }
        for path in listing::list_prefixes(&cfg.path_prefixes) {
            println!("{}", path.display());
        }
        return Ok(());
    }

    let Some(input) = cli_opts.input.as_deref() else {
        anyhow::bail!("--input is required");
    };
    if cfg.path_prefixes.is_empty() {
        warn!("no path prefixes configured; any readable path may be tailed");
    }
    listing::ensure_allowed(input, &cfg.path_prefixes)?;

    let case_sensitive = cfg.case_sensitive && !cli_opts.ignore_case;
    let mut filters = FilterSet::new();
    if !cli_opts.matches.is_empty() {
        filters = filters.with_filter(
            MatchAnySubstring::new(cli_opts.matches.iter().cloned())
                .with_case_sensitivity(case_sensitive),
        );
    }
    for pattern in &cli_opts.regex {
        let filter =
            MatchRegex::new(pattern).with_context(|| format!("invalid --regex {pattern}"))?;
        filters = filters.with_filter(filter);
    }
    let filters = Arc::new(filters);

    let options = cfg.tail_options(cli_opts.lines);
    let host = cli_opts.host.clone().unwrap_or_else(output::hostname);
    let kind = match cli_opts.format {
        cli::OutputFormat::Plain => OutputKind::Plain,
        cli::OutputFormat::Jsonl => OutputKind::Jsonl,
        cli::OutputFormat::Csv => OutputKind::Csv,
    };
    let mut sink = output::build_sink(kind, &host, Box::new(std::io::stdout()));

    info!(
        "tail request path={} max_lines={} filters={} case_sensitive={} chunk_size={} config_hash={}",
        input.display(),
        options.max_lines,
        filters.len(),
        case_sensitive,
        options.chunk_size,
        loaded.config_hash
    );

    let start = Instant::now();
    let mut line_bytes_out = 0u64;

    if cli_opts.forward {
        for line in forward::tail_lines_forward(input, options.max_lines, &filters)? {
            line_bytes_out += line.len() as u64;
            sink.write_line(&line)?;
        }
        sink.flush()?;
        info!(
            "forward read done line_bytes_out={} took={:?}",
            line_bytes_out,
            start.elapsed()
        );
        return Ok(());
    }

    let source = RawFileSource::open(input)?;
    let stream = tail::scan(source, &options, filters);

    let canceller = stream.canceller();
    if let Err(err) = ctrlc::set_handler(move || canceller.cancel()) {
        warn!("failed to install Ctrl+C handler: {err}");
    }

    for line in stream.lines() {
        line_bytes_out += line.len() as u64;
        sink.write_line(&line)?;
    }
    sink.flush()?;

    let stats = stream.finish()?;
    info!(
        "tail done outcome={:?} lines={} chunks_read={} bytes_read={} line_bytes_out={} took={:?}",
        stats.outcome,
        stats.lines_emitted,
        stats.chunks_read,
        stats.bytes_read,
        line_bytes_out,
        start.elapsed()
    );
    Ok(())
}
