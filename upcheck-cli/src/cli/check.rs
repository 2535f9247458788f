//! Default command - check a cluster and report

use super::Cli;
use anyhow::{Context, Result};
use console::style;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};
use upcheck::client::{Fetcher, HttpFetcher, SnapshotFetcher};
use upcheck::config::{load_config, ProjectConfig};
use upcheck::models::{ClusterReport, Severity};
use upcheck::reporters::{self, OutputFormat};
use upcheck::rules::{default_rules, Rule};
use upcheck::RunOptions;

/// Flags merged with config: CLI (and UPCHECK_URL) over config file over defaults
#[derive(Debug)]
struct Resolved {
    url: String,
    timeout_secs: u64,
    format: OutputFormat,
    fail_on: Option<Severity>,
    skip_rules: Vec<String>,
}

fn resolve(cli: &Cli, config: &ProjectConfig) -> Result<Resolved> {
    let url = cli.url.clone().unwrap_or_else(|| config.url().to_string());
    let timeout_secs = cli.timeout.unwrap_or_else(|| config.timeout_secs());

    let format = match cli.format.as_deref().or(config.defaults.format.as_deref()) {
        Some(f) => OutputFormat::from_str(f)?,
        None => OutputFormat::default(),
    };

    let fail_on = match cli.fail_on.as_deref() {
        Some(s) => Some(Severity::from_str(s)?),
        None => config.defaults.fail_on,
    };

    let mut skip_rules = config.rules.skip.clone();
    for id in &cli.skip_rules {
        if !skip_rules.contains(id) {
            skip_rules.push(id.clone());
        }
    }

    let catalog = default_rules();
    let known: Vec<&str> = catalog.iter().map(|r| r.id()).collect();
    for id in &skip_rules {
        if !known.contains(&id.as_str()) {
            warn!("Unknown rule id `{}` in skip list (see `upcheck rules`)", id);
        }
    }

    Ok(Resolved {
        url,
        timeout_secs,
        format,
        fail_on,
        skip_rules,
    })
}

/// Whether the cluster grade reaches the `--fail-on` threshold
fn should_fail(fail_on: Option<Severity>, report: &ClusterReport) -> bool {
    match fail_on {
        Some(threshold) => report.severity != Severity::Ok && report.severity >= threshold,
        None => false,
    }
}

fn check_fail_threshold(fail_on: Option<Severity>, report: &ClusterReport) {
    if should_fail(fail_on, report) {
        if let Some(threshold) = fail_on {
            eprintln!(
                "Failing due to --fail-on={} threshold (cluster is {})",
                threshold, report.severity
            );
        }
        std::process::exit(1);
    }
}

fn write_output(output: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            std::fs::write(p, output)
                .with_context(|| format!("Failed to write report to {}", p.display()))?;
            // stderr keeps stdout clean for machine-readable formats
            eprintln!("Report written to: {}", style(p.display()).cyan());
        }
        None => println!("{}", output),
    }
    Ok(())
}

/// Run the check command
pub fn run(cli: &Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let config = load_config(&cwd, cli.config.as_deref());
    let settings = resolve(cli, &config)?;
    debug!("Resolved options: {:?}", settings);

    let fetcher: Box<dyn Fetcher> = match (&cli.nodes_file, &cli.stats_file) {
        (Some(info), Some(stats)) => Box::new(SnapshotFetcher::new(info, stats)),
        _ => {
            let http = HttpFetcher::new(&settings.url, settings.timeout_secs);
            info!("Checking cluster at {}", http.base_url());
            Box::new(http)
        }
    };

    let options = RunOptions {
        skip_rules: settings.skip_rules.clone(),
    };
    let report = upcheck::run(fetcher.as_ref(), &options)?;

    let output = reporters::report_with_format(&report, settings.format)?;
    write_output(&output, cli.output.as_deref())?;

    check_fail_threshold(settings.fail_on, &report);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use upcheck::config::{CliDefaults, ClusterConfig, RulesConfig};
    use upcheck::models::NodeReport;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["upcheck"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    fn config() -> ProjectConfig {
        ProjectConfig {
            cluster: ClusterConfig {
                url: Some("http://from-config:9200".into()),
                timeout_secs: Some(7),
            },
            rules: RulesConfig {
                skip: vec!["heap-size".into()],
            },
            defaults: CliDefaults {
                format: Some("json".into()),
                fail_on: Some(Severity::Critical),
            },
        }
    }

    #[test]
    fn test_config_fills_missing_flags() {
        let settings = resolve(&parse(&[]), &config()).unwrap();
        assert_eq!(settings.timeout_secs, 7);
        assert_eq!(settings.format, OutputFormat::Json);
        assert_eq!(settings.fail_on, Some(Severity::Critical));
        assert_eq!(settings.skip_rules, vec!["heap-size"]);
    }

    #[test]
    fn test_flags_override_config() {
        let cli = parse(&[
            "--url",
            "http://flag:9200",
            "--timeout",
            "3",
            "-f",
            "text",
            "--fail-on",
            "warn",
            "--skip-rule",
            "mlockall",
            "--skip-rule",
            "heap-size",
        ]);
        let settings = resolve(&cli, &config()).unwrap();
        assert_eq!(settings.url, "http://flag:9200");
        assert_eq!(settings.timeout_secs, 3);
        assert_eq!(settings.format, OutputFormat::Text);
        assert_eq!(settings.fail_on, Some(Severity::Warn));
        assert_eq!(settings.skip_rules, vec!["heap-size", "mlockall"]);
    }

    #[test]
    fn test_defaults_without_config() {
        let settings = resolve(&parse(&[]), &ProjectConfig::default()).unwrap();
        assert_eq!(settings.format, OutputFormat::Text);
        assert_eq!(settings.fail_on, None);
        assert!(settings.skip_rules.is_empty());
    }

    #[test]
    fn test_bad_format_in_config_is_an_error() {
        let mut config = ProjectConfig::default();
        config.defaults.format = Some("xml".into());
        assert!(resolve(&parse(&[]), &config).is_err());
    }

    #[test]
    fn test_should_fail() {
        let ok = ClusterReport::new(vec![NodeReport::new("a", vec![])]);
        let mut warn = ok.clone();
        warn.severity = Severity::Warn;
        let mut critical = ok.clone();
        critical.severity = Severity::Critical;

        assert!(!should_fail(None, &critical));
        assert!(!should_fail(Some(Severity::Critical), &warn));
        assert!(should_fail(Some(Severity::Critical), &critical));
        assert!(should_fail(Some(Severity::Warn), &warn));
        assert!(should_fail(Some(Severity::Warn), &critical));
        assert!(!should_fail(Some(Severity::Ok), &ok));
    }
}
