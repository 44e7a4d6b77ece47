// src/cli.rs

use crate::app::ScanSettings;
use crate::core::models::{ScanConfig, DEFAULT_QUEUE_CAPACITY};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "oob-prober",
    about = "Fire-and-forget HTTP probes that point targets at a collaborator host",
    version
)]
pub struct Cli {
    /// log file (default: oob-prober.log in the local data directory)
    #[arg(long, global = true)]
    pub log: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send one probe per target port and path
    Scan(ScanArgs),
    /// Turn an nmap XML report into a domain file
    ImportNmap(ImportNmapArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// file with `<domain> <port>[,<port>...]` lines
    #[arg(short = 'd', long = "domains", default_value = "domains.txt")]
    pub domain_file: PathBuf,

    /// file with one path per line
    #[arg(short = 'p', long = "paths", default_value = "paths.txt")]
    pub path_file: PathBuf,

    /// collaborator host written into the Host header
    #[arg(short = 'c', long = "collaborator")]
    pub collaborator: String,

    /// HTTP method
    #[arg(short = 'm', long, default_value = "GET")]
    pub method: String,

    /// number of worker threads
    #[arg(short = 'j', long = "threads", default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    pub threads: u32,

    /// pending job queue size
    #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,
}

#[derive(Args, Debug, Clone)]
pub struct ImportNmapArgs {
    /// nmap XML report (`nmap -oX`)
    pub report: PathBuf,

    /// keep open ports of this protocol only
    #[arg(long, default_value = "tcp")]
    pub protocol: String,

    /// write the domain file here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl From<ScanArgs> for ScanSettings {
    fn from(args: ScanArgs) -> Self {
        ScanSettings {
            domain_file: args.domain_file,
            path_file: args.path_file,
            config: ScanConfig {
                threads: args.threads as usize,
                method: args.method,
                collaborator_host: args.collaborator,
                queue_capacity: args.queue_capacity,
                ..ScanConfig::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_defaults_follow_original_flags() {
        let cli = Cli::try_parse_from(["oob-prober", "scan", "-c", "col.example"]).unwrap();
        let Commands::Scan(args) = cli.command else {
            panic!("expected scan");
        };
        let settings = ScanSettings::from(args);
        assert_eq!(settings.domain_file, PathBuf::from("domains.txt"));
        assert_eq!(settings.path_file, PathBuf::from("paths.txt"));
        assert_eq!(settings.config.threads, 5);
        assert_eq!(settings.config.method, "GET");
        assert_eq!(settings.config.collaborator_host, "col.example");
        assert_eq!(settings.config.queue_capacity, 8192);
        assert_eq!(settings.config.dial_timeout_ms, 5_000);
        assert_eq!(settings.config.linger_ms, 10);
    }

    #[test]
    fn collaborator_is_required_and_threads_positive() {
        assert!(Cli::try_parse_from(["oob-prober", "scan"]).is_err());
        assert!(Cli::try_parse_from(["oob-prober", "scan", "-c", "x", "-j", "0"]).is_err());
        assert!(Cli::try_parse_from(["oob-prober", "scan", "-c", "x", "-j", "4096"]).is_ok());
    }

    #[test]
    fn global_log_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["oob-prober", "import-nmap", "scan.xml", "--log", "run.log"]).unwrap();
        assert_eq!(cli.log, Some(PathBuf::from("run.log")));
        let Commands::ImportNmap(args) = cli.command else {
            panic!("expected import-nmap");
        };
        assert_eq!(args.protocol, "tcp");
        assert_eq!(args.report, PathBuf::from("scan.xml"));
    }
}
