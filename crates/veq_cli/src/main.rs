//! VEQ CLI — the command-line interface for the equivalence prover.
//!
//! Provides `veq prove` to run temporal induction over a JSON netlist and
//! `veq show` to inspect a netlist's modules and markers.

#![warn(missing_docs)]

mod load;
mod prove;
mod show;

use clap::{Parser, Subcommand, ValueEnum};
use std::process;

/// VEQ — a temporal-induction equivalence prover for gate-level netlists.
#[derive(Parser, Debug)]
#[command(name = "veq", version, about = "VEQ equivalence prover")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (per-step progress) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Prove equivalence markers by k-step temporal induction.
    Prove(ProveArgs),
    /// Print a module/cell/marker inventory of a netlist.
    Show(ShowArgs),
}

/// Arguments for the `veq prove` subcommand.
#[derive(Parser, Debug)]
pub struct ProveArgs {
    /// Path to the JSON netlist.
    pub netlist: String,

    /// Maximum induction depth (≥ 1). Overrides the config file.
    #[arg(short = 's', long = "seq", value_parser = clap::value_parser!(u32).range(1..))]
    pub seq: Option<u32>,

    /// Restrict the proof to the named modules (repeatable).
    #[arg(long = "module")]
    pub modules: Vec<String>,

    /// Path to a `veq.toml` configuration file.
    #[arg(long)]
    pub config: Option<String>,

    /// Write the rewritten netlist to this path.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format for diagnostics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `veq show` subcommand.
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Path to the JSON netlist.
    pub netlist: String,
}

/// Diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose progress information.
    pub verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
    };

    let result = match cli.command {
        Command::Prove(ref args) => prove::run(args, &global),
        Command::Show(ref args) => show::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_prove_default() {
        let cli = Cli::parse_from(["veq", "prove", "design.json"]);
        match cli.command {
            Command::Prove(ref args) => {
                assert_eq!(args.netlist, "design.json");
                assert!(args.seq.is_none());
                assert!(args.modules.is_empty());
                assert!(args.config.is_none());
                assert!(args.output.is_none());
                assert_eq!(args.format, ReportFormat::Text);
            }
            _ => panic!("expected Prove command"),
        }
    }

    #[test]
    fn parse_prove_with_seq() {
        let cli = Cli::parse_from(["veq", "prove", "design.json", "--seq", "2"]);
        match cli.command {
            Command::Prove(ref args) => assert_eq!(args.seq, Some(2)),
            _ => panic!("expected Prove command"),
        }
    }

    #[test]
    fn parse_prove_seq_short_flag() {
        let cli = Cli::parse_from(["veq", "prove", "design.json", "-s", "8"]);
        match cli.command {
            Command::Prove(ref args) => assert_eq!(args.seq, Some(8)),
            _ => panic!("expected Prove command"),
        }
    }

    #[test]
    fn parse_prove_rejects_zero_seq() {
        assert!(Cli::try_parse_from(["veq", "prove", "d.json", "--seq", "0"]).is_err());
    }

    #[test]
    fn parse_prove_rejects_malformed_seq() {
        assert!(Cli::try_parse_from(["veq", "prove", "d.json", "--seq", "four"]).is_err());
        assert!(Cli::try_parse_from(["veq", "prove", "d.json", "--seq"]).is_err());
    }

    #[test]
    fn parse_prove_module_selection() {
        let cli = Cli::parse_from([
            "veq", "prove", "d.json", "--module", "top", "--module", "core",
        ]);
        match cli.command {
            Command::Prove(ref args) => assert_eq!(args.modules, vec!["top", "core"]),
            _ => panic!("expected Prove command"),
        }
    }

    #[test]
    fn parse_prove_output_and_format() {
        let cli = Cli::parse_from([
            "veq", "prove", "d.json", "--output", "out.json", "--format", "json",
        ]);
        match cli.command {
            Command::Prove(ref args) => {
                assert_eq!(args.output.as_deref(), Some("out.json"));
                assert_eq!(args.format, ReportFormat::Json);
            }
            _ => panic!("expected Prove command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["veq", "--quiet", "show", "d.json"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        let cli = Cli::parse_from(["veq", "--verbose", "prove", "d.json"]);
        assert!(cli.verbose);
    }

    #[test]
    fn parse_show() {
        let cli = Cli::parse_from(["veq", "show", "d.json"]);
        match cli.command {
            Command::Show(ref args) => assert_eq!(args.netlist, "d.json"),
            _ => panic!("expected Show command"),
        }
    }
}
