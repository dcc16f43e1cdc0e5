//! `veq prove` — run temporal induction over a netlist.
//!
//! The pipeline:
//!
//! 1. Load the configuration (`--config`, or `./veq.toml` when present)
//! 2. Load and intern the JSON netlist
//! 3. Resolve the module selection
//! 4. Run the induction driver
//! 5. Render diagnostics and per-module summaries
//! 6. Write the rewritten netlist when `--output` is given

use crate::load;
use crate::{GlobalArgs, ProveArgs, ReportFormat};
use std::path::Path;
use veq_common::Interner;
use veq_config::VeqConfig;
use veq_diagnostics::{render, DiagnosticSink, Severity};
use veq_induct::{prove_equivalences, InductOptions};
use veq_ir::ModuleId;

/// Runs the `veq prove` command.
///
/// Returns exit code 0 when the run completed; proof failures are outcomes,
/// not errors. Load and configuration problems are fatal.
pub fn run(args: &ProveArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_effective_config(args)?;

    let interner = Interner::new();
    let mut design = load::load_design(Path::new(&args.netlist), &interner)?;

    let selection = resolve_selection(&design, &interner, &args.modules)?;

    let options = InductOptions {
        max_seq: args.seq.unwrap_or(config.prove.depth),
        fallback_keeps_failed_hypothesis: config.prove.fallback_keeps_failed_hypothesis,
        verbose: global.verbose || config.prove.verbose,
    };

    let sink = DiagnosticSink::new();
    let stats = prove_equivalences(
        &mut design,
        &interner,
        selection.as_deref(),
        &options,
        &sink,
    )?;

    let diagnostics = sink.diagnostics();
    match args.format {
        ReportFormat::Text => {
            for diag in &diagnostics {
                if global.quiet && diag.severity < Severity::Error {
                    continue;
                }
                eprintln!("{}", render(diag));
            }
        }
        ReportFormat::Json => {
            let json =
                serde_json::to_string_pretty(&diagnostics).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }

    if !global.quiet && args.format == ReportFormat::Text {
        for m in &stats.modules {
            if m.unproven_at_entry == 0 {
                continue;
            }
            let status = if m.diverged { " (diverged)" } else { "" };
            println!(
                "module {}: proved {} of {} unproven equivalence(s){status}",
                m.name, m.proven, m.unproven_at_entry
            );
        }
        println!(
            "Proved {} previously unproven equivalences",
            stats.proven_total
        );
    }

    if let Some(out) = &args.output {
        load::write_design(Path::new(out), &design, &interner)?;
    }

    Ok(0)
}

/// Loads `--config` when given, `./veq.toml` when present, defaults otherwise.
fn load_effective_config(args: &ProveArgs) -> Result<VeqConfig, veq_config::ConfigError> {
    if let Some(path) = &args.config {
        return veq_config::load_config(Path::new(path));
    }
    let local = Path::new("veq.toml");
    if local.is_file() {
        return veq_config::load_config(local);
    }
    Ok(VeqConfig::default())
}

/// Resolves `--module` names to module IDs; an unknown name is fatal.
fn resolve_selection(
    design: &veq_ir::Design,
    interner: &Interner,
    names: &[String],
) -> Result<Option<Vec<ModuleId>>, String> {
    if names.is_empty() {
        return Ok(None);
    }
    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        let ident = interner.get_or_intern(name);
        match design.module_by_name(ident) {
            Some(id) => ids.push(id),
            None => return Err(format!("no module named `{name}` in the netlist")),
        }
    }
    Ok(Some(ids))
}

#[cfg(test)]
mod tests {
    use super::*;
    use veq_common::Interner;

    #[test]
    fn selection_resolves_known_modules() {
        let interner = Interner::new();
        let mut design = veq_ir::Design::new();
        let top = design.add_module(interner.get_or_intern("top"));
        let sel = resolve_selection(&design, &interner, &["top".to_string()]).unwrap();
        assert_eq!(sel, Some(vec![top]));
    }

    #[test]
    fn selection_rejects_unknown_modules() {
        let interner = Interner::new();
        let design = veq_ir::Design::new();
        let err = resolve_selection(&design, &interner, &["ghost".to_string()]).unwrap_err();
        assert!(err.contains("ghost"));
    }

    #[test]
    fn empty_selection_means_all() {
        let interner = Interner::new();
        let design = veq_ir::Design::new();
        assert_eq!(resolve_selection(&design, &interner, &[]).unwrap(), None);
    }
}
