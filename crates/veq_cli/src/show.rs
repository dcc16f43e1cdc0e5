//! `veq show` — print a netlist inventory.

use crate::load;
use crate::{GlobalArgs, ShowArgs};
use std::path::Path;
use veq_common::Interner;
use veq_ir::PortNames;

/// Runs the `veq show` command.
pub fn run(args: &ShowArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let interner = Interner::new();
    let design = load::load_design(Path::new(&args.netlist), &interner)?;
    let ports = PortNames::new(&interner);

    for (_, module) in design.modules.visit() {
        let markers: Vec<_> = module.equiv_markers().collect();
        let proven = markers
            .iter()
            .filter(|(_, c)| c.port(ports.a) == c.port(ports.b))
            .count();
        println!(
            "module {}: {} wire(s), {} cell(s), {} marker(s) ({} proven, {} unproven)",
            interner.resolve(module.name),
            module.wires.len(),
            module.cells.len(),
            markers.len(),
            proven,
            markers.len() - proven
        );
        if global.verbose {
            for (_, cell) in markers {
                let state = if cell.port(ports.a) == cell.port(ports.b) {
                    "proven"
                } else {
                    "unproven"
                };
                println!("  marker {}: {state}", interner.resolve(cell.name));
            }
        }
    }
    Ok(0)
}
