//! Combinational-cycle detection.
//!
//! The step encoding is only sound when every cycle in the signal graph
//! passes through a sequential element, whose step boundary breaks the
//! cycle across time. This pre-pass finds strongly-connected components of
//! the combinational cells; any nontrivial component (or self-loop) makes
//! the module ineligible for induction.

use crate::canon::SigMap;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use veq_ir::{CellId, Module, SigBit};

/// Returns the combinational cycles in the module, as groups of cell IDs.
///
/// Sequential cells are excluded from the graph entirely: their outputs
/// depend on the previous step, so paths through them are not combinational.
pub fn combinational_cycles(module: &Module, sigmap: &SigMap) -> Vec<Vec<CellId>> {
    let mut graph: DiGraph<CellId, ()> = DiGraph::new();
    let mut nodes: HashMap<CellId, NodeIndex> = HashMap::new();
    let mut driver: HashMap<SigBit, CellId> = HashMap::new();

    for (id, cell) in module.cells.visit() {
        if cell.is_sequential() {
            continue;
        }
        nodes.insert(id, graph.add_node(id));
        for conn in cell.outputs() {
            for bit in conn.sig.bits() {
                driver.insert(sigmap.canon(bit), id);
            }
        }
    }

    for (id, cell) in module.cells.visit() {
        if cell.is_sequential() {
            continue;
        }
        let to = nodes[&id];
        for conn in cell.inputs() {
            for bit in conn.sig.bits() {
                if let Some(&src) = driver.get(&sigmap.canon(bit)) {
                    let from = nodes[&src];
                    graph.update_edge(from, to, ());
                }
            }
        }
    }

    let mut cycles = Vec::new();
    for component in tarjan_scc(&graph) {
        let is_cycle = component.len() > 1
            || graph.find_edge(component[0], component[0]).is_some();
        if is_cycle {
            cycles.push(component.into_iter().map(|n| graph[n]).collect());
        }
    }
    cycles
}
