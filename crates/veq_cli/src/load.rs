//! JSON netlist loading and writing.
//!
//! The on-disk format is a name-based serde model: wires and cells are
//! referenced by string names, signal vectors are LSB-first chunk lists
//! (whole wires, slices, or constants). Loading interns the names and
//! builds the IR; writing reverses the conversion, so the rewritten design
//! after a proof run round-trips.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use veq_common::{Interner, LogicVec};
use veq_ir::{CellKind, Connection, Design, Module, PortDirection, SigBit, SigSpec, WireId};

/// Errors produced while loading a JSON netlist.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read or written.
    #[error("cannot access netlist file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid JSON or has the wrong shape.
    #[error("cannot parse netlist: {0}")]
    Json(#[from] serde_json::Error),

    /// A signal chunk references a wire the module does not declare.
    #[error("module {module}: unknown wire `{wire}`")]
    UnknownWire {
        /// The module containing the reference.
        module: String,
        /// The undeclared wire name.
        wire: String,
    },

    /// A slice reaches past the end of its wire.
    #[error("module {module}: slice [{high}:{low}] out of range for wire `{wire}`")]
    BadSlice {
        /// The module containing the reference.
        module: String,
        /// The sliced wire name.
        wire: String,
        /// High bit index.
        high: u32,
        /// Low bit index.
        low: u32,
    },

    /// A constant string contains characters other than `0 1 x z`.
    #[error("invalid constant `{0}`")]
    BadConst(String),

    /// A `const` cell is missing its `value` field.
    #[error("const cell `{0}` has no value")]
    MissingValue(String),
}

/// A design in the on-disk JSON model.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonDesign {
    /// All modules, in declaration order.
    pub modules: Vec<JsonModule>,
}

/// A module in the on-disk JSON model.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonModule {
    /// The module name.
    pub name: String,
    /// Wire declarations.
    pub wires: Vec<JsonWire>,
    /// Wire-to-wire alias connections.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<JsonAlias>,
    /// Cells, in visit order.
    pub cells: Vec<JsonCell>,
}

/// A wire declaration.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonWire {
    /// The wire name.
    pub name: String,
    /// The number of bits.
    pub width: u32,
}

/// A direct wire-to-wire connection (`lhs = rhs`).
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonAlias {
    /// The aliased signal.
    pub lhs: JsonSig,
    /// The driving signal.
    pub rhs: JsonSig,
}

/// A cell in the on-disk JSON model.
///
/// The `type` string selects the cell function; unknown strings load as
/// unmodellable black boxes rather than failing.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonCell {
    /// The cell instance name.
    pub name: String,
    /// The cell type tag (e.g. `"and"`, `"dff"`, `"equiv"`).
    #[serde(rename = "type")]
    pub ty: String,
    /// Operand/result width.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub width: u32,
    /// Signed extension/comparison flag.
    #[serde(default, skip_serializing_if = "is_false")]
    pub signed: bool,
    /// Constant payload for `const` cells, MSB first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Port-to-signal connections, keyed by port name.
    pub connections: BTreeMap<String, JsonSig>,
}

fn is_zero(v: &u32) -> bool {
    *v == 0
}

fn is_false(v: &bool) -> bool {
    !(*v)
}

/// A signal vector as an LSB-first list of chunks.
pub type JsonSig = Vec<JsonSigChunk>;

/// One chunk of a signal vector.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonSigChunk {
    /// All bits of a wire, LSB first.
    Wire(String),
    /// An inclusive bit range of a wire.
    Slice {
        /// The sliced wire.
        wire: String,
        /// High bit index (inclusive).
        high: u32,
        /// Low bit index (inclusive).
        low: u32,
    },
    /// A constant, written MSB first with digits from `0 1 x z`.
    Const {
        /// The constant digits.
        value: String,
    },
}

/// Reads a design and its interner from a JSON netlist file.
pub fn load_design(path: &Path, interner: &Interner) -> Result<Design, LoadError> {
    let content = std::fs::read_to_string(path)?;
    load_design_from_str(&content, interner)
}

/// Parses a design from JSON netlist text.
pub fn load_design_from_str(content: &str, interner: &Interner) -> Result<Design, LoadError> {
    let json: JsonDesign = serde_json::from_str(content)?;
    let mut design = Design::new();
    for jmodule in &json.modules {
        let id = design.add_module(interner.get_or_intern(&jmodule.name));
        let module = design.modules.get_mut(id);
        build_module(module, jmodule, interner)?;
    }
    Ok(design)
}

fn build_module(
    module: &mut Module,
    json: &JsonModule,
    interner: &Interner,
) -> Result<(), LoadError> {
    let mut wires: BTreeMap<&str, WireId> = BTreeMap::new();
    for w in &json.wires {
        let id = module.add_wire(interner.get_or_intern(&w.name), w.width);
        wires.insert(w.name.as_str(), id);
    }
    for alias in &json.aliases {
        let lhs = resolve_sig(&alias.lhs, module, &wires, &json.name)?;
        let rhs = resolve_sig(&alias.rhs, module, &wires, &json.name)?;
        module.connect(lhs, rhs);
    }
    for cell in &json.cells {
        let kind = cell_kind(cell, interner)?;
        let mut connections = Vec::with_capacity(cell.connections.len());
        for (port, sig) in &cell.connections {
            connections.push(Connection {
                port: interner.get_or_intern(port),
                direction: port_direction(port),
                sig: resolve_sig(sig, module, &wires, &json.name)?,
            });
        }
        module.add_cell(interner.get_or_intern(&cell.name), kind, connections);
    }
    Ok(())
}

/// Output ports are `Y` and `Q` by convention; everything else is an input.
fn port_direction(port: &str) -> PortDirection {
    match port {
        "Y" | "Q" => PortDirection::Output,
        _ => PortDirection::Input,
    }
}

fn cell_kind(cell: &JsonCell, interner: &Interner) -> Result<CellKind, LoadError> {
    let width = cell.width;
    let signed = cell.signed;
    Ok(match cell.ty.as_str() {
        "and" => CellKind::And { width },
        "or" => CellKind::Or { width },
        "xor" => CellKind::Xor { width },
        "xnor" => CellKind::Xnor { width },
        "not" => CellKind::Not { width },
        "mux" => CellKind::Mux { width },
        "reduce_and" => CellKind::ReduceAnd { width },
        "reduce_or" => CellKind::ReduceOr { width },
        "reduce_xor" => CellKind::ReduceXor { width },
        "add" => CellKind::Add { width, signed },
        "sub" => CellKind::Sub { width, signed },
        "mul" => CellKind::Mul { width, signed },
        "shl" => CellKind::Shl { width, signed },
        "shr" => CellKind::Shr { width, signed },
        "eq" => CellKind::Eq { width, signed },
        "ne" => CellKind::Ne { width, signed },
        "lt" => CellKind::Lt { width, signed },
        "le" => CellKind::Le { width, signed },
        "dff" => CellKind::Dff { width },
        "latch" => CellKind::Latch { width },
        "const" => {
            let value = cell
                .value
                .as_deref()
                .ok_or_else(|| LoadError::MissingValue(cell.name.clone()))?;
            let value = LogicVec::from_str_msb_first(value)
                .ok_or_else(|| LoadError::BadConst(value.to_string()))?;
            CellKind::Const { value }
        }
        "equiv" => CellKind::EquivMarker { width },
        other => CellKind::Unknown {
            type_name: interner.get_or_intern(other),
        },
    })
}

fn resolve_sig(
    sig: &JsonSig,
    module: &Module,
    wires: &BTreeMap<&str, WireId>,
    module_name: &str,
) -> Result<SigSpec, LoadError> {
    let mut out = SigSpec::new();
    for chunk in sig {
        match chunk {
            JsonSigChunk::Wire(name) => {
                let &id = wires.get(name.as_str()).ok_or_else(|| LoadError::UnknownWire {
                    module: module_name.to_string(),
                    wire: name.clone(),
                })?;
                for bit in module.wire_sig(id).bits() {
                    out.push(bit);
                }
            }
            JsonSigChunk::Slice { wire, high, low } => {
                let &id = wires.get(wire.as_str()).ok_or_else(|| LoadError::UnknownWire {
                    module: module_name.to_string(),
                    wire: wire.clone(),
                })?;
                let width = module.wires.get(id).width;
                if high < low || *high >= width {
                    return Err(LoadError::BadSlice {
                        module: module_name.to_string(),
                        wire: wire.clone(),
                        high: *high,
                        low: *low,
                    });
                }
                for index in *low..=*high {
                    out.push(SigBit::Bit { wire: id, index });
                }
            }
            JsonSigChunk::Const { value } => {
                let parsed = LogicVec::from_str_msb_first(value)
                    .ok_or_else(|| LoadError::BadConst(value.clone()))?;
                for bit in SigSpec::from_const(&parsed).bits() {
                    out.push(bit);
                }
            }
        }
    }
    Ok(out)
}

/// Writes a design back to the JSON netlist format.
pub fn write_design(path: &Path, design: &Design, interner: &Interner) -> Result<(), LoadError> {
    let json = design_to_json(design, interner);
    let text = serde_json::to_string_pretty(&json)?;
    std::fs::write(path, text)?;
    Ok(())
}

/// Converts a design to the on-disk model.
pub fn design_to_json(design: &Design, interner: &Interner) -> JsonDesign {
    let modules = design
        .modules
        .visit()
        .map(|(_, module)| module_to_json(module, interner))
        .collect();
    JsonDesign { modules }
}

fn module_to_json(module: &Module, interner: &Interner) -> JsonModule {
    let wires = module
        .wires
        .visit()
        .map(|(_, w)| JsonWire {
            name: interner.resolve(w.name).to_string(),
            width: w.width,
        })
        .collect();
    let aliases = module
        .aliases
        .iter()
        .map(|a| JsonAlias {
            lhs: sig_to_json(&a.lhs, module, interner),
            rhs: sig_to_json(&a.rhs, module, interner),
        })
        .collect();
    let cells = module
        .cells
        .visit()
        .map(|(_, cell)| {
            let (ty, width, signed, value) = kind_to_json(&cell.kind, interner);
            let connections = cell
                .connections
                .iter()
                .map(|c| {
                    (
                        interner.resolve(c.port).to_string(),
                        sig_to_json(&c.sig, module, interner),
                    )
                })
                .collect();
            JsonCell {
                name: interner.resolve(cell.name).to_string(),
                ty,
                width,
                signed,
                value,
                connections,
            }
        })
        .collect();
    JsonModule {
        name: interner.resolve(module.name).to_string(),
        wires,
        aliases,
        cells,
    }
}

fn kind_to_json(kind: &CellKind, interner: &Interner) -> (String, u32, bool, Option<String>) {
    match kind {
        CellKind::And { width } => ("and".into(), *width, false, None),
        CellKind::Or { width } => ("or".into(), *width, false, None),
        CellKind::Xor { width } => ("xor".into(), *width, false, None),
        CellKind::Xnor { width } => ("xnor".into(), *width, false, None),
        CellKind::Not { width } => ("not".into(), *width, false, None),
        CellKind::Mux { width } => ("mux".into(), *width, false, None),
        CellKind::ReduceAnd { width } => ("reduce_and".into(), *width, false, None),
        CellKind::ReduceOr { width } => ("reduce_or".into(), *width, false, None),
        CellKind::ReduceXor { width } => ("reduce_xor".into(), *width, false, None),
        CellKind::Add { width, signed } => ("add".into(), *width, *signed, None),
        CellKind::Sub { width, signed } => ("sub".into(), *width, *signed, None),
        CellKind::Mul { width, signed } => ("mul".into(), *width, *signed, None),
        CellKind::Shl { width, signed } => ("shl".into(), *width, *signed, None),
        CellKind::Shr { width, signed } => ("shr".into(), *width, *signed, None),
        CellKind::Eq { width, signed } => ("eq".into(), *width, *signed, None),
        CellKind::Ne { width, signed } => ("ne".into(), *width, *signed, None),
        CellKind::Lt { width, signed } => ("lt".into(), *width, *signed, None),
        CellKind::Le { width, signed } => ("le".into(), *width, *signed, None),
        CellKind::Dff { width } => ("dff".into(), *width, false, None),
        CellKind::Latch { width } => ("latch".into(), *width, false, None),
        CellKind::Const { value } => {
            let digits: String = (0..value.width())
                .rev()
                .map(|i| value.get(i).to_string().to_lowercase())
                .collect();
            ("const".into(), 0, false, Some(digits))
        }
        CellKind::EquivMarker { width } => ("equiv".into(), *width, false, None),
        CellKind::Unknown { type_name } => {
            (interner.resolve(*type_name).to_string(), 0, false, None)
        }
    }
}

fn sig_to_json(sig: &SigSpec, module: &Module, interner: &Interner) -> JsonSig {
    let mut chunks: JsonSig = Vec::new();
    let mut run_const = String::new(); // accumulated LSB-first
    let mut run_wire: Option<(WireId, u32, u32)> = None; // (wire, low, high)

    let flush_const = |chunks: &mut JsonSig, run: &mut String| {
        if !run.is_empty() {
            let value: String = run.chars().rev().collect();
            chunks.push(JsonSigChunk::Const { value });
            run.clear();
        }
    };
    let flush_wire = |chunks: &mut JsonSig, run: &mut Option<(WireId, u32, u32)>| {
        if let Some((wire, low, high)) = run.take() {
            let w = module.wires.get(wire);
            let name = interner.resolve(w.name).to_string();
            if low == 0 && high == w.width - 1 {
                chunks.push(JsonSigChunk::Wire(name));
            } else {
                chunks.push(JsonSigChunk::Slice {
                    wire: name,
                    high,
                    low,
                });
            }
        }
    };

    for bit in sig.bits() {
        match bit {
            SigBit::Const(v) => {
                flush_wire(&mut chunks, &mut run_wire);
                run_const.push_str(&v.to_string().to_lowercase());
            }
            SigBit::Bit { wire, index } => {
                flush_const(&mut chunks, &mut run_const);
                match run_wire {
                    Some((w, low, high)) if w == wire && index == high + 1 => {
                        run_wire = Some((w, low, high + 1));
                    }
                    _ => {
                        flush_wire(&mut chunks, &mut run_wire);
                        run_wire = Some((wire, index, index));
                    }
                }
            }
        }
    }
    flush_const(&mut chunks, &mut run_const);
    flush_wire(&mut chunks, &mut run_wire);
    chunks
}
