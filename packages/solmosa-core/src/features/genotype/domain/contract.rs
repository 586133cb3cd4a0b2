//! Contract ABI normalisation

use super::abi_type::AbiType;
use crate::features::genotype::infrastructure::errors::GenotypeError;
use serde_json::Value;
use std::collections::BTreeSet;

/// Name of the time-advancing pseudo-method
pub const PASS_TIME: &str = "passTime";

/// Name of the block-advancing pseudo-method
pub const PASS_BLOCKS: &str = "passBlocks";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    Constructor,
    Function,
    PassTime,
    PassBlocks,
}

impl MethodKind {
    pub fn is_pseudo(&self) -> bool {
        matches!(self, MethodKind::PassTime | MethodKind::PassBlocks)
    }
}

/// Callable method with parsed parameter types
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSpec {
    pub name: String,
    /// `name(type,...)`, the key the CFG tool uses for method names
    pub signature: String,
    pub inputs: Vec<AbiType>,
    pub payable: bool,
    pub kind: MethodKind,
}

impl MethodSpec {
    pub fn new(name: impl Into<String>, inputs: Vec<AbiType>, payable: bool, kind: MethodKind) -> Self {
        let name = name.into();
        let signature = format!(
            "{}({})",
            name,
            inputs.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(",")
        );
        Self {
            name,
            signature,
            inputs,
            payable,
            kind,
        }
    }

    pub fn constructor(inputs: Vec<AbiType>, payable: bool) -> Self {
        Self::new("constructor", inputs, payable, MethodKind::Constructor)
    }

    pub fn pass_time() -> Self {
        Self::new(PASS_TIME, vec![AbiType::Uint(256)], false, MethodKind::PassTime)
    }

    pub fn pass_blocks() -> Self {
        Self::new(PASS_BLOCKS, vec![], false, MethodKind::PassBlocks)
    }
}

/// Methods of one contract, constructor first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractAbi {
    pub name: String,
    methods: Vec<MethodSpec>,
}

impl ContractAbi {
    /// Normalise the ABI of a compiled artifact (`contractName`, `abi`)
    pub fn from_artifact(artifact: &Value, ignore: &[String]) -> Result<Self, GenotypeError> {
        let name = artifact
            .get("contractName")
            .and_then(Value::as_str)
            .ok_or(GenotypeError::MissingField {
                field: "contractName",
            })?;
        let abi = artifact
            .get("abi")
            .ok_or(GenotypeError::MissingField { field: "abi" })?;
        Self::from_abi(name, abi, ignore)
    }

    pub fn from_abi(name: &str, abi: &Value, ignore: &[String]) -> Result<Self, GenotypeError> {
        let entries = abi
            .as_array()
            .ok_or_else(|| GenotypeError::MalformedAbi("abi is not an array".to_string()))?;

        let mut constructor: Option<MethodSpec> = None;
        let mut functions = Vec::new();

        for entry in entries {
            let kind = entry.get("type").and_then(Value::as_str).unwrap_or("function");
            if kind != "function" && kind != "constructor" {
                continue;
            }

            let inputs = parse_inputs(entry)?;
            let payable = entry.get("payable").and_then(Value::as_bool).unwrap_or(false)
                || entry.get("stateMutability").and_then(Value::as_str) == Some("payable");
            let fn_name = entry.get("name").and_then(Value::as_str).unwrap_or_default();

            // Pre-0.4.22 constructors are functions named like the contract
            if kind == "constructor" || fn_name == name {
                if constructor.is_none() {
                    constructor = Some(MethodSpec::constructor(inputs, payable));
                }
                continue;
            }

            if fn_name.is_empty() {
                return Err(GenotypeError::MalformedAbi(format!("function without name in {}", name)));
            }
            let spec = MethodSpec::new(fn_name, inputs, payable, MethodKind::Function);
            if ignore.iter().any(|sig| sig == &spec.signature) {
                continue;
            }
            functions.push(spec);
        }

        let mut methods = vec![constructor.unwrap_or_else(|| MethodSpec::constructor(vec![], false))];
        methods.extend(functions);
        Ok(Self {
            name: name.to_string(),
            methods,
        })
    }

    pub fn constructor(&self) -> &MethodSpec {
        &self.methods[0]
    }

    /// Everything callable after deployment
    pub fn functions(&self) -> &[MethodSpec] {
        &self.methods[1..]
    }

    pub fn methods(&self) -> &[MethodSpec] {
        &self.methods
    }

    pub fn find(&self, signature: &str) -> Option<&MethodSpec> {
        self.methods.iter().find(|m| m.signature == signature)
    }

    /// Signatures of payable functions (CFG method keys)
    pub fn payable_signatures(&self) -> BTreeSet<String> {
        self.functions()
            .iter()
            .filter(|m| m.payable)
            .map(|m| m.signature.clone())
            .collect()
    }
}

fn parse_inputs(entry: &Value) -> Result<Vec<AbiType>, GenotypeError> {
    let Some(inputs) = entry.get("inputs").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };
    inputs
        .iter()
        .map(|input| {
            let ty = input
                .get("type")
                .and_then(Value::as_str)
                .ok_or_else(|| GenotypeError::MalformedAbi("input without type".to_string()))?;
            AbiType::parse(ty)
        })
        .collect()
}

/// Signatures of the getters solc generates for public state variables,
/// read from a compact-JSON AST
///
/// Mappings contribute one argument per key; arrays one `uint256` index
/// per dimension.
pub fn state_variable_getters(ast: &Value) -> Vec<String> {
    let mut getters = Vec::new();
    let mut stack = vec![ast];

    while let Some(node) = stack.pop() {
        match node {
            Value::Object(map) => {
                let is_public_state = map.get("nodeType").and_then(Value::as_str)
                    == Some("VariableDeclaration")
                    && map.get("stateVariable").and_then(Value::as_bool) == Some(true)
                    && map.get("visibility").and_then(Value::as_str) == Some("public");
                if is_public_state {
                    if let Some(name) = map.get("name").and_then(Value::as_str) {
                        let keys = getter_arguments(map.get("typeName"));
                        getters.push(format!("{}({})", name, keys.join(",")));
                    }
                    continue;
                }
                stack.extend(map.values());
            }
            Value::Array(items) => stack.extend(items.iter()),
            _ => {}
        }
    }

    getters.sort();
    getters.dedup();
    getters
}

fn getter_arguments(type_name: Option<&Value>) -> Vec<String> {
    let mut keys = Vec::new();
    let mut current = type_name;
    while let Some(node) = current {
        match node.get("nodeType").and_then(Value::as_str) {
            Some("Mapping") => {
                let key = node
                    .get("keyType")
                    .and_then(|k| k.get("typeDescriptions"))
                    .and_then(|d| d.get("typeString"))
                    .and_then(Value::as_str)
                    .unwrap_or("uint256");
                keys.push(canonical_key(key));
                current = node.get("valueType");
            }
            Some("ArrayTypeName") => {
                keys.push("uint256".to_string());
                current = node.get("baseType");
            }
            _ => break,
        }
    }
    keys
}

fn canonical_key(type_string: &str) -> String {
    match type_string {
        "uint" => "uint256".to_string(),
        "int" => "int256".to_string(),
        "address payable" => "address".to_string(),
        other => other
            .strip_prefix("contract ")
            .map(|_| "address".to_string())
            .unwrap_or_else(|| other.to_string()),
    }
}
