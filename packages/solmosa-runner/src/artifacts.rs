//! Contract discovery
//!
//! Layout per project under the contracts directory:
//!
//! ```text
//! <contracts_dir>/<project>/build/contracts/<Name>.json   compiled artifact
//! <contracts_dir>/<project>/cfg/<Name>.json               recovered CFG
//! <contracts_dir>/<project>/contracts/<Name>.sol          Solidity source
//! ```

use crate::error::{Result, RunnerError};
use serde_json::Value;
use solmosa_core::{ContractUnderTest, ControlFlowGraph};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Files belonging to one contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractArtifacts {
    pub project: String,
    pub name: String,
    pub artifact: PathBuf,
    pub cfg: PathBuf,
    pub source: Option<PathBuf>,
}

impl ContractArtifacts {
    /// Qualified name used in logs and reports
    pub fn display_name(&self) -> String {
        format!("{}/{}", self.project, self.name)
    }

    /// Read everything needed for a search
    pub fn load(&self) -> Result<ContractUnderTest> {
        let artifact: Value = serde_json::from_str(&std::fs::read_to_string(&self.artifact)?)?;
        let cfg_json = std::fs::read_to_string(&self.cfg).map_err(|e| {
            RunnerError::discovery(format!("no CFG for {} at {}: {}", self.name, self.cfg.display(), e))
        })?;
        let cfg = ControlFlowGraph::from_json(&cfg_json)?;

        let contract = ContractUnderTest::new(self.name.clone(), artifact, cfg);
        match self.read_source()? {
            Some(source) => Ok(contract.with_source(source)),
            None => Ok(contract),
        }
    }

    pub fn read_source(&self) -> Result<Option<String>> {
        match &self.source {
            Some(path) => Ok(Some(std::fs::read_to_string(path)?)),
            None => Ok(None),
        }
    }
}

/// Every artifact not in `skip`, ordered by project then file name
pub fn discover_contracts(contracts_dir: &Path, skip: &[String]) -> Result<Vec<ContractArtifacts>> {
    let mut found = Vec::new();
    for project_dir in sorted_entries(contracts_dir)? {
        if !project_dir.is_dir() {
            continue;
        }
        let build_dir = project_dir.join("build").join("contracts");
        if !build_dir.is_dir() {
            debug!(project = %project_dir.display(), "no build/contracts directory, skipping");
            continue;
        }
        let project = file_name(&project_dir)?;

        for artifact in sorted_entries(&build_dir)? {
            if artifact.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let file = file_name(&artifact)?;
            if skip.iter().any(|s| *s == file) {
                debug!(artifact = %file, "skipped by configuration");
                continue;
            }
            let name = artifact
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| RunnerError::discovery(format!("bad artifact name {}", artifact.display())))?
                .to_string();

            let cfg = project_dir.join("cfg").join(format!("{}.json", name));
            if !cfg.is_file() {
                warn!(contract = %name, cfg = %cfg.display(), "missing CFG dump");
            }
            let source = source_path(&project_dir, &artifact, &name)?;

            found.push(ContractArtifacts {
                project: project.clone(),
                name,
                artifact,
                cfg,
                source,
            });
        }
    }
    Ok(found)
}

/// Source named by the artifact's `sourcePath`, else `<Name>.sol`
fn source_path(project_dir: &Path, artifact: &Path, name: &str) -> Result<Option<PathBuf>> {
    let sources = project_dir.join("contracts");
    let content = std::fs::read_to_string(artifact)?;
    let declared = serde_json::from_str::<Value>(&content)
        .ok()
        .and_then(|v| v.get("sourcePath").and_then(Value::as_str).map(PathBuf::from))
        .and_then(|p| p.file_name().map(|f| sources.join(f)));

    let candidates = declared.into_iter().chain(std::iter::once(sources.join(format!("{}.sol", name))));
    for candidate in candidates {
        if candidate.is_file() {
            return Ok(Some(candidate));
        }
    }
    warn!(contract = %name, "no Solidity source found, literal pools will be empty");
    Ok(None)
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = std::fs::read_dir(dir)
        .map_err(|e| RunnerError::discovery(format!("cannot read {}: {}", dir.display(), e)))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();
    Ok(entries)
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|f| f.to_str())
        .map(str::to_string)
        .ok_or_else(|| RunnerError::discovery(format!("non UTF-8 path {}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_discovery_layout() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("token");
        write(
            &project.join("build/contracts/Token.json"),
            r#"{"contractName": "Token", "abi": [], "sourcePath": "/home/dev/token/contracts/MyToken.sol"}"#,
        );
        write(&project.join("build/contracts/Migrations.json"), "{}");
        write(&project.join("build/contracts/Vault.json"), r#"{"contractName": "Vault", "abi": []}"#);
        write(&project.join("cfg/Token.json"), r#"{"methods": []}"#);
        write(&project.join("contracts/MyToken.sol"), "contract Token {}");
        write(&dir.path().join("notes.txt"), "not a project");

        let skip = vec!["Migrations.json".to_string()];
        let found = discover_contracts(dir.path(), &skip).unwrap();

        let names: Vec<_> = found.iter().map(|c| c.display_name()).collect();
        assert_eq!(names, vec!["token/Token", "token/Vault"]);
        assert_eq!(found[0].source, Some(project.join("contracts/MyToken.sol")));
        assert_eq!(found[0].cfg, project.join("cfg/Token.json"));
        assert_eq!(found[1].source, None);
    }

    #[test]
    fn test_load_requires_cfg() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("p");
        write(&project.join("build/contracts/A.json"), r#"{"contractName": "A", "abi": []}"#);

        let found = discover_contracts(dir.path(), &[]).unwrap();
        assert_eq!(found.len(), 1);
        assert!(matches!(found[0].load(), Err(RunnerError::Discovery(_))));

        write(&project.join("cfg/A.json"), r#"{"methods": []}"#);
        let contract = found[0].load().unwrap();
        assert_eq!(contract.name, "A");
        assert!(contract.source.is_none());
    }

    #[test]
    fn test_missing_contracts_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover_contracts(&dir.path().join("absent"), &[]).unwrap_err();
        assert!(matches!(err, RunnerError::Discovery(_)));
    }
}
