//! Detection of circular relative imports.
//!
//! Builds a directed graph from relative import statements, resolving
//! each specifier against sibling files, extension variants, and an
//! index fallback, then runs iterative DFS with an explicit recursion
//! stack to find back-edges. On detection the full cycle chain from the
//! stack is reported.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::lang::Language;

use super::{relative_path, Check, CheckId, Violation};

lazy_static! {
    // import ... from './x'  |  export ... from './x'  |  require('./x')
    static ref RELATIVE_IMPORT: Regex = Regex::new(
        r#"(?:import|export)\s+[^;]*?from\s+['"](\.{1,2}/[^'"]+)['"]|require\(\s*['"](\.{1,2}/[^'"]+)['"]\s*\)"#
    )
    .unwrap();
}

const FIRST_PARTY: &[Language] = &[Language::TypeScript, Language::JavaScript];

const EXTENSION_VARIANTS: &[&str] = &[".ts", ".tsx", ".js", ".jsx", ".mjs", ".cjs"];

/// Resolve a relative specifier to one of the scanned files.
fn resolve(from: &Path, spec: &str, known: &HashSet<PathBuf>) -> Option<PathBuf> {
    let dir = from.parent()?;
    let joined = normalize(&dir.join(spec));

    // Exact path (specifier already carries an extension).
    if known.contains(&joined) {
        return Some(joined);
    }
    // Extension variants.
    for ext in EXTENSION_VARIANTS {
        let mut candidate = joined.clone().into_os_string();
        candidate.push(ext);
        let candidate = PathBuf::from(candidate);
        if known.contains(&candidate) {
            return Some(candidate);
        }
    }
    // Directory import: index fallback.
    for ext in EXTENSION_VARIANTS {
        let candidate = joined.join(format!("index{}", ext));
        if known.contains(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Collapse `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            std::path::Component::CurDir => {}
            std::path::Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// Iterative DFS over the import graph; returns the first cycle found
/// from each root as a chain of nodes ending where it started.
fn find_cycles(graph: &HashMap<PathBuf, Vec<PathBuf>>) -> Vec<Vec<PathBuf>> {
    let mut cycles = Vec::new();
    let mut visited: HashSet<PathBuf> = HashSet::new();

    let mut roots: Vec<&PathBuf> = graph.keys().collect();
    roots.sort();

    for root in roots {
        if visited.contains(root.as_path()) {
            continue;
        }
        // Explicit stack of (node, next-edge-index); `on_stack` is the
        // recursion stack used for back-edge detection.
        let mut stack: Vec<(PathBuf, usize)> = vec![(root.clone(), 0)];
        let mut on_stack: Vec<PathBuf> = vec![root.clone()];

        while let Some((node, edge_idx)) = stack.pop() {
            let edges = graph.get(&node).map(|v| v.as_slice()).unwrap_or(&[]);
            if edge_idx < edges.len() {
                let next = edges[edge_idx].clone();
                stack.push((node.clone(), edge_idx + 1));

                if let Some(pos) = on_stack.iter().position(|n| *n == next) {
                    // Back-edge: report the chain from the stack.
                    let mut chain: Vec<PathBuf> = on_stack[pos..].to_vec();
                    chain.push(next);
                    cycles.push(chain);
                } else if !visited.contains(&next) {
                    visited.insert(next.clone());
                    on_stack.push(next.clone());
                    stack.push((next, 0));
                }
            } else {
                visited.insert(node.clone());
                on_stack.pop();
            }
        }
    }

    cycles
}

/// Scanner for import cycles among the scanned files.
pub struct CircularImports;

impl Check for CircularImports {
    fn id(&self) -> CheckId {
        CheckId::CircularImport
    }

    fn languages(&self) -> &'static [Language] {
        FIRST_PARTY
    }

    fn scan(&self, files: &[PathBuf], base: &Path) -> anyhow::Result<Vec<Violation>> {
        let known: HashSet<PathBuf> = files.iter().map(|f| normalize(f)).collect();
        let mut graph: HashMap<PathBuf, Vec<PathBuf>> = HashMap::new();

        for file in files {
            let content = match fs::read_to_string(file) {
                Ok(c) => c,
                Err(_) => continue,
            };
            let node = normalize(file);
            let edges = graph.entry(node.clone()).or_default();

            for caps in RELATIVE_IMPORT.captures_iter(&content) {
                let spec = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .map(|m| m.as_str())
                    .unwrap_or_default();
                if let Some(target) = resolve(&node, spec, &known) {
                    if target != node && !edges.contains(&target) {
                        edges.push(target);
                    }
                }
            }
            edges.sort();
        }

        let mut violations = Vec::new();
        for cycle in find_cycles(&graph) {
            let chain = cycle
                .iter()
                .map(|p| relative_path(p, base))
                .collect::<Vec<_>>()
                .join(" -> ");
            let first = &cycle[0];
            violations.push(Violation {
                file: relative_path(first, base),
                line: 0,
                check: CheckId::CircularImport,
                message: format!("circular import chain: {}", chain),
            });
        }

        Ok(violations)
    }
}
