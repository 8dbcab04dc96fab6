//! Lint diagnostics for process graphs.
//!
//! Reports structural issues without modifying the graph. The editor accepts
//! any shape the user draws; these findings are advisory and feed the host's
//! "validate before save" panel.

use crate::connections::ConnectionRegistry;
use crate::id::{ConnectionId, NodeId};
use crate::model::NodeKind;
use crate::nodes::NodeRegistry;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

// ─── Diagnostic types ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LintSeverity {
    /// Likely a modelling mistake.
    Warning,
    /// Permitted, but worth a second look.
    Info,
}

/// What a diagnostic points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum LintTarget {
    Graph,
    Node(NodeId),
    Connection(ConnectionId),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LintDiagnostic {
    pub target: LintTarget,
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "missing-start", "dead-end").
    pub rule: &'static str,
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run all rules. An empty graph produces no diagnostics.
#[must_use]
pub fn lint_graph(nodes: &NodeRegistry, connections: &ConnectionRegistry) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    if nodes.is_empty() {
        return diags;
    }
    lint_terminals(nodes, connections, &mut diags);
    lint_unreachable(nodes, connections, &mut diags);
    lint_dead_ends(nodes, connections, &mut diags);
    lint_decision_branches(nodes, connections, &mut diags);
    lint_parallel_connections(connections, &mut diags);
    diags
}

// ─── Rules ────────────────────────────────────────────────────────────────

fn lint_terminals(
    nodes: &NodeRegistry,
    connections: &ConnectionRegistry,
    diags: &mut Vec<LintDiagnostic>,
) {
    if !nodes.iter().any(|n| n.kind == NodeKind::Start) {
        diags.push(LintDiagnostic {
            target: LintTarget::Graph,
            message: "The process has no start node.".to_string(),
            severity: LintSeverity::Warning,
            rule: "missing-start",
        });
    }
    if !nodes.iter().any(|n| n.kind == NodeKind::End) {
        diags.push(LintDiagnostic {
            target: LintTarget::Graph,
            message: "The process has no end node.".to_string(),
            severity: LintSeverity::Warning,
            rule: "missing-end",
        });
    }

    for node in nodes.iter() {
        match node.kind {
            NodeKind::Start if connections.incoming(node.id).next().is_some() => {
                diags.push(LintDiagnostic {
                    target: LintTarget::Node(node.id),
                    message: format!("Start node `{}` has incoming connections.", node.label),
                    severity: LintSeverity::Warning,
                    rule: "start-incoming",
                });
            }
            NodeKind::End if connections.outgoing(node.id).next().is_some() => {
                diags.push(LintDiagnostic {
                    target: LintTarget::Node(node.id),
                    message: format!("End node `{}` has outgoing connections.", node.label),
                    severity: LintSeverity::Warning,
                    rule: "end-outgoing",
                });
            }
            _ => {}
        }
    }
}

/// Nodes no start node can reach. Skipped when there is no start at all,
/// since `missing-start` already covers that.
fn lint_unreachable(
    nodes: &NodeRegistry,
    connections: &ConnectionRegistry,
    diags: &mut Vec<LintDiagnostic>,
) {
    let mut reached: HashSet<NodeId> = HashSet::new();
    let mut any_start = false;
    for start in nodes.iter().filter(|n| n.kind == NodeKind::Start) {
        any_start = true;
        reached.extend(connections.reachable_from(start.id));
    }
    if !any_start {
        return;
    }
    for node in nodes.iter().filter(|n| !reached.contains(&n.id)) {
        diags.push(LintDiagnostic {
            target: LintTarget::Node(node.id),
            message: format!("`{}` cannot be reached from any start node.", node.label),
            severity: LintSeverity::Warning,
            rule: "unreachable",
        });
    }
}

fn lint_dead_ends(
    nodes: &NodeRegistry,
    connections: &ConnectionRegistry,
    diags: &mut Vec<LintDiagnostic>,
) {
    for node in nodes.iter().filter(|n| n.kind != NodeKind::End) {
        if connections.outgoing(node.id).next().is_none() {
            diags.push(LintDiagnostic {
                target: LintTarget::Node(node.id),
                message: format!("`{}` has no outgoing connection.", node.label),
                severity: LintSeverity::Info,
                rule: "dead-end",
            });
        }
    }
}

fn lint_decision_branches(
    nodes: &NodeRegistry,
    connections: &ConnectionRegistry,
    diags: &mut Vec<LintDiagnostic>,
) {
    for node in nodes.iter().filter(|n| n.kind == NodeKind::Decision) {
        let branches = connections.outgoing(node.id).count();
        // Zero branches is already a dead end.
        if branches == 1 {
            diags.push(LintDiagnostic {
                target: LintTarget::Node(node.id),
                message: format!("Decision `{}` has only one branch.", node.label),
                severity: LintSeverity::Warning,
                rule: "decision-branches",
            });
        }
    }
}

/// Parallel edges are allowed but usually accidental.
fn lint_parallel_connections(connections: &ConnectionRegistry, diags: &mut Vec<LintDiagnostic>) {
    let mut first_seen: HashMap<(NodeId, NodeId), ConnectionId> = HashMap::new();
    for conn in connections.iter() {
        if let Some(first) = first_seen.get(&(conn.source, conn.target)) {
            diags.push(LintDiagnostic {
                target: LintTarget::Connection(conn.id),
                message: format!(
                    "Connection `{}` duplicates `{}` ({} → {}).",
                    conn.id, first, conn.source, conn.target
                ),
                severity: LintSeverity::Info,
                rule: "parallel-connection",
            });
        } else {
            first_seen.insert((conn.source, conn.target), conn.id);
        }
    }
}
