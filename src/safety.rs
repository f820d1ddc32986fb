use std::{fmt, result};

use rusqlite::OptionalExtension;
use serde::Serialize;

use crate::{errors::NavGraphError, source::SqliteSource};

/// Data-quality counts for a stored map. Issues here never block a reload;
/// the loader drops what it cannot use.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SafetyReport {
    pub total_nodes: i64,
    pub total_edges: i64,
    pub orphan_edges: i64,
    pub self_loops: i64,
    pub duplicate_edges: i64,
    pub unknown_access: i64,
}

impl SafetyReport {
    pub fn merge(&mut self, other: &SafetyReport) {
        self.total_nodes = self.total_nodes.max(other.total_nodes);
        self.total_edges = self.total_edges.max(other.total_edges);
        self.orphan_edges += other.orphan_edges;
        self.self_loops += other.self_loops;
        self.duplicate_edges += other.duplicate_edges;
        self.unknown_access += other.unknown_access;
    }

    pub fn has_issues(&self) -> bool {
        self.orphan_edges > 0
            || self.self_loops > 0
            || self.duplicate_edges > 0
            || self.unknown_access > 0
    }
}

#[derive(Debug)]
pub struct SafetyError {
    pub report: SafetyReport,
    pub source: Option<NavGraphError>,
}

impl fmt::Display for SafetyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "map data issues detected")
    }
}

impl std::error::Error for SafetyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|err| err as &dyn std::error::Error)
    }
}

pub fn validate_referential_integrity(
    source: &SqliteSource,
) -> Result<SafetyReport, NavGraphError> {
    let mut report = base_report(source)?;
    report.orphan_edges = query_single(
        source,
        "SELECT COUNT(*) FROM edges e
         LEFT JOIN nodes src ON src.id = e.source
         LEFT JOIN nodes dst ON dst.id = e.target
         WHERE src.id IS NULL OR dst.id IS NULL",
    )?;
    report.self_loops = query_single(source, "SELECT COUNT(*) FROM edges WHERE source = target")?;
    Ok(report)
}

/// Counts rows beyond the first per unordered endpoint pair; `(a, b)` and `(b, a)`
/// describe the same corridor.
pub fn validate_no_duplicate_edges(
    source: &SqliteSource,
) -> Result<SafetyReport, NavGraphError> {
    let mut report = base_report(source)?;
    report.duplicate_edges = query_single(
        source,
        "SELECT COALESCE(SUM(cnt - 1), 0) FROM (
             SELECT COUNT(*) AS cnt FROM edges
             WHERE source <> target
             GROUP BY MIN(source, target), MAX(source, target)
             HAVING cnt > 1
         )",
    )?;
    Ok(report)
}

pub fn validate_access_values(source: &SqliteSource) -> Result<SafetyReport, NavGraphError> {
    let mut report = base_report(source)?;
    report.unknown_access = query_single(
        source,
        "SELECT COUNT(*) FROM nodes
         WHERE access IS NOT NULL AND access NOT IN ('all', 'employee')",
    )?;
    Ok(report)
}

pub fn run_safety_checks(source: &SqliteSource) -> Result<SafetyReport, NavGraphError> {
    let mut report = SafetyReport::default();
    report.merge(&validate_referential_integrity(source)?);
    report.merge(&validate_no_duplicate_edges(source)?);
    report.merge(&validate_access_values(source)?);
    Ok(report)
}

pub fn run_strict_safety_checks(source: &SqliteSource) -> result::Result<(), SafetyError> {
    let report = run_safety_checks(source).map_err(|err| SafetyError {
        report: SafetyReport::default(),
        source: Some(err),
    })?;
    if report.has_issues() {
        Err(SafetyError {
            report,
            source: None,
        })
    } else {
        Ok(())
    }
}

fn base_report(source: &SqliteSource) -> Result<SafetyReport, NavGraphError> {
    let total_nodes = query_single(source, "SELECT COUNT(*) FROM nodes")?;
    let total_edges = query_single(source, "SELECT COUNT(*) FROM edges")?;
    Ok(SafetyReport {
        total_nodes,
        total_edges,
        ..SafetyReport::default()
    })
}

fn query_single(source: &SqliteSource, sql: &str) -> Result<i64, NavGraphError> {
    source
        .connection()
        .query_row(sql, [], |row| row.get(0))
        .optional()
        .map(|opt| opt.unwrap_or(0))
        .map_err(|e| NavGraphError::query(e.to_string()))
}
