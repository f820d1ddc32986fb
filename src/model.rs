use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::NavGraphError;

/// Location tag of a node. Unknown tags are kept verbatim and treated generically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Hallway,
    Room,
    Elevator,
    Stairs,
    Other(String),
}

impl NodeKind {
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Hallway => "hallway",
            NodeKind::Room => "room",
            NodeKind::Elevator => "elevator",
            NodeKind::Stairs => "stairs",
            NodeKind::Other(tag) => tag.as_str(),
        }
    }
}

impl From<&str> for NodeKind {
    fn from(value: &str) -> Self {
        match value {
            "hallway" => NodeKind::Hallway,
            "room" => NodeKind::Room,
            "elevator" => NodeKind::Elevator,
            "stairs" => NodeKind::Stairs,
            other => NodeKind::Other(other.to_string()),
        }
    }
}

impl From<String> for NodeKind {
    fn from(value: String) -> Self {
        NodeKind::from(value.as_str())
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    #[default]
    All,
    Employee,
}

impl Access {
    /// Normalizes a stored access column. Only the literal `employee` restricts a node;
    /// null, empty and unrecognized values all mean public access.
    pub fn from_column(value: Option<&str>) -> Self {
        match value {
            Some("employee") => Access::Employee,
            _ => Access::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Access::All => "all",
            Access::Employee => "employee",
        }
    }
}

/// Requester category. Resolved from an opaque role string per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Employee,
    PwdStudent,
    General,
}

impl Role {
    pub fn parse(value: &str) -> Self {
        match value {
            "employee" => Role::Employee,
            "pwd-student" => Role::PwdStudent,
            _ => Role::General,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::PwdStudent => "pwd-student",
            Role::General => "general",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub name: Option<String>,
    pub floor: i64,
    pub x: i64,
    pub y: i64,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub access: Access,
}

impl Node {
    pub fn distance_to(&self, other: &Node) -> f64 {
        // widen before subtracting; i64 differences can overflow
        let dx = self.x as f64 - other.x as f64;
        let dy = self.y as f64 - other.y as f64;
        dx.hypot(dy)
    }
}

/// A node row as the source of record returns it, before normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    pub name: Option<String>,
    pub floor: i64,
    pub x: i64,
    pub y: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub access: Option<String>,
}

impl NodeRecord {
    pub fn new(id: &str, floor: i64, x: i64, y: i64, kind: &str, access: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            name: None,
            floor,
            x,
            y,
            kind: kind.to_string(),
            access: access.map(str::to_string),
        }
    }

    pub fn into_node(self) -> Node {
        Node {
            access: Access::from_column(self.access.as_deref()),
            kind: NodeKind::from(self.kind),
            id: self.id,
            name: self.name,
            floor: self.floor,
            x: self.x,
            y: self.y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
}

impl EdgeRecord {
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}

pub fn validate_node(record: &NodeRecord) -> Result<(), NavGraphError> {
    if record.id.trim().is_empty() {
        return Err(NavGraphError::invalid_input("node id must be set"));
    }
    if record.kind.trim().is_empty() {
        return Err(NavGraphError::invalid_input("node type must be set"));
    }
    Ok(())
}

pub fn validate_edge(edge: &EdgeRecord) -> Result<(), NavGraphError> {
    if edge.source.trim().is_empty() || edge.target.trim().is_empty() {
        return Err(NavGraphError::invalid_input("edge endpoints must be set"));
    }
    Ok(())
}

pub fn row_to_node(row: &rusqlite::Row<'_>) -> Result<NodeRecord, rusqlite::Error> {
    Ok(NodeRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        kind: row.get(2)?,
        floor: row.get(3)?,
        x: row.get(4)?,
        y: row.get(5)?,
        access: row.get(6)?,
    })
}

pub fn row_to_edge(row: &rusqlite::Row<'_>) -> Result<EdgeRecord, rusqlite::Error> {
    Ok(EdgeRecord {
        source: row.get(0)?,
        target: row.get(1)?,
    })
}
