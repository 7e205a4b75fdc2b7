//! Workflow graph data model.
//!
//! Activities are nodes with ordered input and output connectors; connections
//! are directed edges from an output connector to an input connector. A
//! connection may be transiently half-open while the user rewires it, in
//! which case its missing end follows a free position.
//!
//! Back-references (connector → activity, connection → connectors) are plain
//! identifiers resolved through the owning [`WorkflowGraph`](crate::graph::WorkflowGraph).

use crate::error::{Invariant, Result};
use crate::id::{ActivityId, ConnectionId};
use crate::layout::ActivityLayout;
use crate::vector::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

// ─── Host records ────────────────────────────────────────────────────────

/// Activity record exchanged with the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDefinition {
    pub name: String,
    pub label: String,
    pub color: String,
    pub left: f64,
    pub top: f64,
    #[serde(default)]
    pub is_invalid: bool,
    #[serde(default)]
    pub can_delete: bool,
    #[serde(default)]
    pub input_names: Vec<String>,
    #[serde(default)]
    pub output_names: Vec<String>,
}

/// Connection record exchanged with the host. Only fully-connected
/// connections can be described by one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDefinition {
    pub output_activity_name: String,
    pub output_name: String,
    pub input_activity_name: String,
    pub input_name: String,
}

// ─── Connectors ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Input,
    Output,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Input => f.write_str("input"),
            Direction::Output => f.write_str("output"),
        }
    }
}

/// Address of a connector: owning activity, side, and slot in that side's
/// ordered connector list. Connector lists never change after construction,
/// so a reference stays valid for the activity's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectorRef {
    pub activity: ActivityId,
    pub direction: Direction,
    pub index: usize,
}

impl ConnectorRef {
    pub fn new(activity: ActivityId, direction: Direction, index: usize) -> Self {
        Self {
            activity,
            direction,
            index,
        }
    }
}

/// A typed port on an activity.
#[derive(Debug, Clone)]
pub struct Connector {
    pub activity: ActivityId,
    pub name: String,
    pub direction: Direction,
    /// Offset from the activity origin. `None` until the first layout pass.
    pub position: Option<Vector>,
    /// Connections attached to this connector, in attach order.
    pub connections: SmallVec<[ConnectionId; 2]>,
}

impl Connector {
    pub fn new(activity: ActivityId, name: impl Into<String>, direction: Direction) -> Self {
        Self {
            activity,
            name: name.into(),
            direction,
            position: None,
            connections: SmallVec::new(),
        }
    }

    pub fn add_connection(&mut self, id: ConnectionId) {
        self.connections.push(id);
    }

    /// Detach one connection from this connector's list. Returns `false` when
    /// the connection was not attached here.
    pub fn remove_connection(&mut self, id: ConnectionId) -> bool {
        match self.connections.iter().position(|c| *c == id) {
            Some(pos) => {
                self.connections.remove(pos);
                true
            }
            None => false,
        }
    }
}

// ─── Activities ──────────────────────────────────────────────────────────

/// A workflow node.
#[derive(Debug, Clone)]
pub struct Activity {
    id: ActivityId,
    pub label: String,
    pub color: String,
    /// Top-left corner in unscaled model space.
    pub position: Vector,
    pub is_invalid: bool,
    pub can_delete: bool,
    pub is_selected: bool,
    pub inputs: Vec<Connector>,
    pub outputs: Vec<Connector>,
    /// Result of the last layout pass.
    pub layout: Option<ActivityLayout>,
}

impl Activity {
    pub fn from_definition(def: &ActivityDefinition) -> Self {
        let id = ActivityId::intern(&def.name);
        Self {
            id,
            label: def.label.clone(),
            color: def.color.clone(),
            position: Vector::new(def.left, def.top),
            is_invalid: def.is_invalid,
            can_delete: def.can_delete,
            is_selected: false,
            inputs: def
                .input_names
                .iter()
                .map(|n| Connector::new(id, n.as_str(), Direction::Input))
                .collect(),
            outputs: def
                .output_names
                .iter()
                .map(|n| Connector::new(id, n.as_str(), Direction::Output))
                .collect(),
            layout: None,
        }
    }

    pub fn id(&self) -> ActivityId {
        self.id
    }

    pub fn name(&self) -> &str {
        self.id.as_str()
    }

    /// Copy the mutable fields of a definition. Position and connectors are
    /// owned by the designer once the activity exists.
    pub fn update(&mut self, def: &ActivityDefinition) {
        self.label = def.label.clone();
        self.color = def.color.clone();
        self.is_invalid = def.is_invalid;
        self.can_delete = def.can_delete;
    }

    pub fn connectors(&self, direction: Direction) -> &[Connector] {
        match direction {
            Direction::Input => &self.inputs,
            Direction::Output => &self.outputs,
        }
    }

    pub fn connectors_mut(&mut self, direction: Direction) -> &mut [Connector] {
        match direction {
            Direction::Input => &mut self.inputs,
            Direction::Output => &mut self.outputs,
        }
    }

    /// Input connectors first, then outputs, with their addresses.
    pub fn all_connectors(&self) -> impl Iterator<Item = (ConnectorRef, &Connector)> {
        let id = self.id;
        self.inputs
            .iter()
            .enumerate()
            .map(move |(i, c)| (ConnectorRef::new(id, Direction::Input, i), c))
            .chain(
                self.outputs
                    .iter()
                    .enumerate()
                    .map(move |(i, c)| (ConnectorRef::new(id, Direction::Output, i), c)),
            )
    }

    pub fn find_connector(&self, direction: Direction, name: &str) -> Option<ConnectorRef> {
        self.connectors(direction)
            .iter()
            .position(|c| c.name == name)
            .map(|index| ConnectorRef::new(self.id, direction, index))
    }

    pub fn to_definition(&self) -> ActivityDefinition {
        ActivityDefinition {
            name: self.name().to_string(),
            label: self.label.clone(),
            color: self.color.clone(),
            left: self.position.x,
            top: self.position.y,
            is_invalid: self.is_invalid,
            // Deletability is host policy and is never echoed back.
            can_delete: false,
            input_names: self.inputs.iter().map(|c| c.name.clone()).collect(),
            output_names: self.outputs.iter().map(|c| c.name.clone()).collect(),
        }
    }
}

// ─── Connections ─────────────────────────────────────────────────────────

/// A directed edge. At least one endpoint is always set.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    output: Option<ConnectorRef>,
    input: Option<ConnectorRef>,
    /// Where the missing end is drawn while the connection is half-open.
    pub free_position: Option<Vector>,
}

impl Connection {
    pub fn new(
        output: Option<ConnectorRef>,
        input: Option<ConnectorRef>,
        free_position: Option<Vector>,
    ) -> Result<Self> {
        if output.is_none() && input.is_none() {
            return Err(Invariant::EmptyConnection.into());
        }
        Ok(Self {
            output,
            input,
            free_position,
        })
    }

    pub fn output(&self) -> Option<ConnectorRef> {
        self.output
    }

    pub fn input(&self) -> Option<ConnectorRef> {
        self.input
    }

    /// Fill the missing slot on the given side.
    pub fn attach(&mut self, connector: ConnectorRef) {
        match connector.direction {
            Direction::Input => self.input = Some(connector),
            Direction::Output => self.output = Some(connector),
        }
    }

    /// Both endpoints as `(output, input)`, or an invariant error when the
    /// connection is half-open.
    pub fn require_two_connectors(&self) -> Result<(ConnectorRef, ConnectorRef)> {
        match (self.output, self.input) {
            (Some(o), Some(i)) => Ok((o, i)),
            _ => Err(Invariant::HalfOpenConnection.into()),
        }
    }

    /// Endpoint on the other side of `connector`, if set.
    pub fn other_end(&self, connector: ConnectorRef) -> Option<ConnectorRef> {
        match connector.direction {
            Direction::Input => self.output,
            Direction::Output => self.input,
        }
    }
}
