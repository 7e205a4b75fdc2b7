//! Workflow graph: ordered activities plus a connection registry.
//!
//! Ownership flows one way: the graph owns activities, activities own their
//! connectors, and connectors list the ids of the connections they take part
//! in. Connections themselves live in a registry keyed by [`ConnectionId`]
//! and point back at connectors by [`ConnectorRef`].

use crate::error::{DesignerError, Invariant, Result};
use crate::id::{ActivityId, ConnectionId};
use crate::layout::{ConnectionGeometry, TextMeasure, connector_center, layout_activity};
use crate::model::*;
use crate::vector::Vector;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct WorkflowGraph {
    /// Paint order = insertion order.
    activities: Vec<Activity>,
    /// Name → position in `activities`.
    id_index: HashMap<ActivityId, usize>,
    connections: HashMap<ConnectionId, Connection>,
    next_connection: u64,
}

impl WorkflowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Activities ──────────────────────────────────────────────────────

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Append an activity built from a host definition and lay it out.
    pub fn add_activity(
        &mut self,
        def: &ActivityDefinition,
        measure: &dyn TextMeasure,
    ) -> Result<ActivityId> {
        let mut activity = Activity::from_definition(def);
        let id = activity.id();
        if self.id_index.contains_key(&id) {
            return Err(DesignerError::DuplicateActivity(def.name.clone()));
        }
        layout_activity(&mut activity, measure);
        self.id_index.insert(id, self.activities.len());
        self.activities.push(activity);
        log::debug!("added activity @{}", id.as_str());
        Ok(id)
    }

    /// Update the mutable fields of an existing activity and re-run layout.
    pub fn update_activity(
        &mut self,
        def: &ActivityDefinition,
        measure: &dyn TextMeasure,
    ) -> Result<ActivityId> {
        let id = self.resolve(&def.name)?;
        let activity = self.activity_mut(id)?;
        activity.update(def);
        layout_activity(activity, measure);
        Ok(id)
    }

    /// Re-run layout on every activity, e.g. after the font changed.
    pub fn relayout(&mut self, measure: &dyn TextMeasure) {
        for activity in &mut self.activities {
            layout_activity(activity, measure);
        }
    }

    /// Sever every connection of the activity, then remove it.
    pub fn remove_activity(&mut self, id: ActivityId) -> Result<Activity> {
        let idx = self.index_of(id)?;
        let refs: Vec<ConnectorRef> = self.activities[idx]
            .all_connectors()
            .map(|(r, _)| r)
            .collect();
        for r in refs {
            self.disconnect_and_delete_connections(r)?;
        }
        let removed = self.activities.remove(idx);
        self.rebuild_index();
        log::debug!("removed activity @{}", id.as_str());
        Ok(removed)
    }

    /// Drop every activity and connection.
    pub fn clear(&mut self) {
        self.activities.clear();
        self.id_index.clear();
        self.connections.clear();
    }

    /// Map a host-supplied name to an existing activity id.
    pub fn resolve(&self, name: &str) -> Result<ActivityId> {
        ActivityId::get(name)
            .filter(|id| self.id_index.contains_key(id))
            .ok_or_else(|| DesignerError::ActivityNotFound(name.to_string()))
    }

    /// Exact lookup by name.
    pub fn get_activity(&self, name: &str) -> Result<&Activity> {
        let id = self.resolve(name)?;
        self.activity(id)
    }

    pub fn activity(&self, id: ActivityId) -> Result<&Activity> {
        let idx = self.index_of(id)?;
        Ok(&self.activities[idx])
    }

    pub fn activity_mut(&mut self, id: ActivityId) -> Result<&mut Activity> {
        let idx = self.index_of(id)?;
        Ok(&mut self.activities[idx])
    }

    pub fn contains(&self, id: ActivityId) -> bool {
        self.id_index.contains_key(&id)
    }

    fn index_of(&self, id: ActivityId) -> Result<usize> {
        self.id_index
            .get(&id)
            .copied()
            .ok_or_else(|| DesignerError::ActivityNotFound(id.as_str().to_string()))
    }

    fn rebuild_index(&mut self) {
        self.id_index = self
            .activities
            .iter()
            .enumerate()
            .map(|(i, a)| (a.id(), i))
            .collect();
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn selected(&self) -> Option<ActivityId> {
        self.activities
            .iter()
            .find(|a| a.is_selected)
            .map(|a| a.id())
    }

    /// Mark `id` as the only selected activity. Returns the previously
    /// selected activity, if any.
    pub fn select(&mut self, id: ActivityId) -> Result<Option<ActivityId>> {
        self.index_of(id)?;
        let previous = self.unselect();
        self.activity_mut(id)?.is_selected = true;
        Ok(previous)
    }

    /// Clear the selection, returning what was selected.
    pub fn unselect(&mut self) -> Option<ActivityId> {
        let selected = self.activities.iter_mut().find(|a| a.is_selected)?;
        selected.is_selected = false;
        Some(selected.id())
    }

    // ─── Connectors ──────────────────────────────────────────────────────

    pub fn connector(&self, r: ConnectorRef) -> Result<&Connector> {
        self.activity(r.activity)?
            .connectors(r.direction)
            .get(r.index)
            .ok_or_else(|| self.connector_not_found(r))
    }

    fn connector_mut(&mut self, r: ConnectorRef) -> Result<&mut Connector> {
        self.connector(r)?;
        let activity = self.activity_mut(r.activity)?;
        Ok(&mut activity.connectors_mut(r.direction)[r.index])
    }

    fn connector_not_found(&self, r: ConnectorRef) -> DesignerError {
        DesignerError::ConnectorNotFound {
            activity: r.activity.as_str().to_string(),
            direction: r.direction,
            name: format!("#{}", r.index),
        }
    }

    /// Look up a connector by activity and connector name.
    pub fn find_connector(
        &self,
        activity_name: &str,
        direction: Direction,
        name: &str,
    ) -> Result<ConnectorRef> {
        self.get_activity(activity_name)?
            .find_connector(direction, name)
            .ok_or_else(|| DesignerError::ConnectorNotFound {
                activity: activity_name.to_string(),
                direction,
                name: name.to_string(),
            })
    }

    /// Centre of a connector in model space, derived from the owning
    /// activity's current position.
    pub fn connector_position(&self, r: ConnectorRef) -> Result<Vector> {
        let activity = self.activity(r.activity)?;
        let offset = self
            .connector(r)?
            .position
            .ok_or(Invariant::UnplacedConnector)?;
        Ok(connector_center(activity.position, offset))
    }

    // ─── Connections ─────────────────────────────────────────────────────

    pub fn connection(&self, id: ConnectionId) -> Result<&Connection> {
        self.connections
            .get(&id)
            .ok_or(DesignerError::ConnectionNotFound(id))
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    fn register(&mut self, connection: Connection) -> ConnectionId {
        let id = ConnectionId(self.next_connection);
        self.next_connection += 1;
        self.connections.insert(id, connection);
        id
    }

    /// Create a fully-connected connection from a host definition.
    pub fn add_connection(&mut self, def: &ConnectionDefinition) -> Result<ConnectionId> {
        let output =
            self.find_connector(&def.output_activity_name, Direction::Output, &def.output_name)?;
        let input =
            self.find_connector(&def.input_activity_name, Direction::Input, &def.input_name)?;
        self.connect(output, input)
    }

    /// Join an output connector to an input connector.
    pub fn connect(&mut self, output: ConnectorRef, input: ConnectorRef) -> Result<ConnectionId> {
        self.connector(output)?;
        self.connector(input)?;
        let id = self.register(Connection::new(Some(output), Some(input), None)?);
        self.connector_mut(output)?.add_connection(id);
        self.connector_mut(input)?.add_connection(id);
        log::debug!("connected {output:?} -> {input:?} as {id}");
        Ok(id)
    }

    /// Create a half-open connection hanging off `fixed`; the other end
    /// follows `free_position` until it is attached or discarded.
    pub fn open_connection(&mut self, fixed: ConnectorRef, free_position: Vector) -> Result<ConnectionId> {
        self.connector(fixed)?;
        let connection = match fixed.direction {
            Direction::Output => Connection::new(Some(fixed), None, Some(free_position))?,
            Direction::Input => Connection::new(None, Some(fixed), Some(free_position))?,
        };
        let id = self.register(connection);
        self.connector_mut(fixed)?.add_connection(id);
        Ok(id)
    }

    /// Move the free end of a half-open connection.
    pub fn set_free_position(&mut self, id: ConnectionId, position: Vector) -> Result<()> {
        self.connections
            .get_mut(&id)
            .ok_or(DesignerError::ConnectionNotFound(id))?
            .free_position = Some(position);
        Ok(())
    }

    /// Attach the missing end of a half-open connection to `connector`.
    pub fn attach(&mut self, id: ConnectionId, connector: ConnectorRef) -> Result<()> {
        self.connector(connector)?;
        let connection = self
            .connections
            .get_mut(&id)
            .ok_or(DesignerError::ConnectionNotFound(id))?;
        connection.attach(connector);
        connection.free_position = None;
        self.connector_mut(connector)?.add_connection(id);
        Ok(())
    }

    /// Remove a connection from one connector's list. Fails when the
    /// connection is not attached there.
    pub fn delete_connection(&mut self, connector: ConnectorRef, id: ConnectionId) -> Result<()> {
        if self.connector_mut(connector)?.remove_connection(id) {
            Ok(())
        } else {
            Err(DesignerError::ConnectionNotFound(id))
        }
    }

    /// Drop a connection from the registry and from every connector that
    /// lists it.
    pub fn discard_connection(&mut self, id: ConnectionId) -> Result<Connection> {
        let connection = self
            .connections
            .remove(&id)
            .ok_or(DesignerError::ConnectionNotFound(id))?;
        for end in [connection.output(), connection.input()].into_iter().flatten() {
            if self.contains(end.activity) {
                self.delete_connection(end, id)?;
            }
        }
        Ok(connection)
    }

    /// Sever every connection attached to `connector`: each one is removed
    /// from the far connector's list, then this connector's list is emptied.
    pub fn disconnect_and_delete_connections(&mut self, connector: ConnectorRef) -> Result<Vec<ConnectionId>> {
        let ids: Vec<ConnectionId> = self.connector(connector)?.connections.to_vec();
        for &id in &ids {
            let connection = self.connection(id)?;
            if let Some(other) = connection.other_end(connector) {
                self.delete_connection(other, id)?;
            }
            self.connections.remove(&id);
        }
        self.connector_mut(connector)?.connections.clear();
        if !ids.is_empty() {
            log::debug!("severed {} connection(s) of {connector:?}", ids.len());
        }
        Ok(ids)
    }

    /// Every connection reachable from any connector, each listed once, in
    /// first-seen order.
    pub fn unique_connections(&self) -> Vec<ConnectionId> {
        let mut seen = Vec::new();
        for activity in &self.activities {
            for (_, connector) in activity.all_connectors() {
                for id in &connector.connections {
                    if !seen.contains(id) {
                        seen.push(*id);
                    }
                }
            }
        }
        seen
    }

    /// Host record for a connection. Fails while the connection is half-open.
    pub fn connection_definition(&self, id: ConnectionId) -> Result<ConnectionDefinition> {
        let (output, input) = self.connection(id)?.require_two_connectors()?;
        Ok(ConnectionDefinition {
            output_activity_name: output.activity.as_str().to_string(),
            output_name: self.connector(output)?.name.clone(),
            input_activity_name: input.activity.as_str().to_string(),
            input_name: self.connector(input)?.name.clone(),
        })
    }

    /// Line, arrow, and label geometry for drawing a connection.
    pub fn connection_geometry(
        &self,
        id: ConnectionId,
        measure: &dyn TextMeasure,
    ) -> Result<ConnectionGeometry> {
        let connection = self.connection(id)?;
        let free = connection.free_position;
        let end_position = |end: Option<ConnectorRef>| -> Result<Vector> {
            match end {
                Some(r) => self.connector_position(r),
                None => free.ok_or(Invariant::HalfOpenConnection.into()),
            }
        };
        let start = end_position(connection.output())?;
        let end = end_position(connection.input())?;
        let label = match connection.output() {
            Some(r) => Some(self.connector(r)?.name.as_str()),
            None => None,
        };
        Ok(ConnectionGeometry::between(start, end, label, measure))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::MonospaceMeasure;
    use pretty_assertions::assert_eq;

    fn def(name: &str, inputs: &[&str], outputs: &[&str]) -> ActivityDefinition {
        ActivityDefinition {
            name: name.into(),
            label: name.into(),
            color: "#445566".into(),
            left: 0.0,
            top: 0.0,
            is_invalid: false,
            can_delete: true,
            input_names: inputs.iter().map(|s| s.to_string()).collect(),
            output_names: outputs.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn edge(from: &str, out: &str, to: &str, input: &str) -> ConnectionDefinition {
        ConnectionDefinition {
            output_activity_name: from.into(),
            output_name: out.into(),
            input_activity_name: to.into(),
            input_name: input.into(),
        }
    }

    fn chain() -> WorkflowGraph {
        let m = MonospaceMeasure::default();
        let mut g = WorkflowGraph::new();
        g.add_activity(&def("g_start", &[], &["next"]), &m).unwrap();
        g.add_activity(&def("g_mid", &["in"], &["next"]), &m).unwrap();
        g.add_activity(&def("g_end", &["in"], &[]), &m).unwrap();
        g.add_connection(&edge("g_start", "next", "g_mid", "in")).unwrap();
        g.add_connection(&edge("g_mid", "next", "g_end", "in")).unwrap();
        g
    }

    #[test]
    fn get_activity_by_name() {
        let g = chain();
        assert_eq!(g.get_activity("g_mid").unwrap().name(), "g_mid");
        assert_eq!(
            g.get_activity("g_missing").unwrap_err(),
            DesignerError::ActivityNotFound("g_missing".into())
        );
    }

    #[test]
    fn duplicate_names_rejected() {
        let mut g = chain();
        let err = g
            .add_activity(&def("g_mid", &[], &[]), &MonospaceMeasure::default())
            .unwrap_err();
        assert_eq!(err, DesignerError::DuplicateActivity("g_mid".into()));
        assert_eq!(g.len(), 3);
    }

    #[test]
    fn unique_connections_count_shared_edges_once() {
        let g = chain();
        assert_eq!(g.unique_connections().len(), 2);
        assert_eq!(g.connection_count(), 2);
    }

    #[test]
    fn remove_activity_cascades() {
        let mut g = chain();
        let mid = g.resolve("g_mid").unwrap();
        g.remove_activity(mid).unwrap();

        assert_eq!(g.len(), 2);
        assert!(g.get_activity("g_mid").is_err());
        assert_eq!(g.connection_count(), 0);
        for a in g.activities() {
            for (_, c) in a.all_connectors() {
                assert!(c.connections.is_empty(), "{} still connected", c.name);
            }
        }
        // Index stays consistent after removal.
        assert_eq!(g.get_activity("g_end").unwrap().name(), "g_end");
    }

    #[test]
    fn definitions_require_both_ends() {
        let mut g = chain();
        let ids = g.unique_connections();
        let defn = g.connection_definition(ids[0]).unwrap();
        assert_eq!(defn, edge("g_start", "next", "g_mid", "in"));

        let input = g.find_connector("g_end", Direction::Input, "in").unwrap();
        let open = g.open_connection(input, Vector::new(5.0, 5.0)).unwrap();
        assert_eq!(
            g.connection_definition(open).unwrap_err(),
            DesignerError::InvariantViolation(Invariant::HalfOpenConnection)
        );
    }

    #[test]
    fn unknown_connector_is_not_found() {
        let mut g = chain();
        let err = g
            .add_connection(&edge("g_start", "nope", "g_mid", "in"))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn connector_position_follows_activity() {
        let mut g = chain();
        let r = g.find_connector("g_start", Direction::Output, "next").unwrap();
        let before = g.connector_position(r).unwrap();
        g.activity_mut(r.activity).unwrap().position = Vector::new(40.0, 10.0);
        let after = g.connector_position(r).unwrap();
        assert_eq!(after.subtract(before), Vector::new(40.0, 10.0));
    }

    #[test]
    fn selection_is_exclusive() {
        let mut g = chain();
        let a = g.resolve("g_start").unwrap();
        let b = g.resolve("g_end").unwrap();
        assert_eq!(g.select(a).unwrap(), None);
        assert_eq!(g.select(b).unwrap(), Some(a));
        assert_eq!(g.selected(), Some(b));
        assert_eq!(g.activities().iter().filter(|x| x.is_selected).count(), 1);
        assert_eq!(g.unselect(), Some(b));
        assert_eq!(g.selected(), None);
    }

    #[test]
    fn delete_connection_requires_membership() {
        let mut g = chain();
        let r = g.find_connector("g_start", Direction::Output, "next").unwrap();
        let ids = g.unique_connections();
        let err = g.delete_connection(r, ids[1]).unwrap_err();
        assert_eq!(err, DesignerError::ConnectionNotFound(ids[1]));
    }
}
