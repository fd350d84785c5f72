use std::collections::HashMap;

use serde::Serialize;

use crate::widget::widget_model::Widget;

/// Stable handle of a widget inside one form's registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One `<widget>` element as read from the descriptor, before the factory
/// has decided whether it becomes a registry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetDescriptor {
    pub name: String,
    pub id: String,
    pub type_tag: Option<String>,
    /// Nearest enclosing widget that made it into the registry
    pub parent: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetNode {
    pub widget: Widget,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Widgets of a single form, keyed by name.
///
/// Nodes live in declaration order in an arena; parent and child links are
/// [`NodeId`]s into that arena. Read-only once parsing has finished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetRegistry {
    nodes: Vec<WidgetNode>,
    by_name: HashMap<String, NodeId>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a widget under `parent`. The caller has already rejected
    /// duplicate names.
    pub(crate) fn insert(&mut self, widget: Widget, parent: Option<NodeId>) -> NodeId {
        debug_assert!(!self.by_name.contains_key(&widget.name));
        let id = NodeId(self.nodes.len());
        self.by_name.insert(widget.name.clone(), id);
        self.nodes.push(WidgetNode {
            widget,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Widget> {
        self.node_id(name).map(|id| &self.nodes[id.0].widget)
    }

    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    pub fn node(&self, id: NodeId) -> Option<&WidgetNode> {
        self.nodes.get(id.0)
    }

    pub fn parent_of(&self, name: &str) -> Option<&Widget> {
        let node = self.node(self.node_id(name)?)?;
        node.parent.map(|parent| &self.nodes[parent.0].widget)
    }

    pub fn children_of(&self, name: &str) -> Vec<&Widget> {
        self.node_id(name)
            .and_then(|id| self.node(id))
            .map(|node| {
                node.children
                    .iter()
                    .map(|child| &self.nodes[child.0].widget)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Top-level widgets in declaration order.
    pub fn roots(&self) -> impl Iterator<Item = (NodeId, &WidgetNode)> {
        self.iter_nodes().filter(|(_, node)| node.parent.is_none())
    }

    pub fn iter_nodes(&self) -> impl Iterator<Item = (NodeId, &WidgetNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }

    /// All widgets in declaration order.
    pub fn widgets(&self) -> impl Iterator<Item = &Widget> {
        self.nodes.iter().map(|node| &node.widget)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.widgets().map(|widget| widget.name.as_str())
    }
}
