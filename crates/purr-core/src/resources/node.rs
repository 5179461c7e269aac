use jiff::Timestamp;
use k8s_openapi::api::core::v1::Node;

use crate::resource::{creation_time, ResourceSummary};

#[derive(Debug, Clone)]
pub struct NodeSummary {
    pub name: String,
    pub ready: bool,
    pub created: Option<Timestamp>,
}

impl ResourceSummary for NodeSummary {
    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> Option<&str> {
        None
    }

    fn status_display(&self) -> String {
        if self.ready {
            "Ready".into()
        } else {
            "NotReady".into()
        }
    }

    fn created(&self) -> Option<Timestamp> {
        self.created
    }
}

impl From<&Node> for NodeSummary {
    fn from(node: &Node) -> Self {
        let meta = &node.metadata;
        let name = meta.name.clone().unwrap_or_default();

        let ready = node
            .status
            .as_ref()
            .and_then(|s| s.conditions.as_ref())
            .map(|conds| conds.iter().any(|c| c.type_ == "Ready" && c.status == "True"))
            .unwrap_or(false);

        let created = creation_time(meta.creation_timestamp.as_ref());

        Self { name, ready, created }
    }
}

impl From<Node> for NodeSummary {
    fn from(node: Node) -> Self {
        Self::from(&node)
    }
}
