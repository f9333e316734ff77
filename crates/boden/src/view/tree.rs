//! The view hierarchy and its single lock.
//!
//! Parent/child links and the attached cores of every view belonging to one
//! [`UiContext`](crate::UiContext) live in one slot map behind one mutex.
//! A hierarchy edit touching the old parent, the child and the new parent
//! therefore never has to order several locks.
//!
//! Parents own their children (`Arc<View>`); everything else refers to
//! views by [`ViewId`] and resolves them only while they are alive. No view
//! method and no core is ever called while the lock is held, and no
//! `Arc<View>` is dropped under it.

use std::sync::{Arc, Weak};

use boden_core::logging::targets;
use boden_core::{BodenError, Result};
use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use super::View;
use super::core::ViewCore;

new_key_type! {
    /// Identity of a view within its context.
    pub struct ViewId;
}

struct Node {
    view: Weak<View>,
    parent: Option<ViewId>,
    children: Vec<Arc<View>>,
    core: Option<Arc<dyn ViewCore>>,
}

/// Storage released when a view is unregistered.
pub(crate) struct Released {
    pub core: Option<Arc<dyn ViewCore>>,
    pub children: Vec<Arc<View>>,
}

/// The hierarchy-and-core lock.
#[derive(Default)]
pub struct ViewTree {
    nodes: Mutex<SlotMap<ViewId, Node>>,
}

impl ViewTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register(&self, view: Weak<View>) -> ViewId {
        self.nodes.lock().insert(Node {
            view,
            parent: None,
            children: Vec::new(),
            core: None,
        })
    }

    /// Remove a view's node. Its surviving children become roots.
    pub(crate) fn unregister(&self, id: ViewId) -> Released {
        let mut nodes = self.nodes.lock();
        let Some(node) = nodes.remove(id) else {
            return Released {
                core: None,
                children: Vec::new(),
            };
        };

        if let Some(parent) = node.parent.and_then(|p| nodes.get_mut(p)) {
            // Only reachable while the parent itself is being torn down.
            parent.children.retain(|c| c.id() != id);
        }
        for child in &node.children {
            if let Some(child_node) = nodes.get_mut(child.id()) {
                child_node.parent = None;
            }
        }
        Released {
            core: node.core,
            children: node.children,
        }
    }

    /// Number of live views.
    pub fn len(&self) -> usize {
        self.nodes.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.lock().is_empty()
    }

    /// Resolve an id to a live view.
    pub fn view(&self, id: ViewId) -> Option<Arc<View>> {
        self.nodes.lock().get(id).and_then(|n| n.view.upgrade())
    }

    /// The parent of `id`, if it has one and it is still alive.
    pub fn parent(&self, id: ViewId) -> Option<Arc<View>> {
        let nodes = self.nodes.lock();
        let parent = nodes.get(id)?.parent?;
        nodes.get(parent)?.view.upgrade()
    }

    pub fn children(&self, id: ViewId) -> Vec<Arc<View>> {
        self.nodes
            .lock()
            .get(id)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// Distance from the root; a root has depth 0.
    pub fn depth(&self, id: ViewId) -> usize {
        let nodes = self.nodes.lock();
        let mut depth = 0;
        let mut current = nodes.get(id).and_then(|n| n.parent);
        while let Some(p) = current {
            depth += 1;
            current = nodes.get(p).and_then(|n| n.parent);
        }
        depth
    }

    pub fn core(&self, id: ViewId) -> Option<Arc<dyn ViewCore>> {
        self.nodes.lock().get(id).and_then(|n| n.core.clone())
    }

    /// Attach, replace or detach a core, returning the previous one.
    pub(crate) fn replace_core(
        &self,
        id: ViewId,
        core: Option<Arc<dyn ViewCore>>,
    ) -> Option<Arc<dyn ViewCore>> {
        let mut nodes = self.nodes.lock();
        match nodes.get_mut(id) {
            Some(node) => std::mem::replace(&mut node.core, core),
            None => core,
        }
    }

    /// Move `child` under `new_parent` (or detach it with `None`) in one
    /// step. `index` positions the child among its new siblings; `None`
    /// appends.
    ///
    /// Returns the previous parent if it is still alive.
    pub(crate) fn set_parent(
        &self,
        child: &Arc<View>,
        new_parent: Option<&Arc<View>>,
        index: Option<usize>,
    ) -> Result<Option<Arc<View>>> {
        let child_id = child.id();
        let mut nodes = self.nodes.lock();

        if let Some(parent) = new_parent {
            let mut current = Some(parent.id());
            while let Some(p) = current {
                if p == child_id {
                    return Err(BodenError::invalid_argument(
                        "a view cannot become a child of itself or of one of its descendants",
                    ));
                }
                current = nodes.get(p).and_then(|n| n.parent);
            }
        }

        let old_parent_id = nodes
            .get(child_id)
            .ok_or_else(|| BodenError::programming("view is not registered in this context"))?
            .parent;

        let mut held = None;
        if let Some(old) = old_parent_id.and_then(|p| nodes.get_mut(p)) {
            if let Some(pos) = old.children.iter().position(|c| c.id() == child_id) {
                held = Some(old.children.remove(pos));
            }
        }
        let old_parent = old_parent_id.and_then(|p| nodes.get(p)).and_then(|n| n.view.upgrade());

        let new_parent_id = new_parent.map(|p| p.id());
        if let Some(node) = nodes.get_mut(child_id) {
            node.parent = new_parent_id;
        }
        if let Some(new) = new_parent_id.and_then(|p| nodes.get_mut(p)) {
            let entry = held.take().unwrap_or_else(|| child.clone());
            let at = index.unwrap_or(new.children.len()).min(new.children.len());
            new.children.insert(at, entry);
        }
        drop(nodes);

        tracing::trace!(
            target: targets::VIEW,
            child = ?child_id,
            old_parent = ?old_parent_id,
            new_parent = ?new_parent_id,
            "view reparented"
        );
        // `held` and `old_parent` are released here, outside the lock.
        drop(held);
        Ok(old_parent)
    }
}

impl std::fmt::Debug for ViewTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewTree")
            .field("views", &self.len())
            .finish()
    }
}
