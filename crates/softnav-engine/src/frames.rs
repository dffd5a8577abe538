//! Animation-frame queue
//!
//! Work deferred to the next frame. The host (or runtime) calls
//! [`FrameQueue::run`] once per frame; tasks queued while running wait for
//! the following one.

use softnav_dom::{Document, NodeId};

/// Deferred DOM mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameTask {
    RemoveClass { node: NodeId, class: String },
}

impl FrameTask {
    fn apply(self, document: &mut Document) {
        match self {
            FrameTask::RemoveClass { node, class } => document.tree_mut().remove_class(node, &class),
        }
    }
}

#[derive(Debug, Default)]
pub struct FrameQueue {
    tasks: Vec<FrameTask>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// `requestAnimationFrame`
    pub fn request(&mut self, task: FrameTask) {
        self.tasks.push(task);
    }

    /// Run everything queued so far; returns the number of tasks run
    pub fn run(&mut self, document: &mut Document) -> usize {
        let tasks = std::mem::take(&mut self.tasks);
        let count = tasks.len();
        for task in tasks {
            task.apply(document);
        }
        count
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
