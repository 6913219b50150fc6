//! The drawing surface the layout talks to.
//!
//! The layout never owns element state. It creates, deletes and updates elements through
//! [`Surface`] and re-queries whenever it is told that something changed. [`Canvas`] is the
//! in-memory implementation used by the CLI and the tests.

use log::{debug, warn};

use crate::model::{Element, ElementId, Geometry, Hub, Role};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("element already exists: {0}")]
    DuplicateElement(ElementId),
    #[error("unknown element: {0}")]
    UnknownElement(ElementId),
}

/// Called synchronously after every mutation, with the surface that changed.
pub type ChangeListener = Box<dyn FnMut(&mut dyn Surface)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

pub trait Surface {
    fn create_element(&mut self, element: Element) -> Result<(), SurfaceError>;

    /// Removes an element, returning it if it existed.
    fn delete_element(&mut self, id: &ElementId) -> Option<Element>;

    fn update_element(&mut self, id: &ElementId, geometry: Geometry) -> Result<(), SurfaceError>;

    fn elements(&self) -> Vec<Element>;

    fn find_element(&self, predicate: &dyn Fn(&Element) -> bool) -> Option<Element>;

    fn subscribe(&mut self, listener: ChangeListener) -> Subscription;

    fn unsubscribe(&mut self, subscription: Subscription) -> bool;
}

/// Locates the hub element by role and reads its circle.
pub fn find_hub(surface: &dyn Surface) -> Option<Hub> {
    surface
        .find_element(&|element: &Element| element.role == Role::Hub)
        .and_then(|element| Hub::from_element(&element))
}

const MAX_DISPATCH_ROUNDS: usize = 8;

#[derive(Default)]
pub struct Canvas {
    elements: Vec<Element>,
    listeners: Vec<(Subscription, ChangeListener)>,
    removed_while_dispatching: Vec<Subscription>,
    next_subscription: u64,
    revision: u64,
    dispatching: bool,
    pending: bool,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of mutations applied so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|element| &element.id == id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn changed(&mut self) {
        self.revision += 1;
        if self.dispatching {
            self.pending = true;
            return;
        }

        self.dispatching = true;
        let mut rounds = 0;
        loop {
            self.pending = false;
            let mut active = std::mem::take(&mut self.listeners);
            for (_, listener) in active.iter_mut() {
                listener(self);
            }
            // Listeners added during dispatch were pushed onto the emptied list.
            active.append(&mut self.listeners);
            let removed = std::mem::take(&mut self.removed_while_dispatching);
            active.retain(|(subscription, _)| !removed.contains(subscription));
            self.listeners = active;

            rounds += 1;
            if !self.pending {
                break;
            }
            if rounds >= MAX_DISPATCH_ROUNDS {
                warn!("change listeners did not settle after {rounds} rounds");
                self.pending = false;
                break;
            }
        }
        self.dispatching = false;
    }
}

impl Surface for Canvas {
    fn create_element(&mut self, element: Element) -> Result<(), SurfaceError> {
        if self.get(&element.id).is_some() {
            return Err(SurfaceError::DuplicateElement(element.id));
        }
        debug!("create {}", element.id);
        self.elements.push(element);
        self.changed();
        Ok(())
    }

    fn delete_element(&mut self, id: &ElementId) -> Option<Element> {
        let idx = self.elements.iter().position(|element| &element.id == id)?;
        let removed = self.elements.remove(idx);
        debug!("delete {id}");
        self.changed();
        Some(removed)
    }

    fn update_element(&mut self, id: &ElementId, geometry: Geometry) -> Result<(), SurfaceError> {
        let element = self
            .elements
            .iter_mut()
            .find(|element| &element.id == id)
            .ok_or_else(|| SurfaceError::UnknownElement(id.clone()))?;
        if element.geometry == geometry {
            return Ok(());
        }
        element.geometry = geometry;
        self.changed();
        Ok(())
    }

    fn elements(&self) -> Vec<Element> {
        self.elements.clone()
    }

    fn find_element(&self, predicate: &dyn Fn(&Element) -> bool) -> Option<Element> {
        self.elements.iter().find(|element| predicate(element)).cloned()
    }

    fn subscribe(&mut self, listener: ChangeListener) -> Subscription {
        let subscription = Subscription(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((subscription, listener));
        subscription
    }

    fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != subscription);
        if self.listeners.len() != before {
            return true;
        }
        if self.dispatching {
            self.removed_while_dispatching.push(subscription);
            return true;
        }
        false
    }
}
