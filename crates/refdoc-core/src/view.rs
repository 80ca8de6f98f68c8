use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// A view-state change, delivered synchronously to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Activated { id: String },
    Deactivated { id: String },
    ExpandedChanged { id: String, expanded: bool },
    Ready { id: String },
}

type Subscriber = Box<dyn Fn(&ViewEvent)>;

/// Subscriber list shared by every view-flag holder in one document model.
/// The model owns the state and the notification hook; rendering is the
/// subscriber's business.
#[derive(Clone, Default)]
pub struct Notifier {
    subscribers: Rc<RefCell<Vec<Subscriber>>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, subscriber: impl Fn(&ViewEvent) + 'static) {
        self.subscribers.borrow_mut().push(Box::new(subscriber));
    }

    fn emit(&self, event: ViewEvent) {
        for subscriber in self.subscribers.borrow().iter() {
            subscriber(&event);
        }
    }
}

/// Mutable presentation flags on one navigable entity. The only mutable
/// state in the model graph; everything else is computed once and cached.
pub struct ViewFlags {
    id: String,
    active: Cell<bool>,
    expanded: Cell<bool>,
    ready: Cell<bool>,
    notifier: Notifier,
}

impl ViewFlags {
    pub fn new(id: impl Into<String>, notifier: Notifier) -> Self {
        Self {
            id: id.into(),
            active: Cell::new(false),
            expanded: Cell::new(false),
            // Ready by default; `defer_ready` opts a subtree into lazy mounting.
            ready: Cell::new(true),
            notifier,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Set by the external active-item tracker; exactly one navigation
    /// entity should be active at a time (enforced by `MenuModel`).
    pub fn activate(&self) {
        if !self.active.replace(true) {
            self.notifier.emit(ViewEvent::Activated { id: self.id.clone() });
        }
    }

    pub fn deactivate(&self) {
        if self.active.replace(false) {
            self.notifier.emit(ViewEvent::Deactivated { id: self.id.clone() });
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded.get()
    }

    pub fn set_expanded(&self, expanded: bool) {
        if self.expanded.replace(expanded) != expanded {
            self.notifier.emit(ViewEvent::ExpandedChanged {
                id: self.id.clone(),
                expanded,
            });
        }
    }

    pub fn toggle_expanded(&self) {
        self.set_expanded(!self.is_expanded());
    }

    pub fn is_ready(&self) -> bool {
        self.ready.get()
    }

    /// Mark a subtree not-yet-mounted; cleared permanently by `mark_ready`.
    pub fn defer_ready(&self) {
        self.ready.set(false);
    }

    pub fn mark_ready(&self) {
        if !self.ready.replace(true) {
            self.notifier.emit(ViewEvent::Ready { id: self.id.clone() });
        }
    }
}
