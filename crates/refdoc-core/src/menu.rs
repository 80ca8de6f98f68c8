use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use heck::ToKebabCase;

use crate::model::group::GroupModel;
use crate::model::operation::OperationModel;

/// What a flattened navigation node points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItemKind {
    Group,
    Operation,
    /// A named content section inside a long operation description.
    Section,
}

/// One node of the flattened navigation outline.
///
/// `absolute_idx` is the node's position in document order; indices are
/// strictly increasing across one build and are the coordinate system the
/// external scroll tracker reports visibility in.
pub struct MenuItem {
    pub kind: MenuItemKind,
    pub id: String,
    pub name: String,
    pub depth: usize,
    pub absolute_idx: usize,

    group: Option<Rc<GroupModel>>,
    operation: Option<Rc<OperationModel>>,
}

impl MenuItem {
    pub fn group(&self) -> Option<&Rc<GroupModel>> {
        self.group.as_ref()
    }

    pub fn operation(&self) -> Option<&Rc<OperationModel>> {
        self.operation.as_ref()
    }

    fn activate_entity(&self) {
        match self.kind {
            MenuItemKind::Group => {
                if let Some(group) = &self.group {
                    group.flags.activate();
                }
            }
            // A section is active through its owning operation.
            MenuItemKind::Operation | MenuItemKind::Section => {
                if let Some(operation) = &self.operation {
                    operation.flags.activate();
                }
            }
        }
    }

    fn deactivate_entity(&self) {
        if let Some(group) = &self.group {
            group.flags.deactivate();
        }
        if let Some(operation) = &self.operation {
            operation.flags.deactivate();
        }
    }

    fn expand_entity(&self) {
        if let Some(group) = &self.group {
            group.expand();
        }
        if let Some(operation) = &self.operation {
            operation.expand();
        }
    }
}

/// The flattened outline: single source of truth for the table of
/// contents, search targets, and active-item tracking.
pub struct MenuModel {
    items: Vec<Rc<MenuItem>>,
    by_id: HashMap<String, usize>,
    active: Cell<Option<usize>>,
}

impl MenuModel {
    /// Single pre-order walk over groups → operations → sections.
    pub(crate) fn build(groups: &[Rc<GroupModel>]) -> MenuModel {
        let mut builder = MenuBuilder::default();

        for group in groups {
            builder.push(MenuItemKind::Group, group.id.clone(), group.name.clone(), 0, group, None);

            for operation in group.operations().iter() {
                builder.push(
                    MenuItemKind::Operation,
                    operation.id.clone(),
                    operation.name.clone(),
                    1,
                    group,
                    Some(operation),
                );

                for heading in section_headings(operation.description.as_deref()) {
                    builder.push(
                        MenuItemKind::Section,
                        format!("{}/{}", operation.id, heading.to_kebab_case()),
                        heading,
                        2,
                        group,
                        Some(operation),
                    );
                }
            }
        }

        log::debug!("menu built with {} items", builder.items.len());
        MenuModel {
            items: builder.items,
            by_id: builder.by_id,
            active: Cell::new(None),
        }
    }

    pub fn items(&self) -> &[Rc<MenuItem>] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn active_idx(&self) -> Option<usize> {
        self.active.get()
    }

    pub fn active_item(&self) -> Option<&Rc<MenuItem>> {
        self.active.get().and_then(|idx| self.items.get(idx))
    }

    /// Move the single active marker. Called by the external visibility
    /// tracker during scroll and by keyboard/search navigation; the
    /// previous item is always deactivated first.
    pub fn activate(&self, idx: Option<usize>) {
        if self.active.get() == idx {
            return;
        }
        if let Some(previous) = self.active_item() {
            previous.deactivate_entity();
        }
        self.active.set(idx.filter(|i| *i < self.items.len()));
        if let Some(item) = self.active_item() {
            item.activate_entity();
            item.expand_entity();
        }
    }

    /// Deep-link activation by entity id. Returns `false` for unknown ids.
    pub fn activate_by_id(&self, id: &str) -> bool {
        match self.by_id.get(id) {
            Some(idx) => {
                self.activate(Some(*idx));
                true
            }
            None => false,
        }
    }
}

/// Accumulates flattened items, assigning each its absolute index as it
/// lands. First id wins on a collision (an operation tagged twice appears
/// twice; the deep link targets its first occurrence).
#[derive(Default)]
struct MenuBuilder {
    items: Vec<Rc<MenuItem>>,
    by_id: HashMap<String, usize>,
}

impl MenuBuilder {
    fn push(
        &mut self,
        kind: MenuItemKind,
        id: String,
        name: String,
        depth: usize,
        group: &Rc<GroupModel>,
        operation: Option<&Rc<OperationModel>>,
    ) {
        let idx = self.items.len();
        self.by_id.entry(id.clone()).or_insert(idx);
        self.items.push(Rc::new(MenuItem {
            kind,
            id,
            name,
            depth,
            absolute_idx: idx,
            group: Some(Rc::clone(group)),
            operation: operation.map(Rc::clone),
        }));
    }
}

/// Level-2 markdown headings of an operation description, in order.
fn section_headings(description: Option<&str>) -> Vec<String> {
    let Some(description) = description else {
        return Vec::new();
    };
    let mut in_code_fence = false;
    description
        .lines()
        .filter_map(|line| {
            let trimmed = line.trim_start();
            if trimmed.starts_with("```") {
                in_code_fence = !in_code_fence;
                return None;
            }
            if in_code_fence {
                return None;
            }
            trimmed
                .strip_prefix("## ")
                .map(|heading| heading.trim().to_string())
        })
        .collect()
}
