use std::cell::{Ref, RefCell};
use std::rc::Rc;

use heck::ToKebabCase;

use crate::spec::document::{ExternalDocs, Tag};
use crate::view::{Notifier, ViewFlags};

use super::operation::OperationModel;

/// A navigation group: one document tag and the operations under it, in
/// path declaration order.
pub struct GroupModel {
    /// Anchor id, `tag/<slugified-name>`.
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub external_docs: Option<ExternalDocs>,
    pub flags: ViewFlags,

    operations: RefCell<Vec<Rc<OperationModel>>>,
}

impl GroupModel {
    pub(crate) fn from_tag(tag: &Tag, notifier: &Notifier) -> Rc<GroupModel> {
        let display_name = tag.display_name.clone().unwrap_or_else(|| tag.name.clone());
        GroupModel::new(
            &tag.name,
            display_name,
            tag.description.clone(),
            tag.external_docs.clone(),
            notifier,
        )
    }

    pub(crate) fn new(
        tag_name: &str,
        display_name: String,
        description: Option<String>,
        external_docs: Option<ExternalDocs>,
        notifier: &Notifier,
    ) -> Rc<GroupModel> {
        let id = format!("tag/{}", tag_name.to_kebab_case());
        Rc::new(GroupModel {
            flags: ViewFlags::new(id.clone(), notifier.clone()),
            id,
            name: display_name,
            description,
            external_docs,
            operations: RefCell::new(Vec::new()),
        })
    }

    pub(crate) fn push_operation(&self, operation: Rc<OperationModel>) {
        self.operations.borrow_mut().push(operation);
    }

    pub fn operations(&self) -> Ref<'_, Vec<Rc<OperationModel>>> {
        self.operations.borrow()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.borrow().is_empty()
    }

    pub fn expand(&self) {
        self.flags.set_expanded(true);
    }
}
