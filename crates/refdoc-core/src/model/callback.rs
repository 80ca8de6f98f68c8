use std::rc::{Rc, Weak};

use crate::config::RefdocOptions;
use crate::error::ModelError;
use crate::resolve::{SpecStore, escape_token};
use crate::spec::operation::Callback;
use crate::view::{Notifier, ViewFlags};

use super::DocContext;
use super::operation::{OperationModel, OperationSource};

/// One named asynchronous event declared under an operation, owning one
/// nested operation per declared HTTP verb. Collapsed by default.
pub struct CallbackModel {
    /// The triggering event name.
    pub name: String,
    pub pointer: String,
    pub flags: ViewFlags,
    pub operations: Vec<Rc<OperationModel>>,

    owner: Weak<OperationModel>,
}

impl CallbackModel {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn build(
        store: &Rc<SpecStore>,
        options: &Rc<RefdocOptions>,
        doc: &Rc<DocContext>,
        notifier: &Notifier,
        event_name: &str,
        callback: &Callback,
        pointer: String,
        owner_id: &str,
        owner: Weak<OperationModel>,
    ) -> Result<Rc<CallbackModel>, ModelError> {
        let mut operations = Vec::new();
        for (expression, path_item) in callback {
            for (verb, operation) in path_item.operations() {
                let source = OperationSource {
                    verb,
                    path: expression,
                    operation,
                    path_item,
                    pointer: format!("{pointer}/{}/{verb}", escape_token(expression)),
                    id_prefix: Some(owner_id.to_string()),
                    is_callback: true,
                    event_name: Some(event_name),
                };
                operations.push(OperationModel::build(
                    store, options, doc, notifier, source, None,
                )?);
            }
        }

        Ok(Rc::new(CallbackModel {
            name: event_name.to_string(),
            flags: ViewFlags::new(format!("{owner_id}{pointer}"), notifier.clone()),
            pointer,
            operations,
            owner,
        }))
    }

    pub fn is_expanded(&self) -> bool {
        self.flags.is_expanded()
    }

    pub fn toggle(&self) {
        if self.flags.is_expanded() {
            self.flags.set_expanded(false);
        } else {
            self.expand();
        }
    }

    /// Expanding a callback also expands its ancestor chain, so a
    /// deep-linked callback is actually visible.
    pub fn expand(&self) {
        self.flags.set_expanded(true);
        if let Some(owner) = self.owner.upgrade() {
            owner.expand();
        }
    }
}
