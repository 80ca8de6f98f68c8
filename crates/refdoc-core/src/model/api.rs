use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;

use crate::config::{LoadMode, RefdocOptions};
use crate::error::{LoadError, ParseError};
use crate::menu::MenuModel;
use crate::resolve::{SpecStore, escape_token};
use crate::spec;
use crate::spec::document::{ExternalDocs, Info};
use crate::view::Notifier;

use super::DocContext;
use super::group::GroupModel;
use super::operation::{OperationModel, OperationSource};

/// The fully materialized document model: resolved operation groups plus
/// the flattened navigation menu. Everything here is read-only for the
/// presentation layer except the view flags, which change only through
/// navigation and the external visibility tracker.
pub struct ApiModel {
    pub info: Info,
    pub external_docs: Option<ExternalDocs>,
    pub groups: Vec<Rc<GroupModel>>,
    pub menu: MenuModel,

    store: Rc<SpecStore>,
    options: Rc<RefdocOptions>,
    notifier: Notifier,
}

impl ApiModel {
    pub fn from_yaml(input: &str, options: RefdocOptions) -> Result<ApiModel, LoadError> {
        let value: Value = serde_yaml_ng::from_str(input).map_err(ParseError::from)?;
        Self::from_document(value, options)
    }

    pub fn from_json(input: &str, options: RefdocOptions) -> Result<ApiModel, LoadError> {
        let value: Value = serde_json::from_str(input).map_err(ParseError::from)?;
        Self::from_document(value, options)
    }

    pub fn from_document(document: Value, options: RefdocOptions) -> Result<ApiModel, LoadError> {
        Self::from_store(SpecStore::new(document), options)
    }

    /// Build from a prepared store; use this when the document references
    /// external documents that were registered with
    /// [`SpecStore::add_external`].
    pub fn from_store(store: SpecStore, options: RefdocOptions) -> Result<ApiModel, LoadError> {
        let document = spec::from_value(store.root())?;

        let store = Rc::new(store);
        let options = Rc::new(options);
        let notifier = Notifier::new();
        let doc = Rc::new(DocContext {
            security: document.security.clone().unwrap_or_default(),
            servers: document.servers.clone(),
        });

        // Declared tags become groups in declaration order; tags used on
        // operations without a declaration are appended as they appear.
        let mut groups: Vec<Rc<GroupModel>> = Vec::new();
        let mut group_index: HashMap<String, usize> = HashMap::new();
        for tag in &document.tags {
            group_index.insert(tag.name.clone(), groups.len());
            groups.push(GroupModel::from_tag(tag, &notifier));
        }

        let mut untagged: Vec<(String, &'static str)> = Vec::new();

        for (path, path_item) in &document.paths {
            for (verb, operation) in path_item.operations() {
                if operation.tags.is_empty() {
                    untagged.push((path.clone(), verb));
                    continue;
                }
                for tag in &operation.tags {
                    let group_idx = *group_index.entry(tag.clone()).or_insert_with(|| {
                        groups.push(GroupModel::new(tag, tag.clone(), None, None, &notifier));
                        groups.len() - 1
                    });
                    let group = Rc::clone(&groups[group_idx]);
                    attach_operation(
                        &store, &options, &doc, &notifier, &group, path, verb, path_item,
                    )?;
                }
            }
        }

        // Untagged operations land in a trailing group so every operation
        // stays reachable from the menu.
        if !untagged.is_empty() {
            let other = GroupModel::new("other", "Other".to_string(), None, None, &notifier);
            for (path, verb) in untagged {
                let path_item = &document.paths[&path];
                attach_operation(
                    &store, &options, &doc, &notifier, &other, &path, verb, path_item,
                )?;
            }
            groups.push(other);
        }

        let menu = MenuModel::build(&groups);

        Ok(ApiModel {
            info: document.info,
            external_docs: document.external_docs,
            groups,
            menu,
            store,
            options,
            notifier,
        })
    }

    pub fn store(&self) -> &Rc<SpecStore> {
        &self.store
    }

    pub fn options(&self) -> &RefdocOptions {
        &self.options
    }

    /// Subscribe to view-state changes across the whole model.
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

/// Build one operation, apply the load-mode policy, and attach it to its
/// group. Priming forces every lazy derived property once so malformed
/// operations surface here, not mid-render.
#[allow(clippy::too_many_arguments)]
fn attach_operation(
    store: &Rc<SpecStore>,
    options: &Rc<RefdocOptions>,
    doc: &Rc<DocContext>,
    notifier: &Notifier,
    group: &Rc<GroupModel>,
    path: &str,
    verb: &'static str,
    path_item: &crate::spec::operation::PathItem,
) -> Result<(), LoadError> {
    let operation = path_item
        .operation(verb)
        .expect("verb enumerated from this path item");
    let pointer = format!("/paths/{}/{}", escape_token(path), verb);

    let source = OperationSource {
        verb,
        path,
        operation,
        path_item,
        pointer: pointer.clone(),
        id_prefix: Some(group.id.clone()),
        is_callback: false,
        event_name: None,
    };

    let built = OperationModel::build(store, options, doc, notifier, source, Some(Rc::downgrade(group)))
        .and_then(|model| model.prime().map(|_| model));

    match built {
        Ok(model) => {
            group.push_operation(model);
            Ok(())
        }
        Err(e) => match options.load_mode {
            LoadMode::Strict => Err(LoadError::Operation { pointer, source: e }),
            LoadMode::BestEffort => {
                log::warn!("skipping operation {pointer}: {e}");
                Ok(())
            }
        },
    }
}
