use std::cell::OnceCell;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use serde_json::Value;

use crate::config::RefdocOptions;
use crate::error::ModelError;
use crate::resolve::{SpecStore, escape_token};
use crate::spec::document::ExternalDocs;
use crate::spec::operation::{Callback, CallbackOrRef, Operation, PathItem};
use crate::spec::parameter::{Parameter, ParameterOrRef};
use crate::spec::server::{Server, ServerVariable};
use crate::view::{Notifier, ViewFlags};

use super::DocContext;
use super::callback::CallbackModel;
use super::field::{FieldModel, extract_extensions, sort_fields};
use super::group::GroupModel;
use super::request_body::RequestBodyModel;
use super::response::{ResponseModel, StatusKind, is_status_code, status_kind};
use super::sample::CodeSample;
use super::security::SecurityRequirementModel;

/// Construction inputs for one operation: a path+verb pair, or one verb of
/// one callback expression. Callbacks reuse this same factory with
/// `is_callback` set, so the two never drift apart behaviorally.
pub(crate) struct OperationSource<'a> {
    pub verb: &'a str,
    /// The path name, or the callback's runtime expression.
    pub path: &'a str,
    pub operation: &'a Operation,
    pub path_item: &'a PathItem,
    pub pointer: String,
    /// Owning group id (top-level) or owning operation id (callbacks),
    /// prefixed onto the pointer when the spec supplies no operationId.
    pub id_prefix: Option<String>,
    pub is_callback: bool,
    pub event_name: Option<&'a str>,
}

/// A fully resolved operation ready for rendering.
///
/// Identity, naming, security, and servers are fixed at construction; the
/// heavier derived properties (parameters, request body, responses, code
/// samples, callbacks) are computed on first access and cached for the
/// model's lifetime, since the underlying document never changes.
///
/// Inheritance policies, deliberately asymmetric for callbacks:
/// - `security`: top-level operations inherit the document's global list
///   when they declare none; callback operations default to *no*
///   requirements, because the document's client→server authentication
///   does not describe the server calling the client back.
/// - `servers`: operation-level, else path-item-level, else document-level
///   — for callbacks too.
pub struct OperationModel {
    pub id: String,
    pub pointer: String,
    pub http_verb: String,
    /// The path name, or the callback runtime expression.
    pub path: String,
    pub name: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub deprecated: bool,
    pub is_callback: bool,
    pub operation_id: Option<String>,
    pub external_docs: Option<ExternalDocs>,
    pub security: Vec<SecurityRequirementModel>,
    pub servers: Vec<ServerModel>,
    pub extensions: IndexMap<String, Value>,
    pub flags: ViewFlags,

    parent: Option<Weak<GroupModel>>,
    self_weak: OnceCell<Weak<OperationModel>>,
    spec_op: Operation,
    path_params: Vec<ParameterOrRef>,
    path_pointer: String,
    store: Rc<SpecStore>,
    options: Rc<RefdocOptions>,
    doc: Rc<DocContext>,
    notifier: Notifier,

    request_body_cell: OnceCell<Result<Option<Rc<RequestBodyModel>>, ModelError>>,
    parameters_cell: OnceCell<Result<Vec<Rc<FieldModel>>, ModelError>>,
    responses_cell: OnceCell<Result<Vec<Rc<ResponseModel>>, ModelError>>,
    callbacks_cell: OnceCell<Result<Vec<Rc<CallbackModel>>, ModelError>>,
    code_samples_cell: OnceCell<Result<Vec<CodeSample>, ModelError>>,
}

impl OperationModel {
    pub(crate) fn build(
        store: &Rc<SpecStore>,
        options: &Rc<RefdocOptions>,
        doc: &Rc<DocContext>,
        notifier: &Notifier,
        source: OperationSource<'_>,
        parent: Option<Weak<GroupModel>>,
    ) -> Result<Rc<OperationModel>, ModelError> {
        let op = source.operation;

        let id = match (&op.operation_id, source.is_callback, &source.id_prefix) {
            (Some(operation_id), false, _) => format!("operation/{operation_id}"),
            (_, _, Some(prefix)) => format!("{prefix}{}", source.pointer),
            _ => source.pointer.clone(),
        };

        // Callbacks are named by their triggering event; the spec format
        // does not give them an operationId.
        let name = match (source.is_callback, source.event_name) {
            (true, Some(event)) => event.to_string(),
            _ => op
                .summary
                .clone()
                .or_else(|| op.operation_id.clone())
                .unwrap_or_else(|| {
                    format!("{} {}", source.verb.to_uppercase(), source.path)
                }),
        };

        let security = if source.is_callback {
            op.security.clone().unwrap_or_default()
        } else {
            op.security
                .clone()
                .unwrap_or_else(|| doc.security.clone())
        };
        let security = security
            .iter()
            .map(|requirement| SecurityRequirementModel::build(store, requirement))
            .collect();

        let declared_servers = if !op.servers.is_empty() {
            &op.servers
        } else if !source.path_item.servers.is_empty() {
            &source.path_item.servers
        } else {
            &doc.servers
        };
        let servers = normalize_servers(options.spec_url.as_deref(), declared_servers);

        let mut extensions = extract_extensions(&op.extensions, options);
        extensions.shift_remove("x-codeSamples");
        extensions.shift_remove("x-code-samples");

        let path_pointer = source
            .pointer
            .rsplit_once('/')
            .map(|(prefix, _)| prefix.to_string())
            .unwrap_or_default();

        let model = Rc::new(OperationModel {
            flags: ViewFlags::new(id.clone(), notifier.clone()),
            id,
            pointer: source.pointer,
            http_verb: source.verb.to_string(),
            path: source.path.to_string(),
            name,
            summary: op.summary.clone(),
            description: op.description.clone(),
            deprecated: op.deprecated,
            is_callback: source.is_callback,
            operation_id: op.operation_id.clone(),
            external_docs: op.external_docs.clone(),
            security,
            servers,
            extensions,
            parent,
            self_weak: OnceCell::new(),
            spec_op: op.clone(),
            path_params: source.path_item.parameters.clone(),
            path_pointer,
            store: Rc::clone(store),
            options: Rc::clone(options),
            doc: Rc::clone(doc),
            notifier: notifier.clone(),
            request_body_cell: OnceCell::new(),
            parameters_cell: OnceCell::new(),
            responses_cell: OnceCell::new(),
            callbacks_cell: OnceCell::new(),
            code_samples_cell: OnceCell::new(),
        });
        model
            .self_weak
            .set(Rc::downgrade(&model))
            .unwrap_or_else(|_| unreachable!("self_weak set once at construction"));
        Ok(model)
    }

    /// Force every lazy derived property once, surfacing materialization
    /// errors at load time. Recurses into callback operations but not into
    /// field children, which stay lazy to keep self-referential schemas
    /// finite.
    pub fn prime(&self) -> Result<(), ModelError> {
        self.request_body()?;
        self.parameters()?;
        self.responses()?;
        self.code_samples()?;
        for callback in self.callbacks()? {
            for operation in &callback.operations {
                operation.prime()?;
            }
        }
        Ok(())
    }

    pub fn parent(&self) -> Option<Rc<GroupModel>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    /// Make this operation reachable: expands the ancestor group chain.
    pub fn expand(&self) {
        if let Some(parent) = self.parent() {
            parent.expand();
        }
    }

    pub fn request_body(&self) -> Result<Option<&Rc<RequestBodyModel>>, ModelError> {
        let computed = self.request_body_cell.get_or_init(|| {
            self.spec_op
                .request_body
                .as_ref()
                .map(|body| {
                    RequestBodyModel::build(
                        &self.store,
                        &self.options,
                        body,
                        format!("{}/requestBody", self.pointer),
                    )
                    .map(Rc::new)
                })
                .transpose()
        });
        match computed {
            Ok(body) => Ok(body.as_ref()),
            Err(e) => Err(e.clone()),
        }
    }

    /// Path-level and operation-level parameters merged (operation wins on
    /// a name+location match), materialized, and sorted per options.
    pub fn parameters(&self) -> Result<&[Rc<FieldModel>], ModelError> {
        let computed = self
            .parameters_cell
            .get_or_init(|| self.build_parameters());
        match computed {
            Ok(fields) => Ok(fields),
            Err(e) => Err(e.clone()),
        }
    }

    pub fn responses(&self) -> Result<&[Rc<ResponseModel>], ModelError> {
        let computed = self.responses_cell.get_or_init(|| self.build_responses());
        match computed {
            Ok(responses) => Ok(responses),
            Err(e) => Err(e.clone()),
        }
    }

    pub fn callbacks(&self) -> Result<&[Rc<CallbackModel>], ModelError> {
        let computed = self.callbacks_cell.get_or_init(|| self.build_callbacks());
        match computed {
            Ok(callbacks) => Ok(callbacks),
            Err(e) => Err(e.clone()),
        }
    }

    /// The ordered sample list: author-supplied snippets with the synthetic
    /// payload tab spliced in at the configured index when the request body
    /// can show an example. Computed once; repeated access returns the same
    /// list.
    pub fn code_samples(&self) -> Result<&[CodeSample], ModelError> {
        let computed = self
            .code_samples_cell
            .get_or_init(|| self.build_code_samples());
        match computed {
            Ok(samples) => Ok(samples),
            Err(e) => Err(e.clone()),
        }
    }

    fn build_parameters(&self) -> Result<Vec<Rc<FieldModel>>, ModelError> {
        let path_level = self.resolve_parameters(&self.path_params, &self.path_pointer)?;
        let op_level = self.resolve_parameters(&self.spec_op.parameters, &self.pointer)?;

        let mut merged: Vec<(Parameter, String)> = path_level
            .into_iter()
            .filter(|(candidate, _)| {
                !op_level
                    .iter()
                    .any(|(p, _)| p.name == candidate.name && p.location == candidate.location)
            })
            .collect();
        merged.extend(op_level);

        let mut fields = merged
            .into_iter()
            .map(|(parameter, pointer)| {
                FieldModel::from_parameter(
                    Rc::clone(&self.store),
                    Rc::clone(&self.options),
                    &parameter,
                    pointer,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        sort_fields(&mut fields, &self.options);
        Ok(fields)
    }

    fn resolve_parameters(
        &self,
        parameters: &[ParameterOrRef],
        owner_pointer: &str,
    ) -> Result<Vec<(Parameter, String)>, ModelError> {
        parameters
            .iter()
            .enumerate()
            .map(|(idx, parameter)| match parameter {
                ParameterOrRef::Parameter(inline) => Ok((
                    (**inline).clone(),
                    format!("{owner_pointer}/parameters/{idx}"),
                )),
                ParameterOrRef::Ref { ref_path } => self.store.deref_typed(ref_path),
            })
            .collect()
    }

    fn build_responses(&self) -> Result<Vec<Rc<ResponseModel>>, ModelError> {
        // The success flag reflects the whole declared map, so compute it
        // before building any single response.
        let has_success = self
            .spec_op
            .responses
            .keys()
            .any(|code| status_kind(code) == Some(StatusKind::Success));

        self.spec_op
            .responses
            .iter()
            .filter(|(code, _)| *code == "default" || is_status_code(code))
            .map(|(code, response)| {
                ResponseModel::build(
                    &self.store,
                    &self.options,
                    code,
                    has_success,
                    response,
                    format!("{}/responses/{}", self.pointer, escape_token(code)),
                )
            })
            .collect()
    }

    fn build_callbacks(&self) -> Result<Vec<Rc<CallbackModel>>, ModelError> {
        let owner = self
            .self_weak
            .get()
            .cloned()
            .unwrap_or_else(Weak::new);

        self.spec_op
            .callbacks
            .iter()
            .map(|(event_name, callback)| {
                let pointer = format!("{}/callbacks/{}", self.pointer, escape_token(event_name));
                let (callback, pointer): (Callback, String) = match callback {
                    CallbackOrRef::Callback(inline) => (inline.clone(), pointer),
                    CallbackOrRef::Ref { ref_path } => self.store.deref_typed(ref_path)?,
                };
                CallbackModel::build(
                    &self.store,
                    &self.options,
                    &self.doc,
                    &self.notifier,
                    event_name,
                    &callback,
                    pointer,
                    &self.id,
                    owner.clone(),
                )
            })
            .collect()
    }

    fn build_code_samples(&self) -> Result<Vec<CodeSample>, ModelError> {
        let mut samples: Vec<CodeSample> = self
            .spec_op
            .code_samples()
            .into_iter()
            .map(CodeSample::from_raw)
            .collect();

        if let Some(body) = self.request_body()? {
            if let Some(content) = &body.content {
                if content.has_sample() {
                    let at = self.options.payload_sample_idx.min(samples.len());
                    samples.insert(
                        at,
                        CodeSample::Payload {
                            content: Rc::clone(content),
                        },
                    );
                }
            }
        }
        Ok(samples)
    }
}

/// A display-ready server entry with its URL normalized against the
/// document's retrieval location.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerModel {
    pub url: String,
    pub description: Option<String>,
    pub variables: IndexMap<String, ServerVariable>,
}

/// Normalize declared servers: absolute URLs pass through,
/// protocol-relative and relative URLs resolve against `spec_url`.
pub fn normalize_servers(spec_url: Option<&str>, servers: &[Server]) -> Vec<ServerModel> {
    servers
        .iter()
        .map(|server| ServerModel {
            url: resolve_url(spec_url, &server.url),
            description: server.description.clone(),
            variables: server.variables.clone(),
        })
        .collect()
}

fn resolve_url(spec_url: Option<&str>, url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    if trimmed.contains("://") {
        return trimmed.to_string();
    }
    let Some(base) = spec_url else {
        return trimmed.to_string();
    };

    if let Some(rest) = trimmed.strip_prefix("//") {
        let scheme = base.split("://").next().unwrap_or("https");
        return format!("{scheme}://{rest}");
    }
    if let Some(absolute_path) = trimmed.strip_prefix('/') {
        return format!("{}/{}", origin(base), absolute_path);
    }
    // Relative to the directory the document was served from.
    let dir = base.rsplit_once('/').map(|(d, _)| d).unwrap_or(base);
    if trimmed.is_empty() {
        dir.to_string()
    } else {
        format!("{dir}/{trimmed}")
    }
}

/// `scheme://host[:port]` of a URL.
fn origin(url: &str) -> String {
    match url.split_once("://") {
        Some((scheme, rest)) => {
            let host = rest.split('/').next().unwrap_or(rest);
            format!("{scheme}://{host}")
        }
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_urls_pass_through() {
        assert_eq!(
            resolve_url(Some("https://example.com/specs/api.yaml"), "https://api.example.com/v2/"),
            "https://api.example.com/v2"
        );
    }

    #[test]
    fn relative_urls_resolve_against_spec_location() {
        let base = Some("https://example.com/specs/api.yaml");
        assert_eq!(resolve_url(base, "/v2"), "https://example.com/v2");
        assert_eq!(resolve_url(base, "v2"), "https://example.com/specs/v2");
        assert_eq!(resolve_url(base, "//api.example.com"), "https://api.example.com");
    }

    #[test]
    fn relative_url_without_spec_location_is_kept() {
        assert_eq!(resolve_url(None, "/v2"), "/v2");
    }
}
