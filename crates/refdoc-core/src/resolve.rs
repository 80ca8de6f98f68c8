use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ModelError, ResolveError};
use crate::spec::schema::{Schema, SchemaOrRef};

/// Immutable document store with memoized pointer resolution.
///
/// Holds the main document plus any pre-loaded external documents as raw
/// JSON trees. Resolution is pointer-based: `#/a/b` (or `/a/b`) into the
/// main document, `name.yaml#/a/b` into a registered external. Resolved
/// subtrees are cached per pointer, so resolving the same pointer twice
/// returns the identical `Rc` (observable via [`Rc::ptr_eq`]).
///
/// Cycle policy: a `$ref` chain that revisits a pointer yields a
/// [`DerefSchema::Circular`] marker for schemas — the renderer shows a named
/// recursive stub — and a shape error for every other node kind, where a
/// cycle cannot be displayed meaningfully.
pub struct SpecStore {
    root: Value,
    externals: HashMap<String, Value>,
    cache: std::cell::RefCell<HashMap<String, Rc<Value>>>,
}

/// The end of a `$ref` chain: a concrete value, or a cycle marker.
pub enum Chased {
    Value { value: Rc<Value>, pointer: String },
    Circular { pointer: String },
}

/// A schema dereference result. `pointer` is the canonical location of the
/// schema when it was reached through a reference, used for identity and
/// recursion guards.
pub enum DerefSchema {
    Schema {
        schema: Box<Schema>,
        pointer: Option<String>,
    },
    Circular {
        pointer: String,
    },
}

impl SpecStore {
    pub fn new(root: Value) -> Self {
        Self {
            root,
            externals: HashMap::new(),
            cache: Default::default(),
        }
    }

    /// Register a pre-loaded external document under the identifier used by
    /// `name#/pointer` references. Fetching is the caller's responsibility.
    pub fn add_external(&mut self, name: impl Into<String>, document: Value) {
        self.externals.insert(name.into(), document);
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Resolve a pointer to its subtree, memoized.
    pub fn by_pointer(&self, pointer: &str) -> Result<Rc<Value>, ResolveError> {
        if let Some(hit) = self.cache.borrow().get(pointer) {
            return Ok(Rc::clone(hit));
        }

        let (document_name, tokens) = parse_pointer(pointer)?;
        let document = match document_name {
            None => &self.root,
            Some(name) => self
                .externals
                .get(name)
                .ok_or_else(|| ResolveError::UnknownDocument(name.to_string()))?,
        };

        let mut node = document;
        for token in &tokens {
            node = step(node, token)
                .ok_or_else(|| ResolveError::UnresolvedRef(pointer.to_string()))?;
        }

        log::debug!("resolved pointer {pointer}");
        let resolved = Rc::new(node.clone());
        self.cache
            .borrow_mut()
            .insert(pointer.to_string(), Rc::clone(&resolved));
        Ok(resolved)
    }

    /// Follow a `$ref` chain starting at `pointer` until it lands on a
    /// non-reference node or revisits a pointer already on the chain.
    pub fn chase(&self, pointer: &str) -> Result<Chased, ResolveError> {
        let mut seen = HashSet::new();
        let mut current = pointer.to_string();
        loop {
            if !seen.insert(current.clone()) {
                return Ok(Chased::Circular { pointer: current });
            }
            let value = self.by_pointer(&current)?;
            match ref_target(&value) {
                Some(next) => current = next.to_string(),
                None => return Ok(Chased::Value { value, pointer: current }),
            }
        }
    }

    /// Dereference a schema position, applying the circular-marker policy.
    pub fn deref_schema(&self, schema: &SchemaOrRef) -> Result<DerefSchema, ModelError> {
        match schema {
            SchemaOrRef::Schema(inline) => Ok(DerefSchema::Schema {
                schema: inline.clone(),
                pointer: None,
            }),
            SchemaOrRef::Ref { ref_path } => match self.chase(ref_path)? {
                Chased::Circular { pointer } => Ok(DerefSchema::Circular { pointer }),
                Chased::Value { value, pointer } => {
                    let schema: Schema = typed(&value, &pointer)?;
                    Ok(DerefSchema::Schema {
                        schema: Box::new(schema),
                        pointer: Some(pointer),
                    })
                }
            },
        }
    }

    /// Dereference a non-schema position into its typed form. A cycle here
    /// is a malformed document, not something the renderer can display.
    pub fn deref_typed<T: DeserializeOwned>(
        &self,
        ref_path: &str,
    ) -> Result<(T, String), ModelError> {
        match self.chase(ref_path)? {
            Chased::Circular { pointer } => {
                Err(ModelError::shape(pointer, "circular reference chain"))
            }
            Chased::Value { value, pointer } => {
                let parsed = typed(&value, &pointer)?;
                Ok((parsed, pointer))
            }
        }
    }
}

/// Deserialize a resolved subtree, reporting the offending pointer on a
/// shape mismatch.
pub fn typed<T: DeserializeOwned>(value: &Value, pointer: &str) -> Result<T, ModelError> {
    serde_json::from_value(value.clone()).map_err(|e| ModelError::shape(pointer, e))
}

/// If `node` is a reference object, its `$ref` target.
fn ref_target(node: &Value) -> Option<&str> {
    node.as_object()?.get("$ref")?.as_str()
}

/// Split a pointer into its optional external-document prefix and its
/// unescaped path tokens.
fn parse_pointer(pointer: &str) -> Result<(Option<&str>, Vec<String>), ResolveError> {
    let (document, path) = match pointer.find('#') {
        Some(0) => (None, &pointer[1..]),
        Some(idx) => (Some(&pointer[..idx]), &pointer[idx + 1..]),
        None => (None, pointer),
    };

    if path.is_empty() {
        return Ok((document, Vec::new()));
    }
    let Some(path) = path.strip_prefix('/') else {
        return Err(ResolveError::InvalidPointer(pointer.to_string()));
    };

    let tokens = path.split('/').map(unescape_token).collect();
    Ok((document, tokens))
}

/// JSON Pointer token unescaping: `~1` → `/`, `~0` → `~`.
fn unescape_token(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

/// JSON Pointer token escaping, for building pointers out of path names
/// and runtime expressions that contain `/` or `~`.
pub fn escape_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

/// One pointer step into an object or array.
fn step<'a>(node: &'a Value, token: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(token),
        Value::Array(items) => items.get(token.parse::<usize>().ok()?),
        _ => None,
    }
}
