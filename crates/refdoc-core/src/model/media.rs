use std::cell::OnceCell;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::config::RefdocOptions;
use crate::error::ModelError;
use crate::resolve::{DerefSchema, SpecStore};
use crate::spec::media_type::{Example, ExampleOrRef, MediaType};
use crate::spec::schema::Schema;

use super::field::FieldModel;
use super::sampler::sample_schema;

/// The media-type map of one request or response body, in declaration
/// order. The first media type is active for display by default.
pub struct MediaContentModel {
    pub media_types: Vec<Rc<MediaTypeModel>>,
    pub is_request: bool,
    active: std::cell::Cell<usize>,
}

impl MediaContentModel {
    pub fn build(
        store: &Rc<SpecStore>,
        options: &Rc<RefdocOptions>,
        content: &IndexMap<String, MediaType>,
        pointer: &str,
        is_request: bool,
    ) -> Result<MediaContentModel, ModelError> {
        let media_types = content
            .iter()
            .map(|(name, media_type)| {
                MediaTypeModel::build(
                    store,
                    options,
                    name,
                    media_type,
                    format!("{pointer}/content/{}", crate::resolve::escape_token(name)),
                )
                .map(Rc::new)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(MediaContentModel {
            media_types,
            is_request,
            active: std::cell::Cell::new(0),
        })
    }

    /// Whether any media type can show an example payload; gates the
    /// synthetic payload code sample.
    pub fn has_sample(&self) -> bool {
        self.media_types.iter().any(|mt| mt.has_sample())
    }

    pub fn active_media_type(&self) -> Option<&Rc<MediaTypeModel>> {
        self.media_types.get(self.active.get())
    }

    /// Select the displayed media type; out-of-range indices are ignored.
    pub fn activate_media_type(&self, idx: usize) {
        if idx < self.media_types.len() {
            self.active.set(idx);
        }
    }
}

/// One media type's schema and example(s).
pub struct MediaTypeModel {
    /// The content-type key, e.g. `application/json`.
    pub name: String,
    pub pointer: String,
    /// Resolved named examples, in declaration order.
    pub examples: IndexMap<String, Example>,

    literal_example: Option<Value>,
    schema: Option<Rc<Schema>>,
    schema_pointer: Option<String>,
    root_field: Option<Rc<FieldModel>>,
    sample: OnceCell<Result<Option<Value>, ModelError>>,
    store: Rc<SpecStore>,
}

impl MediaTypeModel {
    fn build(
        store: &Rc<SpecStore>,
        options: &Rc<RefdocOptions>,
        name: &str,
        media_type: &MediaType,
        pointer: String,
    ) -> Result<MediaTypeModel, ModelError> {
        let (schema, schema_pointer) = match &media_type.schema {
            None => (None, None),
            Some(schema_or_ref) => match store.deref_schema(schema_or_ref)? {
                // A media type whose schema is nothing but a cycle has no
                // displayable shape of its own.
                DerefSchema::Circular { pointer } => (None, Some(pointer)),
                DerefSchema::Schema { schema, pointer } => (Some(Rc::new(*schema)), pointer),
            },
        };

        let root_field = match &media_type.schema {
            Some(schema_or_ref) if schema.is_some() => Some(FieldModel::from_schema(
                Rc::clone(store),
                Rc::clone(options),
                String::new(),
                false,
                schema_or_ref,
                format!("{pointer}/schema"),
                Rc::new(Vec::new()),
            )?),
            _ => None,
        };

        let mut examples = IndexMap::new();
        for (example_name, example_or_ref) in &media_type.examples {
            let example = match example_or_ref {
                ExampleOrRef::Example(example) => example.clone(),
                ExampleOrRef::Ref { ref_path } => store.deref_typed::<Example>(ref_path)?.0,
            };
            examples.insert(example_name.clone(), example);
        }

        Ok(MediaTypeModel {
            name: name.to_string(),
            pointer,
            examples,
            literal_example: media_type.example.clone(),
            schema,
            schema_pointer,
            root_field,
            sample: OnceCell::new(),
            store: Rc::clone(store),
        })
    }

    /// The body schema presented as a field tree, when a schema exists.
    pub fn schema_field(&self) -> Option<&Rc<FieldModel>> {
        self.root_field.as_ref()
    }

    pub fn schema(&self) -> Option<&Rc<Schema>> {
        self.schema.as_ref()
    }

    /// True when a literal example exists or the schema can synthesize one.
    pub fn has_sample(&self) -> bool {
        self.literal_example.is_some()
            || self.examples.values().any(|e| e.value.is_some())
            || self.schema.is_some()
    }

    /// The example payload to display: the literal example, else the first
    /// named example's value, else a synthesized sample. Computed once.
    pub fn sample(&self) -> Result<Option<&Value>, ModelError> {
        let computed = self.sample.get_or_init(|| {
            if let Some(example) = &self.literal_example {
                return Ok(Some(example.clone()));
            }
            if let Some(value) = self.examples.values().find_map(|e| e.value.as_ref()) {
                return Ok(Some(value.clone()));
            }
            match &self.schema {
                Some(schema) => {
                    sample_schema(&self.store, schema, self.schema_pointer.as_deref()).map(Some)
                }
                None => Ok(None),
            }
        });
        match computed {
            Ok(value) => Ok(value.as_ref()),
            Err(e) => Err(e.clone()),
        }
    }
}
