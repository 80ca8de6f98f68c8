use std::cell::OnceCell;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::config::RefdocOptions;
use crate::error::ModelError;
use crate::resolve::{DerefSchema, SpecStore};
use crate::spec::parameter::{Parameter, ParameterLocation};
use crate::spec::schema::{Schema, SchemaOrRef, SchemaType};

/// One display-ready parameter or schema property.
///
/// Child fields are computed on first access and cached; combined with the
/// ancestor-pointer guard this keeps self-referential schemas finite — the
/// repeated schema shows up once more as a `is_circular` stub and stops.
pub struct FieldModel {
    pub name: String,
    pub required: bool,
    pub deprecated: bool,
    /// Set for request parameters, `None` for schema properties.
    pub location: Option<ParameterLocation>,
    pub description: Option<String>,
    pub type_label: String,
    pub example: Option<Value>,
    pub default_value: Option<Value>,
    pub enum_values: Vec<Value>,
    pub constraints: Vec<String>,
    pub read_only: bool,
    pub write_only: bool,
    pub nullable: bool,
    /// This field re-entered a schema already on its ancestor chain.
    pub is_circular: bool,
    /// Surfaced `x-` members, per the `show_extensions` option.
    pub extensions: IndexMap<String, Value>,
    pub pointer: String,

    schema: Option<Rc<Schema>>,
    ancestors: Rc<Vec<String>>,
    store: Rc<SpecStore>,
    options: Rc<RefdocOptions>,
    children: OnceCell<Result<Vec<Rc<FieldModel>>, ModelError>>,
}

impl FieldModel {
    /// Materialize a request parameter.
    pub fn from_parameter(
        store: Rc<SpecStore>,
        options: Rc<RefdocOptions>,
        parameter: &Parameter,
        pointer: String,
    ) -> Result<Rc<FieldModel>, ModelError> {
        let (schema, schema_pointer, circular) = match &parameter.schema {
            None => (None, None, false),
            Some(schema_or_ref) => match store.deref_schema(schema_or_ref)? {
                DerefSchema::Circular { pointer } => (None, Some(pointer), true),
                DerefSchema::Schema { schema, pointer } => {
                    (Some(Rc::new(*schema)), pointer, false)
                }
            },
        };

        let mut field = FieldModel::from_parts(
            store,
            options,
            parameter.name.clone(),
            parameter.required,
            schema,
            schema_pointer,
            circular,
            pointer,
            Rc::new(Vec::new()),
        );
        field.location = Some(parameter.location);
        field.deprecated = field.deprecated || parameter.deprecated;
        // The parameter's own description/example win over the schema's.
        if parameter.description.is_some() {
            field.description = parameter.description.clone();
        }
        if parameter.example.is_some() {
            field.example = parameter.example.clone();
        }
        let extensions = extract_extensions(&parameter.extensions, &field.options);
        field.extensions.extend(extensions);
        Ok(Rc::new(field))
    }

    /// Materialize a schema property (or a body root when `name` is empty).
    pub fn from_schema(
        store: Rc<SpecStore>,
        options: Rc<RefdocOptions>,
        name: String,
        required: bool,
        schema_or_ref: &SchemaOrRef,
        pointer: String,
        ancestors: Rc<Vec<String>>,
    ) -> Result<Rc<FieldModel>, ModelError> {
        let field = match store.deref_schema(schema_or_ref)? {
            DerefSchema::Circular { pointer: target } => FieldModel::from_parts(
                store,
                options,
                name,
                required,
                None,
                Some(target),
                true,
                pointer,
                ancestors,
            ),
            DerefSchema::Schema {
                schema,
                pointer: target,
            } => {
                // Re-entering an ancestor schema: render a recursive stub
                // instead of materializing the same subtree again.
                let circular = target
                    .as_ref()
                    .is_some_and(|t| ancestors.iter().any(|a| a == t));
                FieldModel::from_parts(
                    store,
                    options,
                    name,
                    required,
                    (!circular).then(|| Rc::new(*schema)),
                    target,
                    circular,
                    pointer,
                    ancestors,
                )
            }
        };
        Ok(Rc::new(field))
    }

    #[allow(clippy::too_many_arguments)]
    fn from_parts(
        store: Rc<SpecStore>,
        options: Rc<RefdocOptions>,
        name: String,
        required: bool,
        schema: Option<Rc<Schema>>,
        schema_pointer: Option<String>,
        is_circular: bool,
        pointer: String,
        ancestors: Rc<Vec<String>>,
    ) -> FieldModel {
        let type_label = match (&schema, &schema_pointer, is_circular) {
            (_, Some(target), true) => format!("recursive ({})", ref_display_name(target)),
            (Some(schema), target, _) => type_label(schema, target.as_deref()),
            (None, _, _) => "any".to_string(),
        };

        let ancestors = match &schema_pointer {
            Some(target) if !is_circular => {
                let mut chain = (*ancestors).clone();
                chain.push(target.clone());
                Rc::new(chain)
            }
            _ => ancestors,
        };

        let mut field = FieldModel {
            name,
            required,
            deprecated: false,
            location: None,
            description: None,
            type_label,
            example: None,
            default_value: None,
            enum_values: Vec::new(),
            constraints: Vec::new(),
            read_only: false,
            write_only: false,
            nullable: false,
            is_circular,
            extensions: IndexMap::new(),
            pointer,
            schema: schema.clone(),
            ancestors,
            store,
            options,
            children: OnceCell::new(),
        };

        if let Some(schema) = &schema {
            field.deprecated = schema.deprecated;
            field.description = schema.description.clone();
            field.example = schema.example.clone();
            field.default_value = schema.default_value.clone();
            field.enum_values = schema.enum_values.clone();
            field.constraints = constraint_summary(schema);
            field.read_only = schema.read_only.unwrap_or(false);
            field.write_only = schema.write_only.unwrap_or(false);
            field.nullable = schema.nullable.unwrap_or(false)
                || schema
                    .schema_type
                    .as_ref()
                    .is_some_and(|t| t.accepts_null());
            field.extensions = extract_extensions(&schema.extensions, &field.options);
        }

        field
    }

    pub fn schema(&self) -> Option<&Rc<Schema>> {
        self.schema.as_ref()
    }

    /// Nested fields, computed once. Object schemas expose their properties,
    /// arrays the properties of their item schema, `allOf` the union of its
    /// parts' properties.
    pub fn children(&self) -> Result<&[Rc<FieldModel>], ModelError> {
        let computed = self
            .children
            .get_or_init(|| self.build_children().map(|mut fields| {
                sort_fields(&mut fields, &self.options);
                fields
            }));
        match computed {
            Ok(fields) => Ok(fields),
            Err(e) => Err(e.clone()),
        }
    }

    fn build_children(&self) -> Result<Vec<Rc<FieldModel>>, ModelError> {
        let Some(schema) = &self.schema else {
            return Ok(Vec::new());
        };

        let mut out = Vec::new();
        self.collect_properties(schema, &mut out)?;

        if let Some(items) = &schema.items {
            if let DerefSchema::Schema {
                schema: item_schema,
                pointer,
            } = self.store.deref_schema(items)?
            {
                if pointer
                    .as_ref()
                    .is_none_or(|p| !self.ancestors.iter().any(|a| a == p))
                {
                    self.collect_properties(&item_schema, &mut out)?;
                }
            }
        }

        Ok(out)
    }

    fn collect_properties(
        &self,
        schema: &Schema,
        out: &mut Vec<Rc<FieldModel>>,
    ) -> Result<(), ModelError> {
        for part in &schema.all_of {
            if let DerefSchema::Schema {
                schema: part_schema,
                pointer,
            } = self.store.deref_schema(part)?
            {
                if pointer
                    .as_ref()
                    .is_none_or(|p| !self.ancestors.iter().any(|a| a == p))
                {
                    self.collect_properties(&part_schema, out)?;
                }
            }
        }

        for (name, property) in &schema.properties {
            let child = FieldModel::from_schema(
                Rc::clone(&self.store),
                Rc::clone(&self.options),
                name.clone(),
                schema.required.iter().any(|r| r == name),
                property,
                format!("{}/properties/{}", self.pointer, name),
                Rc::clone(&self.ancestors),
            )?;
            out.push(child);
        }
        Ok(())
    }
}

/// Apply the configured sort policy in place. Alphabetical wins when both
/// options are set; required-first is a stable partition; otherwise
/// declaration order is kept.
pub fn sort_fields(fields: &mut [Rc<FieldModel>], options: &RefdocOptions) {
    if options.sort_props_alphabetically {
        fields.sort_by(|a, b| a.name.cmp(&b.name));
    } else if options.required_props_first {
        fields.sort_by_key(|f| !f.required);
    }
}

/// Surface `x-` members admitted by the `show_extensions` option.
pub fn extract_extensions(
    members: &IndexMap<String, Value>,
    options: &RefdocOptions,
) -> IndexMap<String, Value> {
    members
        .iter()
        .filter(|(key, _)| options.show_extensions.admits(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Human-readable type label for a schema.
pub fn type_label(schema: &Schema, pointer: Option<&str>) -> String {
    if !schema.one_of.is_empty() {
        return combinator_label("oneOf", &schema.one_of);
    }
    if !schema.any_of.is_empty() {
        return combinator_label("anyOf", &schema.any_of);
    }
    if !schema.all_of.is_empty() {
        return named_label(schema, pointer).unwrap_or_else(|| "object".to_string());
    }

    match schema.primary_type() {
        Some(SchemaType::Array) => {
            let item = schema
                .items
                .as_deref()
                .map(short_label)
                .unwrap_or_else(|| "any".to_string());
            format!("Array of {item}")
        }
        Some(SchemaType::Object) => {
            named_label(schema, pointer).unwrap_or_else(|| "object".to_string())
        }
        Some(scalar) => match &schema.format {
            Some(format) => format!("{} <{}>", scalar.as_str(), format),
            None => scalar.as_str().to_string(),
        },
        None if !schema.properties.is_empty() => {
            named_label(schema, pointer).unwrap_or_else(|| "object".to_string())
        }
        None => "any".to_string(),
    }
}

fn named_label(schema: &Schema, pointer: Option<&str>) -> Option<String> {
    schema
        .title
        .clone()
        .or_else(|| pointer.map(ref_display_name))
}

fn combinator_label(keyword: &str, variants: &[SchemaOrRef]) -> String {
    let labels: Vec<String> = variants.iter().map(short_label).collect();
    format!("{keyword}: {}", labels.join(" | "))
}

fn short_label(schema_or_ref: &SchemaOrRef) -> String {
    match schema_or_ref {
        SchemaOrRef::Ref { ref_path } => ref_display_name(ref_path),
        SchemaOrRef::Schema(schema) => schema
            .title
            .clone()
            .or_else(|| schema.primary_type().map(|t| t.as_str().to_string()))
            .unwrap_or_else(|| "any".to_string()),
    }
}

/// The trailing pointer segment, used as a display name for referenced
/// schemas (`#/components/schemas/Pet` → `Pet`).
pub fn ref_display_name(pointer: &str) -> String {
    pointer
        .rsplit('/')
        .next()
        .unwrap_or(pointer)
        .to_string()
}

fn constraint_summary(schema: &Schema) -> Vec<String> {
    let mut out = Vec::new();
    match (schema.minimum, schema.maximum) {
        (Some(min), Some(max)) => out.push(format!("[ {min} .. {max} ]")),
        (Some(min), None) => out.push(format!(">= {min}")),
        (None, Some(max)) => out.push(format!("<= {max}")),
        (None, None) => {}
    }
    match (schema.min_length, schema.max_length) {
        (Some(min), Some(max)) => out.push(format!("{min}..{max} characters")),
        (Some(min), None) => out.push(format!(">= {min} characters")),
        (None, Some(max)) => out.push(format!("<= {max} characters")),
        (None, None) => {}
    }
    match (schema.min_items, schema.max_items) {
        (Some(min), Some(max)) => out.push(format!("{min}..{max} items")),
        (Some(min), None) => out.push(format!(">= {min} items")),
        (None, Some(max)) => out.push(format!("<= {max} items")),
        (None, None) => {}
    }
    if let Some(pattern) = &schema.pattern {
        out.push(format!("matches {pattern}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(value: serde_json::Value) -> Schema {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn scalar_labels_include_format() {
        assert_eq!(type_label(&schema(json!({"type": "string"})), None), "string");
        assert_eq!(
            type_label(&schema(json!({"type": "string", "format": "date-time"})), None),
            "string <date-time>"
        );
        assert_eq!(type_label(&schema(json!({})), None), "any");
    }

    #[test]
    fn array_and_ref_labels() {
        let s = schema(json!({"type": "array", "items": {"$ref": "#/components/schemas/Pet"}}));
        assert_eq!(type_label(&s, None), "Array of Pet");
        let named = schema(json!({"type": "object"}));
        assert_eq!(
            type_label(&named, Some("#/components/schemas/Order")),
            "Order"
        );
    }

    #[test]
    fn combinator_labels_join_variants() {
        let s = schema(json!({"oneOf": [
            {"$ref": "#/components/schemas/Cat"},
            {"type": "string"}
        ]}));
        assert_eq!(type_label(&s, None), "oneOf: Cat | string");
    }

    #[test]
    fn constraint_lines() {
        let s = schema(json!({"type": "integer", "minimum": 1, "maximum": 100}));
        assert_eq!(constraint_summary(&s), vec!["[ 1 .. 100 ]"]);
        let s = schema(json!({"type": "string", "minLength": 2, "pattern": "^[a-z]+$"}));
        assert_eq!(
            constraint_summary(&s),
            vec![">= 2 characters", "matches ^[a-z]+$"]
        );
    }
}
