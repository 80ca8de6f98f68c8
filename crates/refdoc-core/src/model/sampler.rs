use serde_json::{Map, Value, json};

use crate::error::ModelError;
use crate::resolve::{DerefSchema, SpecStore};
use crate::spec::schema::{Schema, SchemaOrRef, SchemaType};

/// Nesting cap for synthesized samples; anything deeper renders as `{}`.
const MAX_DEPTH: usize = 8;

/// Synthesize an example payload from a schema.
///
/// Author-supplied values win: `example`, then `default`, then the first
/// `enum`/`const` member. Otherwise objects are built property by property,
/// arrays get one synthesized item, and scalars get format-aware
/// placeholders. Self-referential schemas are cut off at the point of
/// re-entry with an empty object.
pub fn sample_schema(
    store: &SpecStore,
    schema: &Schema,
    pointer: Option<&str>,
) -> Result<Value, ModelError> {
    let mut ancestors: Vec<String> = pointer.map(str::to_string).into_iter().collect();
    sample(store, schema, &mut ancestors, 0)
}

fn sample(
    store: &SpecStore,
    schema: &Schema,
    ancestors: &mut Vec<String>,
    depth: usize,
) -> Result<Value, ModelError> {
    if let Some(example) = &schema.example {
        return Ok(example.clone());
    }
    if let Some(default) = &schema.default_value {
        return Ok(default.clone());
    }
    if let Some(constant) = &schema.const_value {
        return Ok(constant.clone());
    }
    if let Some(first) = schema.enum_values.first() {
        return Ok(first.clone());
    }
    if depth > MAX_DEPTH {
        return Ok(json!({}));
    }

    if let Some(variant) = schema.one_of.first().or_else(|| schema.any_of.first()) {
        return sample_ref(store, variant, ancestors, depth);
    }
    if !schema.all_of.is_empty() {
        return sample_all_of(store, &schema.all_of, ancestors, depth);
    }

    match schema.primary_type() {
        Some(SchemaType::String) => Ok(Value::String(string_placeholder(schema))),
        Some(SchemaType::Integer) => Ok(json!(schema.minimum.unwrap_or(0.0) as i64)),
        Some(SchemaType::Number) => Ok(json!(schema.minimum.unwrap_or(0.0))),
        Some(SchemaType::Boolean) => Ok(json!(true)),
        Some(SchemaType::Null) => Ok(Value::Null),
        Some(SchemaType::Array) => sample_array(store, schema, ancestors, depth),
        Some(SchemaType::Object) => sample_object(store, schema, ancestors, depth),
        None if !schema.properties.is_empty() => sample_object(store, schema, ancestors, depth),
        None if schema.items.is_some() => sample_array(store, schema, ancestors, depth),
        None => Ok(Value::Null),
    }
}

fn sample_object(
    store: &SpecStore,
    schema: &Schema,
    ancestors: &mut Vec<String>,
    depth: usize,
) -> Result<Value, ModelError> {
    let mut object = Map::new();
    for (name, property) in &schema.properties {
        match sample_ref(store, property, ancestors, depth + 1)? {
            // Recursion cut: the property pointed back at an ancestor.
            Value::Null if is_cut(store, property, ancestors) => continue,
            value => {
                object.insert(name.clone(), value);
            }
        }
    }
    Ok(Value::Object(object))
}

fn sample_array(
    store: &SpecStore,
    schema: &Schema,
    ancestors: &mut Vec<String>,
    depth: usize,
) -> Result<Value, ModelError> {
    let item = match &schema.items {
        Some(items) => sample_ref(store, items, ancestors, depth + 1)?,
        None => return Ok(json!([])),
    };
    Ok(json!([item]))
}

fn sample_all_of(
    store: &SpecStore,
    parts: &[SchemaOrRef],
    ancestors: &mut Vec<String>,
    depth: usize,
) -> Result<Value, ModelError> {
    let mut merged = Map::new();
    for part in parts {
        if let Value::Object(fields) = sample_ref(store, part, ancestors, depth)? {
            merged.extend(fields);
        }
    }
    Ok(Value::Object(merged))
}

fn sample_ref(
    store: &SpecStore,
    schema_or_ref: &SchemaOrRef,
    ancestors: &mut Vec<String>,
    depth: usize,
) -> Result<Value, ModelError> {
    match store.deref_schema(schema_or_ref)? {
        DerefSchema::Circular { .. } => Ok(Value::Null),
        DerefSchema::Schema { schema, pointer } => {
            if let Some(pointer) = &pointer {
                if ancestors.contains(pointer) {
                    return Ok(Value::Null);
                }
                ancestors.push(pointer.clone());
                let value = sample(store, &schema, ancestors, depth);
                ancestors.pop();
                value
            } else {
                sample(store, &schema, ancestors, depth)
            }
        }
    }
}

/// Whether sampling this position was cut off by the recursion guard, as
/// opposed to legitimately producing `null`.
fn is_cut(store: &SpecStore, schema_or_ref: &SchemaOrRef, ancestors: &[String]) -> bool {
    match schema_or_ref {
        SchemaOrRef::Ref { .. } => match store.deref_schema(schema_or_ref) {
            Ok(DerefSchema::Circular { .. }) => true,
            Ok(DerefSchema::Schema {
                pointer: Some(pointer),
                ..
            }) => ancestors.contains(&pointer),
            _ => false,
        },
        SchemaOrRef::Schema(_) => false,
    }
}

fn string_placeholder(schema: &Schema) -> String {
    match schema.format.as_deref() {
        Some("date-time") => "2024-06-01T12:00:00Z".to_string(),
        Some("date") => "2024-06-01".to_string(),
        Some("email") => "user@example.com".to_string(),
        Some("uuid") => "11111111-2222-3333-4444-555555555555".to_string(),
        Some("uri") | Some("url") => "https://example.com".to_string(),
        Some("hostname") => "example.com".to_string(),
        Some("ipv4") => "192.0.2.1".to_string(),
        Some(other) => other.to_string(),
        None => "string".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(value: Value) -> Schema {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn literal_example_wins() {
        let store = SpecStore::new(json!({}));
        let s = schema(json!({"type": "string", "example": "hello"}));
        assert_eq!(sample_schema(&store, &s, None).unwrap(), json!("hello"));
    }

    #[test]
    fn object_sample_from_properties() {
        let store = SpecStore::new(json!({}));
        let s = schema(json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "age": {"type": "integer", "minimum": 21},
                "tags": {"type": "array", "items": {"type": "string", "format": "email"}}
            }
        }));
        assert_eq!(
            sample_schema(&store, &s, None).unwrap(),
            json!({"name": "string", "age": 21, "tags": ["user@example.com"]})
        );
    }

    #[test]
    fn self_referential_schema_terminates() {
        let store = SpecStore::new(json!({
            "components": {"schemas": {"Node": {
                "type": "object",
                "properties": {
                    "label": {"type": "string"},
                    "next": {"$ref": "#/components/schemas/Node"}
                }
            }}}
        }));
        let s = schema(json!({
            "type": "object",
            "properties": {
                "label": {"type": "string"},
                "next": {"$ref": "#/components/schemas/Node"}
            }
        }));
        let value = sample_schema(&store, &s, Some("#/components/schemas/Node")).unwrap();
        // The self-reference is dropped instead of recursing.
        assert_eq!(value, json!({"label": "string"}));
    }

    #[test]
    fn one_of_uses_first_variant() {
        let store = SpecStore::new(json!({}));
        let s = schema(json!({"oneOf": [{"type": "boolean"}, {"type": "string"}]}));
        assert_eq!(sample_schema(&store, &s, None).unwrap(), json!(true));
    }
}
