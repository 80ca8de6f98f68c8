use std::rc::Rc;

use serde_json::json;

use refdoc_core::model::{ApiModel, CodeSample, OperationModel};
use refdoc_core::{LoadError, LoadMode, RefdocOptions, StatusKind};

const MUSEUM: &str = include_str!("fixtures/museum.yaml");
const CIRCULAR: &str = include_str!("fixtures/circular.yaml");

fn load(options: RefdocOptions) -> ApiModel {
    ApiModel::from_yaml(MUSEUM, options).expect("museum fixture should load")
}

fn operation(api: &ApiModel, id: &str) -> Rc<OperationModel> {
    api.groups
        .iter()
        .flat_map(|g| g.operations().clone())
        .find(|op| op.id == id)
        .unwrap_or_else(|| panic!("no operation {id}"))
}

#[test]
fn operation_ids_prefer_operation_id() {
    let api = load(RefdocOptions::default());
    let list = operation(&api, "operation/listEvents");
    assert_eq!(list.http_verb, "get");
    assert_eq!(list.path, "/events");
    assert_eq!(list.name, "List special events");

    // No operationId: id is the group id plus the JSON pointer.
    let health = operation(&api, "tag/other/paths/~1health/get");
    assert_eq!(health.name, "Health probe");
    assert!(!health.is_callback);
}

#[test]
fn parameter_merge_operation_wins_on_name_and_location() {
    let api = load(RefdocOptions::default());
    let list = operation(&api, "operation/listEvents");
    let parameters = list.parameters().unwrap();

    let names: Vec<&str> = parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["page", "limit"]);

    // The surviving `limit` is the operation-level one.
    let limit = &parameters[1];
    assert!(limit.required);
    assert_eq!(limit.description.as_deref(), Some("Maximum events per page"));
    assert_eq!(limit.constraints, vec!["<= 50"]);
}

#[test]
fn required_first_sort_is_a_stable_partition() {
    let yaml = r#"
openapi: 3.0.3
info: {title: Sort, version: "1.0"}
tags: [{name: T}]
paths:
  /things:
    get:
      operationId: listThings
      tags: [T]
      parameters:
        - {name: b, in: query, schema: {type: string}}
        - {name: a, in: query, required: true, schema: {type: string}}
        - {name: c, in: query, schema: {type: string}}
      responses:
        '200': {description: OK}
"#;
    let options = RefdocOptions {
        required_props_first: true,
        ..Default::default()
    };
    let api = ApiModel::from_yaml(yaml, options).unwrap();
    let op = operation(&api, "operation/listThings");
    let names: Vec<&str> = op.parameters().unwrap().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);

    // Alphabetical wins when both sort options are set.
    let options = RefdocOptions {
        required_props_first: true,
        sort_props_alphabetically: true,
        ..Default::default()
    };
    let api = ApiModel::from_yaml(yaml, options).unwrap();
    let op = operation(&api, "operation/listThings");
    let names: Vec<&str> = op.parameters().unwrap().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn response_filtering_and_success_flag() {
    let api = load(RefdocOptions::default());

    let list = operation(&api, "operation/listEvents");
    let responses = list.responses().unwrap();
    let codes: Vec<&str> = responses.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(codes, vec!["200", "400", "default"]);
    assert!(responses.iter().all(|r| r.has_success_context));

    // The referenced 400 resolved to its component definition.
    assert_eq!(responses[1].description, "Bad request");
    assert_eq!(responses[1].kind, StatusKind::ClientError);

    // Only a 404: no documented success path.
    let ticket = operation(&api, "operation/getTicket");
    let responses = ticket.responses().unwrap();
    assert_eq!(responses.len(), 1);
    assert!(!responses[0].has_success_context);
}

#[test]
fn response_headers_materialize_as_fields() {
    let api = load(RefdocOptions::default());
    let create = operation(&api, "operation/createEvent");
    let responses = create.responses().unwrap();
    let created = responses.iter().find(|r| r.code == "201").unwrap();
    assert_eq!(created.headers.len(), 1);
    assert_eq!(created.headers[0].name, "Location");
    assert_eq!(created.headers[0].type_label, "string <uri>");
}

#[test]
fn payload_sample_spliced_at_clamped_index() {
    // Default index 0: payload first, then the two vendor samples.
    let api = load(RefdocOptions::default());
    let create = operation(&api, "operation/createEvent");
    let samples = create.code_samples().unwrap();
    assert_eq!(samples.len(), 3);
    assert!(samples[0].is_payload());
    assert_eq!(samples[1].label(), "cURL");
    assert_eq!(samples[2].label(), "python");

    // Index 1 lands between the vendor samples.
    let api = load(RefdocOptions {
        payload_sample_idx: 1,
        ..Default::default()
    });
    let create = operation(&api, "operation/createEvent");
    let samples = create.code_samples().unwrap();
    assert!(samples[1].is_payload());

    // An index past the end clamps to the end.
    let api = load(RefdocOptions {
        payload_sample_idx: 7,
        ..Default::default()
    });
    let create = operation(&api, "operation/createEvent");
    let samples = create.code_samples().unwrap();
    assert_eq!(samples.len(), 3);
    assert!(samples[2].is_payload());
}

#[test]
fn code_samples_are_memoized_not_respliced() {
    let api = load(RefdocOptions {
        payload_sample_idx: 1,
        ..Default::default()
    });
    let create = operation(&api, "operation/createEvent");

    for _ in 0..3 {
        let samples = create.code_samples().unwrap();
        assert_eq!(samples.len(), 3);
        let payload_positions: Vec<usize> = samples
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_payload())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(payload_positions, vec![1]);
    }
}

#[test]
fn operation_without_sampleable_body_gets_no_payload_tab() {
    let api = load(RefdocOptions::default());
    let list = operation(&api, "operation/listEvents");
    assert!(list.code_samples().unwrap().is_empty());

    // A request body whose media type has neither example nor schema.
    let yaml = r#"
openapi: 3.0.3
info: {title: Blobs, version: "1.0"}
tags: [{name: T}]
paths:
  /blobs:
    post:
      operationId: createBlob
      tags: [T]
      requestBody:
        content:
          application/octet-stream: {}
      responses:
        '201': {description: Created}
"#;
    let api = ApiModel::from_yaml(yaml, RefdocOptions::default()).unwrap();
    let op = operation(&api, "operation/createBlob");
    assert!(op.code_samples().unwrap().is_empty());
}

#[test]
fn payload_sample_content_synthesized_from_schema() {
    let api = load(RefdocOptions::default());
    let create = operation(&api, "operation/createEvent");
    let samples = create.code_samples().unwrap();
    let CodeSample::Payload { content } = &samples[0] else {
        panic!("first sample should be the payload");
    };
    let media_type = content.active_media_type().unwrap();
    assert_eq!(media_type.name, "application/json");
    let sample = media_type.sample().unwrap().unwrap();
    // Property-level examples win inside the synthesized object.
    assert_eq!(sample["name"], json!("Moonlight tour"));
    assert_eq!(sample["date"], json!("2024-06-01"));
}

#[test]
fn top_level_operations_inherit_global_security() {
    let api = load(RefdocOptions::default());
    let list = operation(&api, "operation/listEvents");
    assert_eq!(list.security.len(), 1);
    assert_eq!(list.security[0].schemes.len(), 1);
    assert_eq!(list.security[0].schemes[0].id, "ApiKeyAuth");
    assert!(list.security[0].schemes[0].scheme.is_some());

    // An explicit empty list opts out of the global requirements.
    let create = operation(&api, "operation/createEvent");
    assert!(create.security.is_empty());
}

#[test]
fn callback_operations_do_not_inherit_security_but_do_inherit_servers() {
    let api = load(RefdocOptions::default());
    let create = operation(&api, "operation/createEvent");
    let callbacks = create.callbacks().unwrap();
    assert_eq!(callbacks.len(), 1);
    assert_eq!(callbacks[0].name, "eventReminder");

    let reminder = &callbacks[0].operations;
    assert_eq!(reminder.len(), 1);
    let reminder = &reminder[0];
    assert!(reminder.is_callback);
    // Named by the triggering event, not a summary or operationId.
    assert_eq!(reminder.name, "eventReminder");
    // No explicit security: defaults to none despite the global list.
    assert!(reminder.security.is_empty());
    // Servers inherit the document list.
    assert_eq!(reminder.servers.len(), 1);
    assert_eq!(reminder.servers[0].url, "https://api.museum.example/v1");
    // Identity is the owner's id plus the callback pointer.
    assert!(reminder.id.starts_with("operation/createEvent/paths/"));
    assert!(reminder.id.contains("/callbacks/eventReminder/"));
}

#[test]
fn circular_schema_renders_a_recursive_stub() {
    let api = ApiModel::from_yaml(CIRCULAR, RefdocOptions::default()).unwrap();
    let create = operation(&api, "operation/createNode");

    let body = create.request_body().unwrap().expect("has a body");
    let content = body.content.as_ref().unwrap();
    let media_type = content.active_media_type().unwrap();
    let root = media_type.schema_field().unwrap();

    let children = root.children().unwrap();
    let names: Vec<&str> = children.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["label", "parent", "children"]);

    let parent = &children[1];
    assert!(parent.is_circular);
    assert_eq!(parent.type_label, "recursive (Node)");
    assert!(parent.children().unwrap().is_empty());

    // The array of self-references is cut at the item level.
    let nested = &children[2];
    assert!(!nested.is_circular);
    assert_eq!(nested.type_label, "Array of Node");
    assert!(nested.children().unwrap().is_empty());

    // Sampling the same schema terminates too.
    assert!(media_type.sample().unwrap().is_some());
}

#[test]
fn strict_load_fails_on_broken_refs_best_effort_skips() {
    let yaml = r#"
openapi: 3.0.3
info: {title: Broken, version: "1.0"}
tags: [{name: T}]
paths:
  /ok:
    get:
      operationId: okOp
      tags: [T]
      responses:
        '200': {description: OK}
  /broken:
    get:
      operationId: brokenOp
      tags: [T]
      responses:
        '200':
          $ref: '#/components/responses/DoesNotExist'
"#;
    match ApiModel::from_yaml(yaml, RefdocOptions::default()) {
        Err(LoadError::Operation { pointer, .. }) => {
            assert_eq!(pointer, "/paths/~1broken/get");
        }
        other => panic!("strict load should fail, got {:?}", other.is_ok()),
    }

    let options = RefdocOptions {
        load_mode: LoadMode::BestEffort,
        ..Default::default()
    };
    let api = ApiModel::from_yaml(yaml, options).unwrap();
    let ops: Vec<String> = api
        .groups
        .iter()
        .flat_map(|g| g.operations().iter().map(|o| o.id.clone()).collect::<Vec<_>>())
        .collect();
    assert_eq!(ops, vec!["operation/okOp".to_string()]);
}

#[test]
fn extensions_surfaced_only_when_admitted() {
    let yaml = r#"
openapi: 3.0.3
info: {title: Ext, version: "1.0"}
tags: [{name: T}]
paths:
  /things:
    get:
      operationId: listThings
      tags: [T]
      x-audience: internal
      responses:
        '200': {description: OK}
"#;
    let api = ApiModel::from_yaml(yaml, RefdocOptions::default()).unwrap();
    let op = operation(&api, "operation/listThings");
    assert!(op.extensions.is_empty());

    let options: RefdocOptions = serde_yaml_ng::from_str("showExtensions: true").unwrap();
    let api = ApiModel::from_yaml(yaml, options).unwrap();
    let op = operation(&api, "operation/listThings");
    assert_eq!(op.extensions.get("x-audience"), Some(&json!("internal")));
}
