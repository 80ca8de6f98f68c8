use std::cell::Cell;
use std::rc::Rc;

use crate::config::RefdocOptions;
use crate::error::ModelError;
use crate::resolve::{DerefSchema, SpecStore};
use crate::spec::response::{HeaderOrRef, Response, ResponseOrRef};
use crate::spec::schema::SchemaOrRef;

use super::field::FieldModel;
use super::media::MediaContentModel;

/// Status-code classification used for badges and grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Redirect,
    ClientError,
    ServerError,
    /// The literal `default` response key.
    Default,
}

/// Whether a responses-map key is a displayable status code: a three-digit
/// code or a class wildcard like `2XX`. Vendor keys (`x-...`) are not.
pub fn is_status_code(key: &str) -> bool {
    let bytes = key.as_bytes();
    if bytes.len() != 3 || !bytes[0].is_ascii_digit() || !(b'1'..=b'5').contains(&bytes[0]) {
        return false;
    }
    (bytes[1].is_ascii_digit() && bytes[2].is_ascii_digit())
        || (bytes[1].eq_ignore_ascii_case(&b'X') && bytes[2].eq_ignore_ascii_case(&b'X'))
}

/// Classify a response key. `None` for keys that are not status codes.
pub fn status_kind(key: &str) -> Option<StatusKind> {
    if key == "default" {
        return Some(StatusKind::Default);
    }
    if !is_status_code(key) {
        return None;
    }
    match key.as_bytes()[0] {
        b'1' => Some(StatusKind::Info),
        b'2' => Some(StatusKind::Success),
        b'3' => Some(StatusKind::Redirect),
        b'4' => Some(StatusKind::ClientError),
        _ => Some(StatusKind::ServerError),
    }
}

/// One HTTP response ready for display.
pub struct ResponseModel {
    /// The responses-map key: a status code, class wildcard, or `default`.
    pub code: String,
    pub kind: StatusKind,
    pub description: String,
    /// Whether the owning operation documents any success response at all;
    /// a response list without one renders a warning affordance.
    pub has_success_context: bool,
    pub content: Option<Rc<MediaContentModel>>,
    pub headers: Vec<Rc<FieldModel>>,
    expanded: Cell<bool>,
}

impl ResponseModel {
    pub fn build(
        store: &Rc<SpecStore>,
        options: &Rc<RefdocOptions>,
        code: &str,
        has_success_context: bool,
        response: &ResponseOrRef,
        pointer: String,
    ) -> Result<Rc<ResponseModel>, ModelError> {
        let kind = status_kind(code)
            .ok_or_else(|| ModelError::shape(&pointer, format!("invalid status code {code}")))?;

        let (response, pointer): (Response, String) = match response {
            ResponseOrRef::Response(inline) => (inline.clone(), pointer),
            ResponseOrRef::Ref { ref_path } => store.deref_typed(ref_path)?,
        };

        let content = if response.content.is_empty() {
            None
        } else {
            Some(Rc::new(MediaContentModel::build(
                store,
                options,
                &response.content,
                &pointer,
                false,
            )?))
        };

        let mut headers = Vec::new();
        for (name, header_or_ref) in &response.headers {
            let header_pointer = format!("{pointer}/headers/{name}");
            let header = match header_or_ref {
                HeaderOrRef::Header(inline) => (**inline).clone(),
                HeaderOrRef::Ref { ref_path } => store.deref_typed(ref_path)?.0,
            };
            headers.push(Self::header_field(
                store,
                options,
                name,
                &header,
                header_pointer,
            )?);
        }

        Ok(Rc::new(ResponseModel {
            code: code.to_string(),
            kind,
            description: response.description,
            has_success_context,
            content,
            headers,
            // Success responses start opened; the rest start collapsed.
            expanded: Cell::new(matches!(kind, StatusKind::Success)),
        }))
    }

    fn header_field(
        store: &Rc<SpecStore>,
        options: &Rc<RefdocOptions>,
        name: &str,
        header: &crate::spec::response::Header,
        pointer: String,
    ) -> Result<Rc<FieldModel>, ModelError> {
        let schema_or_ref = header
            .schema
            .clone()
            .unwrap_or_else(|| SchemaOrRef::Schema(Box::default()));
        let field = FieldModel::from_schema(
            Rc::clone(store),
            Rc::clone(options),
            name.to_string(),
            header.required,
            &schema_or_ref,
            pointer,
            Rc::new(Vec::new()),
        )?;
        Ok(field)
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded.get()
    }

    pub fn toggle(&self) {
        self.expanded.set(!self.expanded.get());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_keys() {
        assert!(is_status_code("200"));
        assert!(is_status_code("404"));
        assert!(is_status_code("2XX"));
        assert!(is_status_code("5xx"));
        assert!(!is_status_code("default"));
        assert!(!is_status_code("x-internal"));
        assert!(!is_status_code("999"));
        assert!(!is_status_code("20"));
    }

    #[test]
    fn status_kinds() {
        assert_eq!(status_kind("204"), Some(StatusKind::Success));
        assert_eq!(status_kind("2XX"), Some(StatusKind::Success));
        assert_eq!(status_kind("301"), Some(StatusKind::Redirect));
        assert_eq!(status_kind("404"), Some(StatusKind::ClientError));
        assert_eq!(status_kind("503"), Some(StatusKind::ServerError));
        assert_eq!(status_kind("default"), Some(StatusKind::Default));
        assert_eq!(status_kind("x-internal"), None);
    }
}
