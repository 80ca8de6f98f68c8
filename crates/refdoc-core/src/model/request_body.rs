use std::rc::Rc;

use crate::config::RefdocOptions;
use crate::error::ModelError;
use crate::resolve::SpecStore;
use crate::spec::request_body::{RequestBody, RequestBodyOrRef};

use super::media::MediaContentModel;

/// A resolved request body ready for display.
pub struct RequestBodyModel {
    pub description: Option<String>,
    pub required: bool,
    pub content: Option<Rc<MediaContentModel>>,
}

impl RequestBodyModel {
    pub fn build(
        store: &Rc<SpecStore>,
        options: &Rc<RefdocOptions>,
        body: &RequestBodyOrRef,
        pointer: String,
    ) -> Result<RequestBodyModel, ModelError> {
        let (body, pointer): (RequestBody, String) = match body {
            RequestBodyOrRef::RequestBody(inline) => (inline.clone(), pointer),
            RequestBodyOrRef::Ref { ref_path } => store.deref_typed(ref_path)?,
        };

        let content = if body.content.is_empty() {
            None
        } else {
            Some(Rc::new(MediaContentModel::build(
                store,
                options,
                &body.content,
                &pointer,
                true,
            )?))
        };

        Ok(RequestBodyModel {
            description: body.description,
            required: body.required,
            content,
        })
    }
}
