pub mod api;
pub mod callback;
pub mod field;
pub mod group;
pub mod media;
pub mod operation;
pub mod request_body;
pub mod response;
pub mod sample;
pub mod sampler;
pub mod security;

pub use api::ApiModel;
pub use callback::CallbackModel;
pub use field::FieldModel;
pub use group::GroupModel;
pub use media::{MediaContentModel, MediaTypeModel};
pub use operation::{OperationModel, ServerModel};
pub use request_body::RequestBodyModel;
pub use response::{ResponseModel, StatusKind};
pub use sample::CodeSample;
pub use security::SecurityRequirementModel;

use crate::spec::security::SecurityRequirement;
use crate::spec::server::Server;

/// Document-level context inherited by operations: the global security
/// requirements and server list.
pub(crate) struct DocContext {
    pub security: Vec<SecurityRequirement>,
    pub servers: Vec<Server>,
}
