//! Model layer for an interactive OpenAPI reference renderer.
//!
//! Turns a parsed OpenAPI 3.x document into a resolved, presentation-ready
//! object graph: tagged operation groups, fields, request/response content,
//! code samples (including a synthetic payload sample), nested callback
//! operations, and a flattened navigation menu with stable absolute
//! indices. Rendering, theming, and document fetching are external
//! collaborators that consume this graph read-only and subscribe to its
//! view-state notifications.

pub mod config;
pub mod error;
pub mod menu;
pub mod model;
pub mod resolve;
pub mod spec;
pub mod view;

pub use config::{LoadMode, RefdocOptions, ShowExtensions};
pub use error::{LoadError, ModelError, ParseError, ResolveError};
pub use menu::{MenuItem, MenuItemKind, MenuModel};
pub use model::{
    ApiModel, CallbackModel, CodeSample, FieldModel, GroupModel, MediaContentModel,
    MediaTypeModel, OperationModel, RequestBodyModel, ResponseModel, SecurityRequirementModel,
    ServerModel, StatusKind,
};
pub use resolve::SpecStore;
pub use view::{Notifier, ViewEvent};
