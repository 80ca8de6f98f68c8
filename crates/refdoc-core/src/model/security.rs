use std::rc::Rc;

use crate::resolve::SpecStore;
use crate::spec::security::{SecurityRequirement, SecurityScheme};

/// One alternative way to authorize an operation: every listed scheme must
/// be satisfied together.
pub struct SecurityRequirementModel {
    pub schemes: Vec<SecuritySchemeRef>,
}

/// A scheme named by a requirement, resolved against
/// `components.securitySchemes` when the document defines it.
pub struct SecuritySchemeRef {
    /// The scheme key, also the anchor id fragment for linking.
    pub id: String,
    pub scopes: Vec<String>,
    /// `None` when the requirement names an undeclared scheme; kept rather
    /// than dropped so the mismatch is visible in the rendered document.
    pub scheme: Option<SecurityScheme>,
}

impl SecurityRequirementModel {
    pub fn build(store: &Rc<SpecStore>, requirement: &SecurityRequirement) -> Self {
        let schemes = requirement
            .iter()
            .map(|(name, scopes)| {
                let pointer = format!("#/components/securitySchemes/{name}");
                let scheme = store
                    .by_pointer(&pointer)
                    .ok()
                    .and_then(|value| serde_json::from_value((*value).clone()).ok());
                SecuritySchemeRef {
                    id: name.clone(),
                    scopes: scopes.clone(),
                    scheme,
                }
            })
            .collect();
        SecurityRequirementModel { schemes }
    }
}
