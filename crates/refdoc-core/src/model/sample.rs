use std::rc::Rc;

use crate::spec::operation::RawCodeSample;

use super::media::MediaContentModel;

/// One tab in an operation's request-sample panel.
///
/// A tagged variant rather than a field-presence check, so consumers match
/// exhaustively: either an author-supplied snippet in some language, or the
/// synthetic payload tab rendered from the request body content.
pub enum CodeSample {
    Lang {
        lang: String,
        label: Option<String>,
        source: String,
    },
    Payload {
        content: Rc<MediaContentModel>,
    },
}

impl CodeSample {
    pub fn from_raw(raw: RawCodeSample) -> CodeSample {
        CodeSample::Lang {
            lang: raw.lang,
            label: raw.label,
            source: raw.source,
        }
    }

    /// Tab caption: the explicit label, else the language, else "Payload".
    pub fn label(&self) -> &str {
        match self {
            CodeSample::Lang { label, lang, .. } => label.as_deref().unwrap_or(lang),
            CodeSample::Payload { .. } => "Payload",
        }
    }

    pub fn is_payload(&self) -> bool {
        matches!(self, CodeSample::Payload { .. })
    }
}
