//! Cache variants.
//!
//! The same record can produce several different documents: one per API
//! version, per document kind, per caller visibility and per rendering. Each
//! combination is cached under its own label, and only that exact label is
//! ever read back.

use folio_document::{ApiVersion, DocumentKind};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Whether the caller may see privileged content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// Full documents, or bare documents without annotation references.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Rendering {
    #[default]
    Full,
    Bare,
}

/// Who is asking, and for which rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Scope {
    pub visibility: Visibility,
    pub rendering: Rendering,
}
impl Scope {
    pub fn public() -> Self {
        Self::default()
    }

    pub fn private() -> Self {
        Self {
            visibility: Visibility::Private,
            ..Self::default()
        }
    }

    pub fn privileged(mut self, privileged: bool) -> Self {
        self.visibility = if privileged { Visibility::Private } else { Visibility::Public };
        self
    }

    pub fn bare(mut self, bare: bool) -> Self {
        self.rendering = if bare { Rendering::Bare } else { Rendering::Full };
        self
    }
}

/// Cache key component distinguishing documents built for the same record.
///
/// Displays as `{public|private}_[bare_]{kind}{major}`, e.g.
/// `public_manifest3` or `private_bare_collection2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheVariant {
    pub version: ApiVersion,
    pub kind: DocumentKind,
    pub scope: Scope,
}
impl CacheVariant {
    pub fn new(version: ApiVersion, kind: DocumentKind, scope: Scope) -> Self {
        Self { version, kind, scope }
    }

    pub fn label(&self) -> String {
        self.to_string()
    }
}
impl Display for CacheVariant {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let visibility = match self.scope.visibility {
            Visibility::Public => "public",
            Visibility::Private => "private",
        };
        let rendering = match self.scope.rendering {
            Rendering::Full => "",
            Rendering::Bare => "bare_",
        };
        write!(f, "{visibility}_{rendering}{}{}", self.kind, self.version.major())
    }
}
