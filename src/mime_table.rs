//! Immutable MIME table: known-type lookup and extension <-> type guessing.
//!
//! Wraps the registered extension map from `mime_guess` and, in non-strict
//! mode, a small overlay of common but unregistered types. The table is
//! injected into sources at construction, so validation and inference stay
//! deterministic and free of process-global state.

/// Common types missing from the registered table, keyed by extension.
/// Consulted only when the table is not strict.
const EXTENDED: &[(&str, &str)] = &[
    ("pyc", "application/x-python-code"),
    ("pyo", "application/x-python-code"),
    ("pl", "text/x-perl"),
];

/// Exact-match set of known MIME type values plus extension maps in both
/// directions. Cheap to copy; strictness is fixed at creation.
#[derive(Debug, Clone, Copy)]
pub struct MimeTable {
    strict: bool,
}

impl MimeTable {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// True if `mimetype` matches a known type value exactly (ASCII
    /// case-insensitive). Syntactic validity alone does not count.
    pub fn is_known(&self, mimetype: &str) -> bool {
        let mimetype = mimetype.trim().to_ascii_lowercase();
        if mime_guess::get_mime_extensions_str(&mimetype)
            .map(|exts| !exts.is_empty())
            .unwrap_or(false)
        {
            return true;
        }
        !self.strict && EXTENDED.iter().any(|(_, t)| *t == mimetype)
    }

    /// Guesses a MIME type from a filename's extension. `None` when the
    /// filename has no extension or the extension is unmapped.
    pub fn guess_type(&self, filename: &str) -> Option<String> {
        let ext = filename.rsplit('.').next().filter(|e| e.len() < filename.len())?;
        let ext = ext.to_ascii_lowercase();
        if let Some(mimetype) = mime_guess::from_ext(&ext).first_raw() {
            return Some(mimetype.to_string());
        }
        if !self.strict {
            return EXTENDED
                .iter()
                .find(|(e, _)| *e == ext)
                .map(|(_, t)| (*t).to_string());
        }
        None
    }

    /// Preferred extension (with leading dot) for a MIME type, favoring the
    /// extension that spells the subtype (`.gif` for `image/gif`). `None`
    /// when the type has no mapped extension.
    pub fn extension_for(&self, mimetype: &str) -> Option<String> {
        let mimetype = mimetype.trim().to_ascii_lowercase();
        if let Some(exts) = mime_guess::get_mime_extensions_str(&mimetype) {
            if let Some(first) = exts.first() {
                let subtype = mimetype.rsplit('/').next().unwrap_or("");
                let pick = exts.iter().find(|e| **e == subtype).unwrap_or(first);
                return Some(format!(".{pick}"));
            }
        }
        if !self.strict {
            return EXTENDED
                .iter()
                .find(|(_, t)| *t == mimetype)
                .map(|(e, _)| format!(".{e}"));
        }
        None
    }
}

impl Default for MimeTable {
    fn default() -> Self {
        Self::new(false)
    }
}
