//! Attachment source base: override precedence, lazy acquisition, and
//! fallback inference shared by every transport backend.
//!
//! Each accessor checks its override first, then its cached slot, and only
//! then invokes the backend's single `acquire` operation, which populates
//! path/name/mimetype as a side effect. A failed acquisition caches nothing,
//! so the next property access retries; transient transport failures do not
//! poison the instance.

mod acquire;
mod slot;

pub use acquire::{Acquire, AcquireError, AcquireLimits, Acquired};

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use thiserror::Error;

use crate::config::AttachConfig;
use crate::descriptor::{extract_overrides, Descriptor};
use crate::mime_table::MimeTable;
use slot::{ResolveState, Slot};

/// Construction-time failure. No usable instance exists afterwards.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Forced MIME type does not match any known type value.
    #[error("an invalid mime-type ({0}) was specified")]
    UnknownMimetype(String),
}

/// Parameter bag produced by [`AttachSource::parse_descriptor`]: the generic
/// descriptor parts plus any override directives lifted from its query
/// component. A factory passes this to a concrete backend's constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceParams {
    pub descriptor: Descriptor,
    /// Forced display name from `name=`, trimmed and lower-cased.
    pub name: Option<String>,
    /// Forced MIME type from `mime=`, trimmed and lower-cased.
    pub mimetype: Option<String>,
}

/// Base of every attachment source: one transport backend plus the shared
/// override/cache/inference logic above it.
///
/// Accessors take `&self` and may block for the duration of an acquisition;
/// concurrent callers on the same instance serialize on the internal lock so
/// the backend runs at most once per resolution episode. Distinct instances
/// are independent.
pub struct AttachSource {
    name_override: Option<String>,
    mimetype_override: Option<String>,
    config: AttachConfig,
    mime_table: MimeTable,
    backend: Box<dyn Acquire>,
    state: Mutex<ResolveState>,
}

impl AttachSource {
    /// Wraps `backend` with optional forced name and MIME type.
    ///
    /// The MIME table is built from `config.strict`. A forced MIME type must
    /// match a known table entry exactly or construction fails. Empty
    /// overrides count as absent.
    pub fn new(
        backend: Box<dyn Acquire>,
        name: Option<String>,
        mimetype: Option<String>,
        config: AttachConfig,
    ) -> Result<Self, ConfigError> {
        let mime_table = MimeTable::new(config.strict);
        Self::with_mime_table(backend, name, mimetype, config, mime_table)
    }

    /// Like [`AttachSource::new`] with an explicitly injected MIME table.
    pub fn with_mime_table(
        backend: Box<dyn Acquire>,
        name: Option<String>,
        mimetype: Option<String>,
        config: AttachConfig,
        mime_table: MimeTable,
    ) -> Result<Self, ConfigError> {
        let name_override = name.filter(|n| !n.is_empty());
        let mimetype_override = mimetype.filter(|m| !m.is_empty());

        if let Some(forced) = &mimetype_override {
            if !mime_table.is_known(forced) {
                tracing::warn!("an invalid mime-type ({forced}) was specified");
                return Err(ConfigError::UnknownMimetype(forced.clone()));
            }
        }

        Ok(Self {
            name_override,
            mimetype_override,
            config,
            mime_table,
            backend,
            state: Mutex::new(ResolveState::new()),
        })
    }

    /// Display name of the attachment.
    ///
    /// A forced name wins without ever triggering acquisition. Otherwise the
    /// detected name is returned, acquiring on first use; when a successful
    /// acquisition yields no name, one is synthesized from the unknown
    /// filename stem plus an extension guessed from the resolved MIME type.
    /// `None` when acquisition fails.
    pub fn name(&self) -> Option<String> {
        if let Some(forced) = &self.name_override {
            return Some(forced.clone());
        }

        let mut state = self.lock_state();
        if !state.name.is_ready() && !self.acquired(&mut state) {
            return None;
        }

        if !state.name.is_ready() {
            let mimetype = self.resolve_mimetype(&mut state);
            let extension = self
                .mime_table
                .extension_for(&mimetype)
                .unwrap_or_else(|| self.config.unknown_filename_extension.clone());
            let fallback = format!("{}{}", self.config.unknown_filename, extension);
            tracing::debug!("no filename detected; using {fallback}");
            state.name = Slot::Ready(fallback);
        }

        state.name.value().cloned()
    }

    /// MIME type of the attachment.
    ///
    /// A forced type wins (it passed table validation at construction).
    /// Otherwise the detected type is returned, acquiring on first use; when
    /// a successful acquisition yields none, the type is guessed from the
    /// name and cached, falling back to the configured unknown type. `None`
    /// when acquisition fails.
    pub fn mimetype(&self) -> Option<String> {
        if let Some(forced) = &self.mimetype_override {
            return Some(forced.clone());
        }

        let mut state = self.lock_state();
        if !state.mimetype.is_ready() && !self.acquired(&mut state) {
            return None;
        }

        Some(self.resolve_mimetype(&mut state))
    }

    /// Absolute path to readable content, acquiring on first use.
    ///
    /// Once resolved, the same path is returned without re-acquisition.
    /// `None` when acquisition fails.
    pub fn path(&self) -> Option<PathBuf> {
        let mut state = self.lock_state();
        if let Some(path) = state.path.value() {
            return Some(path.clone());
        }
        if !self.acquired(&mut state) {
            return None;
        }
        state.path.value().cloned()
    }

    /// Size in bytes of the resolved content. 0 when unresolved, or when the
    /// content disappeared between resolution and measurement.
    pub fn len(&self) -> u64 {
        self.path()
            .and_then(|p| fs::metadata(p).ok())
            .map(|m| m.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True iff content resolves: the truthiness check callers use to decide
    /// whether to skip an attachment.
    pub fn has_content(&self) -> bool {
        self.path().is_some()
    }

    /// Query parameters a collaborator must re-embed when serializing this
    /// source back into a descriptor: only explicitly forced overrides,
    /// never detected or inferred values.
    pub fn override_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(mimetype) = &self.mimetype_override {
            params.push(("mime", mimetype.clone()));
        }
        if let Some(name) = &self.name_override {
            params.push(("name", name.clone()));
        }
        params
    }

    /// Serializes this source against `base` (typically the descriptor it
    /// was constructed from). Recognized override keys in the base query are
    /// replaced by this instance's forced values, or dropped entirely when
    /// no override was forced.
    pub fn to_descriptor(&self, base: &Descriptor) -> String {
        let mut base = base.clone();
        base.query
            .retain(|key, _| !key.eq_ignore_ascii_case("mime") && !key.eq_ignore_ascii_case("name"));
        let params = self.override_params();
        let extra: Vec<(&str, &str)> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();
        base.to_url(&extra)
    }

    /// Parses a raw descriptor into the parameter bag a backend factory
    /// needs: the generic parse result with `mime=`/`name=` query directives
    /// (case-normalized, trimmed) lifted into the override fields.
    /// Unrecognized query parameters stay in the descriptor untouched.
    /// `None` when the generic parse fails.
    pub fn parse_descriptor(raw: &str) -> Option<SourceParams> {
        let descriptor = Descriptor::parse(raw)?;
        let overrides = extract_overrides(&descriptor);
        Some(SourceParams {
            descriptor,
            name: overrides.name,
            mimetype: overrides.mimetype,
        })
    }

    fn lock_state(&self) -> MutexGuard<'_, ResolveState> {
        // A poisoning panic can only have happened between whole-slot writes,
        // so the state is still structurally sound.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Ensures an acquisition attempt has been made. Returns true when
    /// content is in place. A prior success short-circuits; a failure resets
    /// every slot so the next access retries.
    fn acquired(&self, state: &mut ResolveState) -> bool {
        if state.path.is_ready() {
            return true;
        }

        let limits = AcquireLimits {
            max_file_size: self.config.max_file_size,
            max_detect_buffer_size: self.config.max_detect_buffer_size,
        };
        match self.backend.acquire(&limits) {
            Ok(acquired) => {
                state.path = Slot::Ready(acquired.path);
                state.name = Slot::from_detected(acquired.name);
                state.mimetype = Slot::from_detected(acquired.mimetype);
                true
            }
            Err(err) => {
                tracing::warn!("attachment acquisition failed: {err}");
                state.reset();
                false
            }
        }
    }

    /// Resolves the detected MIME type, guessing from the raw name fields
    /// (forced first, then detected — not via `name()`, which would re-enter
    /// acquisition) and caching the guessed-or-fallback value.
    fn resolve_mimetype(&self, state: &mut ResolveState) -> String {
        if let Some(mimetype) = state.mimetype.value() {
            return mimetype.clone();
        }

        let candidate = self
            .name_override
            .as_deref()
            .or_else(|| state.name.value().map(String::as_str));
        let resolved = candidate
            .and_then(|name| self.mime_table.guess_type(name))
            .unwrap_or_else(|| self.config.unknown_mimetype.clone());
        state.mimetype = Slot::Ready(resolved.clone());
        resolved
    }
}

impl fmt::Debug for AttachSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttachSource")
            .field("name_override", &self.name_override)
            .field("mimetype_override", &self.mimetype_override)
            .field("strict", &self.mime_table.is_strict())
            .finish_non_exhaustive()
    }
}
