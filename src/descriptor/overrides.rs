//! Extraction of `mime=` / `name=` override directives from a descriptor's
//! query component.

use super::Descriptor;

/// Override directives carried in a descriptor's query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedOverrides {
    /// Forced MIME type (`mime=`), trimmed and lower-cased.
    pub mimetype: Option<String>,
    /// Forced display name (`name=`), trimmed and lower-cased.
    pub name: Option<String>,
}

/// Pulls override directives out of `descriptor`'s query parameters.
///
/// Keys match ASCII case-insensitively; absent (or blank) values leave the
/// field unset. Values are trimmed and lower-cased before storage — the
/// display name included, so `name=Report.PDF` stores as `report.pdf`.
pub fn extract_overrides(descriptor: &Descriptor) -> ParsedOverrides {
    let mut out = ParsedOverrides::default();
    for (key, value) in &descriptor.query {
        let normalized = value.trim().to_lowercase();
        if normalized.is_empty() {
            continue;
        }
        if key.eq_ignore_ascii_case("mime") {
            out.mimetype = Some(normalized);
        } else if key.eq_ignore_ascii_case("name") {
            out.name = Some(normalized);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> ParsedOverrides {
        extract_overrides(&Descriptor::parse(raw).unwrap())
    }

    #[test]
    fn extracts_both_directives() {
        let o = parse("attach://host/x?mime=image/jpeg&name=test.jpeg");
        assert_eq!(o.mimetype.as_deref(), Some("image/jpeg"));
        assert_eq!(o.name.as_deref(), Some("test.jpeg"));
    }

    #[test]
    fn absent_keys_leave_fields_unset() {
        let o = parse("attach://host/x?token=abc");
        assert!(o.mimetype.is_none());
        assert!(o.name.is_none());
    }

    #[test]
    fn keys_match_case_insensitively() {
        let o = parse("attach://host/x?MIME=image/gif&Name=anim.gif");
        assert_eq!(o.mimetype.as_deref(), Some("image/gif"));
        assert_eq!(o.name.as_deref(), Some("anim.gif"));
    }

    #[test]
    fn values_are_trimmed_and_lowercased() {
        // The name is lower-cased too; a surprising but deliberate
        // normalization that callers depend on.
        let o = parse("attach://host/x?mime=%20Image/JPEG%20&name=Report.PDF");
        assert_eq!(o.mimetype.as_deref(), Some("image/jpeg"));
        assert_eq!(o.name.as_deref(), Some("report.pdf"));
    }

    #[test]
    fn blank_values_are_ignored() {
        let o = parse("attach://host/x?mime=&name=%20%20");
        assert!(o.mimetype.is_none());
        assert!(o.name.is_none());
    }
}
