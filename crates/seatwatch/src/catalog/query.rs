//! OData query construction for catalog requests.
//!
//! The catalog's read surface is OData: every request is a resource path
//! plus `$filter`/`$expand`/`$orderby` options. Getting these strings
//! wrong does not fail loudly (the service just answers with an empty or
//! over-broad `value` array), so construction is centralized here and
//! covered by tests instead of being format!-ed at call sites.

use crate::catalog::error::CatalogError;
use crate::term::TermCode;
use url::Url;

/// One catalog request: a resource collection plus its query options,
/// assembled in the order the options are added.
#[derive(Debug, Clone)]
pub struct CatalogQuery {
    resource: &'static str,
    options: Vec<(&'static str, String)>,
}

impl CatalogQuery {
    /// Existence probe for a subject abbreviation (already upper-cased by
    /// the caller; the catalog compares exactly).
    pub fn subject(abbreviation: &str) -> Self {
        CatalogQuery {
            resource: "Subjects",
            options: vec![(
                "$filter",
                format!("Abbreviation eq {}", literal(abbreviation)),
            )],
        }
    }

    /// Every course of a subject, classes narrowed to the term (with
    /// sections and meetings expanded beneath), ordered by course number.
    /// Records for courses with no class in the term still come back; the
    /// caller filters on the expanded class list.
    pub fn courses_for_subject(term: &TermCode, subject: &str) -> Self {
        CatalogQuery {
            resource: "Courses",
            options: vec![
                ("$expand", class_expansion(term)),
                (
                    "$filter",
                    format!("Subject/Abbreviation eq {}", literal(subject)),
                ),
                ("$orderby", "Number asc".to_string()),
            ],
        }
    }

    /// The course records carrying an exact number within a subject and
    /// term. More than one record means the number is cross-listed.
    pub fn courses_by_number(term: &TermCode, subject: &str, number: &str) -> Self {
        CatalogQuery {
            resource: "Courses",
            options: vec![
                ("$expand", class_expansion(term)),
                (
                    "$filter",
                    format!(
                        "Subject/Abbreviation eq {} and Number eq {}",
                        literal(subject),
                        literal(number)
                    ),
                ),
            ],
        }
    }

    /// The assembled query string, before URL encoding.
    pub fn query_string(&self) -> String {
        self.options
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Builds the full request URL against a base endpoint. The base must
    /// end with `/` (the client normalizes this) or the resource segment
    /// would silently replace the endpoint's last path segment.
    pub fn into_url(self, base: &Url) -> Result<Url, CatalogError> {
        let mut url = base.join(self.resource)?;
        url.set_query(Some(&self.query_string()));
        Ok(url)
    }
}

/// Classes-in-term expansion shared by both course queries: filter the
/// expanded classes to the term, then expand sections and meetings beneath.
fn class_expansion(term: &TermCode) -> String {
    format!(
        "Classes($filter=Term/Code eq {};$expand=Sections($expand=Meetings))",
        literal(&term.code())
    )
}

/// Quotes a string literal for an OData filter. Embedded single quotes are
/// doubled per the protocol's escaping rule.
fn literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://api.purdue.io/odata/").unwrap()
    }

    fn term() -> TermCode {
        TermCode::parse("F21").unwrap()
    }

    #[test]
    fn test_subject_query_string() {
        let query = CatalogQuery::subject("CS");
        assert_eq!(query.query_string(), "$filter=Abbreviation eq 'CS'");
    }

    #[test]
    fn test_courses_for_subject_query_string() {
        let query = CatalogQuery::courses_for_subject(&term(), "CS");
        assert_eq!(
            query.query_string(),
            "$expand=Classes($filter=Term/Code eq '202110';\
             $expand=Sections($expand=Meetings))\
             &$filter=Subject/Abbreviation eq 'CS'\
             &$orderby=Number asc"
        );
    }

    #[test]
    fn test_courses_by_number_query_string() {
        let query = CatalogQuery::courses_by_number(&term(), "CS", "18000");
        let rendered = query.query_string();
        assert!(rendered.contains("$filter=Subject/Abbreviation eq 'CS' and Number eq '18000'"));
        assert!(rendered.contains("Term/Code eq '202110'"));
        assert!(!rendered.contains("$orderby"));
    }

    #[test]
    fn test_literal_escapes_embedded_quotes() {
        assert_eq!(literal("O'Brien"), "'O''Brien'");
        assert_eq!(literal("CS"), "'CS'");
    }

    #[test]
    fn test_into_url_joins_resource_and_encodes() {
        let url = CatalogQuery::subject("CS").into_url(&base()).unwrap();
        assert_eq!(url.path(), "/odata/Subjects");
        // Spaces and quotes are percent-encoded by the URL layer; the OData
        // tokens themselves pass through untouched.
        assert_eq!(
            url.query(),
            Some("$filter=Abbreviation%20eq%20%27CS%27")
        );
    }

    #[test]
    fn test_into_url_preserves_expansion_structure() {
        let url = CatalogQuery::courses_for_subject(&term(), "CS")
            .into_url(&base())
            .unwrap();
        let query = url.query().unwrap();
        assert!(query.contains("$expand=Classes($filter=Term/Code%20eq%20%27202110%27;"));
        assert!(query.contains("$orderby=Number%20asc"));
    }
}
