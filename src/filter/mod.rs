//! Free-text filtering of the rendered documentation.
//!
//! The DOM layer collects the searchable text of every tag group, operation
//! and documentation section, asks for a `FilterPlan`, and applies it as
//! inline `display` styles. Models are never filtered.

/// Searchable text of one operation block.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OperationText {
    pub summary: String,
    pub path: String,
    pub method: String,
    pub description: String,
}

impl OperationText {
    fn matches(&self, query: &str) -> bool {
        [&self.summary, &self.path, &self.method, &self.description]
            .iter()
            .any(|field| field.to_lowercase().contains(query))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TagGroupText {
    pub name: String,
    pub operations: Vec<OperationText>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DocSectionText {
    pub text: String,
    pub headings: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TagVisibility {
    pub visible: bool,
    pub operations: Vec<bool>,
}

/// Visibility of every filterable block, parallel to the inputs.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterPlan {
    pub tags: Vec<TagVisibility>,
    pub docs: Vec<bool>,
}

/// First visible block after filtering, used as the scroll destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FirstVisible {
    Tag(usize),
    Operation { tag: usize, operation: usize },
}

pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn plan(query: &str, tags: &[TagGroupText], docs: &[DocSectionText]) -> FilterPlan {
    let query = normalize_query(query);

    let tags = tags
        .iter()
        .map(|tag| {
            let tag_matches = query.is_empty() || tag.name.to_lowercase().contains(&query);
            let operations: Vec<bool> = tag
                .operations
                .iter()
                .map(|op| tag_matches || op.matches(&query))
                .collect();
            TagVisibility {
                visible: tag_matches || operations.iter().any(|v| *v),
                operations,
            }
        })
        .collect();

    let docs = docs
        .iter()
        .map(|doc| {
            query.is_empty()
                || doc.text.to_lowercase().contains(&query)
                || doc.headings.iter().any(|h| h.to_lowercase().contains(&query))
        })
        .collect();

    FilterPlan { tags, docs }
}

impl FilterPlan {
    pub fn is_everything_visible(&self) -> bool {
        self.tags
            .iter()
            .all(|t| t.visible && t.operations.iter().all(|v| *v))
            && self.docs.iter().all(|v| *v)
    }

    /// A visible tag group wins over a lone visible operation.
    pub fn first_visible(&self) -> Option<FirstVisible> {
        if let Some(tag) = self.tags.iter().position(|t| t.visible) {
            return Some(FirstVisible::Tag(tag));
        }
        self.tags.iter().enumerate().find_map(|(tag, t)| {
            t.operations
                .iter()
                .position(|v| *v)
                .map(|operation| FirstVisible::Operation { tag, operation })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(summary: &str, path: &str, method: &str) -> OperationText {
        OperationText {
            summary: summary.to_string(),
            path: path.to_string(),
            method: method.to_string(),
            description: String::new(),
        }
    }

    fn fixture() -> (Vec<TagGroupText>, Vec<DocSectionText>) {
        let tags = vec![
            TagGroupText {
                name: "Articles".to_string(),
                operations: vec![
                    op("List articles", "/v2/articles", "GET"),
                    op("Create an article", "/v2/articles", "POST"),
                ],
            },
            TagGroupText {
                name: "Collections".to_string(),
                operations: vec![
                    op("List collections", "/v2/collections", "GET"),
                    OperationText {
                        description: "Adds published articles to a collection".to_string(),
                        ..op("Add articles", "/v2/collections/{id}/articles", "POST")
                    },
                ],
            },
        ];
        let docs = vec![
            DocSectionText {
                text: "Authentication uses personal tokens".to_string(),
                headings: vec!["Authentication".to_string()],
            },
            DocSectionText {
                text: "Rate limits apply per user".to_string(),
                headings: vec!["Rate limiting".to_string()],
            },
        ];
        (tags, docs)
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  Upload FILES \n"), "upload files");
    }

    #[test]
    fn test_empty_query_shows_everything() {
        let (tags, docs) = fixture();
        let p = plan("   ", &tags, &docs);
        assert!(p.is_everything_visible());
        assert_eq!(p.first_visible(), Some(FirstVisible::Tag(0)));
    }

    #[test]
    fn test_tag_name_match_shows_all_its_operations() {
        let (tags, docs) = fixture();
        let p = plan("collections", &tags, &docs);
        assert_eq!(p.tags[1].operations, vec![true, true]);
        assert!(p.tags[1].visible);
        assert!(!p.tags[0].visible);
        assert_eq!(p.docs, vec![false, false]);
        assert_eq!(p.first_visible(), Some(FirstVisible::Tag(1)));
    }

    #[test]
    fn test_operation_match_keeps_only_matching_operations() {
        let (tags, docs) = fixture();
        let p = plan("POST", &tags, &docs);
        assert_eq!(p.tags[0].operations, vec![false, true]);
        assert_eq!(p.tags[1].operations, vec![false, true]);
        assert!(p.tags.iter().all(|t| t.visible));
    }

    #[test]
    fn test_description_is_searched() {
        let (tags, docs) = fixture();
        let p = plan("published", &tags, &docs);
        assert!(!p.tags[0].visible);
        assert_eq!(p.tags[1].operations, vec![false, true]);
    }

    #[test]
    fn test_doc_sections_match_text_or_headings() {
        let (tags, docs) = fixture();
        let p = plan("rate limiting", &tags, &docs);
        assert_eq!(p.docs, vec![false, true]);
        assert_eq!(p.first_visible(), None);
    }

    #[test]
    fn test_first_visible_falls_back_to_operation() {
        let p = FilterPlan {
            tags: vec![TagVisibility {
                visible: false,
                operations: vec![false, true],
            }],
            docs: vec![],
        };
        assert_eq!(
            p.first_visible(),
            Some(FirstVisible::Operation { tag: 0, operation: 1 })
        );
    }
}
