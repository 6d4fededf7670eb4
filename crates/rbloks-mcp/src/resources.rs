// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Static markdown documentation served as MCP resources in every mode.

use rmcp::model::{
    AnnotateAble, RawResource, ReadResourceResult, Resource, ResourceContents,
};
use rmcp::ErrorData as McpError;

const URI_PREFIX: &str = "rationalbloks://docs/";
const MIME_MARKDOWN: &str = "text/markdown";

/// (slug, body) of every document, in listing order.
const DOCS: &[(&str, &str)] = &[
    ("getting-started", include_str!("../docs/getting-started.md")),
    ("schema-reference", include_str!("../docs/schema-reference.md")),
    ("api-reference", include_str!("../docs/api-reference.md")),
];

/// "schema-reference" -> "Schema Reference"
fn title(slug: &str) -> String {
    slug.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn list() -> Vec<Resource> {
    DOCS.iter()
        .map(|(slug, _)| {
            let title = title(slug);
            let mut raw = RawResource::new(format!("{URI_PREFIX}{slug}"), format!("{title} Guide"));
            raw.description = Some(format!("Documentation: {title}"));
            raw.mime_type = Some(MIME_MARKDOWN.to_string());
            raw.no_annotation()
        })
        .collect()
}

pub fn read(uri: &str) -> Result<ReadResourceResult, McpError> {
    let body = uri
        .strip_prefix(URI_PREFIX)
        .and_then(|slug| DOCS.iter().find(|(s, _)| *s == slug))
        .map(|(_, body)| *body)
        .ok_or_else(|| McpError::resource_not_found(format!("Unknown resource: {uri}"), None))?;

    Ok(ReadResourceResult {
        contents: vec![ResourceContents::TextResourceContents {
            uri: uri.to_string(),
            mime_type: Some(MIME_MARKDOWN.to_string()),
            text: body.to_string(),
            meta: None,
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_are_capitalized_words() {
        assert_eq!(title("getting-started"), "Getting Started");
        assert_eq!(title("api-reference"), "Api Reference");
    }

    #[test]
    fn lists_three_markdown_guides() {
        let resources = list();
        assert_eq!(resources.len(), 3);
        assert_eq!(resources[0].uri, "rationalbloks://docs/getting-started");
        assert_eq!(resources[0].name, "Getting Started Guide");
        assert_eq!(
            resources[1].description.as_deref(),
            Some("Documentation: Schema Reference")
        );
        assert!(resources
            .iter()
            .all(|r| r.mime_type.as_deref() == Some("text/markdown")));
    }

    #[test]
    fn reads_known_document() {
        let result = read("rationalbloks://docs/schema-reference").unwrap();
        match &result.contents[0] {
            ResourceContents::TextResourceContents { text, mime_type, .. } => {
                assert!(text.starts_with("# RationalBloks Schema Reference"));
                assert_eq!(mime_type.as_deref(), Some("text/markdown"));
            }
            _ => panic!("expected text contents"),
        }
    }

    #[test]
    fn unknown_uri_is_not_found() {
        let err = read("rationalbloks://docs/nope").unwrap_err();
        assert_eq!(err.message, "Unknown resource: rationalbloks://docs/nope");
        assert!(read("file:///etc/passwd").is_err());
    }
}
