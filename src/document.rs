// src/document.rs
use html5ever::tendril::StrTendril;
use html5ever::{LocalName, Namespace, QualName};
use scraper::node::{Element, Text};
use scraper::{ElementRef, Html, Node};

use crate::error::{Result, ViewsError};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// The index document being prepared for one request.
pub struct IndexHtmlResponse {
    document: Html,
}

impl IndexHtmlResponse {
    pub fn parse(html: &str) -> Self {
        IndexHtmlResponse {
            document: Html::parse_document(html),
        }
    }

    /// Appends `<script>{script}</script>` as the last child of `<head>`.
    pub fn append_script_to_head(&mut self, script: &str) -> Result<()> {
        let head_id = self.head().ok_or(ViewsError::MissingHead)?.id();
        let mut head = self
            .document
            .tree
            .get_mut(head_id)
            .ok_or(ViewsError::MissingHead)?;

        let name = QualName::new(
            None,
            Namespace::from(HTML_NAMESPACE),
            LocalName::from("script"),
        );
        let mut script_node = head.append(Node::Element(Element::new(name, Vec::new())));
        script_node.append(Node::Text(Text {
            text: StrTendril::from_slice(script),
        }));
        Ok(())
    }

    fn head(&self) -> Option<ElementRef<'_>> {
        self.document
            .root_element()
            .children()
            .filter_map(ElementRef::wrap)
            .find(|element| element.value().name() == "head")
    }

    /// Text content of every `<script>` element directly inside `<head>`, in
    /// document order.
    pub fn head_scripts(&self) -> Vec<String> {
        let Some(head) = self.head() else {
            return Vec::new();
        };
        head.children()
            .filter_map(ElementRef::wrap)
            .filter(|element| element.value().name() == "script")
            .map(|script| script.text().collect::<String>())
            .collect()
    }

    pub fn to_html(&self) -> String {
        self.document.html()
    }
}
