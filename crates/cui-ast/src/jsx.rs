use tree_sitter::Node;

use crate::edit::SourceEdit;
use crate::source::SourceFile;
use crate::visit::{self, compact_text, named_children};

/// A JSX element with a tag name. Fragments (`<>...</>`) are not included.
#[derive(Debug, Clone, Copy)]
pub struct JsxElement<'a> {
    /// The opening or self-closing element.
    pub opening: Node<'a>,
    /// Tag name in the opening element.
    pub name: Node<'a>,
    /// Tag name in the matching closing element, if there is one.
    pub closing_name: Option<Node<'a>>,
}

impl<'a> JsxElement<'a> {
    /// Tag name with whitespace removed (`Card.Header`).
    pub fn tag(&self, file: &SourceFile) -> String {
        compact_text(self.name, file.text())
    }

    /// First segment of the tag name (`Card` for `Card.Header`).
    pub fn base_name(&self, file: &SourceFile) -> String {
        let tag = self.tag(file);
        match tag.split_once('.') {
            Some((base, _)) => base.to_string(),
            None => tag,
        }
    }

    pub fn is_self_closing(&self) -> bool {
        self.opening.kind() == "jsx_self_closing_element"
    }
}

/// A `name` or `name={value}` attribute. Spread attributes are not included.
#[derive(Debug, Clone, Copy)]
pub struct JsxAttribute<'a> {
    pub node: Node<'a>,
    pub name: Node<'a>,
    pub value: Option<Node<'a>>,
}

impl<'a> JsxAttribute<'a> {
    pub fn name<'s>(&self, file: &'s SourceFile) -> &'s str {
        file.node_text(self.name)
    }
}

/// Every named JSX element in document order.
pub fn jsx_elements(file: &SourceFile) -> Vec<JsxElement<'_>> {
    let Some(root) = file.root() else {
        return Vec::new();
    };
    visit::collect_kinds(root, &["jsx_opening_element", "jsx_self_closing_element"])
        .into_iter()
        .filter_map(|opening| {
            let name = opening.child_by_field_name("name")?;
            let closing_name = if opening.kind() == "jsx_opening_element" {
                opening
                    .parent()
                    .and_then(|element| {
                        named_children(element)
                            .into_iter()
                            .rfind(|c| c.kind() == "jsx_closing_element")
                    })
                    .and_then(|closing| closing.child_by_field_name("name"))
            } else {
                None
            };
            Some(JsxElement {
                opening,
                name,
                closing_name,
            })
        })
        .collect()
}

/// Elements whose tag is exactly `tag` (`Button`, `Card.Header`).
pub fn find_jsx_elements<'a>(file: &'a SourceFile, tag: &str) -> Vec<JsxElement<'a>> {
    jsx_elements(file)
        .into_iter()
        .filter(|element| element.tag(file) == tag)
        .collect()
}

/// Plain attributes of an element, in source order.
pub fn jsx_attributes<'a>(element: &JsxElement<'a>) -> Vec<JsxAttribute<'a>> {
    named_children(element.opening)
        .into_iter()
        .filter(|node| node.kind() == "jsx_attribute")
        .filter_map(|node| {
            let mut parts = named_children(node).into_iter();
            let name = parts.next()?;
            Some(JsxAttribute {
                node,
                name,
                value: parts.next(),
            })
        })
        .collect()
}

/// Edits renaming attribute `from` to `to` on every `<tag>` element.
///
/// Only the name token is replaced; whatever follows the `=` is untouched.
pub fn rename_jsx_attribute(file: &SourceFile, tag: &str, from: &str, to: &str) -> Vec<SourceEdit> {
    find_jsx_elements(file, tag)
        .iter()
        .flat_map(jsx_attributes)
        .filter(|attr| attr.name(file) == from)
        .map(|attr| SourceEdit::replace_node(attr.name, to))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_jsx_elements() -> anyhow::Result<()> {
        let file = SourceFile::parse(
            "a.jsx",
            r#"const A = () => (
  <Card>
    <Card.Header>Title</Card.Header>
    <Button variant="primary" {...rest} />
    <>fragment</>
  </Card>
);"#,
        )?;
        let tags: Vec<_> = jsx_elements(&file).iter().map(|e| e.tag(&file)).collect();
        assert_eq!(tags, ["Card", "Card.Header", "Button"]);

        let headers = find_jsx_elements(&file, "Card.Header");
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[0].base_name(&file), "Card");
        let closing = headers[0].closing_name.unwrap();
        assert_eq!(file.node_text(closing), "Card.Header");

        let buttons = find_jsx_elements(&file, "Button");
        assert!(buttons[0].is_self_closing());
        let attrs = jsx_attributes(&buttons[0]);
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].name(&file), "variant");
        assert_eq!(file.node_text(attrs[0].value.unwrap()), "\"primary\"");
        Ok(())
    }

    #[test]
    fn test_rename_attribute_preserves_values() -> anyhow::Result<()> {
        let source = r#"const a = <Input deepRef={ref} />;
const b = <Input deepRef="literal" label="x" />;
const c = <Input deepRef=<Ref /> />;
const d = <Input deepRef />;
const e = <TextArea deepRef={ref} />;
"#;
        let file = SourceFile::parse("a.jsx", source)?;
        let edits = rename_jsx_attribute(&file, "Input", "deepRef", "ref");
        assert_eq!(edits.len(), 4);
        let updated = file.apply(edits)?.unwrap();
        insta::assert_snapshot!(updated, @r#"
        const a = <Input ref={ref} />;
        const b = <Input ref="literal" label="x" />;
        const c = <Input ref=<Ref /> />;
        const d = <Input ref />;
        const e = <TextArea deepRef={ref} />;
        "#);
        Ok(())
    }

    #[test]
    fn test_no_jsx_is_empty() -> anyhow::Result<()> {
        let file = SourceFile::parse("a.ts", "export const x: number = 1;")?;
        assert!(jsx_elements(&file).is_empty());
        assert!(rename_jsx_attribute(&file, "Input", "deepRef", "ref").is_empty());
        Ok(())
    }
}
