//! XML utility functions for navigating and extracting data from DOM trees.

use roxmltree::Node;

/// Get the tag name without namespace prefix.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use chemidplus_harvester::xml::get_tag_name;
///
/// let xml = r#"<file><Chemical displayName="Aspirin"/></file>"#;
/// let doc = Document::parse(xml).unwrap();
/// let chemical = doc.root_element().first_element_child().unwrap();
/// assert_eq!(get_tag_name(chemical), "Chemical");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Find all child elements with the given tag name.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use chemidplus_harvester::xml::find_children;
///
/// let xml = r#"<file><Chemical/><Note/><Chemical/></file>"#;
/// let doc = Document::parse(xml).unwrap();
///
/// let chemicals: Vec<_> = find_children(doc.root_element(), "Chemical").collect();
/// assert_eq!(chemicals.len(), 2);
/// ```
pub fn find_children<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |child| child.is_element() && get_tag_name(*child) == tag)
}

/// Find all descendant elements (any depth, excluding `node` itself) with the
/// given tag name, in document order.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use chemidplus_harvester::xml::find_descendants;
///
/// let xml = r#"<Chemical><NameList><Synonyms>A</Synonyms><Synonyms>B</Synonyms></NameList></Chemical>"#;
/// let doc = Document::parse(xml).unwrap();
///
/// let synonyms: Vec<_> = find_descendants(doc.root_element(), "Synonyms").collect();
/// assert_eq!(synonyms.len(), 2);
/// ```
pub fn find_descendants<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.descendants()
        .skip(1)
        .filter(move |child| child.is_element() && get_tag_name(*child) == tag)
}

/// Get the element's own leading text (before its first child element),
/// trimmed.
///
/// # Returns
/// Trimmed text, or `None` if the element has no leading text or it is blank
pub fn own_text<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.text().map(str::trim).filter(|s| !s.is_empty())
}

/// Collect the trimmed text of every descendant with the given tag.
///
/// Descendants without text are left out.
pub fn descendant_texts(node: Node<'_, '_>, tag: &str) -> Vec<String> {
    find_descendants(node, tag)
        .filter_map(own_text)
        .map(str::to_string)
        .collect()
}
