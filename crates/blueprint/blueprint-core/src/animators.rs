//! Animator Extractor: a flat view of text animators pulled out of an already
//! serialized `Text` subtree.

use blueprint_document_core::match_names;

use crate::schema::{AnimatorPropertyEntry, PropertyNodeJson, SelectorEntry, TextAnimator};

/// Display-name keys, used when a writer did not record match names.
pub const ANIMATORS_KEY: &str = "Animators";
pub const SELECTORS_KEY: &str = "Selectors";
pub const PROPERTIES_KEY: &str = "Properties";

/// Animators under `text`'s animators group. No such group means no
/// animators.
pub fn extract_text_animators(text: &PropertyNodeJson) -> Vec<TextAnimator> {
    let Some(animators) = find_group(text, match_names::TEXT_ANIMATORS, ANIMATORS_KEY) else {
        return Vec::new();
    };
    animators
        .children()
        .filter(|(_, node)| node.match_name == match_names::TEXT_ANIMATOR)
        .map(|(_, node)| animator_from(node))
        .collect()
}

/// Child of `node` by match name, then by its serialized key.
fn find_group<'a>(node: &'a PropertyNodeJson, match_name: &str, key: &str) -> Option<&'a PropertyNodeJson> {
    node.children()
        .map(|(_, child)| child)
        .find(|child| child.match_name == match_name)
        .or_else(|| node.child(key))
}

fn animator_from(node: &PropertyNodeJson) -> TextAnimator {
    let selectors = find_group(node, match_names::TEXT_SELECTORS, SELECTORS_KEY)
        .map(|group| {
            group
                .children()
                .map(|(_, sel)| SelectorEntry {
                    name: sel.name.clone(),
                    properties: sel.properties.clone(),
                })
                .collect()
        })
        .unwrap_or_default();
    let animator_properties = find_group(node, match_names::TEXT_ANIMATOR_PROPERTIES, PROPERTIES_KEY)
        .map(|group| {
            group
                .children()
                .map(|(_, prop)| AnimatorPropertyEntry {
                    property: prop.name.clone(),
                    value_data: prop.clone(),
                })
                .collect()
        })
        .unwrap_or_default();
    TextAnimator {
        name: node.name.clone(),
        selectors,
        animator_properties,
    }
}
