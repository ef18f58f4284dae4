//! MathML case fixes.

use crate::tokenizer::Attribute;

/// [§ 13.2.6.3 Adjust MathML attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-mathml-attributes)
///
/// "If the token has an attribute named definitionurl, change its name to
/// definitionURL (note the case difference)."
pub fn adjust_mathml_attributes(attributes: &mut [Attribute]) {
    for attr in attributes.iter_mut().filter(|attr| attr.name == "definitionurl") {
        attr.name = "definitionURL".to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_url() {
        let mut attrs = vec![Attribute::new("definitionurl", "x")];
        adjust_mathml_attributes(&mut attrs);
        assert_eq!(attrs[0].name, "definitionURL");
    }
}
