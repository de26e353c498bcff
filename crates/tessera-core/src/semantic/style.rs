//! Style classes declared with `classDef`.

use serde::Serialize;

/// A named set of CSS-like declarations.
///
/// Text styles are derived from the declarations: any declaration that
/// mentions `color` is mirrored with its first `fill` renamed to `bgFill` and
/// then its first `color` renamed to `fill`, so the renderer can paint label
/// text with it.
///
/// ```
/// use tessera_core::semantic::StyleClass;
///
/// let mut class = StyleClass::new("warn");
/// class.push_declaration("fill:#f96");
/// class.push_declaration("color:#fff");
///
/// assert_eq!(class.styles(), ["fill:#f96", "color:#fff"]);
/// assert_eq!(class.text_styles(), ["fill:#fff"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleClass {
    id: String,
    styles: Vec<String>,
    text_styles: Vec<String>,
}

impl StyleClass {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            styles: Vec::new(),
            text_styles: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn styles(&self) -> &[String] {
        &self.styles
    }

    pub fn text_styles(&self) -> &[String] {
        &self.text_styles
    }

    /// Appends one declaration, deriving its text style when it sets a color.
    pub fn push_declaration(&mut self, declaration: impl Into<String>) {
        let declaration = declaration.into();
        if declaration.contains("color") {
            let text_style = declaration
                .replacen("fill", "bgFill", 1)
                .replacen("color", "fill", 1);
            self.text_styles.push(text_style);
        }
        self.styles.push(declaration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_is_renamed_before_color() {
        let mut class = StyleClass::new("c");
        class.push_declaration("fill-color:red");
        assert_eq!(class.text_styles(), ["bgFill-fill:red"]);
    }

    #[test]
    fn test_only_first_occurrences_are_renamed() {
        let mut class = StyleClass::new("c");
        class.push_declaration("fill-color:fillcolor");
        class.push_declaration("color:colorful");
        assert_eq!(
            class.text_styles(),
            ["bgFill-fill:fillcolor", "fill:colorful"]
        );
    }

    #[test]
    fn test_non_color_declarations_have_no_text_style() {
        let mut class = StyleClass::new("c");
        class.push_declaration("stroke-width:4px");
        assert!(class.text_styles().is_empty());
        assert_eq!(class.styles().len(), 1);
    }
}
