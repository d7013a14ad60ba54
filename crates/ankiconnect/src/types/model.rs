//! Note types, which AnkiConnect calls models.

use serde::{Deserialize, Serialize};

/// One entry of the `modelTemplates` answer, keyed there by template name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CardTemplate {
    pub front: String,
    pub back: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
struct TemplateBody {
    name: String,
    front: String,
    back: String,
}

/// Body of a `createModel` request.
///
/// ```
/// use ankiconnect::CreateModelParams;
///
/// let params = CreateModelParams::new("Vocabulary")
///     .field("Word")
///     .field("Meaning")
///     .template("Recognition", "{{Word}}", "{{FrontSide}}<hr id=answer>{{Meaning}}")
///     .css(".card { text-align: center; }");
///
/// assert_eq!(params.field_count(), 2);
/// assert_eq!(params.template_count(), 1);
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateModelParams {
    model_name: String,
    in_order_fields: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    css: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    is_cloze: bool,
    card_templates: Vec<TemplateBody>,
}

impl CreateModelParams {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            model_name: name.into(),
            in_order_fields: Vec::new(),
            css: None,
            is_cloze: false,
            card_templates: Vec::new(),
        }
    }

    /// Append a field; fields keep the order they are added in.
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.in_order_fields.push(name.into());
        self
    }

    /// Styling shared by all cards. Anki supplies a default when unset.
    pub fn css(mut self, css: impl Into<String>) -> Self {
        self.css = Some(css.into());
        self
    }

    pub fn cloze(mut self, is_cloze: bool) -> Self {
        self.is_cloze = is_cloze;
        self
    }

    pub fn template(
        mut self,
        name: impl Into<String>,
        front: impl Into<String>,
        back: impl Into<String>,
    ) -> Self {
        self.card_templates.push(TemplateBody {
            name: name.into(),
            front: front.into(),
            back: back.into(),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.model_name
    }

    pub fn field_count(&self) -> usize {
        self.in_order_fields.len()
    }

    pub fn template_count(&self) -> usize {
        self.card_templates.len()
    }
}

/// The `modelStyling` answer.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelStyling {
    pub css: String,
}

/// A card template of a [`NoteTypeSchema`], with its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedTemplate {
    /// Template name (e.g. "Card 1").
    pub name: String,
    /// Front template HTML.
    pub front: String,
    /// Back template HTML.
    pub back: String,
}

/// Snapshot of a note type's schema: fields in order, templates and styling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteTypeSchema {
    /// Note type name.
    pub name: String,
    /// Field names in declaration order.
    pub fields: Vec<String>,
    /// Card templates, ordered by name.
    pub templates: Vec<NamedTemplate>,
    /// Shared CSS of the note type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css: Option<String>,
}

impl NoteTypeSchema {
    /// Whether the note type looks like a cloze type.
    ///
    /// AnkiConnect does not expose the model kind through the actions used
    /// here, so this checks the templates for a `cloze:` replacement.
    pub fn is_cloze(&self) -> bool {
        self.templates
            .iter()
            .any(|t| t.front.contains("{{cloze:") || t.back.contains("{{cloze:"))
    }

    /// Copy of the schema without CSS.
    pub fn without_css(&self) -> Self {
        Self {
            css: None,
            ..self.clone()
        }
    }
}
