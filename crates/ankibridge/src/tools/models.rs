//! Note type (model) tools.

use ankiconnect::CreateModelParams;
use rmcp::ErrorData as McpError;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{debug, info};

use super::{ToolHandler, Validate, json_result, require, text_result};
use crate::error::{anki_error, invalid_params};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetNoteTypeInfoParams {
    /// Note type (model) name
    pub model_name: String,
    /// Include the note type's CSS (default true)
    #[serde(default = "default_true")]
    pub include_css: bool,
}

impl Validate for GetNoteTypeInfoParams {
    fn validate(&self) -> Result<(), String> {
        require("model_name", &self.model_name)
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct TemplateParams {
    /// Template name (e.g. "Card 1")
    pub name: String,
    /// Front (question) template HTML, e.g. "{{Front}}"
    pub front: String,
    /// Back (answer) template HTML, e.g. "{{FrontSide}}<hr id=answer>{{Back}}"
    pub back: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateNoteTypeParams {
    /// Name of the new note type
    pub name: String,
    /// Field names in order
    pub fields: Vec<String>,
    /// Card templates (at least one)
    pub templates: Vec<TemplateParams>,
    /// Optional CSS shared by all cards
    #[serde(default)]
    pub css: Option<String>,
    /// Create a cloze note type
    #[serde(default)]
    pub is_cloze: bool,
}

impl Validate for CreateNoteTypeParams {
    fn validate(&self) -> Result<(), String> {
        require("name", &self.name)?;
        if self.fields.is_empty() {
            return Err("'fields' must contain at least one field".to_string());
        }
        for (i, field) in self.fields.iter().enumerate() {
            require("fields", field)?;
            if self.fields[..i].contains(field) {
                return Err(format!("duplicate field '{}'", field));
            }
        }
        if self.templates.is_empty() {
            return Err("'templates' must contain at least one template".to_string());
        }
        for template in &self.templates {
            require("templates.name", &template.name)?;
            require("templates.front", &template.front)?;
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

impl ToolHandler {
    pub(super) async fn list_note_types(&self) -> Result<CallToolResult, McpError> {
        let models = self.client.models().names().await.map_err(anki_error)?;

        debug!(count = models.len(), "Listed note types");
        json_result(&models)
    }

    pub(super) async fn get_note_type_info(
        &self,
        params: GetNoteTypeInfoParams,
    ) -> Result<CallToolResult, McpError> {
        debug!(model = %params.model_name, "Getting note type info");

        let Some(schema) = self.resources.find_schema(&params.model_name).await? else {
            return Err(invalid_params(format!(
                "Note type '{}' not found",
                params.model_name
            )));
        };

        if params.include_css {
            json_result(schema.as_ref())
        } else {
            json_result(&schema.without_css())
        }
    }

    pub(super) async fn create_note_type(
        &self,
        params: CreateNoteTypeParams,
    ) -> Result<CallToolResult, McpError> {
        debug!(name = %params.name, fields = params.fields.len(), "Creating note type");

        let mut model = CreateModelParams::new(&params.name).cloze(params.is_cloze);
        for field in params.fields {
            model = model.field(field);
        }
        for template in params.templates {
            model = model.template(template.name, template.front, template.back);
        }
        if let Some(css) = params.css {
            model = model.css(css);
        }

        let summary = format!(
            "Created note type '{}' with {} fields and {} templates",
            model.name(),
            model.field_count(),
            model.template_count()
        );

        self.client
            .models()
            .create(model)
            .await
            .map_err(anki_error)?;
        self.resources.cache().invalidate_model(&params.name);

        info!(name = %params.name, "Note type created");
        Ok(text_result(summary))
    }
}
