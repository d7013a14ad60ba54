//! Note type actions.
//!
//! ```no_run
//! use ankiconnect::AnkiClient;
//!
//! # async fn example() -> ankiconnect::Result<()> {
//! let client = AnkiClient::new();
//!
//! for name in client.models().names().await? {
//!     let schema = client.models().schema(&name).await?;
//!     println!("{}: {:?} (cloze: {})", name, schema.fields, schema.is_cloze());
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

use crate::client::AnkiClient;
use crate::error::Result;
use crate::types::{CardTemplate, CreateModelParams, ModelStyling, NamedTemplate, NoteTypeSchema};

/// Note type operations, obtained via [`AnkiClient::models()`].
#[derive(Debug)]
pub struct ModelActions<'a> {
    pub(crate) client: &'a AnkiClient,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ModelNameParams<'a> {
    model_name: &'a str,
}

impl<'a> ModelActions<'a> {
    pub async fn names(&self) -> Result<Vec<String>> {
        self.client.invoke_without_params("modelNames").await
    }

    /// Field names in the order the note type declares them.
    pub async fn field_names(&self, model_name: &str) -> Result<Vec<String>> {
        self.client
            .invoke("modelFieldNames", ModelNameParams { model_name })
            .await
    }

    /// Card templates keyed by template name.
    pub async fn templates(&self, model_name: &str) -> Result<BTreeMap<String, CardTemplate>> {
        self.client
            .invoke("modelTemplates", ModelNameParams { model_name })
            .await
    }

    pub async fn styling(&self, model_name: &str) -> Result<ModelStyling> {
        self.client
            .invoke("modelStyling", ModelNameParams { model_name })
            .await
    }

    /// Fields, templates and CSS of a note type, gathered with three calls.
    ///
    /// Templates come out ordered by name.
    pub async fn schema(&self, model_name: &str) -> Result<NoteTypeSchema> {
        let fields = self.field_names(model_name).await?;
        let templates = self
            .templates(model_name)
            .await?
            .into_iter()
            .map(|(name, template)| NamedTemplate {
                name,
                front: template.front,
                back: template.back,
            })
            .collect();
        let styling = self.styling(model_name).await?;

        Ok(NoteTypeSchema {
            name: model_name.to_string(),
            fields,
            templates,
            css: Some(styling.css),
        })
    }

    /// Create a note type. AnkiConnect answers with the stored model as JSON.
    pub async fn create(&self, params: CreateModelParams) -> Result<serde_json::Value> {
        self.client.invoke("createModel", params).await
    }
}
