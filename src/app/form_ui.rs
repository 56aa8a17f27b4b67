use anyhow::{Context, Result};
use serde_json::Value;

use crate::{
    domain::{FormDefinition, parse_form_definition},
    form::FormState,
    io::{
        DocumentFormat,
        input::parse_document_str,
        output::{self, OutputOptions},
    },
};

use super::{options::UiOptions, runtime::App};

/// Entry point: a form definition in, the saved values out.
#[derive(Debug)]
pub struct FormUI {
    definition: Value,
    title: Option<String>,
    options: UiOptions,
    output: Option<OutputOptions>,
}

impl FormUI {
    pub fn new(definition: Value) -> Self {
        Self {
            definition,
            title: None,
            options: UiOptions::default(),
            output: None,
        }
    }

    pub fn from_document(contents: &str, format: DocumentFormat) -> Result<Self> {
        let definition = parse_document_str(contents, format)?;
        Ok(Self::new(definition))
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_options(mut self, options: UiOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_output(mut self, output: OutputOptions) -> Self {
        self.output = Some(output);
        self
    }

    pub fn definition(&self) -> Result<FormDefinition> {
        parse_form_definition(&self.definition).context("invalid form definition")
    }

    /// Build the form without touching the terminal.
    pub fn build_state(&self) -> Result<FormState> {
        let mut definition = self.definition()?;
        if let Some(title) = &self.title {
            definition.title = Some(title.clone());
        }
        FormState::from_definition(
            &definition,
            self.options.palette(),
            self.options.positioner(),
            self.options.today(),
        )
    }

    pub fn run(self) -> Result<Value> {
        let state = self.build_state()?;
        tracing::debug!(fields = state.controls().len(), "starting form");
        let mut app = App::new(state, self.options);
        let value = app.run()?;
        if let Some(options) = &self.output {
            output::emit(&value, options)?;
        }
        Ok(value)
    }
}
