//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{load_config, validate_config, PipelineConfig};
use crate::engine::run_pipeline;
use crate::error::{Error, Result};
use crate::model::table_schema;
use crate::partition::PartitionSpec;
use crate::template::TemplateContext;
use crate::types::TableName;
use serde_json::{json, Value};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Run { input, output } => {
                self.run_pipeline(input.as_deref(), output.as_deref()).await
            }
            Commands::Validate => self.validate(),
            Commands::Tables => {
                self.output_message(&describe_tables());
                Ok(())
            }
        }
    }

    /// Template context: process environment snapshot plus `--var` pairs
    fn template_context(&self) -> Result<TemplateContext> {
        let mut ctx = TemplateContext::with_env(std::env::vars());
        for pair in &self.cli.vars {
            ctx.set_var_pair(pair)?;
        }
        Ok(ctx)
    }

    /// Load pipeline configuration
    fn load_config(&self) -> Result<PipelineConfig> {
        let path = self
            .cli
            .config
            .as_ref()
            .ok_or_else(|| Error::config("Config file not specified (use -c flag)"))?;
        load_config(path, &self.template_context()?)
    }

    async fn run_pipeline(&self, input: Option<&str>, output: Option<&str>) -> Result<()> {
        let mut config = self.load_config()?;
        if let Some(url) = input {
            config.input.url = url.to_string();
        }
        if let Some(url) = output {
            config.output.url = url.to_string();
        }
        validate_config(&config)?;

        let stats = run_pipeline(&config).await?;

        self.output_message(&json!({
            "type": "STATS",
            "stats": stats
        }));
        Ok(())
    }

    /// Validate pipeline configuration
    fn validate(&self) -> Result<()> {
        let config = self.load_config()?;

        self.output_message(&json!({
            "type": "LOG",
            "log": {
                "level": "INFO",
                "message": format!(
                    "Pipeline config is valid: {} -> {}",
                    config.input.url, config.output.url
                )
            }
        }));
        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Schema and partition columns of every output table
pub(crate) fn describe_tables() -> Value {
    let tables: Vec<Value> = TableName::ALL
        .iter()
        .map(|&name| {
            let columns: Vec<Value> = table_schema(name)
                .fields()
                .iter()
                .map(|f| {
                    json!({
                        "name": f.name(),
                        "type": f.data_type().to_string(),
                        "nullable": f.is_nullable()
                    })
                })
                .collect();
            json!({
                "name": name,
                "columns": columns,
                "partition_by": PartitionSpec::for_table(name).columns()
            })
        })
        .collect();

    json!({
        "type": "TABLES",
        "tables": tables
    })
}
