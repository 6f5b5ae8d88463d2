use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::entities::release_config::ReleaseConfig;
use crate::presentation::cli::context::CommandContext;
use crate::presentation::cli::OutputFormat;

/// Locations command arguments
#[derive(Debug, Clone, Args)]
pub struct LocationsArgs {
    /// Output format (text, json, yaml)
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Upload locations known to the configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationList {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    pub aliases: BTreeMap<String, Vec<String>>,
    pub indexes: Vec<String>,
}

impl LocationList {
    pub fn from_config(config: &ReleaseConfig) -> Self {
        Self {
            default: config.defaults.dist_location.clone(),
            aliases: config.aliases.clone(),
            indexes: config.index_servers.clone(),
        }
    }
}

/// Handler for the locations command
pub struct LocationsCommand {
    args: LocationsArgs,
}

impl LocationsCommand {
    pub fn new(args: LocationsArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, context: &CommandContext) -> Result<()> {
        let list = LocationList::from_config(&context.config);

        match self.args.output.serialize(&list)? {
            Some(rendered) => println!("{}", rendered.trim_end()),
            None => {
                let display = &context.display;
                display.key_value("Default", list.default.as_deref().unwrap_or("(none)"));
                if list.aliases.is_empty() {
                    display.info("No aliases configured");
                }
                for (alias, locations) in &list.aliases {
                    display.key_value(alias, &locations.join(", "));
                }
                display.key_value("Indexes", &list.indexes.join(", "));
            }
        }
        Ok(())
    }
}
