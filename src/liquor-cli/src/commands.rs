//! Subcommand execution
//!
//! Each command returns the text to print so it can be tested without
//! capturing stdout.

use anyhow::{bail, Context as _, Result};
use std::fs;
use std::path::Path;

use liquor::{
    create_filter_registry, evaluate_markup, operator_names, parse_condition, Config, Object,
    RenderContext, Value,
};

use crate::cli::{Cli, Commands, VariableArgs};

/// Merge the configuration sources and the global flags
pub fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => match Config::find_config_file(None) {
            Some(path) => Config::from_file(&path)?,
            None => Config::default(),
        },
    };
    config.apply_env()?;
    if let Some(naming) = cli.naming {
        config.naming_convention = naming;
    }
    if let Some(syntax) = cli.syntax {
        config.syntax_compatibility = syntax;
    }
    log::debug!(
        "naming convention {}, syntax {}",
        config.naming_convention,
        config.syntax_compatibility
    );
    Ok(config)
}

/// Run a parsed command line and return its output
pub fn execute(cli: &Cli, config: &Config) -> Result<String> {
    match &cli.command {
        Commands::Condition { markup, variables } => {
            let ctx = build_context(config, variables)?;
            Ok(evaluate_markup(markup, &ctx)?.to_string())
        }
        Commands::Filter {
            name,
            input,
            args,
            named,
            variables,
        } => {
            let ctx = build_context(config, variables)?;
            let mut positional = vec![parse_json_value(input)];
            positional.extend(args.iter().map(|arg| parse_json_value(arg)));
            let named: Object = named
                .iter()
                .map(|(key, raw)| (key.clone(), parse_json_value(raw)))
                .collect();

            let filters = create_filter_registry(&ctx);
            let result = filters.invoke(name, positional, &named)?;
            Ok(serde_json::to_string(&result.to_json())?)
        }
        Commands::Parse { markup } => {
            let parsed = parse_condition(markup).map_err(|e| e.into_error(markup))?;
            Ok(serde_json::to_string_pretty(&parsed)?)
        }
        Commands::Operators => Ok(operator_names().join("\n")),
        Commands::Filters => {
            let ctx = config.new_context();
            Ok(create_filter_registry(&ctx).filter_names().join("\n"))
        }
    }
}

fn build_context(config: &Config, variables: &VariableArgs) -> Result<RenderContext> {
    let mut ctx = config.new_context();
    if let Some(path) = &variables.vars_file {
        for (name, value) in read_vars_file(path)? {
            ctx.set_global(name, value);
        }
    }
    for (name, raw) in &variables.vars {
        ctx.set_global(name.clone(), parse_json_value(raw));
    }
    Ok(ctx)
}

fn read_vars_file(path: &Path) -> Result<Object> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read variables file {}", path.display()))?;
    let json: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;
    match Value::from_json(json) {
        Value::Object(map) => Ok(map),
        other => bail!(
            "Variables file {} must hold a JSON object, found {}",
            path.display(),
            other.type_name()
        ),
    }
}

/// Parse a command-line value as JSON, falling back to a plain string
pub fn parse_json_value(raw: &str) -> Value {
    match serde_json::from_str(raw) {
        Ok(json) => Value::from_json(json),
        Err(_) => Value::string(raw),
    }
}
