use super::resolve_config_path;
use crate::output::{Output, OutputFormat};
use crate::ConfigCommands;
use catalog_config::Config;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::PathBuf;

pub fn run_config(cmd: ConfigCommands, explicit: Option<PathBuf>, output: &Output) -> Result<()> {
    let path = resolve_config_path(explicit.as_ref());

    match cmd {
        ConfigCommands::Show { full } => show_config(&path, full, output),
        ConfigCommands::Init {
            base_url,
            token,
            fallback_hosts,
            force,
        } => init_config(&path, base_url, token, fallback_hosts, force, output),
        ConfigCommands::Path => {
            match output.format() {
                OutputFormat::Human => println!("{}", path.display()),
                _ => output.json(&json!({ "type": "config_path", "path": path.display().to_string() })),
            }
            Ok(())
        }
    }
}

fn show_config(path: &PathBuf, full: bool, output: &Output) -> Result<()> {
    if !path.exists() {
        output.warn(format!("Configuration file not found at: {}", path.display()));
        output.info("Create one with 'cinebrowse config init --base-url <URL> --token <TOKEN>'.");
        return Ok(());
    }

    let config = Config::load_from_file(path)
        .map_err(|e| eyre!("Failed to load config from {}: {}", path.display(), e))?;
    let token = if full { config.api.token.clone() } else { mask_string(&config.api.token) };

    if !output.is_human() {
        output.json(&json!({
            "type": "config",
            "path": path.display().to_string(),
            "valid": config.is_configured(),
            "api": {
                "base_url": config.api.base_url,
                "fallback_hosts": config.api.fallback_hosts,
                "token": token,
                "connect_timeout_secs": config.api.connect_timeout_secs,
                "request_timeout_secs": config.api.request_timeout_secs,
            },
            "browse": config.browse,
            "search": config.search,
        }));
        return Ok(());
    }
    if output.is_quiet() {
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(vec![
        Cell::new("Setting").fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new("Value").fg(Color::Cyan).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![Cell::new("Config File"), Cell::new(path.display())]);
    table.add_row(vec![Cell::new("Base URL"), Cell::new(&config.api.base_url)]);
    let fallbacks = if config.api.fallback_hosts.is_empty() {
        "<none>".to_string()
    } else {
        config.api.fallback_hosts.join("\n")
    };
    table.add_row(vec![Cell::new("Fallback Hosts"), Cell::new(fallbacks)]);
    table.add_row(vec![Cell::new("Token"), Cell::new(token)]);
    table.add_row(vec![
        Cell::new("Timeouts"),
        Cell::new(format!(
            "connect {}s, request {}s",
            config.api.connect_timeout_secs, config.api.request_timeout_secs
        )),
    ]);
    table.add_row(vec![
        Cell::new("English Only"),
        Cell::new(if config.browse.english_only { "✓".green().to_string() } else { "✗".red().to_string() }),
    ]);
    table.add_row(vec![Cell::new("Default Order"), Cell::new(config.browse.default_order.as_path_segment())]);
    table.add_row(vec![Cell::new("Search Debounce"), Cell::new(format!("{} ms", config.search.debounce_ms))]);
    println!("{}", table);

    if let Err(e) = config.validate() {
        output.warn(format!("Configuration is incomplete: {}", e));
    }
    Ok(())
}

fn init_config(
    path: &PathBuf,
    base_url: String,
    token: String,
    fallback_hosts: Vec<String>,
    force: bool,
    output: &Output,
) -> Result<()> {
    if path.exists() && !force {
        return Err(eyre!(
            "Configuration already exists at {}. Pass --force to overwrite it.",
            path.display()
        ));
    }

    let mut config = Config::default();
    config.api.base_url = base_url;
    config.api.token = token;
    config.api.fallback_hosts = fallback_hosts;
    config.validate().map_err(|e| eyre!("{}", e))?;

    config
        .save_to_file(path)
        .map_err(|e| eyre!("Failed to write config to {}: {}", path.display(), e))?;
    output.success(format!("Configuration written to {}", path.display()));
    Ok(())
}

fn mask_string(s: &str) -> String {
    if s.is_empty() || s == "YOUR_API_TOKEN" {
        return "<not set>".to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}
