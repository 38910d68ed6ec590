//! CLI subcommand handlers.

use crate::Commands;
use crate::ConfigAction;
use std::path::Path;

use tabline_core::{CompletionOptions, Console};

/// Handle a CLI subcommand.
pub fn handle_command(command: Commands, workspace: &Path) -> anyhow::Result<()> {
    match command {
        Commands::Config { action } => handle_config(action, workspace),
        Commands::Complete {
            line,
            fixed_only,
            suggest,
        } => handle_complete(&line, fixed_only, suggest, workspace),
    }
}

fn handle_config(action: ConfigAction, workspace: &Path) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let config_dir = workspace.join(".tabline");
            std::fs::create_dir_all(&config_dir)?;

            let config_path = config_dir.join("config.toml");
            if config_path.exists() {
                println!(
                    "Configuration file already exists at: {}",
                    config_path.display()
                );
                return Ok(());
            }

            let default_config = tabline_core::ConsoleConfig::default();
            let toml_str = toml::to_string_pretty(&default_config)?;
            std::fs::write(&config_path, &toml_str)?;
            println!(
                "Created default configuration at: {}",
                config_path.display()
            );
            Ok(())
        }
        ConfigAction::Show => {
            let config = tabline_core::load_config(Some(workspace), None)
                .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
            let toml_str = toml::to_string_pretty(&config)?;
            println!("{}", toml_str);
            Ok(())
        }
    }
}

fn handle_complete(
    line: &str,
    fixed_only: bool,
    suggest: bool,
    workspace: &Path,
) -> anyhow::Result<()> {
    let config = tabline_core::load_config(Some(workspace), None)
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
    for output in complete_line(config, line, fixed_only, suggest) {
        println!("{output}");
    }
    Ok(())
}

/// Complete `line` against the demo command set.
///
/// Returns the rewritten line quoted, followed by any suggestion listing.
fn complete_line(
    config: tabline_core::ConsoleConfig,
    line: &str,
    fixed_only: bool,
    suggest: bool,
) -> Vec<String> {
    let mut console = Console::with_sink(config, Vec::new());
    crate::demo::register_demo_commands(&mut console);
    let written = console.sink().len();

    let options = CompletionOptions {
        limit_to_fixed: fixed_only,
        emit_suggestions: suggest,
        rewrite_input: true,
    };
    let rewritten = console.complete(line, options).unwrap_or_default();

    let mut output = vec![format!("{rewritten:?}")];
    output.extend(console.sink()[written..].iter().cloned());
    output
}
