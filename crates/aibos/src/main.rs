//! aibos CLI - component specs to React components and Web Components.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use aibos_adapters::Framework;

mod commands;
mod config;

use config::{ConfigFile, Overrides};

#[derive(Parser)]
#[command(name = "aibos")]
#[command(about = "Generate framework components from aibos component specs")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to aibos.toml config file
    #[arg(short, long, default_value = "aibos.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold aibos.toml and an example spec
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Validate spec files or directories (defaults to the specs directory)
    Validate { paths: Vec<PathBuf> },

    /// Generate components for every spec
    Generate {
        /// Target framework, repeatable (defaults to config)
        #[arg(short, long, value_parser = parse_framework)]
        framework: Vec<Framework>,

        /// Output directory (defaults to config or "generated")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Stop at the first failing spec
        #[arg(long)]
        fail_fast: bool,
    },

    /// Regenerate whenever a spec changes
    Watch {
        #[arg(short, long, value_parser = parse_framework)]
        framework: Vec<Framework>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render a spec's custom element headlessly and print its HTML
    Preview {
        /// Spec file
        spec: PathBuf,

        /// Initial attribute as name=value (or a bare name), repeatable
        #[arg(short, long, value_parser = parse_attribute)]
        attr: Vec<(String, String)>,

        /// Open a composite element after connecting it
        #[arg(long)]
        open: bool,
    },

    /// Serve generated output for a browser preview
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Directory to serve (defaults to the output directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },
}

fn parse_framework(value: &str) -> Result<Framework, String> {
    Framework::parse(value).ok_or_else(|| {
        let known: Vec<&str> = Framework::ALL.iter().map(|f| f.as_str()).collect();
        format!("unknown framework '{}' (expected one of: {})", value, known.join(", "))
    })
}

fn parse_attribute(value: &str) -> Result<(String, String), String> {
    let (name, value) = value.split_once('=').unwrap_or((value, ""));
    if name.is_empty() {
        return Err("attribute name must not be empty".to_string());
    }
    Ok((name.to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes).await?;
        }
        Commands::Validate { paths } => {
            let config = ConfigFile::load(&cli.config)?;
            commands::validate::run(&config, paths).await?;
        }
        Commands::Generate {
            framework,
            output,
            fail_fast,
        } => {
            let config = ConfigFile::load(&cli.config)?;
            let build = config.build_config(Overrides {
                output,
                frameworks: framework,
                fail_fast,
            });
            commands::generate::run(build).await?;
        }
        Commands::Watch { framework, output } => {
            let config = ConfigFile::load(&cli.config)?;
            let build = config.build_config(Overrides {
                output,
                frameworks: framework,
                fail_fast: false,
            });
            commands::watch::run(build).await?;
        }
        Commands::Preview { spec, attr, open } => {
            commands::preview::run(&spec, &attr, open).await?;
        }
        Commands::Serve { port, dir, no_open } => {
            let dir = match dir {
                Some(dir) => dir,
                None => ConfigFile::load(&cli.config)?.output.dir,
            };
            commands::serve::run(port, dir, !no_open).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_attributes() {
        assert_eq!(
            parse_attribute("variant=ghost").unwrap(),
            ("variant".to_string(), "ghost".to_string())
        );
        assert_eq!(
            parse_attribute("disabled").unwrap(),
            ("disabled".to_string(), String::new())
        );
        assert!(parse_attribute("=x").is_err());
    }

    #[test]
    fn parses_frameworks() {
        assert_eq!(parse_framework("web-components").unwrap(), Framework::WebComponents);
        let err = parse_framework("jquery").unwrap_err();
        assert!(err.contains("react, web-components"));
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
