use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use module_loader::ModuleCatalog;
use registry::{Catalog, Registry};
use shared::domain::{Activation, AppId};

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "catalog.toml")]
    catalog: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lists apps grouped by category.
    List {
        #[arg(long)]
        category: Option<String>,
    },
    /// Prints one app's descriptor.
    Show { app_id: String },
    /// Checks every embedded app resolves to a built-in unit and every
    /// external app has a url.
    Validate,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let catalog = Catalog::load(&cli.catalog)
        .with_context(|| format!("failed to load {}", cli.catalog.display()))?;

    match cli.command {
        Command::List { category } => {
            for group in catalog.registry.grouped_by_category() {
                if category.as_deref().is_some_and(|wanted| wanted != group.category) {
                    continue;
                }
                println!("{}", group.category);
                for app in group.apps {
                    println!(
                        "  {:<20} {:<9} {}",
                        app.id.as_str(),
                        app.activation_kind().as_str(),
                        app.name
                    );
                }
            }
        }
        Command::Show { app_id } => {
            let app = catalog.registry.get(&AppId::new(app_id))?;
            println!("id:          {}", app.id);
            println!("name:        {}", app.name);
            println!("category:    {}", app.category);
            println!("description: {}", app.description);
            match &app.activation {
                Activation::Embedded { module } => println!("module:      {module}"),
                Activation::External { url: Some(url) } => println!("url:         {url}"),
                Activation::External { url: None } => println!("url:         (none)"),
            }
            if app.manages_own_navigation {
                println!("navigation:  managed by the app");
            }
        }
        Command::Validate => {
            let problems = check(&catalog.registry, &reports::builtin_catalog());
            for problem in &problems {
                eprintln!("{problem}");
            }
            if !problems.is_empty() {
                bail!("{} problem(s) in {}", problems.len(), cli.catalog.display());
            }
            println!("{} apps ok", catalog.registry.len());
        }
    }

    Ok(())
}

fn check(registry: &Registry, modules: &ModuleCatalog) -> Vec<String> {
    registry
        .all()
        .iter()
        .filter_map(|app| match &app.activation {
            Activation::Embedded { module } if !modules.contains(module) => Some(format!(
                "{}: module '{module}' is not a built-in unit",
                app.id
            )),
            Activation::External { url: None } => Some(format!("{}: no url configured", app.id)),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_unknown_modules_and_missing_urls() {
        let catalog = Catalog::from_toml_str(
            r#"
[[apps]]
id = "digest"
name = "Digest"
category = "Ops"
kind = "embedded"
module = "reports::incident_digest"

[[apps]]
id = "ghost"
name = "Ghost"
category = "Ops"
kind = "embedded"
module = "reports::ghost"

[[apps]]
id = "wiki"
name = "Wiki"
category = "Docs"
kind = "external"
"#,
        )
        .expect("catalog");

        let problems = check(&catalog.registry, &reports::builtin_catalog());
        assert_eq!(
            problems,
            vec![
                "ghost: module 'reports::ghost' is not a built-in unit".to_string(),
                "wiki: no url configured".to_string(),
            ]
        );
    }
}
