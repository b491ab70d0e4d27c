//! Ls command implementation

use anyhow::{Context, Result};
use rr_core::{resolve, FixtureDag, FixtureName};

use crate::cli::{GlobalArgs, LsArgs};
use crate::commands::common::Project;

/// Execute the ls command
pub(crate) async fn execute(args: &LsArgs, global: &GlobalArgs) -> Result<()> {
    let project = Project::load(global)?;
    let registry = &project.registry;

    let names: Vec<FixtureName> = match &args.fixture {
        Some(root) => resolve(registry, root)
            .with_context(|| format!("Failed to resolve fixture '{}'", root))?,
        None => registry.names().to_vec(),
    };

    let dag = args.dependents.then(|| FixtureDag::build(registry));
    for name in &names {
        let def = registry.lookup(name)?;
        let deps: Vec<&str> = def.depends_on.iter().map(|d| d.as_str()).collect();
        let mut line = format!(
            "{} ({} statements, {} executable)",
            name,
            def.statements.len(),
            def.executable_count()
        );
        if !deps.is_empty() {
            line.push_str(&format!(" <- {}", deps.join(", ")));
        }
        if let Some(dag) = &dag {
            let dependents: Vec<String> =
                dag.dependents(name).iter().map(|d| d.to_string()).collect();
            if !dependents.is_empty() {
                line.push_str(&format!(" -> {}", dependents.join(", ")));
            }
        }
        println!("{}", line);
    }

    Ok(())
}
