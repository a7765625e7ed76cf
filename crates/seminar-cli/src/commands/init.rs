//! The `seminar init` command.

use std::path::Path;

use anyhow::Result;

use seminar_core::config::{SeminarConfig, LOCAL_CONFIG_FILE};

pub fn execute(config_path: Option<&Path>) -> Result<()> {
    let path = config_path.unwrap_or(Path::new(LOCAL_CONFIG_FILE));
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
        return Ok(());
    }

    let mut content = String::from(HEADER);
    content.push_str(&SeminarConfig::default().to_toml()?);
    std::fs::write(path, content)?;
    println!("Created {}", path.display());

    println!("\nNext steps:");
    println!("  1. Register a coordinator: seminar register --role coordinator --name ... --password ...");
    println!("  2. Create a session:       seminar session create --coordinator C001 --date ... --venue ... --type oral");
    println!("  3. Register students and evaluators, then submit, assign and evaluate");

    Ok(())
}

const HEADER: &str = r#"# seminar configuration
#
# String values may reference environment variables as ${VAR}.
# SEMINAR_DATA_FILE and SEMINAR_REPORT_DIR override the values below.

"#;
