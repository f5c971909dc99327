use cassie_core::FileSelection;

pub fn run(selection: &FileSelection) -> anyhow::Result<()> {
    println!("Migration Status:");
    println!("================");
    println!("Directory: {}", selection.operations_path().display());

    if !selection.prospective_migrations_exist()? {
        println!("No migrations found");
        return Ok(());
    }

    let path = selection.show_migration_path()?;
    println!("Migration files: {}", path.len());

    if path.ready() {
        println!("✅ Ready to migrate");
    } else {
        let unpaired = path.unpaired();
        if !unpaired.is_empty() {
            println!("⏳ Not ready, these migrations are missing a counterpart:");
            for id in unpaired {
                println!("  {}", id);
            }
        }
        let duplicates = path.duplicates();
        if !duplicates.is_empty() {
            println!("⏳ Not ready, these migrations have more than one script in one direction:");
            for id in duplicates {
                println!("  {}", id);
            }
        }
    }

    Ok(())
}
