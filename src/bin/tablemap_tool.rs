use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tablemap::mapper::{delete_sql, insert_sql, select_all_sql, update_sql};
use tablemap::metadata::is_identifier;
use tablemap::{ColumnSchema, SqliteConfig, StorageType, StoreConnection, TableSchema};

#[derive(Parser)]
#[command(name = "tablemap-tool")]
#[command(about = "Developer tooling for tablemap entity mappings")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the statements generated for a table.
    Sql {
        #[arg(long)]
        table: String,
        /// Comma-separated `name:storage[:key][:readonly][:nullable]` list.
        #[arg(long)]
        columns: String,
        /// Print the validated schema as JSON as well.
        #[arg(long)]
        json: bool,
    },
    Generate {
        #[command(subcommand)]
        target: GenerateTarget,
    },
    /// Print every row of a table.
    Dump {
        #[arg(long)]
        db: String,
        #[arg(long)]
        table: String,
    },
}

#[derive(Subcommand)]
enum GenerateTarget {
    Entity {
        #[arg(long)]
        name: String,
        #[arg(long)]
        table: Option<String>,
        #[arg(long)]
        columns: String,
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Sql {
            table,
            columns,
            json,
        } => print_sql(&table, &columns, json),
        Command::Generate { target } => match target {
            GenerateTarget::Entity {
                name,
                table,
                columns,
                out,
            } => generate_entity(&name, table.as_deref(), &columns, &out),
        },
        Command::Dump { db, table } => dump_table(&db, &table),
    }
}

fn parse_columns(input: &str) -> Result<Vec<ColumnSchema>> {
    let mut columns = Vec::new();

    for part in input.split(',') {
        let trimmed = part.trim();
        if trimmed.is_empty() {
            continue;
        }

        let mut pieces = trimmed.split(':').map(str::trim);
        let name = pieces.next().unwrap_or_default();
        let storage = pieces.next().ok_or_else(|| {
            anyhow!("Invalid column '{}'. Expected format: name:storage[:key][:readonly][:nullable]", trimmed)
        })?;
        let storage = StorageType::parse(storage)
            .ok_or_else(|| anyhow!("Unknown storage type '{}' for column '{}'", storage, name))?;

        let mut column = ColumnSchema::new(name, storage);
        for flag in pieces {
            match flag.to_ascii_lowercase().as_str() {
                "key" => column.is_key = true,
                "readonly" | "read_only" => column.read_only = true,
                "nullable" | "null" => column.allow_null = true,
                other => return Err(anyhow!("Unknown flag '{}' for column '{}'", other, name)),
            }
        }
        columns.push(column);
    }

    if columns.is_empty() {
        return Err(anyhow!("No columns parsed. Example: id:integer:key:readonly,name:text"));
    }

    Ok(columns)
}

fn print_sql(table: &str, columns: &str, json: bool) -> Result<()> {
    let schema = TableSchema::build(table, Some(table), parse_columns(columns)?)
        .with_context(|| format!("Invalid column list for table '{}'", table))?;

    println!("{}", insert_sql(&schema));
    match update_sql(&schema) {
        Ok(sql) => println!("{}", sql),
        Err(err) => println!("-- {}", err),
    }
    println!("{}", delete_sql(&schema));
    println!("{}", select_all_sql(&schema));

    if json {
        println!("{}", serde_json::to_string_pretty(&schema)?);
    }
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create parent directory '{}'", parent.display()))?;
    }
    Ok(())
}

fn entity_template(name: &str, table: &str, columns: &[ColumnSchema]) -> String {
    let field_lines = columns
        .iter()
        .map(|column| {
            let mut options = Vec::new();
            if column.is_key {
                options.push("key");
            }
            if column.read_only {
                options.push("read_only");
            }
            let attr = if options.is_empty() {
                "#[column]".to_string()
            } else {
                format!("#[column({})]", options.join(", "))
            };
            let ty = if column.allow_null {
                format!("Option<{}>", column.storage.rust_type())
            } else {
                column.storage.rust_type().to_string()
            };
            format!("    {}\n    pub {}: {},", attr, column.name, ty)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "use tablemap::Entity;\n\n#[derive(Debug, Clone, Default, Entity)]\n#[table(name = \"{}\")]\npub struct {} {{\n{}\n}}\n",
        table, name, field_lines
    )
}

fn generate_entity(name: &str, table: Option<&str>, columns: &str, out: &Path) -> Result<()> {
    let table = table.unwrap_or(name);
    let schema = TableSchema::build(name, Some(table), parse_columns(columns)?)
        .with_context(|| format!("Invalid column list for entity '{}'", name))?;

    let content = entity_template(name, schema.table_name(), schema.columns());

    ensure_parent_dir(out)?;
    fs::write(out, content)
        .with_context(|| format!("Failed to write entity template to '{}'", out.display()))?;

    println!("Generated entity template: {}", out.display());
    Ok(())
}

fn dump_table(db: &str, table: &str) -> Result<()> {
    if !is_identifier(table) {
        return Err(anyhow!("Invalid table name '{}'", table));
    }

    let mut conn = SqliteConfig::from_url(db)?
        .open()
        .with_context(|| format!("Failed to open '{}'", db))?;
    let result = conn
        .query(&format!("SELECT * FROM [{}]", table), &[])
        .with_context(|| format!("Failed to read table '{}'", table))?;

    result.print();
    Ok(())
}
