//! Table inventory commands: add, update, remove, list.

use clap::{Args, Subcommand};
use tavola::{
    AddTableOptions, AddTablePlan, Capacity, PlanExecutor, RemoveTableOptions, RemoveTablePlan,
    TableChanges, TableId, TableSpec, TableStatus, UpdateTableOptions, UpdateTablePlan,
};

use crate::error::CliError;
use crate::utils::{open_database, print_json, GlobalOptions};

/// Manage the floor inventory.
#[derive(Args)]
pub struct TableCommand {
    #[command(subcommand)]
    pub action: TableAction,
}

/// Floor inventory actions.
#[derive(Subcommand)]
pub enum TableAction {
    /// Add a table to the floor
    Add(AddTableArgs),

    /// Change fields of an existing table
    Update(UpdateTableArgs),

    /// Remove a table from the floor
    Remove(RemoveTableArgs),

    /// List the whole floor
    List(ListTablesArgs),
}

/// Arguments for adding a table.
#[derive(Args)]
pub struct AddTableArgs {
    /// Floor number for the new table
    #[arg(long, value_name = "NUMBER")]
    pub number: u32,

    /// Seating capacity
    #[arg(long, value_name = "SEATS")]
    pub capacity: u32,

    /// Floor location description
    #[arg(long, value_name = "TEXT")]
    pub location: Option<String>,

    /// Inventory status (available, reserved, maintenance)
    #[arg(long, value_name = "STATUS")]
    pub status: Option<String>,
}

/// Arguments for updating a table.
#[derive(Args)]
pub struct UpdateTableArgs {
    /// Table id
    #[arg(value_name = "ID")]
    pub id: i64,

    /// New floor number
    #[arg(long, value_name = "NUMBER")]
    pub number: Option<u32>,

    /// New seating capacity
    #[arg(long, value_name = "SEATS")]
    pub capacity: Option<u32>,

    /// New inventory status (available, reserved, maintenance)
    #[arg(long, value_name = "STATUS")]
    pub status: Option<String>,

    /// New floor location description
    #[arg(long, value_name = "TEXT")]
    pub location: Option<String>,
}

/// Arguments for removing a table.
#[derive(Args)]
pub struct RemoveTableArgs {
    /// Table id
    #[arg(value_name = "ID")]
    pub id: i64,
}

/// Arguments for listing the floor.
#[derive(Args)]
pub struct ListTablesArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

fn parse_status(s: &str) -> Result<TableStatus, CliError> {
    TableStatus::parse(s).map_err(|e| CliError::InvalidArguments(e.to_string()))
}

impl TableCommand {
    /// Execute the table command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        match self.action {
            TableAction::Add(args) => add(args, global),
            TableAction::Update(args) => update(args, global),
            TableAction::Remove(args) => remove(args, global),
            TableAction::List(args) => list(args, global),
        }
    }
}

fn add(args: AddTableArgs, global: &GlobalOptions) -> Result<(), CliError> {
    let mut spec = TableSpec::new(args.number, args.capacity)
        .map_err(|e| CliError::InvalidArguments(e.to_string()))?
        .with_location(args.location);
    if let Some(status) = args.status.as_deref() {
        spec = spec.with_status(parse_status(status)?);
    }

    let mut db = open_database(global)?;
    let plan = AddTablePlan::new(AddTableOptions::new(spec)).build_plan(&db)?;
    let result = PlanExecutor::new(&mut db).execute(&plan)?;

    if !global.quiet {
        let table = result.table.expect("add returns the created table");
        println!(
            "Added table {} (seats {})",
            table.table_number(),
            table.capacity()
        );
    }
    Ok(())
}

fn update(args: UpdateTableArgs, global: &GlobalOptions) -> Result<(), CliError> {
    let capacity = args
        .capacity
        .map(Capacity::try_from)
        .transpose()
        .map_err(|e| CliError::InvalidArguments(e.to_string()))?;
    let status = args.status.as_deref().map(parse_status).transpose()?;

    let changes = TableChanges {
        table_number: args.number,
        capacity,
        status,
        location: args.location,
    };

    let mut db = open_database(global)?;
    let plan = UpdateTablePlan::new(UpdateTableOptions::new(TableId::new(args.id), changes))
        .build_plan(&db)?;
    let result = PlanExecutor::new(&mut db).execute(&plan)?;

    if !global.quiet {
        let table = result.table.expect("update returns the updated table");
        println!(
            "Updated table {}: seats {}, status {}",
            table.table_number(),
            table.capacity(),
            table.status()
        );
    }
    Ok(())
}

fn remove(args: RemoveTableArgs, global: &GlobalOptions) -> Result<(), CliError> {
    let mut db = open_database(global)?;
    let plan =
        RemoveTablePlan::new(RemoveTableOptions::new(TableId::new(args.id))).build_plan(&db)?;
    PlanExecutor::new(&mut db).execute(&plan)?;

    if !global.quiet {
        println!("Removed table {}", args.id);
    }
    Ok(())
}

fn list(args: ListTablesArgs, global: &GlobalOptions) -> Result<(), CliError> {
    let db = open_database(global)?;
    let tables = db.list_tables()?;

    if args.json {
        print_json(&tables)?;
        return Ok(());
    }

    if tables.is_empty() {
        if !global.quiet {
            println!("The floor is empty");
        }
        return Ok(());
    }

    for table in &tables {
        let location = table.location().unwrap_or("-");
        println!(
            "#{} table {} seats {} [{}] {location}",
            table.id(),
            table.table_number(),
            table.capacity(),
            table.status(),
        );
    }
    Ok(())
}
