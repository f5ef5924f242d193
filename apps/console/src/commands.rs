use clap::{Parser, Subcommand};
use tilgang_application::views::{
    assigned_role_rows, pagination, permission_rows, user_table_rows,
};
use tilgang_application::{AdminConsole, FetchOutcome};
use tilgang_core::{AppError, AppResult};

/// Browse users, roles and assignments of the access management API.
#[derive(Debug, Parser)]
#[command(name = "tilgang-console", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Lists one page of users.
    Users {
        /// Page to show, starting at 1.
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        page: Option<u32>,
    },
    /// Shows one user and the roles assigned to them.
    User {
        #[arg(value_parser = non_blank)]
        resource_id: String,
    },
    /// Lists the access roles.
    Roles,
    /// Shows the feature permissions of one access role.
    Permissions {
        #[arg(value_parser = non_blank)]
        role_id: String,
    },
    /// Lists an organizational unit and the units below it.
    OrgUnits {
        #[arg(value_parser = non_blank)]
        org_unit_id: String,
    },
}

fn non_blank(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("must not be blank".to_owned());
    }
    Ok(trimmed.to_owned())
}

impl Command {
    /// Runs the command and returns the lines to print.
    pub async fn run(&self, console: &AdminConsole) -> AppResult<Vec<String>> {
        match self {
            Self::Users { page } => users(console, page.unwrap_or(1)).await,
            Self::User { resource_id } => user(console, resource_id).await,
            Self::Roles => roles(console).await,
            Self::Permissions { role_id } => permissions(console, role_id).await,
            Self::OrgUnits { org_unit_id } => org_units(console, org_unit_id).await,
        }
    }
}

fn loaded(outcome: FetchOutcome, resource: &str) -> AppResult<()> {
    match outcome {
        FetchOutcome::Applied | FetchOutcome::Skipped => Ok(()),
        FetchOutcome::Failed | FetchOutcome::Superseded => {
            Err(AppError::Internal(format!("failed to load {resource}")))
        }
    }
}

async fn users(console: &AdminConsole, page: u32) -> AppResult<Vec<String>> {
    let store = console.users();
    let outcome = if page == 1 {
        store.refresh().await
    } else {
        store.set_current_page(page).await?
    };
    loaded(outcome, "users")?;

    let state = store.snapshot();
    let Some(page) = state.page.filter(|page| !page.is_empty()) else {
        return Ok(vec!["no users".to_owned()]);
    };
    let draft = console.assignments().snapshot().draft;

    let mut lines: Vec<String> = user_table_rows(&page, &draft)
        .into_iter()
        .map(|row| {
            let marker = if row.has_assignments { "*" } else { " " };
            format!(
                "{marker} {:<8} {:<32} {}",
                row.resource_id, row.full_name, row.user_type
            )
        })
        .collect();
    let pager = pagination(&page, state.page_size);
    lines.push(format!(
        "page {} of {} ({} users, {} per page)",
        pager.current_page,
        pager.page_count,
        page.total_items,
        pager.page_size.get()
    ));
    Ok(lines)
}

async fn user(console: &AdminConsole, resource_id: &str) -> AppResult<Vec<String>> {
    loaded(
        console.user_detail().fetch_detail_for(resource_id).await,
        "user",
    )?;
    loaded(
        console
            .assignments()
            .fetch_assignment_details(resource_id)
            .await,
        "assignments",
    )?;

    let mut lines = Vec::new();
    if let Some(user) = console.user_detail().snapshot().user {
        lines.push(format!("{} ({})", user.full_name(), user.user_name));
    }
    if let Some(details) = console.assignments().snapshot().details {
        lines.extend(assigned_role_rows(&details).into_iter().map(|row| {
            format!(
                "  {:<24} {:<12} {}",
                row.role_name, row.object_type, row.org_unit_name
            )
        }));
    }
    Ok(lines)
}

async fn roles(console: &AdminConsole) -> AppResult<Vec<String>> {
    loaded(console.roles().load_roles().await, "roles")?;

    Ok(console
        .roles()
        .snapshot()
        .roles
        .into_iter()
        .map(|role| format!("{:<24} {}", role.access_role_id, role.name))
        .collect())
}

async fn permissions(console: &AdminConsole, role_id: &str) -> AppResult<Vec<String>> {
    let roles = console.roles();
    loaded(roles.load_roles().await, "roles")?;
    loaded(roles.fetch_permission_data(role_id).await, "permissions")?;

    let mut lines = vec![format!("{} ({role_id})", roles.role_name(role_id))];
    lines.extend(
        permission_rows(&roles.snapshot().permission_data)
            .into_iter()
            .map(|row| format!("  {:<32} {}", row.feature_name, row.operations.join(", "))),
    );
    Ok(lines)
}

async fn org_units(console: &AdminConsole, org_unit_id: &str) -> AppResult<Vec<String>> {
    loaded(
        console.org_units().fetch_related(org_unit_id).await,
        "organizational units",
    )?;

    Ok(console
        .org_units()
        .snapshot()
        .related
        .into_iter()
        .map(|unit| {
            format!(
                "{:<8} {:<40} parent {}",
                unit.organisation_unit_id,
                unit.name,
                unit.parent_name.unwrap_or(unit.parent_ref)
            )
        })
        .collect())
}
