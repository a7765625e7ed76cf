//! The `seminar register`, `login` and `users` commands.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use seminar_core::model::{Profile, Registration, Role, User};

use super::{print_json, Seminar};

/// A user as shown to the outside; never includes the password.
#[derive(Serialize)]
struct UserRow<'a> {
    id: &'a str,
    name: &'a str,
    email: &'a str,
    role: Role,
    detail: &'a str,
}

impl<'a> From<&'a User> for UserRow<'a> {
    fn from(user: &'a User) -> Self {
        let detail = match &user.profile {
            Profile::Student(p) => p.supervisor_name.as_str(),
            Profile::Evaluator(p) => p.expertise.as_str(),
            Profile::Coordinator(p) => p.department.as_str(),
        };
        Self {
            id: &user.id,
            name: &user.name,
            email: &user.email,
            role: user.role(),
            detail,
        }
    }
}

pub fn register(
    data: Option<&Path>,
    config: Option<&Path>,
    role: Role,
    name: String,
    email: String,
    password: String,
    detail: String,
) -> Result<()> {
    let seminar = Seminar::open(data, config)?;
    let id = seminar.repo.register_user(
        role,
        Registration {
            name,
            email,
            password,
            detail,
        },
    )?;
    println!("{id}");
    Ok(())
}

pub fn login(
    data: Option<&Path>,
    config: Option<&Path>,
    id: &str,
    password: &str,
    role: Role,
) -> Result<()> {
    let seminar = Seminar::open(data, config)?;
    match seminar.repo.authenticate(id, password, role) {
        Some(user) => {
            println!("Logged in as {} ({})", user.name, user.role());
            Ok(())
        }
        None => anyhow::bail!("invalid credentials for {role} {id}"),
    }
}

pub fn list(data: Option<&Path>, config: Option<&Path>, role: Option<Role>, json: bool) -> Result<()> {
    use comfy_table::{Cell, Table};

    let seminar = Seminar::open(data, config)?;
    let users = match role {
        Some(role) => seminar.repo.users_with_role(role),
        None => seminar.repo.users(),
    };
    let rows: Vec<UserRow<'_>> = users.iter().map(UserRow::from).collect();

    if json {
        return print_json(&rows);
    }
    if rows.is_empty() {
        println!("No users registered.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Role", "Email", "Supervisor / Expertise / Department"]);
    for row in &rows {
        table.add_row(vec![
            Cell::new(row.id),
            Cell::new(row.name),
            Cell::new(row.role),
            Cell::new(row.email),
            Cell::new(row.detail),
        ]);
    }
    println!("{table}");
    Ok(())
}
