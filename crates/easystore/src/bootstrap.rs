//! First-run administrator

use anyhow::{Context, Result};
use easystore_auth::hash_password;
use easystore_db::{Database, Employee, NewEmployee, Role, Status};
use tracing::{info, warn};

use crate::config::BootstrapConfig;

/// Create the configured administrator when no employee exists yet.
///
/// Returns the created employee, or `None` when nothing was done.
pub async fn ensure_admin(db: &Database, config: &BootstrapConfig) -> Result<Option<Employee>> {
    if !config.enabled {
        return Ok(None);
    }

    if db
        .has_employees()
        .await
        .context("Failed to check for existing employees")?
    {
        return Ok(None);
    }

    info!("Creating bootstrap admin employee");
    let password_hash = hash_password(&config.admin_password)?;

    let admin = db
        .insert_employee(NewEmployee {
            name: config.admin_name.clone(),
            phone: config.admin_phone.clone(),
            email: config.admin_email.clone(),
            password_hash,
            role: Role::Admin,
            status: Status::Active,
        })
        .await
        .context("Failed to create bootstrap admin employee")?;

    warn!(
        "Bootstrap admin created (email: {}); change its password",
        admin.email
    );
    Ok(Some(admin))
}
