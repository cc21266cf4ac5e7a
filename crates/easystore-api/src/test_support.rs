//! Shared fixtures for unit tests

use easystore_auth::JwtManager;
use easystore_db::{Database, Employee, NewEmployee, NewOutlet, Outlet, Role, Status};
use std::sync::Arc;
use tempfile::TempDir;

use crate::state::AppState;

pub(crate) const TEST_SECRET: &str = "api-test-secret";

pub(crate) async fn test_state() -> (AppState, TempDir) {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite:{}?mode=rwc", dir.path().join("test.db").display());
    let db = Database::new(&url).await.unwrap();
    let jwt = Arc::new(JwtManager::new(TEST_SECRET));
    (AppState::new(db, jwt), dir)
}

/// Insert an employee whose password is never checked
pub(crate) async fn seed_employee(
    state: &AppState,
    name: &str,
    phone: &str,
    email: &str,
) -> Employee {
    state
        .db
        .insert_employee(NewEmployee {
            name: name.to_string(),
            phone: phone.to_string(),
            email: email.to_string(),
            password_hash: "unused".to_string(),
            role: Role::Staff,
            status: Status::Active,
        })
        .await
        .unwrap()
}

pub(crate) async fn seed_outlet(state: &AppState, manager_id: i64, suffix: &str) -> Outlet {
    state
        .db
        .insert_outlet(NewOutlet {
            identifier: format!("outlet-{}", suffix),
            name: format!("Outlet {}", suffix),
            description: "Corner store".to_string(),
            manager_id,
            location: "Main street".to_string(),
            phone: format!("91234567{:0>2}", suffix),
            email: format!("outlet{}@example.com", suffix),
            website: format!("outlet{}.example.com", suffix),
            status: Status::Active,
        })
        .await
        .unwrap()
}

pub(crate) fn bearer(state: &AppState, employee: &Employee) -> String {
    let token = state
        .jwt
        .generate_token(employee.id, &employee.name, &employee.email)
        .unwrap();
    format!("Bearer {}", token)
}
