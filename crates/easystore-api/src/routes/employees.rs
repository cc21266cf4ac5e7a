//! Employee routes: login, account management, and outlet creation on
//! behalf of an employee

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use easystore_auth::{AuthEmployee, hash_password, verify_password};
use easystore_db::{NewEmployee, Role, Status, UpdateEmployee};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::extract::{Json, Path};
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::validation::{Candidate, Entity, Operation, validate};

use super::outlets::create_outlet_for;
use super::types::{
    CreateEmployeeRequest, CreateOutletRequest, EmployeeResult, EmployeesResult, LoginRequest,
    LoginResponse, OutletResult, UpdateEmployeeRequest, non_empty, present,
};

fn record_login(outcome: &'static str) {
    metrics::counter!("easystore_logins_total", "outcome" => outcome).increment(1);
}

fn parse_role(role: Option<&str>) -> Result<Option<Role>, ApiError> {
    role.map(|r| r.parse::<Role>())
        .transpose()
        .map_err(|_| ApiError::bad_request("Role must be admin, manager or staff"))
}

// ==================== Auth Routes ====================

/// POST /api/v1/employee/login
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<ApiResponse<LoginResponse>, ApiError> {
    let email = request.email.trim();
    if email.is_empty() || request.password.is_empty() {
        record_login("rejected");
        return Err(ApiError::bad_request("Email and password are required"));
    }

    debug!("Login attempt for employee: {}", email);

    let employee = match state.db.get_employee_by_email(email).await? {
        Some(employee) => employee,
        None => {
            record_login("unknown_employee");
            return Err(ApiError::not_found("Employee"));
        }
    };

    if !verify_password(&request.password, &employee.password_hash) {
        warn!("Failed login for employee: {}", employee.id);
        record_login("bad_password");
        return Err(ApiError::Unauthorized("Invalid email or password".to_string()));
    }

    let access_token = state
        .jwt
        .generate_token(employee.id, &employee.name, &employee.email)?;

    info!("Employee {} logged in", employee.id);
    record_login("success");

    Ok(ApiResponse::ok(
        "Login successful",
        LoginResponse { access_token },
    ))
}

// ==================== Employee Routes ====================

/// POST /api/v1/employee
async fn create_employee(
    caller: AuthEmployee,
    State(state): State<AppState>,
    Json(request): Json<CreateEmployeeRequest>,
) -> Result<ApiResponse<EmployeeResult>, ApiError> {
    let candidate = Candidate {
        required: vec![
            present(&request.name),
            present(&request.phone),
            present(&request.email),
            present(&request.password),
        ],
        phone: present(&request.phone),
        email: present(&request.email),
        ..Candidate::new(Entity::Employee)
    };
    validate(&state.db, &candidate, Operation::Create).await?;

    let role = parse_role(present(&request.role))?.unwrap_or_default();
    let password_hash = hash_password(request.password.as_deref().unwrap_or_default())?;

    let employee = state
        .db
        .insert_employee(NewEmployee {
            name: present(&request.name).unwrap_or_default().to_string(),
            phone: present(&request.phone).unwrap_or_default().to_string(),
            email: present(&request.email).unwrap_or_default().to_string(),
            password_hash,
            role,
            status: Status::Active,
        })
        .await?;

    info!("Employee {} created employee {}", caller.id, employee.id);

    Ok(ApiResponse::created(
        "Employee created successfully",
        EmployeeResult { employee },
    ))
}

/// GET /api/v1/employee
async fn list_employees(
    _caller: AuthEmployee,
    State(state): State<AppState>,
) -> Result<ApiResponse<EmployeesResult>, ApiError> {
    let employees = state.db.list_employees().await?;

    Ok(ApiResponse::ok(
        "Employees fetched successfully",
        EmployeesResult { employees },
    ))
}

/// GET /api/v1/employee/{employee_id}
async fn get_employee(
    _caller: AuthEmployee,
    State(state): State<AppState>,
    Path(employee_id): Path<i64>,
) -> Result<ApiResponse<EmployeeResult>, ApiError> {
    let employee = state
        .db
        .get_employee(employee_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Employee"))?;

    Ok(ApiResponse::ok(
        "Employee fetched successfully",
        EmployeeResult { employee },
    ))
}

/// PUT /api/v1/employee/{employee_id}
async fn update_employee(
    caller: AuthEmployee,
    State(state): State<AppState>,
    Path(employee_id): Path<i64>,
    Json(request): Json<UpdateEmployeeRequest>,
) -> Result<ApiResponse<EmployeeResult>, ApiError> {
    if state.db.get_employee(employee_id).await?.is_none() {
        return Err(ApiError::not_found("Employee"));
    }

    let candidate = Candidate {
        phone: present(&request.phone),
        email: present(&request.email),
        ..Candidate::new(Entity::Employee)
    };
    validate(&state.db, &candidate, Operation::Update(employee_id)).await?;

    let role = parse_role(present(&request.role))?;
    let status = present(&request.status)
        .map(|s| s.parse::<Status>())
        .transpose()
        .map_err(|_| ApiError::bad_request("Status must be active or inactive"))?;
    // Blank check only; the password itself is hashed exactly as sent
    let password_hash = match request.password.as_deref() {
        Some(password) if present(&request.password).is_some() => Some(hash_password(password)?),
        _ => None,
    };

    let update = UpdateEmployee {
        name: non_empty(request.name),
        phone: non_empty(request.phone),
        email: non_empty(request.email),
        password_hash,
        role,
        status,
    };

    let employee = state
        .db
        .update_employee(employee_id, update)
        .await?
        .ok_or_else(|| ApiError::not_found("Employee"))?;

    info!("Employee {} updated employee {}", caller.id, employee.id);

    Ok(ApiResponse::ok(
        "Employee updated successfully",
        EmployeeResult { employee },
    ))
}

/// POST /api/v1/employee/{employee_id}/outlet
async fn create_employee_outlet(
    caller: AuthEmployee,
    State(state): State<AppState>,
    Path(employee_id): Path<i64>,
    Json(request): Json<CreateOutletRequest>,
) -> Result<ApiResponse<OutletResult>, ApiError> {
    let manager = state
        .db
        .get_employee(employee_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Employee"))?;

    let outlet = create_outlet_for(&state, manager.id, request).await?;

    info!(
        "Employee {} created outlet {} managed by {}",
        caller.id, outlet.id, manager.id
    );

    Ok(ApiResponse::created(
        "Outlet created successfully",
        OutletResult { outlet },
    ))
}

/// Routes reachable without a token
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/employee/login", post(login))
}

/// Create employee routes (auth required)
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/employee", post(create_employee).get(list_employees))
        .route(
            "/employee/{employee_id}",
            get(get_employee).put(update_employee),
        )
        .route("/employee/{employee_id}/outlet", post(create_employee_outlet))
}
