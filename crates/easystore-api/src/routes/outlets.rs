//! Outlet routes
//!
//! Creation and lookup only need a token. Everything that changes an
//! existing outlet sits behind the outlet scope gate.

use axum::{
    Router,
    extract::State,
    routing::{get, post, put},
};
use easystore_auth::AuthEmployee;
use easystore_db::{DbError, NewOutlet, Outlet, Role, Status, UpdateOutlet};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::{Json, Path};
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::tenant::OutletScope;
use crate::validation::{Candidate, Entity, Operation, validate};

use super::types::{
    AddOutletEmployeeRequest, AssignManagerRequest, AssignPincodesRequest, CreateOutletRequest,
    ManagerResult, MembersResult, MembershipResult, OutletResult, OutletsResult,
    PincodeAssignment, PincodesResult, UpdateOutletRequest, non_empty, present,
};

fn parse_status(status: Option<&str>) -> Result<Option<Status>, ApiError> {
    status
        .map(|s| s.parse::<Status>())
        .transpose()
        .map_err(|_| ApiError::bad_request("Status must be active or inactive"))
}

/// Validate and insert an outlet managed by `manager_id`
pub(super) async fn create_outlet_for(
    state: &AppState,
    manager_id: i64,
    request: CreateOutletRequest,
) -> Result<Outlet, ApiError> {
    let candidate = Candidate {
        required: vec![
            present(&request.name),
            present(&request.description),
            present(&request.location),
            present(&request.phone),
            present(&request.email),
            present(&request.website),
            present(&request.status),
        ],
        phone: present(&request.phone),
        email: present(&request.email),
        website: present(&request.website),
        status: present(&request.status),
        ..Candidate::new(Entity::Outlet)
    };
    validate(&state.db, &candidate, Operation::Create).await?;

    let status = parse_status(present(&request.status))?.unwrap_or_default();
    let field = |value: &Option<String>| present(value).unwrap_or_default().to_string();

    let outlet = state
        .db
        .insert_outlet(NewOutlet {
            identifier: Uuid::new_v4().to_string(),
            name: field(&request.name),
            description: field(&request.description),
            manager_id,
            location: field(&request.location),
            phone: field(&request.phone),
            email: field(&request.email),
            website: field(&request.website),
            status,
        })
        .await?;

    Ok(outlet)
}

// ==================== Outlet Routes ====================

/// POST /api/v1/outlet
async fn create_outlet(
    caller: AuthEmployee,
    State(state): State<AppState>,
    Json(request): Json<CreateOutletRequest>,
) -> Result<ApiResponse<OutletResult>, ApiError> {
    let outlet = create_outlet_for(&state, caller.id, request).await?;

    info!("Employee {} created outlet {}", caller.id, outlet.id);

    Ok(ApiResponse::created(
        "Outlet created successfully",
        OutletResult { outlet },
    ))
}

/// GET /api/v1/outlet
async fn list_outlets(
    _caller: AuthEmployee,
    State(state): State<AppState>,
) -> Result<ApiResponse<OutletsResult>, ApiError> {
    let outlets = state.db.list_outlets().await?;

    Ok(ApiResponse::ok(
        "Outlets fetched successfully",
        OutletsResult { outlets },
    ))
}

/// GET /api/v1/outlet/{outlet_id}
async fn get_outlet(
    _caller: AuthEmployee,
    State(state): State<AppState>,
    Path(outlet_id): Path<i64>,
) -> Result<ApiResponse<OutletResult>, ApiError> {
    let outlet = state
        .db
        .get_outlet(outlet_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Outlet"))?;

    Ok(ApiResponse::ok(
        "Outlet fetched successfully",
        OutletResult { outlet },
    ))
}

/// PUT /api/v1/outlet/{outlet_id}
async fn update_outlet(
    scope: OutletScope,
    State(state): State<AppState>,
    Json(request): Json<UpdateOutletRequest>,
) -> Result<ApiResponse<OutletResult>, ApiError> {
    if request.is_empty() {
        return Err(ApiError::bad_request("At least one field is required"));
    }

    let candidate = Candidate {
        phone: present(&request.phone),
        email: present(&request.email),
        website: present(&request.website),
        status: present(&request.status),
        ..Candidate::new(Entity::Outlet)
    };
    validate(&state.db, &candidate, Operation::Update(scope.outlet_id)).await?;

    let status = parse_status(present(&request.status))?;
    let update = UpdateOutlet {
        name: non_empty(request.name),
        description: non_empty(request.description),
        location: non_empty(request.location),
        phone: non_empty(request.phone),
        email: non_empty(request.email),
        website: non_empty(request.website),
        status,
    };

    let outlet = state
        .db
        .update_outlet(scope.outlet_id, update)
        .await?
        .ok_or_else(|| ApiError::not_found("Outlet"))?;

    info!("Updated outlet {}", outlet.id);

    Ok(ApiResponse::ok(
        "Outlet updated successfully",
        OutletResult { outlet },
    ))
}

// ==================== Membership Routes ====================

/// PUT /api/v1/outlet/{outlet_id}/manager
async fn assign_manager(
    scope: OutletScope,
    State(state): State<AppState>,
    Json(request): Json<AssignManagerRequest>,
) -> Result<ApiResponse<ManagerResult>, ApiError> {
    let employee_id = request
        .employee_id
        .ok_or_else(|| ApiError::bad_request("Manager ID is required"))?;

    let manager = state
        .db
        .get_employee(employee_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Employee"))?;

    let outlet = state
        .db
        .assign_outlet_manager(scope.outlet_id, manager.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Outlet"))?;

    info!("Employee {} now manages outlet {}", manager.id, outlet.id);

    Ok(ApiResponse::ok(
        "Manager assigned to outlet",
        ManagerResult { outlet, manager },
    ))
}

/// POST /api/v1/outlet/{outlet_id}/employees
async fn add_employee(
    scope: OutletScope,
    State(state): State<AppState>,
    Json(request): Json<AddOutletEmployeeRequest>,
) -> Result<ApiResponse<MembershipResult>, ApiError> {
    let employee_id = request
        .employee_id
        .ok_or_else(|| ApiError::bad_request("Employee ID is required"))?;

    let role = present(&request.role)
        .map(|r| r.parse::<Role>())
        .transpose()
        .map_err(|_| ApiError::bad_request("Role must be admin, manager or staff"))?
        .unwrap_or_default();

    let employee = state
        .db
        .get_employee(employee_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Employee"))?;

    let membership = state
        .db
        .add_outlet_employee(scope.outlet_id, employee.id, role)
        .await?;

    info!(
        "Employee {} joined outlet {} as {}",
        employee.id,
        scope.outlet_id,
        role.as_str()
    );

    Ok(ApiResponse::created(
        "Employee added to outlet",
        MembershipResult { membership },
    ))
}

/// GET /api/v1/outlet/{outlet_id}/employees
async fn list_employees(
    scope: OutletScope,
    State(state): State<AppState>,
) -> Result<ApiResponse<MembersResult>, ApiError> {
    let employees = state.db.list_outlet_employees(scope.outlet_id).await?;

    Ok(ApiResponse::ok(
        "Outlet employees fetched successfully",
        MembersResult { employees },
    ))
}

// ==================== Pincode Routes ====================

/// POST /api/v1/outlet/{outlet_id}/assign-pincodes
///
/// Each pincode is inserted on its own; a pincode already served by any
/// outlet lands in `failed` without affecting the rest.
async fn assign_pincodes(
    scope: OutletScope,
    State(state): State<AppState>,
    Json(request): Json<AssignPincodesRequest>,
) -> Result<ApiResponse<PincodeAssignment>, ApiError> {
    if request.pincodes.is_empty() {
        return Err(ApiError::bad_request("Pincodes are required"));
    }

    let mut assignment = PincodeAssignment::default();
    for pincode in request.pincodes {
        let pincode = pincode.trim().to_string();
        if pincode.is_empty() {
            assignment.failed.push(pincode);
            continue;
        }

        match state.db.insert_service_pincode(scope.outlet_id, &pincode).await {
            Ok(_) => assignment.success.push(pincode),
            Err(DbError::Duplicate(msg)) => {
                debug!("{}", msg);
                assignment.failed.push(pincode);
            }
            Err(e) => return Err(e.into()),
        }
    }

    if !assignment.failed.is_empty() {
        warn!(
            "Outlet {}: {} pincodes could not be assigned",
            scope.outlet_id,
            assignment.failed.len()
        );
    }

    Ok(ApiResponse::ok("Pincodes assigned to the outlet", assignment))
}

/// GET /api/v1/outlet/{outlet_id}/pincodes
async fn list_pincodes(
    scope: OutletScope,
    State(state): State<AppState>,
) -> Result<ApiResponse<PincodesResult>, ApiError> {
    let pincodes = state.db.list_service_pincodes(scope.outlet_id).await?;

    Ok(ApiResponse::ok(
        "Pincodes fetched successfully",
        PincodesResult { pincodes },
    ))
}

/// Create outlet routes (auth required)
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/outlet", post(create_outlet).get(list_outlets))
        .route("/outlet/{outlet_id}", get(get_outlet))
}

/// Create outlet routes (auth and outlet scope required)
pub fn scoped_routes() -> Router<AppState> {
    Router::new()
        .route("/outlet/{outlet_id}", put(update_outlet))
        .route("/outlet/{outlet_id}/manager", put(assign_manager))
        .route(
            "/outlet/{outlet_id}/employees",
            post(add_employee).get(list_employees),
        )
        .route("/outlet/{outlet_id}/assign-pincodes", post(assign_pincodes))
        .route("/outlet/{outlet_id}/pincodes", get(list_pincodes))
}
