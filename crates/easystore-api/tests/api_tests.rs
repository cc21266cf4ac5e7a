//! API Integration Tests
//!
//! Drive the full router against a temporary SQLite database.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use easystore_api::{AppState, create_router};
use easystore_auth::{JwtManager, hash_password};
use easystore_db::{Database, Employee, NewEmployee, Role, Status};
use serde_json::{Value, json};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const PASSWORD: &str = "password123";

struct TestApp {
    router: Router,
    state: AppState,
    _dir: TempDir,
}

impl TestApp {
    async fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let url = format!("sqlite:{}?mode=rwc", dir.path().join("api.db").display());
        let db = Database::new(&url).await.unwrap();
        let jwt = Arc::new(JwtManager::new("integration-secret"));
        let state = AppState::new(db, jwt);

        Self {
            router: create_router(state.clone(), None),
            state,
            _dir: dir,
        }
    }

    async fn employee(&self, name: &str, phone: &str, email: &str) -> Employee {
        self.state
            .db
            .insert_employee(NewEmployee {
                name: name.to_string(),
                phone: phone.to_string(),
                email: email.to_string(),
                password_hash: hash_password(PASSWORD).unwrap(),
                role: Role::Staff,
                status: Status::Active,
            })
            .await
            .unwrap()
    }

    fn token(&self, employee: &Employee) -> String {
        self.state
            .jwt
            .generate_token(employee.id, &employee.name, &employee.email)
            .unwrap()
    }

    async fn call(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(format!("/api/v1{}", uri))
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json_body) => Body::from(serde_json::to_string(&json_body).unwrap()),
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn create_outlet(&self, token: &str, suffix: &str) -> i64 {
        let (status, json) = self
            .call("POST", "/outlet", Some(token), Some(outlet_body(suffix)))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", json);
        json["result"]["outlet"]["id"].as_i64().unwrap()
    }
}

fn outlet_body(suffix: &str) -> Value {
    json!({
        "name": format!("Outlet {}", suffix),
        "description": "Neighbourhood grocery",
        "location": "MG Road",
        "phone": format!("90000000{:0>2}", suffix),
        "email": format!("outlet{}@example.com", suffix),
        "website": format!("outlet{}.example.com", suffix),
        "status": "active",
    })
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().await;

    let (status, json) = app.call("GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["database"], "ok");
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_login_flow() {
    let app = TestApp::new().await;
    app.employee("Asha", "9876543210", "asha@example.com").await;

    let (status, json) = app
        .call("POST", "/employee/login", None, Some(json!({"email": "", "password": ""})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Email and password are required");

    let (status, json) = app
        .call(
            "POST",
            "/employee/login",
            None,
            Some(json!({"email": "nobody@example.com", "password": PASSWORD})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Employee not found");

    let (status, json) = app
        .call(
            "POST",
            "/employee/login",
            None,
            Some(json!({"email": "asha@example.com", "password": "wrong-password"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "Invalid email or password");

    let (status, json) = app
        .call(
            "POST",
            "/employee/login",
            None,
            Some(json!({"email": "asha@example.com", "password": PASSWORD})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "success");
    let token = json["result"]["accessToken"].as_str().unwrap().to_string();

    let (status, json) = app.call("GET", "/employee", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let employees = json["result"]["employees"].as_array().unwrap();
    assert_eq!(employees.len(), 1);
    assert!(employees[0].get("password_hash").is_none());
}

// =============================================================================
// Auth Gate
// =============================================================================

#[tokio::test]
async fn test_auth_gate_rejections() {
    let app = TestApp::new().await;
    let asha = app.employee("Asha", "9876543210", "asha@example.com").await;

    let (status, json) = app.call("GET", "/employee", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "No authorization header");

    let request = Request::builder()
        .uri("/api/v1/employee")
        .header(header::AUTHORIZATION, app.token(&asha))
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["message"], "Invalid token format");

    let expired = app
        .state
        .jwt
        .generate_token_at(asha.id, &asha.name, &asha.email, Utc::now() - Duration::hours(2))
        .unwrap();
    let (status, json) = app.call("GET", "/employee", Some(&expired), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "token has expired");

    let (status, json) = app.call("GET", "/employee", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "invalid token");
}

// =============================================================================
// Employee Validation
// =============================================================================

#[tokio::test]
async fn test_employee_validation() {
    let app = TestApp::new().await;
    let asha = app.employee("Asha", "9876543210", "asha@example.com").await;
    let token = app.token(&asha);

    let (status, json) = app
        .call("POST", "/employee", Some(&token), Some(json!({"name": "Ravi"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "All fields are required");

    let ravi = json!({
        "name": "Ravi",
        "phone": "12345",
        "email": "ravi@example.com",
        "password": "ravi-pass",
    });
    let (status, json) = app.call("POST", "/employee", Some(&token), Some(ravi)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Phone number must be 10 digits");

    let duplicate = json!({
        "name": "Ravi",
        "phone": "9876543211",
        "email": "asha@example.com",
        "password": "ravi-pass",
    });
    let (status, json) = app
        .call("POST", "/employee", Some(&token), Some(duplicate))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Email already exists");

    let valid = json!({
        "name": "Ravi",
        "phone": "9876543211",
        "email": "ravi@example.com",
        "password": "ravi-pass",
    });
    let (status, json) = app.call("POST", "/employee", Some(&token), Some(valid)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["result"]["employee"]["role"], "staff");
    assert_eq!(json["result"]["employee"]["status"], "active");
}

#[tokio::test]
async fn test_employee_update_keeps_own_email() {
    let app = TestApp::new().await;
    let asha = app.employee("Asha", "9876543210", "asha@example.com").await;
    let ravi = app.employee("Ravi", "9876543211", "ravi@example.com").await;
    let token = app.token(&asha);

    let uri = format!("/employee/{}", asha.id);
    let (status, json) = app
        .call(
            "PUT",
            &uri,
            Some(&token),
            Some(json!({"name": "Asha K", "email": "asha@example.com"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", json);
    assert_eq!(json["result"]["employee"]["name"], "Asha K");

    let (status, json) = app
        .call("PUT", &uri, Some(&token), Some(json!({"phone": ravi.phone})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Phone number already exists");

    let (status, json) = app
        .call("GET", "/employee/999", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Employee not found");
}

#[tokio::test]
async fn test_updated_password_logs_in_verbatim() {
    let app = TestApp::new().await;
    let asha = app.employee("Asha", "9876543210", "asha@example.com").await;
    let token = app.token(&asha);

    let uri = format!("/employee/{}", asha.id);
    let (status, _) = app
        .call("PUT", &uri, Some(&token), Some(json!({"password": " pass phrase "})))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = app
        .call(
            "POST",
            "/employee/login",
            None,
            Some(json!({"email": "asha@example.com", "password": " pass phrase "})),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", json);

    let (status, _) = app
        .call(
            "POST",
            "/employee/login",
            None,
            Some(json!({"email": "asha@example.com", "password": PASSWORD})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Malformed Input
// =============================================================================

#[tokio::test]
async fn test_malformed_body_uses_envelope() {
    let app = TestApp::new().await;
    let asha = app.employee("Asha", "9876543210", "asha@example.com").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/employee")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", app.token(&asha)))
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "failed");
    assert!(json["message"].as_str().unwrap().contains("JSON"));
}

#[tokio::test]
async fn test_non_numeric_path_id_uses_envelope() {
    let app = TestApp::new().await;
    let asha = app.employee("Asha", "9876543210", "asha@example.com").await;
    let token = app.token(&asha);

    let (status, json) = app.call("GET", "/employee/abc", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], "failed");
    assert!(json["message"].is_string());

    let outlet = app.create_outlet(&token, "1").await;
    let uri = format!("/outlet/{}/product/abc", outlet);
    let (status, json) = app.call("GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], "failed");
}

// =============================================================================
// Outlets and the Scope Gate
// =============================================================================

#[tokio::test]
async fn test_outlet_validation() {
    let app = TestApp::new().await;
    let asha = app.employee("Asha", "9876543210", "asha@example.com").await;
    let token = app.token(&asha);

    let mut body = outlet_body("1");
    body["status"] = json!("closed");
    let (status, json) = app.call("POST", "/outlet", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Status must be active or inactive");

    let outlet_id = app.create_outlet(&token, "1").await;

    let mut body = outlet_body("2");
    body["website"] = json!("outlet1.example.com");
    let (status, json) = app.call("POST", "/outlet", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Website already exists");

    let uri = format!("/outlet/{}", outlet_id);
    let (status, json) = app.call("PUT", &uri, Some(&token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "At least one field is required");

    let (status, json) = app
        .call(
            "PUT",
            &uri,
            Some(&token),
            Some(json!({"email": "outlet1@example.com", "status": "inactive"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", json);
    assert_eq!(json["result"]["outlet"]["status"], "inactive");
}

#[tokio::test]
async fn test_scope_gate_blocks_other_outlets() {
    let app = TestApp::new().await;
    let asha = app.employee("Asha", "9876543210", "asha@example.com").await;
    let ravi = app.employee("Ravi", "9876543211", "ravi@example.com").await;
    let asha_token = app.token(&asha);
    let ravi_token = app.token(&ravi);

    let outlet_a = app.create_outlet(&asha_token, "1").await;
    let outlet_b = app.create_outlet(&ravi_token, "2").await;

    let (status, json) = app
        .call(
            "GET",
            &format!("/outlet/{}/product-category", outlet_b),
            Some(&asha_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Invalid outlet id");

    let (status, json) = app
        .call(
            "GET",
            &format!("/outlet/{}/product-category", outlet_a),
            Some(&asha_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result"]["categories"], json!([]));

    // Reads of the outlet record itself only need a token
    let (status, _) = app
        .call("GET", &format!("/outlet/{}", outlet_b), Some(&asha_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = app
        .call(
            "PUT",
            &format!("/outlet/{}", outlet_b),
            Some(&asha_token),
            Some(json!({"name": "Taken over"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Invalid outlet id");
}

#[tokio::test]
async fn test_membership_grants_scope() {
    let app = TestApp::new().await;
    let asha = app.employee("Asha", "9876543210", "asha@example.com").await;
    let ravi = app.employee("Ravi", "9876543211", "ravi@example.com").await;
    let asha_token = app.token(&asha);
    let ravi_token = app.token(&ravi);
    let outlet = app.create_outlet(&asha_token, "1").await;
    let pincodes_uri = format!("/outlet/{}/pincodes", outlet);

    let (status, _) = app.call("GET", &pincodes_uri, Some(&ravi_token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = app
        .call(
            "POST",
            &format!("/outlet/{}/employees", outlet),
            Some(&asha_token),
            Some(json!({"employee_id": ravi.id})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", json);
    assert_eq!(json["result"]["membership"]["role"], "staff");

    let (status, _) = app.call("GET", &pincodes_uri, Some(&ravi_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = app
        .call(
            "PUT",
            &format!("/outlet/{}/manager", outlet),
            Some(&asha_token),
            Some(json!({"employee_id": ravi.id})),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", json);
    assert_eq!(json["result"]["outlet"]["manager_id"], ravi.id);
}

#[tokio::test]
async fn test_assign_pincodes() {
    let app = TestApp::new().await;
    let asha = app.employee("Asha", "9876543210", "asha@example.com").await;
    let token = app.token(&asha);
    let outlet = app.create_outlet(&token, "1").await;
    let uri = format!("/outlet/{}/assign-pincodes", outlet);

    let (status, json) = app
        .call("POST", &uri, Some(&token), Some(json!({"pincodes": []})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Pincodes are required");

    let (status, json) = app
        .call(
            "POST",
            &uri,
            Some(&token),
            Some(json!({"pincodes": ["560001", "560002", "560001"]})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result"]["success"], json!(["560001", "560002"]));
    assert_eq!(json["result"]["failed"], json!(["560001"]));

    let (_, json) = app
        .call("GET", &format!("/outlet/{}/pincodes", outlet), Some(&token), None)
        .await;
    assert_eq!(json["result"]["pincodes"].as_array().unwrap().len(), 2);
}

// =============================================================================
// Catalog
// =============================================================================

async fn create_category(app: &TestApp, token: &str, outlet: i64) -> i64 {
    let (status, json) = app
        .call(
            "POST",
            &format!("/outlet/{}/product-category", outlet),
            Some(token),
            Some(json!({"title": "Beverages", "description": "Drinks"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", json);
    json["result"]["category"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_category_requires_title_and_description() {
    let app = TestApp::new().await;
    let asha = app.employee("Asha", "9876543210", "asha@example.com").await;
    let token = app.token(&asha);
    let outlet = app.create_outlet(&token, "1").await;

    let (status, json) = app
        .call(
            "POST",
            &format!("/outlet/{}/product-category", outlet),
            Some(&token),
            Some(json!({"title": "Beverages"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Title and description should not be empty");
}

#[tokio::test]
async fn test_product_with_variants() {
    let app = TestApp::new().await;
    let asha = app.employee("Asha", "9876543210", "asha@example.com").await;
    let token = app.token(&asha);
    let outlet = app.create_outlet(&token, "1").await;
    let category = create_category(&app, &token, outlet).await;

    let (status, json) = app
        .call(
            "POST",
            &format!("/outlet/{}/product", outlet),
            Some(&token),
            Some(json!({
                "category_id": category,
                "title": "Mango juice",
                "description": "Fresh",
                "manufactured_date": "2025-01-10",
                "variants": [
                    {"name": "250ml", "selling_price": 20.0, "mrp": 25.0},
                    {"name": "1l", "selling_price": 70.0, "mrp": 80.0},
                ],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", json);
    assert_eq!(json["result"]["product"]["status"], "active");
    assert_eq!(json["result"]["variants"].as_array().unwrap().len(), 2);
    let product = json["result"]["product"]["id"].as_i64().unwrap();

    let (status, json) = app
        .call(
            "GET",
            &format!("/outlet/{}/product/{}", outlet, product),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result"]["product"]["manufactured_date"], "2025-01-10");
    assert_eq!(json["result"]["variants"][1]["name"], "1l");
}

#[tokio::test]
async fn test_failed_variant_leaves_no_product() {
    let app = TestApp::new().await;
    let asha = app.employee("Asha", "9876543210", "asha@example.com").await;
    let token = app.token(&asha);
    let outlet = app.create_outlet(&token, "1").await;
    let category = create_category(&app, &token, outlet).await;

    let (status, _) = app
        .call(
            "POST",
            &format!("/outlet/{}/product", outlet),
            Some(&token),
            Some(json!({
                "category_id": category,
                "title": "Mango juice",
                "description": "Fresh",
                "variants": [
                    {"name": "250ml", "selling_price": 20.0, "mrp": 25.0},
                    {"name": "1l", "selling_price": 70.0, "mrp": -1.0},
                ],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = app
        .call("GET", &format!("/outlet/{}/product", outlet), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result"]["products"], json!([]));
}

#[tokio::test]
async fn test_catalog_is_scoped_to_outlet() {
    let app = TestApp::new().await;
    let asha = app.employee("Asha", "9876543210", "asha@example.com").await;
    let token = app.token(&asha);
    let outlet_a = app.create_outlet(&token, "1").await;
    let outlet_b = app.create_outlet(&token, "2").await;
    let category_b = create_category(&app, &token, outlet_b).await;

    // A category of outlet B cannot be used from outlet A
    let (status, json) = app
        .call(
            "POST",
            &format!("/outlet/{}/product", outlet_a),
            Some(&token),
            Some(json!({
                "category_id": category_b,
                "title": "Tea",
                "description": "Leaf tea",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Category not found");

    let (status, _) = app
        .call(
            "GET",
            &format!("/outlet/{}/product-category/{}", outlet_a, category_b),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_variant_stock() {
    let app = TestApp::new().await;
    let asha = app.employee("Asha", "9876543210", "asha@example.com").await;
    let token = app.token(&asha);
    let outlet = app.create_outlet(&token, "1").await;
    let category = create_category(&app, &token, outlet).await;

    let (_, json) = app
        .call(
            "POST",
            &format!("/outlet/{}/product", outlet),
            Some(&token),
            Some(json!({"category_id": category, "title": "Tea", "description": "Leaf tea"})),
        )
        .await;
    let product = json["result"]["product"]["id"].as_i64().unwrap();
    let variants_uri = format!("/outlet/{}/product/{}/product-variant", outlet, product);

    let (status, json) = app
        .call(
            "POST",
            &variants_uri,
            Some(&token),
            Some(json!({"name": "100g", "selling_price": 40.0, "mrp": 45.0})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", json);
    let variant = json["result"]["variant"]["id"].as_i64().unwrap();
    let stock_uri = format!("{}/{}/stock", variants_uri, variant);

    let (status, json) = app.call("GET", &stock_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result"]["quantity"], 0);

    let (status, _) = app
        .call("PUT", &stock_uri, Some(&token), Some(json!({"quantity": 12})))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = app.call("GET", &stock_uri, Some(&token), None).await;
    assert_eq!(json["result"]["quantity"], 12);

    let (status, json) = app
        .call("PUT", &stock_uri, Some(&token), Some(json!({"quantity": -3})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Quantity must not be negative");

    let (status, json) = app
        .call(
            "PUT",
            &format!("{}/{}", variants_uri, variant),
            Some(&token),
            Some(json!({"selling_price": 42.5})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result"]["variant"]["selling_price"], 42.5);
    assert_eq!(json["result"]["variant"]["name"], "100g");
}
