//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{ChargerService, UserService};
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::middleware::{
    admin_middleware, auth_middleware, optional_auth_middleware, AuthState,
};
use crate::interfaces::http::modules::{auth, chargers, health, metrics, request_id};

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT from /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::register,
        auth::login,
        auth::get_current_user,
        // Chargers
        chargers::list_chargers,
        chargers::list_all_chargers,
        chargers::nearby_chargers,
        chargers::get_charger,
        chargers::create_charger,
        chargers::update_charger,
        chargers::delete_charger,
    ),
    components(
        schemas(
            ApiResponse<String>,
            health::HealthResponse,
            health::ComponentHealth,
            auth::LoginRequest,
            auth::RegisterRequest,
            auth::AuthResponse,
            auth::UserInfo,
            chargers::ChargerDto,
            chargers::CreateChargerRequest,
            chargers::UpdateChargerRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check"),
        (name = "Authentication", description = "Registration, login (JWT) and profile"),
        (name = "Chargers", description = "Charging station registry and nearby search"),
    ),
    info(
        title = "Charger Registry API",
        version = "1.0.0",
        description = "Register charging stations and find active ones nearby",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Everything the router needs from the outside
#[derive(Clone)]
pub struct RouterDeps {
    pub repos: Arc<dyn RepositoryProvider>,
    pub jwt_config: JwtConfig,
    pub default_radius_km: f64,
    pub bcrypt_cost: u32,
    /// `/metrics` is only mounted when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

/// Create the API router with all routes
pub fn create_api_router(deps: RouterDeps) -> Router {
    let RouterDeps {
        repos,
        jwt_config,
        default_radius_km,
        bcrypt_cost,
        metrics: metrics_handle,
    } = deps;

    let middleware_state = AuthState {
        jwt_config: jwt_config.clone(),
        repos: repos.clone(),
    };

    // ── Chargers ───────────────────────────────────────────────

    let charger_state = chargers::ChargerHandlerState {
        service: Arc::new(ChargerService::new(repos.clone())),
        default_radius_km,
    };

    let charger_protected = Router::new()
        .route(
            "/",
            get(chargers::list_chargers).post(chargers::create_charger),
        )
        .route(
            "/admin/all",
            get(chargers::list_all_chargers).route_layer(middleware::from_fn(admin_middleware)),
        )
        .route(
            "/{id}",
            get(chargers::get_charger)
                .put(chargers::update_charger)
                .delete(chargers::delete_charger),
        )
        .route_layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ));

    // Public, but a valid token still identifies the caller
    let charger_public = Router::new()
        .route("/nearby", get(chargers::nearby_chargers))
        .route_layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            optional_auth_middleware,
        ));

    let charger_routes = charger_protected
        .merge(charger_public)
        .with_state(charger_state);

    // ── Auth ───────────────────────────────────────────────────

    let auth_state = auth::AuthHandlerState {
        service: Arc::new(UserService::new(repos.clone(), jwt_config, bcrypt_cost)),
    };

    let auth_public = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let auth_protected = Router::new()
        .route("/me", get(auth::get_current_user))
        .route_layer(middleware::from_fn_with_state(
            middleware_state,
            auth_middleware,
        ));

    let auth_routes = auth_public.merge(auth_protected).with_state(auth_state);

    // ── Health / metrics / docs ────────────────────────────────

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            repos,
            started_at: Arc::new(Instant::now()),
        });

    let metrics_routes = match metrics_handle {
        Some(handle) => Router::new()
            .route("/metrics", get(metrics::prometheus_metrics))
            .with_state(metrics::MetricsState { handle }),
        None => Router::new(),
    };

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/chargers", charger_routes)
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::domain::{NewUser, Role};
    use crate::infrastructure::crypto::jwt::create_token;
    use crate::infrastructure::storage::InMemoryRepositoryProvider;

    struct TestApp {
        router: Router,
        repos: Arc<InMemoryRepositoryProvider>,
    }

    impl TestApp {
        fn new() -> Self {
            let repos = Arc::new(InMemoryRepositoryProvider::new());
            let router = create_api_router(RouterDeps {
                repos: repos.clone(),
                jwt_config: JwtConfig::default(),
                default_radius_km: 10.0,
                bcrypt_cost: crate::config::MIN_BCRYPT_COST,
                metrics: None,
            });
            Self { router, repos }
        }

        /// Create a user directly in the store and return (id, token).
        async fn user(&self, email: &str, role: Role) -> (String, String) {
            let user = self
                .repos
                .users()
                .create(NewUser {
                    email: email.to_string(),
                    password_hash: "unused".to_string(),
                    role,
                })
                .await
                .unwrap();
            let token = create_token(&user, &JwtConfig::default()).unwrap();
            (user.id, token)
        }

        async fn call(
            &self,
            method: &str,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header("authorization", format!("Bearer {token}"));
            }
            let body = match body {
                Some(json) => {
                    builder = builder.header("content-type", "application/json");
                    Body::from(json.to_string())
                }
                None => Body::empty(),
            };

            let resp = self
                .router
                .clone()
                .oneshot(builder.body(body).unwrap())
                .await
                .unwrap();
            let status = resp.status();
            let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
            let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            (status, json)
        }

        async fn create_charger(&self, token: &str, name: &str, lat: f64, lon: f64) -> String {
            let (status, body) = self
                .call(
                    "POST",
                    "/api/v1/chargers",
                    Some(token),
                    Some(json!({"name": name, "latitude": lat, "longitude": lon})),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED, "{body}");
            body["data"]["id"].as_str().unwrap().to_string()
        }
    }

    #[tokio::test]
    async fn chargers_require_a_token() {
        let app = TestApp::new();
        let (status, body) = app.call("GET", "/api/v1/chargers", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);

        let (status, _) = app
            .call("GET", "/api/v1/chargers", Some("not-a-jwt"), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn create_ignores_client_supplied_owner() {
        let app = TestApp::new();
        let (u1, t1) = app.user("u1@example.com", Role::User).await;
        let (u2, _) = app.user("u2@example.com", Role::User).await;

        let (status, body) = app
            .call(
                "POST",
                "/api/v1/chargers",
                Some(&t1),
                Some(json!({"name": "Depot", "latitude": 1.0, "longitude": 2.0, "UserId": u2})),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["owner_id"], u1.as_str());
    }

    #[tokio::test]
    async fn invalid_fields_are_rejected_with_400() {
        let app = TestApp::new();
        let (_, t1) = app.user("u1@example.com", Role::User).await;

        let (status, body) = app
            .call(
                "POST",
                "/api/v1/chargers",
                Some(&t1),
                Some(json!({"name": "", "latitude": 95.0, "longitude": 0.0})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("latitude"));
    }

    #[tokio::test]
    async fn non_owner_gets_403_and_missing_record_404() {
        let app = TestApp::new();
        let (_, t1) = app.user("u1@example.com", Role::User).await;
        let (_, t2) = app.user("u2@example.com", Role::User).await;
        let id = app.create_charger(&t1, "A", 0.0, 0.0).await;
        let uri = format!("/api/v1/chargers/{id}");

        let (status, _) = app.call("GET", &uri, Some(&t2), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app
            .call("PUT", &uri, Some(&t2), Some(json!({"status": "inactive"})))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app.call("DELETE", &uri, Some(&t2), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = app.call("GET", &uri, Some(&t1), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "active");

        let (status, _) = app
            .call("DELETE", "/api/v1/chargers/missing", Some(&t2), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn admin_sees_and_edits_everything() {
        let app = TestApp::new();
        let (_, t1) = app.user("u1@example.com", Role::User).await;
        let (_, admin) = app.user("admin@example.com", Role::Admin).await;
        let id = app.create_charger(&t1, "A", 0.0, 0.0).await;
        app.create_charger(&admin, "B", 0.0, 0.0).await;

        let (status, body) = app.call("GET", "/api/v1/chargers", Some(&t1), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (status, body) = app
            .call("GET", "/api/v1/chargers/admin/all", Some(&admin), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);

        let (status, _) = app
            .call("GET", "/api/v1/chargers/admin/all", Some(&t1), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = app
            .call(
                "PUT",
                &format!("/api/v1/chargers/{id}"),
                Some(&admin),
                Some(json!({"name": "Renamed"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "Renamed");
    }

    #[tokio::test]
    async fn nearby_is_public_and_validates_coordinates() {
        let app = TestApp::new();
        let (_, t1) = app.user("u1@example.com", Role::User).await;
        let near = app.create_charger(&t1, "near", 0.0, 0.05).await;
        app.create_charger(&t1, "far", 0.0, 1.0).await;
        let off = app.create_charger(&t1, "off", 0.0, 0.0).await;
        app.call(
            "PUT",
            &format!("/api/v1/chargers/{off}"),
            Some(&t1),
            Some(json!({"status": "inactive"})),
        )
        .await;

        let (status, body) = app
            .call("GET", "/api/v1/chargers/nearby?latitude=0&longitude=0", None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        let found = body["data"].as_array().unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["id"], near.as_str());

        let (status, body) = app
            .call(
                "GET",
                "/api/v1/chargers/nearby?latitude=0&longitude=0&radius=200",
                Some(&t1),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);

        let (status, _) = app
            .call("GET", "/api/v1/chargers/nearby?latitude=abc&longitude=0", None, None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .call("GET", "/api/v1/chargers/nearby?longitude=0", None, None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = app
            .call(
                "GET",
                "/api/v1/chargers/nearby?latitude=10&longitude=10&radius=-1",
                None,
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn register_login_and_profile() {
        let app = TestApp::new();
        let creds = json!({"email": "new@example.com", "password": "secret1"});

        let (status, body) = app
            .call("POST", "/api/v1/auth/register", None, Some(creds.clone()))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["user"]["role"], "user");

        let (status, _) = app
            .call("POST", "/api/v1/auth/register", None, Some(creds.clone()))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = app
            .call(
                "POST",
                "/api/v1/auth/login",
                None,
                Some(json!({"email": "new@example.com", "password": "wrong"})),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid credentials");

        let (status, body) = app
            .call("POST", "/api/v1/auth/login", None, Some(creds))
            .await;
        assert_eq!(status, StatusCode::OK);
        let token = body["data"]["token"].as_str().unwrap().to_string();

        let (status, body) = app.call("GET", "/api/v1/auth/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["email"], "new@example.com");
    }

    #[tokio::test]
    async fn token_for_unknown_user_is_rejected() {
        let app = TestApp::new();
        let ghost = crate::domain::User {
            id: "ghost".to_string(),
            email: "ghost@example.com".to_string(),
            password_hash: String::new(),
            role: Role::Admin,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let token = create_token(&ghost, &JwtConfig::default()).unwrap();

        let (status, body) = app.call("GET", "/api/v1/chargers", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "User no longer exists");
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = TestApp::new();
        let (status, body) = app.call("GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
