//! Account API handlers.
//!
//! ```text
//! POST /api/users {"username":"ada","password":"pw1","confirmPassword":"pw1"}
//! POST /api/login {"username":"ada","password":"pw1"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{
    AuthenticatedSession, Error, LoginCredentials, LoginValidationError, SignupForm, User,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, SessionSchema, UserSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::map_signup_validation_error;

/// Signup request body for `POST /api/users`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    /// Must equal `password`.
    pub confirm_password: String,
}

impl TryFrom<SignupRequest> for SignupForm {
    type Error = crate::domain::SignupValidationError;

    fn try_from(value: SignupRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password, &value.confirm_password)
    }
}

/// Login request body for `POST /api/login`.
///
/// Example JSON:
/// `{"username":"ada","password":"pw1"}`
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = UserSchema),
        (status = 400, description = "Invalid request or username taken", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "signUp",
    security([])
)]
#[post("/users")]
pub async fn sign_up(
    state: web::Data<HttpState>,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let form = SignupForm::try_from(payload.into_inner()).map_err(map_signup_validation_error)?;
    let user = state.signup.sign_up(&form).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Authenticate and issue a bearer token.
///
/// Uses the centralised `Error` type so clients get a consistent
/// error schema across all endpoints.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = SessionSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<AuthenticatedSession>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let session = state.login.log_in(&credentials).await?;
    Ok(web::Json(session))
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyUsername => Error::invalid_request("username must not be empty")
            .with_details(json!({ "field": "username", "code": "empty_username" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SessionToken, UserId, Username};
    use crate::inbound::http::test_utils::{TestPorts, mock_state};
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::Value;

    fn ada() -> User {
        User::new(UserId::random(), Username::new("ada").expect("username"))
    }

    macro_rules! app {
        ($ports:expr) => {
            actix_test::init_service(
                App::new()
                    .app_data(web::Data::new(mock_state($ports)))
                    .service(web::scope("/api").service(sign_up).service(login)),
            )
        };
    }

    #[actix_web::test]
    async fn sign_up_returns_created_user() {
        let user = ada();
        let expected_id = user.id().to_string();
        let mut ports = TestPorts::default();
        ports
            .signup
            .expect_sign_up()
            .withf(|form| form.username().as_ref() == "ada" && form.password() == "pw1")
            .return_once(move |_| Ok(user));
        let app = app!(ports).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/users")
            .set_json(json!({"username": "ada", "password": "pw1", "confirmPassword": "pw1"}))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["username"], "ada");
        assert_eq!(body["id"].as_str(), Some(expected_id.as_str()));
    }

    #[actix_web::test]
    async fn sign_up_rejects_mismatched_confirmation_without_calling_service() {
        let mut ports = TestPorts::default();
        ports.signup.expect_sign_up().never();
        let app = app!(ports).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/users")
            .set_json(json!({"username": "ada", "password": "pw1", "confirmPassword": "pw2"}))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["message"], "passwords do not match");
        assert_eq!(body["details"]["field"], "confirmPassword");
    }

    #[actix_web::test]
    async fn sign_up_surfaces_taken_username() {
        let mut ports = TestPorts::default();
        ports.signup.expect_sign_up().return_once(|_| {
            Err(Error::invalid_request("username taken")
                .with_details(json!({"field": "username", "code": "username_taken"})))
        });
        let app = app!(ports).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/users")
            .set_json(json!({"username": "ada", "password": "pw1", "confirmPassword": "pw1"}))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["message"], "username taken");
    }

    #[actix_web::test]
    async fn login_returns_token_username_and_id() {
        let user = ada();
        let expected_id = user.id().to_string();
        let token = SessionToken::from_presented("tok").expect("token");
        let session = AuthenticatedSession::new(token, &user);
        let mut ports = TestPorts::default();
        ports
            .login
            .expect_log_in()
            .return_once(move |_| Ok(session));
        let app = app!(ports).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/login")
            .set_json(json!({"username": "ada", "password": "pw1"}))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["token"], "tok");
        assert_eq!(body["username"], "ada");
        assert_eq!(body["id"].as_str(), Some(expected_id.as_str()));
    }

    #[actix_web::test]
    async fn login_with_bad_credentials_is_unauthorised() {
        let mut ports = TestPorts::default();
        ports
            .login
            .expect_log_in()
            .return_once(|_| Err(Error::unauthorized("invalid credentials")));
        let app = app!(ports).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/login")
            .set_json(json!({"username": "ada", "password": "nope"}))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[case("   ", "pw", "username must not be empty", "username", "empty_username")]
    #[case("ada", "", "password must not be empty", "password", "empty_password")]
    #[actix_web::test]
    async fn login_validation_errors_name_the_field(
        #[case] username: &str,
        #[case] password: &str,
        #[case] message: &str,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let mut ports = TestPorts::default();
        ports.login.expect_log_in().never();
        let app = app!(ports).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/login")
            .set_json(&LoginRequest {
                username: username.into(),
                password: password.into(),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["message"], message);
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["field"], field);
        assert_eq!(body["details"]["code"], code);
    }
}
