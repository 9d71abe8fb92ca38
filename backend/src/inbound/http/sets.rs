//! Species set API handlers.
//!
//! ```text
//! GET    /api/sets
//! GET    /api/sets/{id}
//! POST   /api/sets       {"title":"Birds","taxonIds":["3","7"]}
//! PUT    /api/sets/{id}  {"title":"Birds","taxonIds":["3","7","9"]}
//! DELETE /api/sets/{id}
//! ```
//!
//! Every route requires a bearer token. Updates and deletes by a caller who
//! does not own the set are answered with `403`.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::SpeciesSet;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::{ErrorSchema, SpeciesSetSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_draft, parse_set_id};

/// Create/update request body.
///
/// Example JSON:
/// `{"title":"Birds","taxonIds":["3","7"]}`
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetRequest {
    pub title: String,
    /// Ordered taxon ids; stored exactly as given.
    #[serde(default)]
    pub taxon_ids: Vec<String>,
}

/// List the caller's sets.
#[utoipa::path(
    get,
    path = "/api/sets",
    responses(
        (status = 200, description = "Sets owned by the caller", body = [SpeciesSetSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["sets"],
    operation_id = "listSets"
)]
#[get("/sets")]
pub async fn list_sets(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<SpeciesSet>>> {
    let sets = state.sets_query.list_for(user.id()).await?;
    Ok(web::Json(sets))
}

/// Fetch a single set.
#[utoipa::path(
    get,
    path = "/api/sets/{id}",
    params(("id" = String, Path, description = "Set identifier")),
    responses(
        (status = 200, description = "Set", body = SpeciesSetSchema),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["sets"],
    operation_id = "getSet"
)]
#[get("/sets/{id}")]
pub async fn get_set(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<SpeciesSet>> {
    let id = parse_set_id(&path)?;
    let set = state.sets_query.get(&id).await?;
    Ok(web::Json(set))
}

/// Create a set owned by the caller.
#[utoipa::path(
    post,
    path = "/api/sets",
    request_body = SetRequest,
    responses(
        (status = 201, description = "Created", body = SpeciesSetSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["sets"],
    operation_id = "createSet"
)]
#[post("/sets")]
pub async fn create_set(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<SetRequest>,
) -> ApiResult<HttpResponse> {
    let draft = parse_draft(&payload.title, &payload.taxon_ids)?;
    let set = state.sets.create(user.id(), draft).await?;
    Ok(HttpResponse::Created().json(set))
}

/// Replace a set's title and contents.
#[utoipa::path(
    put,
    path = "/api/sets/{id}",
    params(("id" = String, Path, description = "Set identifier")),
    request_body = SetRequest,
    responses(
        (status = 200, description = "Updated", body = SpeciesSetSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Caller does not own the set", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["sets"],
    operation_id = "updateSet"
)]
#[put("/sets/{id}")]
pub async fn update_set(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<SetRequest>,
) -> ApiResult<web::Json<SpeciesSet>> {
    let id = parse_set_id(&path)?;
    let draft = parse_draft(&payload.title, &payload.taxon_ids)?;
    let set = state.sets.update(user.id(), &id, draft).await?;
    Ok(web::Json(set))
}

/// Delete a set.
#[utoipa::path(
    delete,
    path = "/api/sets/{id}",
    params(("id" = String, Path, description = "Set identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Caller does not own the set", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["sets"],
    operation_id = "deleteSet"
)]
#[delete("/sets/{id}")]
pub async fn delete_set(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_set_id(&path)?;
    state.sets.delete(user.id(), &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Error, SetDraft, SetId, SetTitle, TaxonIds, UserId};
    use crate::inbound::http::test_utils::{TestPorts, mock_state};
    use actix_web::http::StatusCode;
    use actix_web::http::header::AUTHORIZATION;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::{Value, json};

    const TOKEN: &str = "Bearer tok";

    fn signed_in(ports: &mut TestPorts, user: &UserId) {
        let user = user.clone();
        ports
            .authenticator
            .expect_authenticate()
            .returning(move |_| Ok(user.clone()));
    }

    fn birds(owner: &UserId) -> SpeciesSet {
        SpeciesSet::create(
            owner.clone(),
            SetDraft {
                title: SetTitle::new("Birds").expect("title"),
                taxon_ids: TaxonIds::parse(["3", "7"]).expect("ids"),
            },
        )
    }

    macro_rules! app {
        ($ports:expr) => {
            actix_test::init_service(
                App::new().app_data(web::Data::new(mock_state($ports))).service(
                    web::scope("/api")
                        .service(list_sets)
                        .service(get_set)
                        .service(create_set)
                        .service(update_set)
                        .service(delete_set),
                ),
            )
        };
    }

    #[actix_web::test]
    async fn create_returns_created_set_in_insertion_order() {
        let owner = UserId::random();
        let mut ports = TestPorts::default();
        signed_in(&mut ports, &owner);
        let expected_owner = owner.clone();
        ports
            .sets
            .expect_create()
            .withf(move |caller, _| caller == &expected_owner)
            .return_once(|owner, draft| Ok(SpeciesSet::create(owner.clone(), draft)));
        let app = app!(ports).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/sets")
            .insert_header((AUTHORIZATION, TOKEN))
            .set_json(json!({"title": "Birds", "taxonIds": ["3", "7"]}))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["title"], "Birds");
        assert_eq!(body["taxonIds"], json!(["3", "7"]));
        assert_eq!(body["ownerId"].as_str(), Some(owner.to_string().as_str()));
    }

    #[actix_web::test]
    async fn create_rejects_blank_title() {
        let mut ports = TestPorts::default();
        signed_in(&mut ports, &UserId::random());
        ports.sets.expect_create().never();
        let app = app!(ports).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/sets")
            .insert_header((AUTHORIZATION, TOKEN))
            .set_json(json!({"title": "  ", "taxonIds": []}))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["details"]["code"], "empty_title");
    }

    #[rstest]
    #[case::list("GET", "/api/sets")]
    #[case::get("GET", "/api/sets/0b6d2a4e-7c1f-4e3a-9d8b-5f2e1a0c3b4d")]
    #[case::delete("DELETE", "/api/sets/0b6d2a4e-7c1f-4e3a-9d8b-5f2e1a0c3b4d")]
    #[actix_web::test]
    async fn routes_require_bearer_token(#[case] method: &str, #[case] uri: &str) {
        let mut ports = TestPorts::default();
        ports.sets_query.expect_list_for().never();
        ports.sets_query.expect_get().never();
        ports.sets.expect_delete().never();
        let app = app!(ports).await;

        let method = actix_web::http::Method::from_bytes(method.as_bytes()).expect("method");
        let request = actix_test::TestRequest::default()
            .method(method)
            .uri(uri)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn get_returns_set_or_not_found() {
        let owner = UserId::random();
        let set = birds(&owner);
        let id = set.id;
        let mut ports = TestPorts::default();
        signed_in(&mut ports, &UserId::random());
        ports.sets_query.expect_get().returning(move |requested| {
            if *requested == id {
                Ok(set.clone())
            } else {
                Err(Error::not_found("set not found"))
            }
        });
        let app = app!(ports).await;

        let found = actix_test::TestRequest::get()
            .uri(&format!("/api/sets/{id}"))
            .insert_header((AUTHORIZATION, TOKEN))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, found).await;
        assert_eq!(body["title"], "Birds");

        let missing = actix_test::TestRequest::get()
            .uri(&format!("/api/sets/{}", SetId::random()))
            .insert_header((AUTHORIZATION, TOKEN))
            .to_request();
        let response = actix_test::call_service(&app, missing).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn malformed_set_id_is_bad_request() {
        let mut ports = TestPorts::default();
        signed_in(&mut ports, &UserId::random());
        ports.sets_query.expect_get().never();
        let app = app!(ports).await;

        let request = actix_test::TestRequest::get()
            .uri("/api/sets/not-a-uuid")
            .insert_header((AUTHORIZATION, TOKEN))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn delete_by_non_owner_is_forbidden() {
        let mut ports = TestPorts::default();
        signed_in(&mut ports, &UserId::random());
        ports
            .sets
            .expect_delete()
            .return_once(|_, _| Err(Error::forbidden("only the owner may modify this set")));
        let app = app!(ports).await;

        let request = actix_test::TestRequest::delete()
            .uri(&format!("/api/sets/{}", SetId::random()))
            .insert_header((AUTHORIZATION, TOKEN))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn delete_by_owner_is_no_content() {
        let mut ports = TestPorts::default();
        signed_in(&mut ports, &UserId::random());
        ports.sets.expect_delete().return_once(|_, _| Ok(()));
        let app = app!(ports).await;

        let request = actix_test::TestRequest::delete()
            .uri(&format!("/api/sets/{}", SetId::random()))
            .insert_header((AUTHORIZATION, TOKEN))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn update_returns_revised_set() {
        let owner = UserId::random();
        let existing = birds(&owner);
        let id = existing.id;
        let mut ports = TestPorts::default();
        signed_in(&mut ports, &owner);
        ports
            .sets
            .expect_update()
            .withf(move |_, requested, draft| *requested == id && draft.taxon_ids.len() == 3)
            .return_once(move |_, _, draft| Ok(existing.revised(draft)));
        let app = app!(ports).await;

        let request = actix_test::TestRequest::put()
            .uri(&format!("/api/sets/{id}"))
            .insert_header((AUTHORIZATION, TOKEN))
            .set_json(json!({"title": "Birds", "taxonIds": ["3", "7", "9"]}))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["taxonIds"], json!(["3", "7", "9"]));
    }

    #[actix_web::test]
    async fn list_snapshot_shape() {
        let owner = UserId::from_uuid(uuid::Uuid::nil());
        let mut set = birds(&owner);
        set.id = SetId::from(uuid::Uuid::nil());
        let mut ports = TestPorts::default();
        signed_in(&mut ports, &owner);
        ports
            .sets_query
            .expect_list_for()
            .return_once(move |_| Ok(vec![set]));
        let app = app!(ports).await;

        let request = actix_test::TestRequest::get()
            .uri("/api/sets")
            .insert_header((AUTHORIZATION, TOKEN))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, request).await;
        insta::with_settings!({ sort_maps => true }, {
            insta::assert_json_snapshot!(body, @r#"
            [
              {
                "id": "00000000-0000-0000-0000-000000000000",
                "ownerId": "00000000-0000-0000-0000-000000000000",
                "taxonIds": [
                  "3",
                  "7"
                ],
                "title": "Birds"
              }
            ]
            "#);
        });
    }
}
