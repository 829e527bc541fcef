//! Generic resource endpoints
//!
//! ## Endpoints (per record kind, mounted under its own path)
//!
//! - `GET <mount>/all` - List all records (USER)
//! - `GET <mount>?id={key}` - Get one record (USER)
//! - `POST <mount>/post?{field}={value}...` - Create a record (ADMIN)
//! - `PUT <mount>?id={key}` + JSON body - Replace a record's fields (ADMIN)
//! - `DELETE <mount>?id={key}` - Delete a record (ADMIN)
//!
//! The naturally keyed organization kind uses `orgCode` instead of `id`.
//!
//! ## Authentication
//!
//! All endpoints require a JWT bearer token; writes require the ADMIN role.

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Body;
use hyper::{header::AUTHORIZATION, Method, Request, Response, StatusCode};
use std::fmt::Display;
use std::sync::Arc;

use crate::auth::{extract_token_from_header, is_allowed, Claims, JwtValidator, Operation};
use crate::resource::error::{error_response, json_response, MessageResponse};
use crate::resource::{
    ops, ApiError, MemoryStore, MongoStore, Params, Resource, ResourceKey, ResourceStore,
};
use crate::server::AppState;

type FullBody = Full<Bytes>;

/// Route a request under a resource mount to the matching operation
pub async fn handle_resource_request<T, B>(
    req: Request<B>,
    state: Arc<AppState>,
    subpath: &str,
) -> Response<FullBody>
where
    T: Resource,
    B: Body<Data = Bytes> + Send,
    B::Error: Display,
{
    let method = req.method().clone();

    match (method, subpath) {
        (Method::GET, "/all") => list_records::<T, B>(req, state).await,
        (Method::GET, "" | "/") => get_record::<T, B>(req, state).await,
        (Method::POST, "/post") => post_record::<T, B>(req, state).await,
        (Method::PUT, "" | "/") => put_record::<T, B>(req, state).await,
        (Method::DELETE, "" | "/") => delete_record::<T, B>(req, state).await,
        _ => error_response(StatusCode::NOT_FOUND, "Not found", None),
    }
}

/// GET <mount>/all - list all records
async fn list_records<T, B>(req: Request<B>, state: Arc<AppState>) -> Response<FullBody>
where
    T: Resource,
    B: Body,
{
    if let Err(e) = authorize(&req, &state, Operation::List) {
        return e.to_response();
    }

    let store = match resource_store::<T>(&state) {
        Ok(s) => s,
        Err(e) => return e.to_response(),
    };

    match ops::list(store.as_ref()).await {
        Ok(records) => json_response(StatusCode::OK, &records),
        Err(e) => e.to_response(),
    }
}

/// GET <mount>?id={key} - get one record
async fn get_record<T, B>(req: Request<B>, state: Arc<AppState>) -> Response<FullBody>
where
    T: Resource,
    B: Body,
{
    if let Err(e) = authorize(&req, &state, Operation::Get) {
        return e.to_response();
    }

    let key = match require_key::<T, B>(&req) {
        Ok(k) => k,
        Err(e) => return e.to_response(),
    };

    let store = match resource_store::<T>(&state) {
        Ok(s) => s,
        Err(e) => return e.to_response(),
    };

    match ops::get(store.as_ref(), &key).await {
        Ok(record) => json_response(StatusCode::OK, &record),
        Err(e) => e.to_response(),
    }
}

/// POST <mount>/post?{field}={value}... - create a record
async fn post_record<T, B>(req: Request<B>, state: Arc<AppState>) -> Response<FullBody>
where
    T: Resource,
    B: Body,
{
    if let Err(e) = authorize(&req, &state, Operation::Create) {
        return e.to_response();
    }

    let params = Params::from_query(req.uri().query());

    let store = match resource_store::<T>(&state) {
        Ok(s) => s,
        Err(e) => return e.to_response(),
    };

    match ops::create(store.as_ref(), &params).await {
        Ok(saved) => json_response(StatusCode::OK, &saved),
        Err(e) => e.to_response(),
    }
}

/// PUT <mount>?id={key} - replace a record's fields from the JSON body
async fn put_record<T, B>(req: Request<B>, state: Arc<AppState>) -> Response<FullBody>
where
    T: Resource,
    B: Body<Data = Bytes> + Send,
    B::Error: Display,
{
    if let Err(e) = authorize(&req, &state, Operation::Update) {
        return e.to_response();
    }

    let key = match require_key::<T, B>(&req) {
        Ok(k) => k,
        Err(e) => return e.to_response(),
    };

    let store = match resource_store::<T>(&state) {
        Ok(s) => s,
        Err(e) => return e.to_response(),
    };

    let body = match req.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            return ApiError::validation(format!("Failed to read request body: {}", e))
                .to_response()
        }
    };

    let incoming: T = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            return ApiError::validation(format!("Invalid request body: {}", e)).to_response()
        }
    };

    match ops::update(store.as_ref(), &key, incoming).await {
        Ok(updated) => json_response(StatusCode::OK, &updated),
        Err(e) => e.to_response(),
    }
}

/// DELETE <mount>?id={key} - delete a record
async fn delete_record<T, B>(req: Request<B>, state: Arc<AppState>) -> Response<FullBody>
where
    T: Resource,
    B: Body,
{
    if let Err(e) = authorize(&req, &state, Operation::Delete) {
        return e.to_response();
    }

    let key = match require_key::<T, B>(&req) {
        Ok(k) => k,
        Err(e) => return e.to_response(),
    };

    let store = match resource_store::<T>(&state) {
        Ok(s) => s,
        Err(e) => return e.to_response(),
    };

    match ops::delete(store.as_ref(), &key).await {
        Ok(message) => json_response(StatusCode::OK, &MessageResponse { message }),
        Err(e) => e.to_response(),
    }
}

/// Check the bearer token and role before an operation runs
pub fn authorize<B>(
    req: &Request<B>,
    state: &AppState,
    operation: Operation,
) -> Result<Claims, ApiError> {
    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let token = extract_token_from_header(auth_header).ok_or_else(ApiError::no_token)?;

    let jwt = jwt_validator(state)?;
    let result = jwt.verify_token(token);

    if !result.valid {
        return Err(ApiError::invalid_token(
            result.error.unwrap_or_else(|| "Invalid token".to_string()),
        ));
    }

    let claims = result.claims.unwrap();

    if !is_allowed(operation, claims.role) {
        return Err(ApiError::forbidden(format!(
            "{} role required to {} records",
            operation.required_role(),
            operation
        )));
    }

    Ok(claims)
}

fn jwt_validator(state: &AppState) -> Result<JwtValidator, ApiError> {
    if state.args.dev_mode {
        Ok(JwtValidator::new_dev())
    } else {
        match &state.args.jwt_secret {
            Some(secret) => JwtValidator::new(secret.clone(), state.args.jwt_expiry_seconds)
                .map_err(ApiError::from),
            None => Err(ApiError::Fault {
                message: "JWT secret not configured".to_string(),
            }),
        }
    }
}

/// Pick the store backing resource operations: MongoDB when connected,
/// the in-memory store in dev mode
fn resource_store<T: Resource>(state: &AppState) -> Result<Box<dyn ResourceStore<T>>, ApiError> {
    if let Some(mongo) = &state.mongo {
        Ok(Box::new(MongoStore::new(mongo.clone())))
    } else if state.args.dev_mode {
        Ok(Box::new(MemoryStore::new(Arc::clone(&state.mem))))
    } else {
        Err(ApiError::Unavailable {
            message: "no store configured".to_string(),
        })
    }
}

/// Extract and parse the key query parameter for the record kind
fn require_key<T: Resource, B>(req: &Request<B>) -> Result<T::Key, ApiError> {
    let params = Params::from_query(req.uri().query());

    let raw = params.get(T::KEY_FIELD).ok_or_else(|| {
        ApiError::validation(format!("Missing required parameter '{}'", T::KEY_FIELD))
    })?;

    T::Key::parse(raw).ok_or_else(|| {
        ApiError::validation(format!("Invalid value for parameter '{}'", T::KEY_FIELD))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::config::Args;
    use crate::db::schemas::{HelpRequest, UcsbOrganization};
    use clap::Parser;

    fn test_state() -> Arc<AppState> {
        let mut args = Args::parse_from(["registrar"]);
        args.dev_mode = true;
        Arc::new(AppState::new(args, None))
    }

    fn token(role: Role) -> String {
        JwtValidator::new_dev()
            .generate_token("tester@ucsb.edu", role)
            .unwrap()
    }

    fn request(method: Method, uri: &str, role: Option<Role>, body: &str) -> Request<FullBody> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(role) = role {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token(role)));
        }
        builder
            .body(Full::new(Bytes::from(body.to_string())))
            .unwrap()
    }

    async fn body_json(response: Response<FullBody>) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    const CREATE_QUERY: &str = "/api/helprequests/post?requesterEmail=a%40b.edu&teamId=t1\
                                &tableOrBreakoutRoom=5&explanation=x&solved=false\
                                &requestTime=2022-01-03T00%3A00%3A00";

    async fn create_sample(state: &Arc<AppState>) -> serde_json::Value {
        let req = request(Method::POST, CREATE_QUERY, Some(Role::Admin), "");
        let resp =
            handle_resource_request::<HelpRequest, _>(req, Arc::clone(state), "/post").await;
        assert_eq!(resp.status(), StatusCode::OK);
        body_json(resp).await
    }

    #[tokio::test]
    async fn test_list_requires_authentication() {
        let state = test_state();
        let req = request(Method::GET, "/api/helprequests/all", None, "");

        let resp = handle_resource_request::<HelpRequest, _>(req, state, "/all").await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_user_can_list() {
        let state = test_state();
        let req = request(Method::GET, "/api/helprequests/all", Some(Role::User), "");

        let resp = handle_resource_request::<HelpRequest, _>(req, state, "/all").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_user_cannot_create() {
        let state = test_state();
        let req = request(Method::POST, CREATE_QUERY, Some(Role::User), "");

        let resp = handle_resource_request::<HelpRequest, _>(req, state, "/post").await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_create_echoes_fields_and_key() {
        let state = test_state();
        let saved = create_sample(&state).await;

        assert_eq!(saved["id"], 1);
        assert_eq!(saved["requesterEmail"], "a@b.edu");
        assert_eq!(saved["teamId"], "t1");
        assert_eq!(saved["tableOrBreakoutRoom"], "5");
        assert_eq!(saved["explanation"], "x");
        assert_eq!(saved["solved"], false);
        assert_eq!(saved["requestTime"], "2022-01-03T00:00:00");
    }

    #[tokio::test]
    async fn test_get_by_key() {
        let state = test_state();
        let saved = create_sample(&state).await;

        let req = request(
            Method::GET,
            "/api/helprequests?id=1",
            Some(Role::User),
            "",
        );
        let resp = handle_resource_request::<HelpRequest, _>(req, state, "").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, saved);
    }

    #[tokio::test]
    async fn test_get_missing_key_returns_not_found_contract() {
        let state = test_state();
        let req = request(
            Method::GET,
            "/api/helprequests?id=7",
            Some(Role::User),
            "",
        );

        let resp = handle_resource_request::<HelpRequest, _>(req, state, "").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = body_json(resp).await;
        assert_eq!(body["type"], "EntityNotFoundException");
        assert_eq!(body["message"], "HelpRequest with id 7 not found");
    }

    #[tokio::test]
    async fn test_put_replaces_fields_preserving_key() {
        let state = test_state();
        create_sample(&state).await;

        let replacement = serde_json::json!({
            "requesterEmail": "c@d.edu",
            "teamId": "t9",
            "tableOrBreakoutRoom": "breakout-2",
            "explanation": "switched teams",
            "solved": true,
            "requestTime": "2022-03-14T09:00:00"
        });

        let req = request(
            Method::PUT,
            "/api/helprequests?id=1",
            Some(Role::Admin),
            &replacement.to_string(),
        );
        let resp = handle_resource_request::<HelpRequest, _>(req, Arc::clone(&state), "").await;
        assert_eq!(resp.status(), StatusCode::OK);

        let updated = body_json(resp).await;
        assert_eq!(updated["id"], 1);
        assert_eq!(updated["requesterEmail"], "c@d.edu");
        assert_eq!(updated["solved"], true);
    }

    #[tokio::test]
    async fn test_put_missing_key_is_not_found() {
        let state = test_state();
        let body = serde_json::json!({
            "requesterEmail": "c@d.edu",
            "teamId": "t9",
            "tableOrBreakoutRoom": "1",
            "explanation": "x",
            "solved": false,
            "requestTime": "2022-03-14T09:00:00"
        });

        let req = request(
            Method::PUT,
            "/api/helprequests?id=42",
            Some(Role::Admin),
            &body.to_string(),
        );
        let resp = handle_resource_request::<HelpRequest, _>(req, state, "").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_confirms_then_404s() {
        let state = test_state();
        create_sample(&state).await;

        let req = request(
            Method::DELETE,
            "/api/helprequests?id=1",
            Some(Role::Admin),
            "",
        );
        let resp = handle_resource_request::<HelpRequest, _>(req, Arc::clone(&state), "").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            body_json(resp).await["message"],
            "HelpRequest with id 1 deleted"
        );

        let req = request(
            Method::DELETE,
            "/api/helprequests?id=1",
            Some(Role::Admin),
            "",
        );
        let resp = handle_resource_request::<HelpRequest, _>(req, state, "").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_key_parameter_is_rejected() {
        let state = test_state();
        let req = request(Method::GET, "/api/helprequests", Some(Role::User), "");

        let resp = handle_resource_request::<HelpRequest, _>(req, state, "").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_organization_uses_org_code_parameter() {
        let state = test_state();

        let req = request(
            Method::POST,
            "/api/ucsborganizations/post?orgCode=ZPR&orgTranslationShort=Zeta+Phi+Rho\
             &orgTranslation=Zeta+Phi+Rho&inactive=false",
            Some(Role::Admin),
            "",
        );
        let resp =
            handle_resource_request::<UcsbOrganization, _>(req, Arc::clone(&state), "/post").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["orgCode"], "ZPR");

        let req = request(
            Method::GET,
            "/api/ucsborganizations?orgCode=ZPR",
            Some(Role::User),
            "",
        );
        let resp =
            handle_resource_request::<UcsbOrganization, _>(req, Arc::clone(&state), "").await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = request(
            Method::DELETE,
            "/api/ucsborganizations?orgCode=ZPR",
            Some(Role::Admin),
            "",
        );
        let resp = handle_resource_request::<UcsbOrganization, _>(req, state, "").await;
        assert_eq!(
            body_json(resp).await["message"],
            "UCSBOrganization with id ZPR deleted"
        );
    }

    #[tokio::test]
    async fn test_unknown_subpath_is_not_found() {
        let state = test_state();
        let req = request(Method::GET, "/api/helprequests/nope", Some(Role::User), "");

        let resp = handle_resource_request::<HelpRequest, _>(req, state, "/nope").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
