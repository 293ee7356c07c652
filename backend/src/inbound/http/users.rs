//! User profile API handlers.
//!
//! ```text
//! POST   /users {"username":"ada","email":"ada@example.com"}
//! GET    /users?limit=20&lastKey=...
//! GET    /users/search?q=ada&type=username
//! GET    /users/username/{username}
//! GET    /users/{id}
//! PUT    /users/{id} {"bio":"..."}
//! DELETE /users/{id}
//! PUT    /users/{id}/view
//! POST   /users/{id}/work-experience {"title":"..."}
//! POST   /users/{id}/portfolio {"title":"..."}
//! POST   /users/{id}/connections {"userId":"..."}
//! POST   /users/{id}/connection-requests {"toUserId":"..."}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::AppendedEntry;
use crate::domain::{
    Email, FieldPatch, ListEntry, NewUserProfile, USER_PATCH_FIELDS, UserProfile, UserSearch,
    UserSearchType, Username,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{self, Envelope};
use crate::inbound::http::schemas::{ErrorSchema, ListEntrySchema, UserProfileSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    PageQuery, encode_last_key, map_patch_error, map_search_validation_error,
    map_user_validation_error, missing_field_error, parse_limit, parse_user_id, take_required_str,
};

/// Request body for `POST /users`.
///
/// `username` and `email` are required; every other field is optional and
/// stored as sent.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[schema(example = "ada")]
    pub username: Option<String>,
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    pub basic_details: Option<Value>,
    pub contact_details: Option<Value>,
    pub physical_stats: Option<Value>,
    pub skills: Option<Value>,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
    pub user_type: Option<String>,
}

impl CreateUserRequest {
    fn into_draft(self) -> ApiResult<NewUserProfile> {
        let username = self
            .username
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| missing_field_error("username"))?;
        let email = self
            .email
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| missing_field_error("email"))?;
        let username = Username::new(username).map_err(map_user_validation_error)?;
        let email = Email::new(email).map_err(map_user_validation_error)?;
        Ok(NewUserProfile {
            basic_details: self.basic_details,
            contact_details: self.contact_details,
            physical_stats: self.physical_stats,
            skills: self.skills,
            bio: self.bio,
            profile_picture: self.profile_picture,
            user_type: self.user_type,
            ..NewUserProfile::new(username, email)
        })
    }
}

/// `{user}` payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(value_type = UserProfileSchema)]
    pub user: UserProfile,
}

/// `{users, count, lastKey}` payload of the paged listing.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPageResponse {
    #[schema(value_type = Vec<UserProfileSchema>)]
    pub users: Vec<UserProfile>,
    pub count: usize,
    /// Token for the next page; `null` on the last page.
    pub last_key: Option<String>,
}

/// `{users, count}` payload of a search.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserSearchResponse {
    #[schema(value_type = Vec<UserProfileSchema>)]
    pub users: Vec<UserProfile>,
    pub count: usize,
}

/// `{userId}` payload confirming a deletion.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDeletedResponse {
    pub user_id: String,
}

/// `{views}` payload of a view increment.
#[derive(Debug, Serialize, ToSchema)]
pub struct ViewsResponse {
    pub views: u64,
}

/// `{workExperience, user}` payload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperienceResponse {
    #[schema(value_type = ListEntrySchema)]
    pub work_experience: ListEntry,
    #[schema(value_type = UserProfileSchema)]
    pub user: UserProfile,
}

/// `{portfolioItem, user}` payload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioResponse {
    #[schema(value_type = ListEntrySchema)]
    pub portfolio_item: ListEntry,
    #[schema(value_type = UserProfileSchema)]
    pub user: UserProfile,
}

/// `{connection, user}` payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConnectionResponse {
    #[schema(value_type = ListEntrySchema)]
    pub connection: ListEntry,
    #[schema(value_type = UserProfileSchema)]
    pub user: UserProfile,
}

/// `{connectionRequest}` payload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRequestResponse {
    #[schema(value_type = ListEntrySchema)]
    pub connection_request: ListEntry,
}

/// Query string of `GET /users/search`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserSearchQuery {
    /// Text to look for, case-insensitively.
    pub q: Option<String>,
    /// One of `all`, `username`, `name`, `email`, `location`, `skills`.
    #[serde(rename = "type")]
    #[param(rename = "type")]
    pub kind: Option<String>,
    /// Maximum number of matches, 1 to 100.
    pub limit: Option<usize>,
}

/// Create a user profile.
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Profile created", body = Envelope<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Username taken", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft()?;
    let user = state.users.create_profile(draft).await?;
    Ok(envelope::created("User created successfully", UserResponse { user }))
}

/// List user profiles one page at a time.
#[utoipa::path(
    get,
    path = "/users",
    params(PageQuery),
    responses(
        (status = 200, description = "Profiles", body = Envelope<UserPageResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let request = query.into_inner().into_request()?;
    let page = state.users_query.list_profiles(request).await?;
    let last_key = encode_last_key(page.next.as_ref())?;
    Ok(envelope::ok(
        "Users retrieved successfully",
        UserPageResponse {
            count: page.items.len(),
            users: page.items,
            last_key,
        },
    ))
}

/// Search user profiles by text.
#[utoipa::path(
    get,
    path = "/users/search",
    params(UserSearchQuery),
    responses(
        (status = 200, description = "Matching profiles", body = Envelope<UserSearchResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "searchUsers"
)]
#[get("/users/search")]
pub async fn search_users(
    state: web::Data<HttpState>,
    query: web::Query<UserSearchQuery>,
) -> ApiResult<HttpResponse> {
    let UserSearchQuery { q, kind, limit } = query.into_inner();
    let q = q.ok_or_else(|| missing_field_error("q"))?;
    let kind = kind
        .as_deref()
        .map(str::parse::<UserSearchType>)
        .transpose()
        .map_err(map_search_validation_error)?
        .unwrap_or_default();
    let search = UserSearch::new(&q, kind, parse_limit(limit)?)
        .map_err(map_search_validation_error)?;
    let users = state.users_query.search_profiles(search).await?;
    Ok(envelope::ok(
        "Search completed successfully",
        UserSearchResponse {
            count: users.len(),
            users,
        },
    ))
}

/// Fetch a profile by username.
#[utoipa::path(
    get,
    path = "/users/username/{username}",
    params(("username" = String, Path, description = "Username to look up")),
    responses(
        (status = 200, description = "Profile", body = Envelope<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUserByUsername"
)]
#[get("/users/username/{username}")]
pub async fn get_user_by_username(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let username = Username::new(path.into_inner()).map_err(map_user_validation_error)?;
    let user = state.users_query.fetch_by_username(&username).await?;
    Ok(envelope::ok("User retrieved successfully", UserResponse { user }))
}

/// Fetch a profile by id.
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Profile", body = Envelope<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path, "id")?;
    let user = state.users_query.fetch_profile(&id).await?;
    Ok(envelope::ok("User retrieved successfully", UserResponse { user }))
}

/// Replace the supplied top-level fields of a profile.
///
/// Unknown fields are ignored; a body with no updatable field is rejected.
#[utoipa::path(
    put,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User id")),
    request_body = Object,
    responses(
        (status = 200, description = "Updated profile", body = Envelope<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Username taken", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<Map<String, Value>>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path, "id")?;
    let patch =
        FieldPatch::from_body(payload.into_inner(), USER_PATCH_FIELDS).map_err(map_patch_error)?;
    let user = state.users.update_profile(&id, patch).await?;
    Ok(envelope::ok("User updated successfully", UserResponse { user }))
}

/// Delete a profile.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Profile deleted", body = Envelope<UserDeletedResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path, "id")?;
    state.users.delete_profile(&id).await?;
    Ok(envelope::ok(
        "User deleted successfully",
        UserDeletedResponse {
            user_id: id.to_string(),
        },
    ))
}

/// Count a profile view.
#[utoipa::path(
    put,
    path = "/users/{id}/view",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "New view count", body = Envelope<ViewsResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "recordUserView"
)]
#[put("/users/{id}/view")]
pub async fn record_user_view(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path, "id")?;
    let views = state.users.record_view(&id).await?;
    Ok(envelope::ok("View recorded successfully", ViewsResponse { views }))
}

/// Append a work experience entry.
#[utoipa::path(
    post,
    path = "/users/{id}/work-experience",
    params(("id" = String, Path, description = "User id")),
    request_body = Object,
    responses(
        (status = 201, description = "Entry added", body = Envelope<WorkExperienceResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "addWorkExperience"
)]
#[post("/users/{id}/work-experience")]
pub async fn add_work_experience(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<Map<String, Value>>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path, "id")?;
    let AppendedEntry { entry, profile } = state
        .users
        .add_work_experience(&id, payload.into_inner())
        .await?;
    Ok(envelope::created(
        "Work experience added successfully",
        WorkExperienceResponse {
            work_experience: entry,
            user: profile,
        },
    ))
}

/// Append a portfolio item.
#[utoipa::path(
    post,
    path = "/users/{id}/portfolio",
    params(("id" = String, Path, description = "User id")),
    request_body = Object,
    responses(
        (status = 201, description = "Item added", body = Envelope<PortfolioResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "addPortfolioItem"
)]
#[post("/users/{id}/portfolio")]
pub async fn add_portfolio_item(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<Map<String, Value>>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path, "id")?;
    let AppendedEntry { entry, profile } = state
        .users
        .add_portfolio_item(&id, payload.into_inner())
        .await?;
    Ok(envelope::created(
        "Portfolio item added successfully",
        PortfolioResponse {
            portfolio_item: entry,
            user: profile,
        },
    ))
}

/// Record a connection with the user named by `userId`.
#[utoipa::path(
    post,
    path = "/users/{id}/connections",
    params(("id" = String, Path, description = "User id")),
    request_body = Object,
    responses(
        (status = 201, description = "Connection added", body = Envelope<ConnectionResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Already connected", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "addConnection"
)]
#[post("/users/{id}/connections")]
pub async fn add_connection(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<Map<String, Value>>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path, "id")?;
    let mut fields = payload.into_inner();
    let target = take_required_str(&mut fields, "userId")?;
    let target = parse_user_id(&target, "userId")?;
    let AppendedEntry { entry, profile } =
        state.users.add_connection(&id, &target, fields).await?;
    Ok(envelope::created(
        "Connection added successfully",
        ConnectionResponse {
            connection: entry,
            user: profile,
        },
    ))
}

/// Send a connection request to the user named by `toUserId`.
#[utoipa::path(
    post,
    path = "/users/{id}/connection-requests",
    params(("id" = String, Path, description = "Sender user id")),
    request_body = Object,
    responses(
        (status = 201, description = "Request sent", body = Envelope<ConnectionRequestResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "sendConnectionRequest"
)]
#[post("/users/{id}/connection-requests")]
pub async fn send_connection_request(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<Map<String, Value>>,
) -> ApiResult<HttpResponse> {
    let sender = parse_user_id(&path, "id")?;
    let mut fields = payload.into_inner();
    let receiver = take_required_str(&mut fields, "toUserId")?;
    let receiver = parse_user_id(&receiver, "toUserId")?;
    let connection_request = state
        .users
        .send_connection_request(&sender, &receiver, fields)
        .await?;
    Ok(envelope::created(
        "Connection request sent successfully",
        ConnectionRequestResponse { connection_request },
    ))
}

/// Register every user route; fixed segments precede `/users/{id}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_user)
        .service(list_users)
        .service(search_users)
        .service(get_user_by_username)
        .service(get_user)
        .service(update_user)
        .service(delete_user)
        .service(record_user_view)
        .service(add_work_experience)
        .service(add_portfolio_item)
        .service(add_connection)
        .service(send_connection_request);
}

#[cfg(test)]
mod tests;
