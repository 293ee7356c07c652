//! Casting job API handlers.
//!
//! ```text
//! POST   /casting {"recruiterId":"...","title":"..."}
//! GET    /casting?limit=20&lastKey=...
//! GET    /casting/search?q=lead&category=film
//! GET    /casting/recruiter/{recruiterId}
//! GET    /casting/{jobId}
//! PUT    /casting/{jobId}
//! DELETE /casting/{jobId}
//! PUT    /casting/{jobId}/view
//! POST   /casting/{jobId}/apply {"userId":"..."}
//! GET    /casting/{jobId}/applications
//! PUT    /casting/{jobId}/applications/{applicationId}/status {"status":"shortlisted"}
//! POST   /casting/{jobId}/documents {"name":"...","url":"..."}
//! DELETE /casting/{jobId}/documents/{documentId}
//! POST   /casting/{jobId}/requirements {"description":"..."}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Application, ApplicationStatus, CASTING_PATCH_FIELDS, CastingJob, CastingSearch, FieldPatch,
    JobCategory, JobType, ListEntry, NewCastingJob,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{self, Envelope};
use crate::inbound::http::schemas::{
    ApplicationSchema, CastingJobSchema, ErrorSchema, ListEntrySchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    PageQuery, encode_last_key, map_casting_validation_error, map_patch_error,
    map_search_validation_error, missing_field_error, parse_job_id, parse_limit, parse_user_id,
    parse_uuid, take_required_str,
};

/// Request body for `POST /casting`.
///
/// `recruiterId` and `title` are required. `recruiterInfo`, when present,
/// becomes the first entry of the job's recruiter info list.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub recruiter_id: Option<String>,
    #[schema(example = "Lead in indie feature")]
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(example = "film")]
    pub category: Option<String>,
    #[schema(example = "contract")]
    pub job_type: Option<String>,
    pub location: Option<String>,
    pub compensation: Option<Value>,
    pub deadline: Option<String>,
    #[schema(example = "open")]
    pub status: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub recruiter_info: Option<Map<String, Value>>,
}

impl CreateJobRequest {
    fn into_draft(self) -> ApiResult<NewCastingJob> {
        let recruiter_id = self
            .recruiter_id
            .ok_or_else(|| missing_field_error("recruiterId"))?;
        let recruiter_id = parse_user_id(&recruiter_id, "recruiterId")?;
        let title = self.title.ok_or_else(|| missing_field_error("title"))?;
        let category = self
            .category
            .as_deref()
            .map(str::parse::<JobCategory>)
            .transpose()
            .map_err(map_casting_validation_error)?;
        let job_type = self
            .job_type
            .as_deref()
            .map(str::parse::<JobType>)
            .transpose()
            .map_err(map_casting_validation_error)?;
        let draft = NewCastingJob::new(recruiter_id, title).map_err(map_casting_validation_error)?;
        Ok(NewCastingJob {
            description: self.description,
            category,
            job_type,
            location: self.location,
            compensation: self.compensation,
            deadline: self.deadline,
            status: self.status,
            recruiter_info: self.recruiter_info,
            ..draft
        })
    }
}

/// Request body for the application status update.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ApplicationStatusRequest {
    #[schema(example = "shortlisted")]
    pub status: Option<String>,
}

/// `{job}` payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct JobResponse {
    #[schema(value_type = CastingJobSchema)]
    pub job: CastingJob,
}

/// `{jobs, count, lastKey}` payload of the paged listing.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobPageResponse {
    #[schema(value_type = Vec<CastingJobSchema>)]
    pub jobs: Vec<CastingJob>,
    pub count: usize,
    /// Token for the next page; `null` on the last page.
    pub last_key: Option<String>,
}

/// `{jobs, count}` payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct JobListResponse {
    #[schema(value_type = Vec<CastingJobSchema>)]
    pub jobs: Vec<CastingJob>,
    pub count: usize,
}

/// `{jobId}` payload confirming a deletion.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobDeletedResponse {
    pub job_id: String,
}

/// `{views}` payload of a view increment.
#[derive(Debug, Serialize, ToSchema)]
pub struct JobViewsResponse {
    pub views: u64,
}

/// `{application}` payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApplicationResponse {
    #[schema(value_type = ApplicationSchema)]
    pub application: Application,
}

/// `{applications, count}` payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApplicationListResponse {
    #[schema(value_type = Vec<ApplicationSchema>)]
    pub applications: Vec<Application>,
    pub count: usize,
}

/// `{document}` payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentResponse {
    #[schema(value_type = ListEntrySchema)]
    pub document: ListEntry,
}

/// `{documentId}` payload confirming a removal.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRemovedResponse {
    pub document_id: String,
}

/// `{requirement}` payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct RequirementResponse {
    #[schema(value_type = ListEntrySchema)]
    pub requirement: ListEntry,
}

/// Query string of `GET /casting/search`; at least one filter is required.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct JobSearchQuery {
    /// Text matched against title and description.
    pub q: Option<String>,
    pub category: Option<String>,
    pub job_type: Option<String>,
    pub location: Option<String>,
    /// Maximum number of matches, 1 to 100.
    pub limit: Option<usize>,
}

/// Publish a casting job.
#[utoipa::path(
    post,
    path = "/casting",
    request_body = CreateJobRequest,
    responses(
        (status = 201, description = "Job created", body = Envelope<JobResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["casting"],
    operation_id = "createJob"
)]
#[post("/casting")]
pub async fn create_job(
    state: web::Data<HttpState>,
    payload: web::Json<CreateJobRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft()?;
    let job = state.casting.create_job(draft).await?;
    Ok(envelope::created("Casting job created successfully", JobResponse { job }))
}

/// List casting jobs one page at a time.
#[utoipa::path(
    get,
    path = "/casting",
    params(PageQuery),
    responses(
        (status = 200, description = "Jobs", body = Envelope<JobPageResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["casting"],
    operation_id = "listJobs"
)]
#[get("/casting")]
pub async fn list_jobs(
    state: web::Data<HttpState>,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let request = query.into_inner().into_request()?;
    let page = state.casting_query.list_jobs(request).await?;
    let last_key = encode_last_key(page.next.as_ref())?;
    Ok(envelope::ok(
        "Casting jobs retrieved successfully",
        JobPageResponse {
            count: page.items.len(),
            jobs: page.items,
            last_key,
        },
    ))
}

/// Search casting jobs.
#[utoipa::path(
    get,
    path = "/casting/search",
    params(JobSearchQuery),
    responses(
        (status = 200, description = "Matching jobs", body = Envelope<JobListResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["casting"],
    operation_id = "searchJobs"
)]
#[get("/casting/search")]
pub async fn search_jobs(
    state: web::Data<HttpState>,
    query: web::Query<JobSearchQuery>,
) -> ApiResult<HttpResponse> {
    let JobSearchQuery {
        q,
        category,
        job_type,
        location,
        limit,
    } = query.into_inner();
    let category = category
        .as_deref()
        .map(str::parse::<JobCategory>)
        .transpose()
        .map_err(map_casting_validation_error)?;
    let job_type = job_type
        .as_deref()
        .map(str::parse::<JobType>)
        .transpose()
        .map_err(map_casting_validation_error)?;
    let search = CastingSearch::new(
        q.as_deref(),
        category,
        job_type,
        location.as_deref(),
        parse_limit(limit)?,
    )
    .map_err(map_search_validation_error)?;
    let jobs = state.casting_query.search_jobs(search).await?;
    Ok(envelope::ok(
        "Search completed successfully",
        JobListResponse {
            count: jobs.len(),
            jobs,
        },
    ))
}

/// Every job posted by one recruiter.
#[utoipa::path(
    get,
    path = "/casting/recruiter/{recruiterId}",
    params(("recruiterId" = String, Path, description = "Recruiter user id")),
    responses(
        (status = 200, description = "Jobs", body = Envelope<JobListResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["casting"],
    operation_id = "jobsForRecruiter"
)]
#[get("/casting/recruiter/{recruiter_id}")]
pub async fn jobs_for_recruiter(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let recruiter_id = parse_user_id(&path, "recruiterId")?;
    let jobs = state.casting_query.jobs_for_recruiter(&recruiter_id).await?;
    Ok(envelope::ok(
        "Recruiter jobs retrieved successfully",
        JobListResponse {
            count: jobs.len(),
            jobs,
        },
    ))
}

/// Fetch one job.
#[utoipa::path(
    get,
    path = "/casting/{jobId}",
    params(("jobId" = String, Path, description = "Job id")),
    responses(
        (status = 200, description = "Job", body = Envelope<JobResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["casting"],
    operation_id = "getJob"
)]
#[get("/casting/{job_id}")]
pub async fn get_job(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_job_id(&path, "jobId")?;
    let job = state.casting_query.fetch_job(&id).await?;
    Ok(envelope::ok("Casting job retrieved successfully", JobResponse { job }))
}

/// Replace the supplied top-level fields of a job.
#[utoipa::path(
    put,
    path = "/casting/{jobId}",
    params(("jobId" = String, Path, description = "Job id")),
    request_body = Object,
    responses(
        (status = 200, description = "Updated job", body = Envelope<JobResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["casting"],
    operation_id = "updateJob"
)]
#[put("/casting/{job_id}")]
pub async fn update_job(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<Map<String, Value>>,
) -> ApiResult<HttpResponse> {
    let id = parse_job_id(&path, "jobId")?;
    let patch = FieldPatch::from_body(payload.into_inner(), CASTING_PATCH_FIELDS)
        .map_err(map_patch_error)?;
    let job = state.casting.update_job(&id, patch).await?;
    Ok(envelope::ok("Casting job updated successfully", JobResponse { job }))
}

/// Delete a job.
#[utoipa::path(
    delete,
    path = "/casting/{jobId}",
    params(("jobId" = String, Path, description = "Job id")),
    responses(
        (status = 200, description = "Job deleted", body = Envelope<JobDeletedResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["casting"],
    operation_id = "deleteJob"
)]
#[delete("/casting/{job_id}")]
pub async fn delete_job(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_job_id(&path, "jobId")?;
    state.casting.delete_job(&id).await?;
    Ok(envelope::ok(
        "Casting job deleted successfully",
        JobDeletedResponse {
            job_id: id.to_string(),
        },
    ))
}

/// Count a job view.
#[utoipa::path(
    put,
    path = "/casting/{jobId}/view",
    params(("jobId" = String, Path, description = "Job id")),
    responses(
        (status = 200, description = "New view count", body = Envelope<JobViewsResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["casting"],
    operation_id = "recordJobView"
)]
#[put("/casting/{job_id}/view")]
pub async fn record_job_view(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_job_id(&path, "jobId")?;
    let views = state.casting.record_view(&id).await?;
    Ok(envelope::ok("View recorded successfully", JobViewsResponse { views }))
}

/// Apply to a job as the user named by `userId`.
///
/// Fields other than `userId` are stored on the application.
#[utoipa::path(
    post,
    path = "/casting/{jobId}/apply",
    params(("jobId" = String, Path, description = "Job id")),
    request_body = Object,
    responses(
        (status = 201, description = "Application submitted", body = Envelope<ApplicationResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Job or user not found", body = ErrorSchema),
        (status = 409, description = "Already applied", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["casting"],
    operation_id = "applyToJob"
)]
#[post("/casting/{job_id}/apply")]
pub async fn apply_to_job(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<Map<String, Value>>,
) -> ApiResult<HttpResponse> {
    let id = parse_job_id(&path, "jobId")?;
    let mut fields = payload.into_inner();
    let user_id = take_required_str(&mut fields, "userId")?;
    let user_id = parse_user_id(&user_id, "userId")?;
    let application = state.casting.apply(&id, &user_id, fields).await?;
    Ok(envelope::created(
        "Application submitted successfully",
        ApplicationResponse { application },
    ))
}

/// Applications received by a job.
#[utoipa::path(
    get,
    path = "/casting/{jobId}/applications",
    params(("jobId" = String, Path, description = "Job id")),
    responses(
        (status = 200, description = "Applications", body = Envelope<ApplicationListResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["casting"],
    operation_id = "listApplications"
)]
#[get("/casting/{job_id}/applications")]
pub async fn list_applications(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_job_id(&path, "jobId")?;
    let applications = state.casting_query.applications(&id).await?;
    Ok(envelope::ok(
        "Applications retrieved successfully",
        ApplicationListResponse {
            count: applications.len(),
            applications,
        },
    ))
}

/// Move an application to a new review state.
#[utoipa::path(
    put,
    path = "/casting/{jobId}/applications/{applicationId}/status",
    params(
        ("jobId" = String, Path, description = "Job id"),
        ("applicationId" = String, Path, description = "Application id")
    ),
    request_body = ApplicationStatusRequest,
    responses(
        (status = 200, description = "Updated application", body = Envelope<ApplicationResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["casting"],
    operation_id = "updateApplicationStatus"
)]
#[put("/casting/{job_id}/applications/{application_id}/status")]
pub async fn update_application_status(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
    payload: web::Json<ApplicationStatusRequest>,
) -> ApiResult<HttpResponse> {
    let (job_id, application_id) = path.into_inner();
    let id = parse_job_id(&job_id, "jobId")?;
    let application_id = parse_uuid(&application_id, "applicationId")?;
    let status = payload
        .into_inner()
        .status
        .ok_or_else(|| missing_field_error("status"))?
        .parse::<ApplicationStatus>()
        .map_err(map_casting_validation_error)?;
    let application = state
        .casting
        .update_application_status(&id, &application_id, status)
        .await?;
    Ok(envelope::ok(
        "Application status updated successfully",
        ApplicationResponse { application },
    ))
}

/// Attach a document to a job.
#[utoipa::path(
    post,
    path = "/casting/{jobId}/documents",
    params(("jobId" = String, Path, description = "Job id")),
    request_body = Object,
    responses(
        (status = 201, description = "Document added", body = Envelope<DocumentResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["casting"],
    operation_id = "addDocument"
)]
#[post("/casting/{job_id}/documents")]
pub async fn add_document(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<Map<String, Value>>,
) -> ApiResult<HttpResponse> {
    let id = parse_job_id(&path, "jobId")?;
    let document = state.casting.add_document(&id, payload.into_inner()).await?;
    Ok(envelope::created(
        "Document added successfully",
        DocumentResponse { document },
    ))
}

/// Detach a document from a job.
#[utoipa::path(
    delete,
    path = "/casting/{jobId}/documents/{documentId}",
    params(
        ("jobId" = String, Path, description = "Job id"),
        ("documentId" = String, Path, description = "Document id")
    ),
    responses(
        (status = 200, description = "Document removed", body = Envelope<DocumentRemovedResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["casting"],
    operation_id = "removeDocument"
)]
#[delete("/casting/{job_id}/documents/{document_id}")]
pub async fn remove_document(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (job_id, document_id) = path.into_inner();
    let id = parse_job_id(&job_id, "jobId")?;
    let document_id = parse_uuid(&document_id, "documentId")?;
    state.casting.remove_document(&id, &document_id).await?;
    Ok(envelope::ok(
        "Document removed successfully",
        DocumentRemovedResponse {
            document_id: document_id.to_string(),
        },
    ))
}

/// Add a requirement to a job.
#[utoipa::path(
    post,
    path = "/casting/{jobId}/requirements",
    params(("jobId" = String, Path, description = "Job id")),
    request_body = Object,
    responses(
        (status = 201, description = "Requirement added", body = Envelope<RequirementResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["casting"],
    operation_id = "addRequirement"
)]
#[post("/casting/{job_id}/requirements")]
pub async fn add_requirement(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<Map<String, Value>>,
) -> ApiResult<HttpResponse> {
    let id = parse_job_id(&path, "jobId")?;
    let requirement = state
        .casting
        .add_requirement(&id, payload.into_inner())
        .await?;
    Ok(envelope::created(
        "Requirement added successfully",
        RequirementResponse { requirement },
    ))
}

/// Register every casting route; fixed segments precede `/casting/{jobId}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_job)
        .service(list_jobs)
        .service(search_jobs)
        .service(jobs_for_recruiter)
        .service(get_job)
        .service(update_job)
        .service(delete_job)
        .service(record_job_view)
        .service(apply_to_job)
        .service(list_applications)
        .service(update_application_status)
        .service(add_document)
        .service(remove_document)
        .service(add_requirement);
}
