use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::{
    dto::{
        question_dto::{MoveQuestionPayload, QuestionPayload},
        wizard_dto::{
            AddScopePayload, BasicInfoPayload, OpenWizardPayload, SettingsPayload, SubmitPayload,
            SubmitResponse, UpdateScopePayload, WizardStateResponse,
        },
    },
    error::Result,
    models::caller::CallerContext,
    services::wizard_service::WizardController,
    AppState,
};

/// Applies `change` to the caller's wizard and answers with its new state.
fn apply(
    state: &AppState,
    caller: &CallerContext,
    id: Uuid,
    change: impl FnOnce(&mut WizardController) -> Result<()>,
) -> Result<Json<WizardStateResponse>> {
    state.wizard_sessions.with_wizard(caller, id, |wizard| {
        change(wizard)?;
        Ok(Json(WizardStateResponse::new(id, wizard)))
    })
}

#[utoipa::path(
    post,
    path = "/api/wizards",
    request_body = OpenWizardPayload,
    responses(
        (status = 201, description = "Wizard opened on the basic info step", body = Json<WizardStateResponse>),
        (status = 403, description = "Caller cannot author assessments")
    )
)]
#[axum::debug_handler]
pub async fn open_wizard(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Json(payload): Json<OpenWizardPayload>,
) -> Result<impl IntoResponse> {
    let response = state
        .wizard_sessions
        .open(&caller, payload.kind, WizardStateResponse::new)?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/wizards/{id}",
    params(
        ("id" = Uuid, Path, description = "Wizard session ID")
    ),
    responses(
        (status = 200, description = "Current step, step validity and draft", body = Json<WizardStateResponse>),
        (status = 404, description = "Wizard session not found")
    )
)]
#[axum::debug_handler]
pub async fn get_wizard(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    apply(&state, &caller, id, |_| Ok(()))
}

#[utoipa::path(
    delete,
    path = "/api/wizards/{id}",
    params(
        ("id" = Uuid, Path, description = "Wizard session ID")
    ),
    responses(
        (status = 204, description = "Wizard abandoned, draft discarded"),
        (status = 404, description = "Wizard session not found")
    )
)]
#[axum::debug_handler]
pub async fn discard_wizard(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.wizard_sessions.discard(&caller, id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/api/wizards/{id}/basic-info",
    params(
        ("id" = Uuid, Path, description = "Wizard session ID")
    ),
    request_body = BasicInfoPayload,
    responses(
        (status = 200, description = "Basic info stored", body = Json<WizardStateResponse>),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn update_basic_info(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BasicInfoPayload>,
) -> Result<impl IntoResponse> {
    apply(&state, &caller, id, |w| w.update_basic_info(payload))
}

#[utoipa::path(
    put,
    path = "/api/wizards/{id}/settings",
    params(
        ("id" = Uuid, Path, description = "Wizard session ID")
    ),
    request_body = SettingsPayload,
    responses(
        (status = 200, description = "Settings stored", body = Json<WizardStateResponse>),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn update_settings(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SettingsPayload>,
) -> Result<impl IntoResponse> {
    apply(&state, &caller, id, |w| w.update_settings(payload))
}

#[utoipa::path(
    post,
    path = "/api/wizards/{id}/questions",
    params(
        ("id" = Uuid, Path, description = "Wizard session ID")
    ),
    request_body = QuestionPayload,
    responses(
        (status = 200, description = "Question appended", body = Json<WizardStateResponse>),
        (status = 400, description = "Invalid question")
    )
)]
#[axum::debug_handler]
pub async fn add_question(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<Uuid>,
    Json(payload): Json<QuestionPayload>,
) -> Result<impl IntoResponse> {
    apply(&state, &caller, id, |w| w.add_question(payload).map(|_| ()))
}

#[utoipa::path(
    put,
    path = "/api/wizards/{id}/questions/{question_id}",
    params(
        ("id" = Uuid, Path, description = "Wizard session ID"),
        ("question_id" = Uuid, Path, description = "Question ID")
    ),
    request_body = QuestionPayload,
    responses(
        (status = 200, description = "Question replaced in place", body = Json<WizardStateResponse>),
        (status = 400, description = "Invalid question"),
        (status = 404, description = "Question not found")
    )
)]
#[axum::debug_handler]
pub async fn edit_question(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path((id, question_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<QuestionPayload>,
) -> Result<impl IntoResponse> {
    apply(&state, &caller, id, |w| {
        w.edit_question(question_id, payload).map(|_| ())
    })
}

#[utoipa::path(
    delete,
    path = "/api/wizards/{id}/questions/{question_id}",
    params(
        ("id" = Uuid, Path, description = "Wizard session ID"),
        ("question_id" = Uuid, Path, description = "Question ID")
    ),
    responses(
        (status = 200, description = "Question removed, remaining ones renumbered", body = Json<WizardStateResponse>),
        (status = 404, description = "Question not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_question(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path((id, question_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse> {
    apply(&state, &caller, id, |w| w.delete_question(question_id).map(|_| ()))
}

#[utoipa::path(
    post,
    path = "/api/wizards/{id}/questions/{question_id}/move",
    params(
        ("id" = Uuid, Path, description = "Wizard session ID"),
        ("question_id" = Uuid, Path, description = "Question ID")
    ),
    request_body = MoveQuestionPayload,
    responses(
        (status = 200, description = "Question moved", body = Json<WizardStateResponse>),
        (status = 400, description = "Target position out of range")
    )
)]
#[axum::debug_handler]
pub async fn move_question(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path((id, question_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<MoveQuestionPayload>,
) -> Result<impl IntoResponse> {
    apply(&state, &caller, id, |w| {
        w.move_question(question_id, payload.to).map(|_| ())
    })
}

#[utoipa::path(
    post,
    path = "/api/wizards/{id}/scopes",
    params(
        ("id" = Uuid, Path, description = "Wizard session ID")
    ),
    request_body = AddScopePayload,
    responses(
        (status = 200, description = "Institution added to the publishing scope", body = Json<WizardStateResponse>),
        (status = 400, description = "Empty classes or institution already targeted"),
        (status = 403, description = "Institution outside the caller's scope")
    )
)]
#[axum::debug_handler]
pub async fn add_scope(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddScopePayload>,
) -> Result<impl IntoResponse> {
    apply(&state, &caller, id, |w| {
        w.add_scope(&payload.institution_id, payload.class_ids)
            .map(|_| ())
    })
}

#[utoipa::path(
    put,
    path = "/api/wizards/{id}/scopes/{institution_id}",
    params(
        ("id" = Uuid, Path, description = "Wizard session ID"),
        ("institution_id" = String, Path, description = "Institution ID")
    ),
    request_body = UpdateScopePayload,
    responses(
        (status = 200, description = "Class selection replaced", body = Json<WizardStateResponse>),
        (status = 400, description = "Empty classes"),
        (status = 404, description = "Institution not in scope")
    )
)]
#[axum::debug_handler]
pub async fn update_scope(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path((id, institution_id)): Path<(Uuid, String)>,
    Json(payload): Json<UpdateScopePayload>,
) -> Result<impl IntoResponse> {
    apply(&state, &caller, id, |w| {
        w.update_scope(&institution_id, payload.class_ids).map(|_| ())
    })
}

#[utoipa::path(
    delete,
    path = "/api/wizards/{id}/scopes/{institution_id}",
    params(
        ("id" = Uuid, Path, description = "Wizard session ID"),
        ("institution_id" = String, Path, description = "Institution ID")
    ),
    responses(
        (status = 200, description = "Institution removed from scope", body = Json<WizardStateResponse>),
        (status = 404, description = "Institution not in scope")
    )
)]
#[axum::debug_handler]
pub async fn remove_scope(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path((id, institution_id)): Path<(Uuid, String)>,
) -> Result<impl IntoResponse> {
    apply(&state, &caller, id, |w| w.remove_scope(&institution_id).map(|_| ()))
}

#[utoipa::path(
    post,
    path = "/api/wizards/{id}/next",
    params(
        ("id" = Uuid, Path, description = "Wizard session ID")
    ),
    responses(
        (status = 200, description = "Moved to the following step", body = Json<WizardStateResponse>),
        (status = 400, description = "Current step incomplete"),
        (status = 409, description = "Already on the review step")
    )
)]
#[axum::debug_handler]
pub async fn next_step(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    apply(&state, &caller, id, |w| w.next().map(|_| ()))
}

#[utoipa::path(
    post,
    path = "/api/wizards/{id}/back",
    params(
        ("id" = Uuid, Path, description = "Wizard session ID")
    ),
    responses(
        (status = 200, description = "Moved to the preceding step", body = Json<WizardStateResponse>),
        (status = 409, description = "Already on the first step")
    )
)]
#[axum::debug_handler]
pub async fn previous_step(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    apply(&state, &caller, id, |w| w.back().map(|_| ()))
}

#[utoipa::path(
    post,
    path = "/api/wizards/{id}/submit",
    params(
        ("id" = Uuid, Path, description = "Wizard session ID")
    ),
    request_body = SubmitPayload,
    responses(
        (status = 201, description = "Assessment saved; wizard restarted", body = Json<SubmitResponse>),
        (status = 400, description = "Draft incomplete"),
        (status = 409, description = "Not on the review step")
    )
)]
#[axum::debug_handler]
pub async fn submit(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubmitPayload>,
) -> Result<impl IntoResponse> {
    let response = state.wizard_sessions.with_wizard(&caller, id, |wizard| {
        let assessment = state
            .assessment_service
            .submit(wizard, payload.as_draft, &caller)?;
        Ok(SubmitResponse {
            assessment: state.assessment_service.respond(assessment),
            wizard: WizardStateResponse::new(id, wizard),
        })
    })?;
    Ok((StatusCode::CREATED, Json(response)))
}
