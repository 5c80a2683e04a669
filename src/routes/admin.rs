use askama::Template;
use askama_axum::IntoResponse as AskamaTemplateResponse;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    admin::{forms::FormData, AdminRow, ModelAdmin},
    error::AppError,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/:model", get(changelist))
        .route("/:model/add", get(add_form).post(add_submit))
        .route("/:model/:id", get(change_form).post(change_submit))
        .route("/:model/:id/delete", post(delete_submit))
}

#[derive(Clone)]
struct ModelLink {
    model: &'static str,
    verbose_name: &'static str,
}

#[derive(Template)]
#[template(path = "admin/index.html")]
struct AdminIndexTemplate {
    models: Vec<ModelLink>,
}

async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let models = state
        .admin
        .models()
        .iter()
        .map(|admin| ModelLink {
            model: admin.model(),
            verbose_name: admin.verbose_name(),
        })
        .collect();
    AskamaTemplateResponse::into_response(AdminIndexTemplate { models })
}

#[derive(Template)]
#[template(path = "admin/changelist.html")]
struct AdminChangelistTemplate {
    model: &'static str,
    verbose_name: &'static str,
    fields: Vec<&'static str>,
    rows: Vec<AdminRow>,
}

async fn changelist(
    State(state): State<AppState>,
    Path(model): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let admin = state.admin.find(&model)?;
    let rows = admin.list(&state.store).await?;
    Ok(AskamaTemplateResponse::into_response(
        AdminChangelistTemplate {
            model: admin.model(),
            verbose_name: admin.verbose_name(),
            fields: admin.fields().to_vec(),
            rows,
        },
    ))
}

#[derive(Clone)]
struct FormField {
    name: &'static str,
    value: String,
}

#[derive(Template)]
#[template(path = "admin/change_form.html")]
struct AdminChangeFormTemplate {
    model: &'static str,
    verbose_name: &'static str,
    has_record: bool,
    record_id: String,
    title: String,
    fields: Vec<FormField>,
    show_error: bool,
    error_message: String,
}

impl AdminChangeFormTemplate {
    fn blank(admin: &dyn ModelAdmin) -> Self {
        Self {
            model: admin.model(),
            verbose_name: admin.verbose_name(),
            has_record: false,
            record_id: String::new(),
            title: format!("Add {}", admin.verbose_name().to_lowercase()),
            fields: admin
                .fields()
                .iter()
                .map(|&name| FormField {
                    name,
                    value: String::new(),
                })
                .collect(),
            show_error: false,
            error_message: String::new(),
        }
    }

    fn for_row(admin: &dyn ModelAdmin, row: AdminRow) -> Self {
        Self {
            has_record: true,
            record_id: row.id,
            title: row.label,
            fields: admin
                .fields()
                .iter()
                .zip(row.cells)
                .map(|(&name, value)| FormField { name, value })
                .collect(),
            ..Self::blank(admin)
        }
    }

    fn with_submission(mut self, form: &FormData, message: String) -> Self {
        for field in &mut self.fields {
            field.value = form.get(field.name).cloned().unwrap_or_default();
        }
        self.show_error = true;
        self.error_message = message;
        self
    }
}

async fn add_form(
    State(state): State<AppState>,
    Path(model): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let admin = state.admin.find(&model)?;
    Ok(AskamaTemplateResponse::into_response(
        AdminChangeFormTemplate::blank(admin.as_ref()),
    ))
}

async fn add_submit(
    State(state): State<AppState>,
    Path(model): Path<String>,
    Form(form): Form<FormData>,
) -> Result<Response, AppError> {
    let admin = state.admin.find(&model)?;
    match admin.create(&state.store, &form).await {
        Ok(id) => {
            info!("admin added {} {id}", admin.model());
            Ok(Redirect::to(&format!("/admin/{}/{id}", admin.model())).into_response())
        }
        Err(err @ (AppError::Constraint(_) | AppError::BadRequest(_))) => Ok(render_form_error(
            AdminChangeFormTemplate::blank(admin.as_ref()),
            &form,
            err,
        )),
        Err(err) => Err(err),
    }
}

async fn change_form(
    State(state): State<AppState>,
    Path((model, id)): Path<(String, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    let admin = state.admin.find(&model)?;
    let row = admin.get(&state.store, id).await?;
    Ok(AskamaTemplateResponse::into_response(
        AdminChangeFormTemplate::for_row(admin.as_ref(), row),
    ))
}

async fn change_submit(
    State(state): State<AppState>,
    Path((model, id)): Path<(String, Uuid)>,
    Form(form): Form<FormData>,
) -> Result<Response, AppError> {
    let admin = state.admin.find(&model)?;
    match admin.update(&state.store, id, &form).await {
        Ok(()) => {
            info!("admin changed {} {id}", admin.model());
            Ok(Redirect::to(&format!("/admin/{}/{id}", admin.model())).into_response())
        }
        Err(err @ (AppError::Constraint(_) | AppError::BadRequest(_))) => {
            let row = admin.get(&state.store, id).await?;
            Ok(render_form_error(
                AdminChangeFormTemplate::for_row(admin.as_ref(), row),
                &form,
                err,
            ))
        }
        Err(err) => Err(err),
    }
}

async fn delete_submit(
    State(state): State<AppState>,
    Path((model, id)): Path<(String, Uuid)>,
) -> Result<Redirect, AppError> {
    let admin = state.admin.find(&model)?;
    admin.delete(&state.store, id).await?;
    info!("admin deleted {} {id}", admin.model());
    Ok(Redirect::to(&format!("/admin/{}", admin.model())))
}

/// Re-renders the form with the submitted values and the rejection reason.
fn render_form_error(
    template: AdminChangeFormTemplate,
    form: &FormData,
    err: AppError,
) -> Response {
    let (status, message) = match err {
        AppError::Constraint(violation) => (StatusCode::CONFLICT, violation.to_string()),
        AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    };
    (
        status,
        AskamaTemplateResponse::into_response(template.with_submission(form, message)),
    )
        .into_response()
}
