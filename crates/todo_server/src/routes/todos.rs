//! `/api/todos` handlers.
//!
//! Responses always use the contract shape from `todo_core::contract`.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use log::debug;
use todo_core::{to_contract_list, to_contract_todo, ContractTodo, CreateTodoRequest};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/todos", get(list_todos).post(create_todo))
        .route("/api/todos/{id}", get(get_todo))
}

async fn list_todos(State(state): State<AppState>) -> AppResult<Json<Vec<ContractTodo>>> {
    let todos = state
        .with_todo_service(|service| service.get_all_todos())
        .await?;
    Ok(Json(to_contract_list(&todos)))
}

async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ContractTodo>)> {
    let Json(request) = payload.map_err(|rejection| {
        debug!("event=http_request module=http status=rejected reason={rejection}");
        AppError::BadRequest("Invalid request body".to_string())
    })?;

    let todo = state
        .with_todo_service(move |service| service.create_todo(&request))
        .await?;
    Ok((StatusCode::CREATED, Json(to_contract_todo(&todo))))
}

async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ContractTodo>> {
    let todo = state
        .with_todo_service(move |service| service.get_todo_by_id(&id))
        .await?;
    Ok(Json(to_contract_todo(&todo)))
}
