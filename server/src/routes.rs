use actix_web::{delete, error, get, post, put, web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use tasko_shared::wire::{
    AuthResponse, CreateUserRequest, ErrorBody, LoginRequest, SavedTaskResponse, TaskListResponse,
    AUTH_HEADER,
};
use tasko_shared::{Task, TaskDraft};

use crate::error::ApiError;
use crate::state::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(ErrorBody::new(err.to_string()));
        error::InternalError::from_response(err, response).into()
    }))
    .service(login)
    .service(create_user)
    .service(fetch_all)
    .service(add_task)
    .service(update_task)
    .service(delete_task);
}

#[post("/api/auth/login")]
async fn login(state: web::Data<AppState>, body: web::Json<LoginRequest>) -> Result<impl Responder, ApiError> {
    let auth_token = state.login(body.email.trim(), &body.password)?;
    Ok(web::Json(AuthResponse { auth_token }))
}

#[post("/api/auth/createuser")]
async fn create_user(
    state: web::Data<AppState>,
    body: web::Json<CreateUserRequest>,
) -> Result<impl Responder, ApiError> {
    let CreateUserRequest { name, email, password } = body.into_inner();
    if name.trim().is_empty() || !email.contains('@') || password.len() < 5 {
        return Err(ApiError::BadRequest(
            "Name, a valid email and a password of at least 5 characters are required".to_string(),
        ));
    }

    let auth_token = state.create_user(name.trim(), email.trim(), &password)?;
    Ok(web::Json(AuthResponse { auth_token }))
}

#[get("/api/tasks/fetchalltask")]
async fn fetch_all(state: web::Data<AppState>, req: HttpRequest) -> Result<impl Responder, ApiError> {
    let tasks = state.tasks(token(&req)?)?;
    Ok(web::Json(TaskListResponse { tasks }))
}

#[post("/api/tasks/addtask")]
async fn add_task(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<TaskDraft>,
) -> Result<impl Responder, ApiError> {
    let token = token(&req)?;
    let draft = checked(body.into_inner())?;
    let saved_task = state.add_task(token, draft)?;
    log::debug!("added task {}", saved_task.id);
    Ok(web::Json(SavedTaskResponse { saved_task }))
}

#[put("/api/tasks/updatetask/{id}")]
async fn update_task(
    state: web::Data<AppState>,
    req: HttpRequest,
    id: web::Path<String>,
    body: web::Json<Task>,
) -> Result<impl Responder, ApiError> {
    let token = token(&req)?;
    let draft = checked(body.to_draft())?;
    let task = state.update_task(token, &id, draft)?;
    Ok(web::Json(task))
}

#[delete("/api/tasks/deletetask/{id}")]
async fn delete_task(
    state: web::Data<AppState>,
    req: HttpRequest,
    id: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let task = state.delete_task(token(&req)?, &id)?;
    Ok(web::Json(json!({"Success": "Task has been deleted", "task": task})))
}

fn token(req: &HttpRequest) -> Result<&str, ApiError> {
    req.headers()
        .get(AUTH_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .ok_or(ApiError::Unauthorized)
}

fn checked(draft: TaskDraft) -> Result<TaskDraft, ApiError> {
    if draft.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title is required".to_string()));
    }
    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::Value;
    use tasko_shared::TaskStatus;

    fn state_with_user() -> (web::Data<AppState>, String) {
        let state = web::Data::new(AppState::new());
        let token = state.create_user("Ana", "ana@example.com", "hunter2").unwrap();
        (state, token)
    }

    fn draft() -> Value {
        json!({
            "title": "Water plants",
            "description": "balcony",
            "status": "To Do",
            "priority": "Low",
            "dueDate": "2025-06-01"
        })
    }

    #[actix_web::test]
    async fn full_task_lifecycle() {
        let (state, token) = state_with_user();
        let app = test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/tasks/addtask")
            .insert_header((AUTH_HEADER, token.as_str()))
            .set_json(draft())
            .to_request();
        let saved: SavedTaskResponse = test::call_and_read_body_json(&app, req).await;
        let mut task = saved.saved_task;
        assert_eq!(task.title, "Water plants");

        task.status = TaskStatus::Completed;
        let req = test::TestRequest::put()
            .uri(&format!("/api/tasks/updatetask/{}", task.id))
            .insert_header((AUTH_HEADER, token.as_str()))
            .set_json(&task)
            .to_request();
        let updated: Task = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated, task);

        let req = test::TestRequest::get()
            .uri("/api/tasks/fetchalltask")
            .insert_header((AUTH_HEADER, token.as_str()))
            .to_request();
        let list: TaskListResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(list.tasks, vec![task.clone()]);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/tasks/deletetask/{}", task.id))
            .insert_header((AUTH_HEADER, token.as_str()))
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());

        let req = test::TestRequest::delete()
            .uri(&format!("/api/tasks/deletetask/{}", task.id))
            .insert_header((AUTH_HEADER, token.as_str()))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn task_routes_require_a_token() {
        let app = test::init_service(App::new().app_data(web::Data::new(AppState::new())).configure(configure)).await;

        let req = test::TestRequest::get().uri("/api/tasks/fetchalltask").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.error.as_deref(), Some("Please authenticate using a valid token"));
    }

    #[actix_web::test]
    async fn signup_over_http_and_rejections() {
        let app = test::init_service(App::new().app_data(web::Data::new(AppState::new())).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/auth/createuser")
            .set_json(json!({"name": "Ana", "email": "ana@example.com", "password": "hunter2"}))
            .to_request();
        let body: AuthResponse = test::call_and_read_body_json(&app, req).await;
        assert!(!body.auth_token.is_empty());

        let req = test::TestRequest::post()
            .uri("/api/auth/createuser")
            .set_json(json!({"name": "Ana", "email": "ana@example.com", "password": "hunter2"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"email": "ana@example.com", "password": "wrong"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"email": "ana@example.com", "password": "hunter2"}))
            .to_request();
        let body: AuthResponse = test::call_and_read_body_json(&app, req).await;
        assert!(!body.auth_token.is_empty());
    }

    #[actix_web::test]
    async fn out_of_range_status_is_a_json_error() {
        let (state, token) = state_with_user();
        let app = test::init_service(App::new().app_data(state).configure(configure)).await;

        let mut body = draft();
        body["status"] = json!("Blocked");
        let req = test::TestRequest::post()
            .uri("/api/tasks/addtask")
            .insert_header((AUTH_HEADER, token.as_str()))
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: ErrorBody = test::read_body_json(resp).await;
        assert!(body.error.is_some());
    }

    #[actix_web::test]
    async fn users_do_not_see_each_others_tasks() {
        let (state, first) = state_with_user();
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;
        let other = state.create_user("Bo", "bo@example.com", "secret").unwrap();

        let req = test::TestRequest::post()
            .uri("/api/tasks/addtask")
            .insert_header((AUTH_HEADER, first.as_str()))
            .set_json(draft())
            .to_request();
        let saved: SavedTaskResponse = test::call_and_read_body_json(&app, req).await;

        assert!(state.tasks(&other).unwrap().is_empty());
        assert!(matches!(
            state.delete_task(&other, &saved.saved_task.id),
            Err(ApiError::NotFound)
        ));
    }
}
