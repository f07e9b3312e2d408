//! A todo list that reports every change with a toast.

use askama::Template;
use salvo::prelude::*;
use toasted::prelude::*;

mod config;
mod store;

use self::config::{Config, Toasts, toast_options};
use self::store::{Todo, TodoStore};

const DELETE_INTENT: &str = "Delete";

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    todos: Vec<Todo>,
    toast: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    let toasts = match config.toasts() {
        Ok(toasts) => toasts,
        Err(e) => {
            tracing::error!(error = %e, "invalid toast configuration");
            return;
        }
    };
    let acceptor = TcpListener::new(config.listen.clone()).bind().await;
    Server::new(acceptor).serve(route(toasts, TodoStore::new())).await;
}

fn route(toasts: Toasts, store: TodoStore) -> Router {
    Router::new()
        .hoop(affix_state::inject(toasts).inject(store).inject(toast_options()))
        .get(list_todos)
        .post(change_todos)
}

fn obtain<T: Send + Sync + 'static>(depot: &Depot) -> Result<&T, StatusError> {
    depot.obtain::<T>().map_err(|_| {
        tracing::error!(kind = std::any::type_name::<T>(), "missing injected state");
        StatusError::internal_server_error()
    })
}

fn internal_error(e: impl std::fmt::Display) -> StatusError {
    tracing::error!(error = %e, "render todos failed");
    StatusError::internal_server_error()
}

#[handler]
async fn list_todos(req: &mut Request, depot: &mut Depot, res: &mut Response) -> Result<(), StatusError> {
    let toasts = obtain::<Toasts>(depot)?;
    let store = obtain::<TodoStore>(depot)?;
    let options = obtain::<ToastOptions>(depot)?;

    let toast = toasts
        .consume_request(req, res.headers_mut())
        .await
        .map_err(internal_error)?;
    let page = IndexTemplate {
        todos: store.read_all(),
        toast: render_toast(options, toast.as_ref()).map_err(internal_error)?,
    };
    res.render(Text::Html(page.render().map_err(internal_error)?));
    Ok(())
}

#[handler]
async fn change_todos(req: &mut Request, depot: &mut Depot, res: &mut Response) -> Result<(), StatusError> {
    let toasts = obtain::<Toasts>(depot)?;
    let store = obtain::<TodoStore>(depot)?;

    let toast = if req.form::<String>("intent").await.as_deref() == Some(DELETE_INTENT) {
        let Some(id) = req.form::<String>("id").await else {
            return Err(StatusError::bad_request().brief("missing todo id"));
        };
        let Ok(id) = id.trim().parse::<u64>() else {
            tracing::debug!(%id, "todo id is not a number");
            return Err(StatusError::bad_request().brief("todo id must be a number"));
        };
        tracing::debug!(id, "delete todo");
        if store.delete(id) {
            Toast::success("Todo deleted")
        } else {
            Toast::error("Todo not found")
        }
    } else {
        let Some(message) = req.form::<String>("new_todo").await else {
            return Err(StatusError::bad_request().brief("missing new_todo"));
        };
        let message = message.trim();
        if message.is_empty() {
            Toast::error("A todo needs some text")
        } else {
            let id = store.create(message);
            tracing::debug!(id, "create todo");
            Toast::success("Todo created")
        }
    };

    toasts
        .redirect_with_flash(res, "/", &toast)
        .await
        .map_err(internal_error)
}

#[cfg(test)]
mod tests {
    use salvo::http::header::{COOKIE, LOCATION, SET_COOKIE};
    use salvo::test::{ResponseExt, TestClient};

    use super::*;

    const URL: &str = "http://127.0.0.1:5800/";

    fn service() -> Service {
        let toasts = Config::default().toasts().unwrap();
        Service::new(route(toasts, TodoStore::new()))
    }

    fn request_cookie(res: &Response) -> String {
        let set_cookie = res.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        set_cookie.split(';').next().unwrap().to_owned()
    }

    async fn post(service: &Service, form: &str) -> Response {
        TestClient::post(URL).raw_form(form.to_owned()).send(service).await
    }

    async fn page(service: &Service, cookie: &str) -> (String, String) {
        let mut res = TestClient::get(URL).add_header(COOKIE, cookie, true).send(service).await;
        assert_eq!(res.status_code.unwrap_or(StatusCode::OK), StatusCode::OK);
        let recommitted = request_cookie(&res);
        (res.take_string().await.unwrap(), recommitted)
    }

    #[tokio::test]
    async fn test_empty_page_has_no_toast() {
        let service = service();
        let mut res = TestClient::get(URL).send(&service).await;
        assert_eq!(res.status_code.unwrap_or(StatusCode::OK), StatusCode::OK);
        let body = res.take_string().await.unwrap();
        assert!(body.contains("<h1>TODOs</h1>"));
        assert!(!body.contains(r#"data-testid="toast""#));
    }

    #[tokio::test]
    async fn test_create_shows_toast_once() {
        let service = service();

        let res = post(&service, "new_todo=Buy+milk").await;
        assert_eq!(res.status_code, Some(StatusCode::FOUND));
        assert_eq!(res.headers().get(LOCATION).unwrap(), "/");
        let cookie = request_cookie(&res);

        let (body, recommitted) = page(&service, &cookie).await;
        assert!(body.contains("Buy milk"));
        assert!(body.contains("Todo created"));
        assert!(body.contains("bg-green-500 text-white"));
        assert!(body.contains(r#"aria-label="Dismiss notification""#));
        assert!(body.contains(r#"data-fade-out-after="6000""#));

        let (body, _) = page(&service, &recommitted).await;
        assert!(body.contains("Buy milk"));
        assert!(!body.contains("Todo created"));
    }

    #[tokio::test]
    async fn test_delete_reports_result() {
        let service = service();
        post(&service, "new_todo=Walk+dog").await;

        let res = post(&service, "intent=Delete&id=0").await;
        let (body, _) = page(&service, &request_cookie(&res)).await;
        assert!(body.contains("Todo deleted"));
        assert!(!body.contains("Walk dog"));

        let res = post(&service, "intent=Delete&id=0").await;
        let (body, _) = page(&service, &request_cookie(&res)).await;
        assert!(body.contains("Todo not found"));
        assert!(body.contains("not-success"));
    }

    #[tokio::test]
    async fn test_blank_todo_is_rejected_with_toast() {
        let service = service();
        let res = post(&service, "new_todo=+++").await;
        assert_eq!(res.status_code, Some(StatusCode::FOUND));
        let (body, _) = page(&service, &request_cookie(&res)).await;
        assert!(body.contains("A todo needs some text"));
    }

    #[tokio::test]
    async fn test_malformed_forms_are_bad_requests() {
        let service = service();
        for form in ["intent=Delete", "intent=Delete&id=abc", "intent=Delete&id=", "other=1"] {
            let res = post(&service, form).await;
            assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST), "{form}");
        }
    }
}
