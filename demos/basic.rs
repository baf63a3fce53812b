//! Minimal pagemeta example — a paginated listing and an opted-out route.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic
//!
//! Try:
//!   curl 'http://localhost:3000/users?page=2&limit=2'
//!   curl 'http://localhost:3000/users?format=csv'
//!   curl 'http://localhost:3000/users?page=abc'
//!   curl  http://localhost:3000/users/2
//!   curl  http://localhost:3000/status

use pagemeta::middleware::paginate::{Count, Options, Paginate, Pagination};
use pagemeta::{ContentType, Method, Request, Response, Router, Server};
use serde_json::json;

const USERS: [&str; 5] = ["ann", "bob", "cy", "dee", "eve"];

#[tokio::main]
async fn main() -> Result<(), pagemeta::Error> {
    tracing_subscriber::fmt::init();

    // Options usually come from the host's own config file.
    let options: Options = serde_json::from_str(r#"{
        "limit": 3,
        "routes": ["/users", "/users/{id}"],
        "excludeFormats": ["csv"]
    }"#).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    let app = Router::new()
        .on(Method::GET, "/users",      list_users)
        .on(Method::GET, "/users/{id}", get_user)
        .on(Method::GET, "/status",     status)
        .layer(Paginate::new(options)?);

    Server::bind("0.0.0.0:3000")?.serve(app).await
}

// GET /users → {"meta":{"page":1,"limit":3,"found":5},"results":["ann","bob","cy"]}
async fn list_users(req: Request) -> Response {
    let p = req.extension::<Pagination>().copied().unwrap_or_default();
    let skip = usize::try_from(p.page.saturating_sub(1).saturating_mul(p.limit)).unwrap_or(0);
    let take = usize::try_from(p.limit).unwrap_or(0);
    let page: Vec<_> = USERS.iter().skip(skip).take(take).collect();

    if req.query().get("format") == Some("csv") {
        let csv = page.iter().map(|u| format!("{u}\n")).collect::<String>();
        return Response::builder().bytes(ContentType::Csv, csv.into_bytes());
    }

    Response::builder()
        .extension(Count(USERS.len() as u64))
        .json(page)
}

// GET /users/{id} → the handler's own meta is kept, pagination merged in.
async fn get_user(req: Request) -> Response {
    let id = req.param("id").unwrap_or("unknown");
    Response::json(json!({
        "meta": { "source": "memory" },
        "results": { "id": id },
    }))
}

// Not in the route list: returned as-is.
async fn status(_req: Request) -> &'static str {
    "up"
}
