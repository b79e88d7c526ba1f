use crate::error::AlmanacError;
use crate::parser::locator::{is_post_path, is_valid_slug, POSTS_ROOT};
use crate::services::listing::ListingPage;
use crate::services::posts::DayFilter;
use crate::services::renderer::RenderedFile;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use http::{header::LOCATION, StatusCode};
use serde::Deserialize;
use tracing::{error, warn};

pub fn posts_router() -> Router<AppState> {
    Router::new()
        .route("/", get(index_handler))
        .route("/page/{page}", get(page_handler))
        .route("/count", get(count_handler))
        .route("/{segment}", get(year_or_page_handler))
        .route("/{year}/{month}", get(month_handler))
        .route("/{year}/{month}/{day}", get(day_handler))
        .route("/{year}/{month}/{day}/{slug}", get(post_handler))
}

#[derive(Deserialize)]
struct IndexQuery {
    p: Option<String>,
}

async fn index_handler(State(state): State<AppState>, Query(query): Query<IndexQuery>) -> Response {
    // legacy ?p=N links
    if let Some(p) = query.p {
        return match p.trim().parse::<usize>() {
            Ok(page) => redirect(StatusCode::FOUND, &format!("/page/{page}")),
            Err(_) => redirect(StatusCode::FOUND, "/"),
        };
    }

    respond_with_page(&state, 1).await
}

async fn page_handler(State(state): State<AppState>, Path(page): Path<String>) -> Response {
    match page.parse::<usize>() {
        Ok(page) => respond_with_page(&state, page).await,
        Err(_) => redirect(StatusCode::FOUND, "/"),
    }
}

async fn count_handler(State(state): State<AppState>) -> Response {
    match state.blog.posts.count().await {
        Ok((articles, days)) => format!(
            "{} articles, across {} days that have at least one post.",
            articles, days
        )
        .into_response(),
        Err(e) => error_response(&state, e).await,
    }
}

// a four digit segment is a year archive, anything else is a static page slug
async fn year_or_page_handler(
    State(state): State<AppState>,
    Path(segment): Path<String>,
) -> Response {
    if segment.len() == 4 && segment.chars().all(|c| c.is_ascii_digit()) {
        let filter = DayFilter {
            year: segment.parse().ok(),
            ..DayFilter::default()
        };
        return respond_with_archive(&state, filter).await;
    }

    if !is_valid_slug(&segment) {
        return not_found(&state).await;
    }

    render_content(&state, &format!("{POSTS_ROOT}/{segment}")).await
}

async fn month_handler(
    State(state): State<AppState>,
    Path((year, month)): Path<(String, String)>,
) -> Response {
    match archive_filter(&year, &month, None) {
        Some(filter) => respond_with_archive(&state, filter).await,
        None => not_found(&state).await,
    }
}

async fn day_handler(
    State(state): State<AppState>,
    Path((year, month, day)): Path<(String, String, String)>,
) -> Response {
    match archive_filter(&year, &month, Some(&day)) {
        Some(filter) => respond_with_archive(&state, filter).await,
        None => not_found(&state).await,
    }
}

async fn post_handler(
    State(state): State<AppState>,
    Path((year, month, day, slug)): Path<(String, String, String, String)>,
) -> Response {
    let path = format!("{POSTS_ROOT}/{year}/{month}/{day}/{slug}");
    if !is_post_path(&path) {
        return not_found(&state).await;
    }

    render_content(&state, &path).await
}

// URL months are 1-based, filters are 0-based
fn archive_filter(year: &str, month: &str, day: Option<&str>) -> Option<DayFilter> {
    let year = year.parse::<i32>().ok()?;
    let month = month.parse::<u32>().ok().filter(|m| (1..=12).contains(m))?;
    let day = match day {
        Some(day) => Some(day.parse::<u32>().ok().filter(|d| (1..=31).contains(d))?),
        None => None,
    };

    Some(DayFilter {
        year: Some(year),
        month0: Some(month - 1),
        day,
    })
}

async fn respond_with_page(state: &AppState, page: usize) -> Response {
    match state.blog.listings.page(page).await {
        Ok(ListingPage::Html(html)) => Html(html.to_string()).into_response(),
        Ok(ListingPage::Redirect(destination)) => redirect(StatusCode::FOUND, &destination),
        Err(e) => error_response(state, e).await,
    }
}

async fn respond_with_archive(state: &AppState, filter: DayFilter) -> Response {
    match state.blog.listings.archive(filter).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => error_response(state, e).await,
    }
}

async fn render_content(state: &AppState, path: &str) -> Response {
    let rendered = match state.blog.renderer.render_file(path).await {
        Ok(rendered) => rendered,
        Err(e) => return error_response(state, e).await,
    };

    match rendered {
        RenderedFile::Article(article) => match state.blog.renderer.site().footer() {
            Ok(footer) => Html(article.html(footer)).into_response(),
            Err(e) => error_response(state, e).await,
        },
        RenderedFile::Redirect(sidecar) => redirect(sidecar.status, &sidecar.target),
    }
}

fn redirect(status: StatusCode, destination: &str) -> Response {
    (status, [(LOCATION, destination.to_string())]).into_response()
}

async fn error_response(state: &AppState, e: AlmanacError) -> Response {
    match e {
        AlmanacError::NotFound(_) => not_found(state).await,
        AlmanacError::TemplatesNotLoaded(slot) => {
            warn!("Request arrived before {} was loaded", slot);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "Site templates are not loaded yet. Try again shortly.",
            )
                .into_response()
        }
        other => {
            error!("Request failed: {}", other);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn not_found(state: &AppState) -> Response {
    match state.blog.renderer.render_not_found().await {
        Ok(body) => (StatusCode::NOT_FOUND, Html(body)).into_response(),
        Err(e) => {
            warn!("Themed 404 unavailable: {}", e);
            (StatusCode::NOT_FOUND, "Not found").into_response()
        }
    }
}
