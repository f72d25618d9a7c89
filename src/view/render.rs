//! HTML rendering of [`ViewState`].
//!
//! `render_page` is the only entry point: every state change produces a full
//! document from the current view state. The only client-side code swaps each
//! visualization card once its image loads or fails, and shows the loading
//! indicator while the next document is requested.

use crate::{
    models::MovieSummary,
    services::visualization::VisualizationKind,
    view::{
        format::{escape_html, title_with_year},
        Action, MetricCard, RecommendationRow, RecommendationsView, ViewState,
        VisualizationCard,
    },
};

/// Page-level inputs that are not part of the view state
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    /// Current value of the search field
    pub query: &'a str,
    /// Whether the upstream answered its readiness ping
    pub api_ready: bool,
}

const STYLE: &str = r#"
        .viz-placeholder { min-height: 200px; display: flex; flex-direction: column; align-items: center; justify-content: center; }
        .fade-in { animation: fadeIn 0.4s ease-in; }
        @keyframes fadeIn { from { opacity: 0; } to { opacity: 1; } }
"#;

const SCRIPT: &str = r#"
        function visualizationLoaded(img) {
            document.getElementById(img.dataset.placeholder).style.display = 'none';
            img.style.display = 'block';
        }
        function visualizationFailed(img) {
            var placeholder = document.getElementById(img.dataset.placeholder);
            placeholder.innerHTML = '<div class="alert alert-warning">' + placeholder.dataset.failed + '</div>';
        }
        document.addEventListener('submit', function () {
            var results = document.getElementById('results');
            if (results) { results.style.display = 'none'; }
            document.getElementById('loadingIndicator').style.display = 'block';
        });
"#;

/// Renders the whole document for `view`
pub fn render_page(view: &ViewState, ctx: PageContext<'_>) -> String {
    let api_notice = if ctx.api_ready {
        String::new()
    } else {
        r#"<div class="alert alert-warning" id="apiNotice">The recommendation service is not ready yet. Searches may fail until it is up.</div>"#
            .to_string()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Movie Recommender</title>
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css">
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap-icons@1.10.5/font/bootstrap-icons.css">
    <style>{style}</style>
    <script>{script}</script>
</head>
<body>
<div class="container py-4">
    <h1 class="mb-4"><i class="bi bi-film me-2"></i>Movie Recommender</h1>
    {api_notice}
    <form id="recommendForm" method="post" action="/search" class="mb-4">
        <div class="input-group">
            <input type="text" class="form-control" id="movieTitle" name="movie_title" placeholder="Enter a movie title" value="{query}">
            <button class="btn btn-primary" type="submit"><i class="bi bi-search me-2"></i>Get Recommendations</button>
        </div>
    </form>
{loading}
{results}
</div>
</body>
</html>
"#,
        style = STYLE,
        script = SCRIPT,
        api_notice = api_notice,
        query = escape_html(ctx.query),
        loading = render_loading(matches!(view, ViewState::Loading)),
        results = render_results(view),
    )
}

/// The results section; empty until a search has settled
fn render_results(view: &ViewState) -> String {
    let body = match view {
        ViewState::Idle | ViewState::Loading => return String::new(),
        ViewState::Error { message } => render_error(message),
        ViewState::Recommendations(recs) => render_recommendations(recs),
        ViewState::Disambiguation { query, movies } => render_disambiguation(query, movies),
        ViewState::SearchResults { query, movies } => render_search_results(query, movies),
        ViewState::NoMatch { query } => render_no_match(query),
    };

    format!(
        r#"    <div id="results" data-state="{state}">
{body}
        <form method="post" action="/action" class="mt-3">
            <input type="hidden" name="action" value="{new_search}">
            <button type="submit" class="btn btn-outline-secondary" id="backToSearch"><i class="bi bi-arrow-left me-2"></i>Back to Search</button>
        </form>
    </div>"#,
        state = view.name(),
        body = body,
        new_search = Action::NEW_SEARCH,
    )
}

/// Always present so a form submit can reveal it before the next page arrives
fn render_loading(visible: bool) -> String {
    format!(
        r#"    <div id="loadingIndicator" class="text-center my-4"{hidden}>
        <div class="spinner-border text-primary" role="status"><span class="visually-hidden">Loading...</span></div>
        <p class="mt-2">Finding recommendations...</p>
    </div>"#,
        hidden = if visible { "" } else { r#" style="display: none;""# },
    )
}

fn render_error(message: &str) -> String {
    format!(
        r#"        <div id="errorMessage" class="alert alert-danger">{}</div>"#,
        escape_html(message)
    )
}

/// A list entry that posts `action` when clicked
fn render_choice(movie: &MovieSummary, action: &Action) -> String {
    let hidden = match action {
        Action::SelectSimilarTitle { title } => {
            format!(r#"<input type="hidden" name="title" value="{}">"#, escape_html(title))
        }
        Action::SelectMovieChoice { movie_id } => {
            format!(r#"<input type="hidden" name="movie_id" value="{}">"#, movie_id)
        }
        Action::NewSearch => String::new(),
    };

    format!(
        r#"                <form method="post" action="/action" class="m-0">
                    <input type="hidden" name="action" value="{action}">
                    {hidden}
                    <button type="submit" class="list-group-item list-group-item-action d-flex justify-content-between align-items-center" data-movie-id="{movie_id}">
                        <span><i class="bi bi-film me-2"></i>{label}</span>
                        <i class="bi bi-chevron-right"></i>
                    </button>
                </form>"#,
        action = action.name(),
        hidden = hidden,
        movie_id = movie.movie_id,
        label = escape_html(&title_with_year(&movie.title, movie.release_year())),
    )
}

fn render_card(header_class: &str, icon: &str, heading: &str, body: &str) -> String {
    format!(
        r#"        <div class="card shadow-sm mb-4 fade-in">
            <div class="card-header {header_class}">
                <div class="d-flex align-items-center">
                    <i class="bi {icon} me-2"></i>
                    <h3 class="card-title mb-0">{heading}</h3>
                </div>
            </div>
            <div class="card-body">
{body}
            </div>
        </div>"#,
        header_class = header_class,
        icon = icon,
        heading = heading,
        body = body,
    )
}

fn render_disambiguation(query: &str, movies: &[MovieSummary]) -> String {
    let choices: Vec<String> = movies
        .iter()
        .map(|m| {
            render_choice(
                m,
                &Action::SelectMovieChoice {
                    movie_id: m.movie_id,
                },
            )
        })
        .collect();

    let body = format!(
        r#"            <p>We found multiple movies titled "{query}". Please select which one you meant:</p>
            <div class="list-group mb-3" id="movieChoices">
{choices}
            </div>"#,
        query = escape_html(query),
        choices = choices.join("\n"),
    );

    render_card("bg-primary text-white", "bi-list-stars", "Multiple Matches Found", &body)
}

fn render_search_results(query: &str, movies: &[MovieSummary]) -> String {
    let choices: Vec<String> = movies
        .iter()
        .map(|m| {
            render_choice(
                m,
                &Action::SelectSimilarTitle {
                    title: m.title.clone(),
                },
            )
        })
        .collect();

    let body = format!(
        r#"            <p>No exact match for "{query}". Did you mean one of these?</p>
            <div class="list-group mb-3" id="similarTitles">
{choices}
            </div>"#,
        query = escape_html(query),
        choices = choices.join("\n"),
    );

    render_card("bg-primary text-white", "bi-search", "Search Results", &body)
}

fn render_no_match(query: &str) -> String {
    let body = format!(
        r#"            <div class="text-center my-4"><i class="bi bi-film" style="font-size: 4rem; color: #ccc;"></i></div>
            <p class="text-center" id="noMatchMessage">No movies found matching "{query}"</p>
            <p class="mb-4">No similar titles were found in our database.</p>
            <div class="text-center">
                <form method="post" action="/action" class="m-0">
                    <input type="hidden" name="action" value="{new_search}">
                    <button class="btn btn-primary" id="newSearchBtn" type="submit"><i class="bi bi-search me-2"></i>Try Another Search</button>
                </form>
            </div>"#,
        query = escape_html(query),
        new_search = Action::NEW_SEARCH,
    );

    render_card(
        "bg-warning text-dark",
        "bi-exclamation-triangle-fill",
        "Movie Not Found",
        &body,
    )
}

fn render_row(row: &RecommendationRow) -> String {
    format!(
        r#"                    <tr>
                        <td><strong>{title}</strong></td>
                        <td>{genres}</td>
                        <td><div class="d-flex align-items-center"><div class="text-warning me-2"><i class="bi bi-star-fill"></i></div><div>{rating}</div></div></td>
                        <td>{release_date}</td>
                        <td>
                            <div class="progress" style="height: 8px;">
                                <div class="progress-bar" role="progressbar" style="width: {similarity}%;" aria-valuenow="{similarity}" aria-valuemin="0" aria-valuemax="100"></div>
                            </div>
                            <small class="text-muted">{similarity}%</small>
                        </td>
                    </tr>"#,
        title = escape_html(&row.title),
        genres = escape_html(&row.genres),
        rating = row.rating,
        release_date = row.release_date,
        similarity = row.similarity_percent,
    )
}

fn render_metric(card: &MetricCard) -> String {
    format!(
        r#"                <div class="col-md-4">
                    <div class="card text-center mb-3 mb-md-0">
                        <div class="card-body">
                            <i class="bi {icon} text-primary mb-3" style="font-size: 2rem;"></i>
                            <h5 class="card-title">{title}</h5>
                            <h2 class="display-4">{value}</h2>
                            <p class="text-muted">{caption}</p>
                        </div>
                    </div>
                </div>"#,
        icon = card.icon,
        title = card.title,
        value = card.value,
        caption = card.caption,
    )
}

fn render_visualization(card: &VisualizationCard) -> String {
    let kind = card.kind;
    let content = format!(
        r#"<div id="{id}-placeholder" class="viz-placeholder" data-failed="Failed to load {label}.">
                    <div class="spinner-border text-primary" role="status"><span class="visually-hidden">Loading {label}...</span></div>
                    <p class="mt-2">Generating {label}...</p>
                </div>
                <img id="{id}-image" src="{url}" class="img-fluid rounded" alt="{heading}" style="display: none;" data-placeholder="{id}-placeholder" onload="visualizationLoaded(this)" onerror="visualizationFailed(this)">"#,
        id = kind.as_str(),
        label = kind.label(),
        url = escape_html(&card.url),
        heading = escape_html(kind.heading()),
    );

    let icon = match kind {
        VisualizationKind::SimilarityChart => "bi-bar-chart-fill",
        VisualizationKind::WordCloud => "bi-cloud-fill",
    };

    format!(
        r#"            <div class="col-md-6 mb-4">
{card}
            </div>"#,
        card = render_card(
            "bg-primary text-white",
            icon,
            &escape_html(kind.heading()),
            &format!(r#"                <div class="text-center">{}</div>"#, content),
        ),
    )
}

fn render_recommendations(view: &RecommendationsView) -> String {
    let rows: Vec<String> = view.rows.iter().map(render_row).collect();
    let table = format!(
        r#"            <p class="mb-3" id="sourceMovie">Because you searched for <strong>{heading}</strong></p>
            <div class="table-responsive">
                <table class="table table-hover">
                    <thead>
                        <tr><th>Title</th><th>Genres</th><th>Rating</th><th>Release Date</th><th>Similarity</th></tr>
                    </thead>
                    <tbody>
{rows}
                    </tbody>
                </table>
            </div>"#,
        heading = escape_html(&view.heading),
        rows = rows.join("\n"),
    );

    let metrics: Vec<String> = view.metrics.iter().map(render_metric).collect();
    let metrics_body = format!(
        r#"            <div class="row">
{}
            </div>"#,
        metrics.join("\n")
    );

    let visualizations: Vec<String> = view
        .visualizations
        .iter()
        .map(render_visualization)
        .collect();

    format!(
        r#"{table}
{metrics}
        <div class="row">
{visualizations}
        </div>"#,
        table = render_card(
            "bg-primary text-white",
            "bi-list-stars",
            "Recommended Movies",
            &table
        ),
        metrics = render_card(
            "bg-primary text-white",
            "bi-graph-up",
            "Evaluation Metrics",
            &metrics_body
        ),
        visualizations = visualizations.join("\n"),
    )
}
