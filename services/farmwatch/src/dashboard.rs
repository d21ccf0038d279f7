//! Web dashboard with JSON API endpoints and a server-rendered page

use std::sync::Arc;

use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::condition::Condition;
use crate::config::DashboardConfig;
use crate::forecast::{day_key, ForecastSet, FORECAST_DAYS};
use crate::sensor::LOADING;
use crate::state::{DashboardState, StateHandle};

const CARD_COLORS: [&str; 8] = [
    "#dbeafe", "#dcfce7", "#fef9c3", "#fee2e2", "#f3e8ff", "#ccfbf1", "#e0e7ff", "#fce7f3",
];

/// Dashboard application state
#[derive(Clone)]
pub struct DashboardContext {
    pub state: StateHandle,
    pub page: Arc<PageSettings>,
}

/// Static parts of the rendered page
#[derive(Debug, Clone)]
pub struct PageSettings {
    pub title: String,
    pub camera_url: String,
    pub refresh_interval_ms: u64,
}

impl From<&DashboardConfig> for PageSettings {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            title: config.title.clone(),
            camera_url: config.camera_url.clone(),
            refresh_interval_ms: config.refresh_interval_seconds.max(1).saturating_mul(1000),
        }
    }
}

/// Build the dashboard axum router
pub fn build_router(state: StateHandle, config: &DashboardConfig) -> Router {
    let context = DashboardContext {
        state,
        page: Arc::new(PageSettings::from(config)),
    };

    let router = Router::new()
        .route("/", get(index_handler))
        .route("/api/sensors", get(sensors_handler))
        .route("/api/forecast", get(forecast_handler))
        .route("/api/state", get(state_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .with_state(context);

    match &config.assets_dir {
        Some(dir) => {
            tracing::debug!("Serving /assets from {:?}", dir);
            router.nest_service("/assets", ServeDir::new(dir))
        }
        None => router,
    }
}

/// One forecast day as shown on the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayView {
    pub key: String,
    pub temperature: String,
    pub radiation: String,
    pub condition: Condition,
}

/// Seven rows for display; placeholders while the forecast is loading
pub fn day_views(forecast: &ForecastSet) -> Vec<DayView> {
    match forecast.entries() {
        Some(entries) => entries
            .iter()
            .enumerate()
            .map(|(offset, entry)| DayView {
                key: day_key(offset),
                temperature: entry.temperature.clone(),
                radiation: entry.radiation.clone(),
                condition: entry.condition(),
            })
            .collect(),
        None => (0..FORECAST_DAYS)
            .map(|offset| DayView {
                key: day_key(offset),
                temperature: LOADING.to_string(),
                radiation: LOADING.to_string(),
                condition: Condition::Normal,
            })
            .collect(),
    }
}

fn forecast_json(state: &DashboardState) -> Value {
    if state.forecast.is_loading() {
        return json!({ "status": "loading" });
    }

    let days: Vec<Value> = day_views(&state.forecast)
        .into_iter()
        .map(|d| {
            json!({
                "day": d.key,
                "temperature": d.temperature,
                "radiation": d.radiation,
                "condition": d.condition,
                "image": d.condition.image_path(),
            })
        })
        .collect();

    json!({
        "status": "ready",
        "generation": state.forecast_generation,
        "days": days,
    })
}

async fn sensors_handler(State(dashboard): State<DashboardContext>) -> impl IntoResponse {
    let state = dashboard.state.read().await;
    axum::Json(json!(state.readings))
}

async fn forecast_handler(State(dashboard): State<DashboardContext>) -> impl IntoResponse {
    let state = dashboard.state.read().await;
    axum::Json(forecast_json(&state))
}

async fn state_handler(State(dashboard): State<DashboardContext>) -> impl IntoResponse {
    let state = dashboard.state.read().await;
    axum::Json(json!({
        "sensors": state.readings,
        "forecast": forecast_json(&state),
        "last_update_epoch_ms": state.last_update_epoch_ms,
        "uptime_seconds": state.started_at.elapsed().as_secs(),
    }))
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}

async fn index_handler(State(dashboard): State<DashboardContext>) -> impl IntoResponse {
    let state = dashboard.state.read().await;
    Html(render_page(&dashboard.page, &state))
}

/// Render the full HTML page for the current state
pub fn render_page(page: &PageSettings, state: &DashboardState) -> String {
    let sensor_cards: String = state
        .readings
        .iter()
        .enumerate()
        .map(|(index, (key, reading))| {
            format!(
                r#"<div style="padding: 1rem; border-radius: 0.5rem; box-shadow: 0 1px 3px rgba(0,0,0,0.15); background-color: {};">
                    <p style="margin: 0; font-weight: 500; color: #374151;">{}</p>
                    <h3 id="sensor-{}" style="margin: 0.25rem 0 0; font-size: 1.25rem; color: #1f2937;">{}</h3>
                </div>"#,
                CARD_COLORS[index % CARD_COLORS.len()],
                key.label(),
                key.field_name(),
                escape_html(reading.as_str())
            )
        })
        .collect();

    let days = day_views(&state.forecast);
    let today = &days[0];
    let forecast_cards: String = days
        .iter()
        .skip(1)
        .map(|d| {
            format!(
                r#"<div style="padding: 1rem; border-radius: 0.5rem; background: #fff; border-left: 4px solid #93c5fd; box-shadow: 0 1px 2px rgba(0,0,0,0.1);">
                    <div style="display: flex; align-items: center; gap: 0.75rem;">
                        <span style="color: #4b5563;">{label}</span>
                        <img id="forecast-img-{key}" src="{image}" alt="Forecast {key}" style="width: 2.5rem; height: 2.5rem;">
                    </div>
                    <p id="forecast-{key}" style="margin: 0.5rem 0 0; font-size: 1.125rem; font-weight: 700; color: #374151;">{temperature}°C, {radiation} W/m²</p>
                </div>"#,
                label = d.key.replace('_', " "),
                key = d.key,
                image = d.condition.image_path(),
                temperature = escape_html(&d.temperature),
                radiation = escape_html(&d.radiation),
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <script>
        function refreshData() {{
            fetch('/api/state')
                .then(r => r.json())
                .then(data => {{
                    for (const [key, value] of Object.entries(data.sensors)) {{
                        const el = document.getElementById('sensor-' + key);
                        if (el) el.textContent = value;
                    }}
                    (data.forecast.days || []).forEach(d => {{
                        const text = document.getElementById('forecast-' + d.day);
                        if (text) text.textContent = `${{d.temperature}}°C, ${{d.radiation}} W/m²`;
                        const img = document.getElementById('forecast-img-' + d.day);
                        if (img) img.src = d.image;
                    }});
                }});
        }}
        setInterval(refreshData, {refresh_ms});
    </script>
</head>
<body style="font-family: system-ui, sans-serif; background: #f9fafb; margin: 0; padding: 1.5rem;">
    <h1 style="text-align: center; color: #2563eb;">{title}</h1>
    <h2 style="text-align: center; color: #374151; font-size: 1.125rem;">Live Camera</h2>
    <div style="display: flex; justify-content: center; margin-bottom: 1.5rem;">
        <iframe src="{camera_url}" title="Live Camera" style="width: 100%; max-width: 42rem; height: 20rem; border: 4px solid #93c5fd; border-radius: 0.5rem;"></iframe>
    </div>
    <section style="margin-bottom: 2rem;">
        <h2 style="color: #374151; font-size: 1.125rem;">Monitoring Sensor</h2>
        <div style="display: grid; grid-template-columns: repeat(auto-fill, minmax(12rem, 1fr)); gap: 1.5rem;">{sensor_cards}</div>
    </section>
    <section>
        <h2 style="color: #374151; font-size: 1.125rem;">Weather Forecast</h2>
        <div style="display: flex; align-items: center; gap: 1rem; margin-bottom: 1rem;">
            <p style="color: #4b5563;">Today:</p>
            <span id="forecast-today" style="font-size: 1.125rem; font-weight: 700; color: #2563eb;">{today_temperature}°C, {today_radiation} W/m²</span>
            <img id="forecast-img-today" src="{today_image}" alt="Today Weather" style="width: 2.5rem; height: 2.5rem;">
        </div>
        <div style="display: grid; grid-template-columns: repeat(auto-fill, minmax(14rem, 1fr)); gap: 1rem;">{forecast_cards}</div>
    </section>
</body>
</html>"#,
        title = escape_html(&page.title),
        camera_url = escape_html(&page.camera_url),
        refresh_ms = page.refresh_interval_ms,
        sensor_cards = sensor_cards,
        today_temperature = escape_html(&today.temperature),
        today_radiation = escape_html(&today.radiation),
        today_image = today.condition.image_path(),
        forecast_cards = forecast_cards,
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
