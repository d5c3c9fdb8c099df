use std::env::{self, VarError};

use tile_engine::{ViewerConfig, MAX_MAP_DIMENSION};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const ENDPOINT_URL_ENV_VAR: &str = "TILE_VIEWER_ENDPOINT_URL";
const MAP_SIZE_ENV_VAR: &str = "TILE_VIEWER_MAP_SIZE";
const START_ENV_VAR: &str = "TILE_VIEWER_START";
const CELL_SIZE_ENV_VAR: &str = "TILE_VIEWER_CELL_SIZE";
const ZOOM_ENV_VAR: &str = "TILE_VIEWER_ZOOM";

pub(crate) struct AppWiring {
    pub(crate) config: ViewerConfig,
}

pub(crate) fn build_app() -> AppWiring {
    init_tracing();
    info!("=== Tile Viewer Startup ===");

    let config = apply_env_overrides(ViewerConfig::default(), |var| env::var(var));
    info!(
        endpoint_url = %config.endpoint_url,
        map_width = config.map_width,
        map_height = config.map_height,
        cell_size = config.cell_size,
        zoom = config.zoom,
        "startup"
    );

    AppWiring { config }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn apply_env_overrides(
    mut config: ViewerConfig,
    read: impl Fn(&'static str) -> Result<String, VarError>,
) -> ViewerConfig {
    if let Some(url) = read_override(&read, ENDPOINT_URL_ENV_VAR, parse_endpoint_url) {
        config.endpoint_url = url;
    }
    if let Some((width, height)) = read_override(&read, MAP_SIZE_ENV_VAR, parse_map_size) {
        config.map_width = width;
        config.map_height = height;
    }
    if let Some(start) = read_override(&read, START_ENV_VAR, parse_position) {
        config.initial_position = Some(start);
    }
    if let Some(cell_size) = read_override(&read, CELL_SIZE_ENV_VAR, parse_positive_f32) {
        config.cell_size = cell_size;
    }
    if let Some(zoom) = read_override(&read, ZOOM_ENV_VAR, parse_positive_f32) {
        config.zoom = zoom;
    }
    config
}

fn read_override<T>(
    read: &impl Fn(&'static str) -> Result<String, VarError>,
    var: &'static str,
    parse: fn(&str) -> Option<T>,
) -> Option<T> {
    match read(var) {
        Ok(value) => {
            let parsed = parse(&value);
            if parsed.is_none() {
                warn!(
                    env_var = var,
                    value = value.as_str(),
                    "invalid env var value; falling back to default"
                );
            }
            parsed
        }
        Err(VarError::NotPresent) => None,
        Err(err) => {
            warn!(
                env_var = var,
                error = %err,
                "unable to read env var; falling back to default"
            );
            None
        }
    }
}

fn parse_endpoint_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let has_scheme = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    has_scheme.then(|| trimmed.to_string())
}

fn parse_map_size(raw: &str) -> Option<(u32, u32)> {
    let (width, height) = raw.trim().split_once(['x', 'X'])?;
    let width = width.trim().parse::<u32>().ok()?;
    let height = height.trim().parse::<u32>().ok()?;
    let in_range = |side: u32| (1..=MAX_MAP_DIMENSION).contains(&side);
    (in_range(width) && in_range(height)).then_some((width, height))
}

fn parse_position(raw: &str) -> Option<(i32, i32)> {
    let (x, y) = raw.trim().split_once(',')?;
    Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
}

fn parse_positive_f32(raw: &str) -> Option<f32> {
    raw.trim()
        .parse::<f32>()
        .ok()
        .filter(|size| size.is_finite() && *size > 0.0)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn reader(
        entries: &[(&'static str, &'static str)],
    ) -> impl Fn(&'static str) -> Result<String, VarError> {
        let map: HashMap<&'static str, &'static str> = entries.iter().copied().collect();
        move |var| {
            map.get(var)
                .map(|value| value.to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn map_size_parses_width_by_height() {
        assert_eq!(parse_map_size("30x20"), Some((30, 20)));
        assert_eq!(parse_map_size(" 8 X 4 "), Some((8, 4)));
        assert_eq!(parse_map_size("0x4"), None);
        assert_eq!(parse_map_size("10"), None);
        assert_eq!(parse_map_size("ax4"), None);
    }

    #[test]
    fn position_parses_comma_pair() {
        assert_eq!(parse_position("2,3"), Some((2, 3)));
        assert_eq!(parse_position(" -1 , 7 "), Some((-1, 7)));
        assert_eq!(parse_position("2;3"), None);
    }

    #[test]
    fn sizes_must_be_positive_and_finite() {
        assert_eq!(parse_positive_f32("32"), Some(32.0));
        assert_eq!(parse_positive_f32(" 1.5 "), Some(1.5));
        assert_eq!(parse_positive_f32("0"), None);
        assert_eq!(parse_positive_f32("inf"), None);
        assert_eq!(parse_positive_f32("big"), None);
    }

    #[test]
    fn map_size_above_limit_is_refused() {
        let limit = MAX_MAP_DIMENSION;
        assert_eq!(parse_map_size(&format!("{limit}x{limit}")), Some((limit, limit)));
        assert_eq!(parse_map_size(&format!("{}x4", limit + 1)), None);
        assert_eq!(parse_map_size("4294967295x4294967295"), None);
    }

    #[test]
    fn endpoint_requires_http_scheme() {
        assert_eq!(
            parse_endpoint_url(" http://127.0.0.1:9000/next "),
            Some("http://127.0.0.1:9000/next".to_string())
        );
        assert_eq!(parse_endpoint_url("localhost:8000"), None);
    }

    #[test]
    fn no_env_keeps_defaults() {
        let config = apply_env_overrides(ViewerConfig::default(), reader(&[]));
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn valid_overrides_are_applied() {
        let config = apply_env_overrides(
            ViewerConfig::default(),
            reader(&[
                (ENDPOINT_URL_ENV_VAR, "http://decider:9000/act"),
                (MAP_SIZE_ENV_VAR, "30x30"),
                (START_ENV_VAR, "15,15"),
                (CELL_SIZE_ENV_VAR, "32"),
                (ZOOM_ENV_VAR, "1.5"),
            ]),
        );
        assert_eq!(config.endpoint_url, "http://decider:9000/act");
        assert_eq!((config.map_width, config.map_height), (30, 30));
        assert_eq!(config.initial_position, Some((15, 15)));
        assert_eq!(config.cell_size, 32.0);
        assert_eq!(config.zoom, 1.5);
        assert_eq!(config.render_cell_size(), 48.0);
    }

    #[test]
    fn invalid_overrides_fall_back_to_defaults() {
        let defaults = ViewerConfig::default();
        let config = apply_env_overrides(
            defaults.clone(),
            reader(&[
                (MAP_SIZE_ENV_VAR, "100000x100000"),
                (CELL_SIZE_ENV_VAR, "-3"),
                (ZOOM_ENV_VAR, "none"),
            ]),
        );
        assert_eq!(config, defaults);
    }
}
