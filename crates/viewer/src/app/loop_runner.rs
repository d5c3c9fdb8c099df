use std::error::Error;
use std::process::ExitCode;

use tile_engine::run_app;
use tracing::error;

use super::bootstrap::AppWiring;

pub(crate) fn run(app: AppWiring) -> ExitCode {
    match run_app(app.config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, cause = %error_chain(&err), "startup_failed");
            ExitCode::FAILURE
        }
    }
}

/// Source messages below the top-level error, joined with `: `.
fn error_chain(err: &dyn Error) -> String {
    let mut causes = Vec::new();
    let mut source = err.source();
    while let Some(cause) = source {
        causes.push(cause.to_string());
        source = cause.source();
    }
    causes.join(": ")
}

#[cfg(test)]
mod tests {
    use tile_engine::{AppError, ConfigError, GridError};

    use super::*;

    #[test]
    fn error_chain_lists_nested_sources() {
        let err = AppError::Config(ConfigError::InitialPosition(GridError::OutOfRange {
            x: 12,
            y: 0,
            width: 10,
            height: 10,
        }));

        assert_eq!(
            error_chain(&err),
            "cell (12, 0) is outside the 10x10 grid"
        );
    }

    #[test]
    fn error_without_source_has_empty_chain() {
        assert_eq!(error_chain(&ConfigError::EmptyEndpoint), "");
    }
}
