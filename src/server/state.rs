use std::sync::Arc;

use crate::config::Config;
use crate::paths::PathTranslator;
use crate::scanner::Scanner;

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub translator: Arc<PathTranslator>,
    pub scanner: Arc<Scanner>,
}

impl AppState {
    pub fn new(translator: PathTranslator, scanner: Scanner) -> Self {
        Self {
            translator: Arc::new(translator),
            scanner: Arc::new(scanner),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            PathTranslator::from_config(&config.paths),
            Scanner::from_config(&config.scanner),
        )
    }
}
