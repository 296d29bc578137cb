//! Table configuration.

use crate::TABLE_MAX_PAGES;

/// Settings for a [`Table`](crate::Table).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Upper bound on the number of pages the table may allocate.
    /// Row capacity is `max_pages * ROWS_PER_PAGE`.
    pub max_pages: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_pages: TABLE_MAX_PAGES,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the page ceiling
    pub fn max_pages(mut self, pages: usize) -> Self {
        self.config.max_pages = pages;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_defaults_to_table_max_pages() {
        assert_eq!(Config::default().max_pages, TABLE_MAX_PAGES);
        assert_eq!(Config::builder().build(), Config::default());
    }

    #[test]
    fn it_overrides_max_pages() {
        let config = Config::builder().max_pages(3).build();
        assert_eq!(config.max_pages, 3);
    }
}
