//! Entry points used by a simulation host
//!
//! [`TableIo`] picks the codec from the file extension and routes messages
//! through a [`Reporter`].

use std::path::Path;

use tableio_core::Table;

use crate::config::TableConfig;
use crate::container;
use crate::error::Result;
use crate::report::{Reporter, TracingReporter};
use crate::text_codec;

/// True when `path` has the extension `mat`, in any letter case
pub fn is_container_file<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("mat"))
}

/// Table loading and storing with a fixed configuration and reporter
#[derive(Debug, Clone, Default)]
pub struct TableIo<R: Reporter = TracingReporter> {
    config: TableConfig,
    reporter: R,
}

impl TableIo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TableConfig) -> Self {
        Self {
            config,
            reporter: TracingReporter,
        }
    }
}

impl<R: Reporter> TableIo<R> {
    pub fn with_reporter(config: TableConfig, reporter: R) -> Self {
        Self { config, reporter }
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Dimensions of a matrix in a MAT-file, `(0, 0)` if it cannot be read
    pub fn sizes<P: AsRef<Path>>(&self, file: P, name: &str) -> (usize, usize) {
        let file = file.as_ref();
        container::matrix_sizes(file, name, &self.config).unwrap_or_else(|e| {
            tracing::debug!(file = %file.display(), variable = name, error = %e, "no matrix sizes");
            (0, 0)
        })
    }

    /// Read a `rows x cols` matrix from a MAT-file
    pub fn read_matrix<P: AsRef<Path>>(
        &self,
        file: P,
        name: &str,
        rows: usize,
        cols: usize,
    ) -> Result<Table> {
        let file = file.as_ref();
        self.announce(file, name);
        container::read_matrix(file, name, rows, cols, &self.config)
    }

    /// Store a row-major matrix in a MAT-file
    ///
    /// Returns false after reporting the error when the matrix could not be
    /// written.
    pub fn write_matrix<P: AsRef<Path>>(
        &self,
        file: P,
        name: &str,
        data: &[f64],
        rows: usize,
        cols: usize,
        append: bool,
        version: &str,
    ) -> bool {
        match container::write_matrix(file.as_ref(), name, data, rows, cols, append, version) {
            Ok(()) => true,
            Err(e) => {
                self.reporter.error(&e.to_string());
                false
            }
        }
    }

    /// Read a table from a MAT-file or a text table file
    pub fn read_table<P: AsRef<Path>>(&self, file: P, name: &str) -> Result<Table> {
        let file = file.as_ref();
        self.announce(file, name);
        if is_container_file(file) {
            container::read_mat_table(file, name, &self.config)
        } else {
            text_codec::read_text_table(file, name, &self.config, &self.reporter)
        }
    }

    fn announce(&self, file: &Path, name: &str) {
        if self.config.verbose {
            self.reporter
                .info(&format!("... loading \"{name}\" from \"{}\"", file.display()));
        }
    }
}
