use gdal::Dataset;
use serde::Deserialize;
use std::fmt::Display;

use crate::error::Result;
use crate::product::RasterPath;

/// A resource that can be released explicitly, reporting failures.
pub trait Closeable {
    type Error: Display;

    fn close(self) -> std::result::Result<(), Self::Error>;
}

impl Closeable for Dataset {
    type Error = gdal::errors::GdalError;

    fn close(self) -> std::result::Result<(), Self::Error> {
        Dataset::close(self)
    }
}

/// What closing a batch does when one of its handles fails to close.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosePolicy {
    /// Try every handle, log failures and report success.
    #[default]
    BestEffort,
    /// Stop at the first failure and return it. Handles not reached are released on drop.
    FailFast,
}

/// An ordered set of open rasters that are all released when the batch goes away.
pub struct RasterBatch<H: Closeable> {
    handles: Vec<H>,
    policy: ClosePolicy,
}

impl RasterBatch<Dataset> {
    /// Opens every path with GDAL.
    pub fn open(paths: &[RasterPath], policy: ClosePolicy) -> Result<Self> {
        Self::open_with(paths, policy, |path: &RasterPath| -> Result<Dataset> {
            log::debug!("Opening {}", path);
            Ok(Dataset::open(path.gdal_path())?)
        })
    }
}

impl<H: Closeable> RasterBatch<H> {
    /// Opens `paths` in order with `opener`. If one of them fails, the handles opened so far
    /// are closed before the error is returned.
    pub fn open_with<P, E, F>(
        paths: &[P],
        policy: ClosePolicy,
        mut opener: F,
    ) -> std::result::Result<Self, E>
    where
        F: FnMut(&P) -> std::result::Result<H, E>,
    {
        let mut handles = Vec::with_capacity(paths.len());

        for path in paths {
            match opener(path) {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    close_best_effort(handles);
                    return Err(e);
                }
            }
        }

        Ok(RasterBatch { handles, policy })
    }

    /// Opens `paths`, runs `f` on the open handles and closes them again, whatever `f` returns.
    pub fn scoped<P, T, E, O, F>(
        paths: &[P],
        policy: ClosePolicy,
        opener: O,
        f: F,
    ) -> std::result::Result<T, E>
    where
        O: FnMut(&P) -> std::result::Result<H, E>,
        F: FnOnce(&[H]) -> std::result::Result<T, E>,
        E: From<CloseError>,
    {
        let batch = Self::open_with(paths, policy, opener)?;
        let result = f(batch.handles());
        match result {
            Ok(value) => {
                batch.close()?;
                Ok(value)
            }
            // The batch is dropped here, which releases the handles best-effort
            Err(e) => Err(e),
        }
    }

    pub fn handles(&self) -> &[H] {
        &self.handles
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Closes every handle according to the batch's [`ClosePolicy`].
    pub fn close(mut self) -> std::result::Result<(), CloseError> {
        let handles = std::mem::take(&mut self.handles);

        match self.policy {
            ClosePolicy::BestEffort => {
                close_best_effort(handles);
                Ok(())
            }
            ClosePolicy::FailFast => {
                for (index, handle) in handles.into_iter().enumerate() {
                    handle.close().map_err(|e| CloseError {
                        index,
                        message: e.to_string(),
                    })?;
                }
                Ok(())
            }
        }
    }
}

impl<H: Closeable> Drop for RasterBatch<H> {
    fn drop(&mut self) {
        close_best_effort(std::mem::take(&mut self.handles));
    }
}

fn close_best_effort<H: Closeable>(handles: Vec<H>) {
    for (index, handle) in handles.into_iter().enumerate() {
        if let Err(e) = handle.close() {
            log::warn!("Ignoring failure to close raster {}: {}", index, e);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseError {
    pub index: usize,
    pub message: String,
}

impl Display for CloseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to close raster {}: {}", self.index, self.message)
    }
}

impl std::error::Error for CloseError {}
