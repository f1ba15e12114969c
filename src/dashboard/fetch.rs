use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Pending,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Failed(String),
}

/// A lazily loaded value and the state of its last load.
///
/// Starting a load keeps the previous data around so views can keep showing
/// it; a failed load drops it.
#[derive(Debug)]
pub struct Fetch<T> {
    data: Option<T>,
    status: FetchStatus,
    error: Option<FetchError>,
}

impl<T> Default for Fetch<T> {
    fn default() -> Self {
        Self {
            data: None,
            status: FetchStatus::Idle,
            error: None,
        }
    }
}

impl<T> Fetch<T> {
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.status == FetchStatus::Pending
    }

    pub fn start(&mut self) {
        self.status = FetchStatus::Pending;
        self.error = None;
    }

    /// Manual reload. Any load still in flight is superseded, not cancelled.
    pub fn refresh(&mut self) {
        self.start();
    }

    pub fn resolve(&mut self, result: Result<T, FetchError>) {
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.status = FetchStatus::Success;
                self.error = None;
            }
            Err(error) => {
                self.data = None;
                self.status = FetchStatus::Error;
                self.error = Some(error);
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut fetch = Fetch::<u32>::default();
        assert_eq!(fetch.status(), FetchStatus::Idle);

        fetch.start();
        assert!(fetch.is_pending());
        assert!(fetch.data().is_none());

        fetch.resolve(Ok(3));
        assert_eq!(fetch.status(), FetchStatus::Success);
        assert_eq!(fetch.data(), Some(&3));
    }

    #[test]
    fn test_refresh_keeps_stale_data_until_resolved() {
        let mut fetch = Fetch::default();
        fetch.start();
        fetch.resolve(Ok("old"));

        fetch.refresh();
        assert!(fetch.is_pending());
        assert_eq!(fetch.data(), Some(&"old"));

        fetch.resolve(Ok("new"));
        assert_eq!(fetch.data(), Some(&"new"));
    }

    #[test]
    fn test_error_drops_data() {
        let mut fetch = Fetch::default();
        fetch.start();
        fetch.resolve(Ok(1));

        fetch.refresh();
        fetch.resolve(Err(FetchError::NotFound(String::from("Location 'x'"))));

        assert_eq!(fetch.status(), FetchStatus::Error);
        assert!(fetch.data().is_none());
        assert_eq!(
            fetch.error().map(ToString::to_string).as_deref(),
            Some("Location 'x' not found")
        );

        fetch.refresh();
        assert!(fetch.error().is_none());
    }
}
