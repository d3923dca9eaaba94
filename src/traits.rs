use crate::config::TabungConfig;
use crate::types::{ProjectionDetails, TabungError};

/// Trait to be implemented by all savings instrument calculators.
pub trait ProjectSavings {
    /// Project the account forward using the rate data in `config`.
    fn project(&self, config: &TabungConfig) -> Result<ProjectionDetails, TabungError>;

    /// Returns the label of the account, if any.
    fn get_label(&self) -> Option<String> {
        None
    }

    /// Returns the stable unique identifier for this account.
    fn get_id(&self) -> uuid::Uuid;
}

/// Async version of the ProjectSavings trait.
///
/// Automatically implemented for any type that implements `ProjectSavings + Send + Sync`.
#[cfg(feature = "async")]
#[async_trait::async_trait]
pub trait AsyncProjectSavings: Send + Sync {
    async fn project_async(&self, config: &TabungConfig) -> Result<ProjectionDetails, TabungError>;

    fn get_label(&self) -> Option<String> {
        None
    }

    fn get_id(&self) -> uuid::Uuid;
}

#[cfg(feature = "async")]
#[async_trait::async_trait]
impl<T> AsyncProjectSavings for T
where
    T: ProjectSavings + Sync + Send,
{
    async fn project_async(&self, config: &TabungConfig) -> Result<ProjectionDetails, TabungError> {
        self.project(config)
    }

    fn get_label(&self) -> Option<String> {
        ProjectSavings::get_label(self)
    }

    fn get_id(&self) -> uuid::Uuid {
        ProjectSavings::get_id(self)
    }
}
