//! Primary process resolution.

use atlas_advisor_types::ProcessList;

use super::Advisor;
use crate::AtlasError;

impl Advisor {
    /// Identifier of the first process in `project_id` whose type label
    /// contains "primary" (any case).
    ///
    /// Every failure here is fatal: transport errors, undecodable responses
    /// and a listing without a primary all end the run.
    pub async fn resolve_primary(&self, project_id: &str) -> Result<String, AtlasError> {
        let response = self.transport.get(&self.processes_uri(project_id)).await?;
        let processes: ProcessList = response.decode()?;

        let primary = processes.primary().ok_or(AtlasError::NoPrimary)?;
        self.reporter.primary_resolved(&primary.id);
        Ok(primary.id.clone())
    }
}
