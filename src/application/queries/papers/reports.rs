use super::{GetPaperQuery, PaperQueryService};
use crate::{
    application::{dto::AuthenticatedUser, error::ApplicationResult},
    domain::{
        distribution::{DistributionPlanner, DistributionTargets, ValidationReport},
        paper::Part,
    },
};

impl PaperQueryService {
    /// Checks a configuration that is not stored yet.
    pub fn validate_configuration(&self, parts: &[Part], targets: &DistributionTargets) -> ValidationReport {
        DistributionPlanner::validate(parts, targets)
    }

    pub async fn configuration_report(
        &self,
        actor: &AuthenticatedUser,
        query: GetPaperQuery,
    ) -> ApplicationResult<ValidationReport> {
        let paper = self.load(actor, query.id).await?;
        Ok(paper.configuration_report())
    }

    pub async fn assembly_report(
        &self,
        actor: &AuthenticatedUser,
        query: GetPaperQuery,
    ) -> ApplicationResult<ValidationReport> {
        let paper = self.load(actor, query.id).await?;
        Ok(paper.assembly_report())
    }
}
