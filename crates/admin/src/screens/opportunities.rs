//! Opportunities screen.

use crm_console_core::{Amount, Opportunity};

use super::{Console, LinkedScreen};
use crate::components::opportunities_table_config;

pub type OpportunitiesScreen = LinkedScreen<Opportunity>;

impl LinkedScreen<Opportunity> {
    #[must_use]
    pub fn opportunities(console: &Console) -> Self {
        Self::new(console, opportunities_table_config())
    }

    /// Summed value of every opportunity passing the current filters.
    #[must_use]
    pub fn filtered_value(&self) -> Amount {
        let rows = self.rows();
        self.view()
            .filtered_of(&rows)
            .into_iter()
            .map(|row| row.record.value)
            .sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use crm_console_core::{OpportunityDraft, OpportunityId};
    use mockito::Matcher;

    use super::*;
    use crate::config::ConsoleConfig;
    use crate::controller::Mutation;
    use crate::error::{ConsoleError, Notice};

    const OPPORTUNITIES: &str = r#"[
        {"id": 1, "name": "Renewal", "value": 5000, "rep": "Alice", "status": "Proposal", "leadId": 1},
        {"id": 2, "name": "Upsell", "value": "250.50", "rep": "Bob", "status": "Won", "leadId": 2},
        {"id": 3, "name": "Pilot", "value": 1200, "rep": "Alice", "status": "Lost", "leadId": 1}
    ]"#;

    async fn screen(
        server: &mut mockito::ServerGuard,
    ) -> (OpportunitiesScreen, Vec<mockito::Mock>) {
        let mocks = vec![
            server
                .mock("GET", "/opportunities")
                .with_status(200)
                .with_body(OPPORTUNITIES)
                .create_async()
                .await,
            server
                .mock("GET", "/leads")
                .with_status(200)
                .with_body(r#"[{"id": 1, "name": "John Doe"}, {"id": 2, "name": "Ann Lee"}]"#)
                .create_async()
                .await,
        ];
        let url = server.url();
        let config =
            ConsoleConfig::from_lookup(|key| (key == "CRM_API_BASE_URL").then(|| url.clone()))
                .unwrap();
        let mut screen = OpportunitiesScreen::opportunities(&Console::new(config).unwrap());
        screen.load().await.unwrap();
        (screen, mocks)
    }

    #[tokio::test]
    async fn test_rep_filter_and_value() {
        let mut server = mockito::Server::new_async().await;
        let (mut screen, _mocks) = screen(&mut server).await;
        assert_eq!(screen.filtered_value(), Amount::from_input("6450.50"));

        let page = screen.refine(|s| s.set_filter("rep", "Alice"));
        assert_eq!(page.total, 2);
        assert_eq!(screen.filtered_value(), Amount::from(6200));

        let out = screen.render(&page);
        assert!(out.contains("Renewal | John Doe | $5,000.00 | Alice"));
    }

    #[tokio::test]
    async fn test_update_refetches() {
        let mut server = mockito::Server::new_async().await;
        let (mut screen, _mocks) = screen(&mut server).await;
        let put = server
            .mock("PUT", "/opportunities/2")
            .match_body(Matcher::PartialJsonString(
                r#"{"status": "Negotiation", "leadId": 2}"#.to_string(),
            ))
            .with_status(200)
            .with_body(r#"{"id": 2, "status": "Negotiation"}"#)
            .create_async()
            .await;

        let mut draft = screen
            .view()
            .find(&OpportunityId::from(2))
            .unwrap()
            .to_draft();
        draft.status = "Negotiation".to_string().into();
        screen
            .mutate(Mutation::Update(OpportunityId::from(2), draft))
            .await
            .unwrap();

        assert_eq!(
            screen.view().notice(),
            Some(&Notice::success("Opportunity updated"))
        );
        put.assert_async().await;
    }

    #[tokio::test]
    async fn test_zero_value_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        let (mut screen, _mocks) = screen(&mut server).await;

        let draft = OpportunityDraft {
            name: "Free lunch".to_string(),
            ..OpportunityDraft::default()
        };
        let err = screen.mutate(Mutation::Create(draft)).await.unwrap_err();
        assert!(matches!(err, ConsoleError::ValidationFailed { .. }));
        assert_eq!(
            screen.view().notice().unwrap().message,
            "Please fill required fields"
        );
    }
}
