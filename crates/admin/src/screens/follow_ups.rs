//! Follow-ups screen.

use crm_console_core::FollowUp;

use super::{Console, LinkedScreen};
use crate::components::follow_ups_table_config;

pub type FollowUpsScreen = LinkedScreen<FollowUp>;

impl LinkedScreen<FollowUp> {
    #[must_use]
    pub fn follow_ups(console: &Console) -> Self {
        Self::new(console, follow_ups_table_config())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use crm_console_core::{FollowUpDraft, LeadId};
    use mockito::Matcher;

    use super::*;
    use crate::config::ConsoleConfig;
    use crate::controller::Mutation;
    use crate::error::{ConsoleError, Notice};

    fn console(server: &mockito::ServerGuard) -> Console {
        let url = server.url();
        let config =
            ConsoleConfig::from_lookup(|key| (key == "CRM_API_BASE_URL").then(|| url.clone()))
                .unwrap();
        Console::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_date_filter_and_search() {
        let mut server = mockito::Server::new_async().await;
        let _follow_ups = server
            .mock("GET", "/followUps")
            .with_status(200)
            .with_body(
                r#"[
                    {"id": 1, "title": "Send quote", "date": "2025-07-01", "notes": "pricing", "leadId": 1, "rep": "Alice"},
                    {"id": 2, "title": "Demo", "date": "2025-07-02", "notes": "", "leadId": 2, "rep": "Bob"},
                    {"id": 3, "title": "Check in", "date": "2025-07-01", "notes": "", "leadId": 2, "rep": "Bob"}
                ]"#,
            )
            .create_async()
            .await;
        let _leads = server
            .mock("GET", "/leads")
            .with_status(200)
            .with_body(r#"[{"id": 1, "name": "John Doe"}, {"id": 2, "name": "Ann Lee"}]"#)
            .create_async()
            .await;

        let mut screen = FollowUpsScreen::follow_ups(&console(&server));
        screen.load().await.unwrap();

        let page = screen.refine(|s| s.set_filter("date", "2025-07-01"));
        assert_eq!(page.total, 2);

        let page = screen.refine(|s| s.set_search("ann"));
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].record.title, "Check in");

        let page = screen.refine(|s| {
            s.clear_filter("date");
            s.set_search("PRICING");
        });
        assert_eq!(page.items[0].lead_name, "John Doe");
    }

    #[tokio::test]
    async fn test_create_follow_up() {
        let mut server = mockito::Server::new_async().await;
        let post = server
            .mock("POST", "/followUps")
            .match_body(Matcher::PartialJsonString(
                r#"{"title": "Call back", "leadId": 1, "rep": ""}"#.to_string(),
            ))
            .with_status(201)
            .with_body(r#"{"id": 9, "title": "Call back", "date": "2025-07-03", "leadId": 1}"#)
            .create_async()
            .await;
        let _follow_ups = server
            .mock("GET", "/followUps")
            .with_status(200)
            .with_body(r#"[{"id": 9, "title": "Call back", "date": "2025-07-03", "leadId": 1}]"#)
            .create_async()
            .await;
        let _leads = server
            .mock("GET", "/leads")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let mut screen = FollowUpsScreen::follow_ups(&console(&server));
        let draft = FollowUpDraft {
            title: "Call back".to_string(),
            date: "2025-07-03".to_string(),
            lead_id: LeadId::from(1),
            ..FollowUpDraft::default()
        };
        let page = screen.mutate(Mutation::Create(draft)).await.unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(
            screen.view().notice(),
            Some(&Notice::success("Follow-up created"))
        );
        post.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_title_is_a_warning() {
        let server = mockito::Server::new_async().await;
        let mut screen = FollowUpsScreen::follow_ups(&console(&server));

        let err = screen
            .mutate(Mutation::Create(FollowUpDraft::default()))
            .await
            .unwrap_err();
        assert!(matches!(err, ConsoleError::ValidationFailed { .. }));
        assert_eq!(
            screen.view().notice().unwrap().message,
            "Title, Date and Lead are required"
        );
    }
}
