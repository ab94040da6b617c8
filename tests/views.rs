use chrono::NaiveDate;
use field_sense_lib::api::ApiClient;
use field_sense_lib::views::dashboard::DashboardStats;
use field_sense_lib::views::details::{load_lead, DetailState};
use field_sense_lib::views::management::{ManagementView, Tab};
use field_sense_lib::views::ViewScope;
use serde_json::json;

async fn backend() -> mockito::ServerGuard {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/leads")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                { "id": "1", "leadName": "bob", "leadStatus": "active" },
                { "id": "2", "leadName": "Alice", "leadStatus": "converted" },
                { "id": "3", "leadName": "carol", "leadStatus": "active" }
            ])
            .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", "/api/meetings")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                { "id": "10", "meetingTitle": "Review", "meetingDate": "2024-05-01" },
                { "id": "11", "meetingTitle": "Kickoff", "meetingDate": "2024-07-01" }
            ])
            .to_string(),
        )
        .create_async()
        .await;
    server
}

#[tokio::test]
async fn dashboard_counts_come_from_both_collections() {
    let server = backend().await;
    let api = ApiClient::new(&server.url());
    let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

    let stats = DashboardStats::load(&api, &ViewScope::new(), today)
        .await
        .unwrap();
    assert_eq!(stats.leads, 3);
    assert_eq!(stats.active_leads, 2);
    assert_eq!(stats.meetings, 2);
    assert_eq!(stats.upcoming_meetings, 1);
}

#[tokio::test]
async fn management_view_sorts_fetched_leads() {
    let server = backend().await;
    let api = ApiClient::new(&server.url());

    let mut view = ManagementView::load(&api, &ViewScope::new(), 10)
        .await
        .unwrap();
    assert_eq!(view.visible().range_label, "1-2 of 2");

    view.switch_tab(Tab::Leads);
    view.click_header("leadName");
    let names: Vec<_> = view
        .visible()
        .rows
        .into_iter()
        .map(|r| r.cells[0].clone())
        .collect();
    assert_eq!(names, ["Alice", "bob", "carol"]);
}

#[tokio::test]
async fn failed_lead_fetch_leaves_only_that_tab_empty() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/leads")
        .with_status(500)
        .create_async()
        .await;
    server
        .mock("GET", "/api/meetings")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([{ "id": "10", "meetingTitle": "Review" }]).to_string())
        .create_async()
        .await;

    let api = ApiClient::new(&server.url());
    let mut view = ManagementView::load(&api, &ViewScope::new(), 10)
        .await
        .unwrap();
    assert_eq!(view.visible().rows.len(), 1);

    view.switch_tab(Tab::Leads);
    let table = view.visible();
    assert_eq!(table.empty_text, Some("No leads found"));
    assert_eq!(table.range_label, "0 of 0");
}

#[tokio::test]
async fn unknown_lead_shows_not_found() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/leads/99")
        .with_status(404)
        .create_async()
        .await;

    let api = ApiClient::new(&server.url());
    let state = load_lead(&api, &ViewScope::new(), "99").await;
    assert_eq!(state, Some(DetailState::NotFound));
}
