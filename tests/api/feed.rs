use serde_json::json;

use crate::helpers::{json_body, spawn_app};

#[tokio::test]
async fn feed_lists_public_recipes_newest_first_with_owner() {
    let app = spawn_app().await;
    let ana = app.signed_up("ana").await;
    let ben = app.signed_up("ben").await;

    for (user, title, is_public) in [
        (&ana, "Bread", true),
        (&ben, "Secret", false),
        (&ben, "Cake", true),
    ] {
        app.created_recipe(
            user,
            &json!({
                "title": title,
                "ingredients": "flour",
                "instructions": "bake",
                "is_public": is_public,
            }),
        )
        .await;
    }

    let feed = json_body(app.get("/feed/public").send().await.expect("request")).await;
    let titles: Vec<&str> = feed
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|r| r["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["Cake", "Bread"]);
    assert_eq!(feed[0]["username"], "ben");
    assert!(feed[0].get("avatar_url").is_some());

    let page = json_body(
        app.get("/feed/public?limit=1&offset=1")
            .send()
            .await
            .expect("request"),
    )
    .await;
    assert_eq!(page.as_array().map(Vec::len), Some(1));
    assert_eq!(page[0]["title"], "Bread");

    let all = json_body(app.get("/public/recipes").send().await.expect("request")).await;
    assert_eq!(all.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn feed_rejects_bad_paging() {
    let app = spawn_app().await;
    for query in ["limit=-1", "offset=-3", "limit=ten", "offset=1.5"] {
        let response = app
            .get(&format!("/feed/public?{query}"))
            .send()
            .await
            .expect("request");
        assert_eq!(response.status().as_u16(), 400, "query {query}");
        assert_eq!(json_body(response).await["kind"], "validation_error");
    }
}
