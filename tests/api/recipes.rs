use serde_json::json;

use crate::helpers::{json_body, soup, spawn_app};

#[tokio::test]
async fn private_recipe_is_hidden_from_public_listing() {
    let app = spawn_app().await;
    let ana = app.signed_up("ana").await;
    let _ben = app.signed_up("ben").await;
    app.created_recipe(&ana, &soup(false)).await;

    let response = app
        .get(&format!("/public/users/{}/recipes", ana.id))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(json_body(response).await, json!([]));

    let response = app
        .get(&format!("/recipes/{}", ana.id))
        .bearer_auth(&ana.token)
        .send()
        .await
        .expect("request");
    assert_eq!(response.status().as_u16(), 200);
    let own = json_body(response).await;
    assert_eq!(own.as_array().map(Vec::len), Some(1));
    assert_eq!(own[0]["title"], "Soup");
}

#[tokio::test]
async fn owner_dashboard_is_forbidden_to_others() {
    let app = spawn_app().await;
    let ana = app.signed_up("ana").await;
    let ben = app.signed_up("ben").await;

    let response = app
        .get(&format!("/recipes/{}", ana.id))
        .bearer_auth(&ben.token)
        .send()
        .await
        .expect("request");
    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn create_requires_title_ingredients_and_instructions() {
    let app = spawn_app().await;
    let ana = app.signed_up("ana").await;

    for missing in ["title", "ingredients", "instructions"] {
        let mut recipe = soup(true);
        recipe[missing] = json!("");
        let response = app.create_recipe(&ana, &recipe).await;
        assert_eq!(response.status().as_u16(), 400, "missing {missing}");
    }

    let response = app
        .get(&format!("/recipes/{}", ana.id))
        .bearer_auth(&ana.token)
        .send()
        .await
        .expect("request");
    assert_eq!(json_body(response).await, json!([]));
}

#[tokio::test]
async fn create_accepts_client_field_names_and_defaults() {
    let app = spawn_app().await;
    let ana = app.signed_up("ana").await;
    let id = app
        .created_recipe(
            &ana,
            &json!({
                "user_id": ana.id,
                "title": "Pie",
                "ingredients": "apples",
                "instructions": "bake",
                "prepTime": 20,
                "cookTime": 45,
            }),
        )
        .await;

    let recipe = json_body(
        app.get(&format!("/public/recipes/{id}"))
            .send()
            .await
            .expect("request"),
    )
    .await;
    assert_eq!(recipe["servings"], 1);
    assert_eq!(recipe["is_public"], true);
    assert_eq!(recipe["prep_time"], 20);
    assert_eq!(recipe["cook_time"], 45);
    assert_eq!(recipe["username"], "ana");
}

#[tokio::test]
async fn numeric_visibility_flags_from_the_web_client_are_accepted() {
    let app = spawn_app().await;
    let ana = app.signed_up("ana").await;
    let client_payload = |is_public: i64| {
        json!({
            "user_id": ana.id,
            "title": "Pie",
            "category": "",
            "description": "",
            "ingredients": "apples",
            "instructions": "bake",
            "servings": 2,
            "prepTime": null,
            "cookTime": null,
            "image_url": null,
            "is_public": is_public,
        })
    };

    let id = app.created_recipe(&ana, &client_payload(0)).await;
    let response = app
        .get(&format!("/public/recipes/{id}"))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status().as_u16(), 404);

    let response = app
        .put(&format!("/recipes/{id}"))
        .bearer_auth(&ana.token)
        .json(&client_payload(1))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status().as_u16(), 200);

    let recipe = json_body(
        app.get(&format!("/public/recipes/{id}"))
            .send()
            .await
            .expect("request"),
    )
    .await;
    assert_eq!(recipe["is_public"], true);
    assert_eq!(recipe["servings"], 2);
}

#[tokio::test]
async fn create_for_someone_else_is_forbidden() {
    let app = spawn_app().await;
    let ana = app.signed_up("ana").await;
    let ben = app.signed_up("ben").await;

    let mut recipe = soup(true);
    recipe["user_id"] = json!(ana.id);
    let response = app.create_recipe(&ben, &recipe).await;
    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn non_owner_cannot_update_or_delete() {
    let app = spawn_app().await;
    let ana = app.signed_up("ana").await;
    let ben = app.signed_up("ben").await;
    let id = app.created_recipe(&ana, &soup(true)).await;

    let mut edit = soup(true);
    edit["title"] = json!("Hijacked");
    let response = app
        .put(&format!("/recipes/{id}"))
        .bearer_auth(&ben.token)
        .json(&edit)
        .send()
        .await
        .expect("request");
    assert_eq!(response.status().as_u16(), 403);
    assert_eq!(json_body(response).await["kind"], "forbidden");

    let response = app
        .delete(&format!("/recipes/{id}"))
        .bearer_auth(&ben.token)
        .send()
        .await
        .expect("request");
    assert_eq!(response.status().as_u16(), 403);

    let recipe = json_body(
        app.get(&format!("/public/recipes/{id}"))
            .send()
            .await
            .expect("request"),
    )
    .await;
    assert_eq!(recipe["title"], "Soup");
}

#[tokio::test]
async fn owner_updates_then_deletes() {
    let app = spawn_app().await;
    let ana = app.signed_up("ana").await;
    let id = app.created_recipe(&ana, &soup(true)).await;

    let mut edit = soup(false);
    edit["title"] = json!("Tomato soup");
    let response = app
        .put(&format!("/recipes/{id}"))
        .bearer_auth(&ana.token)
        .json(&edit)
        .send()
        .await
        .expect("request");
    assert_eq!(response.status().as_u16(), 200);

    // Now private: anonymous readers get 404, the owner still sees it.
    let response = app
        .get(&format!("/public/recipes/{id}"))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status().as_u16(), 404);
    let response = app
        .get(&format!("/public/recipes/{id}"))
        .bearer_auth(&ana.token)
        .send()
        .await
        .expect("request");
    assert_eq!(json_body(response).await["title"], "Tomato soup");

    let response = app
        .delete(&format!("/recipes/{id}"))
        .bearer_auth(&ana.token)
        .send()
        .await
        .expect("request");
    assert_eq!(response.status().as_u16(), 200);

    let response = app
        .delete(&format!("/recipes/{id}"))
        .bearer_auth(&ana.token)
        .send()
        .await
        .expect("request");
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn non_numeric_recipe_id_is_a_validation_error() {
    let app = spawn_app().await;
    let response = app
        .get("/public/recipes/abc")
        .send()
        .await
        .expect("request");
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(json_body(response).await["kind"], "validation_error");
}
