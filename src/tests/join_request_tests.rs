#[cfg(test)]
mod tests {
    use actix_web::{test, web, App};
    use crate::routes::{join_request_routes, team_routes};
    use crate::store::DocumentStore;
    use crate::utils::auth_middleware::Authentication;
    use crate::utils::jwt;
    use serde_json::json;
    use uuid::Uuid;

    fn scratch_store() -> web::Data<DocumentStore> {
        let root = std::env::temp_dir().join(format!("hackmate-it-{}", Uuid::new_v4()));
        web::Data::new(DocumentStore::new(root))
    }

    fn token_for(user_id: &str) -> String {
        jwt::generate_token(
            user_id,
            &format!("{}@example.com", user_id),
            &format!("{} Name", user_id),
        )
        .unwrap()
    }

    fn create_team_request(token: &str, name: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/teams")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .set_json(&json!({
                "name": name,
                "description": "a team",
                "skills_needed": ["rust"],
                "max_members": 4
            }))
    }

    #[actix_rt::test]
    async fn join_request_accept_adds_to_roster() {
        let store = scratch_store();
        let app = test::init_service(
            App::new()
                .app_data(store.clone())
                .wrap(Authentication)
                .configure(team_routes::init_routes)
                .configure(join_request_routes::init_routes),
        )
        .await;

        let alice = token_for("alice");
        let bob = token_for("bob");

        let request = create_team_request(&alice, "open team").to_request();
        let team: serde_json::Value = test::call_and_read_body_json(&app, request).await;
        let team_id = team["id"].as_str().unwrap().to_string();

        // Bob asks to join
        let request = test::TestRequest::post()
            .uri(&format!("/teams/{}/join-requests", team_id))
            .insert_header(("Authorization", format!("Bearer {}", bob)))
            .to_request();
        let response: serde_json::Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(response["status"], "created");
        let request_id = response["id"].as_str().unwrap().to_string();

        // A repeat ask reports the existing pending request
        let request = test::TestRequest::post()
            .uri(&format!("/teams/{}/join-requests", team_id))
            .insert_header(("Authorization", format!("Bearer {}", bob)))
            .to_request();
        let response: serde_json::Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(response["status"], "already_requested");

        // The leader sees it with bob's identity attached
        let request = test::TestRequest::get()
            .uri(&format!("/teams/{}/join-requests", team_id))
            .insert_header(("Authorization", format!("Bearer {}", alice)))
            .to_request();
        let requests: serde_json::Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(requests.as_array().unwrap().len(), 1);
        assert_eq!(requests[0]["user_id"], "bob");
        assert_eq!(requests[0]["user_email"], "bob@example.com");

        // The leader accepts and bob lands on the roster
        let request = test::TestRequest::put()
            .uri(&format!("/join-requests/{}", request_id))
            .insert_header(("Authorization", format!("Bearer {}", alice)))
            .set_json(&json!({ "status": "accepted" }))
            .to_request();
        let response: serde_json::Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(response["status"], "accepted");

        let request = test::TestRequest::get()
            .uri(&format!("/teams/{}", team_id))
            .insert_header(("Authorization", format!("Bearer {}", alice)))
            .to_request();
        let team: serde_json::Value = test::call_and_read_body_json(&app, request).await;
        let member_ids: Vec<&str> = team["members"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["user_id"].as_str().unwrap())
            .collect();
        assert_eq!(member_ids, vec!["alice", "bob"]);

        // The decision is final
        let request = test::TestRequest::put()
            .uri(&format!("/join-requests/{}", request_id))
            .insert_header(("Authorization", format!("Bearer {}", alice)))
            .set_json(&json!({ "status": "rejected" }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), 409);
    }

    #[actix_rt::test]
    async fn only_the_leader_reviews_join_requests() {
        let store = scratch_store();
        let app = test::init_service(
            App::new()
                .app_data(store.clone())
                .wrap(Authentication)
                .configure(team_routes::init_routes)
                .configure(join_request_routes::init_routes),
        )
        .await;

        let alice = token_for("alice");
        let bob = token_for("bob");

        let request = create_team_request(&alice, "guarded team").to_request();
        let team: serde_json::Value = test::call_and_read_body_json(&app, request).await;
        let team_id = team["id"].as_str().unwrap().to_string();

        let request = test::TestRequest::post()
            .uri(&format!("/teams/{}/join-requests", team_id))
            .insert_header(("Authorization", format!("Bearer {}", bob)))
            .to_request();
        let response: serde_json::Value = test::call_and_read_body_json(&app, request).await;
        let request_id = response["id"].as_str().unwrap().to_string();

        // Bob cannot list the queue
        let request = test::TestRequest::get()
            .uri(&format!("/teams/{}/join-requests", team_id))
            .insert_header(("Authorization", format!("Bearer {}", bob)))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), 403);

        // Bob cannot approve himself
        let request = test::TestRequest::put()
            .uri(&format!("/join-requests/{}", request_id))
            .insert_header(("Authorization", format!("Bearer {}", bob)))
            .set_json(&json!({ "status": "accepted" }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), 403);
    }

    #[actix_rt::test]
    async fn joining_an_unknown_team_is_not_found() {
        let store = scratch_store();
        let app = test::init_service(
            App::new()
                .app_data(store.clone())
                .wrap(Authentication)
                .configure(team_routes::init_routes)
                .configure(join_request_routes::init_routes),
        )
        .await;

        let bob = token_for("bob");

        let request = test::TestRequest::post()
            .uri(&format!("/teams/{}/join-requests", Uuid::new_v4()))
            .insert_header(("Authorization", format!("Bearer {}", bob)))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), 404);
    }

    #[actix_rt::test]
    async fn a_member_cannot_request_to_join_again() {
        let store = scratch_store();
        let app = test::init_service(
            App::new()
                .app_data(store.clone())
                .wrap(Authentication)
                .configure(team_routes::init_routes)
                .configure(join_request_routes::init_routes),
        )
        .await;

        let alice = token_for("alice");

        let request = create_team_request(&alice, "own team").to_request();
        let team: serde_json::Value = test::call_and_read_body_json(&app, request).await;
        let team_id = team["id"].as_str().unwrap().to_string();

        // The leader is already a member
        let request = test::TestRequest::post()
            .uri(&format!("/teams/{}/join-requests", team_id))
            .insert_header(("Authorization", format!("Bearer {}", alice)))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), 409);
    }
}
