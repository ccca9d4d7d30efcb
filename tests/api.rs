mod common;

use reqwest::StatusCode;
use serde_json::{Value, json};

use common::test_server::{TestServer, TestUser};

async fn send(req: reqwest::RequestBuilder) -> (StatusCode, Value) {
    let resp = req.send().await.expect("send request");
    let status = resp.status();
    let body = if status == StatusCode::NO_CONTENT {
        Value::Null
    } else {
        resp.json().await.expect("parse response")
    };
    (status, body)
}

async fn create_course(server: &TestServer, user: &TestUser, title: &str) -> String {
    let (status, body) = send(
        server
            .client
            .post(server.api("/courses"))
            .bearer_auth(&user.token)
            .json(&json!({ "title": title, "description": "A course" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_str().expect("course id").to_string()
}

async fn add_section(server: &TestServer, user: &TestUser, course_id: &str, title: &str) -> Value {
    let (status, body) = send(
        server
            .client
            .post(server.api(&format!("/courses/{course_id}/sections")))
            .bearer_auth(&user.token)
            .json(&json!({ "title": title })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"].clone()
}

#[tokio::test]
async fn health_and_auth() {
    let server = TestServer::start().await;

    let resp = server
        .client
        .get(server.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = server.client.get(server.api("/courses")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let user = server.create_user("ada@example.com").await;
    let (status, body) = send(server.client.get(server.api("/me")).bearer_auth(&user.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "ada@example.com");

    // User tokens cannot reach admin routes.
    let resp = server
        .client
        .get(server.api("/admin/users"))
        .bearer_auth(&user.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn sections_keep_insertion_order() {
    let server = TestServer::start().await;
    let user = server.create_user("ada@example.com").await;
    let course_id = create_course(&server, &user, "Ordering").await;

    for (i, title) in ["Intro", "Middle", "End"].iter().enumerate() {
        let section = add_section(&server, &user, &course_id, title).await;
        assert_eq!(section["order_index"], i as i64);
    }

    let (status, body) = send(
        server
            .client
            .get(server.api(&format!("/courses/{course_id}")))
            .bearer_auth(&user.token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body["data"]["sections"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Intro", "Middle", "End"]);
}

#[tokio::test]
async fn delete_section_removes_activities() {
    let server = TestServer::start().await;
    let user = server.create_user("ada@example.com").await;
    let course_id = create_course(&server, &user, "Cleanup").await;
    let section = add_section(&server, &user, &course_id, "Week 1").await;
    let section_id = section["id"].as_str().unwrap();

    let (status, activity) = send(
        server
            .client
            .post(server.api(&format!("/sections/{section_id}/activities")))
            .bearer_auth(&user.token)
            .json(&json!({
                "title": "Reading",
                "activity_type": "pdf",
                "source": "url",
                "url": "https://example.com/reading.pdf"
            })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{activity}");
    let activity_id = activity["data"]["id"].as_str().unwrap();

    let (status, _) = send(
        server
            .client
            .delete(server.api(&format!("/sections/{section_id}")))
            .bearer_auth(&user.token),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        server
            .client
            .delete(server.api(&format!("/activities/{activity_id}")))
            .bearer_auth(&user.token),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        server
            .client
            .delete(server.api(&format!("/sections/{section_id}")))
            .bearer_auth(&user.token),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn youtube_activity_validation() {
    let server = TestServer::start().await;
    let user = server.create_user("ada@example.com").await;
    let course_id = create_course(&server, &user, "Videos").await;
    let section = add_section(&server, &user, &course_id, "Clips").await;
    let path = format!("/sections/{}/activities", section["id"].as_str().unwrap());

    let (status, body) = send(
        server
            .client
            .post(server.api(&path))
            .bearer_auth(&user.token)
            .json(&json!({
                "title": "Bad link",
                "activity_type": "video",
                "source": "youtube",
                "url": "https://example.com/watch?v=abc"
            })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("Please enter a valid YouTube URL"),
        "{body}"
    );

    let (status, body) = send(
        server
            .client
            .post(server.api(&path))
            .bearer_auth(&user.token)
            .json(&json!({
                "title": "Good link",
                "activity_type": "video",
                "source": "youtube",
                "url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
            })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(
        body["data"]["url"],
        "https://www.youtube.com/embed/dQw4w9WgXcQ"
    );
}

#[tokio::test]
async fn pricing_rules() {
    let server = TestServer::start().await;
    let user = server.create_user("ada@example.com").await;
    let course_id = create_course(&server, &user, "Priced").await;
    let pricing = server.api(&format!("/courses/{course_id}/settings/pricing"));

    let (status, body) = send(
        server
            .client
            .put(&pricing)
            .bearer_auth(&user.token)
            .json(&json!({ "price": 49900 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Cannot set pricing for free courses");

    let (status, _) = send(
        server
            .client
            .put(server.api(&format!("/courses/{course_id}/settings/access")))
            .bearer_auth(&user.token)
            .json(&json!({ "access_type": "paid" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        server
            .client
            .put(&pricing)
            .bearer_auth(&user.token)
            .json(&json!({ "price": 49900, "compare_at_price": 49900 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "The compare-at price must be at least ₹499.01"
    );

    let (status, body) = send(
        server
            .client
            .put(&pricing)
            .bearer_auth(&user.token)
            .json(&json!({ "price": 49900, "compare_at_price": 99900 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["price"], 49900);
    assert_eq!(body["data"]["compare_at_price"], 99900);
}

#[tokio::test]
async fn catalog_lists_published_linked_courses() {
    let server = TestServer::start().await;
    let user = server.create_user("ada@example.com").await;

    let (status, site) = send(
        server
            .client
            .post(server.api("/sites"))
            .bearer_auth(&user.token)
            .json(&json!({ "name": "Academy", "url": "academy", "status": "published" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{site}");
    let site_id = site["data"]["id"].as_str().unwrap();

    let published = create_course(&server, &user, "Intro to Rust").await;
    let hidden = create_course(&server, &user, "Draft Course").await;
    add_section(&server, &user, &published, "Ownership").await;

    for (course_id, title) in [(&published, "Intro to Rust"), (&hidden, "Draft Course")] {
        let (status, body) = send(
            server
                .client
                .put(server.api(&format!("/courses/{course_id}/settings/general")))
                .bearer_auth(&user.token)
                .json(&json!({
                    "title": title,
                    "description": "A course",
                    "website_ids": [site_id]
                })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
    }

    let (status, _) = send(
        server
            .client
            .patch(server.api(&format!("/courses/{published}")))
            .bearer_auth(&user.token)
            .json(&json!({ "status": "published" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(server.client.get(server.api("/catalog/academy"))).await;
    assert_eq!(status, StatusCode::OK);
    let courses = body["data"].as_array().unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0]["slug"], "intro-to-rust");
    assert_eq!(courses[0]["sections"][0]["title"], "Ownership");

    let (status, body) = send(server.client.get(server.api("/catalog/academy/intro-to-rust"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], published.as_str());

    let (status, _) = send(server.client.get(server.api("/catalog/academy/draft-course"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(server.client.get(server.api("/catalog/nowhere"))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn other_users_courses_are_hidden() {
    let server = TestServer::start().await;
    let owner = server.create_user("owner@example.com").await;
    let stranger = server.create_user("stranger@example.com").await;
    let course_id = create_course(&server, &owner, "Private Notes").await;

    let (status, _) = send(
        server
            .client
            .get(server.api(&format!("/courses/{course_id}")))
            .bearer_auth(&stranger.token),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        server
            .client
            .delete(server.api(&format!("/courses/{course_id}")))
            .bearer_auth(&stranger.token),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(server.client.get(server.api("/courses")).bearer_auth(&stranger.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn title_check_and_duplicates() {
    let server = TestServer::start().await;
    let user = server.create_user("ada@example.com").await;
    create_course(&server, &user, "Taken").await;

    let (status, body) = send(
        server
            .client
            .get(server.api("/courses/title-check"))
            .query(&[("title", "Taken")])
            .bearer_auth(&user.token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["available"], false);
    assert_eq!(
        body["data"]["message"],
        "A course with this name already exists"
    );

    let (status, body) = send(
        server
            .client
            .get(server.api("/courses/title-check"))
            .query(&[("title", "Fresh")])
            .bearer_auth(&user.token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["available"], true);

    let (status, body) = send(
        server
            .client
            .post(server.api("/courses"))
            .bearer_auth(&user.token)
            .json(&json!({ "title": "Taken", "description": "Again" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "A course with this name already exists");
}

#[tokio::test]
async fn title_check_keeps_only_latest_per_user() {
    let server = TestServer::start().await;
    let ada = server.create_user("ada@example.com").await;
    let bob = server.create_user("bob@example.com").await;
    create_course(&server, &ada, "Taken").await;

    let check = |user: &TestUser, title: &str| {
        send(
            server
                .client
                .get(server.api("/courses/title-check"))
                .query(&[("title", title)])
                .bearer_auth(&user.token),
        )
    };

    let typed_later = async {
        tokio::time::sleep(std::time::Duration::from_millis(30)).await;
        check(&ada, "Taken").await
    };
    let ((_, first), (_, latest), (_, other)) =
        tokio::join!(check(&ada, "Tak"), typed_later, check(&bob, "Taken"));

    assert_eq!(first["data"]["superseded"], true);
    assert!(first["data"]["available"].is_null());
    assert_eq!(latest["data"]["superseded"], false);
    assert_eq!(latest["data"]["available"], false);
    assert_eq!(other["data"]["superseded"], false);
    assert_eq!(other["data"]["available"], true);
}

#[tokio::test]
async fn preview_tracks_opened_lessons() {
    let server = TestServer::start().await;
    let user = server.create_user("ada@example.com").await;
    let course_id = create_course(&server, &user, "Preview").await;
    let section = add_section(&server, &user, &course_id, "Only").await;
    let section_id = section["id"].as_str().unwrap();

    let mut ids = Vec::new();
    for title in ["One", "Two"] {
        let (status, body) = send(
            server
                .client
                .post(server.api(&format!("/sections/{section_id}/activities")))
                .bearer_auth(&user.token)
                .json(&json!({
                    "title": title,
                    "activity_type": "file",
                    "source": "upload",
                    "file_name": format!("{title}.zip")
                })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        ids.push(body["data"]["id"].as_str().unwrap().to_string());
    }

    let (status, body) = send(
        server
            .client
            .post(server.api(&format!("/courses/{course_id}/preview")))
            .bearer_auth(&user.token)
            .json(&json!({ "opened": [ids[0]] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["progress"], 50);
    assert_eq!(body["data"]["completed"], 1);
    assert_eq!(body["data"]["total"], 2);

    // Preview state is never persisted.
    let (_, body) = send(
        server
            .client
            .get(server.api(&format!("/courses/{course_id}")))
            .bearer_auth(&user.token),
    )
    .await;
    assert_eq!(
        body["data"]["sections"][0]["activities"][0]["completed"],
        false
    );
}
