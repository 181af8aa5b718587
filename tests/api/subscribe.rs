use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};
use subscriber_api::web::types::ValidEmail;
use tokio::task::JoinSet;

use crate::helpers::TestApp;

// ###################################
// ->   NO DATABASE NEEDED
// ###################################
#[tokio::test]
async fn subscribe_returns_400_for_invalid_emails() -> Result<()> {
    let app = TestApp::spawn_without_db().await?;

    let cases = [
        ("", "Empty email"),
        ("   ", "Whitespace only"),
        ("not-an-email", "Missing @"),
        ("missing-at.com", "Missing @ with a dot"),
        ("user@domain", "Missing dot after @"),
        ("@example.com", "Missing local part"),
        ("user @example.com", "Whitespace in local part"),
        ("user@exa mple.com", "Whitespace in domain"),
        ("a@@b.c", "Double @"),
    ];

    for (email, description) in cases {
        let res = app.post_subscribe(&json!({ "email": email })).await?;
        assert_eq!(
            res.status(),
            StatusCode::BAD_REQUEST,
            "The API did not return a 400 BAD REQUEST, the payload was: {description}"
        );
        assert_eq!(
            res.json::<Value>().await?,
            json!({ "error": "Valid email is required" })
        );
    }

    Ok(())
}

#[tokio::test]
async fn subscribe_returns_400_when_email_is_missing_or_not_a_string() -> Result<()> {
    let app = TestApp::spawn_without_db().await?;

    let cases = [
        (json!({}), "Empty json"),
        (json!({ "name": "John Doe" }), "Missing email"),
        (json!({ "email": null }), "Null email"),
        (json!({ "email": 42 }), "Number email"),
        (json!(["john.doe@example.com"]), "Not an object"),
    ];

    for (body, description) in cases {
        let res = app.post_subscribe(&body).await?;
        assert_eq!(
            res.status(),
            StatusCode::BAD_REQUEST,
            "Wrong response: ({}), Expected: (400); for request with: {description}",
            res.status()
        );
        assert_eq!(
            res.json::<Value>().await?,
            json!({ "error": "Valid email is required" })
        );
    }

    Ok(())
}

#[tokio::test]
async fn subscribe_returns_400_for_bodies_that_are_not_json() -> Result<()> {
    let app = TestApp::spawn_without_db().await?;

    let cases = [
        ("email=john.doe%40example.com", "application/x-www-form-urlencoded"),
        ("{\"email\": ", "application/json"),
        ("", "application/json"),
        // A valid JSON body only counts when it is sent as JSON
        ("{\"email\": \"john.doe@example.com\"}", "text/plain"),
        (
            "{\"email\": \"john.doe@example.com\"}",
            "application/x-www-form-urlencoded",
        ),
    ];

    for (body, content_type) in cases {
        let res = app.post_subscribe_raw(body, content_type).await?;
        assert_eq!(
            res.status(),
            StatusCode::BAD_REQUEST,
            "The API did not return a 400 BAD REQUEST for body: {body:?} sent as {content_type}"
        );
        assert_eq!(
            res.json::<Value>().await?,
            json!({ "error": "Valid email is required" })
        );
    }

    Ok(())
}

#[tokio::test]
async fn subscribe_returns_500_when_database_is_unreachable() -> Result<()> {
    let app = TestApp::spawn_without_db().await?;

    let res = app
        .post_subscribe(&json!({ "email": "user@example.com" }))
        .await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.json::<Value>().await?, json!({ "error": "Service Error!" }));

    Ok(())
}

#[tokio::test]
async fn subscribe_allows_cross_origin_requests() -> Result<()> {
    let app = TestApp::spawn_without_db().await?;

    let res = app
        .http_client
        .post(format!("http://{}/subscribe", app.addr))
        .header("Origin", "https://petcare.example")
        .json(&json!({ "email": "" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        res.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );

    Ok(())
}

// ###################################
// ->   POSTGRES NEEDED
// ###################################
// These return early when the `local` Postgres can't be reached.
#[tokio::test]
async fn subscribe_normalizes_and_persists_new_email() -> Result<()> {
    let Some(app) = TestApp::spawn().await? else {
        return Ok(());
    };

    let res = app
        .post_subscribe(&json!({ "email": "  User@Example.COM " }))
        .await?;

    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(
        res.json::<Value>().await?,
        json!({ "result": "subscribed", "email": "user@example.com" })
    );

    let email = ValidEmail::parse("user@example.com")?;
    let subscriber = app.store.find_by_email(&email).await?;
    assert_eq!(
        subscriber.map(|s| s.email).as_deref(),
        Some("user@example.com")
    );
    assert_eq!(app.store.count().await?, 1);

    Ok(())
}

#[tokio::test]
async fn subscribe_twice_returns_already_subscribed() -> Result<()> {
    let Some(app) = TestApp::spawn().await? else {
        return Ok(());
    };

    let first = app
        .post_subscribe(&json!({ "email": "  User@Example.COM " }))
        .await?;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .post_subscribe(&json!({ "email": "user@example.com" }))
        .await?;
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(
        second.json::<Value>().await?,
        json!({ "result": "already_subscribed", "email": "user@example.com" })
    );

    Ok(())
}

#[tokio::test]
async fn subscribe_variants_of_the_same_email_create_one_record() -> Result<()> {
    let Some(app) = TestApp::spawn().await? else {
        return Ok(());
    };
    let variants = [
        "le_guin@example.com",
        "LE_GUIN@EXAMPLE.COM",
        "  Le_Guin@Example.com",
        "le_guin@example.com\t",
    ];

    let mut statuses = Vec::new();
    for email in variants {
        let res = app.post_subscribe(&json!({ "email": email })).await?;
        statuses.push(res.status());
    }

    assert_eq!(statuses[0], StatusCode::CREATED);
    assert!(statuses[1..].iter().all(|st| *st == StatusCode::OK));
    assert_eq!(app.store.count().await?, 1);

    Ok(())
}

#[tokio::test]
async fn subscribe_repeated_calls_are_idempotent() -> Result<()> {
    let Some(app) = TestApp::spawn().await? else {
        return Ok(());
    };
    let body = json!({ "email": "repeat@example.com" });

    let mut created = 0;
    let mut already = 0;
    for _ in 0..5 {
        match app.post_subscribe(&body).await?.status() {
            StatusCode::CREATED => created += 1,
            StatusCode::OK => already += 1,
            other => panic!("unexpected status: {other}"),
        }
    }

    assert_eq!((created, already), (1, 4));
    assert_eq!(app.store.count().await?, 1);

    Ok(())
}

#[tokio::test]
async fn subscribe_concurrent_identical_requests_insert_once() -> Result<()> {
    let Some(app) = TestApp::spawn().await? else {
        return Ok(());
    };
    let url = format!("http://{}/subscribe", app.addr);

    let mut set = JoinSet::new();
    for _ in 0..10 {
        let client = app.http_client.clone();
        let url = url.clone();
        set.spawn(async move {
            client
                .post(url)
                .json(&json!({ "email": "race@example.com" }))
                .send()
                .await
                .map(|res| res.status())
        });
    }

    let mut created = 0;
    while let Some(status) = set.join_next().await {
        let status = status??;
        assert!(status == StatusCode::CREATED || status == StatusCode::OK);
        if status == StatusCode::CREATED {
            created += 1;
        }
    }

    assert_eq!(created, 1);
    assert_eq!(app.store.count().await?, 1);

    Ok(())
}

#[tokio::test]
async fn subscribe_invalid_email_creates_no_record() -> Result<()> {
    let Some(app) = TestApp::spawn().await? else {
        return Ok(());
    };

    let res = app
        .post_subscribe(&json!({ "email": "not-an-email" }))
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.store.count().await?, 0);

    Ok(())
}
