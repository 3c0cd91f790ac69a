mod common;

use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

// End-to-end coverage of the user/mentor lifecycle. Requires a provisioned
// database; when the server reports its storage unavailable the test exits
// early so the suite stays green in DB-less environments.

async fn register(client: &Client, base: &str, username: &str, password: &str) -> Result<reqwest::Response> {
    let payload = json!({
        "username": username,
        "password": password,
        "email": format!("{}@example.com", username)
    });
    Ok(client
        .post(format!("{}/registration/", base))
        .json(&payload)
        .send()
        .await?)
}

async fn login(client: &Client, base: &str, username: &str, password: &str) -> Result<reqwest::Response> {
    let payload = json!({ "username": username, "password": password });
    Ok(client
        .post(format!("{}/login/", base))
        .json(&payload)
        .send()
        .await?)
}

fn unique(name: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}{}", name, nanos % 1_000_000_000)
}

#[tokio::test]
async fn mentor_assignment_lifecycle() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = Client::new();
    let base = &server.base_url;

    let alice = unique("alice");
    let bob = unique("bob");

    // Register alice; bail out early when no database is provisioned
    let res = register(&client, base, &alice, "pw1").await?;
    if res.status() == StatusCode::SERVICE_UNAVAILABLE {
        eprintln!("skipping mentor_assignment_lifecycle: database unavailable");
        return Ok(());
    }
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = res.json::<Value>().await?;
    let alice_id = body["data"]["id"].as_i64().expect("alice id");

    let res = register(&client, base, &bob, "pw2").await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let bob_id = res.json::<Value>().await?["data"]["id"]
        .as_i64()
        .expect("bob id");

    // Registering the same username again fails and leaves a field error
    let res = register(&client, base, &alice, "pw3").await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert!(body["field_errors"]["username"].is_string());

    // Wrong password gets the same generic rejection as an unknown user
    let res = login(&client, base, &alice, "wrong").await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = login(&client, base, &alice, "pw1").await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    let access = body["data"]["access"].as_str().expect("access").to_string();
    assert!(body["data"]["refresh"].is_string());

    // Any authenticated user can enumerate all users
    let res = client
        .get(format!("{}/users/", base))
        .bearer_auth(&access)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let listed = res.json::<Value>().await?;
    let usernames: Vec<&str> = listed["data"]
        .as_array()
        .expect("user list")
        .iter()
        .filter_map(|u| u["username"].as_str())
        .collect();
    assert!(usernames.contains(&alice.as_str()));
    assert!(usernames.contains(&bob.as_str()));

    // Self-assignment is always rejected and changes nothing
    let res = client
        .post(format!("{}/users/", base))
        .bearer_auth(&access)
        .json(&json!({ "user_id": alice_id }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Unknown mentor candidate is a 404
    let res = client
        .post(format!("{}/users/", base))
        .bearer_auth(&access)
        .json(&json!({ "user_id": 999_999_999_i64 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Assign bob as alice's mentor
    let res = client
        .post(format!("{}/users/", base))
        .bearer_auth(&access)
        .json(&json!({ "user_id": bob_id }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert!(body["data"]["detail"].as_str().expect("detail").contains(&bob));

    // Alice's own detail view reflects the mentor and exposes her hash
    let res = client
        .get(format!("{}/users/{}/", base, alice_id))
        .bearer_auth(&access)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["mentor"], bob.as_str());
    assert!(body["data"]["password"].is_string(), "self view carries the hash");

    // Bob's view (as seen by alice) lists alice as mentee, without a hash
    let res = client
        .get(format!("{}/users/{}/", base, bob_id))
        .bearer_auth(&access)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    let mentees = body["data"]["mentees"].as_array().expect("mentees");
    assert!(mentees.iter().any(|m| m == alice.as_str()));
    assert!(body["data"].get("password").is_none());

    // Non-owner PATCH is forbidden and mutates nothing
    let res = client
        .patch(format!("{}/users/{}/", base, bob_id))
        .bearer_auth(&access)
        .json(&json!({ "email": "hijacked@example.com" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .get(format!("{}/users/{}/", base, bob_id))
        .bearer_auth(&access)
        .send()
        .await?;
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["email"], format!("{}@example.com", bob));

    // Changing own password invalidates the old one for future logins
    let res = client
        .patch(format!("{}/users/{}/", base, alice_id))
        .bearer_auth(&access)
        .json(&json!({ "password": "pw1-rotated" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = login(&client, base, &alice, "pw1").await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = login(&client, base, &alice, "pw1-rotated").await?;
    assert_eq!(res.status(), StatusCode::OK);
    let second_access = res.json::<Value>().await?["data"]["access"]
        .as_str()
        .expect("access")
        .to_string();

    // Logout blacklists every outstanding token, not just the current one
    let res = client
        .post(format!("{}/logout/", base))
        .bearer_auth(&second_access)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::RESET_CONTENT);

    for token in [&access, &second_access] {
        let res = client
            .get(format!("{}/users/", base))
            .bearer_auth(token)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    // A fresh login still works after logout
    let res = login(&client, base, &alice, "pw1-rotated").await?;
    assert_eq!(res.status(), StatusCode::OK);

    Ok(())
}
